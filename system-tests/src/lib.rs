// system-tests/src/lib.rs
// ============================================================================
// Module: Cluster Reports System Tests Library
// Description: Shared configuration for end-to-end report API scenarios.
// Purpose: Provide common settings for the system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the system-test binaries in
//! `system-tests/tests`. By default each suite spawns its own server on a
//! loopback port; setting `CLUSTER_REPORTS_SYSTEM_TEST_API_URL` points the
//! target-agnostic suites at an already running deployment instead.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
