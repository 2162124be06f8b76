// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for report API system-tests.
// Purpose: Provide server harnesses and assertion utilities.
// Dependencies: system-tests, cluster-reports-server, cluster-reports-client
// ============================================================================

//! ## Overview
//! Shared helpers for report API system-tests.
//! Invariants:
//! - Every suite owns its server and cluster ids, so suites run in parallel.
//! - Tokens never appear in assertion messages.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod harness;
pub mod require;
