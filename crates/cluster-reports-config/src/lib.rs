// crates/cluster-reports-config/src/lib.rs
// ============================================================================
// Module: Cluster Reports Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for cluster-reports.toml semantics.
// Dependencies: cluster-reports-core, cluster-reports-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `cluster-reports-config` defines the configuration model for the report
//! server. Loading enforces size, encoding, and path limits; validation is
//! strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
