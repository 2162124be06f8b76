// crates/cluster-reports-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Report Store
// Description: Durable ReportStore backend using SQLite WAL.
// Purpose: Persist cluster reports across restarts.
// Dependencies: cluster-reports-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`ReportStore`] implementation. Each
//! report is one row; a cluster's insertion order is the table's
//! autoincrement sequence, and every payload is stored with a SHA-256 digest
//! that is verified on read.
//!
//! [`ReportStore`]: cluster_reports_core::ReportStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteReportStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
