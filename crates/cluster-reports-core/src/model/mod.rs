// crates/cluster-reports-core/src/model/mod.rs
// ============================================================================
// Module: Cluster Reports Model
// Description: Data model for cluster-scoped diagnostic reports.
// Purpose: Group identifiers, timestamps, report records, and wire bodies.
// Dependencies: serde, time, base64, sha2
// ============================================================================

//! ## Overview
//! Model types are plain data: identifiers, timestamps, and the immutable
//! [`Report`] record. Behavior lives in [`crate::runtime`].

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod api;
pub mod hashing;
pub mod identifiers;
pub mod report;
pub mod timestamp;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use api::ApiErrorBody;
pub use api::CreateReportBody;
pub use api::ErrorCode;
pub use api::HealthStatus;
pub use api::ReportList;
pub use hashing::sha256_hex;
pub use identifiers::ClusterId;
pub use identifiers::ReportId;
pub use report::CreateReport;
pub use report::Report;
pub use report::ReportData;
pub use timestamp::Timestamp;
pub use timestamp::TimestampError;
