// crates/cluster-reports-core/src/runtime/mod.rs
// ============================================================================
// Module: Cluster Reports Runtime
// Description: Report service, validation, id generation, and in-memory store.
// Purpose: Execute report operations against a pluggable store.
// Dependencies: crate::{model, interfaces}, rand
// ============================================================================

//! ## Overview
//! Runtime modules implement the report operations. Every transport calls
//! into [`ReportService`] so validation and error mapping stay identical
//! across the HTTP server, the CLI, and tests.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod clock;
pub mod ids;
pub mod service;
pub mod store;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use clock::SystemClock;
pub use ids::REPORT_ID_PREFIX;
pub use ids::ReportIdGenerator;
pub use service::ReportError;
pub use service::ReportService;
pub use store::InMemoryReportStore;
pub use store::SharedReportStore;
pub use store::next_created_at;
pub use validation::InputField;
pub use validation::ValidationLimits;
pub use validation::validate_create;
pub use validation::validate_limit;
