// crates/cluster-reports-core/src/lib.rs
// ============================================================================
// Module: Cluster Reports Core Library
// Description: Public API surface for the cluster report core.
// Purpose: Expose the report model, store interfaces, and the report service.
// Dependencies: crate::{model, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Cluster reports core owns the report data model, the [`ReportStore`]
//! contract with an in-memory implementation, input validation, and the
//! [`ReportService`] that orchestrates them. It performs no network I/O;
//! transports and durable stores integrate through the interfaces defined
//! here.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod model;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use model::*;

pub use interfaces::Clock;
pub use interfaces::ReportStore;
pub use interfaces::StoreError;
pub use runtime::InMemoryReportStore;
pub use runtime::InputField;
pub use runtime::ReportError;
pub use runtime::ReportIdGenerator;
pub use runtime::ReportService;
pub use runtime::SharedReportStore;
pub use runtime::SystemClock;
pub use runtime::ValidationLimits;
pub use runtime::next_created_at;
