// crates/cluster-reports-server/src/lib.rs
// ============================================================================
// Module: Cluster Reports Server Library
// Description: HTTP transport for the cluster report API.
// Purpose: Expose the server, auth, audit, and telemetry surfaces.
// Dependencies: axum, tokio, cluster-reports-{core, config, store-sqlite}
// ============================================================================

//! ## Overview
//! The server crate maps the report service onto HTTP. It authenticates each
//! request with a bearer credential, translates [`cluster_reports_core::ReportError`]
//! into stable status codes and error bodies, and emits one audit event and
//! one metric event per request.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod auth;
pub mod correlation;
pub mod server;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::AuthAuditEvent;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::ReportAuditEvent;
pub use audit::StderrAuditSink;
pub use auth::AuthContext;
pub use auth::AuthError;
pub use auth::ReportAuthenticator;
pub use server::BoundReportServer;
pub use server::ReportServer;
pub use server::ServerError;
pub use server::build_audit_sink;
pub use server::build_report_store;
pub use telemetry::NoopMetrics;
pub use telemetry::ReportMetricEvent;
pub use telemetry::ReportMetrics;
pub use telemetry::ReportOperation;
pub use telemetry::ReportOutcome;
