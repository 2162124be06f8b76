// crates/cluster-reports-client/src/lib.rs
// ============================================================================
// Module: Cluster Reports Client Library
// Description: Typed client for the cluster report HTTP API.
// Purpose: Give callers a thin, credential-per-call wrapper over the wire contract.
// Dependencies: reqwest, url, cluster-reports-core
// ============================================================================

//! ## Overview
//! The client speaks the JSON wire contract defined in
//! [`cluster_reports_core::ApiErrorBody`] and friends. It is a collaborator of
//! the report service, not part of it: the server never depends on this crate.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::API_URL_ENV_VAR;
pub use client::BearerToken;
pub use client::ClientConfig;
pub use client::ClientError;
pub use client::DEFAULT_TIMEOUT;
pub use client::MAX_RESPONSE_BYTES;
pub use client::PROXY_ENV_VAR;
pub use client::ReportClient;
