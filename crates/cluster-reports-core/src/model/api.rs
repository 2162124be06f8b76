// crates/cluster-reports-core/src/model/api.rs
// ============================================================================
// Module: Report API Wire Types
// Description: JSON bodies exchanged over the report HTTP surface.
// Purpose: Share one definition of the wire contract between server and client.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Request and response bodies for the report HTTP surface. Field names are
//! camelCase on the wire. Every non-2xx response carries an
//! [`ApiErrorBody`] whose `code` is one of the stable [`ErrorCode`] labels.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::model::report::Report;
use crate::model::report::ReportData;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Body of `POST /clusters/{clusterId}/reports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportBody {
    /// Human-readable summary.
    pub summary: String,
    /// Opaque base64 payload.
    pub data: ReportData,
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Body of `GET /clusters/{clusterId}/reports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportList {
    /// Reports in ascending creation order; empty when none match.
    pub reports: Vec<Report>,
}

/// Body of `GET /healthz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Liveness label.
    pub status: String,
}

/// Error body returned with every non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Stable machine-readable reason.
    pub code: String,
    /// Short human-readable message.
    pub message: String,
    /// Offending input field for `invalid_input`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// SECTION: Error Codes
// ============================================================================

/// Stable error reasons carried in [`ApiErrorBody::code`].
///
/// # Invariants
/// - Labels are stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Request input failed validation.
    InvalidInput,
    /// Request body is not the expected JSON document.
    InvalidJson,
    /// No report matches the cluster and id.
    NotFound,
    /// Missing or rejected bearer credential.
    Unauthenticated,
    /// Request body exceeds the configured limit.
    PayloadTooLarge,
    /// The report store could not complete the operation.
    StorageFault,
    /// No route matches the request path.
    RouteNotFound,
    /// The route exists but not for this method.
    MethodNotAllowed,
}

impl ErrorCode {
    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidJson => "invalid_json",
            Self::NotFound => "not_found",
            Self::Unauthenticated => "unauthenticated",
            Self::PayloadTooLarge => "payload_too_large",
            Self::StorageFault => "storage_fault",
            Self::RouteNotFound => "route_not_found",
            Self::MethodNotAllowed => "method_not_allowed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
