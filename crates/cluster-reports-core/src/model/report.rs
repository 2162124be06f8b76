// crates/cluster-reports-core/src/model/report.rs
// ============================================================================
// Module: Cluster Report Records
// Description: Immutable report record and create request types.
// Purpose: Define the single entity managed by the report store.
// Dependencies: base64, serde
// ============================================================================

//! ## Overview
//! A [`Report`] is created once and never mutated. Its `data` payload is an
//! opaque base64 string; the service stores it verbatim and never decodes
//! it. [`ReportData::encode`] and [`ReportData::decode`] exist for callers
//! that build or read payloads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::DecodeError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde::Serialize;

use crate::model::identifiers::ClusterId;
use crate::model::identifiers::ReportId;
use crate::model::timestamp::Timestamp;

// ============================================================================
// SECTION: Payload
// ============================================================================

/// Opaque report payload in standard base64 text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportData(String);

impl ReportData {
    /// Wraps already-encoded base64 text without inspecting it.
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encodes raw bytes with the standard base64 alphabet.
    #[must_use]
    pub fn encode(bytes: impl AsRef<[u8]>) -> Self {
        Self(STANDARD.encode(bytes))
    }

    /// Decodes the payload back into raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when the stored text is not valid standard base64.
    pub fn decode(&self) -> Result<Vec<u8>, DecodeError> {
        STANDARD.decode(self.0.as_bytes())
    }

    /// Returns the encoded text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the encoded length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the encoded text is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the wrapper and returns the encoded text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Stored diagnostic report.
///
/// # Invariants
/// - `report_id` is unique across all clusters.
/// - `created_at` is non-decreasing in a cluster's insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Store-assigned identifier.
    pub report_id: ReportId,
    /// Owning cluster.
    pub cluster_id: ClusterId,
    /// Human-readable summary.
    pub summary: String,
    /// Opaque base64 payload.
    pub data: ReportData,
    /// Store-assigned creation time.
    pub created_at: Timestamp,
}

/// Caller-supplied fields for a new report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReport {
    /// Owning cluster.
    pub cluster_id: ClusterId,
    /// Human-readable summary.
    pub summary: String,
    /// Opaque base64 payload.
    pub data: ReportData,
}

impl CreateReport {
    /// Builds a create request.
    #[must_use]
    pub fn new(cluster_id: ClusterId, summary: impl Into<String>, data: ReportData) -> Self {
        Self {
            cluster_id,
            summary: summary.into(),
            data,
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
