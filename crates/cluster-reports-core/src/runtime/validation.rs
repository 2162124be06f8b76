// crates/cluster-reports-core/src/runtime/validation.rs
// ============================================================================
// Module: Report Validation
// Description: Create request and list limit validation.
// Purpose: Reject malformed input before it reaches a store.
// Dependencies: crate::{model, runtime}
// ============================================================================

//! ## Overview
//! Validation runs on create requests and list limits only. `clusterId` and
//! `summary` are judged after trimming whitespace, but the stored summary
//! keeps the caller's original text. `data` is opaque: it must be non-empty
//! and within the size limit, and is never checked for base64 validity.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroUsize;

use serde::Deserialize;
use serde::Serialize;

use crate::model::ClusterId;
use crate::model::CreateReport;
use crate::runtime::service::ReportError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum summary length in bytes.
pub const DEFAULT_MAX_SUMMARY_BYTES: usize = 4 * 1024;
/// Default maximum encoded payload length in bytes.
pub const DEFAULT_MAX_DATA_BYTES: usize = 8 * 1024 * 1024;
/// Default maximum cluster id length in bytes.
pub const DEFAULT_MAX_CLUSTER_ID_BYTES: usize = 256;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Request field named by an input validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    /// Cluster identifier.
    ClusterId,
    /// Report summary.
    Summary,
    /// Report payload.
    Data,
    /// List limit.
    Limit,
}

impl InputField {
    /// Returns the wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClusterId => "clusterId",
            Self::Summary => "summary",
            Self::Data => "data",
            Self::Limit => "limit",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size limits applied to create requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationLimits {
    /// Maximum summary length in bytes.
    pub max_summary_bytes: usize,
    /// Maximum encoded payload length in bytes.
    pub max_data_bytes: usize,
    /// Maximum cluster id length in bytes.
    pub max_cluster_id_bytes: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_summary_bytes: DEFAULT_MAX_SUMMARY_BYTES,
            max_data_bytes: DEFAULT_MAX_DATA_BYTES,
            max_cluster_id_bytes: DEFAULT_MAX_CLUSTER_ID_BYTES,
        }
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a cluster identifier.
///
/// # Errors
///
/// Returns [`ReportError::InvalidInput`] when the id is blank or too long.
pub fn validate_cluster_id(
    cluster_id: &ClusterId,
    limits: &ValidationLimits,
) -> Result<(), ReportError> {
    let value = cluster_id.as_str();
    if value.trim().is_empty() {
        return Err(ReportError::invalid(InputField::ClusterId, "must not be empty"));
    }
    if value.len() > limits.max_cluster_id_bytes {
        return Err(ReportError::invalid(
            InputField::ClusterId,
            format!("exceeds {} bytes", limits.max_cluster_id_bytes),
        ));
    }
    if value.chars().any(char::is_control) {
        return Err(ReportError::invalid(
            InputField::ClusterId,
            "must not contain control characters",
        ));
    }
    Ok(())
}

/// Validates a create request.
///
/// # Errors
///
/// Returns [`ReportError::InvalidInput`] naming the first offending field,
/// checked in the order `clusterId`, `summary`, `data`.
pub fn validate_create(
    request: &CreateReport,
    limits: &ValidationLimits,
) -> Result<(), ReportError> {
    validate_cluster_id(&request.cluster_id, limits)?;
    if request.summary.trim().is_empty() {
        return Err(ReportError::invalid(InputField::Summary, "must not be empty"));
    }
    if request.summary.len() > limits.max_summary_bytes {
        return Err(ReportError::invalid(
            InputField::Summary,
            format!("exceeds {} bytes", limits.max_summary_bytes),
        ));
    }
    if request.data.is_empty() {
        return Err(ReportError::invalid(InputField::Data, "must not be empty"));
    }
    if request.data.len() > limits.max_data_bytes {
        return Err(ReportError::invalid(
            InputField::Data,
            format!("exceeds {} bytes", limits.max_data_bytes),
        ));
    }
    Ok(())
}

/// Converts a caller-supplied list limit into a store limit.
///
/// Absent or zero means "all reports".
///
/// # Errors
///
/// Returns [`ReportError::InvalidInput`] for negative limits.
pub fn validate_limit(last: Option<i64>) -> Result<Option<NonZeroUsize>, ReportError> {
    match last {
        None | Some(0) => Ok(None),
        Some(value) if value < 0 => {
            Err(ReportError::invalid(InputField::Limit, "must not be negative"))
        }
        Some(value) => {
            let value = usize::try_from(value).unwrap_or(usize::MAX);
            Ok(NonZeroUsize::new(value))
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        reason = "Test-only assertions use unwrap/expect and debug output."
    )]

    use super::InputField;
    use super::ValidationLimits;
    use super::validate_create;
    use super::validate_limit;
    use crate::model::ClusterId;
    use crate::model::CreateReport;
    use crate::model::ReportData;
    use crate::runtime::service::ReportError;

    fn request(cluster: &str, summary: &str, data: &str) -> CreateReport {
        CreateReport::new(ClusterId::new(cluster), summary, ReportData::new(data))
    }

    fn rejected_field(result: Result<(), ReportError>) -> InputField {
        match result {
            Err(ReportError::InvalidInput {
                field, ..
            }) => field,
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn accepts_well_formed_request() {
        let limits = ValidationLimits::default();
        validate_create(&request("cluster-a", "disk pressure", "aGk="), &limits).unwrap();
    }

    #[test]
    fn rejects_blank_fields() {
        let limits = ValidationLimits::default();
        let field = rejected_field(validate_create(&request("", "s", "aGk="), &limits));
        assert_eq!(field, InputField::ClusterId);
        let field = rejected_field(validate_create(&request("c", "   ", "aGk="), &limits));
        assert_eq!(field, InputField::Summary);
        let field = rejected_field(validate_create(&request("c", "s", ""), &limits));
        assert_eq!(field, InputField::Data);
    }

    #[test]
    fn data_is_not_checked_for_base64() {
        let limits = ValidationLimits::default();
        validate_create(&request("c", "s", "%%% not base64 %%%"), &limits).unwrap();
    }

    #[test]
    fn rejects_oversized_fields() {
        let limits = ValidationLimits {
            max_summary_bytes: 4,
            max_data_bytes: 4,
            max_cluster_id_bytes: 4,
        };
        let field = rejected_field(validate_create(&request("abcde", "s", "aGk="), &limits));
        assert_eq!(field, InputField::ClusterId);
        let field = rejected_field(validate_create(&request("c", "abcde", "aGk="), &limits));
        assert_eq!(field, InputField::Summary);
        let field = rejected_field(validate_create(&request("c", "s", "aGk=a"), &limits));
        assert_eq!(field, InputField::Data);
    }

    #[test]
    fn limit_zero_or_absent_means_all() {
        assert_eq!(validate_limit(None).unwrap(), None);
        assert_eq!(validate_limit(Some(0)).unwrap(), None);
        assert_eq!(validate_limit(Some(5)).unwrap().map(std::num::NonZeroUsize::get), Some(5));
    }

    #[test]
    fn negative_limit_is_invalid() {
        let err = validate_limit(Some(-1)).unwrap_err();
        assert!(matches!(
            err,
            ReportError::InvalidInput {
                field: InputField::Limit,
                ..
            }
        ));
    }
}
