// crates/cluster-reports-core/src/runtime/service.rs
// ============================================================================
// Module: Report Service
// Description: Create, get, and list operations over a report store.
// Purpose: Orchestrate validation and storage with a stable error taxonomy.
// Dependencies: crate::{interfaces, model, runtime}, thiserror
// ============================================================================

//! ## Overview
//! [`ReportService`] holds no state of its own beyond the injected store and
//! limits. Each operation touches at most one record and one cluster.
//! Failures are surfaced as [`ReportError`]; nothing is retried here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::interfaces::ReportStore;
use crate::interfaces::StoreError;
use crate::model::ClusterId;
use crate::model::CreateReport;
use crate::model::Report;
use crate::model::ReportId;
use crate::runtime::store::SharedReportStore;
use crate::runtime::validation::InputField;
use crate::runtime::validation::ValidationLimits;
use crate::runtime::validation::validate_create;
use crate::runtime::validation::validate_limit;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Report operation errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Caller input failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        /// Offending field.
        field: InputField,
        /// Short human-readable reason.
        reason: String,
    },
    /// No report matches the requested cluster and id.
    #[error("report not found")]
    NotFound,
    /// The store could not complete the operation.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ReportError {
    /// Builds an input validation error.
    #[must_use]
    pub fn invalid(field: InputField, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Report operations bound to a store.
#[derive(Debug, Clone)]
pub struct ReportService {
    /// Backing store.
    store: SharedReportStore,
    /// Create request limits.
    limits: ValidationLimits,
}

impl ReportService {
    /// Creates a service over `store` with the given limits.
    #[must_use]
    pub const fn new(store: SharedReportStore, limits: ValidationLimits) -> Self {
        Self {
            store,
            limits,
        }
    }

    /// Returns the active validation limits.
    #[must_use]
    pub const fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Returns the backing store.
    #[must_use]
    pub const fn store(&self) -> &SharedReportStore {
        &self.store
    }

    /// Validates and stores a new report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidInput`] or [`ReportError::Storage`].
    pub fn create_report(&self, request: CreateReport) -> Result<Report, ReportError> {
        validate_create(&request, &self.limits)?;
        Ok(self.store.insert(request)?)
    }

    /// Loads one report from a cluster.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NotFound`] when the id is unknown or belongs to
    /// another cluster, or [`ReportError::Storage`].
    pub fn get_report(
        &self,
        cluster_id: &ClusterId,
        report_id: &ReportId,
    ) -> Result<Report, ReportError> {
        self.store.get(cluster_id, report_id)?.ok_or(ReportError::NotFound)
    }

    /// Lists a cluster's reports in ascending creation order, optionally
    /// limited to the most recent `last` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidInput`] for negative limits or
    /// [`ReportError::Storage`].
    pub fn list_reports(
        &self,
        cluster_id: &ClusterId,
        last: Option<i64>,
    ) -> Result<Vec<Report>, ReportError> {
        let last = validate_limit(last)?;
        Ok(self.store.list(cluster_id, last)?)
    }

    /// Checks that the backing store is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Storage`] when the store is unavailable.
    pub fn readiness(&self) -> Result<(), ReportError> {
        Ok(self.store.readiness()?)
    }
}
