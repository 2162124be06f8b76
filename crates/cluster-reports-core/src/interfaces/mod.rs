// crates/cluster-reports-core/src/interfaces/mod.rs
// ============================================================================
// Module: Cluster Reports Interfaces
// Description: Backend-agnostic store and clock contracts.
// Purpose: Define the seams used by the report service.
// Dependencies: crate::model
// ============================================================================

//! ## Overview
//! The report service depends only on the traits defined here. Stores own
//! identity generation and timestamping; clocks supply the current time so
//! tests can control it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::num::NonZeroUsize;

use thiserror::Error;

use crate::model::ClusterId;
use crate::model::CreateReport;
use crate::model::Report;
use crate::model::ReportId;
use crate::model::Timestamp;

// ============================================================================
// SECTION: Report Store
// ============================================================================

/// Report store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("report store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("report store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("report store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("report store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("report store error: {0}")]
    Store(String),
}

/// Keyed report storage partitioned by cluster.
///
/// # Invariants
/// - `insert` assigns a fresh, never-reused report id and a creation time no
///   earlier than the cluster's latest report.
/// - A record is visible to `get`/`list` only once fully written.
pub trait ReportStore {
    /// Persists a new report and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be written.
    fn insert(&self, request: CreateReport) -> Result<Report, StoreError>;

    /// Loads a report by id, scoped to exactly one cluster.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn get(&self, cluster_id: &ClusterId, report_id: &ReportId)
    -> Result<Option<Report>, StoreError>;

    /// Lists a cluster's reports in ascending creation order.
    ///
    /// When `last` is set, only the most recent `last` reports are returned,
    /// still in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn list(
        &self,
        cluster_id: &ClusterId,
        last: Option<NonZeroUsize>,
    ) -> Result<Vec<Report>, StoreError>;

    /// Checks that the store is usable. Stores without a backing resource
    /// report healthy.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing resource is unavailable.
    fn readiness(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Source of the current time for creation stamps.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Timestamp;
}
