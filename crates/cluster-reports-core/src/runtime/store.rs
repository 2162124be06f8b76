// crates/cluster-reports-core/src/runtime/store.rs
// ============================================================================
// Module: In-Memory Report Store
// Description: Mutex-guarded in-memory report store and shared store wrapper.
// Purpose: Provide a dependency-free store for tests and ephemeral servers.
// Dependencies: crate::{interfaces, model, runtime}
// ============================================================================

//! ## Overview
//! [`InMemoryReportStore`] keeps each cluster's reports in insertion order
//! plus a global id index. Id assignment, timestamping, and publication all
//! happen under one mutex, so insertion order equals creation-time order and
//! readers never observe a partial record. Contents are lost on restart.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::Mutex;

use crate::interfaces::Clock;
use crate::interfaces::ReportStore;
use crate::interfaces::StoreError;
use crate::model::ClusterId;
use crate::model::CreateReport;
use crate::model::Report;
use crate::model::ReportId;
use crate::model::Timestamp;
use crate::runtime::clock::SystemClock;
use crate::runtime::ids::ReportIdGenerator;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Attempts to draw an unused report id before giving up.
const MAX_ID_ATTEMPTS: usize = 8;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the creation stamp for a new report: the clock reading, clamped
/// to be no earlier than the cluster's latest report.
#[must_use]
pub fn next_created_at(now: Timestamp, latest: Option<Timestamp>) -> Timestamp {
    match latest {
        Some(latest) if latest > now => latest,
        _ => now,
    }
}

/// Returns the tail of `reports` selected by an optional "most recent N" limit.
fn tail(reports: &[Report], last: Option<NonZeroUsize>) -> &[Report] {
    match last {
        Some(last) => &reports[reports.len().saturating_sub(last.get()) ..],
        None => reports,
    }
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Mutable store contents guarded by a single mutex.
#[derive(Debug, Default)]
struct MemoryState {
    /// Reports per cluster in insertion order.
    clusters: BTreeMap<ClusterId, Vec<Report>>,
    /// Report id to owning cluster and position within its list.
    index: HashMap<ReportId, (ClusterId, usize)>,
}

/// In-memory report store.
#[derive(Clone)]
pub struct InMemoryReportStore {
    /// Store contents protected by a mutex.
    state: Arc<Mutex<MemoryState>>,
    /// Report id source.
    ids: Arc<ReportIdGenerator>,
    /// Creation time source.
    clock: Arc<dyn Clock + Send + Sync>,
}

impl InMemoryReportStore {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(ReportIdGenerator::new(), Arc::new(SystemClock))
    }

    /// Creates an empty store with a custom clock.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self::with_parts(ReportIdGenerator::new(), clock)
    }

    /// Creates an empty store with an explicit id generator and clock.
    #[must_use]
    pub fn with_parts(ids: ReportIdGenerator, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            ids: Arc::new(ids),
            clock,
        }
    }
}

impl Default for InMemoryReportStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InMemoryReportStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryReportStore").field("ids", &self.ids).finish_non_exhaustive()
    }
}

impl ReportStore for InMemoryReportStore {
    fn insert(&self, request: CreateReport) -> Result<Report, StoreError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Store("report store mutex poisoned".to_string()))?;
        let report_id = (0 .. MAX_ID_ATTEMPTS)
            .map(|_| self.ids.issue())
            .find(|candidate| !guard.index.contains_key(candidate))
            .ok_or_else(|| StoreError::Store("report id space exhausted".to_string()))?;
        let latest = guard
            .clusters
            .get(&request.cluster_id)
            .and_then(|reports| reports.last())
            .map(|report| report.created_at);
        let report = Report {
            report_id: report_id.clone(),
            cluster_id: request.cluster_id.clone(),
            summary: request.summary,
            data: request.data,
            created_at: next_created_at(self.clock.now(), latest),
        };
        let reports = guard.clusters.entry(request.cluster_id.clone()).or_default();
        let position = reports.len();
        reports.push(report.clone());
        guard.index.insert(report_id, (request.cluster_id, position));
        drop(guard);
        Ok(report)
    }

    fn get(
        &self,
        cluster_id: &ClusterId,
        report_id: &ReportId,
    ) -> Result<Option<Report>, StoreError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Store("report store mutex poisoned".to_string()))?;
        let Some((owner, position)) = guard.index.get(report_id) else {
            return Ok(None);
        };
        if owner != cluster_id {
            return Ok(None);
        }
        Ok(guard.clusters.get(cluster_id).and_then(|reports| reports.get(*position)).cloned())
    }

    fn list(
        &self,
        cluster_id: &ClusterId,
        last: Option<NonZeroUsize>,
    ) -> Result<Vec<Report>, StoreError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Store("report store mutex poisoned".to_string()))?;
        Ok(guard
            .clusters
            .get(cluster_id)
            .map(|reports| tail(reports, last).to_vec())
            .unwrap_or_default())
    }

    fn readiness(&self) -> Result<(), StoreError> {
        self.state
            .lock()
            .map(|_| ())
            .map_err(|_| StoreError::Store("report store mutex poisoned".to_string()))
    }
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared report store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedReportStore {
    /// Inner store implementation.
    inner: Arc<dyn ReportStore + Send + Sync>,
}

impl SharedReportStore {
    /// Wraps a report store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl ReportStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn ReportStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl fmt::Debug for SharedReportStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedReportStore").finish_non_exhaustive()
    }
}

impl ReportStore for SharedReportStore {
    fn insert(&self, request: CreateReport) -> Result<Report, StoreError> {
        self.inner.insert(request)
    }

    fn get(
        &self,
        cluster_id: &ClusterId,
        report_id: &ReportId,
    ) -> Result<Option<Report>, StoreError> {
        self.inner.get(cluster_id, report_id)
    }

    fn list(
        &self,
        cluster_id: &ClusterId,
        last: Option<NonZeroUsize>,
    ) -> Result<Vec<Report>, StoreError> {
        self.inner.list(cluster_id, last)
    }

    fn readiness(&self) -> Result<(), StoreError> {
        self.inner.readiness()
    }
}
