// crates/cluster-reports-server/src/telemetry.rs
// ============================================================================
// Module: Report API Telemetry
// Description: Metric hooks for report request counters and latencies.
// Purpose: Let deployments plug in an exporter without touching handlers.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A thin metrics interface for request counters and latency histograms.
//! No exporter is bundled; [`NoopMetrics`] is the default. Labels carry
//! operation and outcome only, never report content or credentials.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Latency histogram buckets in milliseconds.
pub const REPORT_LATENCY_BUCKETS_MS: &[u64] =
    &[1, 2, 5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000, 30_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Report API operation classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOperation {
    /// `POST /clusters/{clusterId}/reports`.
    CreateReport,
    /// `GET /clusters/{clusterId}/reports/{reportId}`.
    GetReport,
    /// `GET /clusters/{clusterId}/reports`.
    ListReports,
    /// Health probes and unmatched routes.
    Other,
}

impl ReportOperation {
    /// Returns a stable label for the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateReport => "create_report",
            Self::GetReport => "get_report",
            Self::ListReports => "list_reports",
            Self::Other => "other",
        }
    }
}

/// Request outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    /// 2xx response.
    Ok,
    /// Any other response.
    Error,
}

impl ReportOutcome {
    /// Classifies an HTTP status code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        if matches!(status, 200 ..= 299) { Self::Ok } else { Self::Error }
    }

    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

/// Metric event for a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMetricEvent {
    /// Operation served.
    pub operation: ReportOperation,
    /// Outcome of the request.
    pub outcome: ReportOutcome,
    /// HTTP status code.
    pub status: u16,
    /// Stable error code for failed requests.
    pub error_code: Option<&'static str>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for report requests.
pub trait ReportMetrics: Send + Sync {
    /// Records a request counter event.
    fn record_request(&self, event: &ReportMetricEvent);
    /// Records the request latency.
    fn record_latency(&self, event: &ReportMetricEvent, latency: Duration);
}

/// Metrics sink that discards everything.
pub struct NoopMetrics;

impl ReportMetrics for NoopMetrics {
    fn record_request(&self, _event: &ReportMetricEvent) {}

    fn record_latency(&self, _event: &ReportMetricEvent, _latency: Duration) {}
}

/// Returns the index of the histogram bucket for `latency`.
///
/// Latencies above the last bucket map to `REPORT_LATENCY_BUCKETS_MS.len()`.
#[must_use]
pub fn latency_bucket(latency: Duration) -> usize {
    let millis = latency.as_millis();
    REPORT_LATENCY_BUCKETS_MS
        .iter()
        .position(|bound| millis <= u128::from(*bound))
        .unwrap_or(REPORT_LATENCY_BUCKETS_MS.len())
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

    use std::time::Duration;

    use super::REPORT_LATENCY_BUCKETS_MS;
    use super::ReportOutcome;
    use super::latency_bucket;

    #[test]
    fn outcome_follows_status_class() {
        assert_eq!(ReportOutcome::from_status(200), ReportOutcome::Ok);
        assert_eq!(ReportOutcome::from_status(201), ReportOutcome::Ok);
        assert_eq!(ReportOutcome::from_status(400), ReportOutcome::Error);
        assert_eq!(ReportOutcome::from_status(500), ReportOutcome::Error);
    }

    #[test]
    fn latency_buckets_are_inclusive_upper_bounds() {
        assert_eq!(latency_bucket(Duration::ZERO), 0);
        assert_eq!(latency_bucket(Duration::from_millis(2)), 1);
        assert_eq!(latency_bucket(Duration::from_millis(3)), 2);
        assert_eq!(latency_bucket(Duration::from_secs(60)), REPORT_LATENCY_BUCKETS_MS.len());
    }
}
