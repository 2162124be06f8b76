// crates/cluster-reports-server/src/audit.rs
// ============================================================================
// Module: Report API Audit Logging
// Description: Structured audit events for report requests and auth decisions.
// Purpose: Emit redacted JSON-line logs without a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Each HTTP request produces one `report_request` event, and each auth
//! decision one `report_authn` event. Events never carry report payloads,
//! summaries, or bearer tokens; tokens appear only as sha256 fingerprints.
//! Sinks write one JSON object per line.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use cluster_reports_core::Timestamp;
use serde::Serialize;

use crate::telemetry::REPORT_LATENCY_BUCKETS_MS;
use crate::telemetry::ReportOperation;
use crate::telemetry::ReportOutcome;
use crate::telemetry::latency_bucket;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Audit event for one HTTP request.
#[derive(Debug, Clone, Serialize)]
pub struct ReportAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: i128,
    /// Server-issued request id.
    pub request_id: String,
    /// Sanitized client correlation id.
    pub client_correlation_id: Option<String>,
    /// Peer IP address.
    pub peer_ip: Option<String>,
    /// Operation served.
    pub operation: ReportOperation,
    /// Cluster named in the path.
    pub cluster_id: Option<String>,
    /// HTTP status code.
    pub status: u16,
    /// Request outcome.
    pub outcome: ReportOutcome,
    /// Stable error code for failed requests.
    pub error_code: Option<&'static str>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
    /// Handling time in milliseconds.
    pub latency_ms: u128,
    /// Upper bound of the latency histogram bucket; `None` past the last bucket.
    pub latency_bucket_ms: Option<u64>,
    /// Sha256 fingerprint of the caller's bearer token.
    pub token_fingerprint: Option<String>,
}

/// Inputs required to construct a [`ReportAuditEvent`].
pub struct ReportAuditEventParams {
    /// Server-issued request id.
    pub request_id: String,
    /// Sanitized client correlation id.
    pub client_correlation_id: Option<String>,
    /// Peer IP address.
    pub peer_ip: Option<String>,
    /// Operation served.
    pub operation: ReportOperation,
    /// Cluster named in the path.
    pub cluster_id: Option<String>,
    /// HTTP status code.
    pub status: u16,
    /// Stable error code for failed requests.
    pub error_code: Option<&'static str>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
    /// Time spent handling the request.
    pub latency: Duration,
    /// Sha256 fingerprint of the caller's bearer token.
    pub token_fingerprint: Option<String>,
}

impl ReportAuditEvent {
    /// Creates a request event stamped with the current time.
    #[must_use]
    pub fn new(params: ReportAuditEventParams) -> Self {
        Self {
            event: "report_request",
            timestamp_ms: now_millis(),
            request_id: params.request_id,
            client_correlation_id: params.client_correlation_id,
            peer_ip: params.peer_ip,
            operation: params.operation,
            cluster_id: params.cluster_id,
            status: params.status,
            outcome: ReportOutcome::from_status(params.status),
            error_code: params.error_code,
            request_bytes: params.request_bytes,
            response_bytes: params.response_bytes,
            latency_ms: params.latency.as_millis(),
            latency_bucket_ms: REPORT_LATENCY_BUCKETS_MS
                .get(latency_bucket(params.latency))
                .copied(),
            token_fingerprint: params.token_fingerprint,
        }
    }
}

/// Audit event for one authentication decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: i128,
    /// Decision label (`allow` or `deny`).
    pub decision: &'static str,
    /// Server-issued request id.
    pub request_id: String,
    /// Peer IP address.
    pub peer_ip: Option<String>,
    /// Active auth mode label.
    pub auth_mode: &'static str,
    /// Sha256 fingerprint of the accepted token.
    pub token_fingerprint: Option<String>,
    /// Denial reason.
    pub reason: Option<String>,
}

impl AuthAuditEvent {
    /// Builds an allow event.
    #[must_use]
    pub fn allowed(
        request_id: &str,
        peer_ip: Option<String>,
        auth_mode: &'static str,
        token_fingerprint: &str,
    ) -> Self {
        Self {
            event: "report_authn",
            timestamp_ms: now_millis(),
            decision: "allow",
            request_id: request_id.to_string(),
            peer_ip,
            auth_mode,
            token_fingerprint: Some(token_fingerprint.to_string()),
            reason: None,
        }
    }

    /// Builds a deny event.
    #[must_use]
    pub fn denied(
        request_id: &str,
        peer_ip: Option<String>,
        auth_mode: &'static str,
        reason: &str,
    ) -> Self {
        Self {
            event: "report_authn",
            timestamp_ms: now_millis(),
            decision: "deny",
            request_id: request_id.to_string(),
            peer_ip,
            auth_mode,
            token_fingerprint: None,
            reason: Some(reason.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for report API events.
pub trait AuditSink: Send + Sync {
    /// Records a request event.
    fn record(&self, event: &ReportAuditEvent);

    /// Records an auth decision.
    fn record_authn(&self, _event: &AuthAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &ReportAuditEvent) {
        write_stderr_line(event);
    }

    fn record_authn(&self, event: &AuthAuditEvent) {
        write_stderr_line(event);
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens the audit log in append mode, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Serializes `event` and appends it as one line.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &ReportAuditEvent) {
        self.append(event);
    }

    fn record_authn(&self, event: &AuthAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &ReportAuditEvent) {}
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Writes one serialized event to stderr.
fn write_stderr_line<T: Serialize>(event: &T) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(io::stderr(), "{payload}");
    }
}

/// Milliseconds since the unix epoch.
fn now_millis() -> i128 {
    Timestamp::now_utc().unix_millis()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
