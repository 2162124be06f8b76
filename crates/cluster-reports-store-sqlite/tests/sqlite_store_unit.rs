// crates/cluster-reports-store-sqlite/tests/sqlite_store_unit.rs
// ============================================================================
// Module: SQLite Report Store Unit Tests
// Description: Contract and integrity tests for the SQLite report store.
// Purpose: Validate path safety, schema versioning, ordering, durability,
//          and corruption detection.
// ============================================================================

//! ## Overview
//! Unit-level tests for `SQLite` report store invariants:
//! - Path safety checks (empty/component/directory rejection)
//! - Schema version validation
//! - Cluster isolation, ordering, and "last N" selection
//! - Durability across reopen and payload tamper detection
//! - Concurrency safety (multi-threaded inserts)

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::thread;

use cluster_reports_core::Clock;
use cluster_reports_core::ClusterId;
use cluster_reports_core::CreateReport;
use cluster_reports_core::ReportData;
use cluster_reports_core::ReportId;
use cluster_reports_core::ReportStore;
use cluster_reports_core::StoreError;
use cluster_reports_core::Timestamp;
use cluster_reports_store_sqlite::SqliteReportStore;
use cluster_reports_store_sqlite::SqliteStoreConfig;
use cluster_reports_store_sqlite::SqliteStoreError;
use cluster_reports_store_sqlite::SqliteStoreMode;
use cluster_reports_store_sqlite::SqliteSyncMode;
use rusqlite::Connection;
use rusqlite::params;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Clock whose reading is set explicitly in seconds.
struct ManualClock {
    /// Current reading in unix seconds.
    seconds: AtomicI64,
}

impl ManualClock {
    fn new(seconds: i64) -> Self {
        Self {
            seconds: AtomicI64::new(seconds),
        }
    }

    fn set(&self, seconds: i64) {
        self.seconds.store(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let seconds = i128::from(self.seconds.load(Ordering::SeqCst));
        Timestamp::from_unix_nanos(seconds * 1_000_000_000).unwrap()
    }
}

fn config_for(path: PathBuf) -> SqliteStoreConfig {
    SqliteStoreConfig {
        path,
        busy_timeout_ms: 1_000,
        journal_mode: SqliteStoreMode::Wal,
        sync_mode: SqliteSyncMode::Normal,
    }
}

fn open(temp: &TempDir) -> SqliteReportStore {
    SqliteReportStore::new(config_for(temp.path().join("reports.db"))).unwrap()
}

fn create(cluster: &str, summary: &str) -> CreateReport {
    CreateReport::new(ClusterId::new(cluster), summary, ReportData::encode(summary))
}

// ============================================================================
// SECTION: Path Safety
// ============================================================================

#[test]
fn rejects_directory_path() {
    let temp = TempDir::new().unwrap();
    let err = SqliteReportStore::new(config_for(temp.path().to_path_buf())).unwrap_err();
    assert!(matches!(err, SqliteStoreError::Invalid(_)));
}

#[test]
fn rejects_overlong_component() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a".repeat(300));
    let err = SqliteReportStore::new(config_for(path)).unwrap_err();
    assert!(matches!(err, SqliteStoreError::Invalid(_)));
}

#[test]
fn creates_missing_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("dir").join("reports.db");
    let store = SqliteReportStore::new(config_for(path.clone())).unwrap();
    assert_eq!(store.path(), path.as_path());
    assert!(path.exists());
}

// ============================================================================
// SECTION: Schema
// ============================================================================

#[test]
fn rejects_unknown_schema_version() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("reports.db");
    {
        let connection = Connection::open(&path).unwrap();
        connection
            .execute_batch(
                "CREATE TABLE store_meta (version INTEGER NOT NULL); INSERT INTO store_meta \
                 (version) VALUES (99);",
            )
            .unwrap();
    }
    let err = SqliteReportStore::new(config_for(path)).unwrap_err();
    assert!(matches!(err, SqliteStoreError::VersionMismatch(_)));
}

// ============================================================================
// SECTION: Contract
// ============================================================================

#[test]
fn insert_then_get_round_trips() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp);
    let created = store.insert(create("cluster-a", "first")).unwrap();
    let loaded = store.get(&created.cluster_id, &created.report_id).unwrap();
    assert_eq!(loaded, Some(created));
}

#[test]
fn get_is_scoped_to_cluster() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp);
    let created = store.insert(create("cluster-a", "first")).unwrap();
    assert_eq!(store.get(&ClusterId::new("cluster-b"), &created.report_id).unwrap(), None);
    assert_eq!(store.get(&ClusterId::new("cluster-a"), &ReportId::new("rpt-nope")).unwrap(), None);
}

#[test]
fn list_orders_ascending_and_limits_to_latest() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp);
    let ids: Vec<_> = (0 .. 6)
        .map(|idx| store.insert(create("cluster-a", &format!("r{idx}"))).unwrap().report_id)
        .collect();
    store.insert(create("cluster-b", "other")).unwrap();

    let all: Vec<_> = store
        .list(&ClusterId::new("cluster-a"), None)
        .unwrap()
        .into_iter()
        .map(|report| report.report_id)
        .collect();
    assert_eq!(all, ids);

    let last: Vec<_> = store
        .list(&ClusterId::new("cluster-a"), NonZeroUsize::new(3))
        .unwrap()
        .into_iter()
        .map(|report| report.report_id)
        .collect();
    assert_eq!(last, ids[3 ..].to_vec());

    assert!(store.list(&ClusterId::new("cluster-z"), None).unwrap().is_empty());
}

#[test]
fn created_at_is_clamped_when_clock_steps_back() {
    let temp = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new(1_000));
    let store =
        SqliteReportStore::with_clock(config_for(temp.path().join("reports.db")), clock.clone())
            .unwrap();
    let first = store.insert(create("cluster-a", "first")).unwrap();
    clock.set(10);
    let second = store.insert(create("cluster-a", "second")).unwrap();
    assert_eq!(second.created_at, first.created_at);
    let loaded = store.list(&ClusterId::new("cluster-a"), None).unwrap();
    assert_eq!(loaded[1].created_at, first.created_at);
}

// ============================================================================
// SECTION: Durability and Integrity
// ============================================================================

#[test]
fn reports_survive_reopen() {
    let temp = TempDir::new().unwrap();
    let created = {
        let store = open(&temp);
        store.insert(create("cluster-a", "persisted")).unwrap()
    };
    let store = open(&temp);
    let loaded = store.get(&created.cluster_id, &created.report_id).unwrap().unwrap();
    assert_eq!(loaded.summary, "persisted");
    assert_eq!(loaded.data.decode().unwrap(), b"persisted");
    let next = store.insert(create("cluster-a", "after reopen")).unwrap();
    assert_ne!(next.report_id, created.report_id);
}

#[test]
fn tampered_payload_fails_closed() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("reports.db");
    let store = SqliteReportStore::new(config_for(path.clone())).unwrap();
    let created = store.insert(create("cluster-a", "original")).unwrap();
    {
        let connection = Connection::open(&path).unwrap();
        connection
            .execute(
                "UPDATE reports SET data = ?1 WHERE report_id = ?2",
                params!["dGFtcGVyZWQ=", created.report_id.as_str()],
            )
            .unwrap();
    }
    let err = store.get(&created.cluster_id, &created.report_id).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
    let err = store.list(&created.cluster_id, None).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
}

#[test]
fn readiness_succeeds_on_open_store() {
    let temp = TempDir::new().unwrap();
    open(&temp).readiness().unwrap();
}

// ============================================================================
// SECTION: Concurrency
// ============================================================================

#[test]
fn concurrent_inserts_are_serialized() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp);
    let handles: Vec<_> = (0 .. 4)
        .map(|worker| {
            let store = store.clone();
            thread::spawn(move || {
                for idx in 0 .. 10 {
                    store.insert(create("cluster-a", &format!("w{worker}-{idx}"))).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    let reports = store.list(&ClusterId::new("cluster-a"), None).unwrap();
    assert_eq!(reports.len(), 40);
    let ids: BTreeSet<_> = reports.iter().map(|report| report.report_id.clone()).collect();
    assert_eq!(ids.len(), 40);
    assert!(reports.windows(2).all(|pair| pair[0].created_at <= pair[1].created_at));
}
