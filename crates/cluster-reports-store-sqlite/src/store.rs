// crates/cluster-reports-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Report Store
// Description: Durable ReportStore backed by SQLite WAL.
// Purpose: Persist reports with ordered, integrity-checked rows.
// Dependencies: cluster-reports-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`ReportStore`] using `SQLite`. Inserts
//! run in a single transaction under the connection mutex, so id assignment,
//! the creation stamp, and the row write are atomic. Reads verify the stored
//! payload digest and fail closed on corruption.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use cluster_reports_core::Clock;
use cluster_reports_core::ClusterId;
use cluster_reports_core::CreateReport;
use cluster_reports_core::Report;
use cluster_reports_core::ReportData;
use cluster_reports_core::ReportId;
use cluster_reports_core::ReportIdGenerator;
use cluster_reports_core::ReportStore;
use cluster_reports_core::StoreError;
use cluster_reports_core::SystemClock;
use cluster_reports_core::Timestamp;
use cluster_reports_core::next_created_at;
use cluster_reports_core::sha256_hex;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Attempts to draw an unused report id before giving up.
const MAX_ID_ATTEMPTS: usize = 8;
/// Column list shared by every report query.
const REPORT_COLUMNS: &str = "report_id, cluster_id, summary, data, data_hash, created_at_ns";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` report store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Builds a config for `path` with default tuning.
    #[must_use]
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption or hash mismatch.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed report store with WAL support.
#[derive(Clone)]
pub struct SqliteReportStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
    /// Report id source.
    ids: Arc<ReportIdGenerator>,
    /// Creation time source.
    clock: Arc<dyn Clock + Send + Sync>,
}

impl SqliteReportStore {
    /// Opens an `SQLite`-backed report store using the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Opens an `SQLite`-backed report store with a custom clock.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn with_clock(
        config: SqliteStoreConfig,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
            ids: Arc::new(ReportIdGenerator::new()),
            clock,
        })
    }

    /// Returns the database path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.config.path
    }
}

impl fmt::Debug for SqliteReportStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteReportStore").field("config", &self.config).finish_non_exhaustive()
    }
}

impl ReportStore for SqliteReportStore {
    fn insert(&self, request: CreateReport) -> Result<Report, StoreError> {
        self.insert_report(request).map_err(StoreError::from)
    }

    fn get(
        &self,
        cluster_id: &ClusterId,
        report_id: &ReportId,
    ) -> Result<Option<Report>, StoreError> {
        self.load_report(cluster_id, report_id).map_err(StoreError::from)
    }

    fn list(
        &self,
        cluster_id: &ClusterId,
        last: Option<NonZeroUsize>,
    ) -> Result<Vec<Report>, StoreError> {
        self.list_reports(cluster_id, last).map_err(StoreError::from)
    }

    fn readiness(&self) -> Result<(), StoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        guard
            .query_row("SELECT 1", params![], |row| row.get::<_, i64>(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(())
    }
}

impl SqliteReportStore {
    /// Inserts a report in one transaction.
    fn insert_report(&self, request: CreateReport) -> Result<Report, SqliteStoreError> {
        let data_hash = sha256_hex(request.data.as_str().as_bytes());
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let report_id = next_unused_id(&tx, &self.ids)?;
        let latest_ns: Option<i64> = tx
            .query_row(
                "SELECT created_at_ns FROM reports WHERE cluster_id = ?1 ORDER BY seq DESC \
                 LIMIT 1",
                params![request.cluster_id.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let latest = latest_ns.map(|value| timestamp_from_ns(i128::from(value))).transpose()?;
        let created_at = next_created_at(self.clock.now(), latest);
        let created_at_ns = i64::try_from(created_at.unix_nanos()).map_err(|_| {
            SqliteStoreError::Invalid("created_at outside storable range".to_string())
        })?;
        tx.execute(
            "INSERT INTO reports (report_id, cluster_id, summary, data, data_hash, \
             created_at_ns) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                report_id.as_str(),
                request.cluster_id.as_str(),
                request.summary,
                request.data.as_str(),
                data_hash,
                created_at_ns
            ],
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(Report {
            report_id,
            cluster_id: request.cluster_id,
            summary: request.summary,
            data: request.data,
            created_at,
        })
    }

    /// Loads one report scoped to a cluster.
    fn load_report(
        &self,
        cluster_id: &ClusterId,
        report_id: &ReportId,
    ) -> Result<Option<Report>, SqliteStoreError> {
        let row = {
            let guard = self
                .connection
                .lock()
                .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
            let row = guard
                .query_row(
                    &format!(
                        "SELECT {REPORT_COLUMNS} FROM reports WHERE report_id = ?1 AND cluster_id \
                         = ?2"
                    ),
                    params![report_id.as_str(), cluster_id.as_str()],
                    map_report_row,
                )
                .optional()
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            drop(guard);
            row
        };
        row.map(ReportRow::into_report).transpose()
    }

    /// Lists a cluster's reports in ascending insertion order.
    fn list_reports(
        &self,
        cluster_id: &ClusterId,
        last: Option<NonZeroUsize>,
    ) -> Result<Vec<Report>, SqliteStoreError> {
        let mut rows = {
            let guard = self
                .connection
                .lock()
                .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
            let rows = match last {
                Some(last) => {
                    let limit = i64::try_from(last.get()).unwrap_or(i64::MAX);
                    query_rows(
                        &guard,
                        &format!(
                            "SELECT {REPORT_COLUMNS} FROM reports WHERE cluster_id = ?1 ORDER BY \
                             seq DESC LIMIT ?2"
                        ),
                        params![cluster_id.as_str(), limit],
                    )?
                }
                None => query_rows(
                    &guard,
                    &format!(
                        "SELECT {REPORT_COLUMNS} FROM reports WHERE cluster_id = ?1 ORDER BY seq \
                         ASC"
                    ),
                    params![cluster_id.as_str()],
                )?,
            };
            drop(guard);
            rows
        };
        if last.is_some() {
            rows.reverse();
        }
        rows.into_iter().map(ReportRow::into_report).collect()
    }
}

// ============================================================================
// SECTION: Rows
// ============================================================================

/// Raw report row as stored.
struct ReportRow {
    /// Report identifier column.
    report_id: String,
    /// Cluster identifier column.
    cluster_id: String,
    /// Summary column.
    summary: String,
    /// Encoded payload column.
    data: String,
    /// Payload digest column.
    data_hash: String,
    /// Creation time in unix nanoseconds.
    created_at_ns: i64,
}

impl ReportRow {
    /// Verifies the payload digest and converts the row into a report.
    fn into_report(self) -> Result<Report, SqliteStoreError> {
        if sha256_hex(self.data.as_bytes()) != self.data_hash {
            return Err(SqliteStoreError::Corrupt(format!(
                "payload hash mismatch for report {}",
                self.report_id
            )));
        }
        Ok(Report {
            report_id: ReportId::new(self.report_id),
            cluster_id: ClusterId::new(self.cluster_id),
            summary: self.summary,
            data: ReportData::new(self.data),
            created_at: timestamp_from_ns(i128::from(self.created_at_ns))?,
        })
    }
}

/// Maps a result row selected with [`REPORT_COLUMNS`].
fn map_report_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReportRow> {
    Ok(ReportRow {
        report_id: row.get(0)?,
        cluster_id: row.get(1)?,
        summary: row.get(2)?,
        data: row.get(3)?,
        data_hash: row.get(4)?,
        created_at_ns: row.get(5)?,
    })
}

/// Runs a report query and collects its rows.
fn query_rows(
    connection: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<ReportRow>, SqliteStoreError> {
    let mut statement =
        connection.prepare(sql).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let rows = statement
        .query_map(params, map_report_row)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(|err| SqliteStoreError::Db(err.to_string()))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Draws report ids until one is not already present in the table.
fn next_unused_id(
    tx: &Transaction<'_>,
    ids: &ReportIdGenerator,
) -> Result<ReportId, SqliteStoreError> {
    for _ in 0 .. MAX_ID_ATTEMPTS {
        let candidate = ids.issue();
        let exists: Option<i64> = tx
            .query_row(
                "SELECT 1 FROM reports WHERE report_id = ?1",
                params![candidate.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        if exists.is_none() {
            return Ok(candidate);
        }
    }
    Err(SqliteStoreError::Db("report id space exhausted".to_string()))
}

/// Converts stored nanoseconds into a timestamp.
fn timestamp_from_ns(value: i128) -> Result<Timestamp, SqliteStoreError> {
    Timestamp::from_unix_nanos(value).map_err(|err| SqliteStoreError::Corrupt(err.to_string()))
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS reports (
                    seq INTEGER PRIMARY KEY AUTOINCREMENT,
                    report_id TEXT NOT NULL UNIQUE,
                    cluster_id TEXT NOT NULL,
                    summary TEXT NOT NULL,
                    data TEXT NOT NULL,
                    data_hash TEXT NOT NULL,
                    created_at_ns INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_reports_cluster_seq
                    ON reports (cluster_id, seq);",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}
