// crates/cluster-reports-server/src/server.rs
// ============================================================================
// Module: Report HTTP Server
// Description: axum transport for the cluster report API.
// Purpose: Authenticate, route, and map report outcomes to HTTP statuses.
// Dependencies: axum, tokio, cluster-reports-{core, config, store-sqlite}
// ============================================================================

//! ## Overview
//! Each request moves through `authenticate -> validate -> execute ->
//! respond` and jumps straight to the response on the first failure. Store
//! calls run on the blocking pool so a slow `SQLite` write never stalls other
//! requests. Every response carries an `x-request-id` header and a JSON body;
//! failures use [`ApiErrorBody`] with a stable code and never expose store
//! internals.
//!
//! Routes:
//! - `POST /clusters/{clusterId}/reports` creates a report (`201`).
//! - `GET /clusters/{clusterId}/reports/{reportId}` fetches one (`200`).
//! - `GET /clusters/{clusterId}/reports?last=N` lists them (`200`).
//! - `GET /healthz` answers without authentication.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::net::IpAddr;
use std::net::SocketAddr;
use std::path::Path as FsPath;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::body::Body;
use axum::body::Bytes;
use axum::body::to_bytes;
use axum::extract::ConnectInfo;
use axum::extract::DefaultBodyLimit;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::extract::rejection::PathRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_LENGTH;
use axum::http::header::CONTENT_TYPE;
use axum::http::header::WWW_AUTHENTICATE;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use cluster_reports_config::ClusterReportsConfig;
use cluster_reports_config::ServerAuditConfig;
use cluster_reports_config::StoreConfig;
use cluster_reports_config::StoreType;
use cluster_reports_core::ApiErrorBody;
use cluster_reports_core::ClusterId;
use cluster_reports_core::CreateReport;
use cluster_reports_core::CreateReportBody;
use cluster_reports_core::ErrorCode;
use cluster_reports_core::HealthStatus;
use cluster_reports_core::InMemoryReportStore;
use cluster_reports_core::InputField;
use cluster_reports_core::ReportError;
use cluster_reports_core::ReportId;
use cluster_reports_core::ReportList;
use cluster_reports_core::ReportService;
use cluster_reports_core::SharedReportStore;
use cluster_reports_store_sqlite::SqliteReportStore;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::audit::AuditSink;
use crate::audit::AuthAuditEvent;
use crate::audit::FileAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::ReportAuditEvent;
use crate::audit::ReportAuditEventParams;
use crate::audit::StderrAuditSink;
use crate::auth::ReportAuthenticator;
use crate::auth::auth_mode_label;
use crate::correlation::CLIENT_CORRELATION_HEADER;
use crate::correlation::REQUEST_ID_HEADER;
use crate::correlation::RequestIdGenerator;
use crate::correlation::sanitize_client_correlation_id;
use crate::telemetry::NoopMetrics;
use crate::telemetry::ReportMetricEvent;
use crate::telemetry::ReportMetrics;
use crate::telemetry::ReportOperation;
use crate::telemetry::ReportOutcome;

// ============================================================================
// SECTION: Server
// ============================================================================

/// Report API server assembled from configuration.
pub struct ReportServer {
    /// Socket address to bind.
    bind: SocketAddr,
    /// Report operations.
    service: ReportService,
    /// Bearer authenticator.
    authenticator: ReportAuthenticator,
    /// Audit sink.
    audit: Arc<dyn AuditSink>,
    /// Metrics sink.
    metrics: Arc<dyn ReportMetrics>,
    /// Maximum request body size in bytes.
    max_body_bytes: usize,
}

impl ReportServer {
    /// Builds a server from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] when configuration is invalid and
    /// [`ServerError::Init`] when the store or audit log cannot be opened.
    pub fn from_config(config: ClusterReportsConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let bind = config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let store = build_report_store(&config.store)?;
        let audit = build_audit_sink(&config.server.audit)?;
        Ok(Self {
            bind,
            service: ReportService::new(store, config.validation),
            authenticator: ReportAuthenticator::from_config(&config.server.auth),
            audit,
            metrics: Arc::new(NoopMetrics),
            max_body_bytes: config.server.max_body_bytes,
        })
    }

    /// Replaces the report store, keeping the configured limits.
    #[must_use]
    pub fn with_store(mut self, store: SharedReportStore) -> Self {
        self.service = ReportService::new(store, *self.service.limits());
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Replaces the metrics sink.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn ReportMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Returns the configured bind address.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind
    }

    /// Builds the axum router for this server.
    #[must_use]
    pub fn router(self) -> Router {
        let state = Arc::new(ServerState {
            service: self.service,
            authenticator: self.authenticator,
            request_ids: RequestIdGenerator::new(),
            audit: self.audit,
            metrics: self.metrics,
            max_body_bytes: self.max_body_bytes,
        });
        build_router(state)
    }

    /// Binds the listener without serving yet.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when the address cannot be bound.
    pub async fn bind(self) -> Result<BoundReportServer, ServerError> {
        let listener = TcpListener::bind(self.bind)
            .await
            .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
        Ok(BoundReportServer {
            listener,
            router: self.router(),
        })
    }

    /// Binds and serves until the process exits.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        self.bind().await?.serve().await
    }
}

/// Server whose listener is bound and ready to accept.
pub struct BoundReportServer {
    /// Bound TCP listener.
    listener: TcpListener,
    /// Router serving report requests.
    router: Router,
}

impl BoundReportServer {
    /// Returns the bound local address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when the address is unavailable.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener
            .local_addr()
            .map_err(|err| ServerError::Transport(format!("local address unavailable: {err}")))
    }

    /// Serves requests until the process exits.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when the server fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Serves requests until `shutdown` resolves, then drains in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when the server fails.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(
            self.listener,
            self.router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|err| ServerError::Transport(format!("http server failed: {err}")))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server startup and transport errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration rejected.
    #[error("config error: {0}")]
    Config(String),
    /// Store or audit log initialization failed.
    #[error("init error: {0}")]
    Init(String),
    /// Listener or connection failure.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Construction Helpers
// ============================================================================

/// Builds the report store selected by configuration.
///
/// # Errors
///
/// Returns [`ServerError::Config`] when the sqlite path is missing and
/// [`ServerError::Init`] when the database cannot be opened.
pub fn build_report_store(config: &StoreConfig) -> Result<SharedReportStore, ServerError> {
    match config.store_type {
        StoreType::Memory => Ok(SharedReportStore::from_store(InMemoryReportStore::new())),
        StoreType::Sqlite => {
            let sqlite = config
                .sqlite_config()
                .ok_or_else(|| ServerError::Config("sqlite store requires path".to_string()))?;
            let store =
                SqliteReportStore::new(sqlite).map_err(|err| ServerError::Init(err.to_string()))?;
            Ok(SharedReportStore::from_store(store))
        }
    }
}

/// Builds the audit sink selected by configuration.
///
/// # Errors
///
/// Returns [`ServerError::Init`] when the audit file cannot be opened.
pub fn build_audit_sink(config: &ServerAuditConfig) -> Result<Arc<dyn AuditSink>, ServerError> {
    if !config.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &config.path {
        Some(path) => {
            let sink = FileAuditSink::new(FsPath::new(path))
                .map_err(|err| ServerError::Init(format!("audit log open failed: {err}")))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

/// Builds the router over shared state.
fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/healthz", get(handle_health))
        .route(
            "/clusters/{cluster_id}/reports",
            get(handle_list_reports).post(handle_create_report),
        )
        .route("/clusters/{cluster_id}/reports/{report_id}", get(handle_get_report))
        .fallback(handle_route_not_found)
        .method_not_allowed_fallback(handle_method_not_allowed)
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

// ============================================================================
// SECTION: Request State
// ============================================================================

/// Shared state for request handlers.
struct ServerState {
    /// Report operations.
    service: ReportService,
    /// Bearer authenticator.
    authenticator: ReportAuthenticator,
    /// Request id generator.
    request_ids: RequestIdGenerator,
    /// Audit sink.
    audit: Arc<dyn AuditSink>,
    /// Metrics sink.
    metrics: Arc<dyn ReportMetrics>,
    /// Maximum request body size in bytes.
    max_body_bytes: usize,
}

/// Per-request bookkeeping used for audit and metrics.
struct RequestScope {
    /// Operation being served.
    operation: ReportOperation,
    /// Server-issued request id.
    request_id: String,
    /// Sanitized client correlation id.
    client_correlation_id: Option<String>,
    /// Peer IP address.
    peer_ip: Option<IpAddr>,
    /// Request start time.
    started: Instant,
    /// Cluster named in the path.
    cluster_id: Option<String>,
    /// Request body size in bytes.
    request_bytes: usize,
    /// Fingerprint of the authenticated token.
    token_fingerprint: Option<String>,
}

/// Successful response payload.
struct Reply {
    /// HTTP status.
    status: StatusCode,
    /// Serialized JSON body.
    body: Vec<u8>,
}

/// Failed request rendered as an [`ApiErrorBody`].
#[derive(Debug, Clone, PartialEq, Eq)]
struct ApiError {
    /// HTTP status.
    status: StatusCode,
    /// Stable error code.
    code: ErrorCode,
    /// Short message.
    message: String,
    /// Offending field for input errors.
    field: Option<InputField>,
}

impl ApiError {
    /// Builds an error without a field.
    fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            field: None,
        }
    }

    /// Store failure with a fixed message.
    fn storage() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::StorageFault,
            "report store unavailable",
        )
    }

    /// Request body over the configured limit.
    fn payload_too_large(limit: usize) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::PayloadTooLarge,
            format!("request body exceeds {limit} bytes"),
        )
    }

    /// Serializes the error body.
    fn body(&self) -> Vec<u8> {
        let body = ApiErrorBody {
            code: self.code.as_str().to_string(),
            message: self.message.clone(),
            field: self.field.map(|field| field.as_str().to_string()),
        };
        serde_json::to_vec(&body).unwrap_or_default()
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match &err {
            ReportError::InvalidInput {
                field, ..
            } => Self {
                status: StatusCode::BAD_REQUEST,
                code: ErrorCode::InvalidInput,
                message: err.to_string(),
                field: Some(*field),
            },
            ReportError::NotFound => {
                Self::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, "report not found")
            }
            ReportError::Storage(_) => Self::storage(),
        }
    }
}

impl ServerState {
    /// Opens the bookkeeping scope for a request.
    fn begin(
        &self,
        operation: ReportOperation,
        peer: SocketAddr,
        headers: &HeaderMap,
    ) -> RequestScope {
        let client_header =
            headers.get(CLIENT_CORRELATION_HEADER).and_then(|value| value.to_str().ok());
        RequestScope {
            operation,
            request_id: self.request_ids.issue(),
            client_correlation_id: sanitize_client_correlation_id(client_header).ok().flatten(),
            peer_ip: Some(peer.ip()),
            started: Instant::now(),
            cluster_id: None,
            request_bytes: 0,
            token_fingerprint: None,
        }
    }

    /// Authenticates the request and records the decision.
    fn authenticate(&self, scope: &mut RequestScope, headers: &HeaderMap) -> Result<(), ApiError> {
        let mode = auth_mode_label(self.authenticator.mode());
        let peer_ip = scope.peer_ip.map(|ip| ip.to_string());
        match self.authenticator.authenticate(headers.get(AUTHORIZATION)) {
            Ok(ctx) => {
                self.audit.record_authn(&AuthAuditEvent::allowed(
                    &scope.request_id,
                    peer_ip,
                    mode,
                    &ctx.token_fingerprint,
                ));
                scope.token_fingerprint = Some(ctx.token_fingerprint);
                Ok(())
            }
            Err(err) => {
                self.audit.record_authn(&AuthAuditEvent::denied(
                    &scope.request_id,
                    peer_ip,
                    mode,
                    err.reason(),
                ));
                Err(ApiError::new(
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::Unauthenticated,
                    err.reason(),
                ))
            }
        }
    }

    /// Renders the response and emits audit and metric events.
    fn finish(&self, scope: RequestScope, result: Result<Reply, ApiError>) -> Response {
        let (status, body, error_code) = match result {
            Ok(reply) => (reply.status, reply.body, None),
            Err(err) => (err.status, err.body(), Some(err.code)),
        };
        let event = ReportMetricEvent {
            operation: scope.operation,
            outcome: ReportOutcome::from_status(status.as_u16()),
            status: status.as_u16(),
            error_code: error_code.map(ErrorCode::as_str),
            request_bytes: scope.request_bytes,
            response_bytes: body.len(),
        };
        let latency = scope.started.elapsed();
        self.audit.record(&ReportAuditEvent::new(ReportAuditEventParams {
            request_id: scope.request_id.clone(),
            client_correlation_id: scope.client_correlation_id,
            peer_ip: scope.peer_ip.map(|ip| ip.to_string()),
            operation: scope.operation,
            cluster_id: scope.cluster_id,
            status: event.status,
            error_code: event.error_code,
            request_bytes: event.request_bytes,
            response_bytes: event.response_bytes,
            latency,
            token_fingerprint: scope.token_fingerprint,
        }));
        self.metrics.record_request(&event);
        self.metrics.record_latency(&event, latency);

        let mut response =
            (status, [(CONTENT_TYPE, HeaderValue::from_static("application/json"))], body)
                .into_response();
        if let Ok(value) = HeaderValue::from_str(&scope.request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        if error_code == Some(ErrorCode::Unauthenticated) {
            response.headers_mut().insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Query parameters for the list route.
#[derive(Debug, Deserialize)]
struct ListParams {
    /// Raw `last` value; parsed as a signed integer.
    last: Option<String>,
}

/// `POST /clusters/{clusterId}/reports`.
async fn handle_create_report(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    path: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let mut scope = state.begin(ReportOperation::CreateReport, peer, &headers);
    let result = create_report(&state, &mut scope, path, &headers, body).await;
    state.finish(scope, result)
}

/// Create flow: authenticate, read body, validate and store.
async fn create_report(
    state: &ServerState,
    scope: &mut RequestScope,
    path: Result<Path<String>, PathRejection>,
    headers: &HeaderMap,
    body: Body,
) -> Result<Reply, ApiError> {
    state.authenticate(scope, headers)?;
    let cluster_id = cluster_from_path(path.map(|Path(cluster)| cluster))?;
    scope.cluster_id = Some(cluster_id.to_string());
    let bytes = read_body(body, headers, state.max_body_bytes).await?;
    scope.request_bytes = bytes.len();
    let request: CreateReportBody = serde_json::from_slice(&bytes).map_err(|err| {
        ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidJson, invalid_json_message(&err))
    })?;
    let service = state.service.clone();
    let report = run_blocking(move || {
        service.create_report(CreateReport::new(cluster_id, request.summary, request.data))
    })
    .await?;
    json_reply(StatusCode::CREATED, &report)
}

/// `GET /clusters/{clusterId}/reports/{reportId}`.
async fn handle_get_report(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    path: Result<Path<(String, String)>, PathRejection>,
    headers: HeaderMap,
) -> Response {
    let mut scope = state.begin(ReportOperation::GetReport, peer, &headers);
    let result = get_report(&state, &mut scope, path, &headers).await;
    state.finish(scope, result)
}

/// Get flow: authenticate, then look up within the cluster.
async fn get_report(
    state: &ServerState,
    scope: &mut RequestScope,
    path: Result<Path<(String, String)>, PathRejection>,
    headers: &HeaderMap,
) -> Result<Reply, ApiError> {
    state.authenticate(scope, headers)?;
    let (cluster, report) = path
        .map(|Path(params)| params)
        .map_err(|_| ApiError::from(ReportError::NotFound))?;
    let cluster_id = ClusterId::new(cluster);
    scope.cluster_id = Some(cluster_id.to_string());
    let report_id = ReportId::new(report);
    let service = state.service.clone();
    let report = run_blocking(move || service.get_report(&cluster_id, &report_id)).await?;
    json_reply(StatusCode::OK, &report)
}

/// `GET /clusters/{clusterId}/reports?last=N`.
async fn handle_list_reports(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ListParams>, QueryRejection>,
    headers: HeaderMap,
) -> Response {
    let mut scope = state.begin(ReportOperation::ListReports, peer, &headers);
    let result = list_reports(&state, &mut scope, path, query, &headers).await;
    state.finish(scope, result)
}

/// List flow: authenticate, parse `last`, then list.
async fn list_reports(
    state: &ServerState,
    scope: &mut RequestScope,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ListParams>, QueryRejection>,
    headers: &HeaderMap,
) -> Result<Reply, ApiError> {
    state.authenticate(scope, headers)?;
    let cluster_id = cluster_from_path(path.map(|Path(cluster)| cluster))?;
    scope.cluster_id = Some(cluster_id.to_string());
    let Query(params) = query
        .map_err(|_| ApiError::from(ReportError::invalid(InputField::Limit, "malformed query")))?;
    let last = parse_last(params.last.as_deref())?;
    let service = state.service.clone();
    let reports = run_blocking(move || service.list_reports(&cluster_id, last)).await?;
    json_reply(
        StatusCode::OK,
        &ReportList {
            reports,
        },
    )
}

/// `GET /healthz`; unauthenticated.
async fn handle_health(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let scope = state.begin(ReportOperation::Other, peer, &headers);
    let service = state.service.clone();
    let result = match run_blocking(move || service.readiness()).await {
        Ok(()) => json_reply(
            StatusCode::OK,
            &HealthStatus {
                status: "ok".to_string(),
            },
        ),
        Err(_) => Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::StorageFault,
            "report store unavailable",
        )),
    };
    state.finish(scope, result)
}

/// Fallback for unknown paths. Credentials are checked before the route.
async fn handle_route_not_found(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let mut scope = state.begin(ReportOperation::Other, peer, &headers);
    let result = state.authenticate(&mut scope, &headers).and_then(|()| {
        Err(ApiError::new(StatusCode::NOT_FOUND, ErrorCode::RouteNotFound, "route not found"))
    });
    state.finish(scope, result)
}

/// Fallback for known paths with an unsupported method.
async fn handle_method_not_allowed(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let mut scope = state.begin(ReportOperation::Other, peer, &headers);
    let result = state.authenticate(&mut scope, &headers).and_then(|()| {
        Err(ApiError::new(
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::MethodNotAllowed,
            "method not allowed",
        ))
    });
    state.finish(scope, result)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts the cluster path segment.
fn cluster_from_path(path: Result<String, PathRejection>) -> Result<ClusterId, ApiError> {
    path.map(ClusterId::new).map_err(|_| {
        ApiError::from(ReportError::invalid(InputField::ClusterId, "malformed path segment"))
    })
}

/// Parses the `last` query value; an empty value counts as absent.
fn parse_last(raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            value.parse::<i64>().map_err(|_| {
                ApiError::from(ReportError::invalid(InputField::Limit, "must be an integer"))
            })
        })
        .transpose()
}

/// Reads the request body up to `limit` bytes.
async fn read_body(body: Body, headers: &HeaderMap, limit: usize) -> Result<Bytes, ApiError> {
    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());
    if let Some(declared) = declared
        && declared > u64::try_from(limit).unwrap_or(u64::MAX)
    {
        return Err(ApiError::payload_too_large(limit));
    }
    to_bytes(body, limit).await.map_err(|_| ApiError::payload_too_large(limit))
}

/// Short message for a JSON decode failure.
fn invalid_json_message(err: &serde_json::Error) -> String {
    if err.is_data() {
        format!("request body does not match the report schema: {err}")
    } else {
        "request body is not valid JSON".to_string()
    }
}

/// Runs a service call on the blocking pool.
async fn run_blocking<T, F>(task: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ReportError> + Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(task).await.map_err(|_| ApiError::storage())?;
    outcome.map_err(ApiError::from)
}

/// Serializes a success body.
fn json_reply<T: Serialize>(status: StatusCode, value: &T) -> Result<Reply, ApiError> {
    let body = serde_json::to_vec(value).map_err(|_| ApiError::storage())?;
    Ok(Reply {
        status,
        body,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
