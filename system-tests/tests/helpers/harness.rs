// system-tests/tests/helpers/harness.rs
// ============================================================================
// Module: Report Server Harness
// Description: Helpers for spawning report servers in system-tests.
// Purpose: Provide deterministic server startup and teardown for tests.
// Dependencies: cluster-reports-server, cluster-reports-client, tokio
// ============================================================================

use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use cluster_reports_client::BearerToken;
use cluster_reports_client::ClientConfig;
use cluster_reports_client::ReportClient;
use cluster_reports_config::ClusterReportsConfig;
use cluster_reports_config::ServerAuthMode;
use cluster_reports_core::ClusterId;
use cluster_reports_server::ReportServer;
use cluster_reports_server::ServerError;
use system_tests::config::SystemTestConfig;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Token accepted by locally spawned servers.
pub const LOCAL_TOKEN: &str = "system-test-token";
/// Default request timeout for harness clients.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle for a report API under test.
pub struct ReportServerHandle {
    base_url: String,
    token: String,
    proxy: Option<String>,
    timeout: Duration,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<Result<(), ServerError>>>,
}

impl ReportServerHandle {
    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the bearer token accepted by the target.
    pub fn token(&self) -> Result<BearerToken, String> {
        BearerToken::new(self.token.clone()).map_err(|err| err.to_string())
    }

    /// Builds a typed client for the target.
    pub fn client(&self) -> Result<ReportClient, String> {
        let mut config = ClientConfig::new(self.base_url.clone()).with_timeout(self.timeout);
        if let Some(proxy) = &self.proxy {
            config = config.with_proxy(proxy.clone());
        }
        ReportClient::new(config).map_err(|err| err.to_string())
    }

    /// Stops a locally spawned server and waits for it to drain.
    pub async fn shutdown(mut self) -> Result<(), String> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            join.await
                .map_err(|err| format!("server task failed: {err}"))?
                .map_err(|err| format!("server exited with error: {err}"))?;
        }
        Ok(())
    }
}

/// Builds a loopback config with `bearer_token` auth and audit disabled.
pub fn base_config() -> ClusterReportsConfig {
    let mut config = ClusterReportsConfig::default();
    config.server.bind = "127.0.0.1:0".to_string();
    config.server.audit.enabled = false;
    config.server.auth.mode = ServerAuthMode::BearerToken;
    config.server.auth.bearer_tokens = vec![LOCAL_TOKEN.to_string()];
    config
}

/// Spawns a server for `config` on its configured bind address.
pub async fn spawn_report_server(
    config: ClusterReportsConfig,
) -> Result<ReportServerHandle, String> {
    let token = config.server.auth.bearer_tokens.first().cloned().unwrap_or_default();
    let token = if token.is_empty() { LOCAL_TOKEN.to_string() } else { token };
    let server = ReportServer::from_config(config).map_err(|err| err.to_string())?;
    let bound = server.bind().await.map_err(|err| err.to_string())?;
    let addr = bound.local_addr().map_err(|err| err.to_string())?;
    let (tx, rx) = oneshot::channel();
    let join = tokio::spawn(bound.serve_with_shutdown(async move {
        let _ = rx.await;
    }));
    Ok(ReportServerHandle {
        base_url: format!("http://{addr}"),
        token,
        proxy: None,
        timeout: DEFAULT_TIMEOUT,
        shutdown: Some(tx),
        join: Some(join),
    })
}

/// Resolves the target from the environment: an external API when
/// configured, otherwise a freshly spawned local server.
pub async fn resolve_target() -> Result<ReportServerHandle, String> {
    let env = SystemTestConfig::load()?;
    let timeout = env.timeout.map_or(DEFAULT_TIMEOUT, |value| value.max(DEFAULT_TIMEOUT));
    match (env.api_url, env.token) {
        (Some(base_url), Some(token)) => Ok(ReportServerHandle {
            base_url,
            token,
            proxy: env.proxy,
            timeout,
            shutdown: None,
            join: None,
        }),
        _ => {
            let mut handle = spawn_report_server(base_config()).await?;
            handle.timeout = timeout;
            Ok(handle)
        }
    }
}

/// Returns a cluster id unique to this process and call site label.
pub fn unique_cluster(label: &str) -> ClusterId {
    let nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_nanos());
    ClusterId::new(format!("system-test-{label}-{}-{nanos}", std::process::id()))
}
