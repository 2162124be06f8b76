// system-tests/tests/suites/auth.rs
// ============================================================================
// Module: Auth Tests
// Description: Bearer authentication over HTTP.
// Purpose: Ensure unauthenticated calls fail closed before touching the store.
// Dependencies: system-tests helpers, reqwest
// ============================================================================

//! ## Overview
//! Bearer authentication over HTTP. Each test spawns a local server in
//! `bearer_token` mode so the allowlist is known.
//! Invariants:
//! - Missing or unknown credentials yield `401` with a `Bearer` challenge.
//! - Rejected creates leave no stored report.
//! - The liveness probe needs no credential.

use cluster_reports_client::BearerToken;
use cluster_reports_config::ServerAuthMode;
use cluster_reports_core::ApiErrorBody;
use cluster_reports_core::ReportData;
use helpers::harness::base_config;
use helpers::harness::spawn_report_server;
use helpers::harness::unique_cluster;
use helpers::require::require;
use helpers::require::require_api_error;
use helpers::require::require_eq;
use serde_json::json;

use crate::helpers;

fn raw_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().no_proxy().build()
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_credential_is_challenged() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_report_server(base_config()).await?;
    let http = raw_client()?;

    let response = http
        .post(format!("{}/clusters/cluster-a/reports", server.base_url()))
        .json(&json!({ "summary": "s", "data": ReportData::encode(b"x") }))
        .send()
        .await?;
    require_eq(&response.status().as_u16(), &401, "missing credential status")?;
    let challenge = response
        .headers()
        .get("www-authenticate")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    require_eq(&challenge.as_deref(), &Some("Bearer"), "missing bearer challenge")?;
    let body: ApiErrorBody = response.json().await?;
    require_eq(&body.code.as_str(), &"unauthenticated", "error code")?;

    let response = http.get(format!("{}/healthz", server.base_url())).send().await?;
    require_eq(&response.status().as_u16(), &200, "health must not require auth")?;

    server.shutdown().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_token_is_rejected_without_side_effects() -> Result<(), Box<dyn std::error::Error>>
{
    let server = spawn_report_server(base_config()).await?;
    let client = server.client()?;
    let cluster = unique_cluster("authz");
    let wrong = BearerToken::new("not-on-the-allowlist")?;

    require_api_error(
        client.create_report(&wrong, &cluster, "s", &ReportData::encode(b"x")).await,
        401,
        "unauthenticated",
    )?;
    require(
        client.list_reports(&server.token()?, &cluster, None).await?.is_empty(),
        "rejected create must not be stored",
    )?;

    server.shutdown().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn presence_mode_accepts_any_well_formed_token() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = base_config();
    config.server.auth.mode = ServerAuthMode::BearerPresent;
    config.server.auth.bearer_tokens.clear();
    let server = spawn_report_server(config).await?;
    let client = server.client()?;
    let cluster = unique_cluster("presence");

    let created = client
        .create_report(
            &BearerToken::new("any-opaque-token")?,
            &cluster,
            "s",
            &ReportData::encode(b"x"),
        )
        .await?;
    require_eq(&created.cluster_id, &cluster, "created under wrong cluster")?;

    server.shutdown().await?;
    Ok(())
}
