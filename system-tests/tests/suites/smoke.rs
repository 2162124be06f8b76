// system-tests/tests/suites/smoke.rs
// ============================================================================
// Module: Smoke Tests
// Description: Minimal create, get, and list flow over HTTP.
// Purpose: Confirm a deployment answers the core report contract.
// Dependencies: system-tests helpers
// ============================================================================

//! ## Overview
//! Minimal create, get, and list flow over HTTP.
//! Invariants:
//! - A created report is immediately readable and listable.
//! - The stored payload decodes to the exact bytes submitted.

use cluster_reports_core::ReportData;
use helpers::harness::resolve_target;
use helpers::harness::unique_cluster;
use helpers::require::require;
use helpers::require::require_eq;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn health_probe_answers_ok() -> Result<(), Box<dyn std::error::Error>> {
    let target = resolve_target().await?;
    let status = target.client()?.health().await?;
    require_eq(&status.status.as_str(), &"ok", "unexpected health status")?;
    target.shutdown().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn create_get_list_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let target = resolve_target().await?;
    let client = target.client()?;
    let token = target.token()?;
    let cluster = unique_cluster("smoke");
    let payload = br#"{"message":"hi"}"#;

    let created = client
        .create_report(&token, &cluster, "Integration Test Report", &ReportData::encode(payload))
        .await?;
    require(!created.report_id.as_str().is_empty(), "report id must be assigned")?;
    require_eq(&created.cluster_id, &cluster, "created report has wrong cluster")?;

    let loaded = client.get_report(&token, &cluster, &created.report_id).await?;
    require_eq(&loaded.summary.as_str(), &"Integration Test Report", "summary mismatch")?;
    require_eq(&loaded.data.decode()?, &payload.to_vec(), "payload mismatch")?;
    require_eq(&loaded, &created, "get returned a different report")?;

    let recent = client.list_reports(&token, &cluster, Some(5)).await?;
    require(
        recent.iter().any(|report| report.report_id == created.report_id),
        "created report missing from last=5 listing",
    )?;

    target.shutdown().await?;
    Ok(())
}
