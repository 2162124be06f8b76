// system-tests/tests/suites/reports.rs
// ============================================================================
// Module: Report Listing Tests
// Description: Ordering, windowing, and cluster scoping over HTTP.
// Purpose: Validate list semantics and lookup isolation end to end.
// Dependencies: system-tests helpers
// ============================================================================

//! ## Overview
//! Ordering, windowing, and cluster scoping over HTTP.
//! Invariants:
//! - Listing returns a cluster's reports in creation order.
//! - `last=N` returns the final `min(N, total)` reports in that order.
//! - `last=0` behaves like an absent `last` and returns everything.
//! - A report is only visible under the cluster that created it.

use cluster_reports_core::Report;
use cluster_reports_core::ReportData;
use cluster_reports_core::ReportId;
use helpers::harness::resolve_target;
use helpers::harness::unique_cluster;
use helpers::require::require;
use helpers::require::require_api_error;
use helpers::require::require_eq;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn listing_preserves_creation_order_and_windows() -> Result<(), Box<dyn std::error::Error>>
{
    let target = resolve_target().await?;
    let client = target.client()?;
    let token = target.token()?;
    let cluster = unique_cluster("order");

    let mut created: Vec<Report> = Vec::new();
    for index in 0 .. 5 {
        let data = ReportData::encode(format!("payload-{index}"));
        created.push(client.create_report(&token, &cluster, &format!("r{index}"), &data).await?);
    }

    let all = client.list_reports(&token, &cluster, None).await?;
    require_eq(&all, &created, "full listing differs from creation order")?;
    require(
        all.windows(2).all(|pair| pair[0].created_at <= pair[1].created_at),
        "createdAt must be non-decreasing",
    )?;

    let last_two = client.list_reports(&token, &cluster, Some(2)).await?;
    require_eq(&last_two, &created[3 ..].to_vec(), "last=2 window mismatch")?;

    let zero = client.list_reports(&token, &cluster, Some(0)).await?;
    require_eq(&zero, &created, "last=0 must return everything")?;

    let oversized = client.list_reports(&token, &cluster, Some(100)).await?;
    require_eq(&oversized, &created, "last beyond total must return everything")?;

    target.shutdown().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn reports_are_scoped_to_their_cluster() -> Result<(), Box<dyn std::error::Error>> {
    let target = resolve_target().await?;
    let client = target.client()?;
    let token = target.token()?;
    let owner = unique_cluster("owner");
    let other = unique_cluster("other");

    let created =
        client.create_report(&token, &owner, "owned", &ReportData::encode(b"secret")).await?;

    require_api_error(
        client.get_report(&token, &other, &created.report_id).await,
        404,
        "not_found",
    )?;
    require(
        client.list_reports(&token, &other, None).await?.is_empty(),
        "other cluster must list nothing",
    )?;

    target.shutdown().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_report_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let target = resolve_target().await?;
    let client = target.client()?;
    let token = target.token()?;
    let cluster = unique_cluster("unknown");

    require_api_error(
        client.get_report(&token, &cluster, &ReportId::new("rpt-does-not-exist")).await,
        404,
        "not_found",
    )?;

    target.shutdown().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn binary_payloads_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let target = resolve_target().await?;
    let client = target.client()?;
    let token = target.token()?;
    let cluster = unique_cluster("binary");
    let payload: Vec<u8> = (0 ..= 255).collect();

    let created =
        client.create_report(&token, &cluster, "bytes", &ReportData::encode(&payload)).await?;
    let loaded = client.get_report(&token, &cluster, &created.report_id).await?;
    require_eq(&loaded.data.decode()?, &payload, "binary payload mismatch")?;

    target.shutdown().await?;
    Ok(())
}
