// system-tests/tests/suites/reliability.rs
// ============================================================================
// Module: Reliability Tests
// Description: Concurrency and durability checks.
// Purpose: Validate id uniqueness under load and persistence across restarts.
// Dependencies: system-tests helpers, tempfile
// ============================================================================

//! ## Overview
//! Concurrency and durability checks.
//! Invariants:
//! - Concurrent creates never share a report id, across clusters or within one.
//! - Each cluster's listing reflects exactly its own creates, in order.
//! - A `SQLite`-backed server serves the same reports after a restart.

use std::collections::BTreeSet;

use cluster_reports_config::StoreConfig;
use cluster_reports_config::StoreType;
use cluster_reports_core::Report;
use cluster_reports_core::ReportData;
use helpers::harness::base_config;
use helpers::harness::resolve_target;
use helpers::harness::spawn_report_server;
use helpers::harness::unique_cluster;
use helpers::require::require;
use helpers::require::require_eq;
use tempfile::TempDir;
use tokio::task::JoinSet;

use crate::helpers;

const WRITERS: usize = 8;
const REPORTS_PER_WRITER: usize = 10;

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_writers_get_unique_ordered_reports() -> Result<(), Box<dyn std::error::Error>>
{
    let target = resolve_target().await?;
    let client = target.client()?;
    let token = target.token()?;
    let shared = unique_cluster("shared");

    let mut writers = JoinSet::new();
    for writer in 0 .. WRITERS {
        let client = client.clone();
        let token = token.clone();
        let shared = shared.clone();
        let own = unique_cluster(&format!("writer-{writer}"));
        writers.spawn(async move {
            let mut own_reports: Vec<Report> = Vec::new();
            for index in 0 .. REPORTS_PER_WRITER {
                let data = ReportData::encode(format!("{writer}:{index}"));
                let summary = format!("writer {writer} report {index}");
                own_reports.push(client.create_report(&token, &own, &summary, &data).await?);
                client.create_report(&token, &shared, &summary, &data).await?;
            }
            let listed = client.list_reports(&token, &own, None).await?;
            Ok::<_, cluster_reports_client::ClientError>((own_reports, listed))
        });
    }

    let mut ids = BTreeSet::new();
    while let Some(joined) = writers.join_next().await {
        let (own_reports, listed) = joined??;
        require_eq(&listed, &own_reports, "per-cluster listing must match create order")?;
        for report in own_reports {
            require(ids.insert(report.report_id), "duplicate report id across clusters")?;
        }
    }

    let shared_reports = client.list_reports(&token, &shared, None).await?;
    require_eq(&shared_reports.len(), &(WRITERS * REPORTS_PER_WRITER), "shared cluster count")?;
    require(
        shared_reports.windows(2).all(|pair| pair[0].created_at <= pair[1].created_at),
        "shared cluster createdAt must be non-decreasing",
    )?;
    for report in shared_reports {
        require(ids.insert(report.report_id), "duplicate report id in shared cluster")?;
    }

    target.shutdown().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn sqlite_reports_survive_restart() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let mut config = base_config();
    config.store = StoreConfig {
        store_type: StoreType::Sqlite,
        path: Some(temp.path().join("reports.db")),
        ..StoreConfig::default()
    };
    let cluster = unique_cluster("durable");

    let server = spawn_report_server(config.clone()).await?;
    let client = server.client()?;
    let token = server.token()?;
    let first =
        client.create_report(&token, &cluster, "before", &ReportData::encode(b"one")).await?;
    let second =
        client.create_report(&token, &cluster, "before", &ReportData::encode(b"two")).await?;
    server.shutdown().await?;

    let server = spawn_report_server(config).await?;
    let client = server.client()?;
    let token = server.token()?;
    let listed = client.list_reports(&token, &cluster, None).await?;
    require_eq(&listed, &vec![first.clone(), second.clone()], "reports lost across restart")?;

    let third =
        client.create_report(&token, &cluster, "after", &ReportData::encode(b"three")).await?;
    require(
        third.report_id != first.report_id && third.report_id != second.report_id,
        "restart must not reuse report ids",
    )?;
    require(third.created_at >= second.created_at, "createdAt regressed across restart")?;

    server.shutdown().await?;
    Ok(())
}
