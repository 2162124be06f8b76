// system-tests/tests/suites/validation.rs
// ============================================================================
// Module: Validation Tests
// Description: Input rejection over HTTP.
// Purpose: Ensure invalid requests fail with 400 and store nothing.
// Dependencies: system-tests helpers
// ============================================================================

//! ## Overview
//! Input rejection over HTTP.
//! Invariants:
//! - Empty `summary` or `data` never yields 201.
//! - A negative `last` is a client error, never a silent empty list.

use cluster_reports_core::ReportData;
use helpers::harness::resolve_target;
use helpers::harness::unique_cluster;
use helpers::require::require;
use helpers::require::require_api_error;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn empty_fields_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let target = resolve_target().await?;
    let client = target.client()?;
    let token = target.token()?;
    let cluster = unique_cluster("validation");

    require_api_error(
        client.create_report(&token, &cluster, "", &ReportData::encode(b"x")).await,
        400,
        "invalid_input",
    )?;
    require_api_error(
        client.create_report(&token, &cluster, "summary", &ReportData::new("")).await,
        400,
        "invalid_input",
    )?;
    require(
        client.list_reports(&token, &cluster, None).await?.is_empty(),
        "rejected creates must not be stored",
    )?;

    target.shutdown().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn negative_last_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let target = resolve_target().await?;
    let client = target.client()?;
    let token = target.token()?;
    let cluster = unique_cluster("negative");

    require_api_error(client.list_reports(&token, &cluster, Some(-1)).await, 400, "invalid_input")?;

    target.shutdown().await?;
    Ok(())
}
