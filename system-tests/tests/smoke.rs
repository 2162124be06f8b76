// system-tests/tests/smoke.rs
// ============================================================================
// Module: Smoke Suite
// Description: Aggregates smoke system tests into one binary.
// Purpose: Reduce binaries while keeping smoke coverage centralized.
// Dependencies: suites/*, helpers
// ============================================================================

//! ## Overview
//! Aggregates smoke system tests into one binary.
//! Runs against an external API when `CLUSTER_REPORTS_SYSTEM_TEST_API_URL`
//! is set, otherwise against a local server.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod helpers;

#[path = "suites/smoke.rs"]
mod smoke;
