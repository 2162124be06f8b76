// crates/cluster-reports-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for cluster-reports-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use cluster_reports_config::ClusterReportsConfig;
use cluster_reports_config::ConfigError;

/// Test outcome carrying a failure description.
pub type TestResult = Result<(), String>;

/// Parses a TOML string into a `ClusterReportsConfig` without validating it.
pub fn config_from_toml(toml_str: &str) -> Result<ClusterReportsConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<ClusterReportsConfig, String> {
    config_from_toml("").map_err(|err| err.to_string())
}

/// Asserts that a result is an error whose message contains `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
