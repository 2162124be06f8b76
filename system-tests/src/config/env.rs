// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional base URL of an already running report API.
    ApiUrl,
    /// Bearer token for the external API (required with [`Self::ApiUrl`]).
    Token,
    /// Optional forward proxy for the external API.
    Proxy,
    /// Optional timeout override in seconds (positive integer).
    TimeoutSeconds,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApiUrl => "CLUSTER_REPORTS_SYSTEM_TEST_API_URL",
            Self::Token => "CLUSTER_REPORTS_SYSTEM_TEST_TOKEN",
            Self::Proxy => "CLUSTER_REPORTS_SYSTEM_TEST_PROXY",
            Self::TimeoutSeconds => "CLUSTER_REPORTS_SYSTEM_TEST_TIMEOUT_SEC",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// External API base URL; suites spawn a local server when absent.
    pub api_url: Option<String>,
    /// Bearer token for the external API.
    pub token: Option<String>,
    /// Forward proxy for the external API.
    pub proxy: Option<String>,
    /// Optional timeout override in seconds (positive integer).
    pub timeout: Option<Duration>,
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, an invalid timeout).
    pub fn load() -> Result<Self, String> {
        Self::from_lookup(read_env_strict)
    }

    /// Builds configuration from an environment-style lookup.
    ///
    /// # Errors
    ///
    /// Returns an error when a value is empty, a timeout is not a positive
    /// integer, or an external URL is set without a token.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Result<Option<String>, String>,
    ) -> Result<Self, String> {
        let read = |key: SystemTestEnv| read_nonempty(&lookup, key.as_str());
        let api_url = read(SystemTestEnv::ApiUrl)?;
        let token = read(SystemTestEnv::Token)?;
        let proxy = read(SystemTestEnv::Proxy)?;
        let timeout = read(SystemTestEnv::TimeoutSeconds)?
            .map(|value| parse_timeout_seconds(SystemTestEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        if api_url.is_some() && token.is_none() {
            return Err(format!(
                "{} is required when {} is set",
                SystemTestEnv::Token.as_str(),
                SystemTestEnv::ApiUrl.as_str()
            ));
        }
        Ok(Self {
            api_url,
            token,
            proxy,
            timeout,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads a value through `lookup` and rejects empty values.
fn read_nonempty(
    lookup: &impl Fn(&str) -> Result<Option<String>, String>,
    name: &str,
) -> Result<Option<String>, String> {
    match lookup(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

/// Parses a positive timeout value from an environment variable string.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}
