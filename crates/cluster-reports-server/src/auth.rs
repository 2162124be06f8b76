// crates/cluster-reports-server/src/auth.rs
// ============================================================================
// Module: Report API Authentication
// Description: Bearer credential checks for inbound report requests.
// Purpose: Fail closed on missing or malformed credentials.
// Dependencies: cluster-reports-config, cluster-reports-core, axum, thiserror
// ============================================================================

//! ## Overview
//! Every report request must carry `Authorization: Bearer <token>`. In
//! `bearer_present` mode the token is only checked for shape; verifying it is
//! left to an upstream identity provider. In `bearer_token` mode the token
//! must also appear in the configured allowlist. Tokens never leave this
//! module in clear text; callers get a sha256 fingerprint for auditing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use axum::http::HeaderValue;
use cluster_reports_config::ServerAuthConfig;
use cluster_reports_config::ServerAuthMode;
use cluster_reports_core::sha256_hex;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted `Authorization` header length.
pub const MAX_AUTH_HEADER_BYTES: usize = 8 * 1024;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Authenticated caller context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Mode that accepted the credential.
    pub mode: ServerAuthMode,
    /// Sha256 fingerprint of the bearer token.
    pub token_fingerprint: String,
}

/// Authentication failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Missing, malformed, or rejected credential.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
}

impl AuthError {
    /// Returns the short reason text without the variant prefix.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Unauthenticated(reason) => reason,
        }
    }
}

/// Bearer authenticator built from server auth configuration.
#[derive(Clone)]
pub struct ReportAuthenticator {
    /// Active auth mode.
    mode: ServerAuthMode,
    /// Allowlisted tokens for `bearer_token` mode.
    tokens: BTreeSet<String>,
}

impl fmt::Debug for ReportAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportAuthenticator")
            .field("mode", &self.mode)
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

impl ReportAuthenticator {
    /// Builds an authenticator from configuration.
    #[must_use]
    pub fn from_config(config: &ServerAuthConfig) -> Self {
        Self {
            mode: config.mode,
            tokens: config.bearer_tokens.iter().cloned().collect(),
        }
    }

    /// Returns the active auth mode.
    #[must_use]
    pub const fn mode(&self) -> ServerAuthMode {
        self.mode
    }

    /// Authenticates a request from its `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] when the header is missing,
    /// malformed, oversized, or names a token outside the allowlist.
    pub fn authenticate(&self, header: Option<&HeaderValue>) -> Result<AuthContext, AuthError> {
        let header = header
            .ok_or_else(|| AuthError::Unauthenticated("missing authorization".to_string()))?;
        if header.len() > MAX_AUTH_HEADER_BYTES {
            return Err(AuthError::Unauthenticated("authorization header too large".to_string()));
        }
        let header = header.to_str().map_err(|_| {
            AuthError::Unauthenticated("invalid authorization header".to_string())
        })?;
        let token = parse_bearer_token(header)?;
        if self.mode == ServerAuthMode::BearerToken && !self.tokens.contains(token) {
            return Err(AuthError::Unauthenticated("invalid bearer token".to_string()));
        }
        Ok(AuthContext {
            mode: self.mode,
            token_fingerprint: sha256_hex(token.as_bytes()),
        })
    }
}

/// Returns the stable label for an auth mode.
#[must_use]
pub const fn auth_mode_label(mode: ServerAuthMode) -> &'static str {
    match mode {
        ServerAuthMode::BearerPresent => "bearer_present",
        ServerAuthMode::BearerToken => "bearer_token",
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Extracts the token from a `Bearer` authorization value.
fn parse_bearer_token(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default().trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::Unauthenticated("invalid authorization header".to_string()));
    }
    Ok(token)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
