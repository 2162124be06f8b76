// crates/cluster-reports-server/src/correlation.rs
// ============================================================================
// Module: Request Correlation
// Description: Request id generation and client correlation id sanitization.
// Purpose: Tag every response and audit event with a traceable identifier.
// Dependencies: rand
// ============================================================================

//! ## Overview
//! Every response carries a server-issued `x-request-id` built from a
//! boot-scoped random id plus a monotonic counter. Clients may send an
//! `x-correlation-id`; it is untrusted input, so it is only echoed into audit
//! events after passing strict HTTP token rules. An invalid value is dropped
//! rather than failing the request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use rand::RngCore;
use rand::rngs::OsRng;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying the server-issued request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// Header carrying a client-provided correlation id.
pub const CLIENT_CORRELATION_HEADER: &str = "x-correlation-id";
/// Maximum accepted length of a client correlation id.
pub const MAX_CLIENT_CORRELATION_ID_LENGTH: usize = 128;
/// Prefix of server-issued request ids.
pub const REQUEST_ID_PREFIX: &str = "req";

// ============================================================================
// SECTION: Rejections
// ============================================================================

/// Reason a client correlation id was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationIdRejection {
    /// Empty after trimming.
    Empty,
    /// Longer than [`MAX_CLIENT_CORRELATION_ID_LENGTH`].
    TooLong,
    /// Contains a byte outside the HTTP token alphabet.
    DisallowedChar,
}

impl CorrelationIdRejection {
    /// Returns a stable label for the rejection.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TooLong => "too_long",
            Self::DisallowedChar => "disallowed_char",
        }
    }
}

impl fmt::Display for CorrelationIdRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Request Ids
// ============================================================================

/// Boot-scoped request id generator.
///
/// # Invariants
/// - Ids are unique for the lifetime of the generator.
#[derive(Debug)]
pub struct RequestIdGenerator {
    /// Random id drawn once per process.
    boot_id: u64,
    /// Next sequence number.
    counter: AtomicU64,
}

impl RequestIdGenerator {
    /// Creates a generator seeded from the OS RNG.
    #[must_use]
    pub fn new() -> Self {
        let mut bytes = [0u8; 8];
        OsRng.fill_bytes(&mut bytes);
        Self {
            boot_id: u64::from_be_bytes(bytes),
            counter: AtomicU64::new(1),
        }
    }

    /// Issues the next request id.
    #[must_use]
    pub fn issue(&self) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{REQUEST_ID_PREFIX}-{:016x}-{seq:016x}", self.boot_id)
    }
}

impl Default for RequestIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Sanitization
// ============================================================================

/// Sanitizes a client correlation id.
///
/// Returns `Ok(None)` when no value was sent.
///
/// # Errors
///
/// Returns [`CorrelationIdRejection`] when the value is empty, too long, or
/// contains characters outside the HTTP token alphabet.
pub fn sanitize_client_correlation_id(
    value: Option<&str>,
) -> Result<Option<String>, CorrelationIdRejection> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CorrelationIdRejection::Empty);
    }
    if trimmed.len() > MAX_CLIENT_CORRELATION_ID_LENGTH {
        return Err(CorrelationIdRejection::TooLong);
    }
    if !trimmed.chars().all(is_tchar) {
        return Err(CorrelationIdRejection::DisallowedChar);
    }
    Ok(Some(trimmed.to_string()))
}

/// Returns true for RFC 9110 token characters.
const fn is_tchar(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '-'
                | '.'
                | '^'
                | '_'
                | '`'
                | '|'
                | '~'
        )
}

// ============================================================================
// SECTION: Tests
// ============================================================================
