// crates/cluster-reports-core/src/model/hashing.rs
// ============================================================================
// Module: Content Hashing
// Description: SHA-256 digests rendered as lowercase hex.
// Purpose: Fingerprint payloads for storage integrity and credentials for audit.
// Dependencies: sha2
// ============================================================================

//! ## Overview
//! Stores hash report payloads so reads can detect tampering, and the
//! transport hashes bearer tokens so audit records never carry secrets.

// ============================================================================
// SECTION: Imports
// ============================================================================

use sha2::Digest;
use sha2::Sha256;

// ============================================================================
// SECTION: Hashing
// ============================================================================

/// Returns the lowercase hex SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex_encode(&digest)
}

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(char::from(HEX[usize::from(byte >> 4)]));
        out.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }
    out
}

// ============================================================================
// SECTION: Tests
// ============================================================================
