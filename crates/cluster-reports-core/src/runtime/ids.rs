// crates/cluster-reports-core/src/runtime/ids.rs
// ============================================================================
// Module: Report Id Generation
// Description: Boot-scoped report identifier generator.
// Purpose: Issue report ids that are unique within and across process runs.
// Dependencies: rand
// ============================================================================

//! ## Overview
//! Report ids combine a random boot id drawn from the OS RNG with a
//! monotonic counter: `rpt-<16 hex boot>-<16 hex sequence>`. The boot id
//! keeps ids from a restarted process distinct from those already persisted
//! by a durable store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use rand::RngCore;
use rand::rngs::OsRng;

use crate::model::ReportId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix carried by every generated report id.
pub const REPORT_ID_PREFIX: &str = "rpt";

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Boot-scoped report id generator.
///
/// # Invariants
/// - Issued identifiers are unique within the generator's lifetime.
#[derive(Debug)]
pub struct ReportIdGenerator {
    /// Boot-scoped random identifier.
    boot_id: u64,
    /// Monotonic counter for ids issued by this generator.
    counter: AtomicU64,
}

impl ReportIdGenerator {
    /// Creates a generator seeded from the OS RNG.
    #[must_use]
    pub fn new() -> Self {
        let mut bytes = [0u8; 8];
        OsRng.fill_bytes(&mut bytes);
        Self::with_boot_id(u64::from_be_bytes(bytes))
    }

    /// Creates a generator with a fixed boot id.
    #[must_use]
    pub const fn with_boot_id(boot_id: u64) -> Self {
        Self {
            boot_id,
            counter: AtomicU64::new(1),
        }
    }

    /// Issues the next report id.
    #[must_use]
    pub fn issue(&self) -> ReportId {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        ReportId::new(format!("{REPORT_ID_PREFIX}-{:016x}-{seq:016x}", self.boot_id))
    }
}

impl Default for ReportIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
