// crates/cluster-reports-core/src/runtime/clock.rs
// ============================================================================
// Module: Wall Clock
// Description: System clock implementation of the clock interface.
// Purpose: Supply production creation timestamps.
// Dependencies: crate::{interfaces, model}
// ============================================================================

//! ## Overview
//! [`SystemClock`] reads UTC wall-clock time. Stores clamp its values so a
//! backwards clock step never reorders a cluster's reports.

use crate::interfaces::Clock;
use crate::model::Timestamp;

/// Wall-clock time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now_utc()
    }
}
