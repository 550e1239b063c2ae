//! Clock - Time Source for Entity Timestamps
//!
//! TigerStyle: Stores never read wall time directly. Registration and post
//! dates come from an injected clock so tests can control ordering.
//!
//! - `SystemClock`: wall time, used by the server
//! - `ManualClock`: only moves when advanced, never goes backwards

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of "now" for stores
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Controllable clock for deterministic tests.
///
/// Time is kept as milliseconds since the epoch and only moves forward.
#[derive(Debug)]
pub struct ManualClock {
    current_ms: AtomicI64,
}

impl ManualClock {
    /// Create a clock starting at the given instant
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            current_ms: AtomicI64::new(start.timestamp_millis()),
        }
    }

    /// Advance time and return the new current instant.
    ///
    /// # Panics
    /// Panics if `by` is negative.
    pub fn advance(&self, by: Duration) -> DateTime<Utc> {
        let ms = by.num_milliseconds();
        assert!(ms >= 0, "cannot move clock backwards by {}ms", ms);

        let now = self.current_ms.fetch_add(ms, Ordering::SeqCst) + ms;
        millis_to_datetime(now)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at(millis_to_datetime(0))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        millis_to_datetime(self.current_ms.load(Ordering::SeqCst))
    }
}

fn millis_to_datetime(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
}
