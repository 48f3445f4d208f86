//! The time source for contract operations.
//!
//! The contract never calls into the OS for time. It is handed a [`Clock`]
//! at construction, reads it exactly once per operation, and treats that
//! reading as authoritative for the whole call — the same discipline a
//! ledger applies with block timestamps.

use std::sync::atomic::{AtomicU64, Ordering};

use vel_types::Timestamp;

/// Supplies the current ledger time.
///
/// Implementations must be monotonically non-decreasing: a reading is
/// never earlier than any previous reading.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time source for production use.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Manually driven time source for tests, the serial executor, and demos.
///
/// Time only moves forward: [`ManualClock::advance_to`] ignores attempts
/// to step backward and returns the effective reading, mirroring how a
/// ledger clamps a lagging block timestamp to the chain head.
#[derive(Debug, Default)]
pub struct ManualClock {
    secs: AtomicU64,
}

impl ManualClock {
    /// A clock starting at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock starting at `t`.
    pub fn starting_at(t: Timestamp) -> Self {
        Self {
            secs: AtomicU64::new(t.secs()),
        }
    }

    /// Advance to `t`, or stay put if `t` is in the past.
    ///
    /// Returns the effective current time after the call.
    pub fn advance_to(&self, t: Timestamp) -> Timestamp {
        let prev = self.secs.fetch_max(t.secs(), Ordering::SeqCst);
        Timestamp::from_secs(prev.max(t.secs()))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_secs(self.secs.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_tracks_wall_time() {
        let clock = SystemClock;
        // Should be after 2020-01-01 (1577836800 s).
        assert!(clock.now().secs() > 1_577_836_800);
    }

    #[test]
    fn manual_clock_starts_where_told() {
        let clock = ManualClock::starting_at(Timestamp::from_secs(100));
        assert_eq!(clock.now(), Timestamp::from_secs(100));
    }

    #[test]
    fn manual_clock_advances_forward() {
        let clock = ManualClock::new();
        let effective = clock.advance_to(Timestamp::from_secs(50));
        assert_eq!(effective, Timestamp::from_secs(50));
        assert_eq!(clock.now(), Timestamp::from_secs(50));
    }

    #[test]
    fn manual_clock_never_goes_backward() {
        let clock = ManualClock::starting_at(Timestamp::from_secs(200));
        let effective = clock.advance_to(Timestamp::from_secs(150));
        assert_eq!(effective, Timestamp::from_secs(200));
        assert_eq!(clock.now(), Timestamp::from_secs(200));
    }
}
