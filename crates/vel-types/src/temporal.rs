use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Ledger time: seconds since the UNIX epoch.
///
/// The contract never reads wall-clock time itself; every operation is
/// handed a `Timestamp` by its clock exactly once, the way a ledger hands
/// a transaction its block timestamp. Ordering is plain integer ordering.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from seconds since the UNIX epoch.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Seconds since the UNIX epoch.
    pub const fn secs(self) -> u64 {
        self.0
    }

    /// The zero timestamp (epoch).
    pub const fn zero() -> Self {
        Self(0)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self(secs)
    }

    /// This timestamp advanced by `secs` seconds, saturating at the maximum.
    pub const fn saturating_add(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}s)", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The voting window of an election: half-open interval `[start, end)`.
///
/// `start < end` is enforced at construction and holds for the lifetime of
/// the value. A vote at exactly `end` is outside the window; closing the
/// election at exactly `end` is allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: Timestamp,
    end: Timestamp,
}

impl TimeWindow {
    /// Create a window, rejecting `start >= end`.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, TypeError> {
        if start >= end {
            return Err(TypeError::EmptyWindow {
                start: start.secs(),
                end: end.secs(),
            });
        }
        Ok(Self { start, end })
    }

    /// When voting opens.
    pub const fn start(&self) -> Timestamp {
        self.start
    }

    /// When voting closes (exclusive).
    pub const fn end(&self) -> Timestamp {
        self.end
    }

    /// `true` if `t` falls inside `[start, end)`.
    pub fn contains(&self, t: Timestamp) -> bool {
        t >= self.start && t < self.end
    }

    /// `true` once `t` has reached `start`.
    pub fn has_started(&self, t: Timestamp) -> bool {
        t >= self.start
    }

    /// `true` once `t` has reached `end`.
    pub fn has_ended(&self, t: Timestamp) -> bool {
        t >= self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
