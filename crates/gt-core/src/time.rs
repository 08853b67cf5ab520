//! Time model.
//!
//! # Design
//!
//! The engine never reads a clock.  Every instant is supplied by the caller
//! as a `Timestamp`: an integer count of milliseconds on whatever monotonic
//! or epoch-based clock the upstream feed uses.  Integer milliseconds keep
//! threshold comparisons exact, so a state transition at "10 000 ms elapsed"
//! happens at exactly that instant regardless of how often `tick` runs.

use std::fmt;
use std::time::Duration;

/// An instant, in milliseconds on the caller's clock.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    #[inline]
    pub const fn from_millis(ms: u64) -> Self {
        Timestamp(ms)
    }

    #[inline]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`.
    ///
    /// Saturates to 0 when `earlier` is after `self`, so a caller whose
    /// clock briefly runs behind an update timestamp sees "just updated"
    /// rather than a wrapped-around age.
    #[inline]
    pub fn since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// `self` shifted forward by `ms` milliseconds.
    #[inline]
    pub fn offset(self, ms: u64) -> Timestamp {
        Timestamp(self.0.saturating_add(ms))
    }
}

impl std::ops::Add<u64> for Timestamp {
    type Output = Timestamp;
    #[inline]
    fn add(self, rhs: u64) -> Timestamp {
        self.offset(rhs)
    }
}

impl std::ops::Add<Duration> for Timestamp {
    type Output = Timestamp;
    #[inline]
    fn add(self, rhs: Duration) -> Timestamp {
        self.offset(u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX))
    }
}

impl std::ops::Sub for Timestamp {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Timestamp) -> u64 {
        self.since(rhs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}ms", self.0)
    }
}
