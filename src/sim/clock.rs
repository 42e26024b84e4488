//! Injected time and randomness
//!
//! The simulation never reads a wall clock or a global RNG directly. Hosts
//! hand it a `MonotonicTime` each frame and a `RandomRange` source, which
//! keeps spawning deterministic under test.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::time::Duration;

/// A point on a monotonic clock, in nanoseconds since an arbitrary origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct MonotonicTime(u64);

impl MonotonicTime {
    pub const ZERO: Self = Self(0);

    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// From fractional milliseconds (e.g. `performance.now()`)
    pub fn from_millis_f64(ms: f64) -> Self {
        Self((ms.max(0.0) * 1_000_000.0) as u64)
    }

    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future
    pub fn saturating_since(self, earlier: MonotonicTime) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }

    pub fn saturating_add(self, d: Duration) -> Self {
        let nanos = u64::try_from(d.as_nanos()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(nanos))
    }
}

/// Source of monotonic time
pub trait Clock {
    fn now(&self) -> MonotonicTime;
}

/// A clock that only moves when told to.
///
/// Used by the headless host and by tests to get delta-accumulation
/// semantics: advancing by each frame's delta makes "now" equal to the sum
/// of all simulated deltas.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<MonotonicTime>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by a frame delta in seconds. Rounds up to whole nanoseconds.
    pub fn advance_secs(&self, secs: f32) {
        let nanos = (f64::from(secs.max(0.0)) * 1e9).ceil() as u64;
        self.advance(Duration::from_nanos(nanos));
    }

    pub fn advance(&self, d: Duration) {
        self.now.set(self.now.get().saturating_add(d));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> MonotonicTime {
        self.now.get()
    }
}

/// Uniform random values in a closed range
pub trait RandomRange {
    /// A value in `[lo, hi]`. Returns `lo` when the range is empty.
    fn random_range(&mut self, lo: f32, hi: f32) -> f32;
}

impl<R: Rng> RandomRange for R {
    fn random_range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        Rng::random_range(self, lo..=hi)
    }
}

/// Replays a fixed list of values, cycling when it runs out.
///
/// Values are clamped into the requested range.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f32>,
    index: usize,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self {
            values: values.into(),
            index: 0,
        }
    }
}

impl RandomRange for SequenceRandom {
    fn random_range(&mut self, lo: f32, hi: f32) -> f32 {
        if self.values.is_empty() {
            return lo;
        }
        let v = self.values[self.index % self.values.len()];
        self.index += 1;
        v.clamp(lo, hi.max(lo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_manual_clock_accumulates() {
        let clock = ManualClock::new();
        clock.advance_secs(0.5);
        clock.advance_secs(0.5);
        assert_eq!(clock.now(), MonotonicTime::from_nanos(1_000_000_000));
    }

    #[test]
    fn test_saturating_since() {
        let a = MonotonicTime::from_nanos(10);
        let b = MonotonicTime::from_nanos(25);
        assert_eq!(b.saturating_since(a), Duration::from_nanos(15));
        assert_eq!(a.saturating_since(b), Duration::ZERO);
    }

    #[test]
    fn test_pcg_range_is_inclusive_and_bounded() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let x = RandomRange::random_range(&mut rng, 0.0, 736.0);
            assert!((0.0..=736.0).contains(&x));
        }
        assert_eq!(RandomRange::random_range(&mut rng, 5.0, 5.0), 5.0);
    }

    #[test]
    fn test_sequence_random_cycles_and_clamps() {
        let mut r = SequenceRandom::new(vec![10.0, 2000.0]);
        assert_eq!(r.random_range(0.0, 736.0), 10.0);
        assert_eq!(r.random_range(0.0, 736.0), 736.0);
        assert_eq!(r.random_range(0.0, 736.0), 10.0);
    }
}
