//! Elapsed-time source and countdown helpers
//!
//! Every wait in the simulation (bite timers, death fades, wave pacing) is a
//! [`Countdown`] owned by exactly one state machine. Countdowns accumulate the
//! same `dt` the rest of the tick uses, so firing time depends only on the total
//! elapsed time and not on how it was sliced into frames.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tolerance for comparing accumulated float time against a deadline
pub const TIME_EPSILON: f64 = 1e-6;

/// Monotonic simulation clock
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    elapsed: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds. Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt as f64;
        }
    }

    /// Seconds since the clock was created
    #[inline]
    pub fn now(&self) -> f64 {
        self.elapsed
    }
}

/// A resumable, cancellable wait
///
/// `tick` returns `true` exactly once, on the step where the accumulated time
/// reaches the duration. A cancelled countdown never fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: Option<f64>,
}

impl Countdown {
    /// A countdown that is already running
    pub fn started(duration: f32) -> Self {
        let mut countdown = Self::default();
        countdown.start(duration);
        countdown
    }

    /// (Re)start the wait. Non-positive durations fire on the next tick.
    pub fn start(&mut self, duration: f32) {
        self.remaining = Some(duration.max(0.0) as f64);
    }

    /// Abort the wait. Safe to call any number of times.
    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Seconds left, or `None` when idle
    pub fn remaining(&self) -> Option<f64> {
        self.remaining
    }

    /// Accumulate `dt`; returns `true` on the step the wait completes
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.remaining.as_mut() else {
            return false;
        };
        if dt.is_finite() && dt > 0.0 {
            *remaining -= dt as f64;
        }
        if *remaining <= TIME_EPSILON {
            self.remaining = None;
            return true;
        }
        false
    }
}

/// Rate limiter for attacks ("attacks per second")
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    ready_at: f64,
}

impl Cooldown {
    #[inline]
    pub fn is_ready(&self, now: f64) -> bool {
        now + TIME_EPSILON >= self.ready_at
    }

    /// Next time an action may be issued
    pub fn ready_at(&self) -> f64 {
        self.ready_at
    }

    /// Consume the cooldown if ready. Returns `false` (and changes nothing) when
    /// called early or with a non-positive rate.
    pub fn try_trigger(&mut self, now: f64, rate: f32) -> bool {
        if rate <= 0.0 || !self.is_ready(now) {
            return false;
        }
        self.ready_at = now + 1.0 / rate as f64;
        true
    }
}

/// Uniform draw in `[min, max)`, collapsing to `min` for a degenerate range
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Uniform draw in `[min, max]`, collapsing to `min` for a degenerate range
pub fn uniform_inclusive<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..=max)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_countdown_fires_once() {
        let mut countdown = Countdown::started(1.0);
        assert!(!countdown.tick(0.5));
        assert!(countdown.tick(0.5));
        assert!(!countdown.tick(0.5));
        assert!(!countdown.is_running());
    }

    #[test]
    fn test_countdown_frame_rate_independent() {
        for steps in [10u32, 60, 144, 1000] {
            let dt = 10.0 / steps as f32;
            let mut countdown = Countdown::started(10.0);
            let fired_at = (1..=steps).find(|_| countdown.tick(dt));
            assert_eq!(fired_at, Some(steps), "steps={steps}");
        }
    }

    #[test]
    fn test_cancel_is_idempotent_and_final() {
        let mut countdown = Countdown::started(0.1);
        countdown.cancel();
        countdown.cancel();
        assert!(!countdown.tick(5.0));
        assert_eq!(countdown.remaining(), None);
    }

    #[test]
    fn test_cooldown_blocks_early_attempts() {
        let mut cooldown = Cooldown::default();
        assert!(cooldown.try_trigger(0.0, 2.0));
        assert!(!cooldown.try_trigger(0.25, 2.0));
        assert!((cooldown.ready_at() - 0.5).abs() < 1e-9);
        assert!(cooldown.try_trigger(0.5, 2.0));
        assert!(!cooldown.try_trigger(10.0, 0.0));
    }

    #[test]
    fn test_clock_ignores_bad_deltas() {
        let mut clock = Clock::new();
        clock.advance(0.5);
        clock.advance(-1.0);
        clock.advance(f32::NAN);
        assert!((clock.now() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_uniform_degenerate_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(uniform(&mut rng, 10.0, 10.0), 10.0);
        let v = uniform(&mut rng, 1.0, 2.0);
        assert!((1.0..2.0).contains(&v));
    }
}
