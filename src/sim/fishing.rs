//! Fishing mini-game
//!
//! `Idle → WaitingForBite → BiteAvailable → ReelingIn → Idle`
//!
//! Casting draws a random bite wait. Once the fish bites, the player starts
//! reeling and must keep holding until `reel_in_duration` seconds of hold time
//! have accumulated; letting go early loses the fish. Leaving the fishing zone
//! cancels whatever is in progress, including a pending bite.

use glam::Vec2;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use super::clock::{Countdown, TIME_EPSILON, uniform, uniform_inclusive};
use super::events::GameEvent;
use crate::tuning::{CatchEntry, FishingTuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FishingState {
    #[default]
    Idle,
    WaitingForBite,
    BiteAvailable,
    ReelingIn,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FishingOutcome {
    Caught,
    Lost,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishingSession {
    state: FishingState,
    /// Seconds of hold accumulated while reeling
    progress: f64,
    bite: Countdown,
    min_bite_time: f32,
    max_bite_time: f32,
    reel_in_duration: f32,
}

impl FishingSession {
    pub fn new(tuning: &FishingTuning) -> Self {
        Self {
            state: FishingState::Idle,
            progress: 0.0,
            bite: Countdown::default(),
            min_bite_time: tuning.min_bite_time,
            max_bite_time: tuning.max_bite_time,
            reel_in_duration: tuning.reel_in_duration,
        }
    }

    pub fn state(&self) -> FishingState {
        self.state
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_reeling(&self) -> bool {
        self.state == FishingState::ReelingIn
    }

    /// Seconds until the bite, while waiting
    pub fn bite_remaining(&self) -> Option<f64> {
        self.bite.remaining()
    }

    fn set_state(&mut self, to: FishingState, events: &mut Vec<GameEvent>) {
        let from = self.state;
        if from == to {
            return;
        }
        if from == FishingState::ReelingIn {
            self.progress = 0.0;
        }
        self.state = to;
        events.push(GameEvent::FishingStateChanged { from, to });
    }

    fn resolve(&mut self, outcome: FishingOutcome, events: &mut Vec<GameEvent>) -> FishingOutcome {
        self.bite.cancel();
        self.set_state(FishingState::Idle, events);
        self.progress = 0.0;
        events.push(GameEvent::FishingResolved(outcome));
        outcome
    }

    /// Throw the line. Only from Idle and only inside the fishing zone.
    pub fn cast<R: Rng + ?Sized>(
        &mut self,
        in_zone: bool,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if !in_zone || self.state != FishingState::Idle {
            log::debug!("Cast ignored (in_zone={}, state={:?})", in_zone, self.state);
            return false;
        }
        let wait = uniform(rng, self.min_bite_time, self.max_bite_time);
        self.bite.start(wait);
        log::info!("Line cast, waiting {:.2}s for a bite", wait);
        self.set_state(FishingState::WaitingForBite, events);
        true
    }

    /// Begin reeling a biting fish
    pub fn start_reel(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if self.state != FishingState::BiteAvailable {
            log::debug!("Reel ignored in state {:?}", self.state);
            return false;
        }
        self.progress = 0.0;
        self.set_state(FishingState::ReelingIn, events);
        true
    }

    /// Let go of the line. Loses the fish while reeling; ignored otherwise.
    pub fn release(&mut self, events: &mut Vec<GameEvent>) -> Option<FishingOutcome> {
        if self.state != FishingState::ReelingIn {
            return None;
        }
        log::info!("The fish got away");
        Some(self.resolve(FishingOutcome::Lost, events))
    }

    /// Abort any session in progress (player left the zone)
    pub fn cancel(&mut self, events: &mut Vec<GameEvent>) -> Option<FishingOutcome> {
        if self.state == FishingState::Idle {
            self.bite.cancel();
            return None;
        }
        log::info!("Fishing cancelled");
        Some(self.resolve(FishingOutcome::Cancelled, events))
    }

    /// Advance timers. `hold` is whether the reel button is down this tick.
    pub fn update(
        &mut self,
        dt: f32,
        hold: bool,
        events: &mut Vec<GameEvent>,
    ) -> Option<FishingOutcome> {
        match self.state {
            FishingState::Idle | FishingState::BiteAvailable => None,
            FishingState::WaitingForBite => {
                if self.bite.tick(dt) {
                    log::info!("Bite! Start reeling");
                    self.set_state(FishingState::BiteAvailable, events);
                }
                None
            }
            FishingState::ReelingIn => {
                if !hold {
                    return self.release(events);
                }
                if dt.is_finite() && dt > 0.0 {
                    self.progress += dt as f64;
                }
                if self.progress + TIME_EPSILON >= self.reel_in_duration as f64 {
                    log::info!("Fish landed on the line");
                    return Some(self.resolve(FishingOutcome::Caught, events));
                }
                None
            }
        }
    }
}

/// Weighted pick from the catch table. `None` when the table is unusable.
pub fn pick_catch<'a, R: Rng + ?Sized>(
    table: &'a [CatchEntry],
    rng: &mut R,
) -> Option<&'a CatchEntry> {
    match WeightedIndex::new(table.iter().map(|entry| entry.weight)) {
        Ok(dist) => table.get(dist.sample(rng)),
        Err(err) => {
            log::warn!("Catch table unusable ({}), no fish spawned", err);
            None
        }
    }
}

/// Launch impulse for a caught fish: toward the player horizontally, upward
/// vertically, both magnitudes drawn from the configured ranges
pub fn launch_impulse<R: Rng + ?Sized>(
    tuning: &FishingTuning,
    origin: Vec2,
    player_x: f32,
    rng: &mut R,
) -> Vec2 {
    let toward = player_x - origin.x;
    let direction = if toward.abs() > f32::EPSILON {
        toward.signum()
    } else {
        tuning.launch_direction.signum()
    };
    let horizontal = uniform_inclusive(
        rng,
        tuning.launch_horizontal_min,
        tuning.launch_horizontal_max,
    );
    let vertical = uniform_inclusive(rng, tuning.launch_vertical_min, tuning.launch_vertical_max);
    Vec2::new(direction * horizontal, vertical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn session(min: f32, max: f32, reel: f32) -> FishingSession {
        FishingSession::new(&FishingTuning {
            min_bite_time: min,
            max_bite_time: max,
            reel_in_duration: reel,
            ..FishingTuning::default()
        })
    }

    fn bite(s: &mut FishingSession, events: &mut Vec<GameEvent>) {
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(s.cast(true, &mut rng, events));
        s.update(100.0, false, events);
        assert_eq!(s.state(), FishingState::BiteAvailable);
    }

    #[test]
    fn test_cast_requires_zone_and_idle() {
        let mut s = session(1.0, 2.0, 3.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();
        assert!(!s.cast(false, &mut rng, &mut events));
        assert!(s.cast(true, &mut rng, &mut events));
        assert!(!s.cast(true, &mut rng, &mut events));
        assert_eq!(s.state(), FishingState::WaitingForBite);
        let wait = s.bite_remaining().unwrap_or_default();
        assert!((1.0..2.0).contains(&wait));
    }

    #[test]
    fn test_bite_at_exact_time() {
        let mut s = session(10.0, 10.0, 3.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();
        s.cast(true, &mut rng, &mut events);
        for _ in 0..599 {
            s.update(1.0 / 60.0, false, &mut events);
        }
        assert_eq!(s.state(), FishingState::WaitingForBite);
        s.update(1.0 / 60.0, false, &mut events);
        assert_eq!(s.state(), FishingState::BiteAvailable);
    }

    #[test]
    fn test_reel_requires_bite() {
        let mut s = session(5.0, 6.0, 3.0);
        let mut events = Vec::new();
        assert!(!s.start_reel(&mut events));
        let mut rng = Pcg32::seed_from_u64(1);
        s.cast(true, &mut rng, &mut events);
        assert!(!s.start_reel(&mut events));
        assert_eq!(s.state(), FishingState::WaitingForBite);
    }

    #[test]
    fn test_hold_full_duration_catches() {
        let mut s = session(0.0, 0.0, 3.0);
        let mut events = Vec::new();
        bite(&mut s, &mut events);
        assert!(s.start_reel(&mut events));
        let mut outcome = None;
        for _ in 0..300 {
            outcome = s.update(0.01, true, &mut events);
            if outcome.is_some() {
                break;
            }
        }
        assert_eq!(outcome, Some(FishingOutcome::Caught));
        assert_eq!(s.state(), FishingState::Idle);
        assert_eq!(s.progress(), 0.0);
    }

    #[test]
    fn test_release_early_loses() {
        let mut s = session(0.0, 0.0, 3.0);
        let mut events = Vec::new();
        bite(&mut s, &mut events);
        s.start_reel(&mut events);
        for _ in 0..299 {
            assert_eq!(s.update(0.01, true, &mut events), None);
        }
        assert!((s.progress() - 2.99).abs() < 1e-4);
        assert_eq!(s.release(&mut events), Some(FishingOutcome::Lost));
        assert_eq!(s.progress(), 0.0);
        assert_eq!(s.state(), FishingState::Idle);
    }

    #[test]
    fn test_tick_without_hold_loses() {
        let mut s = session(0.0, 0.0, 3.0);
        let mut events = Vec::new();
        bite(&mut s, &mut events);
        s.start_reel(&mut events);
        assert_eq!(s.update(0.1, false, &mut events), Some(FishingOutcome::Lost));
    }

    #[test]
    fn test_release_on_reel_start_loses() {
        let mut s = session(0.0, 0.0, 3.0);
        let mut events = Vec::new();
        bite(&mut s, &mut events);
        s.start_reel(&mut events);
        assert_eq!(s.release(&mut events), Some(FishingOutcome::Lost));
    }

    #[test]
    fn test_reel_time_independent_of_frame_rate() {
        for fps in [10u32, 30, 60, 144] {
            let dt = 1.0 / fps as f32;
            let mut s = session(0.0, 0.0, 3.0);
            let mut events = Vec::new();
            bite(&mut s, &mut events);
            assert!(s.start_reel(&mut events));

            // The tick reeling starts on counts toward the hold
            let needed = 3 * fps;
            for _ in 0..needed - 1 {
                assert_eq!(s.update(dt, true, &mut events), None, "fps {fps}");
            }
            assert_eq!(
                s.update(dt, true, &mut events),
                Some(FishingOutcome::Caught),
                "fps {fps}"
            );
        }
    }

    #[test]
    fn test_cancel_during_wait_never_bites() {
        let mut s = session(1.0, 1.0, 3.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();
        s.cast(true, &mut rng, &mut events);
        s.update(0.99, false, &mut events);
        assert_eq!(s.cancel(&mut events), Some(FishingOutcome::Cancelled));
        assert_eq!(s.cancel(&mut events), None);
        for _ in 0..100 {
            s.update(1.0, false, &mut events);
        }
        assert_eq!(s.state(), FishingState::Idle);
        assert!(!events.iter().any(|e| matches!(
            e,
            GameEvent::FishingStateChanged { to: FishingState::BiteAvailable, .. }
        )));
    }

    #[test]
    fn test_pick_catch_respects_weights() {
        let table = FishingTuning::default().catch_table;
        let mut rng = Pcg32::seed_from_u64(42);
        let mut counts = [0u32; 2];
        for _ in 0..10_000 {
            let entry = pick_catch(&table, &mut rng).map(|e| e.species.clone());
            if entry.as_deref() == Some(table[0].species.as_str()) {
                counts[0] += 1;
            } else {
                counts[1] += 1;
            }
        }
        let share = counts[0] as f32 / 10_000.0;
        assert!((share - 0.6).abs() < 0.03, "share={share}");
    }

    #[test]
    fn test_pick_catch_empty_table() {
        let mut rng = Pcg32::seed_from_u64(42);
        assert!(pick_catch(&[], &mut rng).is_none());
    }

    #[test]
    fn test_launch_points_at_player() {
        let tuning = FishingTuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let left = launch_impulse(&tuning, Vec2::new(5.0, 0.0), 0.0, &mut rng);
        assert!(left.x < 0.0 && left.y > 0.0);
        let range = tuning.launch_horizontal_min..=tuning.launch_horizontal_max;
        assert!(range.contains(&left.x.abs()));
        let right = launch_impulse(&tuning, Vec2::new(-5.0, 0.0), 0.0, &mut rng);
        assert!(right.x > 0.0);
    }
}
