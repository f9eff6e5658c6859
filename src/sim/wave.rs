//! Endless wave director
//!
//! Waves are announced, spawned one gnome at a time, and then either wait for
//! every gnome of the wave to die (kill-gated) or simply wait out a fixed delay
//! (duration-gated) before the next, larger wave. The director never owns the
//! gnomes: it hands out [`SpawnOrder`]s and is told about kills.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::clock::Countdown;
use super::enemy::EnemyKind;
use super::events::{GameEvent, MusicCue};
use crate::tuning::WaveTuning;

/// When the director moves on to the next wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdvancePolicy {
    /// Every gnome of the wave must die first
    #[default]
    KillGated,
    /// Next wave after a fixed delay, survivors or not
    DurationGated,
}

/// Gnome count as a function of the wave number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WaveScaling {
    Fixed { count: u32 },
    Linear { base: u32, increment: u32 },
    Exponential { base: f32, exponent: f32 },
}

impl Default for WaveScaling {
    fn default() -> Self {
        WaveScaling::Linear {
            base: 5,
            increment: 2,
        }
    }
}

impl WaveScaling {
    /// Gnomes to spawn in wave `wave` (1-based)
    pub fn enemies_for_wave(&self, wave: u32) -> u32 {
        let wave = wave.max(1);
        match *self {
            WaveScaling::Fixed { count } => count,
            WaveScaling::Linear { base, increment } => {
                base.saturating_add((wave - 1).saturating_mul(increment))
            }
            WaveScaling::Exponential { base, exponent } => {
                let count = (base * (wave as f32).powf(exponent)).round();
                if count.is_finite() && count > 0.0 {
                    count.min(u32::MAX as f32) as u32
                } else {
                    0
                }
            }
        }
    }
}

/// Request to put one gnome into the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnOrder {
    pub wave: u32,
    pub kind: EnemyKind,
    pub position: Vec2,
}

/// Bookkeeping for the wave in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveProgress {
    pub number: u32,
    pub to_spawn: u32,
    pub spawned: u32,
    pub remaining: u32,
}

/// Director phase; each timed phase owns its countdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DirectorPhase {
    /// `start()` not called yet
    Stopped,
    /// Short settle delay before wave 1
    Warmup(Countdown),
    /// Wave banner on screen
    Announcing(Countdown),
    /// Spawning gnomes; countdown paces the next spawn
    Spawning(Countdown),
    /// Kill-gated: all spawned, waiting for the wave to die
    AwaitingClear,
    /// Rest before the next wave
    Intermission(Countdown),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveDirector {
    pub tuning: WaveTuning,
    pub phase: DirectorPhase,
    /// Current wave (`None` before wave 1 is announced)
    pub current: Option<WaveProgress>,
    pub total_kills: u32,
}

impl WaveDirector {
    pub fn new(tuning: WaveTuning) -> Self {
        Self {
            tuning,
            phase: DirectorPhase::Stopped,
            current: None,
            total_kills: 0,
        }
    }

    /// Begin the endless wave sequence. Calling it again has no effect.
    pub fn start(&mut self) {
        if self.phase == DirectorPhase::Stopped {
            self.phase = DirectorPhase::Warmup(Countdown::started(self.tuning.start_delay));
        }
    }

    pub fn wave_number(&self) -> u32 {
        self.current.map(|w| w.number).unwrap_or(0)
    }

    pub fn enemies_remaining(&self) -> u32 {
        self.current.map(|w| w.remaining).unwrap_or(0)
    }

    /// Delay between consecutive spawns in `wave`
    pub fn spawn_delay(&self, wave: u32) -> f32 {
        let shrink = wave.saturating_sub(1) as f32 * self.tuning.spawn_delay_decay;
        (self.tuning.spawn_delay - shrink).max(self.tuning.min_spawn_delay)
    }

    /// Kill callback. Only kills from the current wave count toward clearing it.
    pub fn on_enemy_killed(&mut self, wave: u32) {
        self.total_kills += 1;
        match self.current.as_mut() {
            Some(progress) if progress.number == wave => {
                progress.remaining = progress.remaining.saturating_sub(1);
            }
            _ => log::debug!("Kill from earlier wave {} not counted toward current wave", wave),
        }
    }

    /// Advance timers; returns the gnomes to spawn this tick
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) -> Vec<SpawnOrder> {
        let mut orders = Vec::new();
        match self.phase {
            DirectorPhase::Stopped => {}
            DirectorPhase::Warmup(mut timer) => {
                if timer.tick(dt) {
                    self.begin_wave(1, events);
                } else {
                    self.phase = DirectorPhase::Warmup(timer);
                }
            }
            DirectorPhase::Announcing(mut timer) => {
                if timer.tick(dt) {
                    // First gnome appears as soon as the banner is gone
                    self.spawn_next(rng, &mut orders);
                    self.after_spawn(events);
                } else {
                    self.phase = DirectorPhase::Announcing(timer);
                }
            }
            DirectorPhase::Spawning(mut timer) => {
                if timer.tick(dt) {
                    self.spawn_next(rng, &mut orders);
                    self.after_spawn(events);
                } else {
                    self.phase = DirectorPhase::Spawning(timer);
                }
            }
            DirectorPhase::AwaitingClear => self.check_cleared(events),
            DirectorPhase::Intermission(mut timer) => {
                if timer.tick(dt) {
                    let next = self.wave_number() + 1;
                    self.begin_wave(next, events);
                } else {
                    self.phase = DirectorPhase::Intermission(timer);
                }
            }
        }
        orders
    }

    fn begin_wave(&mut self, number: u32, events: &mut Vec<GameEvent>) {
        let to_spawn = self.tuning.scaling.enemies_for_wave(number);
        self.current = Some(WaveProgress {
            number,
            to_spawn,
            spawned: 0,
            remaining: to_spawn,
        });
        log::info!("Starting wave {}: spawning {} gnomes", number, to_spawn);
        events.push(GameEvent::WaveAnnounced { wave: number });
        events.push(GameEvent::MusicCue(MusicCue::Combat));
        self.phase = DirectorPhase::Announcing(Countdown::started(self.tuning.announce_duration));
    }

    fn spawn_next<R: Rng + ?Sized>(&mut self, rng: &mut R, orders: &mut Vec<SpawnOrder>) {
        let Some(progress) = self.current.as_mut() else {
            return;
        };
        if progress.spawned >= progress.to_spawn {
            return;
        }
        progress.spawned += 1;

        let kinds = &self.tuning.enemy_kinds;
        let points = &self.tuning.spawn_points;
        if kinds.is_empty() || points.is_empty() {
            log::warn!(
                "Wave {}: no enemy kinds or spawn points configured, skipping spawn",
                progress.number
            );
            // The skipped gnome can never die; don't let it hold the wave open
            progress.remaining = progress.remaining.saturating_sub(1);
            return;
        }

        let kind = kinds[rng.random_range(0..kinds.len())];
        let point = points[rng.random_range(0..points.len())];
        orders.push(SpawnOrder {
            wave: progress.number,
            kind,
            position: point,
        });
    }

    fn after_spawn(&mut self, events: &mut Vec<GameEvent>) {
        let Some(progress) = self.current else {
            return;
        };
        if progress.spawned < progress.to_spawn {
            let delay = self.spawn_delay(progress.number);
            self.phase = DirectorPhase::Spawning(Countdown::started(delay));
            return;
        }
        match self.tuning.policy {
            AdvancePolicy::KillGated => {
                self.phase = DirectorPhase::AwaitingClear;
                self.check_cleared(events);
            }
            AdvancePolicy::DurationGated => {
                self.phase =
                    DirectorPhase::Intermission(Countdown::started(self.tuning.time_between_waves));
            }
        }
    }

    fn check_cleared(&mut self, events: &mut Vec<GameEvent>) {
        let Some(progress) = self.current else {
            return;
        };
        if progress.remaining == 0 {
            log::info!("Wave {} cleared", progress.number);
            events.push(GameEvent::WaveCleared {
                wave: progress.number,
            });
            events.push(GameEvent::MusicCue(MusicCue::Calm));
            let rest = Countdown::started(self.tuning.time_between_waves);
            self.phase = DirectorPhase::Intermission(rest);
        }
    }
}
