//! Gnome enemies
//!
//! Each gnome walks toward the player along the ground, attacks on a cooldown
//! while in range, and plays out a death fade before it is removed from the
//! world. Kill accounting is claimed through [`Enemy::claim_kill_reward`], which
//! yields at most once per gnome.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::clock::{Cooldown, Countdown, uniform};
use super::combat::{DamageOutcome, Damageable};
use super::state::EntityId;
use crate::tuning::EnemyTuning;

/// Gnome varieties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Garden,
    Berserker,
    Brute,
}

/// Fixed per-kind stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindStats {
    pub name: &'static str,
    pub damage: i32,
    pub movement_speed: f32,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Garden, EnemyKind::Berserker, EnemyKind::Brute];

    pub fn stats(&self) -> KindStats {
        match self {
            EnemyKind::Garden => KindStats {
                name: "C_Common_Gnome",
                damage: 10,
                movement_speed: 0.5,
            },
            EnemyKind::Berserker => KindStats {
                name: "C_Berserker_Gnome",
                damage: 5,
                movement_speed: 1.5,
            },
            EnemyKind::Brute => KindStats {
                name: "C_Brute_Gnome",
                damage: 20,
                movement_speed: 0.3,
            },
        }
    }
}

/// Enemy behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyState {
    /// Walking toward the player
    Seeking,
    /// Within reach, waiting on the cooldown
    InRange,
    /// Swung at the player this tick
    Attacking,
    /// Health hit zero; fading out
    Dying { fade: Countdown },
    /// Ready for removal
    Dead,
}

impl EnemyState {
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            EnemyState::Seeking | EnemyState::InRange | EnemyState::Attacking
        )
    }
}

/// A swing at the player the enemy wants applied this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackIntent {
    pub attacker: EntityId,
    pub damage: i32,
    /// Ground position the swing is centred on
    pub origin: f32,
    pub reach: f32,
}

/// What the player looks like to an enemy this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub x: f32,
    pub alive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub name: String,
    pub pos: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub damage: i32,
    pub movement_speed: f32,
    pub attack_speed: f32,
    pub attack_range: f32,
    /// Size multiplier rolled at spawn, presentation only
    pub scale: f32,
    /// Wave this gnome belongs to
    pub wave: u32,
    pub state: EnemyState,
    pub cooldown: Cooldown,
    death_fade: f32,
    reward_claimed: bool,
}

impl Enemy {
    /// Build a gnome of `kind` at `pos`. Size and speed variance are rolled here
    /// and never again.
    pub fn spawn<R: Rng + ?Sized>(
        id: EntityId,
        kind: EnemyKind,
        pos: Vec2,
        health: i32,
        wave: u32,
        tuning: &EnemyTuning,
        rng: &mut R,
    ) -> Self {
        let stats = kind.stats();
        let scale = uniform(rng, tuning.scale_min, tuning.scale_max);
        let speed_multiplier =
            uniform(rng, tuning.speed_multiplier_min, tuning.speed_multiplier_max);
        let health = health.max(1);

        Self {
            id,
            kind,
            name: stats.name.to_string(),
            pos,
            health,
            max_health: health,
            damage: stats.damage,
            movement_speed: (stats.movement_speed * speed_multiplier).max(0.0),
            attack_speed: tuning.attack_speed,
            attack_range: tuning.attack_range.max(0.0),
            scale,
            wave,
            state: EnemyState::Seeking,
            cooldown: Cooldown::default(),
            death_fade: tuning.death_fade,
            reward_claimed: false,
        }
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.state, EnemyState::Dead)
    }

    pub fn is_dying(&self) -> bool {
        matches!(self.state, EnemyState::Dying { .. })
    }

    /// Yields the gnome's wave the first time it is called after death
    pub fn claim_kill_reward(&mut self) -> Option<u32> {
        if self.state.is_active() || self.reward_claimed {
            return None;
        }
        self.reward_claimed = true;
        Some(self.wave)
    }

    /// Advance one tick. Returns an attack to apply against the player, if any.
    pub fn update(&mut self, player: PlayerView, now: f64, dt: f32) -> Option<AttackIntent> {
        match &mut self.state {
            EnemyState::Dying { fade } => {
                if fade.tick(dt) {
                    self.state = EnemyState::Dead;
                }
                return None;
            }
            EnemyState::Dead => return None,
            _ => {}
        }

        if !player.alive {
            self.state = EnemyState::Seeking;
            return None;
        }

        let dx = player.x - self.pos.x;
        if dx.abs() > self.attack_range {
            // Ground-locked: only the horizontal component moves, never past reach
            let step = self.movement_speed * dt;
            let travel = (dx.abs() - self.attack_range).min(step);
            self.pos.x += dx.signum() * travel;
            self.state = EnemyState::Seeking;
            if (player.x - self.pos.x).abs() > self.attack_range {
                return None;
            }
        }

        if self.cooldown.try_trigger(now, self.attack_speed) {
            self.state = EnemyState::Attacking;
            log::debug!("{} attacks for {} damage", self.name, self.damage);
            Some(AttackIntent {
                attacker: self.id,
                damage: self.damage,
                origin: self.pos.x,
                reach: self.attack_range,
            })
        } else {
            self.state = EnemyState::InRange;
            None
        }
    }
}

impl Damageable for Enemy {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn ground_x(&self) -> f32 {
        self.pos.x
    }

    fn health(&self) -> i32 {
        self.health
    }

    fn is_alive(&self) -> bool {
        self.state.is_active()
    }

    fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if !self.state.is_active() || amount <= 0 {
            return DamageOutcome::Ignored;
        }
        self.health = (self.health - amount).max(0);
        if self.health == 0 {
            self.state = EnemyState::Dying {
                fade: Countdown::started(self.death_fade),
            };
            return DamageOutcome::Killed;
        }
        DamageOutcome::Hurt {
            remaining: self.health,
        }
    }
}
