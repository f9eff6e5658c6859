//! The player character

use serde::{Deserialize, Serialize};

use super::clock::Cooldown;
use super::combat::{AttackMode, DamageOutcome, Damageable};
use super::state::{EntityId, PLAYER_ID};
use crate::tuning::PlayerTuning;

/// Which way the player is looking (attacks land on this side)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub health: i32,
    pub max_health: i32,
    pub score: u32,
    /// Ground position
    pub x: f32,
    pub facing: Facing,
    pub move_speed: f32,
    pub attack_power: f32,
    /// Swings per second
    pub attack_speed: f32,
    /// Radius around the attack point
    pub attack_range: f32,
    /// Distance of the attack point in front of the player
    pub attack_offset: f32,
    pub attack_mode: AttackMode,
    pub attack_cooldown: Cooldown,
    alive: bool,
}

impl Player {
    pub fn new(tuning: &PlayerTuning, x: f32) -> Self {
        let max_health = tuning.max_health.max(1);
        Self {
            name: tuning.name.clone(),
            health: max_health,
            max_health,
            score: 0,
            x,
            facing: Facing::Right,
            move_speed: tuning.move_speed.max(0.0),
            attack_power: tuning.attack_power,
            attack_speed: tuning.attack_speed,
            attack_range: tuning.attack_range.max(0.0),
            attack_offset: tuning.attack_offset,
            attack_mode: tuning.attack_mode,
            attack_cooldown: Cooldown::default(),
            alive: true,
        }
    }

    /// Center of the swing
    pub fn attack_point(&self) -> f32 {
        self.x + self.facing.sign() * self.attack_offset
    }

    /// Integer damage dealt per hit. Fractional power is dropped.
    pub fn attack_damage(&self) -> i32 {
        self.attack_power as i32
    }

    /// Horizontal movement for one tick. Turning follows the input direction.
    pub fn walk(&mut self, axis: f32, dt: f32, min_x: f32, max_x: f32) {
        if !self.alive {
            return;
        }
        let axis = axis.clamp(-1.0, 1.0);
        if axis > 0.0 {
            self.facing = Facing::Right;
        } else if axis < 0.0 {
            self.facing = Facing::Left;
        }
        self.x = (self.x + axis * self.move_speed * dt).clamp(min_x, max_x);
    }

    /// Start a swing if the cooldown allows it
    pub fn try_swing(&mut self, now: f64) -> bool {
        self.alive && self.attack_cooldown.try_trigger(now, self.attack_speed)
    }

    /// Eat a caught fish. Health is capped at `max_health`; score only grows.
    /// Returns `false` (and changes nothing) for a dead player.
    pub fn collect_fish(&mut self, health: i32, score: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = (self.health.saturating_add(health.max(0))).min(self.max_health);
        self.score = self.score.saturating_add(score);
        true
    }
}

impl Damageable for Player {
    fn entity_id(&self) -> EntityId {
        PLAYER_ID
    }

    fn ground_x(&self) -> f32 {
        self.x
    }

    fn health(&self) -> i32 {
        self.health
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if !self.alive || amount <= 0 {
            return DamageOutcome::Ignored;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.health = 0;
            self.alive = false;
            log::info!("{} has perished in battle", self.name);
            return DamageOutcome::Killed;
        }
        DamageOutcome::Hurt {
            remaining: self.health,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(&PlayerTuning::default(), 0.0)
    }

    #[test]
    fn test_damage_clamps_and_kills_once() {
        let mut p = player();
        let max = p.max_health;
        assert_eq!(p.take_damage(max - 10), DamageOutcome::Hurt { remaining: 10 });
        assert_eq!(p.take_damage(50), DamageOutcome::Killed);
        assert_eq!(p.health, 0);
        assert!(!p.is_alive());
        assert_eq!(p.take_damage(5), DamageOutcome::Ignored);
    }

    #[test]
    fn test_collect_fish_caps_health() {
        let mut p = player();
        p.take_damage(15);
        assert!(p.collect_fish(40, 20));
        assert_eq!(p.health, p.max_health);
        assert_eq!(p.score, 20);
    }

    #[test]
    fn test_dead_player_cannot_collect_or_swing() {
        let mut p = player();
        p.take_damage(p.max_health);
        assert!(!p.collect_fish(10, 10));
        assert_eq!(p.score, 0);
        assert!(!p.try_swing(100.0));
    }

    #[test]
    fn test_walk_turns_and_clamps() {
        let mut p = player();
        p.walk(-1.0, 1.0, -2.0, 2.0);
        assert_eq!(p.facing, Facing::Left);
        p.walk(-1.0, 10.0, -2.0, 2.0);
        assert_eq!(p.x, -2.0);
        assert!(p.attack_point() < p.x);
    }

    #[test]
    fn test_attack_damage_truncates_power() {
        let mut p = player();
        p.attack_power = 99.9;
        assert_eq!(p.attack_damage(), 99);
        p.attack_power = 0.6;
        assert_eq!(p.attack_damage(), 0);
    }
}
