//! Data-driven game balance
//!
//! Every number the simulation uses lives here. Defaults reproduce the shipped
//! balance; a JSON file can override any subset of fields.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::combat::{AttackMode, TargetSelection};
use crate::sim::enemy::EnemyKind;
use crate::sim::wave::{AdvancePolicy, WaveScaling};

#[derive(Error, Debug)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub name: String,
    pub max_health: i32,
    pub move_speed: f32,
    pub attack_power: f32,
    /// Swings per second
    pub attack_speed: f32,
    pub attack_range: f32,
    pub attack_offset: f32,
    pub attack_mode: AttackMode,
    pub target_selection: TargetSelection,
    pub start_x: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            name: "Ragnar".to_string(),
            max_health: 100,
            move_speed: 5.0,
            attack_power: 100.0,
            attack_speed: 1.5,
            attack_range: 1.2,
            attack_offset: 1.0,
            attack_mode: AttackMode::Melee,
            target_selection: TargetSelection::Nearest,
            start_x: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Health given to every spawned gnome in wave 1
    pub spawn_health: i32,
    /// Extra health per wave after the first
    pub health_per_wave: i32,
    pub attack_speed: f32,
    pub attack_range: f32,
    pub scale_min: f32,
    pub scale_max: f32,
    pub speed_multiplier_min: f32,
    pub speed_multiplier_max: f32,
    /// Seconds a dead gnome lingers before removal
    pub death_fade: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            spawn_health: 100,
            health_per_wave: 0,
            attack_speed: 1.0,
            attack_range: 1.0,
            scale_min: 0.8,
            scale_max: 1.2,
            speed_multiplier_min: 0.8,
            speed_multiplier_max: 1.2,
            death_fade: 1.5,
        }
    }
}

impl EnemyTuning {
    /// Spawn health for gnomes of `wave`
    pub fn health_for_wave(&self, wave: u32) -> i32 {
        let bonus = (wave.saturating_sub(1) as i32).saturating_mul(self.health_per_wave);
        self.spawn_health.saturating_add(bonus).max(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    pub policy: AdvancePolicy,
    pub scaling: WaveScaling,
    pub start_delay: f32,
    pub announce_duration: f32,
    pub spawn_delay: f32,
    /// Spawn delay reduction per wave
    pub spawn_delay_decay: f32,
    pub min_spawn_delay: f32,
    pub time_between_waves: f32,
    pub enemy_kinds: Vec<EnemyKind>,
    pub spawn_points: Vec<Vec2>,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            policy: AdvancePolicy::KillGated,
            scaling: WaveScaling::default(),
            start_delay: 0.5,
            announce_duration: 2.0,
            spawn_delay: 1.0,
            spawn_delay_decay: 0.05,
            min_spawn_delay: 0.3,
            time_between_waves: 10.0,
            enemy_kinds: EnemyKind::ALL.to_vec(),
            spawn_points: vec![Vec2::new(-12.0, 0.0), Vec2::new(12.0, 0.0)],
        }
    }
}

/// One row of the catch table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchEntry {
    pub species: String,
    pub weight: f32,
    pub health_value: i32,
    pub score_value: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FishingTuning {
    pub min_bite_time: f32,
    pub max_bite_time: f32,
    pub reel_in_duration: f32,
    pub catch_table: Vec<CatchEntry>,
    /// Where caught fish leave the water
    pub water_spawn_point: Vec2,
    pub launch_horizontal_min: f32,
    pub launch_horizontal_max: f32,
    pub launch_vertical_min: f32,
    pub launch_vertical_max: f32,
    /// Horizontal sign used when the player stands right above the spawn point
    pub launch_direction: f32,
    /// Reported speed below which a flying fish counts as landed
    pub landing_speed: f32,
    /// Seconds a landed fish stays collectible
    pub collectible_ttl: f32,
}

impl Default for FishingTuning {
    fn default() -> Self {
        Self {
            min_bite_time: 10.0,
            max_bite_time: 30.0,
            reel_in_duration: 3.0,
            catch_table: vec![
                CatchEntry {
                    species: "Perch".to_string(),
                    weight: 0.6,
                    health_value: 20,
                    score_value: 20,
                },
                CatchEntry {
                    species: "Pike".to_string(),
                    weight: 0.4,
                    health_value: 30,
                    score_value: 40,
                },
            ],
            water_spawn_point: Vec2::new(16.0, -1.0),
            launch_horizontal_min: 8.0,
            launch_horizontal_max: 12.0,
            launch_vertical_min: 2.5,
            launch_vertical_max: 3.5,
            launch_direction: -1.0,
            landing_speed: 0.5,
            collectible_ttl: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PileTuning {
    pub capacity: usize,
    /// Pile area center and half extents
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Default for PileTuning {
    fn default() -> Self {
        Self {
            capacity: 60,
            center: Vec2::new(-6.0, 0.0),
            half_extents: Vec2::new(0.5, 0.5),
        }
    }
}

/// Complete game balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub waves: WaveTuning,
    pub fishing: FishingTuning,
    pub pile: PileTuning,
    /// Walkable ground span
    pub world_min_x: f32,
    pub world_max_x: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            waves: WaveTuning::default(),
            fishing: FishingTuning::default(),
            pile: PileTuning::default(),
            world_min_x: -15.0,
            world_max_x: 15.0,
        }
    }
}

impl Tuning {
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn check(ok: bool, what: &str) -> Result<(), TuningError> {
            if ok { Ok(()) } else { Err(TuningError::Invalid(what.to_string())) }
        }

        let f = &self.fishing;
        check(f.min_bite_time >= 0.0, "fishing.min_bite_time must be >= 0")?;
        check(f.max_bite_time >= f.min_bite_time, "fishing.max_bite_time < min_bite_time")?;
        check(f.reel_in_duration > 0.0, "fishing.reel_in_duration must be > 0")?;
        check(
            f.launch_horizontal_max >= f.launch_horizontal_min,
            "fishing.launch_horizontal_max < launch_horizontal_min",
        )?;
        check(
            f.launch_vertical_max >= f.launch_vertical_min,
            "fishing.launch_vertical_max < launch_vertical_min",
        )?;
        check(f.catch_table.iter().all(|e| e.weight >= 0.0), "catch weights must be >= 0")?;

        let e = &self.enemy;
        check(e.attack_speed > 0.0, "enemy.attack_speed must be > 0")?;
        check(e.scale_max >= e.scale_min, "enemy.scale_max < scale_min")?;
        check(
            e.speed_multiplier_min >= 0.0 && e.speed_multiplier_max >= e.speed_multiplier_min,
            "enemy speed multiplier range invalid",
        )?;

        let w = &self.waves;
        check(w.min_spawn_delay >= 0.0, "waves.min_spawn_delay must be >= 0")?;
        check(w.time_between_waves >= 0.0, "waves.time_between_waves must be >= 0")?;

        check(self.player.attack_speed > 0.0, "player.attack_speed must be > 0")?;
        check(self.player.max_health > 0, "player.max_health must be > 0")?;
        check(self.world_max_x >= self.world_min_x, "world_max_x < world_min_x")?;
        Ok(())
    }
}
