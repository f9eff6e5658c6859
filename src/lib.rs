//! Gnome Fjord - wave survival with a side of fishing
//!
//! Core modules:
//! - `sim`: Deterministic simulation (waves, combat, fishing, game state)
//! - `tuning`: Data-driven game balance
//! - `settings`: Persisted player preferences
//! - `audio`: Calm/combat music crossfade

pub mod audio;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use audio::MusicMixer;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Default simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Gravity applied to flying fish by the headless runner
    pub const GRAVITY: f32 = -9.81;
    /// Ground height fish come to rest on
    pub const GROUND_Y: f32 = 0.0;
    /// Distance at which the player picks up a landed fish
    pub const PICKUP_RADIUS: f32 = 0.75;
}
