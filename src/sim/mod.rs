//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit `dt` per tick, accumulated in `f64`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or physics engine dependencies

pub mod clock;
pub mod collectible;
pub mod combat;
pub mod enemy;
pub mod events;
pub mod fishing;
pub mod pile;
pub mod player;
pub mod state;
pub mod tick;
pub mod wave;

pub use clock::{Clock, Cooldown, Countdown};
pub use collectible::{Collectible, CollectiblePhase};
pub use combat::{AttackMode, AttackReport, DamageOutcome, Damageable, TargetSelection};
pub use enemy::{Enemy, EnemyKind, EnemyState};
pub use events::{EnemyPhase, GameEvent, MusicCue, PhysicsCommand, PhysicsReport};
pub use fishing::{FishingOutcome, FishingSession, FishingState};
pub use pile::Pile;
pub use player::{Facing, Player};
pub use state::{EntityId, GamePhase, GameState, PLAYER_ID, PiledFish};
pub use tick::{TickInput, tick};
pub use wave::{AdvancePolicy, DirectorPhase, SpawnOrder, WaveDirector, WaveScaling};
