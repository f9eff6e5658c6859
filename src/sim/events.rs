//! Outgoing notifications and physics commands
//!
//! The simulation never renders, plays sounds, or moves rigid bodies itself.
//! Each tick it queues [`GameEvent`]s for the presentation layer and
//! [`PhysicsCommand`]s for the physics collaborator; callers drain both.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyKind;
use super::fishing::{FishingOutcome, FishingState};
use super::state::EntityId;

/// Music mood requested by gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicCue {
    Calm,
    Combat,
}

/// Enemy transitions the presentation layer animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPhase {
    Attacking,
    Dying,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveAnnounced { wave: u32 },
    WaveCleared { wave: u32 },
    EnemySpawned { id: EntityId, kind: EnemyKind, position: Vec2, scale: f32 },
    EnemyStateChanged { id: EntityId, phase: EnemyPhase },
    EnemyHurt { id: EntityId, damage: i32, remaining: i32 },
    EnemyRemoved { id: EntityId },
    /// Player swung; `hits` is how many gnomes were struck
    PlayerSwing { hits: usize },
    PlayerHurt { attacker: EntityId, damage: i32, health: i32 },
    PlayerDied,
    HealthChanged { health: i32, max_health: i32 },
    ScoreChanged { score: u32 },
    FishingStateChanged { from: FishingState, to: FishingState },
    FishingResolved(FishingOutcome),
    FishCaught { id: EntityId, species: String },
    FishLanded { id: EntityId },
    FishCollected { id: EntityId, health: i32, score: u32 },
    FishExpired { id: EntityId },
    /// Collected fish placed on the pile
    FishPiled { id: EntityId, position: Vec2, rotation: f32 },
    /// Fish dropped off the pile, oldest first
    PileEvicted { id: EntityId },
    MusicCue(MusicCue),
}

/// Requests for the physics collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PhysicsCommand {
    /// Create a body at `origin` and apply `impulse`
    Launch { id: EntityId, origin: Vec2, impulse: Vec2 },
    /// Stop the body and make it kinematic
    Freeze { id: EntityId },
    /// Remove the body
    Despawn { id: EntityId },
}

/// Reports from the physics collaborator, delivered with each tick's input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PhysicsReport {
    PlayerEnteredZone,
    PlayerLeftZone,
    /// Current speed of a flying fish
    CollectibleSpeed { id: EntityId, speed: f32 },
    /// Player overlapped a fish
    CollectibleTouchedPlayer { id: EntityId },
}
