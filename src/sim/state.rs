//! Game state definitions

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{Clock, uniform_inclusive};
use super::collectible::Collectible;
use super::enemy::Enemy;
use super::events::{GameEvent, PhysicsCommand};
use super::fishing::FishingSession;
use super::pile::Pile;
use super::player::Player;
use super::wave::{SpawnOrder, WaveDirector};
use crate::tuning::Tuning;

/// Stable entity identifier, unique for the lifetime of a run
pub type EntityId = u32;

/// Reserved for the player; spawned entities start at 1
pub const PLAYER_ID: EntityId = 0;

/// Current game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Playing,
    Paused,
    GameOver,
}

/// A collected fish resting on the pile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiledFish {
    pub id: EntityId,
    pub species: String,
    pub health_value: i32,
    pub score_value: u32,
    /// World position inside the pile area
    pub position: Vec2,
    /// Radians
    pub rotation: f32,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Single RNG stream for every random draw in the run
    pub rng: Pcg32,
    pub clock: Clock,
    pub phase: GamePhase,
    pub player: Player,
    /// Live and dying gnomes (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    pub director: WaveDirector,
    pub fishing: FishingSession,
    /// Last zone state reported by physics
    pub in_fishing_zone: bool,
    /// Fish in flight or on the ground (sorted by id for determinism)
    pub collectibles: Vec<Collectible>,
    pub pile: Pile<PiledFish>,
    /// Notifications for the presentation layer, drained by the caller
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Requests for the physics collaborator, drained by the caller
    #[serde(skip)]
    pub commands: Vec<PhysicsCommand>,
    /// Next entity ID
    next_id: EntityId,
}

impl GameState {
    /// Create a new game state with the given seed. The wave director starts
    /// immediately.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let player = Player::new(&tuning.player, tuning.player.start_x);
        let mut director = WaveDirector::new(tuning.waves.clone());
        director.start();
        let fishing = FishingSession::new(&tuning.fishing);
        let pile = Pile::with_capacity(tuning.pile.capacity);

        log::info!("New run (seed {})", seed);

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            clock: Clock::new(),
            phase: GamePhase::Playing,
            player,
            enemies: Vec::new(),
            director,
            fishing,
            in_fishing_zone: false,
            collectibles: Vec::new(),
            pile,
            events: Vec::new(),
            commands: Vec::new(),
            next_id: PLAYER_ID + 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put the gnome described by `order` into the world
    pub fn spawn_enemy(&mut self, order: SpawnOrder) -> EntityId {
        let id = self.next_entity_id();
        let health = self.tuning.enemy.health_for_wave(order.wave);
        let enemy = Enemy::spawn(
            id,
            order.kind,
            order.position,
            health,
            order.wave,
            &self.tuning.enemy,
            &mut self.rng,
        );
        log::debug!(
            "Spawned {} #{} (wave {}, hp {}, scale {:.2})",
            enemy.name,
            id,
            order.wave,
            health,
            enemy.scale
        );
        self.events.push(GameEvent::EnemySpawned {
            id,
            kind: order.kind,
            position: order.position,
            scale: enemy.scale,
        });
        self.enemies.push(enemy);
        id
    }

    /// Stack a collected fish on the pile, evicting the oldest when full
    pub fn pile_fish(&mut self, fish: &Collectible) {
        let half = self.tuning.pile.half_extents.abs();
        let position = self.tuning.pile.center
            + Vec2::new(
                uniform_inclusive(&mut self.rng, -half.x, half.x),
                uniform_inclusive(&mut self.rng, -half.y, half.y),
            );
        let rotation = uniform_inclusive(&mut self.rng, 0.0, std::f32::consts::TAU);
        let piled = PiledFish {
            id: fish.id,
            species: fish.species.clone(),
            health_value: fish.health_value,
            score_value: fish.score_value,
            position,
            rotation,
        };
        self.events.push(GameEvent::FishPiled {
            id: fish.id,
            position,
            rotation,
        });
        if let Some(evicted) = self.pile.push(piled) {
            log::debug!("Pile full, dropping {} #{}", evicted.species, evicted.id);
            self.release_piled(evicted.id);
        }
    }

    /// Drop every fish on the pile, oldest first
    pub fn clear_pile(&mut self) {
        let released = self.pile.clear();
        if !released.is_empty() {
            log::debug!("Clearing {} fish off the pile", released.len());
        }
        for fish in released {
            self.release_piled(fish.id);
        }
    }

    fn release_piled(&mut self, id: EntityId) {
        self.events.push(GameEvent::PileEvicted { id });
        self.commands.push(PhysicsCommand::Despawn { id });
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Take this tick's presentation events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take this tick's physics commands
    pub fn drain_commands(&mut self) -> Vec<PhysicsCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.collectibles.sort_by_key(|c| c.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;

    #[test]
    fn test_ids_are_unique_and_skip_player() {
        let mut state = GameState::new(1, Tuning::default());
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, PLAYER_ID);
        assert_ne!(a, b);
    }

    #[test]
    fn test_spawn_enemy_uses_wave_health() {
        let mut tuning = Tuning::default();
        tuning.enemy.spawn_health = 40;
        tuning.enemy.health_per_wave = 5;
        let mut state = GameState::new(1, tuning);
        let id = state.spawn_enemy(SpawnOrder {
            wave: 3,
            kind: EnemyKind::Brute,
            position: Vec2::new(4.0, 0.0),
        });
        let enemy = state.enemy(id).expect("spawned");
        assert_eq!(enemy.health, 50);
        assert_eq!(enemy.damage, 20);
        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::EnemySpawned { .. }]
        ));
    }

    #[test]
    fn test_piled_fish_land_inside_pile_area() {
        let mut tuning = Tuning::default();
        tuning.pile.center = Vec2::new(-6.0, 2.0);
        let mut state = GameState::new(9, tuning);
        let (center, half) = (state.tuning.pile.center, state.tuning.pile.half_extents);
        for i in 0..20 {
            let fish = Collectible::new(100 + i, "Perch".to_string(), 10, 10);
            state.pile_fish(&fish);
        }
        for piled in state.pile.iter() {
            let offset = piled.position - center;
            assert!(offset.x.abs() <= half.x && offset.y.abs() <= half.y);
        }
        let piled_events = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::FishPiled { .. }))
            .count();
        assert_eq!(piled_events, 20);
    }

    #[test]
    fn test_clear_pile_releases_every_fish() {
        let mut state = GameState::new(4, Tuning::default());
        for id in [10, 11, 12] {
            state.pile_fish(&Collectible::new(id, "Perch".to_string(), 10, 10));
        }
        state.drain_events();
        state.drain_commands();

        state.clear_pile();
        assert!(state.pile.is_empty());
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::PileEvicted { id: 10 },
                GameEvent::PileEvicted { id: 11 },
                GameEvent::PileEvicted { id: 12 },
            ]
        );
        assert_eq!(
            state.drain_commands(),
            vec![
                PhysicsCommand::Despawn { id: 10 },
                PhysicsCommand::Despawn { id: 11 },
                PhysicsCommand::Despawn { id: 12 },
            ]
        );

        // Clearing an empty pile is a no-op
        state.clear_pile();
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let state = GameState::new(77, Tuning::default());
        let json = serde_json::to_string(&state).expect("serialize");
        let restored: GameState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored.seed, 77);
        assert_eq!(restored.player.health, state.player.health);
    }
}
