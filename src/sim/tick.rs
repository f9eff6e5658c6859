//! Simulation tick
//!
//! Advances the whole game by one frame. The step order is fixed so the same
//! seed and the same inputs always produce the same state.

use super::collectible::Collectible;
use super::combat::{
    AttackMode, DamageOutcome, Damageable, TargetSelection, resolve_area, resolve_melee,
};
use super::enemy::{AttackIntent, PlayerView};
use super::events::{EnemyPhase, GameEvent, PhysicsCommand, PhysicsReport};
use super::fishing::{FishingOutcome, launch_impulse, pick_catch};
use super::state::{GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal movement in `[-1, 1]`
    pub move_axis: f32,
    /// Swing (cooldown-gated)
    pub attack: bool,
    /// Throw the line
    pub cast: bool,
    /// Start reeling a biting fish
    pub start_reel: bool,
    /// Reel button held this tick
    pub hold_reel: bool,
    /// Reel button let go this tick
    pub release_reel: bool,
    /// Throw away every fish on the pile
    pub clear_pile: bool,
    /// Pause toggle
    pub pause: bool,
    /// What physics observed since the last tick
    pub physics: Vec<PhysicsReport>,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                log::info!("Paused");
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => {
                log::info!("Resumed");
                state.phase = GamePhase::Playing;
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    state.clock.advance(dt);
    let now = state.clock.now();

    for report in &input.physics {
        apply_physics_report(state, *report);
    }

    update_player(state, input, now, dt);
    update_enemies(state, now, dt);

    for enemy in state.enemies.iter_mut() {
        if let Some(wave) = enemy.claim_kill_reward() {
            state.director.on_enemy_killed(wave);
        }
    }

    if state.phase == GamePhase::Playing {
        let orders = state.director.update(dt, &mut state.rng, &mut state.events);
        for order in orders {
            state.spawn_enemy(order);
        }
        update_fishing(state, input, dt);
        if input.clear_pile {
            state.clear_pile();
        }
    }

    for fish in state.collectibles.iter_mut() {
        if fish.update(dt) {
            log::debug!("{} #{} spoiled on the shore", fish.species, fish.id);
            state.events.push(GameEvent::FishExpired { id: fish.id });
            state.commands.push(PhysicsCommand::Despawn { id: fish.id });
        }
    }

    remove_finished(state);
    state.normalize_order();
}

fn apply_physics_report(state: &mut GameState, report: PhysicsReport) {
    match report {
        PhysicsReport::PlayerEnteredZone => state.in_fishing_zone = true,
        PhysicsReport::PlayerLeftZone => {
            state.in_fishing_zone = false;
            state.fishing.cancel(&mut state.events);
        }
        PhysicsReport::CollectibleSpeed { id, speed } => {
            let landing_speed = state.tuning.fishing.landing_speed;
            let ttl = state.tuning.fishing.collectible_ttl;
            let Some(fish) = state.collectibles.iter_mut().find(|c| c.id == id) else {
                log::debug!("Speed report for unknown fish #{}", id);
                return;
            };
            if fish.report_speed(speed, landing_speed, ttl) {
                state.events.push(GameEvent::FishLanded { id });
                state.commands.push(PhysicsCommand::Freeze { id });
            }
        }
        PhysicsReport::CollectibleTouchedPlayer { id } => {
            if !state.player.is_alive() {
                return;
            }
            let Some(fish) = state.collectibles.iter_mut().find(|c| c.id == id) else {
                return;
            };
            if !fish.collect() {
                return;
            }
            let fish = fish.clone();
            collect_fish(state, &fish);
        }
    }
}

fn collect_fish(state: &mut GameState, fish: &Collectible) {
    if !state.player.collect_fish(fish.health_value, fish.score_value) {
        return;
    }
    log::info!(
        "{} ate a {} (+{} hp, +{} score)",
        state.player.name,
        fish.species,
        fish.health_value,
        fish.score_value
    );
    state.events.push(GameEvent::FishCollected {
        id: fish.id,
        health: fish.health_value,
        score: fish.score_value,
    });
    state.events.push(GameEvent::HealthChanged {
        health: state.player.health,
        max_health: state.player.max_health,
    });
    state.events.push(GameEvent::ScoreChanged {
        score: state.player.score,
    });
    state.pile_fish(fish);
}

fn update_player(state: &mut GameState, input: &TickInput, now: f64, dt: f32) {
    if !state.fishing.is_reeling() {
        let (min_x, max_x) = (state.tuning.world_min_x, state.tuning.world_max_x);
        state.player.walk(input.move_axis, dt, min_x, max_x);
    }

    if !input.attack || !state.player.try_swing(now) {
        return;
    }

    let player = &state.player;
    let origin = player.attack_point();
    let reach = player.attack_range;
    let power = player.attack_damage();
    let report = match player.attack_mode {
        AttackMode::Melee => resolve_melee(
            origin,
            reach,
            state.enemies.iter_mut(),
            power,
            state.tuning.player.target_selection,
        ),
        AttackMode::Sweep => resolve_area(origin, reach, state.enemies.iter_mut(), power),
    };

    state.events.push(GameEvent::PlayerSwing {
        hits: report.hits.iter().filter(|h| h.outcome.landed()).count(),
    });
    for hit in &report.hits {
        match hit.outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Hurt { remaining } => {
                state.events.push(GameEvent::EnemyHurt {
                    id: hit.target,
                    damage: power,
                    remaining,
                });
            }
            DamageOutcome::Killed => {
                log::debug!("Gnome #{} slain", hit.target);
                state.events.push(GameEvent::EnemyHurt {
                    id: hit.target,
                    damage: power,
                    remaining: 0,
                });
                state.events.push(GameEvent::EnemyStateChanged {
                    id: hit.target,
                    phase: EnemyPhase::Dying,
                });
            }
        }
    }
}

fn update_enemies(state: &mut GameState, now: f64, dt: f32) {
    let view = PlayerView {
        x: state.player.x,
        alive: state.player.is_alive(),
    };

    let mut intents: Vec<AttackIntent> = Vec::new();
    for enemy in state.enemies.iter_mut() {
        let Some(intent) = enemy.update(view, now, dt) else {
            continue;
        };
        state.events.push(GameEvent::EnemyStateChanged {
            id: enemy.id,
            phase: EnemyPhase::Attacking,
        });
        intents.push(intent);
    }

    for intent in intents {
        let report = resolve_melee(
            intent.origin,
            intent.reach,
            std::iter::once(&mut state.player),
            intent.damage,
            TargetSelection::FirstFound,
        );
        let Some(hit) = report.hits.first() else {
            continue;
        };
        match hit.outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Hurt { remaining } => {
                state.events.push(GameEvent::PlayerHurt {
                    attacker: intent.attacker,
                    damage: intent.damage,
                    health: remaining,
                });
                state.events.push(GameEvent::HealthChanged {
                    health: remaining,
                    max_health: state.player.max_health,
                });
            }
            DamageOutcome::Killed => {
                state.events.push(GameEvent::PlayerHurt {
                    attacker: intent.attacker,
                    damage: intent.damage,
                    health: 0,
                });
                state.events.push(GameEvent::HealthChanged {
                    health: 0,
                    max_health: state.player.max_health,
                });
                state.events.push(GameEvent::PlayerDied);
                state.fishing.cancel(&mut state.events);
                log::info!(
                    "Game over: wave {}, score {}, {} gnomes slain",
                    state.director.wave_number(),
                    state.player.score,
                    state.director.total_kills
                );
                state.phase = GamePhase::GameOver;
            }
        }
    }
}

fn update_fishing(state: &mut GameState, input: &TickInput, dt: f32) {
    let mut outcome = None;
    if input.cast {
        state
            .fishing
            .cast(state.in_fishing_zone, &mut state.rng, &mut state.events);
    }
    if input.start_reel {
        state.fishing.start_reel(&mut state.events);
    }
    if input.release_reel {
        outcome = state.fishing.release(&mut state.events);
    }
    if outcome.is_none() {
        outcome = state.fishing.update(dt, input.hold_reel, &mut state.events);
    }

    if outcome == Some(FishingOutcome::Caught) {
        launch_catch(state);
    }
}

fn launch_catch(state: &mut GameState) {
    let table = &state.tuning.fishing.catch_table;
    let Some(entry) = pick_catch(table, &mut state.rng).cloned() else {
        return;
    };
    let id = state.next_entity_id();
    let origin = state.tuning.fishing.water_spawn_point;
    let impulse = launch_impulse(&state.tuning.fishing, origin, state.player.x, &mut state.rng);

    log::info!("Caught a {}!", entry.species);
    state.collectibles.push(Collectible::new(
        id,
        entry.species.clone(),
        entry.health_value,
        entry.score_value,
    ));
    state.events.push(GameEvent::FishCaught {
        id,
        species: entry.species,
    });
    state.commands.push(PhysicsCommand::Launch {
        id,
        origin,
        impulse,
    });
}

fn remove_finished(state: &mut GameState) {
    let events = &mut state.events;
    state.enemies.retain(|enemy| {
        if enemy.is_dead() {
            events.push(GameEvent::EnemyRemoved { id: enemy.id });
            false
        } else {
            true
        }
    });
    state.collectibles.retain(|fish| !fish.is_finished());
}
