//! Gnome Fjord headless runner
//!
//! Drives the simulation with a scripted player and a toy physics stand-in so
//! whole runs can be watched through the log.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use serde::Serialize;

use gnome_fjord::consts::*;
use gnome_fjord::sim::{
    EntityId, FishingState, GameEvent, GamePhase, GameState, PhysicsCommand, PhysicsReport,
    TickInput, tick,
};
use gnome_fjord::{MusicMixer, Settings, Tuning};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Run seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Simulated seconds to run.
    #[arg(long, value_name = "SECONDS", default_value_t = 180.0)]
    seconds: f32,
    /// Frames per second; each frame is one tick.
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
    /// JSON tuning overrides.
    #[arg(long, value_name = "PATH")]
    tuning: Option<PathBuf>,
    /// Settings file (read, never written).
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
    /// Left edge of the fishing zone.
    #[arg(long, default_value_t = 12.0)]
    zone_min_x: f32,
    /// Print a JSON summary when the run ends.
    #[arg(long)]
    summary: bool,
}

/// A fish body in the stand-in physics world
#[derive(Debug, Clone, Copy)]
struct Body {
    pos: Vec2,
    vel: Vec2,
    frozen: bool,
}

/// Just enough physics to fly fish back to shore and track the fishing zone
#[derive(Debug, Default)]
struct ToyPhysics {
    bodies: BTreeMap<EntityId, Body>,
    in_zone: bool,
}

impl ToyPhysics {
    fn apply(&mut self, commands: Vec<PhysicsCommand>) {
        for command in commands {
            match command {
                PhysicsCommand::Launch {
                    id,
                    origin,
                    impulse,
                } => {
                    self.bodies.insert(
                        id,
                        Body {
                            pos: origin,
                            vel: impulse,
                            frozen: false,
                        },
                    );
                }
                PhysicsCommand::Freeze { id } => {
                    if let Some(body) = self.bodies.get_mut(&id) {
                        body.vel = Vec2::ZERO;
                        body.frozen = true;
                    }
                }
                PhysicsCommand::Despawn { id } => {
                    self.bodies.remove(&id);
                }
            }
        }
    }

    fn step(
        &mut self,
        dt: f32,
        player_x: f32,
        zone_min_x: f32,
        zone_max_x: f32,
    ) -> Vec<PhysicsReport> {
        let mut reports = Vec::new();

        let in_zone = (zone_min_x..=zone_max_x).contains(&player_x);
        if in_zone != self.in_zone {
            self.in_zone = in_zone;
            reports.push(if in_zone {
                PhysicsReport::PlayerEnteredZone
            } else {
                PhysicsReport::PlayerLeftZone
            });
        }

        for (&id, body) in self.bodies.iter_mut() {
            if body.frozen {
                if (body.pos.x - player_x).abs() <= PICKUP_RADIUS {
                    reports.push(PhysicsReport::CollectibleTouchedPlayer { id });
                }
                continue;
            }
            body.vel.y += GRAVITY * dt;
            body.pos += body.vel * dt;
            if body.pos.y <= GROUND_Y && body.vel.y < 0.0 {
                body.pos.y = GROUND_Y;
                // Ground friction kills the slide quickly
                body.vel = Vec2::new(body.vel.x * 0.5, 0.0);
            }
            reports.push(PhysicsReport::CollectibleSpeed {
                id,
                speed: body.vel.length(),
            });
        }
        reports
    }
}

/// Scripted player: fight anything close, otherwise fish and pick up the catch
fn autopilot(state: &GameState, physics: &ToyPhysics, zone_min_x: f32) -> TickInput {
    let player = &state.player;
    let mut input = TickInput::default();

    let threat = state
        .enemies
        .iter()
        .filter(|e| e.state.is_active())
        .min_by(|a, b| {
            let da = (a.pos.x - player.x).abs();
            let db = (b.pos.x - player.x).abs();
            da.total_cmp(&db)
        });

    if let Some(enemy) = threat {
        let dx = enemy.pos.x - player.x;
        if dx.abs() < 6.0 {
            if state.fishing.is_reeling() {
                input.release_reel = true;
            }
            if dx.abs() > player.attack_offset + player.attack_range * 0.5 {
                input.move_axis = dx.signum();
            } else {
                // Turn to face without stepping past
                input.move_axis = dx.signum() * 0.01;
                input.attack = true;
            }
            return input;
        }
    }

    let landed = state
        .collectibles
        .iter()
        .filter(|c| c.is_pickup_eligible())
        .filter_map(|c| physics.bodies.get(&c.id))
        .map(|body| body.pos.x)
        .min_by(|a, b| (a - player.x).abs().total_cmp(&(b - player.x).abs()))
        .filter(|_| state.fishing.state() == FishingState::Idle);
    if let Some(x) = landed {
        input.move_axis = (x - player.x).signum();
        return input;
    }

    match state.fishing.state() {
        FishingState::Idle if !state.in_fishing_zone => {
            input.move_axis = (zone_min_x + 0.5 - player.x).signum();
        }
        FishingState::Idle => input.cast = true,
        FishingState::WaitingForBite => {}
        FishingState::BiteAvailable => {
            input.start_reel = true;
            input.hold_reel = true;
        }
        FishingState::ReelingIn => input.hold_reel = true,
    }
    input
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    seconds: f64,
    phase: GamePhase,
    wave: u32,
    total_kills: u32,
    health: i32,
    score: u32,
    fish_on_pile: usize,
}

fn main() {
    env_logger::init();
    let args = CliArgs::parse();

    let tuning = match &args.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{}", err);
                std::process::exit(2);
            }
        },
        None => Tuning::default(),
    };
    let settings = args
        .settings
        .as_ref()
        .map(|path| Settings::load(path))
        .unwrap_or_default();

    log::info!("Gnome Fjord (headless) starting, seed {}", args.seed);

    let zone_max_x = tuning.world_max_x;
    let mut state = GameState::new(args.seed, tuning);
    let mut physics = ToyPhysics::default();
    let mut mixer = MusicMixer::new(&settings);

    let fps = if args.fps.is_finite() && args.fps > 0.0 { args.fps } else { 60.0 };
    let dt = (1.0 / fps).min(SIM_DT * MAX_SUBSTEPS as f32);
    let frames = (args.seconds.max(0.0) * fps).round() as u64;

    for _ in 0..frames {
        let mut input = autopilot(&state, &physics, args.zone_min_x);
        input.physics = physics.step(dt, state.player.x, args.zone_min_x, zone_max_x);
        tick(&mut state, &input, dt);

        physics.apply(state.drain_commands());
        let events = state.drain_events();
        mixer.handle_events(&events);
        mixer.update(dt);
        for event in &events {
            log_event(event);
        }

        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    let gains = mixer.gains();
    log::info!(
        "Run over after {:.1}s: wave {}, {} kills, score {}, music calm {:.2} / combat {:.2}",
        state.clock.now(),
        state.director.wave_number(),
        state.director.total_kills,
        state.player.score,
        gains.calm,
        gains.combat
    );

    if args.summary {
        let summary = RunSummary {
            seed: state.seed,
            seconds: state.clock.now(),
            phase: state.phase,
            wave: state.director.wave_number(),
            total_kills: state.director.total_kills,
            health: state.player.health,
            score: state.player.score,
            fish_on_pile: state.pile.len(),
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(err) => log::error!("Failed to encode summary: {}", err),
        }
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::HealthChanged { health, max_health } => {
            log::debug!("Health {}/{}", health, max_health)
        }
        GameEvent::ScoreChanged { score } => log::debug!("Score {}", score),
        other => log::trace!("{:?}", other),
    }
}
