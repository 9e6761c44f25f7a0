//! Veggie Slash entry point
//!
//! Headless demo driver: runs the simulation at the fixed timestep with
//! a scripted pointer standing in for a real input device, and logs the
//! events a rendering host would consume. Pass a JSON config path to
//! override the default tuning.

use glam::Vec2;

use veggie_slash::consts::{MAX_SUBSTEPS, SIM_DT};
use veggie_slash::sim::{GameEvent, GameState, TickInput, tick};
use veggie_slash::{Config, screen_to_world};

/// Demo run length in simulated seconds
const DEMO_SECONDS: f32 = 30.0;

/// Scripted stand-in for a pointer device: sweeps figure-eight slices
/// across the playfield, lifting briefly between strokes.
fn scripted_pointer(t: f32, viewport: Vec2) -> (Vec2, bool) {
    let stroke = (t * 2.0).fract();
    let held = stroke < 0.8;
    let phase = t * 2.5;
    let world = Vec2::new(phase.sin() * 5.0, (phase * 2.0).cos() * 3.0 - 1.0);
    // Invert the projection so the sim sees realistic screen samples
    let scale = veggie_slash::consts::VIEW_HEIGHT / viewport.y;
    let screen = Vec2::new(
        world.x / scale + viewport.x / 2.0,
        -world.y / scale + viewport.y / 2.0,
    );
    (screen, held)
}

fn load_config() -> Config {
    let Some(path) = std::env::args().nth(1) else {
        return Config::default();
    };
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(err) => {
            log::error!("failed to read config {path}: {err}");
            std::process::exit(1);
        }
    };
    match Config::from_json(&json) {
        Ok(config) => {
            log::info!("loaded config from {path}");
            config
        }
        Err(err) => {
            log::error!("invalid config {path}: {err}");
            std::process::exit(1);
        }
    }
}

fn dispatch_events(state: &mut GameState) {
    for event in state.drain_events() {
        match event {
            GameEvent::ScoreChanged(score) => log::info!("score: {score}"),
            GameEvent::ProduceSliced { pos, angle } => {
                log::debug!("juice burst at {pos:?}, slice angle {:.0}°", angle.to_degrees())
            }
            GameEvent::EntitySpawned { id, kind } => log::debug!("spawned #{id} ({kind:?})"),
            GameEvent::BombTriggered => log::info!("boom!"),
            GameEvent::RoundReset => log::info!("new round"),
            GameEvent::ExitToMenu => log::info!("exit requested"),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config();
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut state = match GameState::new(seed, config) {
        Ok(state) => state,
        Err(err) => {
            log::error!("configuration error: {err}");
            std::process::exit(1);
        }
    };
    log::info!("starting demo run, seed {seed}");

    let mut input = TickInput::default();
    let mut was_held = false;
    let total_ticks = (DEMO_SECONDS / SIM_DT) as u64;

    // Fixed-timestep loop; substep cap matters only for a real-time
    // host, but the demo keeps the same shape.
    for frame in 0..total_ticks / MAX_SUBSTEPS as u64 {
        for substep in 0..MAX_SUBSTEPS {
            let t = (frame * MAX_SUBSTEPS as u64 + substep as u64) as f32 * SIM_DT;
            let (screen, held) = scripted_pointer(t, input.viewport);
            input.pointer_screen = screen;
            input.pointer_pressed = held && !was_held;
            input.pointer_released = !held && was_held;
            was_held = held;

            tick(&mut state, &input, SIM_DT);
            dispatch_events(&mut state);
        }
        let blade = screen_to_world(input.pointer_screen, input.viewport);
        log::trace!(
            "t={:.2}s blade={blade:?} entities={} alpha={:.2}",
            state.time_ticks as f32 * SIM_DT,
            state.entities.len(),
            state.fade_alpha
        );
    }

    log::info!(
        "demo finished: score {}, {} entities in flight",
        state.score,
        state.entities.len()
    );
}
