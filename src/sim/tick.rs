//! Fixed timestep simulation tick
//!
//! Advances the whole game one step: failure sequence, blade sampling,
//! spawn loop, entity integration and slice contacts. Component enabled
//! flags gate the gameplay pieces; the failure sequence runs on
//! unscaled time because it is what drives the time-scale to zero.

use glam::Vec2;

use super::collision::segment_circle_overlap;
use super::entity::SliceOutcome;
use super::state::{Entity, EntityKind, ExplodeStage, GameEvent, GamePhase, GameState};
use crate::consts::GRAVITY;
use crate::screen_to_world;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Pointer position in screen coordinates
    pub pointer_screen: Vec2,
    /// Viewport size used for world projection
    pub viewport: Vec2,
    /// Pointer-down edge this tick
    pub pointer_pressed: bool,
    /// Pointer-up edge this tick
    pub pointer_released: bool,
    /// Exit shortcut (back to the host's main menu)
    pub escape: bool,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            pointer_screen: Vec2::ZERO,
            viewport: Vec2::new(1280.0, 720.0),
            pointer_pressed: false,
            pointer_released: false,
            escape: false,
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    if input.escape {
        // Context switch is the host's job; no cleanup sequence
        state.events.push(GameEvent::ExitToMenu);
    }

    advance_explode_sequence(state, dt);

    // Blade sampling runs on raw tick time; it is disabled whenever the
    // time-scale is below 1, so scaled and unscaled agree here anyway.
    let prev_blade = state.blade.pos;
    let was_slicing = state.blade.slicing;
    let pointer_world = screen_to_world(input.pointer_screen, input.viewport);
    state.blade.update(
        pointer_world,
        input.pointer_pressed,
        input.pointer_released,
        state.config.blade.min_slice_velocity,
        dt,
    );

    let scaled_dt = dt * state.time_scale;

    run_spawner(state, scaled_dt);
    integrate_entities(state, scaled_dt);

    if state.blade.slicing && state.blade.hit_volume_enabled {
        // Sweep from the previous sample; a gesture that just started
        // degenerates to a point test at its origin.
        let sweep_start = if was_slicing { prev_blade } else { state.blade.pos };
        resolve_slices(state, sweep_start);
    }
}

fn run_spawner(state: &mut GameState, scaled_dt: f32) {
    let archetype_count = state.config.archetypes.len();
    let command = {
        let GameState {
            spawner,
            rng,
            config,
            ..
        } = state;
        spawner.update(&config.spawner, archetype_count, rng, scaled_dt)
    };

    let Some(command) = command else { return };

    let id = state.next_entity_id();
    let radius = match command.kind {
        EntityKind::Produce { archetype } => state.config.archetypes[archetype].radius,
        EntityKind::Bomb => state.config.bomb.radius,
    };
    let entity = Entity::spawn(
        id,
        command.kind,
        command.pos,
        command.rot,
        radius,
        command.impulse,
        state.config.spawner.max_lifetime,
    );
    log::debug!(
        "spawned {:?} #{id} at {:?} impulse {:.1}",
        command.kind,
        command.pos,
        command.impulse
    );
    state.events.push(GameEvent::EntitySpawned {
        id,
        kind: command.kind,
    });
    state.entities.push(entity);
}

fn integrate_entities(state: &mut GameState, scaled_dt: f32) {
    for entity in &mut state.entities {
        entity.lifetime_remaining -= scaled_dt;
        if !entity.sliced {
            entity.vel.y += GRAVITY * scaled_dt;
            entity.pos += entity.vel * scaled_dt;
        }
        // Half-pieces are simulated bodies of their own
        for piece in &mut entity.pieces {
            piece.vel.y += GRAVITY * scaled_dt;
            piece.pos += piece.vel * scaled_dt;
            piece.rot += piece.angular_vel * scaled_dt;
        }
    }
    state.entities.retain(|e| e.lifetime_remaining > 0.0);
}

/// Offer this tick's blade sweep to every entity still participating in
/// collision, then apply the resulting score/explosion effects.
fn resolve_slices(state: &mut GameState, sweep_start: Vec2) {
    let blade_pos = state.blade.pos;
    let direction = state.blade.direction;
    let slide_force = state.config.blade.slide_force;

    let mut cuts = 0u32;
    let mut exploded = false;
    for entity in &mut state.entities {
        if !entity.can_react {
            continue;
        }
        if !segment_circle_overlap(sweep_start, blade_pos, entity.pos, entity.radius) {
            continue;
        }
        match entity.react_to_slice(direction, blade_pos, slide_force) {
            SliceOutcome::Sliced { pos, angle } => {
                cuts += 1;
                state.events.push(GameEvent::ProduceSliced { pos, angle });
            }
            SliceOutcome::Exploded => exploded = true,
            SliceOutcome::Ignored => {}
        }
    }

    for _ in 0..cuts {
        state.increase_score();
    }
    if exploded {
        begin_explode(state);
    }
}

/// Bomb contact: freeze gameplay input and spawning, start the fade.
fn begin_explode(state: &mut GameState) {
    log::info!("bomb hit at score {}; starting failure sequence", state.score);
    state.blade.set_enabled(false);
    state.spawner.set_enabled(false);
    state.phase = GamePhase::Exploding(ExplodeStage::FadeIn { elapsed: 0.0 });
    state.events.push(GameEvent::BombTriggered);
}

/// Drive the fade/slow-motion failure sequence. Runs on unscaled dt:
/// the sequence itself pushes the time-scale to zero, so sequencing on
/// scaled time would never complete.
fn advance_explode_sequence(state: &mut GameState, dt: f32) {
    let GamePhase::Exploding(stage) = state.phase else {
        return;
    };
    let fade = state.config.explode.fade_duration;
    let hold = state.config.explode.hold_duration;

    state.phase = match stage {
        ExplodeStage::FadeIn { elapsed } => {
            let elapsed = elapsed + dt;
            let t = (elapsed / fade).clamp(0.0, 1.0);
            state.fade_alpha = t;
            // In-flight entities decelerate in sync with the whiteout
            state.time_scale = 1.0 - t;
            if elapsed >= fade {
                GamePhase::Exploding(ExplodeStage::Hold { elapsed: 0.0 })
            } else {
                GamePhase::Exploding(ExplodeStage::FadeIn { elapsed })
            }
        }
        ExplodeStage::Hold { elapsed } => {
            let elapsed = elapsed + dt;
            if elapsed >= hold {
                // The round restarts under the white overlay, then the
                // overlay lifts over live gameplay.
                state.new_round();
                state.events.push(GameEvent::RoundReset);
                log::info!("round reset");
                GamePhase::Exploding(ExplodeStage::FadeOut { elapsed: 0.0 })
            } else {
                GamePhase::Exploding(ExplodeStage::Hold { elapsed })
            }
        }
        ExplodeStage::FadeOut { elapsed } => {
            let elapsed = elapsed + dt;
            let t = (elapsed / fade).clamp(0.0, 1.0);
            state.fade_alpha = 1.0 - t;
            if elapsed >= fade {
                state.fade_alpha = 0.0;
                GamePhase::Playing
            } else {
                GamePhase::Exploding(ExplodeStage::FadeOut { elapsed })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::consts::{SIM_DT, VIEW_HEIGHT};

    fn new_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Config::default()).unwrap();
        state.drain_events();
        state
    }

    /// Inverse of the world projection, for driving the pointer from
    /// world-space test coordinates.
    fn screen_of(world: Vec2) -> Vec2 {
        let viewport = TickInput::default().viewport;
        let scale = VIEW_HEIGHT / viewport.y;
        Vec2::new(
            world.x / scale + viewport.x / 2.0,
            -world.y / scale + viewport.y / 2.0,
        )
    }

    fn pointer(world: Vec2, pressed: bool, released: bool) -> TickInput {
        TickInput {
            pointer_screen: screen_of(world),
            pointer_pressed: pressed,
            pointer_released: released,
            ..Default::default()
        }
    }

    fn insert_entity(state: &mut GameState, kind: EntityKind, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        let mut entity = Entity::spawn(id, kind, pos, 0.0, 0.5, 0.0, 5.0);
        entity.vel = Vec2::ZERO;
        state.entities.push(entity);
        id
    }

    /// Drag the blade horizontally through `target` in two ticks.
    fn slice_through(state: &mut GameState, target: Vec2) {
        let start = target - Vec2::new(2.0, 0.0);
        let end = target + Vec2::new(2.0, 0.0);
        tick(state, &pointer(start, true, false), SIM_DT);
        tick(state, &pointer(end, false, false), SIM_DT);
        tick(state, &pointer(end, false, true), SIM_DT);
    }

    #[test]
    fn test_spawner_populates_playfield() {
        let mut state = new_state(123);
        // 4 simulated seconds clears pre-start plus several spawn waits
        for _ in 0..480 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(!state.entities.is_empty());
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::EntitySpawned { .. }))
        );
    }

    #[test]
    fn test_slicing_produce_scores_exactly_once() {
        let mut state = new_state(1);
        state.spawner.set_enabled(false);
        let target = Vec2::new(0.0, 1.0);
        insert_entity(&mut state, EntityKind::Produce { archetype: 0 }, target);

        slice_through(&mut state, target);
        assert_eq!(state.score, 1);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::ProduceSliced { .. })));
        assert!(events.contains(&GameEvent::ScoreChanged(1)));

        // A second pass over the same (now sliced) entity is ignored
        slice_through(&mut state, target);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_slow_gesture_does_not_cut() {
        let mut state = new_state(1);
        state.spawner.set_enabled(false);
        state.config.blade.min_slice_velocity = 10.0;
        let target = Vec2::new(0.0, 1.0);
        insert_entity(&mut state, EntityKind::Produce { archetype: 0 }, target);

        // Press outside the hit-volume, then creep toward the entity at
        // 1.2 units/s, well under the gate
        let start = target - Vec2::new(0.6, 0.0);
        tick(&mut state, &pointer(start, true, false), SIM_DT);
        for i in 1..=30 {
            let pos = start + Vec2::new(0.01 * i as f32, 0.0);
            tick(&mut state, &pointer(pos, false, false), SIM_DT);
        }
        assert_eq!(state.score, 0);
        assert!(state.entities[0].can_react);
    }

    #[test]
    fn test_bomb_contact_runs_full_failure_sequence() {
        let mut state = new_state(1);
        state.spawner.set_enabled(false);
        let bomb_pos = Vec2::new(0.0, 1.0);
        insert_entity(&mut state, EntityKind::Bomb, bomb_pos);
        // A bystander produce entity that should freeze mid-air
        let survivor = insert_entity(
            &mut state,
            EntityKind::Produce { archetype: 0 },
            Vec2::new(3.0, 1.0),
        );

        tick(&mut state, &pointer(bomb_pos - Vec2::new(2.0, 0.0), true, false), SIM_DT);
        tick(&mut state, &pointer(bomb_pos + Vec2::new(2.0, 0.0), false, false), SIM_DT);

        assert!(matches!(
            state.phase,
            GamePhase::Exploding(ExplodeStage::FadeIn { .. })
        ));
        assert!(!state.blade.enabled);
        assert!(!state.spawner.enabled);
        assert!(state.drain_events().contains(&GameEvent::BombTriggered));

        // Fade-in: 0.5s to full white with time frozen
        let fade_ticks = (0.5 / SIM_DT) as u32;
        for _ in 0..fade_ticks {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!((state.fade_alpha - 1.0).abs() < 0.001);
        assert!(state.time_scale.abs() < 0.001);
        assert!(matches!(
            state.phase,
            GamePhase::Exploding(ExplodeStage::Hold { .. })
        ));

        // During the hold the surviving entity is frozen in place
        let frozen_pos = state
            .entities
            .iter()
            .find(|e| e.id == survivor)
            .unwrap()
            .pos;
        let hold_ticks = (1.0 / SIM_DT) as u32;
        for _ in 0..hold_ticks - 1 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let held_pos = state
            .entities
            .iter()
            .find(|e| e.id == survivor)
            .unwrap()
            .pos;
        assert!((held_pos - frozen_pos).length() < 0.001);

        // The tick that ends the hold resets the round
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(matches!(
            state.phase,
            GamePhase::Exploding(ExplodeStage::FadeOut { .. })
        ));
        assert_eq!(state.score, 0);
        assert!(state.entities.is_empty());
        assert_eq!(state.time_scale, 1.0);
        assert!(state.blade.enabled);
        assert!(state.spawner.enabled);
        assert!(state.drain_events().contains(&GameEvent::RoundReset));

        // Fade-out completes back to clear, live gameplay
        for _ in 0..fade_ticks {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.fade_alpha, 0.0);
    }

    #[test]
    fn test_entities_expire_after_lifetime() {
        let mut state = new_state(1);
        state.spawner.set_enabled(false);
        let id = insert_entity(&mut state, EntityKind::Produce { archetype: 0 }, Vec2::ZERO);
        state
            .entities
            .iter_mut()
            .find(|e| e.id == id)
            .unwrap()
            .lifetime_remaining = 2.0 * SIM_DT;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.entities.len(), 1);
        tick(&mut state, &TickInput::default(), SIM_DT);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_escape_emits_exit_event() {
        let mut state = new_state(1);
        let input = TickInput {
            escape: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!(state.drain_events().contains(&GameEvent::ExitToMenu));
    }

    #[test]
    fn test_determinism_same_seed_same_trajectory() {
        let mut a = new_state(99999);
        let mut b = new_state(99999);

        for i in 0..600u32 {
            // A wavy scripted gesture, held down throughout
            let world = Vec2::new((i as f32 * 0.05).sin() * 4.0, (i as f32 * 0.08).cos() * 2.0);
            let input = pointer(world, i == 0, false);
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
            a.drain_events();
            b.drain_events();
        }

        let snap_a = serde_json::to_string(&a).unwrap();
        let snap_b = serde_json::to_string(&b).unwrap();
        assert_eq!(snap_a, snap_b);
    }
}
