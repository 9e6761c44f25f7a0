//! Randomized produce/bomb spawn loop
//!
//! The original engine ran this as a coroutine (wait, spawn, wait,
//! loop). Here it is an explicit timer state machine advanced once per
//! tick, so disabling the component cancels the wait immediately and
//! the whole loop stays deterministic under the seeded RNG.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::EntityKind;
use crate::config::SpawnerConfig;

/// Where the loop is between spawns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum SpawnTimer {
    /// Initial wait after the spawner is enabled
    PreStart { remaining: f32 },
    /// Sampled wait until the next spawn
    Between { remaining: f32 },
}

/// A fully sampled spawn, ready for the tick to materialize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnCommand {
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Z rotation (radians)
    pub rot: f32,
    /// Upward impulse magnitude along the rotated up vector
    pub impulse: f32,
}

/// Suspendable spawn loop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    pub enabled: bool,
    /// None = not armed; re-armed from the pre-start delay on the next
    /// enabled tick
    timer: Option<SpawnTimer>,
}

impl Spawner {
    /// Enable or disable the loop. Disabling cancels any in-progress
    /// wait; re-enabling restarts from the pre-start delay.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.timer = None;
    }

    /// Advance the loop by one tick, possibly producing a spawn.
    pub fn update(
        &mut self,
        config: &SpawnerConfig,
        archetype_count: usize,
        rng: &mut Pcg32,
        dt: f32,
    ) -> Option<SpawnCommand> {
        if !self.enabled {
            return None;
        }

        let timer = self.timer.get_or_insert(SpawnTimer::PreStart {
            remaining: config.pre_start_delay,
        });
        let remaining = match timer {
            SpawnTimer::PreStart { remaining } | SpawnTimer::Between { remaining } => remaining,
        };
        *remaining -= dt;
        if *remaining > 0.0 {
            return None;
        }

        let command = sample_spawn(config, archetype_count, rng);
        self.timer = Some(SpawnTimer::Between {
            remaining: rng.random_range(config.min_spawn_delay..=config.max_spawn_delay),
        });
        Some(command)
    }
}

/// Pick produce uniformly, then override with the bomb at the
/// configured chance.
fn choose_kind(config: &SpawnerConfig, archetype_count: usize, rng: &mut Pcg32) -> EntityKind {
    let archetype = rng.random_range(0..archetype_count);
    if rng.random::<f32>() < config.bomb_chance {
        EntityKind::Bomb
    } else {
        EntityKind::Produce { archetype }
    }
}

fn sample_spawn(
    config: &SpawnerConfig,
    archetype_count: usize,
    rng: &mut Pcg32,
) -> SpawnCommand {
    let kind = choose_kind(config, archetype_count, rng);
    let pos = Vec2::new(
        rng.random_range(config.area_min.x..=config.area_max.x),
        rng.random_range(config.area_min.y..=config.area_max.y),
    );
    let rot = rng
        .random_range(config.min_angle_deg..=config.max_angle_deg)
        .to_radians();
    let impulse = rng.random_range(config.min_force..=config.max_force);

    SpawnCommand {
        kind,
        pos,
        rot,
        impulse,
    }
}
