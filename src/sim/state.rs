//! Game state and core simulation types
//!
//! All state that must be persisted for snapshots/determinism lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::blade::Blade;
use super::spawner::Spawner;
use crate::config::{Config, ConfigError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay: spawner and blade enabled
    Playing,
    /// Bomb hit: fade/slow-motion failure sequence is running
    Exploding(ExplodeStage),
}

/// Stage of the failure sequence. All timers advance on unscaled time,
/// since the sequence itself drives the time-scale to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExplodeStage {
    /// Overlay fades 0→1 while time-scale runs 1→0 in sync
    FadeIn { elapsed: f32 },
    /// Frozen pause at full white before the round resets
    Hold { elapsed: f32 },
    /// Overlay fades back 1→0 over the freshly reset round
    FadeOut { elapsed: f32 },
}

/// What a spawned entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Sliceable produce; index into the configured archetype set
    Produce { archetype: usize },
    Bomb,
}

/// One physics-simulated half of a sliced produce entity
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlicedPiece {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rot: f32,
    pub angular_vel: f32,
}

/// A spawned produce or bomb instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Z rotation (radians), sampled at spawn
    pub rot: f32,
    /// Hit-volume radius, copied from the archetype at spawn
    pub radius: f32,
    /// Seconds until automatic removal
    pub lifetime_remaining: f32,
    /// Collision participation; cleared after a reaction (one-shot)
    pub can_react: bool,
    /// Visual variant: false = whole, true = sliced
    pub sliced: bool,
    /// Half-pieces, populated when a produce entity is sliced. They
    /// share the parent's lifetime.
    pub pieces: Vec<SlicedPiece>,
}

/// Events emitted by the simulation for the host to drain each tick
/// (score display, particle/trail hooks, scene switching).
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EntitySpawned { id: u32, kind: EntityKind },
    /// Score display should show this value
    ScoreChanged(u32),
    /// One-shot juice particle burst at the cut
    ProduceSliced { pos: Vec2, angle: f32 },
    BombTriggered,
    RoundReset,
    /// Player hit the exit shortcut; the host owns the context switch
    ExitToMenu,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Live RNG stream; serialized so snapshots resume mid-stream
    pub rng: Pcg32,
    /// Validated tuning
    pub config: Config,
    /// Current score (monotonic within a round)
    pub score: u32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Global multiplier applied to physics/lifetime time
    pub time_scale: f32,
    /// Overlay alpha (0 clear .. 1 full white)
    pub fade_alpha: f32,
    pub blade: Blade,
    pub spawner: Spawner,
    /// Live entities (sorted by id for determinism)
    pub entities: Vec<Entity>,
    /// Pending events for the host (not part of snapshots)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game with the given seed and tuning. Fails fast on
    /// invalid configuration.
    pub fn new(seed: u64, config: Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            score: 0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            time_scale: 1.0,
            fade_alpha: 0.0,
            blade: Blade::default(),
            spawner: Spawner::default(),
            entities: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };
        state.new_round();
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Report one slice to the score
    pub fn increase_score(&mut self) {
        self.score += 1;
        self.events.push(GameEvent::ScoreChanged(self.score));
    }

    /// Round setup: enable blade and spawner, zero the score, restore
    /// the time-scale, clear the playfield.
    pub fn new_round(&mut self) {
        self.blade.set_enabled(true);
        self.spawner.set_enabled(true);
        self.score = 0;
        self.time_scale = 1.0;
        self.entities.clear();
        self.events.push(GameEvent::ScoreChanged(0));
    }

    /// Take the pending events for host dispatch
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
