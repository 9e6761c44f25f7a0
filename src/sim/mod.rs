//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod blade;
pub mod collision;
pub mod entity;
pub mod spawner;
pub mod state;
pub mod tick;

pub use blade::Blade;
pub use collision::{closest_point_on_segment, segment_circle_overlap};
pub use entity::SliceOutcome;
pub use spawner::{SpawnCommand, Spawner};
pub use state::{
    Entity, EntityKind, ExplodeStage, GameEvent, GamePhase, GameState, SlicedPiece,
};
pub use tick::{TickInput, tick};
