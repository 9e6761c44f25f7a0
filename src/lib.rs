//! Veggie Slash - a slice-the-falling-produce arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, slicing, game state)
//! - `config`: Data-driven game tuning, validated at load time
//!
//! The crate is headless: rendering, real pointer devices and scene
//! switching belong to the embedding host. The host feeds a
//! [`sim::TickInput`] into [`sim::tick`] once per fixed timestep and
//! drains [`sim::GameEvent`]s to drive its display.

pub mod config;
pub mod sim;

pub use config::{Config, ConfigError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth slicing)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Gravity acceleration applied to airborne entities (world units/s²)
    pub const GRAVITY: f32 = -9.81;

    /// Height of the visible world slice at the blade's depth plane
    /// (world units); the spawn volume and camera framing share it.
    pub const VIEW_HEIGHT: f32 = 12.0;
}

/// Project a screen-space pointer position onto the world z=0 plane.
///
/// Origin at the viewport center, y up, scaled so the viewport height
/// spans [`consts::VIEW_HEIGHT`] world units.
#[inline]
pub fn screen_to_world(screen: Vec2, viewport: Vec2) -> Vec2 {
    let scale = consts::VIEW_HEIGHT / viewport.y;
    Vec2::new(
        (screen.x - viewport.x / 2.0) * scale,
        -(screen.y - viewport.y / 2.0) * scale,
    )
}

/// Rotate the unit up vector (0, 1) by `angle` radians.
#[inline]
pub fn rotated_up(angle: f32) -> Vec2 {
    Vec2::new(-angle.sin(), angle.cos())
}
