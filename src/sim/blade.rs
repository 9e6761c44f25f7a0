//! Pointer-tracked slicing blade
//!
//! Tracks one slice gesture at a time: world position, per-tick delta
//! and instantaneous velocity. The hit-volume only participates in
//! collision while the gesture moves faster than the configured
//! minimum, so resting the pointer on an entity does not cut it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Slice gesture state. At most one gesture is active at a time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Blade {
    /// Component toggle; gameplay input is frozen while disabled
    pub enabled: bool,
    /// Is a gesture in progress?
    pub slicing: bool,
    /// Current world position on the z=0 plane
    pub pos: Vec2,
    /// Delta since the previous sample. Readable by entities for their
    /// reaction, never written by them.
    pub direction: Vec2,
    /// Instantaneous gesture speed (world units/s)
    pub velocity: f32,
    /// Whether the blade's hit-volume participates in collision
    pub hit_volume_enabled: bool,
    /// Visual trail toggle for the host
    pub trail_enabled: bool,
    /// Release seen in the same tick as a press; applied next tick
    pending_release: bool,
}

impl Blade {
    /// Enable or disable the blade. Both transitions end any gesture,
    /// mirroring component enable/disable lifecycle.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.stop_slicing();
    }

    /// Per-tick pointer sample. `pressed`/`released` are edge flags for
    /// this tick; `world` is the pointer projected onto the blade's
    /// depth plane.
    pub fn update(
        &mut self,
        world: Vec2,
        pressed: bool,
        released: bool,
        min_slice_velocity: f32,
        dt: f32,
    ) {
        if !self.enabled {
            return;
        }

        // A release deferred from a same-tick press/release pair is
        // processed before this tick's events.
        if self.pending_release {
            self.pending_release = false;
            self.stop_slicing();
        }

        if pressed {
            self.start_slicing(world);
            if released {
                // Same-tick down+up: treat as down, defer the up
                self.pending_release = true;
            }
        } else if released {
            self.stop_slicing();
        } else if self.slicing {
            self.continue_slicing(world, min_slice_velocity, dt);
        }
    }

    fn start_slicing(&mut self, world: Vec2) {
        self.pos = world;
        self.slicing = true;
        self.hit_volume_enabled = true;
        self.trail_enabled = true;
        // No history carries across gestures
        self.direction = Vec2::ZERO;
        self.velocity = 0.0;
    }

    fn stop_slicing(&mut self) {
        self.slicing = false;
        self.hit_volume_enabled = false;
        self.trail_enabled = false;
        self.direction = Vec2::ZERO;
        self.velocity = 0.0;
    }

    fn continue_slicing(&mut self, world: Vec2, min_slice_velocity: f32, dt: f32) {
        self.direction = world - self.pos;
        self.velocity = self.direction.length() / dt;
        // Slow motions must not register as cuts
        self.hit_volume_enabled = self.velocity > min_slice_velocity;
        // Raw sample, no smoothing
        self.pos = world;
    }
}
