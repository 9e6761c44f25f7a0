//! Produce and bomb slice reactions
//!
//! Both entity kinds react to contact with the blade's active
//! hit-volume exactly once. Produce splits into two simulated
//! half-pieces and scores; a bomb hands control to the failure
//! sequence.

use glam::Vec2;

use super::state::{Entity, EntityKind, SlicedPiece};
use crate::rotated_up;

/// Result of offering a slice contact to an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliceOutcome {
    /// Entity no longer participates in collision
    Ignored,
    /// Produce was cut; carries the particle-burst pose for the host
    Sliced { pos: Vec2, angle: f32 },
    /// Bomb was hit; the failure sequence must begin
    Exploded,
}

impl Entity {
    /// Build a freshly spawned entity with an upward impulse along its
    /// rotated up vector.
    pub fn spawn(
        id: u32,
        kind: EntityKind,
        pos: Vec2,
        rot: f32,
        radius: f32,
        impulse: f32,
        lifetime: f32,
    ) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: rotated_up(rot) * impulse,
            rot,
            radius,
            lifetime_remaining: lifetime,
            can_react: true,
            sliced: false,
            pieces: Vec::new(),
        }
    }

    /// React to contact with an active slice gesture.
    ///
    /// `direction` is the gesture's current per-tick delta, `blade_pos`
    /// its world position; the impulse on produce pieces is applied at
    /// that point, so off-center cuts spin the halves.
    pub fn react_to_slice(
        &mut self,
        direction: Vec2,
        blade_pos: Vec2,
        slide_force: f32,
    ) -> SliceOutcome {
        if !self.can_react {
            return SliceOutcome::Ignored;
        }
        // One-shot: no second reaction regardless of kind
        self.can_react = false;

        match self.kind {
            EntityKind::Bomb => SliceOutcome::Exploded,
            EntityKind::Produce { .. } => {
                self.sliced = true;

                let angle = direction.y.atan2(direction.x);
                let impulse = direction * slide_force;
                // Halves sit either side of the slice plane
                let perp = Vec2::new(-direction.y, direction.x).normalize_or(Vec2::Y);
                let inertia = (0.5 * self.radius * self.radius).max(0.01);

                self.pieces = [-1.0f32, 1.0].into_iter().map(|side| {
                    let pos = self.pos + perp * (side * self.radius * 0.5);
                    let lever = pos - blade_pos;
                    SlicedPiece {
                        pos,
                        // Each half keeps the whole's momentum, plus the cut impulse
                        vel: self.vel + impulse,
                        rot: angle,
                        angular_vel: lever.perp_dot(impulse) / inertia,
                    }
                }).collect();

                SliceOutcome::Sliced { pos: blade_pos, angle }
            }
        }
    }
}
