//! Blade-sweep collision tests
//!
//! The blade moves in discrete samples, so a cut is detected by sweeping
//! the segment between the previous and current blade positions against
//! each entity's circular hit-volume. Sweeping instead of point-testing
//! keeps fast gestures from tunneling straight through small produce.

use glam::Vec2;

/// Closest point to `p` on the segment `a`..`b`.
pub fn closest_point_on_segment(a: Vec2, b: Vec2, p: Vec2) -> Vec2 {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq < 0.0001 {
        // Degenerate segment: the blade did not move this tick
        return a;
    }
    let t = ((p - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    a + seg * t
}

/// Does the segment `a`..`b` pass within `radius` of `center`?
pub fn segment_circle_overlap(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    let closest = closest_point_on_segment(a, b, center);
    (center - closest).length_squared() <= radius * radius
}
