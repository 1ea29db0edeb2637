//! Spatial occupancy queries over the live ball set.
//!
//! Callers pass the live ball centres fresh from the physics world; nothing
//! here caches positions between ticks.

use glam::Vec2;
use std::f32::consts::PI;

/// Angular samples per ring (a step of π/8).
pub const RING_SAMPLES: usize = 16;
/// Ring radius bound for `find_nearby_position`, in ball diameters.
pub const NEARBY_MAX_RADIUS: f32 = 3.0;
/// Upper bound on rings in any scan, whatever the radii.
const MAX_RINGS: usize = 64;
/// Slack that lets two balls at exactly the minimum distance count as clear.
const CLEARANCE_TOLERANCE: f32 = 1e-3;

/// Whether `point` is at least `min_distance` from every live ball.
///
/// Always `true` for an empty live set.
pub fn is_position_clear(point: Vec2, live: &[Vec2], min_distance: f32) -> bool {
    live.iter()
        .all(|ball| ball.distance(point) >= min_distance - CLEARANCE_TOLERANCE)
}

/// Candidate points on concentric rings around `center`.
///
/// Radii start at `first_radius` and grow by `step` while strictly below
/// `max_radius`. Each ring is sampled at `RING_SAMPLES` angles starting at
/// zero. The order (radius ascending, then angle ascending) is stable, so
/// callers can predict which candidate wins.
pub fn ring_candidates(
    center: Vec2,
    first_radius: f32,
    max_radius: f32,
    step: f32,
) -> impl Iterator<Item = Vec2> {
    let rings = if step > 0.0 {
        (0..MAX_RINGS)
            .take_while(|&ring| first_radius + ring as f32 * step < max_radius - step * 1e-3)
            .count()
    } else {
        0
    };
    (0..rings).flat_map(move |ring| {
        let radius = first_radius + ring as f32 * step;
        (0..RING_SAMPLES).map(move |sample| {
            let angle = sample as f32 * PI / 8.0;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
    })
}

/// First clear point on rings of one to three ball diameters around `point`,
/// stepping by half a diameter.
pub fn find_nearby_position(
    point: Vec2,
    live: &[Vec2],
    ball_diameter: f32,
    min_distance: f32,
) -> Option<Vec2> {
    ring_candidates(
        point,
        ball_diameter,
        ball_diameter * NEARBY_MAX_RADIUS,
        ball_diameter / 2.0,
    )
    .find(|candidate| is_position_clear(*candidate, live, min_distance))
}
