//! Swept sphere collision
//!
//! Obstacles can cover more than their own diameter in a single tick once the
//! difficulty climbs, so testing end positions alone lets them tunnel through
//! the actor. Instead each tick's motion is treated as a segment and tested
//! against the actor's sphere.

use glam::Vec3;

/// Earliest parameter t in [0, 1] at which a point moving from `origin` along
/// `displacement` is within `radius` of `center`.
///
/// Solves |origin + t·D − center|² = r², i.e. `A t² + B t + C = 0` with
/// A = D·D, B = 2 (origin − center)·D, C = |origin − center|² − r².
/// The point is inside the sphere for t in [t1, t2]; a hit is any overlap
/// of that interval with [0, 1].
pub fn swept_contact_time(
    origin: Vec3,
    displacement: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<f32> {
    let origin_from_center = origin - center;

    let a = displacement.dot(displacement);
    let c = origin_from_center.dot(origin_from_center) - radius * radius;

    // Not moving this tick: plain overlap test
    if a <= f32::EPSILON {
        return (c <= 0.0).then_some(0.0);
    }

    let b = 2.0 * origin_from_center.dot(displacement);
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_discriminant = discriminant.sqrt();
    let t1 = (-b - sqrt_discriminant) / (2.0 * a);
    let t2 = (-b + sqrt_discriminant) / (2.0 * a);

    if t1 <= 1.0 && t2 >= 0.0 {
        Some(t1.max(0.0))
    } else {
        None
    }
}

/// Whether the segment `origin → origin + displacement` comes within
/// `radius` of `center`
#[inline]
pub fn swept_sphere_contact(origin: Vec3, displacement: Vec3, center: Vec3, radius: f32) -> bool {
    swept_contact_time(origin, displacement, center, radius).is_some()
}

/// Distance from `point` to the segment `origin → origin + displacement`
pub fn segment_distance(origin: Vec3, displacement: Vec3, point: Vec3) -> f32 {
    let len_sq = displacement.length_squared();
    if len_sq <= f32::EPSILON {
        return origin.distance(point);
    }
    let t = ((point - origin).dot(displacement) / len_sq).clamp(0.0, 1.0);
    (origin + displacement * t).distance(point)
}
