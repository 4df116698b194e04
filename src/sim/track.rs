//! Track geometry
//!
//! Obstacles enter at the spawn anchor and travel in a straight line toward
//! the despawn anchor. Lateral placement (Y) is bounded by the range anchors.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::axis;
use crate::error::SetupError;
use crate::with_lateral;

/// Immutable track layout, derived once from the scene anchors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackGeometry {
    pub spawn: Vec3,
    /// Despawn anchor, with its lateral coordinate aligned to the spawn anchor
    pub despawn: Vec3,
    /// Unit vector from spawn toward despawn
    pub direction: Vec3,
    /// Lateral bounds, `x` = min and `y` = max
    pub lateral_range: Vec2,
}

impl TrackGeometry {
    /// Build from the right range anchor (doubling as spawn), the left range
    /// anchor, and the despawn anchor
    pub fn from_anchors(right: Vec3, left: Vec3, despawn: Vec3) -> Result<Self, SetupError> {
        let spawn = right;
        // Travel must stay in the plane of the track, never drifting sideways
        let despawn = with_lateral(despawn, spawn.y);
        let direction = (despawn - spawn)
            .try_normalize()
            .ok_or(SetupError::DegenerateTrack)?;

        Ok(Self {
            spawn,
            despawn,
            direction,
            lateral_range: Vec2::new(right.y.min(left.y), right.y.max(left.y)),
        })
    }

    /// Lateral span the actor may occupy after keeping `margin` off each end
    pub fn steer_bounds(&self, margin: f32) -> Result<(f32, f32), SetupError> {
        let lo = self.lateral_range.x + margin;
        let hi = self.lateral_range.y - margin;
        if lo > hi {
            return Err(SetupError::LateralRangeTooNarrow {
                min: self.lateral_range.x,
                max: self.lateral_range.y,
                margin,
            });
        }
        Ok((lo, hi))
    }

    /// Lateral coordinate for a uniform draw `t` in [0, 1)
    #[inline]
    pub fn lateral_at(&self, t: f32) -> f32 {
        t * self.lateral_range.x + (1.0 - t) * self.lateral_range.y
    }

    /// Where an obstacle enters the track
    pub fn spawn_point(&self, t: f32, depth: f32) -> Vec3 {
        with_lateral(self.spawn, self.lateral_at(t)) + axis::VERTICAL * depth
    }

    /// True once `position` is at or beyond the despawn anchor along the
    /// direction of travel
    #[inline]
    pub fn has_passed_despawn(&self, position: Vec3) -> bool {
        (position - self.despawn).dot(self.direction) >= 0.0
    }
}
