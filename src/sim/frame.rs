//! Transforms and rectangular collision frames
//!
//! A `RectangularBodyFrame` is the axis-aligned box a sprite occupies in
//! local space: centered on the transform's position, sized by its scale.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Engine-owned placement of a sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub local_position: Vec3,
    pub local_scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            local_position: Vec3::ZERO,
            local_scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(local_position: Vec3) -> Self {
        Self {
            local_position,
            ..Default::default()
        }
    }
}

/// Axis-aligned box in local space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangularBodyFrame {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl RectangularBodyFrame {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size.abs() / 2.0,
        }
    }

    pub fn from_transform(transform: &Transform) -> Self {
        Self::new(
            transform.local_position.truncate(),
            transform.local_scale.truncate(),
        )
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    pub fn left(&self) -> f32 {
        self.min().x
    }

    pub fn right(&self) -> f32 {
        self.max().x
    }

    pub fn bottom(&self) -> f32 {
        self.min().y
    }

    pub fn top(&self) -> f32 {
        self.max().y
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.half_extents.x && d.y <= self.half_extents.y
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &RectangularBodyFrame) -> bool {
        let d = (other.center - self.center).abs();
        let reach = self.half_extents + other.half_extents;
        d.x < reach.x && d.y < reach.y
    }

    /// Sweep a box with half extents `half` from `from` to `to` (centers)
    /// against the face of this frame that meets a mover travelling along
    /// `dir` on x (+1.0 rightward, -1.0 leftward).
    ///
    /// Returns the mover's center at first contact, with x resting on the
    /// face, or `None` if it does not touch the face during the step. A mover
    /// already overlapping at `from` contacts at `from`'s height.
    pub fn sweep_x(&self, from: Vec2, to: Vec2, half: Vec2, dir: f32) -> Option<Vec2> {
        let face = self.center.x - dir * self.half_extents.x;
        let back = self.center.x + dir * self.half_extents.x;

        // Already behind the frame before this step
        if dir * (from.x - dir * half.x - back) >= 0.0 {
            return None;
        }
        let prev_lead = from.x + dir * half.x;
        let lead = to.x + dir * half.x;
        if dir * (lead - face) <= 0.0 {
            return None;
        }

        let travel = lead - prev_lead;
        let t = if travel.abs() > f32::EPSILON {
            ((face - prev_lead) / travel).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let y = from.y + (to.y - from.y) * t;
        if (y - self.center.y).abs() >= half.y + self.half_extents.y {
            return None;
        }
        Some(Vec2::new(face - dir * half.x, y))
    }

    /// Where `point` sits along the frame's height: -1 at the bottom edge, 1 at the top
    pub fn vertical_offset(&self, point: Vec2) -> f32 {
        if self.half_extents.y <= f32::EPSILON {
            return 0.0;
        }
        ((point.y - self.center.y) / self.half_extents.y).clamp(-1.0, 1.0)
    }
}
