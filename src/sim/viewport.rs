//! Viewport <-> local space conversion
//!
//! The viewport is the normalized screen rectangle: (0, 0) bottom-left,
//! (1, 1) top-right. Local space is where transforms live; the background
//! sprite is centered at `bg_center` and spans `bg_scale` local units.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub bg_center: Vec2,
    pub bg_scale: Vec2,
}

impl Viewport {
    pub fn new(bg_center: Vec2, bg_scale: Vec2) -> Self {
        Self { bg_center, bg_scale }
    }

    /// Viewport centered on the local origin
    pub fn centered(bg_scale: Vec2) -> Self {
        Self::new(Vec2::ZERO, bg_scale)
    }

    /// Viewport point to local position (z = 0)
    #[inline]
    pub fn to_local(&self, vp: Vec2) -> Vec3 {
        (self.bg_center + (vp - Vec2::splat(0.5)) * self.bg_scale).extend(0.0)
    }

    /// Local position to viewport point (z ignored)
    #[inline]
    pub fn to_viewport(&self, local: Vec3) -> Vec2 {
        (local.truncate() - self.bg_center) / self.bg_scale + Vec2::splat(0.5)
    }

    /// Viewport displacement/velocity to local units (no translation)
    #[inline]
    pub fn vector_to_local(&self, v: Vec2) -> Vec2 {
        v * self.bg_scale
    }

    /// Local displacement/velocity to viewport units
    #[inline]
    pub fn vector_to_viewport(&self, v: Vec2) -> Vec2 {
        v / self.bg_scale
    }
}
