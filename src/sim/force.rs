//! Paddle motion tracking and force feedback
//!
//! The motion tracker watches a paddle in viewport space. Once per tick the
//! owning player copies its readings into a `ForceMap` (local units), which
//! the rebounder uses to bend the ball on contact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::frame::RectangularBodyFrame;

/// Finite-difference velocity/acceleration of a paddle (viewport units)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionTracker {
    last_position: Option<Vec2>,
    pub velocity: Vec2,
    pub y_acceleration: f32,
}

impl MotionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the paddle's position for this tick
    pub fn sample(&mut self, viewport_pos: Vec2, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        match self.last_position {
            Some(last) => {
                let velocity = (viewport_pos - last) / dt;
                self.y_acceleration = (velocity.y - self.velocity.y) / dt;
                self.velocity = velocity;
            }
            None => {
                self.velocity = Vec2::ZERO;
                self.y_acceleration = 0.0;
            }
        }
        self.last_position = Some(viewport_pos);
    }
}

/// Paddle forces in local units, read by collision response
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForceMap {
    /// Drives the spin `Rebounder::deflect` adds
    pub paddle_velocity: f32,
    /// Not read by `deflect`; published for hosts that hand the rebound to
    /// their own physics engine
    pub paddle_acceleration: f32,
}

/// Read-only view of the defending paddle: its forces plus its collision box.
///
/// Rebuilt whenever the attacker changes, so it is a snapshot of the paddle
/// at that moment and must be refreshed if the paddle keeps moving.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rebounder {
    pub force_map: ForceMap,
    pub frame: RectangularBodyFrame,
}

impl Rebounder {
    pub fn new(force_map: ForceMap, frame: RectangularBodyFrame) -> Self {
        Self { force_map, frame }
    }

    /// Outgoing velocity (local units) after the ball hits this paddle.
    ///
    /// Where the ball lands along the paddle picks the base angle, the paddle's
    /// velocity adds spin, and the result is clamped to `max_bounce_angle`
    /// from horizontal. Speed is preserved.
    pub fn deflect(
        &self,
        velocity: Vec2,
        ball_center: Vec2,
        max_bounce_angle: f32,
        spin: f32,
    ) -> Vec2 {
        let speed = velocity.length();
        if speed <= f32::EPSILON {
            return velocity;
        }

        // Send the ball back toward the side it came from
        let dir_x = if ball_center.x < self.frame.center.x { -1.0 } else { 1.0 };

        let base = self.frame.vertical_offset(ball_center) * max_bounce_angle;
        let out = Vec2::new(dir_x * base.cos(), base.sin()) * speed
            + Vec2::new(0.0, self.force_map.paddle_velocity * spin);

        let angle = out.y.atan2(out.x.abs()).clamp(-max_bounce_angle, max_bounce_angle);
        Vec2::new(dir_x * angle.cos(), angle.sin()) * speed
    }
}
