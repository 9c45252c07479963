//! Pong Rally - headless two-player Pong rally core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (serve schedule, attacker tracking, paddles, collisions)
//! - `settings`: Data-driven match configuration
//! - `error`: Error types surfaced by the simulation and settings loader

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ServeError, SettingsError};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Points needed to win a match
    pub const WIN_SCORE: u32 = 7;
    /// Largest accepted win score (keeps the serve schedule small)
    pub const MAX_WIN_SCORE: u32 = 1000;

    /// Serve jitter bound (radians, either side of horizontal)
    pub const BALL_SERVE_MAX_ANGLE: f32 = std::f32::consts::FRAC_PI_6;
    /// Serve speed in viewport widths per second
    pub const BALL_SPEED_VP: f32 = 0.6;
    /// Ball edge length as a fraction of viewport height
    pub const BALL_SCALE_Y: f32 = 0.03;
    /// Ball spawn point (viewport)
    pub const BALL_START_POSITION: Vec2 = Vec2::new(0.5, 0.5);

    /// Paddle thickness (viewport x) and length (viewport y)
    pub const PADDLE_DIMENSIONS_VP: Vec2 = Vec2::new(0.015, 0.18);
    /// Paddle spawn points (viewport)
    pub const LEFT_PADDLE_POSITION: Vec2 = Vec2::new(0.04, 0.5);
    pub const RIGHT_PADDLE_POSITION: Vec2 = Vec2::new(0.96, 0.5);
    /// Paddle travel speed in viewport heights per second
    pub const PADDLE_SPEED_VP: f32 = 1.2;

    /// Largest outgoing angle off a paddle (radians)
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;
    /// How much paddle velocity bends the rebound
    pub const PADDLE_SPIN: f32 = 0.35;

    /// Background transform (local units covered by the viewport)
    pub const BG_SCALE: Vec2 = Vec2::new(16.0, 9.0);

    /// Goal sequence delays (ticks): destroy -> reset -> serve
    pub const RESET_DELAY_TICKS: u32 = 12;
    pub const SERVE_DELAY_TICKS: u32 = 60;
}

/// Unit vector pointing along `angle`
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
