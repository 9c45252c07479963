//! Match settings
//!
//! Persisted as JSON next to the binary (or wherever `--settings` points).

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::{ServeSchedule, Side};

/// Match length presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MatchLength {
    Quick,
    #[default]
    Standard,
    Long,
}

impl MatchLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchLength::Quick => "Quick",
            MatchLength::Standard => "Standard",
            MatchLength::Long => "Long",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quick" | "short" => Some(MatchLength::Quick),
            "standard" | "std" => Some(MatchLength::Standard),
            "long" => Some(MatchLength::Long),
            _ => None,
        }
    }

    /// Points needed to win for this preset
    pub fn win_score(&self) -> u32 {
        match self {
            MatchLength::Quick => 3,
            MatchLength::Standard => WIN_SCORE,
            MatchLength::Long => 11,
        }
    }
}

/// Match settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Points needed to win
    pub win_score: u32,
    /// Who serves first
    pub first_server: Side,

    // === Names ===
    /// Empty means "name me after the current date and time"
    pub left_name: String,
    pub right_name: String,

    // === Ball ===
    /// Serve jitter bound (radians)
    pub serve_max_angle: f32,
    /// Serve speed (viewport widths per second)
    pub ball_speed_vp: f32,
    /// Ball size as a fraction of viewport height
    pub ball_scale_y: f32,
    /// Ball spawn point (viewport)
    pub ball_start_position: Vec2,

    // === Paddles ===
    /// Thickness (x) and length (y) in viewport units
    pub paddle_dimensions_vp: Vec2,
    pub left_paddle_position: Vec2,
    pub right_paddle_position: Vec2,
    /// Paddle speed (viewport heights per second)
    pub paddle_speed_vp: f32,

    // === Rebounds ===
    pub max_bounce_angle: f32,
    pub paddle_spin: f32,

    // === Scene ===
    /// Local-space size of the background the viewport maps onto
    pub bg_scale: Vec2,

    // === Goal sequence ===
    pub reset_delay_ticks: u32,
    pub serve_delay_ticks: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            win_score: WIN_SCORE,
            first_server: Side::Left,

            left_name: String::new(),
            right_name: String::new(),

            serve_max_angle: BALL_SERVE_MAX_ANGLE,
            ball_speed_vp: BALL_SPEED_VP,
            ball_scale_y: BALL_SCALE_Y,
            ball_start_position: BALL_START_POSITION,

            paddle_dimensions_vp: PADDLE_DIMENSIONS_VP,
            left_paddle_position: LEFT_PADDLE_POSITION,
            right_paddle_position: RIGHT_PADDLE_POSITION,
            paddle_speed_vp: PADDLE_SPEED_VP,

            max_bounce_angle: MAX_BOUNCE_ANGLE,
            paddle_spin: PADDLE_SPIN,

            bg_scale: BG_SCALE,

            reset_delay_ticks: RESET_DELAY_TICKS,
            serve_delay_ticks: SERVE_DELAY_TICKS,
        }
    }
}

impl Settings {
    /// Create settings from a match length preset
    pub fn from_preset(preset: MatchLength) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a match length preset
    pub fn apply_preset(&mut self, preset: MatchLength) {
        self.win_score = preset.win_score();
    }

    /// Number of serves a full match can need (every point but the last is answered)
    pub fn max_rounds(&self) -> Option<u32> {
        ServeSchedule::rounds_for(self.win_score)
    }

    /// Paddle position for a side (viewport)
    pub fn paddle_position(&self, side: Side) -> Vec2 {
        match side {
            Side::Left => self.left_paddle_position,
            Side::Right => self.right_paddle_position,
        }
    }

    /// Configured name for a side (may be empty)
    pub fn player_name(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.left_name,
            Side::Right => &self.right_name,
        }
    }

    /// Check ranges the simulation relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(1..=MAX_WIN_SCORE).contains(&self.win_score) {
            return Err(SettingsError::invalid(
                "win_score",
                format!("{} is outside 1..={MAX_WIN_SCORE}", self.win_score),
            ));
        }

        let scalars = [
            ("serve_max_angle", self.serve_max_angle),
            ("ball_speed_vp", self.ball_speed_vp),
            ("ball_scale_y", self.ball_scale_y),
            ("paddle_speed_vp", self.paddle_speed_vp),
            ("max_bounce_angle", self.max_bounce_angle),
            ("paddle_spin", self.paddle_spin),
        ];
        let vectors = [
            ("ball_start_position", self.ball_start_position),
            ("paddle_dimensions_vp", self.paddle_dimensions_vp),
            ("left_paddle_position", self.left_paddle_position),
            ("right_paddle_position", self.right_paddle_position),
            ("bg_scale", self.bg_scale),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(SettingsError::invalid(field, format!("{value} is not finite")));
            }
        }
        for (field, value) in vectors {
            if !value.is_finite() {
                return Err(SettingsError::invalid(field, format!("{value} is not finite")));
            }
        }

        if !(0.0..std::f32::consts::FRAC_PI_2).contains(&self.serve_max_angle) {
            return Err(SettingsError::invalid(
                "serve_max_angle",
                format!("{} is outside [0, π/2)", self.serve_max_angle),
            ));
        }
        if !(0.0..std::f32::consts::FRAC_PI_2).contains(&self.max_bounce_angle) {
            return Err(SettingsError::invalid(
                "max_bounce_angle",
                format!("{} is outside [0, π/2)", self.max_bounce_angle),
            ));
        }
        if self.ball_speed_vp <= 0.0 {
            return Err(SettingsError::invalid("ball_speed_vp", "must be positive"));
        }
        if self.ball_scale_y <= 0.0 || self.ball_scale_y >= 1.0 {
            return Err(SettingsError::invalid("ball_scale_y", "must be in (0, 1)"));
        }
        if self.paddle_dimensions_vp.min_element() <= 0.0 || self.paddle_dimensions_vp.y >= 1.0 {
            return Err(SettingsError::invalid(
                "paddle_dimensions_vp",
                "thickness and length must be in (0, 1)",
            ));
        }
        if self.paddle_speed_vp < 0.0 {
            return Err(SettingsError::invalid("paddle_speed_vp", "must not be negative"));
        }
        if self.paddle_spin < 0.0 {
            return Err(SettingsError::invalid("paddle_spin", "must not be negative"));
        }
        if self.left_paddle_position.x >= self.ball_start_position.x
            || self.right_paddle_position.x <= self.ball_start_position.x
        {
            return Err(SettingsError::invalid(
                "paddle_position",
                "left paddle must start left of the ball and right paddle right of it",
            ));
        }
        if self.bg_scale.min_element() <= 0.0 {
            return Err(SettingsError::invalid("bg_scale", "must be positive"));
        }
        Ok(())
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_max_rounds() {
        let settings = Settings::from_preset(MatchLength::Quick);
        assert_eq!(settings.max_rounds(), Some(5));
        assert_eq!(Settings::default().max_rounds(), Some(2 * WIN_SCORE - 1));
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(MatchLength::from_str("LONG"), Some(MatchLength::Long));
        assert_eq!(MatchLength::from_str("std"), Some(MatchLength::Standard));
        assert_eq!(MatchLength::from_str("forever"), None);
    }

    #[test]
    fn test_rejects_zero_win_score() {
        let settings = Settings {
            win_score: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid { field: "win_score", .. })
        ));
    }

    #[test]
    fn test_rejects_oversized_win_score() {
        for win_score in [MAX_WIN_SCORE + 1, u32::MAX] {
            let settings = Settings {
                win_score,
                ..Default::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(SettingsError::Invalid { field: "win_score", .. })
            ));
        }
        let settings = Settings {
            win_score: MAX_WIN_SCORE,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let cases = [
            Settings {
                ball_speed_vp: f32::NAN,
                ..Default::default()
            },
            Settings {
                ball_scale_y: f32::NAN,
                ..Default::default()
            },
            Settings {
                paddle_speed_vp: f32::INFINITY,
                ..Default::default()
            },
            Settings {
                paddle_spin: f32::NAN,
                ..Default::default()
            },
            Settings {
                bg_scale: Vec2::new(16.0, f32::INFINITY),
                ..Default::default()
            },
        ];
        for settings in cases {
            assert!(settings.validate().is_err(), "{settings:?}");
        }
    }

    #[test]
    fn test_rejects_negative_paddle_speed_and_spin() {
        let settings = Settings {
            paddle_speed_vp: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid { field: "paddle_speed_vp", .. })
        ));
        let settings = Settings {
            paddle_spin: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid { field: "paddle_spin", .. })
        ));
    }

    #[test]
    fn test_rejects_crossed_paddles() {
        let settings = Settings {
            left_paddle_position: Vec2::new(0.9, 0.5),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "win_score": 2 }"#).unwrap();
        assert_eq!(settings.win_score, 2);
        assert_eq!(settings.ball_speed_vp, BALL_SPEED_VP);
        assert_eq!(settings.first_server, Side::Left);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("pong-rally-settings-{}.json", std::process::id()));
        let settings = Settings {
            win_score: 4,
            first_server: Side::Right,
            left_name: "Ada".into(),
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.win_score, 4);
        assert_eq!(loaded.first_server, Side::Right);
        assert_eq!(loaded.left_name, "Ada");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = Settings::load("/definitely/not/here/pong.json");
        assert!(matches!(result, Err(SettingsError::IoError(_))));
    }
}
