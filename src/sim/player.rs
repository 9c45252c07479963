//! Players and their paddles
//!
//! Each player owns a paddle sprite, a scoreboard, and the force map fed from
//! the paddle's motion. Opponents are never stored: the two players live in a
//! `Roster` indexed by `Side`, and a player's opponent is whoever holds the
//! opposite side.

use std::ops::{Index, IndexMut};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::force::{ForceMap, MotionTracker, Rebounder};
use super::frame::{RectangularBodyFrame, Transform};
use super::scoreboard::Scoreboard;
use super::state::Side;
use super::viewport::Viewport;
use crate::settings::Settings;

/// Name that means "pick one for me"
pub const NO_NAME: &str = "";

/// Player profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    pub name: String,
}

impl PlayerData {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Use `name`, or the current local date and time if it is empty
    pub fn named_or_now(name: &str) -> Self {
        if name.trim() == NO_NAME {
            Self::new(chrono::Local::now().format("%m/%d/%Y %-H:%M").to_string())
        } else {
            Self::new(name)
        }
    }
}

/// A paddle sprite plus what drives it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub transform: Transform,
    pub tracker: MotionTracker,
    /// Last control input, -1 (down) ..= 1 (up)
    pub axis: f32,
}

impl Paddle {
    pub fn new(local_position: Vec3) -> Self {
        Self {
            transform: Transform::at(local_position),
            tracker: MotionTracker::new(),
            axis: 0.0,
        }
    }

    pub fn frame(&self) -> RectangularBodyFrame {
        RectangularBodyFrame::from_transform(&self.transform)
    }

    pub fn viewport_position(&self, viewport: &Viewport) -> Vec2 {
        viewport.to_viewport(self.transform.local_position)
    }

    /// Move along Y by `axis * speed * dt` (viewport units), keeping the whole
    /// paddle on screen, then sample the tracker.
    pub fn drive(&mut self, axis: f32, speed_vp: f32, dt: f32, viewport: &Viewport) {
        let axis = if axis.is_finite() { axis.clamp(-1.0, 1.0) } else { 0.0 };
        self.axis = axis;

        let half_len = viewport.vector_to_viewport(self.transform.local_scale.truncate()).y.abs() / 2.0;
        let mut pos = self.viewport_position(viewport);
        pos.y = (pos.y + axis * speed_vp * dt).clamp(half_len, (1.0 - half_len).max(half_len));

        let z = self.transform.local_position.z;
        self.transform.local_position = viewport.to_local(pos).truncate().extend(z);
        self.tracker.sample(pos, dt);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    side: Side,
    data: PlayerData,
    pub paddle: Paddle,
    scoreboard: Scoreboard,
    force_map: ForceMap,
}

impl Player {
    pub fn new(data: PlayerData, side: Side, paddle: Paddle) -> Self {
        Self {
            side,
            data,
            paddle,
            scoreboard: Scoreboard::new(),
            force_map: ForceMap::default(),
        }
    }

    /// Spawn a paddle at `viewport_pos`, sized from the settings
    pub fn create_new(
        name: &str,
        side: Side,
        viewport_pos: Vec2,
        settings: &Settings,
        viewport: &Viewport,
    ) -> Self {
        let data = PlayerData::named_or_now(name);
        log::info!("{side} player: {}", data.name);

        let mut player = Self::new(data, side, Paddle::new(viewport.to_local(viewport_pos)));
        player.set_local_paddle_dimensions(settings.paddle_dimensions_vp, viewport);
        player
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Side of the player this one plays against
    pub fn opponent(&self) -> Side {
        self.side.opposite()
    }

    pub fn data(&self) -> &PlayerData {
        &self.data
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn force_map(&self) -> ForceMap {
        self.force_map
    }

    /// Copy the paddle's tracked motion into the force map (local units)
    pub fn update(&mut self, viewport: &Viewport) {
        let tracker = &self.paddle.tracker;
        self.force_map.paddle_velocity = viewport.vector_to_local(tracker.velocity).y;
        self.force_map.paddle_acceleration =
            viewport.vector_to_local(Vec2::new(0.0, tracker.y_acceleration)).y;
    }

    pub fn score_point(&mut self) {
        self.scoreboard.score_point();
    }

    pub fn as_rebounder(&self) -> Rebounder {
        Rebounder::new(self.force_map, self.paddle.frame())
    }

    /// Size the paddle from fractions of the viewport
    pub fn set_local_paddle_dimensions_from_vp(
        &mut self,
        vp_x_thickness: f32,
        vp_y_length: f32,
        viewport: &Viewport,
    ) {
        let bg = viewport.bg_scale;
        let scale = &mut self.paddle.transform.local_scale;
        *scale = Vec3::new(vp_x_thickness * bg.x, vp_y_length * bg.y, scale.z);
    }

    /// `vp_dimensions` is (thickness, length)
    pub fn set_local_paddle_dimensions(&mut self, vp_dimensions: Vec2, viewport: &Viewport) {
        self.set_local_paddle_dimensions_from_vp(vp_dimensions.x, vp_dimensions.y, viewport);
    }
}

/// Both players of a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    left: Player,
    right: Player,
}

impl Roster {
    pub fn from_settings(settings: &Settings, viewport: &Viewport) -> Self {
        let spawn = |side: Side| {
            Player::create_new(
                settings.player_name(side),
                side,
                settings.paddle_position(side),
                settings,
                viewport,
            )
        };
        Self {
            left: spawn(Side::Left),
            right: spawn(Side::Right),
        }
    }

    pub fn get(&self, side: Side) -> &Player {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut Player {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn opponent_of(&self, side: Side) -> &Player {
        self.get(side.opposite())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        [&self.left, &self.right].into_iter()
    }

    /// Side whose score has reached `win_score`, if any
    pub fn winner(&self, win_score: u32) -> Option<Side> {
        self.iter()
            .find(|p| p.scoreboard().score() >= win_score)
            .map(Player::side)
    }
}

impl Index<Side> for Roster {
    type Output = Player;

    fn index(&self, side: Side) -> &Player {
        self.get(side)
    }
}

impl IndexMut<Side> for Roster {
    fn index_mut(&mut self, side: Side) -> &mut Player {
        self.get_mut(side)
    }
}
