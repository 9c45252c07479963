//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, input polling, or platform dependencies

pub mod ball;
pub mod bot;
pub mod force;
pub mod frame;
pub mod player;
pub mod scoreboard;
pub mod serve;
pub mod state;
pub mod tick;
pub mod viewport;

pub use ball::{BallBody, PongBall};
pub use bot::{Bot, BotPair};
pub use force::{ForceMap, MotionTracker, Rebounder};
pub use frame::{RectangularBodyFrame, Transform};
pub use player::{NO_NAME, Paddle, Player, PlayerData, Roster};
pub use scoreboard::Scoreboard;
pub use serve::{ServeEntry, ServeSchedule};
pub use state::{GameEvent, GamePhase, Goal, MatchState, MatchSummary, Side};
pub use tick::{TickInput, advance_frame, tick};
pub use viewport::Viewport;
