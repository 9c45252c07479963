//! Computer-controlled paddles
//!
//! A bot predicts where the ball will cross its paddle line (folding in wall
//! bounces) and steers toward that point plus an aim error. The error is
//! re-rolled every time the ball changes hands, and its spread grows as skill
//! drops, so weaker bots miss some returns.

use glam::Vec2;
use rand::Rng;

use super::state::{GamePhase, MatchState, Side};

/// Distance (viewport heights) inside which the bot stops adjusting
const DEAD_ZONE: f32 = 0.01;
/// Distance at which the bot pushes the stick all the way
const FULL_THROW: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct Bot {
    pub side: Side,
    /// 0.0 (hopeless) ..= 1.0 (never misses a reachable ball)
    pub skill: f32,
    aim_offset: f32,
    /// (attacker, serves remaining) when the offset was last rolled
    last_touch: Option<(Option<Side>, usize)>,
}

impl Bot {
    pub fn new(side: Side, skill: f32) -> Self {
        Self {
            side,
            skill: skill.clamp(0.0, 1.0),
            aim_offset: 0.0,
            last_touch: None,
        }
    }

    /// Stick position for this tick
    pub fn axis(&mut self, state: &MatchState, rng: &mut impl Rng) -> f32 {
        let viewport = &state.viewport;
        let paddle = &state.players[self.side].paddle;
        let paddle_pos = paddle.viewport_position(viewport);

        let touch = (state.ball.attacker(), state.ball.serves_remaining());
        if self.last_touch != Some(touch) {
            self.last_touch = Some(touch);
            self.aim_offset = self.roll_offset(state, rng);
        }

        let target = match self.incoming(state, paddle_pos.x) {
            Some(y) => y + self.aim_offset,
            None => 0.5,
        };

        let diff = target - paddle_pos.y;
        if diff.abs() < DEAD_ZONE {
            0.0
        } else {
            (diff / FULL_THROW).clamp(-1.0, 1.0)
        }
    }

    /// Predicted ball Y at `paddle_x` if the ball is live and coming this way
    fn incoming(&self, state: &MatchState, paddle_x: f32) -> Option<f32> {
        if state.phase != GamePhase::Rally || !state.ball.body.active {
            return None;
        }
        let viewport = &state.viewport;
        let ball = &state.ball.body;
        let pos = viewport.to_viewport(ball.transform.local_position);
        let vel = ball.viewport_velocity;

        let dx = paddle_x - pos.x;
        if vel.x.abs() <= f32::EPSILON || dx.signum() != vel.x.signum() {
            return None;
        }

        let half_height = viewport
            .vector_to_viewport(ball.transform.local_scale.truncate())
            .y
            .abs()
            / 2.0;
        let t = dx / vel.x;
        Some(fold_between(pos.y + vel.y * t, half_height, 1.0 - half_height))
    }

    fn roll_offset(&self, state: &MatchState, rng: &mut impl Rng) -> f32 {
        let viewport = &state.viewport;
        let paddle_half = viewport
            .vector_to_viewport(state.players[self.side].paddle.transform.local_scale.truncate())
            .y
            .abs()
            / 2.0;
        let ball_half = viewport
            .vector_to_viewport(state.ball.body.transform.local_scale.truncate())
            .y
            .abs()
            / 2.0;
        let reach = paddle_half + ball_half;
        let spread = reach * (2.0 - self.skill);
        rng.random_range(-spread..=spread)
    }
}

/// Reflect `y` back into `[lo, hi]` as if bouncing between two walls
fn fold_between(y: f32, lo: f32, hi: f32) -> f32 {
    let range = hi - lo;
    if range <= 0.0 {
        return lo;
    }
    let m = (y - lo).rem_euclid(2.0 * range);
    if m <= range { lo + m } else { hi - (m - range) }
}

/// Convenience: a pair of bots driving both paddles
#[derive(Debug, Clone)]
pub struct BotPair {
    pub left: Bot,
    pub right: Bot,
}

impl BotPair {
    pub fn new(left_skill: f32, right_skill: f32) -> Self {
        Self {
            left: Bot::new(Side::Left, left_skill),
            right: Bot::new(Side::Right, right_skill),
        }
    }

    /// Both axes for this tick
    pub fn axes(&mut self, state: &MatchState, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(self.left.axis(state, rng), self.right.axis(state, rng))
    }
}
