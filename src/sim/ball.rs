//! The ball: serve sequencing and attacker tracking
//!
//! After a goal the sequence is: `destroy_ball()` -> tiny delay -> `reset()`
//! -> small delay -> `serve()`. The ball is never dropped between points; it
//! is deactivated and parked at the start position.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::force::Rebounder;
use super::frame::{RectangularBodyFrame, Transform};
use super::player::Roster;
use super::serve::{ServeEntry, ServeSchedule};
use super::state::{Goal, Side};
use super::viewport::Viewport;
use crate::direction;
use crate::error::ServeError;
use crate::settings::Settings;

/// Engine-side state of the ball sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallBody {
    pub transform: Transform,
    /// Hidden balls are neither drawn nor collided
    pub active: bool,
    /// Velocity in viewport units per second
    pub viewport_velocity: Vec2,
    in_trajectory: bool,
    /// Seconds since the current trajectory began (serve or last rebound)
    trajectory_time: f32,
}

impl BallBody {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            active: true,
            viewport_velocity: Vec2::ZERO,
            in_trajectory: false,
            trajectory_time: 0.0,
        }
    }

    /// Start moving with the current viewport velocity
    pub fn begin_trajectory(&mut self) {
        self.in_trajectory = true;
        self.trajectory_time = 0.0;
    }

    /// Stop dead
    pub fn halt_trajectory(&mut self) {
        self.in_trajectory = false;
        self.viewport_velocity = Vec2::ZERO;
        self.trajectory_time = 0.0;
    }

    /// Restart the trajectory clock after a rebound
    pub fn reset_ball_state(&mut self) {
        self.trajectory_time = 0.0;
    }

    pub fn in_trajectory(&self) -> bool {
        self.in_trajectory
    }

    pub fn trajectory_time(&self) -> f32 {
        self.trajectory_time
    }

    /// Integrate one step. Returns false if the ball is parked.
    pub fn advance(&mut self, dt: f32, viewport: &Viewport) -> bool {
        if !self.active || !self.in_trajectory {
            return false;
        }
        let step = viewport.vector_to_local(self.viewport_velocity * dt);
        self.transform.local_position += step.extend(0.0);
        self.trajectory_time += dt;
        true
    }

    pub fn frame(&self) -> RectangularBodyFrame {
        RectangularBodyFrame::from_transform(&self.transform)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PongBall {
    pub body: BallBody,
    start_local_position: Vec3,
    serve_angles: ServeSchedule,
    /// Last player to send the ball toward the other side
    attacker: Option<Side>,
    /// Goal the attacker is aiming at
    attacker_desire: Goal,
    /// Paddle the ball is currently heading for
    rebounder: Option<Rebounder>,
}

impl PongBall {
    pub fn new(start_local_position: Vec3) -> Self {
        Self {
            body: BallBody::new(Transform::at(start_local_position)),
            start_local_position,
            serve_angles: ServeSchedule::default(),
            attacker: None,
            attacker_desire: Goal::Right,
            rebounder: None,
        }
    }

    /// Spawn at the configured start position, sized from viewport height
    pub fn from_settings(settings: &Settings, viewport: &Viewport) -> Self {
        let mut ball = Self::new(viewport.to_local(settings.ball_start_position));
        ball.set_local_scale_from_vpy(settings.ball_scale_y, viewport);
        ball
    }

    /// Prepare a match: reset, pick the first attacker, and draw every serve.
    pub fn initialize(
        &mut self,
        server: Side,
        roster: &Roster,
        settings: &Settings,
        rng: &mut impl Rng,
    ) {
        self.reset();

        let server_is_right =
            roster[server].paddle.transform.local_position.x > self.start_local_position.x;

        self.attacker_desire = if server_is_right { Goal::Left } else { Goal::Right };
        self.serve_angles = ServeSchedule::generate(
            server_is_right,
            settings.win_score,
            settings.serve_max_angle,
            rng,
        );
        log::debug!(
            "Drew {} serves, {server} serving first",
            self.serve_angles.len()
        );

        self.set_attacker(server, roster);
    }

    /// Launch the next scheduled serve at `speed` (viewport widths per second).
    ///
    /// If the schedule says the other player serves this round, the attacker
    /// swaps first.
    pub fn serve(&mut self, roster: &Roster, speed: f32) -> Result<ServeEntry, ServeError> {
        if self.attacker.is_none() {
            return Err(ServeError::NoAttacker);
        }
        let entry = self.serve_angles.pop().ok_or(ServeError::ScheduleExhausted)?;

        if self.attacker_desire != entry.goal {
            self.swap_attacker(roster)?;
        }

        self.body.viewport_velocity = direction(entry.angle) * speed;
        self.body.begin_trajectory();

        log::info!(
            "Serve toward {} goal at {:.1}°, {} left",
            entry.goal,
            entry.angle.to_degrees(),
            self.serve_angles.len()
        );
        Ok(entry)
    }

    /// The attacker put the ball past the rebounder. Returns the scorer.
    pub fn on_score(&mut self, roster: &mut Roster) -> Result<Side, ServeError> {
        let scorer = self.attacker.ok_or(ServeError::NoAttacker)?;
        self.destroy_ball();
        roster[scorer].score_point();
        log::info!(
            "{scorer} scores ({} - {})",
            roster[Side::Left].scoreboard().score(),
            roster[Side::Right].scoreboard().score()
        );
        Ok(scorer)
    }

    /// The rebounder returned the ball. Returns the new attacker.
    pub fn on_rebound(&mut self, roster: &Roster) -> Result<Side, ServeError> {
        self.body.reset_ball_state();
        self.swap_attacker(roster)
    }

    /// Hide the ball and stop it so it doesn't leave the screen
    pub fn destroy_ball(&mut self) {
        self.body.active = false;
        self.body.halt_trajectory();
    }

    /// Park at the start position and show again
    pub fn reset(&mut self) {
        self.body.transform.local_position = self.start_local_position;
        self.body.active = true;
    }

    pub fn set_attacker(&mut self, attacker: Side, roster: &Roster) {
        self.attacker = Some(attacker);
        // Ball now heads for the other player
        self.rebounder = Some(roster.opponent_of(attacker).as_rebounder());
    }

    /// Hand the offensive to the current attacker's opponent
    pub fn swap_attacker(&mut self, roster: &Roster) -> Result<Side, ServeError> {
        let attacker = self.attacker.ok_or(ServeError::NoAttacker)?;
        let next = roster[attacker].opponent();
        self.set_attacker(next, roster);
        self.attacker_desire = self.attacker_desire.opposite();
        log::debug!("Attacker is now {next}");
        Ok(next)
    }

    /// Re-read the rebounder's paddle (it may have moved since the last swap)
    pub fn refresh_rebounder(&mut self, roster: &Roster) {
        if let Some(attacker) = self.attacker {
            self.rebounder = Some(roster.opponent_of(attacker).as_rebounder());
        }
    }

    /// Square ball, edge = `viewport_y` of the background height
    pub fn set_local_scale_from_vpy(&mut self, viewport_y: f32, viewport: &Viewport) {
        let edge = viewport_y * viewport.bg_scale.y;
        let scale = &mut self.body.transform.local_scale;
        *scale = Vec3::new(edge, edge, scale.z);
    }

    pub fn start_local_position(&self) -> Vec3 {
        self.start_local_position
    }

    pub fn attacker(&self) -> Option<Side> {
        self.attacker
    }

    pub fn attacker_desire(&self) -> Goal {
        self.attacker_desire
    }

    pub fn rebounder(&self) -> Option<&Rebounder> {
        self.rebounder.as_ref()
    }

    pub fn serves_remaining(&self) -> usize {
        self.serve_angles.len()
    }

    pub fn next_serve(&self) -> Option<&ServeEntry> {
        self.serve_angles.peek()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup(win_score: u32) -> (Settings, Viewport, Roster, PongBall) {
        let settings = Settings {
            win_score,
            left_name: "L".into(),
            right_name: "R".into(),
            ..Default::default()
        };
        let viewport = Viewport::centered(settings.bg_scale);
        let roster = Roster::from_settings(&settings, &viewport);
        let ball = PongBall::from_settings(&settings, &viewport);
        (settings, viewport, roster, ball)
    }

    #[test]
    fn test_initialize_fills_schedule() {
        let (settings, _, roster, mut ball) = setup(5);
        let mut rng = Pcg32::seed_from_u64(3);
        ball.initialize(Side::Left, &roster, &settings, &mut rng);

        assert_eq!(ball.serves_remaining(), 9);
        assert_eq!(ball.next_serve().map(|e| e.goal), Some(Goal::Right));
        assert_eq!(ball.attacker(), Some(Side::Left));
        assert_eq!(ball.attacker_desire(), Goal::Right);
        assert_eq!(
            ball.rebounder().map(|r| r.frame),
            Some(roster[Side::Right].paddle.frame())
        );
    }

    #[test]
    fn test_right_server_desires_left_goal() {
        let (settings, _, roster, mut ball) = setup(3);
        let mut rng = Pcg32::seed_from_u64(3);
        ball.initialize(Side::Right, &roster, &settings, &mut rng);
        assert_eq!(ball.attacker_desire(), Goal::Left);

        let entry = ball.serve(&roster, settings.ball_speed_vp).unwrap();
        assert_eq!(entry.goal, Goal::Left);
        assert_eq!(ball.attacker(), Some(Side::Right));
        assert!(ball.body.viewport_velocity.x < 0.0);
        assert!(ball.body.in_trajectory());
    }

    #[test]
    fn test_serve_without_initialize() {
        let (settings, _, roster, mut ball) = setup(3);
        assert_eq!(
            ball.serve(&roster, settings.ball_speed_vp),
            Err(ServeError::NoAttacker)
        );
    }

    #[test]
    fn test_serve_exhaustion_is_an_error() {
        let (settings, _, roster, mut ball) = setup(4);
        let mut rng = Pcg32::seed_from_u64(11);
        ball.initialize(Side::Left, &roster, &settings, &mut rng);

        for _ in 0..settings.max_rounds().unwrap() {
            assert!(ball.serve(&roster, settings.ball_speed_vp).is_ok());
        }
        assert_eq!(
            ball.serve(&roster, settings.ball_speed_vp),
            Err(ServeError::ScheduleExhausted)
        );
    }

    #[test]
    fn test_serves_alternate_attacker() {
        let (settings, _, roster, mut ball) = setup(4);
        let mut rng = Pcg32::seed_from_u64(5);
        ball.initialize(Side::Left, &roster, &settings, &mut rng);

        let mut expected = Side::Left;
        while ball.serve(&roster, settings.ball_speed_vp).is_ok() {
            assert_eq!(ball.attacker(), Some(expected));
            let heading_right = ball.body.viewport_velocity.x > 0.0;
            assert_eq!(heading_right, expected == Side::Left);
            expected = expected.opposite();
        }
    }

    #[test]
    fn test_score_credits_attacker_and_hides_ball() {
        let (settings, _, mut roster, mut ball) = setup(3);
        let mut rng = Pcg32::seed_from_u64(5);
        ball.initialize(Side::Right, &roster, &settings, &mut rng);
        ball.serve(&roster, settings.ball_speed_vp).unwrap();

        assert_eq!(ball.on_score(&mut roster), Ok(Side::Right));
        assert_eq!(roster[Side::Right].scoreboard().score(), 1);
        assert_eq!(roster[Side::Left].scoreboard().score(), 0);
        assert!(!ball.body.active);
        assert!(!ball.body.in_trajectory());
        assert_eq!(ball.body.viewport_velocity, Vec2::ZERO);

        ball.reset();
        assert!(ball.body.active);
        assert_eq!(ball.body.transform.local_position, ball.start_local_position());
    }

    #[test]
    fn test_rebound_swaps_attacker_and_restarts_clock() {
        let (settings, viewport, roster, mut ball) = setup(3);
        let mut rng = Pcg32::seed_from_u64(5);
        ball.initialize(Side::Left, &roster, &settings, &mut rng);
        ball.serve(&roster, settings.ball_speed_vp).unwrap();
        ball.body.advance(0.25, &viewport);
        assert!(ball.body.trajectory_time() > 0.0);

        assert_eq!(ball.on_rebound(&roster), Ok(Side::Right));
        assert_eq!(ball.body.trajectory_time(), 0.0);
        assert_eq!(ball.attacker_desire(), Goal::Left);
        assert_eq!(
            ball.rebounder().map(|r| r.frame),
            Some(roster[Side::Left].paddle.frame())
        );
    }

    #[test]
    fn test_ball_scale_is_square() {
        let (_, viewport, _, mut ball) = setup(3);
        ball.set_local_scale_from_vpy(0.1, &viewport);
        let s = ball.body.transform.local_scale;
        assert!((s.x - 0.9).abs() < 1e-5);
        assert_eq!(s.x, s.y);
        assert_eq!(s.z, 1.0);
    }

    #[test]
    fn test_parked_ball_does_not_move() {
        let (_, viewport, _, mut ball) = setup(3);
        let before = ball.body.transform.local_position;
        ball.body.viewport_velocity = Vec2::ONE;
        assert!(!ball.body.advance(1.0, &viewport));
        assert_eq!(ball.body.transform.local_position, before);
    }

    proptest! {
        #[test]
        fn prop_swap_hands_ball_to_previous_opponent(
            seed in any::<u64>(),
            right_serves in any::<bool>(),
            swaps in 1usize..20,
        ) {
            let (settings, _, roster, mut ball) = setup(3);
            let mut rng = Pcg32::seed_from_u64(seed);
            let server = if right_serves { Side::Right } else { Side::Left };
            ball.initialize(server, &roster, &settings, &mut rng);

            for _ in 0..swaps {
                let before = ball.attacker().unwrap();
                let desire = ball.attacker_desire();
                let after = ball.swap_attacker(&roster).unwrap();
                prop_assert_eq!(after, roster.opponent_of(before).side());
                prop_assert_eq!(ball.attacker(), Some(after));
                prop_assert_eq!(ball.attacker_desire(), desire.opposite());
            }
        }
    }
}
