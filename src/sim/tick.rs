//! Fixed timestep simulation tick
//!
//! Stands in for the engine's per-frame update and collision callbacks:
//! moves paddles, integrates the ball, bounces it off the top and bottom
//! walls, and reports rebounds and goals against the current rebounder.

use super::state::{GameEvent, GamePhase, Goal, MatchState, Side};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Control input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Left paddle, -1 (down) ..= 1 (up)
    pub left_axis: f32,
    /// Right paddle, -1 (down) ..= 1 (up)
    pub right_axis: f32,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    pub fn axis(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.left_axis,
            Side::Right => self.right_axis,
        }
    }

    pub fn set_axis(&mut self, side: Side, axis: f32) {
        match side {
            Side::Left => self.left_axis = axis,
            Side::Right => self.right_axis = axis,
        }
    }
}

/// Advance the match by one fixed timestep
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) {
    if input.pause {
        state.toggle_pause();
        if state.phase == GamePhase::Paused {
            return;
        }
    }

    match state.phase {
        GamePhase::Paused | GamePhase::GameOver { .. } => return,
        _ => {}
    }

    state.time_ticks += 1;

    // Paddles first so the rebounder snapshot is current
    let viewport = state.viewport;
    let paddle_speed = state.settings.paddle_speed_vp;
    for side in Side::ALL {
        let player = &mut state.players[side];
        player.paddle.drive(input.axis(side), paddle_speed, dt, &viewport);
        player.update(&viewport);
    }
    state.ball.refresh_rebounder(&state.players);

    match state.phase {
        GamePhase::Serving { ticks_left } => {
            if ticks_left > 0 {
                state.phase = GamePhase::Serving {
                    ticks_left: ticks_left - 1,
                };
            } else if let Err(e) = state.serve_next() {
                log::error!("Serve failed: {e}");
                state.abort();
            }
        }

        GamePhase::Scored { ticks_left } => {
            if ticks_left > 0 {
                state.phase = GamePhase::Scored {
                    ticks_left: ticks_left - 1,
                };
            } else {
                state.ball.reset();
                state.phase = GamePhase::Serving {
                    ticks_left: state.settings.serve_delay_ticks,
                };
            }
        }

        GamePhase::Rally => step_ball(state, dt),

        GamePhase::Paused | GamePhase::GameOver { .. } => {}
    }
}

/// Drive the match from a variable host frame time.
///
/// Runs as many fixed steps as fit in `accumulator + frame_dt`, capped at
/// `MAX_SUBSTEPS`. The pause toggle is consumed by the first step only.
/// Returns the number of steps taken.
pub fn advance_frame(
    state: &mut MatchState,
    input: &TickInput,
    frame_dt: f32,
    accumulator: &mut f32,
) -> u32 {
    *accumulator += frame_dt.clamp(0.0, 0.1);

    let mut input = input.clone();
    let mut substeps = 0;
    while *accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
        tick(state, &input, SIM_DT);
        *accumulator -= SIM_DT;
        substeps += 1;

        // One-shot inputs
        input.pause = false;
    }

    // Drop time we could not catch up on
    if substeps == MAX_SUBSTEPS {
        *accumulator = accumulator.min(SIM_DT);
    }
    substeps
}

fn step_ball(state: &mut MatchState, dt: f32) {
    let viewport = state.viewport;
    let from = state.ball.body.frame().center;
    if !state.ball.body.advance(dt, &viewport) {
        return;
    }

    let top = viewport.bg_center.y + viewport.bg_scale.y / 2.0;
    let bottom = viewport.bg_center.y - viewport.bg_scale.y / 2.0;
    let left_goal = viewport.bg_center.x - viewport.bg_scale.x / 2.0;
    let right_goal = viewport.bg_center.x + viewport.bg_scale.x / 2.0;

    // --- WALLS ---
    let frame = state.ball.body.frame();
    let half = frame.half_extents;
    let body = &mut state.ball.body;
    let mut bounced = false;
    if frame.top() > top && body.viewport_velocity.y > 0.0 {
        body.transform.local_position.y = top - half.y;
        body.viewport_velocity.y = -body.viewport_velocity.y;
        bounced = true;
    } else if frame.bottom() < bottom && body.viewport_velocity.y < 0.0 {
        body.transform.local_position.y = bottom + half.y;
        body.viewport_velocity.y = -body.viewport_velocity.y;
        bounced = true;
    }
    if bounced {
        state.push_event(GameEvent::WallBounce);
    }

    // --- REBOUNDER ---
    // Approach is judged from the goal the ball is meant for, and the step
    // is swept so a fast ball cannot skip the paddle face in one tick.
    if let Some(rebounder) = state.ball.rebounder().copied() {
        let dir = match state.ball.attacker_desire() {
            Goal::Left => -1.0,
            Goal::Right => 1.0,
        };
        let heading_in = dir * state.ball.body.viewport_velocity.x > 0.0;
        let to = state.ball.body.frame().center;

        if let Some(contact) = heading_in
            .then(|| rebounder.frame.sweep_x(from, to, half, dir))
            .flatten()
        {
            let local_vel = viewport.vector_to_local(state.ball.body.viewport_velocity);
            let out = rebounder.deflect(
                local_vel,
                contact,
                state.settings.max_bounce_angle,
                state.settings.paddle_spin,
            );

            let body = &mut state.ball.body;
            body.viewport_velocity = viewport.vector_to_viewport(out);
            // Rest on the paddle face so the next tick starts clear
            body.transform.local_position.x = contact.x;
            body.transform.local_position.y = contact.y;

            if let Err(e) = state.handle_rebound() {
                log::warn!("Rebound ignored: {e}");
            }
            return;
        }
    }

    // --- GOALS ---
    let frame = state.ball.body.frame();
    let scored = match state.ball.attacker_desire() {
        Goal::Left => frame.right() < left_goal,
        Goal::Right => frame.left() > right_goal,
    };
    if scored {
        if let Err(e) = state.handle_score() {
            log::warn!("Goal ignored: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use glam::Vec2;

    fn quick_state(seed: u64) -> MatchState {
        let settings = Settings {
            left_name: "L".into(),
            right_name: "R".into(),
            serve_delay_ticks: 0,
            reset_delay_ticks: 0,
            ..Default::default()
        };
        MatchState::new(settings, seed).unwrap()
    }

    #[test]
    fn test_tick_serve_to_rally() {
        let mut state = MatchState::new(
            Settings {
                serve_delay_ticks: 2,
                left_name: "L".into(),
                right_name: "R".into(),
                ..Default::default()
            },
            12345,
        )
        .unwrap();
        let input = TickInput::default();

        tick(&mut state, &input, SIM_DT);
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Serving { ticks_left: 0 });

        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Rally);
        assert!(state.ball.body.viewport_velocity.x > 0.0);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = quick_state(1);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Rally);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let before = state.ball.body.transform.local_position;
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.ball.body.transform.local_position, before);
        assert_eq!(state.time_ticks, ticks);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Rally);
    }

    #[test]
    fn test_unreturned_serve_scores_for_server() {
        let mut state = quick_state(2);
        // Park the right paddle at the top so it cannot reach a center serve
        for _ in 0..600 {
            tick(
                &mut state,
                &TickInput {
                    right_axis: 1.0,
                    ..Default::default()
                },
                SIM_DT,
            );
            if state.score(Side::Left) > 0 {
                break;
            }
        }
        assert_eq!(state.score(Side::Left), 1);
        assert_eq!(state.score(Side::Right), 0);
    }

    #[test]
    fn test_paddle_in_path_returns_ball() {
        let mut state = quick_state(3);
        // Serve flat so the stationary right paddle is in the way
        state.settings.serve_max_angle = 0.0;
        let mut rng = <rand_pcg::Pcg32 as rand::SeedableRng>::seed_from_u64(3);
        let settings = state.settings.clone();
        state
            .ball
            .initialize(Side::Left, &state.players, &settings, &mut rng);

        let mut saw_rebound = false;
        for _ in 0..400 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if state
                .drain_events()
                .iter()
                .any(|e| *e == GameEvent::Rebound { by: Side::Right })
            {
                saw_rebound = true;
                break;
            }
        }
        assert!(saw_rebound);
        assert_eq!(state.ball.attacker(), Some(Side::Right));
        assert!(state.ball.body.viewport_velocity.x < 0.0);
    }

    #[test]
    fn test_fast_flat_serves_are_returned() {
        for speed in [0.6, 1.7, 2.0, 2.3, 3.0, 4.4, 5.1, 6.0, 7.3, 9.7] {
            let settings = Settings {
                left_name: "L".into(),
                right_name: "R".into(),
                serve_max_angle: 0.0,
                ball_speed_vp: speed,
                serve_delay_ticks: 0,
                reset_delay_ticks: 0,
                ..Default::default()
            };
            let mut state = MatchState::new(settings, 1).unwrap();

            let mut first = None;
            for _ in 0..240 {
                tick(&mut state, &TickInput::default(), SIM_DT);
                first = state
                    .drain_events()
                    .into_iter()
                    .find(|e| matches!(e, GameEvent::Rebound { .. } | GameEvent::Score { .. }));
                if first.is_some() {
                    break;
                }
            }
            assert_eq!(
                first,
                Some(GameEvent::Rebound { by: Side::Right }),
                "speed {speed}"
            );
            assert!(state.ball.body.viewport_velocity.x < 0.0, "speed {speed}");
            let paddle = state.players[Side::Right].paddle.frame();
            assert!(state.ball.body.frame().right() <= paddle.left() + 1e-4, "speed {speed}");
        }
    }

    #[test]
    fn test_wall_bounce_keeps_ball_on_screen() {
        let mut state = quick_state(4);
        tick(&mut state, &TickInput::default(), SIM_DT);
        state.ball.body.viewport_velocity = Vec2::new(0.05, 2.0);

        let top = state.viewport.bg_scale.y / 2.0;
        let mut bounced = false;
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            assert!(state.ball.body.frame().top() <= top + 1e-4);
            if state.drain_events().contains(&GameEvent::WallBounce) {
                bounced = true;
                break;
            }
        }
        assert!(bounced);
        assert!(state.ball.body.viewport_velocity.y < 0.0);
    }

    #[test]
    fn test_goal_sequence_resets_then_serves() {
        let mut state = MatchState::new(
            Settings {
                left_name: "L".into(),
                right_name: "R".into(),
                serve_delay_ticks: 1,
                reset_delay_ticks: 1,
                ..Default::default()
            },
            5,
        )
        .unwrap();
        state.serve_next().unwrap();
        state.handle_score().unwrap();
        assert!(!state.ball.body.active);

        let input = TickInput::default();
        tick(&mut state, &input, SIM_DT); // tiny delay
        assert_eq!(state.phase, GamePhase::Scored { ticks_left: 0 });
        tick(&mut state, &input, SIM_DT); // reset
        assert!(state.ball.body.active);
        assert_eq!(
            state.ball.body.transform.local_position,
            state.ball.start_local_position()
        );
        tick(&mut state, &input, SIM_DT); // small delay
        tick(&mut state, &input, SIM_DT); // serve
        assert_eq!(state.phase, GamePhase::Rally);
        // Second serve belongs to the right player
        assert_eq!(state.ball.attacker(), Some(Side::Right));
    }

    #[test]
    fn test_advance_frame_caps_substeps() {
        let mut state = quick_state(6);
        let mut acc = 0.0;
        let steps = advance_frame(&mut state, &TickInput::default(), 1.0, &mut acc);
        assert_eq!(steps, MAX_SUBSTEPS);
        assert!(acc <= SIM_DT);

        let steps = advance_frame(&mut state, &TickInput::default(), SIM_DT * 0.5, &mut acc);
        assert!(steps <= 1);
    }

    #[test]
    fn test_determinism() {
        let mut a = quick_state(99999);
        let mut b = quick_state(99999);

        for i in 0..2000 {
            let input = TickInput {
                left_axis: ((i as f32) * 0.05).sin(),
                right_axis: ((i as f32) * 0.03).cos(),
                pause: false,
            };
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score(Side::Left), b.score(Side::Left));
        assert_eq!(a.score(Side::Right), b.score(Side::Right));
        assert_eq!(
            a.ball.body.transform.local_position,
            b.ball.body.transform.local_position
        );
    }
}
