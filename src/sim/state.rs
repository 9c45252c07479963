//! Match state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::PongBall;
use super::player::Roster;
use super::serve::ServeEntry;
use super::viewport::Viewport;
use crate::error::{ServeError, SettingsError};
use crate::settings::Settings;

/// Which half of the table a player defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Goal behind this side's paddle
    pub fn own_goal(self) -> Goal {
        match self {
            Side::Left => Goal::Left,
            Side::Right => Goal::Right,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Goal the ball is meant to end up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Goal {
    Left,
    Right,
}

impl Goal {
    pub fn opposite(self) -> Goal {
        match self {
            Goal::Left => Goal::Right,
            Goal::Right => Goal::Left,
        }
    }

    /// Player standing in front of this goal
    pub fn defender(self) -> Side {
        match self {
            Goal::Left => Side::Left,
            Goal::Right => Side::Right,
        }
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.defender())
    }
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball parked at center, serve fires when the countdown hits zero
    Serving { ticks_left: u32 },
    /// Ball in play
    Rally,
    /// Goal scored, ball hidden; reset fires when the countdown hits zero
    Scored { ticks_left: u32 },
    /// Match is paused
    Paused,
    /// Match ended. `None` if it was abandoned without a winner.
    GameOver { winner: Option<Side> },
}

/// Things the host may want to react to (sound, UI, logging)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Served { attacker: Side, entry: ServeEntry },
    WallBounce,
    Rebound { by: Side },
    Score { scorer: Side },
    MatchOver { winner: Side },
}

/// End-of-match report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub seed: u64,
    pub left_name: String,
    pub right_name: String,
    pub left_score: u32,
    pub right_score: u32,
    pub winner: Option<Side>,
    pub ticks: u64,
    pub rebounds: u32,
}

/// Complete match state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct MatchState {
    pub settings: Settings,
    pub viewport: Viewport,
    pub players: Roster,
    pub ball: PongBall,
    pub phase: GamePhase,
    /// Phase to restore on unpause
    resume_phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Total paddle returns this match
    pub rebounds: u32,
    pub seed: u64,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl MatchState {
    /// Set up players and ball, draw the serves, and start the first countdown
    pub fn new(settings: Settings, seed: u64) -> Result<Self, SettingsError> {
        settings.validate()?;

        let viewport = Viewport::centered(settings.bg_scale);
        let players = Roster::from_settings(&settings, &viewport);
        let ball = PongBall::from_settings(&settings, &viewport);
        let serving = GamePhase::Serving {
            ticks_left: settings.serve_delay_ticks,
        };

        let mut state = Self {
            settings,
            viewport,
            players,
            ball,
            phase: serving,
            resume_phase: serving,
            time_ticks: 0,
            rebounds: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };

        let server = state.settings.first_server;
        state
            .ball
            .initialize(server, &state.players, &state.settings, &mut state.rng);
        log::info!(
            "Match to {} (seed {seed}), {server} serves first",
            state.settings.win_score
        );

        Ok(state)
    }

    /// Fresh match with the same settings
    pub fn rematch(&self, seed: u64) -> Result<Self, SettingsError> {
        Self::new(self.settings.clone(), seed)
    }

    pub fn winner(&self) -> Option<Side> {
        self.players.winner(self.settings.win_score)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver { .. })
    }

    pub fn score(&self, side: Side) -> u32 {
        self.players[side].scoreboard().score()
    }

    /// Launch the next scheduled serve and enter the rally
    pub fn serve_next(&mut self) -> Result<ServeEntry, ServeError> {
        if let Some(winner) = self.winner() {
            return Err(ServeError::MatchOver(winner));
        }
        let entry = self.ball.serve(&self.players, self.settings.ball_speed_vp)?;
        let attacker = self.ball.attacker().ok_or(ServeError::NoAttacker)?;
        self.events.push(GameEvent::Served { attacker, entry });
        self.phase = GamePhase::Rally;
        Ok(entry)
    }

    /// Ball crossed the rebounder's goal line
    pub fn handle_score(&mut self) -> Result<Side, ServeError> {
        let scorer = self.ball.on_score(&mut self.players)?;
        self.events.push(GameEvent::Score { scorer });

        if let Some(winner) = self.winner() {
            log::info!(
                "{} wins {} - {}",
                self.players[winner].data().name,
                self.score(winner),
                self.score(winner.opposite())
            );
            self.events.push(GameEvent::MatchOver { winner });
            self.phase = GamePhase::GameOver {
                winner: Some(winner),
            };
        } else {
            self.phase = GamePhase::Scored {
                ticks_left: self.settings.reset_delay_ticks,
            };
        }
        Ok(scorer)
    }

    /// Rebounder returned the ball
    pub fn handle_rebound(&mut self) -> Result<Side, ServeError> {
        let by = self
            .ball
            .attacker()
            .map(Side::opposite)
            .ok_or(ServeError::NoAttacker)?;
        self.ball.on_rebound(&self.players)?;
        self.rebounds += 1;
        self.events.push(GameEvent::Rebound { by });
        Ok(by)
    }

    /// Toggle pause. Has no effect once the match is over.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::GameOver { .. } => {}
            GamePhase::Paused => self.phase = self.resume_phase,
            other => {
                self.resume_phase = other;
                self.phase = GamePhase::Paused;
            }
        }
    }

    /// Abandon the match
    pub fn abort(&mut self) {
        if !self.is_over() {
            self.ball.destroy_ball();
            self.phase = GamePhase::GameOver { winner: None };
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            seed: self.seed,
            left_name: self.players[Side::Left].data().name.clone(),
            right_name: self.players[Side::Right].data().name.clone(),
            left_score: self.score(Side::Left),
            right_score: self.score(Side::Right),
            winner: match self.phase {
                GamePhase::GameOver { winner } => winner,
                _ => None,
            },
            ticks: self.time_ticks,
            rebounds: self.rebounds,
        }
    }
}
