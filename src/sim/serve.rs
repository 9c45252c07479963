//! Serve schedule
//!
//! Every serve of a match is drawn up front: one `(angle, goal)` entry per
//! possible point, alternating servers, stacked so the initial server's entry
//! comes off first.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Goal;

/// A planned serve: launch angle (radians) and the goal it is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServeEntry {
    pub angle: f32,
    pub goal: Goal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServeSchedule {
    /// Top of the stack is the last element
    entries: Vec<ServeEntry>,
}

impl ServeSchedule {
    /// Number of serves a match to `win_score` can need, `2w - 1`.
    /// `None` if that does not fit in a `u32`.
    pub fn rounds_for(win_score: u32) -> Option<u32> {
        match win_score {
            0 => Some(0),
            w => w.checked_mul(2)?.checked_sub(1),
        }
    }

    /// Draw the serves for a match to `win_score`.
    ///
    /// Angles are jittered in `[-max_angle, max_angle)` around horizontal.
    /// Right-side serves are turned around by π and aim at the left goal.
    pub fn generate(
        server_is_right: bool,
        win_score: u32,
        max_angle: f32,
        rng: &mut impl Rng,
    ) -> Self {
        let Some(max_rounds) = Self::rounds_for(win_score) else {
            log::warn!("Win score {win_score} is too large to schedule serves for");
            return Self::default();
        };
        // Rounds whose parity matches this belong to the right-side server
        let player_factor = if server_is_right { 0 } else { 1 };

        let entries = (0..max_rounds)
            .map(|i| {
                let jitter = if max_angle > 0.0 {
                    rng.random_range(-max_angle..max_angle)
                } else {
                    0.0
                };
                if i % 2 == player_factor {
                    ServeEntry {
                        angle: jitter + std::f32::consts::PI,
                        goal: Goal::Left,
                    }
                } else {
                    ServeEntry {
                        angle: jitter,
                        goal: Goal::Right,
                    }
                }
            })
            .collect();

        Self { entries }
    }

    /// Take the next serve
    pub fn pop(&mut self) -> Option<ServeEntry> {
        self.entries.pop()
    }

    /// Look at the next serve without taking it
    pub fn peek(&self) -> Option<&ServeEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
