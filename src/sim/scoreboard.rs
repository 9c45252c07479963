//! Per-player score and the text the UI shows for it

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    score: u32,
    text: String,
}

impl Scoreboard {
    pub fn new() -> Self {
        let mut board = Self::default();
        board.refresh_text();
        board
    }

    pub fn score_point(&mut self) {
        self.score += 1;
        self.refresh_text();
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Display string for the UI text component
    pub fn text(&self) -> &str {
        &self.text
    }

    fn refresh_text(&mut self) {
        self.text = self.score.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoreboard_counts_and_renders() {
        let mut board = Scoreboard::new();
        assert_eq!(board.text(), "0");
        board.score_point();
        board.score_point();
        assert_eq!(board.score(), 2);
        assert_eq!(board.text(), "2");
    }
}
