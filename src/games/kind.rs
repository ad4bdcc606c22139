//! Game kinds and difficulty levels.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use tracing::instrument;

/// The five arcade games.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
pub enum GameKind {
    /// Guess a hidden number within a limited number of attempts.
    #[serde(rename = "number_guess")]
    NumberGuess,
    /// Rock-paper-scissors against the computer, one round per session.
    #[serde(rename = "rps")]
    RockPaperScissors,
    /// Tic-tac-toe against the backend AI; the player is always X.
    #[serde(rename = "tictactoe")]
    TicTacToe,
    /// Flip cards in pairs until every pair is matched.
    #[serde(rename = "memory")]
    Memory,
    /// Classic snake, advanced by a periodic ticker.
    #[serde(rename = "snake")]
    Snake,
}

impl GameKind {
    /// Name used for `game_type` and leaderboard keys.
    pub fn api_name(self) -> &'static str {
        match self {
            Self::NumberGuess => "number_guess",
            Self::RockPaperScissors => "rps",
            Self::TicTacToe => "tictactoe",
            Self::Memory => "memory",
            Self::Snake => "snake",
        }
    }

    /// Path segment under `/api/games/`.
    pub fn route(self) -> &'static str {
        match self {
            Self::NumberGuess => "number-guess",
            Self::RockPaperScissors => "rps",
            Self::TicTacToe => "tictactoe",
            Self::Memory => "memory",
            Self::Snake => "snake",
        }
    }

    /// Human-readable title.
    pub fn label(self) -> &'static str {
        match self {
            Self::NumberGuess => "Number Guess",
            Self::RockPaperScissors => "Rock Paper Scissors",
            Self::TicTacToe => "Tic Tac Toe",
            Self::Memory => "Memory",
            Self::Snake => "Snake",
        }
    }

    /// Parses a wire name, route segment or label (case-insensitive).
    #[instrument]
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase();
        Self::iter().find(|kind| {
            needle == kind.api_name()
                || needle == kind.route()
                || needle == kind.label().to_lowercase()
        })
    }

    /// Whether the player picks a difficulty when starting.
    pub fn uses_difficulty(self) -> bool {
        matches!(self, Self::NumberGuess | Self::Memory)
    }

    /// Games that run on their own once created (no first move needed).
    pub fn starts_running(self) -> bool {
        matches!(self, Self::Memory | Self::Snake)
    }

    /// Whether the backend issues session ids for this kind.
    ///
    /// The rock-paper-scissors route is stateless, so its sessions are local.
    pub fn has_backend_session(self) -> bool {
        !matches!(self, Self::RockPaperScissors)
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.api_name())
    }
}

/// Difficulty level sent at start and recorded with scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Number guess 1–50, memory 4×4.
    Easy,
    /// Number guess 1–100, memory 6×6.
    #[default]
    Medium,
    /// Number guess 1–200, memory 8×8.
    Hard,
    /// Recorded for games without difficulty levels.
    Normal,
}

impl Difficulty {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Normal => "normal",
        }
    }

    /// Parses a wire name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase();
        Self::iter().find(|d| d.as_str() == needle)
    }

    /// Difficulty to record for a finished game of `kind`.
    pub fn for_score(self, kind: GameKind) -> Self {
        if kind.uses_difficulty() {
            self
        } else {
            Self::Normal
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
