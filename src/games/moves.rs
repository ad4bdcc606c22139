//! Kind-specific move payloads.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use super::kind::GameKind;

/// Rock, paper or scissors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum RpsChoice {
    /// Beats scissors.
    Rock,
    /// Beats rock.
    Paper,
    /// Beats paper.
    Scissors,
}

impl RpsChoice {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
        }
    }

    /// Parses a wire name or its first letter.
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase();
        Self::iter().find(|c| c.as_str() == needle || c.as_str()[..1] == needle)
    }
}

/// Snake heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
    /// Towards the last column. Snakes start heading right.
    #[default]
    Right,
}

impl Direction {
    /// The heading the snake cannot turn into directly.
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parses a wire name or a WASD key.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" | "w" => Some(Self::Up),
            "down" | "s" => Some(Self::Down),
            "left" | "a" => Some(Self::Left),
            "right" | "d" => Some(Self::Right),
            _ => None,
        }
    }
}

/// A move submitted to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Guess the hidden number.
    Guess(i64),
    /// Play one rock-paper-scissors round.
    Throw(RpsChoice),
    /// Place X at a cell index. Range-checked locally before dispatch.
    Place(usize),
    /// Flip the card at an index.
    Flip(usize),
    /// Advance the snake, optionally turning first.
    Advance(Direction),
}

impl Move {
    /// The game this move belongs to.
    pub fn kind(&self) -> GameKind {
        match self {
            Self::Guess(_) => GameKind::NumberGuess,
            Self::Throw(_) => GameKind::RockPaperScissors,
            Self::Place(_) => GameKind::TicTacToe,
            Self::Flip(_) => GameKind::Memory,
            Self::Advance(_) => GameKind::Snake,
        }
    }

    /// Route action under `/api/games/{kind}/`.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Guess(_) => "guess",
            Self::Throw(_) => "play",
            Self::Place(_) | Self::Advance(_) => "move",
            Self::Flip(_) => "flip",
        }
    }

    /// JSON request body for this move.
    pub fn body(&self, game_id: &str) -> serde_json::Value {
        match self {
            Self::Guess(guess) => serde_json::json!({ "game_id": game_id, "guess": guess }),
            Self::Throw(choice) => serde_json::json!({ "game_id": game_id, "choice": choice }),
            Self::Place(position) => {
                serde_json::json!({ "game_id": game_id, "position": position })
            }
            Self::Flip(index) => serde_json::json!({ "game_id": game_id, "card_index": index }),
            Self::Advance(direction) => {
                serde_json::json!({ "game_id": game_id, "direction": direction })
            }
        }
    }
}
