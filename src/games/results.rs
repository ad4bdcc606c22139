//! Backend response shapes.
//!
//! Every field not needed to tell the kind of result apart is optional: the
//! backend omits fields that do not apply to a particular response.

use serde::{Deserialize, Serialize};

use super::kind::{Difficulty, GameKind};
use super::moves::RpsChoice;

/// Grid cell as `[x, y]`.
pub type Point = [i32; 2];

/// Response to a start request.
///
/// One shape for all kinds; each kind only fills in its own fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    /// Backend session id.
    pub game_id: String,
    /// Number guess: lowest possible target.
    pub min: Option<i64>,
    /// Number guess: highest possible target.
    pub max: Option<i64>,
    /// Number guess: guesses allowed.
    pub max_attempts: Option<u32>,
    /// Difficulty echoed back by the backend.
    pub difficulty: Option<Difficulty>,
    /// Tic-tac-toe: initial board.
    pub board: Option<Vec<String>>,
    /// Tic-tac-toe: side to move.
    pub current_player: Option<String>,
    /// Memory and snake: grid edge length.
    pub grid_size: Option<usize>,
    /// Memory: number of pairs on the grid.
    pub total_pairs: Option<u32>,
    /// Snake: body, head first.
    pub snake: Option<Vec<Point>>,
    /// Snake: food cell.
    pub food: Option<Point>,
    /// Snake: starting score.
    pub score: Option<i64>,
}

/// Verdict on a number guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessVerdict {
    /// The guess hit the target.
    Correct,
    /// Wrong, attempts remain.
    Incorrect,
    /// Wrong and no attempts left.
    GameOver,
}

/// Response to a guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessResult {
    /// Verdict.
    pub result: GuessVerdict,
    /// `higher` or `lower` after an incorrect guess.
    pub hint: Option<String>,
    /// Attempts used so far, including this one.
    pub attempts: Option<u32>,
    /// Attempts left after an incorrect guess.
    pub remaining: Option<u32>,
    /// Revealed target once the game is over.
    pub target: Option<i64>,
}

/// Round result from the player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    /// Player won the round.
    Win,
    /// Computer won the round.
    Lose,
    /// Same choice.
    Tie,
}

/// Response to a rock-paper-scissors round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpsRound {
    /// Echo of the player's choice.
    pub player_choice: Option<RpsChoice>,
    /// What the computer threw.
    pub computer_choice: Option<RpsChoice>,
    /// Round result.
    pub result: RoundResult,
}

/// Tic-tac-toe game status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnStatus {
    /// Moves still accepted.
    Active,
    /// Won or drawn.
    Finished,
}

/// Response to a tic-tac-toe move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicTacToeTurn {
    /// Board after the player's move and the AI reply.
    #[serde(default)]
    pub board: Vec<String>,
    /// Game status.
    pub status: TurnStatus,
    /// `X`, `O`, `tie`, or absent while running.
    pub winner: Option<String>,
    /// Cell the AI played, if it moved.
    pub ai_move: Option<usize>,
}

/// Result of flipping one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipStatus {
    /// First card of a pair is face up.
    FirstCard,
    /// The second card matched the first.
    Match,
    /// The second card did not match; both must be hidden again.
    NoMatch,
}

/// Response to a memory flip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryFlip {
    /// Flipped card.
    pub card_index: Option<usize>,
    /// Face value of the flipped card.
    pub card_value: Option<i64>,
    /// Flip result.
    pub status: FlipStatus,
    /// Pairs attempted so far.
    pub moves: Option<u32>,
    /// Pairs matched so far.
    pub matches: Option<u32>,
    /// `completed` once every pair is matched.
    pub game_status: Option<String>,
    /// Matched flags for every card.
    pub matched: Option<Vec<bool>>,
    /// Face-up flags for every card.
    pub revealed: Option<Vec<bool>>,
    /// First card of a non-matching pair.
    pub first_card: Option<usize>,
    /// Second card of a non-matching pair.
    pub second_card: Option<usize>,
}

/// Snake game status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnakeStatus {
    /// Still moving.
    Active,
    /// Hit a wall or itself.
    GameOver,
}

/// Response to a snake step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeStep {
    /// Body after the step, head first.
    pub snake: Option<Vec<Point>>,
    /// Food cell.
    pub food: Option<Point>,
    /// Cumulative score.
    pub score: Option<i64>,
    /// Game status.
    pub status: SnakeStatus,
    /// `wall_collision` or `self_collision` on game over.
    pub reason: Option<String>,
}

/// Response to a hide-cards request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HiddenCards {
    /// Face-up flags after hiding.
    #[serde(default)]
    pub revealed: Vec<bool>,
}

/// Backend response to a submitted move.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveResult {
    /// Number guess verdict.
    Guess(GuessResult),
    /// Rock-paper-scissors round.
    Round(RpsRound),
    /// Tic-tac-toe turn.
    Turn(TicTacToeTurn),
    /// Memory flip.
    Flip(MemoryFlip),
    /// Snake step.
    Step(SnakeStep),
}

impl MoveResult {
    /// The game this result belongs to.
    pub fn kind(&self) -> GameKind {
        match self {
            Self::Guess(_) => GameKind::NumberGuess,
            Self::Round(_) => GameKind::RockPaperScissors,
            Self::Turn(_) => GameKind::TicTacToe,
            Self::Flip(_) => GameKind::Memory,
            Self::Step(_) => GameKind::Snake,
        }
    }

    /// Decodes a response body for a move of `kind`.
    pub fn decode(kind: GameKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            GameKind::NumberGuess => Self::Guess(serde_json::from_value(value)?),
            GameKind::RockPaperScissors => Self::Round(serde_json::from_value(value)?),
            GameKind::TicTacToe => Self::Turn(serde_json::from_value(value)?),
            GameKind::Memory => Self::Flip(serde_json::from_value(value)?),
            GameKind::Snake => Self::Step(serde_json::from_value(value)?),
        })
    }
}

/// Kind-independent reading of a move result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Game goes on.
    Continue,
    /// Player won.
    Won,
    /// Player lost.
    Lost,
    /// Neither side won.
    Tie,
    /// Memory pair matched.
    Matched,
    /// Memory pair did not match.
    Unmatched,
}
