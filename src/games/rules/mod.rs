//! Per-kind session rules.
//!
//! Each game kind has a state type that mirrors what the backend reported and
//! knows how to check a move before dispatch, fold a result into the mirror,
//! and score a finished game. [`KindState`] ties them together so the
//! controller never branches on the game kind itself.

mod memory;
mod number_guess;
mod rps;
mod snake;
mod tictactoe;

pub use memory::MemoryState;
pub use number_guess::NumberGuessState;
pub use rps::{RpsState, RpsTally};
pub use snake::SnakeState;
pub use tictactoe::TicTacToeState;

use tracing::instrument;

use super::kind::{Difficulty, GameKind};
use super::moves::Move;
use super::results::{MoveResult, Outcome, SessionDescriptor};
use crate::error::{ArcadeError, ArcadeErrorKind};

/// What a move result means for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The session continues.
    Continue(Outcome),
    /// The session is over.
    Finished {
        /// How it ended.
        outcome: Outcome,
        /// Points earned.
        points: i64,
        /// Attempts or moves to record with the score.
        attempts: u32,
    },
}

impl Progress {
    /// The outcome regardless of termination.
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Continue(outcome) | Self::Finished { outcome, .. } => *outcome,
        }
    }

    /// True if the session ended.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished { .. })
    }
}

/// Capability set every game kind implements.
pub trait GameRules: std::fmt::Debug + Send + Sync {
    /// Game kind handled by these rules.
    fn kind(&self) -> GameKind;

    /// Checks the shape of a move against the local mirror.
    ///
    /// This is an optimistic guard; the backend has the final say.
    fn validate_move(&self, mv: &Move) -> Result<(), ArcadeError>;

    /// Records a move the backend accepted, before its result is folded in.
    fn record_move(&mut self, _mv: &Move) {}

    /// Folds a backend result into the mirror and decides whether the game ended.
    fn apply_result(&mut self, result: &MoveResult) -> Result<Progress, ArcadeError>;

    /// Points for a game that ended with `outcome` in the current state.
    fn score(&self, outcome: Outcome) -> i64;

    /// Multi-line text rendering of the current state.
    fn render(&self) -> String;
}

/// Error for a move or result of the wrong kind.
#[track_caller]
pub(crate) fn wrong_kind(expected: GameKind, got: GameKind) -> ArcadeError {
    ArcadeError::validation(format!("{} move sent to a {} session", got, expected))
}

/// Error for a result of the wrong kind.
#[track_caller]
pub(crate) fn unexpected_result(expected: GameKind, got: GameKind) -> ArcadeError {
    ArcadeError::new(ArcadeErrorKind::Decode(format!(
        "{} result received for a {} session",
        got, expected
    )))
}

/// Transient state for whichever game is active.
#[derive(Debug, Clone)]
pub enum KindState {
    /// Number guess mirror.
    NumberGuess(NumberGuessState),
    /// Rock-paper-scissors tally.
    Rps(RpsState),
    /// Tic-tac-toe board.
    TicTacToe(TicTacToeState),
    /// Memory grid.
    Memory(MemoryState),
    /// Snake body and heading.
    Snake(SnakeState),
}

impl KindState {
    /// Builds the initial state from a start response.
    #[instrument(skip(descriptor), fields(game_id = %descriptor.game_id))]
    pub fn from_descriptor(
        kind: GameKind,
        difficulty: Difficulty,
        descriptor: &SessionDescriptor,
    ) -> Self {
        match kind {
            GameKind::NumberGuess => {
                Self::NumberGuess(NumberGuessState::from_descriptor(difficulty, descriptor))
            }
            GameKind::RockPaperScissors => Self::Rps(RpsState::default()),
            GameKind::TicTacToe => Self::TicTacToe(TicTacToeState::from_descriptor(descriptor)),
            GameKind::Memory => Self::Memory(MemoryState::from_descriptor(difficulty, descriptor)),
            GameKind::Snake => Self::Snake(SnakeState::from_descriptor(descriptor)),
        }
    }

    /// Rules view.
    pub fn rules(&self) -> &dyn GameRules {
        match self {
            Self::NumberGuess(s) => s,
            Self::Rps(s) => s,
            Self::TicTacToe(s) => s,
            Self::Memory(s) => s,
            Self::Snake(s) => s,
        }
    }

    /// Mutable rules view.
    pub fn rules_mut(&mut self) -> &mut dyn GameRules {
        match self {
            Self::NumberGuess(s) => s,
            Self::Rps(s) => s,
            Self::TicTacToe(s) => s,
            Self::Memory(s) => s,
            Self::Snake(s) => s,
        }
    }

    /// Memory state, if this is a memory session.
    pub fn memory(&self) -> Option<&MemoryState> {
        match self {
            Self::Memory(s) => Some(s),
            _ => None,
        }
    }

    /// Mutable memory state.
    pub fn memory_mut(&mut self) -> Option<&mut MemoryState> {
        match self {
            Self::Memory(s) => Some(s),
            _ => None,
        }
    }

    /// Snake state, if this is a snake session.
    pub fn snake(&self) -> Option<&SnakeState> {
        match self {
            Self::Snake(s) => Some(s),
            _ => None,
        }
    }

    /// Mutable snake state.
    pub fn snake_mut(&mut self) -> Option<&mut SnakeState> {
        match self {
            Self::Snake(s) => Some(s),
            _ => None,
        }
    }

    /// Rock-paper-scissors state.
    pub fn rps(&self) -> Option<&RpsState> {
        match self {
            Self::Rps(s) => Some(s),
            _ => None,
        }
    }

    /// Mutable rock-paper-scissors state.
    pub fn rps_mut(&mut self) -> Option<&mut RpsState> {
        match self {
            Self::Rps(s) => Some(s),
            _ => None,
        }
    }

    /// Number guess state.
    pub fn number_guess(&self) -> Option<&NumberGuessState> {
        match self {
            Self::NumberGuess(s) => Some(s),
            _ => None,
        }
    }

    /// Tic-tac-toe state.
    pub fn tictactoe(&self) -> Option<&TicTacToeState> {
        match self {
            Self::TicTacToe(s) => Some(s),
            _ => None,
        }
    }
}
