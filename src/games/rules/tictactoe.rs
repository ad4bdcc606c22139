//! Tic-tac-toe rules.

use derive_getters::Getters;
use tracing::{debug, instrument};

use super::{GameRules, Progress, unexpected_result, wrong_kind};
use crate::error::ArcadeError;
use crate::games::kind::GameKind;
use crate::games::moves::Move;
use crate::games::results::{MoveResult, Outcome, SessionDescriptor, TurnStatus};
use crate::games::tictactoe::{Board, Mark, Position};

/// Tic-tac-toe session state.
#[derive(Debug, Clone, Default, PartialEq, Getters)]
pub struct TicTacToeState {
    board: Board,
    last_ai_move: Option<usize>,
    winner: Option<String>,
    finished: bool,
}

impl TicTacToeState {
    /// Builds the mirror from a start response.
    pub fn from_descriptor(descriptor: &SessionDescriptor) -> Self {
        Self {
            board: descriptor
                .board
                .as_deref()
                .map(Board::from_wire)
                .unwrap_or_default(),
            last_ai_move: None,
            winner: None,
            finished: false,
        }
    }

    /// Cells the player may still click.
    pub fn open_positions(&self) -> Vec<Position> {
        Position::valid_moves(&self.board)
    }
}

impl GameRules for TicTacToeState {
    fn kind(&self) -> GameKind {
        GameKind::TicTacToe
    }

    #[instrument(skip(self))]
    fn validate_move(&self, mv: &Move) -> Result<(), ArcadeError> {
        let Move::Place(position) = mv else {
            return Err(wrong_kind(self.kind(), mv.kind()));
        };
        if Position::from_index(*position).is_none() {
            return Err(ArcadeError::validation(format!(
                "position {} is outside 0-8",
                position
            )));
        }
        if !self.board.is_empty(*position) {
            return Err(ArcadeError::validation(format!(
                "position {} is already taken",
                position
            )));
        }
        Ok(())
    }

    fn record_move(&mut self, mv: &Move) {
        if let Move::Place(position) = mv {
            self.board.set(*position, Mark::X);
        }
    }

    #[instrument(skip(self, result))]
    fn apply_result(&mut self, result: &MoveResult) -> Result<Progress, ArcadeError> {
        let MoveResult::Turn(turn) = result else {
            return Err(unexpected_result(self.kind(), result.kind()));
        };
        if !turn.board.is_empty() {
            self.board = Board::from_wire(&turn.board);
        } else if let Some(ai) = turn.ai_move {
            self.board.set(ai, Mark::O);
        }
        self.last_ai_move = turn.ai_move;
        debug!(status = ?turn.status, winner = ?turn.winner, "Turn applied");

        if turn.status == TurnStatus::Active {
            return Ok(Progress::Continue(Outcome::Continue));
        }

        self.finished = true;
        self.winner = turn.winner.clone();
        let outcome = match turn.winner.as_deref().and_then(Mark::from_cell) {
            Some(Mark::X) => Outcome::Won,
            Some(Mark::O) => Outcome::Lost,
            None => Outcome::Tie,
        };
        Ok(Progress::Finished {
            outcome,
            points: self.score(outcome),
            attempts: 1,
        })
    }

    fn score(&self, outcome: Outcome) -> i64 {
        match outcome {
            Outcome::Won => 3,
            Outcome::Tie => 1,
            _ => 0,
        }
    }

    fn render(&self) -> String {
        let mut out = self.board.display();
        if !self.finished {
            out.push_str("\nYour turn: pick a cell to place X.");
            return out;
        }
        match self.winner.as_deref().and_then(Mark::from_cell) {
            Some(Mark::X) => out.push_str("\nYou win!"),
            Some(Mark::O) => out.push_str("\nComputer wins!"),
            None => out.push_str("\nIt's a tie!"),
        }
        out
    }
}
