//! Game kinds, moves, backend results and per-kind rules.

mod kind;
mod moves;
mod results;
mod rules;
mod tictactoe;

pub use kind::{Difficulty, GameKind};
pub use moves::{Direction, Move, RpsChoice};
pub use results::{
    FlipStatus, GuessResult, GuessVerdict, HiddenCards, MemoryFlip, MoveResult, Outcome, Point,
    RoundResult, RpsRound, SessionDescriptor, SnakeStatus, SnakeStep, TicTacToeTurn, TurnStatus,
};
pub use rules::{
    GameRules, KindState, MemoryState, NumberGuessState, Progress, RpsState, RpsTally,
    SnakeState, TicTacToeState,
};
pub use tictactoe::{Board, Mark, Position};
