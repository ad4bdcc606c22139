//! Playzone - session client for a multi-game arcade API
//!
//! This library drives game sessions against the arcade backend: it creates a
//! session, checks and submits moves, folds results into a local mirror of the
//! game, records scores for the logged-in player and ranks leaderboards.
//!
//! # Architecture
//!
//! - **Client**: [`GameApi`] seam and its HTTP implementation [`HttpGameClient`]
//! - **Games**: kinds, moves, backend results and per-kind [`GameRules`]
//! - **Controller**: [`GameSessionController`], the session state machine
//! - **Scores**: [`ScoreReporter`] and [`Leaderboard`] ranking
//! - **Timers**: [`ScheduledTask`] posting [`ScheduledAction`]s for snake ticks
//!   and memory hides
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use playzone::{ArcadeConfig, Difficulty, GameKind, GameSessionController, HttpGameClient, Move};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ArcadeConfig::default();
//! let api = Arc::new(HttpGameClient::from_config(&config)?);
//! let (mut controller, _actions) = GameSessionController::new(api, config.timings());
//!
//! controller.start(GameKind::NumberGuess, Difficulty::Medium).await?;
//! let report = controller.submit_move(Move::Guess(50)).await?;
//! println!("{:?}", report.progress());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod client;
mod config;
mod controller;
mod error;
mod games;
mod leaderboard;
mod schedule;
mod score;
mod session;

// Crate-level exports - Backend client
pub use client::{GameApi, HttpGameClient};

// Crate-level exports - Configuration
pub use config::{ArcadeConfig, ConfigError, Timings};

// Crate-level exports - Session controller
pub use controller::{ControllerState, GameSessionController, MoveReport};

// Crate-level exports - Errors
pub use error::{ArcadeError, ArcadeErrorKind};

// Crate-level exports - Game types
pub use games::{
    Board, Difficulty, Direction, FlipStatus, GameKind, GameRules, GuessResult, GuessVerdict,
    HiddenCards, KindState, Mark, MemoryFlip, MemoryState, Move, MoveResult, NumberGuessState,
    Outcome, Point, Position, Progress, RoundResult, RpsChoice, RpsRound, RpsState, RpsTally,
    SessionDescriptor, SnakeState, SnakeStatus, SnakeStep, TicTacToeState, TicTacToeTurn,
    TurnStatus,
};

// Crate-level exports - Leaderboards and scores
pub use leaderboard::{Leaderboard, LeaderboardEntry, RankedPlayer};
pub use score::{ScoreRecord, ScoreReport, ScoreReporter};

// Crate-level exports - Timers
pub use schedule::{ScheduledAction, ScheduledTask};

// Crate-level exports - Sessions
pub use session::{PlayerIdentity, Session, SessionId, SessionStatus, SessionStore};
