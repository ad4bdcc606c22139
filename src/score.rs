//! Score records and reporting.

use std::sync::Arc;

use derive_getters::Getters;
use derive_new::new;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::client::GameApi;
use crate::error::ArcadeError;
use crate::games::{Difficulty, GameKind};
use crate::leaderboard::Leaderboard;

/// A scored, completed game attributed to a player.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct ScoreRecord {
    player_name: String,
    game_kind: GameKind,
    points: i64,
    attempts: u32,
    difficulty: Difficulty,
}

/// Body of `POST /api/scores/add`. The player comes from the login cookie.
#[derive(Debug, Serialize)]
pub(crate) struct ScorePayload {
    game_type: GameKind,
    points: i64,
    attempts: u32,
    difficulty: Difficulty,
}

impl From<&ScoreRecord> for ScorePayload {
    fn from(record: &ScoreRecord) -> Self {
        Self {
            game_type: record.game_kind,
            points: record.points,
            attempts: record.attempts,
            difficulty: record.difficulty,
        }
    }
}

/// Result of reporting one score.
#[derive(Debug, Clone)]
pub enum ScoreReport {
    /// Recorded; carries the refreshed leaderboard if that fetch worked.
    Recorded {
        /// What was sent.
        record: ScoreRecord,
        /// Leaderboard fetched after recording.
        leaderboard: Option<Leaderboard>,
    },
    /// No player is logged in, so nothing was sent.
    Skipped,
    /// The score endpoint failed. Gameplay state is unaffected.
    Failed {
        /// What we tried to send.
        record: ScoreRecord,
        /// Why it failed.
        error: ArcadeError,
    },
}

/// Posts finished games to the scoring API.
#[derive(Debug)]
pub struct ScoreReporter<A> {
    api: Arc<A>,
}

impl<A> Clone for ScoreReporter<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

impl<A: GameApi> ScoreReporter<A> {
    /// Creates a reporter over `api`.
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Sends `record`, then refreshes the leaderboard.
    ///
    /// # Errors
    ///
    /// Returns the score endpoint's error. A failed refresh is only logged.
    #[instrument(skip(self), fields(kind = %record.game_kind, points = record.points))]
    pub async fn report(&self, record: &ScoreRecord) -> Result<Option<Leaderboard>, ArcadeError> {
        self.api.add_score(record).await?;
        info!(player = %record.player_name, "Score recorded");

        match self.api.fetch_leaderboard().await {
            Ok(board) => Ok(Some(board)),
            Err(e) => {
                warn!(error = %e, "Leaderboard refresh failed");
                Ok(None)
            }
        }
    }
}
