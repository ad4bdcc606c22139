//! Typed client for the arcade REST API.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::config::ArcadeConfig;
use crate::error::{ArcadeError, ArcadeErrorKind};
use crate::games::{Difficulty, GameKind, HiddenCards, Move, MoveResult, SessionDescriptor};
use crate::leaderboard::{Leaderboard, LeaderboardEntry, RankedPlayer};
use crate::score::{ScorePayload, ScoreRecord};
use crate::session::PlayerIdentity;

/// Operations the session controller needs from the game backend.
///
/// Every call is a single request/response with no retries.
#[async_trait]
pub trait GameApi: Send + Sync {
    /// Starts a game and returns the backend's session descriptor.
    async fn create_session(
        &self,
        kind: GameKind,
        difficulty: Difficulty,
    ) -> Result<SessionDescriptor, ArcadeError>;

    /// Submits one move for a session.
    async fn submit_move(&self, session_id: &str, mv: Move) -> Result<MoveResult, ArcadeError>;

    /// Turns a non-matching memory pair face down.
    async fn hide_cards(&self, session_id: &str) -> Result<HiddenCards, ArcadeError>;

    /// Fetches every game's leaderboard.
    async fn fetch_leaderboard(&self) -> Result<Leaderboard, ArcadeError>;

    /// Records a score for the logged-in player.
    async fn add_score(&self, record: &ScoreRecord) -> Result<(), ArcadeError>;
}

/// Error body returned by the backend on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Player as returned by the player endpoints.
#[derive(Debug, Deserialize)]
struct PlayerRecord {
    id: i64,
    name: String,
}

/// Login and register wrap the player in an envelope.
#[derive(Debug, Deserialize)]
struct PlayerEnvelope {
    player: PlayerRecord,
}

impl From<PlayerRecord> for PlayerIdentity {
    fn from(record: PlayerRecord) -> Self {
        PlayerIdentity::new(record.name, record.id.to_string())
    }
}

/// HTTP implementation of [`GameApi`].
///
/// Keeps a cookie store so the backend's login session is sent with score
/// submissions.
#[derive(Debug, Clone)]
pub struct HttpGameClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGameClient {
    /// Creates a client for `base_url` (e.g. `http://127.0.0.1:5000`).
    #[instrument(skip_all, fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, ArcadeError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        info!("Game client ready");
        Ok(Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Creates a client from configuration.
    pub fn from_config(config: &ArcadeConfig) -> Result<Self, ArcadeError> {
        Self::new(config.base_url(), config.request_timeout())
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    #[instrument(skip(self, body))]
    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ArcadeError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::read(response).await
    }

    #[instrument(skip(self))]
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ArcadeError> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::read(response).await
    }

    /// Decodes a success body or turns a failure status into a backend error.
    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ArcadeError> {
        let status = response.status();
        let text = response.text().await?;
        debug!(status = %status, body = %text, "Response received");

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            warn!(status = %status, message = %message, "Backend rejected request");
            return Err(ArcadeError::new(ArcadeErrorKind::Backend {
                status: status.as_u16(),
                message,
            }));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Registers a new player and logs them in.
    #[instrument(skip(self, password))]
    pub async fn register(&self, name: &str, password: &str) -> Result<PlayerIdentity, ArcadeError> {
        let body = serde_json::json!({ "name": name, "password": password });
        let envelope: PlayerEnvelope = self.post("players/register", &body).await?;
        info!(player = %envelope.player.name, "Registered");
        Ok(envelope.player.into())
    }

    /// Logs in an existing player.
    #[instrument(skip(self, password))]
    pub async fn login(&self, name: &str, password: &str) -> Result<PlayerIdentity, ArcadeError> {
        let body = serde_json::json!({ "name": name, "password": password });
        let envelope: PlayerEnvelope = self.post("players/login", &body).await?;
        info!(player = %envelope.player.name, "Logged in");
        Ok(envelope.player.into())
    }

    /// The logged-in player, or `None` when the backend says 401.
    #[instrument(skip(self))]
    pub async fn current_player(&self) -> Result<Option<PlayerIdentity>, ArcadeError> {
        match self.get::<PlayerRecord>("players/current").await {
            Ok(player) => Ok(Some(player.into())),
            Err(ArcadeError {
                kind: ArcadeErrorKind::Backend { status: 401, .. },
                ..
            }) => {
                debug!("No player logged in");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Ends the backend login session.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ArcadeError> {
        let _: serde_json::Value = self.post("players/logout", &serde_json::json!({})).await?;
        info!("Logged out");
        Ok(())
    }

    /// Ranked totals for one game, as aggregated by the backend.
    #[instrument(skip(self))]
    pub async fn fetch_game_leaderboard(
        &self,
        kind: GameKind,
    ) -> Result<Vec<RankedPlayer>, ArcadeError> {
        let entries: Vec<LeaderboardEntry> =
            self.get(&format!("leaderboard/{}", kind.api_name())).await?;
        Ok(Leaderboard::new(HashMap::from([(kind, entries)])).ranked(kind))
    }

    /// Best points per game for the logged-in player.
    #[instrument(skip(self))]
    pub async fn best_scores(&self) -> Result<BTreeMap<GameKind, i64>, ArcadeError> {
        let raw: BTreeMap<String, i64> = self.get("players/best-scores").await?;
        Ok(raw
            .into_iter()
            .filter_map(|(key, points)| GameKind::parse(&key).map(|kind| (kind, points)))
            .collect())
    }
}

#[async_trait]
impl GameApi for HttpGameClient {
    #[instrument(skip(self))]
    async fn create_session(
        &self,
        kind: GameKind,
        difficulty: Difficulty,
    ) -> Result<SessionDescriptor, ArcadeError> {
        if !kind.has_backend_session() {
            let game_id = uuid::Uuid::new_v4().to_string();
            debug!(game_id = %game_id, "Issued local session id");
            return Ok(SessionDescriptor {
                game_id,
                ..SessionDescriptor::default()
            });
        }

        let body = if kind.uses_difficulty() {
            serde_json::json!({ "difficulty": difficulty })
        } else {
            serde_json::json!({})
        };
        let descriptor: SessionDescriptor = self
            .post(&format!("games/{}/start", kind.route()), &body)
            .await?;
        info!(game_id = %descriptor.game_id, "Session created");
        Ok(descriptor)
    }

    #[instrument(skip(self))]
    async fn submit_move(&self, session_id: &str, mv: Move) -> Result<MoveResult, ArcadeError> {
        let kind = mv.kind();
        let path = format!("games/{}/{}", kind.route(), mv.action());
        let value: serde_json::Value = self.post(&path, &mv.body(session_id)).await?;
        Ok(MoveResult::decode(kind, value)?)
    }

    #[instrument(skip(self))]
    async fn hide_cards(&self, session_id: &str) -> Result<HiddenCards, ArcadeError> {
        let body = serde_json::json!({ "game_id": session_id });
        self.post("games/memory/hide-cards", &body).await
    }

    #[instrument(skip(self))]
    async fn fetch_leaderboard(&self) -> Result<Leaderboard, ArcadeError> {
        let raw: BTreeMap<String, Vec<LeaderboardEntry>> = self.get("leaderboard").await?;
        Ok(Leaderboard::from_raw(raw))
    }

    #[instrument(skip(self))]
    async fn add_score(&self, record: &ScoreRecord) -> Result<(), ArcadeError> {
        let body = serde_json::to_value(ScorePayload::from(record))?;
        let _: serde_json::Value = self.post("scores/add", &body).await?;
        Ok(())
    }
}
