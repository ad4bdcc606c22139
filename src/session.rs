//! Sessions, session storage and player identity.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::games::{Difficulty, GameKind, KindState};

/// Opaque session id issued by the backend.
pub type SessionId = String;

/// Life-cycle status of a session. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Created; waiting for the first move.
    Created,
    /// At least one move made, or a game that runs on its own.
    InProgress,
    /// Finished; no more moves accepted.
    Completed,
}

/// One game session as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Session {
    id: SessionId,
    kind: GameKind,
    difficulty: Difficulty,
    status: SessionStatus,
    created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session in its initial status for `kind`.
    #[instrument]
    pub fn new(id: SessionId, kind: GameKind, difficulty: Difficulty) -> Self {
        let status = if kind.starts_running() {
            SessionStatus::InProgress
        } else {
            SessionStatus::Created
        };
        debug!(session_id = %id, ?status, "Creating session");
        Self {
            id,
            kind,
            difficulty,
            status,
            created_at: Utc::now(),
        }
    }

    /// Moves the status forward. Backward transitions are ignored.
    #[instrument(skip(self), fields(session_id = %self.id, from = ?self.status))]
    pub fn advance(&mut self, to: SessionStatus) {
        if to < self.status {
            warn!(?to, "Ignoring backward status transition");
            return;
        }
        self.status = to;
    }

    /// True while moves may be dispatched.
    pub fn accepts_moves(&self) -> bool {
        self.status != SessionStatus::Completed
    }
}

/// A logged-in player.
///
/// The credential is whatever the auth backend hands out; it is never logged.
#[derive(Clone, PartialEq, Eq, Getters)]
pub struct PlayerIdentity {
    name: String,
    credential: String,
}

impl PlayerIdentity {
    /// Creates an identity.
    pub fn new(name: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            credential: credential.into(),
        }
    }
}

impl std::fmt::Debug for PlayerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerIdentity")
            .field("name", &self.name)
            .field("credential", &"<redacted>")
            .finish()
    }
}

/// Holder for the single active session and its transient state.
#[derive(Debug, Default)]
pub struct SessionStore {
    active: Option<(Session, KindState)>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever is stored.
    #[instrument(skip(self, state), fields(session_id = %session.id))]
    pub fn set(&mut self, session: Session, state: KindState) {
        if let Some((old, _)) = &self.active {
            debug!(old_session = %old.id, "Replacing stored session");
        }
        self.active = Some((session, state));
    }

    /// The active session, if any.
    pub fn get(&self) -> Option<&Session> {
        self.active.as_ref().map(|(session, _)| session)
    }

    /// The active session's transient state.
    pub fn state(&self) -> Option<&KindState> {
        self.active.as_ref().map(|(_, state)| state)
    }

    /// Mutable access to both parts.
    pub fn get_mut(&mut self) -> Option<(&mut Session, &mut KindState)> {
        self.active
            .as_mut()
            .map(|(session, state)| (session, state))
    }

    /// Drops the stored session, returning it.
    pub fn clear(&mut self) -> Option<(Session, KindState)> {
        self.active.take()
    }
}
