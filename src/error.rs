//! Error types for arcade sessions.

use derive_more::{Display, Error};
use tracing::instrument;

/// Category of an [`ArcadeError`].
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ArcadeErrorKind {
    /// Transport failure: connection refused, timeout, broken body stream.
    #[display("network error: {}", _0)]
    Network(String),

    /// The backend answered with a non-success status.
    #[display("backend error ({}): {}", status, message)]
    Backend {
        /// HTTP status code.
        status: u16,
        /// `error` field of the response body, or the raw body.
        message: String,
    },

    /// The backend answered 2xx but the body had an unexpected shape.
    #[display("unexpected response: {}", _0)]
    Decode(String),

    /// Operation attempted outside the allowed session state.
    #[display("invalid state: {}", _0)]
    InvalidState(String),

    /// Move rejected locally before dispatch.
    #[display("invalid move: {}", _0)]
    Validation(String),

    /// Creating a session failed; the controller stays idle.
    #[display("could not create session: {}", _0)]
    SessionCreateFailed(String),
}

/// Arcade error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("{} at {}:{}", kind, file, line)]
pub struct ArcadeError {
    /// What went wrong.
    pub kind: ArcadeErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ArcadeError {
    /// Creates a new error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: ArcadeErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for [`ArcadeErrorKind::InvalidState`].
    #[track_caller]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ArcadeErrorKind::InvalidState(message.into()))
    }

    /// Shorthand for [`ArcadeErrorKind::Validation`].
    #[track_caller]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ArcadeErrorKind::Validation(message.into()))
    }

    /// Returns the error category.
    pub fn kind(&self) -> &ArcadeErrorKind {
        &self.kind
    }

    /// True for failures the user may retry unchanged (network or backend).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ArcadeErrorKind::Network(_) | ArcadeErrorKind::Backend { .. }
        )
    }
}

impl From<reqwest::Error> for ArcadeError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::new(ArcadeErrorKind::Decode(err.to_string()))
        } else {
            Self::new(ArcadeErrorKind::Network(err.to_string()))
        }
    }
}

impl From<serde_json::Error> for ArcadeError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(ArcadeErrorKind::Decode(err.to_string()))
    }
}
