//! Client configuration.

use std::path::Path;
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::games::Difficulty;

/// Configuration for the arcade client, loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ArcadeConfig {
    /// Backend base URL.
    #[serde(default = "default_base_url")]
    base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    request_timeout_ms: u64,

    /// Snake tick period in milliseconds.
    #[serde(default = "default_snake_tick_ms")]
    snake_tick_ms: u64,

    /// Delay before a non-matching memory pair is hidden, in milliseconds.
    #[serde(default = "default_memory_hide_delay_ms")]
    memory_hide_delay_ms: u64,

    /// Difficulty used when none is given.
    #[serde(default)]
    default_difficulty: Difficulty,

    /// Player to log in as, if any.
    #[serde(default)]
    player_name: Option<String>,
}

#[instrument]
fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

#[instrument]
fn default_request_timeout_ms() -> u64 {
    10_000
}

#[instrument]
fn default_snake_tick_ms() -> u64 {
    200
}

#[instrument]
fn default_memory_hide_delay_ms() -> u64 {
    1500
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            snake_tick_ms: default_snake_tick_ms(),
            memory_hide_delay_ms: default_memory_hide_delay_ms(),
            default_difficulty: Difficulty::default(),
            player_name: None,
        }
    }
}

impl ArcadeConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        info!(base_url = %config.base_url, "Config loaded successfully");
        Ok(config)
    }

    /// Returns a copy pointing at `base_url`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns a copy with `player_name` set.
    pub fn with_player_name(mut self, player_name: Option<String>) -> Self {
        self.player_name = player_name;
        self
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Timer settings for the session controller.
    pub fn timings(&self) -> Timings {
        Timings::new(
            Duration::from_millis(self.snake_tick_ms),
            Duration::from_millis(self.memory_hide_delay_ms),
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::new("base_url must not be empty".to_string()));
        }
        if self.snake_tick_ms == 0 {
            return Err(ConfigError::new("snake_tick_ms must be positive".to_string()));
        }
        Ok(())
    }
}

/// Timer periods used by the session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct Timings {
    snake_tick: Duration,
    memory_hide_delay: Duration,
}

impl Timings {
    /// Shortest snake tick period accepted.
    pub const MIN_SNAKE_TICK: Duration = Duration::from_millis(1);

    /// Creates timings. A snake tick below [`Self::MIN_SNAKE_TICK`] is raised to it.
    pub fn new(snake_tick: Duration, memory_hide_delay: Duration) -> Self {
        Self {
            snake_tick: snake_tick.max(Self::MIN_SNAKE_TICK),
            memory_hide_delay,
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        ArcadeConfig::default().timings()
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
