//! Server configuration: bind address, bank path, and timing constants.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration error. All configuration problems are startup-fatal.
#[derive(Debug, Clone, Display, Error)]
#[display("Configuration error: {message}")]
pub struct ConfigError {
    /// Error message.
    pub message: String,
}

impl ConfigError {
    /// Creates a new configuration error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Timing constants for the turn-gate state machine, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Seconds both players have to answer a question.
    #[serde(default = "default_question_secs")]
    pub question_deadline_secs: u64,
    /// Seconds the authorized player has to place a mark.
    #[serde(default = "default_move_secs")]
    pub move_deadline_secs: u64,
    /// Seconds between a round's terminal notification and the next
    /// question.
    #[serde(default = "default_grace_secs")]
    pub grace_delay_secs: u64,
}

fn default_question_secs() -> u64 {
    30
}

fn default_move_secs() -> u64 {
    30
}

fn default_grace_secs() -> u64 {
    2
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            question_deadline_secs: default_question_secs(),
            move_deadline_secs: default_move_secs(),
            grace_delay_secs: default_grace_secs(),
        }
    }
}

impl Timing {
    /// Question-round deadline.
    pub fn question_deadline(&self) -> Duration {
        Duration::from_secs(self.question_deadline_secs)
    }

    /// Move-window deadline.
    pub fn move_deadline(&self) -> Duration {
        Duration::from_secs(self.move_deadline_secs)
    }

    /// Pause between a resolved round and the next question.
    pub fn grace_delay(&self) -> Duration {
        Duration::from_secs(self.grace_delay_secs)
    }

    /// Checks the ordering invariant.
    ///
    /// The grace delay must be strictly shorter than either deadline so a
    /// round's terminal notification always lands before the next
    /// question supersedes it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the grace delay is not strictly
    /// shorter than both deadlines.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grace_delay_secs >= self.question_deadline_secs
            || self.grace_delay_secs >= self.move_deadline_secs
        {
            return Err(ConfigError::new(
                "grace delay must be strictly shorter than both deadlines",
            ));
        }
        Ok(())
    }
}

/// Server configuration.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Path to the question bank JSON file.
    #[serde(default = "default_bank")]
    bank: PathBuf,

    /// Turn-gate timing constants.
    #[serde(default)]
    timing: Timing,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_bank() -> PathBuf {
    PathBuf::from("data/questions.json")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bank: default_bank(),
            timing: Timing::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file and validates it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file cannot be read or parsed,
    /// or when the timing constants violate the ordering invariant.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("failed to read config file: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("failed to parse config: {e}")))?;
        config.timing.validate()?;
        info!("Config loaded successfully");
        Ok(config)
    }

    /// Overrides the bind host when one is given.
    pub fn with_host(mut self, host: Option<String>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        self
    }

    /// Overrides the bind port when one is given.
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Overrides the question bank path when one is given.
    pub fn with_bank(mut self, bank: Option<PathBuf>) -> Self {
        if let Some(bank) = bank {
            self.bank = bank;
        }
        self
    }
}
