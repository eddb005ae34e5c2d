//! Input and notifier configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors loading configuration from disk
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Options accepted when constructing a delayed input
///
/// Values are taken permissively: a negative `min_length` counts as zero, a
/// negative `delay_timeout_ms` disables notification entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputOptions {
    /// Minimum value length before edits are notified (default: 0)
    #[serde(default)]
    pub min_length: i64,

    /// Idle interval before a notification fires (default: 100)
    ///
    /// `< 0` disables notification, `0` notifies synchronously.
    #[serde(default = "default_delay_timeout_ms")]
    pub delay_timeout_ms: i64,

    /// Upper bound on how long a continuous burst can hold a notification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_wait_ms: Option<i64>,

    /// Enter key delivers a pending notification immediately (default: true)
    #[serde(default = "default_true")]
    pub force_notify_on_enter: bool,

    /// Blur delivers a pending notification immediately (default: true)
    #[serde(default = "default_true")]
    pub force_notify_on_blur: bool,

    /// Notify on the first edit of a burst (default: false)
    #[serde(default)]
    pub leading_edge: bool,

    /// Notify after the burst goes idle (default: true)
    #[serde(default = "default_true")]
    pub trailing_edge: bool,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            min_length: 0,
            delay_timeout_ms: default_delay_timeout_ms(),
            max_wait_ms: None,
            force_notify_on_enter: true,
            force_notify_on_blur: true,
            leading_edge: false,
            trailing_edge: true,
        }
    }
}

impl InputOptions {
    /// Parse options from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load options from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Render options as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Minimum length with negatives clamped to zero
    pub fn min_length(&self) -> usize {
        usize::try_from(self.min_length).unwrap_or(0)
    }

    /// The subset of options that shapes the scheduler
    pub fn notifier_config(&self) -> NotifierConfig {
        NotifierConfig {
            delay_timeout_ms: self.delay_timeout_ms,
            max_wait_ms: self.max_wait_ms,
            leading_edge: self.leading_edge,
            trailing_edge: self.trailing_edge,
        }
    }
}

/// Scheduler parameters; a change here rebuilds the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifierConfig {
    pub delay_timeout_ms: i64,
    pub max_wait_ms: Option<i64>,
    pub leading_edge: bool,
    pub trailing_edge: bool,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        InputOptions::default().notifier_config()
    }
}

/// How a scheduler built from a config delivers values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayMode {
    /// Nothing is ever delivered
    Disabled,
    /// Delivered synchronously, no timer
    Immediate,
    /// Debounced
    Debounce {
        wait: Duration,
        /// Always `>= wait` when set
        max_wait: Option<Duration>,
        leading: bool,
        trailing: bool,
    },
}

impl NotifierConfig {
    pub fn mode(&self) -> DelayMode {
        match self.delay_timeout_ms {
            ms if ms < 0 => DelayMode::Disabled,
            0 => DelayMode::Immediate,
            ms => {
                let wait = Duration::from_millis(ms.unsigned_abs());
                // max_wait below wait (including negatives) is raised to wait
                let max_wait = self
                    .max_wait_ms
                    .map(|max| Duration::from_millis(max.max(0).unsigned_abs()).max(wait));
                DelayMode::Debounce {
                    wait,
                    max_wait,
                    leading: self.leading_edge,
                    trailing: self.trailing_edge,
                }
            }
        }
    }
}

fn default_delay_timeout_ms() -> i64 {
    100
}

fn default_true() -> bool {
    true
}
