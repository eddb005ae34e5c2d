//! Option resolution for the CLI
//!
//! Precedence, lowest to highest:
//! 1. Built-in defaults
//! 2. Config file (`--config`, `./settle.toml`, or `<config dir>/settle/config.toml`)
//! 3. Script `[options]` (replay only)
//! 4. Command-line overrides

use anyhow::{Context, Result};
use clap::Args;
use settle_core::InputOptions;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "settle.toml";

/// Command-line overrides for input options
#[derive(Debug, Clone, Default, Args)]
pub struct OptionOverrides {
    /// Config file to load instead of the default search path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Minimum length before edits are notified
    #[arg(long)]
    pub min_length: Option<i64>,

    /// Idle delay in ms (negative disables, 0 notifies immediately)
    #[arg(long, allow_negative_numbers = true)]
    pub delay_ms: Option<i64>,

    /// Upper bound in ms on how long continuous typing can hold a notification
    #[arg(long)]
    pub max_wait_ms: Option<i64>,

    /// Notify on the first edit of a burst
    #[arg(long)]
    pub leading: bool,

    /// Do not notify after a burst goes idle
    #[arg(long)]
    pub no_trailing: bool,

    /// Enter does not force a pending notification
    #[arg(long)]
    pub no_enter: bool,

    /// Blur does not force a pending notification
    #[arg(long)]
    pub no_blur: bool,
}

impl OptionOverrides {
    /// Apply the overrides that were given on top of `options`
    pub fn apply(&self, options: &mut InputOptions) {
        if let Some(min_length) = self.min_length {
            options.min_length = min_length;
        }
        if let Some(delay_ms) = self.delay_ms {
            options.delay_timeout_ms = delay_ms;
        }
        if let Some(max_wait_ms) = self.max_wait_ms {
            options.max_wait_ms = Some(max_wait_ms);
        }
        if self.leading {
            options.leading_edge = true;
        }
        if self.no_trailing {
            options.trailing_edge = false;
        }
        if self.no_enter {
            options.force_notify_on_enter = false;
        }
        if self.no_blur {
            options.force_notify_on_blur = false;
        }
    }
}

/// Global config file location (`<config dir>/settle/config.toml`)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("settle").join("config.toml"))
}

/// Find the config file to load
///
/// An explicit path is returned as-is, even if it does not exist, so the
/// caller reports the missing file.
pub fn find_config_file(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = cwd.join(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    user_config_path().filter(|path| path.is_file())
}

/// Load options from the config search path
///
/// Returns the options and the file they came from, if any.
pub fn load_options(explicit: Option<&Path>) -> Result<(InputOptions, Option<PathBuf>)> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    match find_config_file(explicit, &cwd) {
        Some(path) => {
            let options = InputOptions::load(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok((options, Some(path)))
        }
        None => Ok((InputOptions::default(), None)),
    }
}

/// Annotated example config
pub fn example_config() -> String {
    r#"# settle configuration
#
# Looked up in order: --config <path>, ./settle.toml, <config dir>/settle/config.toml

# Minimum value length before an edit is notified. Deleting below it
# notifies an empty value instead.
min_length = 0

# Idle interval in ms. Negative disables notification, 0 notifies on every edit.
delay_timeout_ms = 100

# Upper bound in ms on how long continuous typing can hold a notification.
# max_wait_ms = 1000

# Deliver a pending edit immediately on Enter / blur.
force_notify_on_enter = true
force_notify_on_blur = true

# Notify on the first edit of a burst and/or after it goes idle.
leading_edge = false
trailing_edge = true
"#
    .to_string()
}
