//! Event scripts for `settle replay`
//!
//! A script is a TOML or JSON document:
//! ```toml
//! initial = ""
//!
//! [options]
//! min_length = 2
//! delay_timeout_ms = 500
//!
//! [[events]]
//! at_ms = 0
//! kind = "edit"
//! value = "x"
//!
//! [[events]]
//! at_ms = 120
//! kind = "key"
//! key = "Enter"
//! ```

use serde::{Deserialize, Serialize};
use settle_core::InputOptions;
use std::path::Path;
use thiserror::Error;

/// Errors loading or validating a script
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML script: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON script: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported script format '{0}' (expected .toml or .json)")]
    UnsupportedFormat(String),

    #[error("event {index} at {at_ms}ms is earlier than the previous event at {previous_ms}ms")]
    OutOfOrder {
        index: usize,
        at_ms: u64,
        previous_ms: u64,
    },

    #[error("event {index} comes after teardown")]
    AfterTeardown { index: usize },
}

/// A scripted timeline of input events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Value the input starts with
    #[serde(default)]
    pub initial: String,

    /// Options for this script, layered over the resolved config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ScriptOptions>,

    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

/// Script-level option overrides
///
/// Only the fields a script sets replace the resolved config; the rest keep
/// their config file or default values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_timeout_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wait_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_notify_on_enter: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_notify_on_blur: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leading_edge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_edge: Option<bool>,
}

impl ScriptOptions {
    /// Overwrite the fields this script sets
    pub fn apply(&self, options: &mut InputOptions) {
        if let Some(min_length) = self.min_length {
            options.min_length = min_length;
        }
        if let Some(delay_timeout_ms) = self.delay_timeout_ms {
            options.delay_timeout_ms = delay_timeout_ms;
        }
        if let Some(max_wait_ms) = self.max_wait_ms {
            options.max_wait_ms = Some(max_wait_ms);
        }
        if let Some(enter) = self.force_notify_on_enter {
            options.force_notify_on_enter = enter;
        }
        if let Some(blur) = self.force_notify_on_blur {
            options.force_notify_on_blur = blur;
        }
        if let Some(leading) = self.leading_edge {
            options.leading_edge = leading;
        }
        if let Some(trailing) = self.trailing_edge {
            options.trailing_edge = trailing;
        }
    }
}

/// One event at a point on the virtual clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEvent {
    /// Milliseconds since the start of the script
    pub at_ms: u64,

    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// User typed; `value` is the full new contents
    Edit { value: String },
    /// Key press, named like `KeyboardEvent.key`
    Key { key: String },
    Blur,
    /// Owner pushed a controlled value
    External { value: String },
    Configure { options: InputOptions },
    Teardown,
}

impl Script {
    /// Load a script, picking the format from the file extension
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let script = match extension.as_str() {
            "toml" => Self::from_toml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            other => return Err(ScriptError::UnsupportedFormat(other.to_string())),
        };

        script.validate()?;
        Ok(script)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ScriptError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check events are in time order and nothing follows a teardown
    pub fn validate(&self) -> Result<(), ScriptError> {
        let mut previous_ms = 0;
        let mut torn_down = false;

        for (index, event) in self.events.iter().enumerate() {
            if torn_down {
                return Err(ScriptError::AfterTeardown { index });
            }
            if event.at_ms < previous_ms {
                return Err(ScriptError::OutOfOrder {
                    index,
                    at_ms: event.at_ms,
                    previous_ms,
                });
            }
            previous_ms = event.at_ms;
            torn_down = event.action == Action::Teardown;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TOML_SCRIPT: &str = r#"
initial = "se"

[options]
min_length = 2
delay_timeout_ms = 500

[[events]]
at_ms = 0
kind = "edit"
value = "sea"

[[events]]
at_ms = 100
kind = "key"
key = "Enter"

[[events]]
at_ms = 200
kind = "configure"
options = { delay_timeout_ms = 0 }

[[events]]
at_ms = 300
kind = "blur"
"#;

    #[test]
    fn test_parse_toml_script() {
        let script = Script::from_toml_str(TOML_SCRIPT).unwrap();
        assert_eq!(script.initial, "se");
        let options = script.options.as_ref().unwrap();
        assert_eq!(options.min_length, Some(2));
        assert_eq!(options.leading_edge, None);
        assert_eq!(script.events.len(), 4);
        assert_eq!(
            script.events[0].action,
            Action::Edit { value: "sea".to_string() }
        );
        assert_eq!(script.events[1].action, Action::Key { key: "Enter".to_string() });
        match &script.events[2].action {
            Action::Configure { options } => {
                assert_eq!(options.delay_timeout_ms, 0);
                assert!(options.trailing_edge);
            }
            other => panic!("unexpected action {:?}", other),
        }
        assert_eq!(script.events[3].action, Action::Blur);
        script.validate().unwrap();
    }

    #[test]
    fn test_parse_json_script() {
        let script = Script::from_json_str(
            r#"{"events": [{"at_ms": 5, "kind": "external", "value": "x"}, {"at_ms": 5, "kind": "teardown"}]}"#,
        )
        .unwrap();
        assert!(script.options.is_none());
        assert_eq!(script.initial, "");
        assert_eq!(script.events[1].action, Action::Teardown);
        script.validate().unwrap();
    }

    #[test]
    fn test_out_of_order_rejected() {
        let script = Script::from_json_str(
            r#"{"events": [{"at_ms": 50, "kind": "blur"}, {"at_ms": 10, "kind": "blur"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            script.validate(),
            Err(ScriptError::OutOfOrder { index: 1, at_ms: 10, previous_ms: 50 })
        ));
    }

    #[test]
    fn test_event_after_teardown_rejected() {
        let script = Script::from_json_str(
            r#"{"events": [{"at_ms": 0, "kind": "teardown"}, {"at_ms": 1, "kind": "blur"}]}"#,
        )
        .unwrap();
        assert!(matches!(script.validate(), Err(ScriptError::AfterTeardown { index: 1 })));
    }

    #[test]
    fn test_load_by_extension() {
        let temp_dir = TempDir::new().unwrap();

        let toml_path = temp_dir.path().join("typing.toml");
        fs::write(&toml_path, TOML_SCRIPT).unwrap();
        assert_eq!(Script::load(&toml_path).unwrap().events.len(), 4);

        let txt_path = temp_dir.path().join("typing.txt");
        fs::write(&txt_path, TOML_SCRIPT).unwrap();
        assert!(matches!(
            Script::load(&txt_path),
            Err(ScriptError::UnsupportedFormat(ext)) if ext == "txt"
        ));

        assert!(matches!(
            Script::load(&temp_dir.path().join("missing.json")),
            Err(ScriptError::Io { .. })
        ));
    }

    #[test]
    fn test_script_options_layer_over_config() {
        let script = Script::from_toml_str("[options]\ndelay_timeout_ms = 0\n").unwrap();
        let mut options = InputOptions {
            min_length: 3,
            delay_timeout_ms: 250,
            force_notify_on_blur: false,
            ..Default::default()
        };
        script.options.unwrap().apply(&mut options);

        assert_eq!(options.delay_timeout_ms, 0);
        assert_eq!(options.min_length, 3);
        assert!(!options.force_notify_on_blur);
    }
}
