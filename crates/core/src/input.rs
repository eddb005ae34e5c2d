//! Delayed-notification input component
//!
//! Combines the edit buffer with a notification scheduler. Every method that
//! can produce a change notification returns it instead of calling out, so the
//! host decides how to deliver it.

use crate::buffer::{EditBuffer, Reconciled};
use crate::config::InputOptions;
use crate::scheduler::{NotificationScheduler, Reconfigure};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// What caused a notification to be delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Delivered while handling an edit (zero delay, leading edge, max wait)
    Edit,
    /// Debounce timer fired
    Deadline,
    /// Enter key
    Enter,
    /// Focus lost
    Blur,
    /// Flushed when the input was torn down
    Teardown,
}

/// A value delivered to the owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub value: String,
    pub trigger: Trigger,
}

impl Notification {
    pub fn new(value: impl Into<String>, trigger: Trigger) -> Self {
        Self {
            value: value.into(),
            trigger,
        }
    }
}

/// Keys the input reacts to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Enter,
    Char(char),
    /// Any other named key ("Escape", "Tab", ...)
    Other(String),
}

impl Key {
    /// Map a key name the way browsers report `KeyboardEvent.key`
    pub fn from_name(name: &str) -> Self {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            _ if name.eq_ignore_ascii_case("enter") => Key::Enter,
            (Some(c), None) => Key::Char(c),
            _ => Key::Other(name.to_string()),
        }
    }
}

/// Text input that delays change notifications until typing goes idle
#[derive(Debug, Clone)]
pub struct DelayInput {
    buffer: EditBuffer,
    scheduler: NotificationScheduler<String>,
    options: InputOptions,
}

impl DelayInput {
    pub fn new(options: InputOptions, initial: impl Into<String>) -> Self {
        Self {
            buffer: EditBuffer::new(initial),
            scheduler: NotificationScheduler::new(options.notifier_config()),
            options,
        }
    }

    /// Current buffer contents (what the user sees)
    pub fn value(&self) -> &str {
        self.buffer.value()
    }

    pub fn options(&self) -> &InputOptions {
        &self.options
    }

    /// True while an edit is waiting to be notified
    pub fn is_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// When the host should call [`DelayInput::poll`] next
    pub fn deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    /// User typed; `value` is the full new contents
    pub fn edit(&mut self, now: Instant, value: impl Into<String>) -> Option<Notification> {
        let edit = self.buffer.set(value);
        let min_length = self.options.min_length();

        let candidate = if edit.new_len >= min_length {
            self.buffer.value().to_string()
        } else if edit.is_deletion() {
            // Deleting below the threshold reads as "cleared the field"
            debug!(len = edit.new_len, min_length, "edit fell below min length, notifying empty");
            String::new()
        } else {
            debug!(len = edit.new_len, min_length, "edit below min length, suppressed");
            return None;
        };

        self.scheduler
            .schedule(now, candidate)
            .map(|value| Notification::new(value, Trigger::Edit))
    }

    pub fn key_down(&mut self, key: &Key) -> Option<Notification> {
        if *key == Key::Enter && self.options.force_notify_on_enter {
            return self.force_notify(Trigger::Enter);
        }
        None
    }

    pub fn blur(&mut self) -> Option<Notification> {
        if self.options.force_notify_on_blur {
            return self.force_notify(Trigger::Blur);
        }
        None
    }

    /// Deliver a pending edit now, skipping the delay
    ///
    /// Does nothing unless an edit is pending. The current buffer is delivered,
    /// or the empty string if it is shorter than `min_length`.
    pub fn force_notify(&mut self, trigger: Trigger) -> Option<Notification> {
        if !self.scheduler.is_pending() {
            return None;
        }

        self.scheduler.cancel();

        let value = if self.buffer.char_len() >= self.options.min_length() {
            self.buffer.value().to_string()
        } else {
            String::new()
        };
        debug!(?trigger, value = %value, "force notify");
        Some(Notification::new(value, trigger))
    }

    /// Owner pushed a new controlled value
    pub fn external_value(&mut self, value: &str) -> Reconciled {
        let pending = self.scheduler.is_pending();
        self.buffer.reconcile_external(value, pending)
    }

    /// Apply new options
    ///
    /// `min_length` and the force-notify flags take effect immediately. Delay
    /// and edge settings are deferred while an edit is pending.
    pub fn configure(&mut self, options: InputOptions) -> Reconfigure {
        let outcome = self.scheduler.reconfigure(options.notifier_config());
        self.options = options;
        outcome
    }

    /// Fire the debounce timer if its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<Notification> {
        self.scheduler
            .expire(now)
            .map(|value| Notification::new(value, Trigger::Deadline))
    }

    /// Discard the input, flushing any pending edit exactly once
    pub fn teardown(mut self, now: Instant) -> Option<Notification> {
        self.scheduler
            .flush(now)
            .map(|value| Notification::new(value, Trigger::Teardown))
    }
}
