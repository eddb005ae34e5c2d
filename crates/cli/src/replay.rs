//! Deterministic replay of a script on a virtual clock
//!
//! Timers that come due before an event fire first, so the result is exactly
//! what a host with a perfect clock would observe.

use crate::script::{Action, Script};
use serde::Serialize;
use settle_core::{DelayInput, InputOptions, Key, Notification, Reconciled, Trigger};
use std::time::{Duration, Instant};
use tracing::debug;

/// A notification and when it was delivered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub at_ms: u64,
    pub trigger: Trigger,
    pub value: String,
}

/// Everything observed during a replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub deliveries: Vec<Delivery>,
    /// Buffer contents when the input was torn down
    pub final_value: String,
    /// When the teardown happened
    pub teardown_at_ms: u64,
    /// External values dropped because an edit was pending
    pub ignored_external: usize,
}

struct Clock {
    start: Instant,
}

impl Clock {
    fn at(&self, ms: u64) -> Instant {
        self.start + Duration::from_millis(ms)
    }

    fn ms(&self, instant: Instant) -> u64 {
        u64::try_from(instant.saturating_duration_since(self.start).as_millis()).unwrap_or(u64::MAX)
    }
}

struct Replayer {
    input: DelayInput,
    clock: Clock,
    deliveries: Vec<Delivery>,
    ignored_external: usize,
}

impl Replayer {
    fn record(&mut self, at: Instant, notification: Option<Notification>) {
        if let Some(notification) = notification {
            self.deliveries.push(Delivery {
                at_ms: self.clock.ms(at),
                trigger: notification.trigger,
                value: notification.value,
            });
        }
    }

    /// Fire timers due at or before `until`; `None` runs them all out
    fn fire_due(&mut self, until: Option<Instant>) {
        while let Some(deadline) = self.input.deadline() {
            if until.is_some_and(|until| deadline > until) {
                break;
            }
            let fired = self.input.poll(deadline);
            self.record(deadline, fired);
        }
    }

    fn apply(&mut self, now: Instant, action: &Action) {
        let delivered = match action {
            Action::Edit { value } => self.input.edit(now, value.as_str()),
            Action::Key { key } => self.input.key_down(&Key::from_name(key)),
            Action::Blur => self.input.blur(),
            Action::External { value } => {
                if self.input.external_value(value) == Reconciled::Ignored {
                    self.ignored_external += 1;
                }
                None
            }
            Action::Configure { options } => {
                let outcome = self.input.configure(options.clone());
                debug!(?outcome, "replay reconfigure");
                None
            }
            Action::Teardown => None,
        };
        self.record(now, delivered);
    }
}

/// Run `script` against an input built from `options`
///
/// The script ends at its teardown event, or, without one, once every timer
/// has run out.
pub fn replay(options: InputOptions, script: &Script) -> ReplayReport {
    let mut replayer = Replayer {
        input: DelayInput::new(options, script.initial.clone()),
        clock: Clock {
            start: Instant::now(),
        },
        deliveries: Vec::new(),
        ignored_external: 0,
    };

    let mut teardown_at = None;
    for event in &script.events {
        let now = replayer.clock.at(event.at_ms);
        replayer.fire_due(Some(now));

        if event.action == Action::Teardown {
            teardown_at = Some(now);
            break;
        }
        replayer.apply(now, &event.action);
    }

    let teardown_at = match teardown_at {
        Some(at) => at,
        None => {
            replayer.fire_due(None);
            let last_event = script.events.last().map_or(0, |e| e.at_ms);
            let last_delivery = replayer.deliveries.last().map_or(0, |d| d.at_ms);
            replayer.clock.at(last_event.max(last_delivery))
        }
    };

    let Replayer {
        input,
        clock,
        mut deliveries,
        ignored_external,
    } = replayer;

    let final_value = input.value().to_string();
    if let Some(notification) = input.teardown(teardown_at) {
        deliveries.push(Delivery {
            at_ms: clock.ms(teardown_at),
            trigger: notification.trigger,
            value: notification.value,
        });
    }

    ReplayReport {
        deliveries,
        final_value,
        teardown_at_ms: clock.ms(teardown_at),
        ignored_external,
    }
}
