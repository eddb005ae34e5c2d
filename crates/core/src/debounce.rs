//! Leading/trailing debouncer with an optional max wait
//!
//! The debouncer never sleeps. It records the deadline of its single timer and
//! the host calls [`Debouncer::expire`] once that deadline is reached.

use std::time::{Duration, Instant};

/// Debounce state for one stream of values
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    wait: Duration,
    max_wait: Option<Duration>,
    leading: bool,
    trailing: bool,

    /// Latest value not yet delivered
    held: Option<T>,
    /// Time of the most recent `call`
    last_call: Option<Instant>,
    /// Time of the most recent delivery (or burst start)
    last_invoke: Option<Instant>,
    /// Armed timer deadline
    timer: Option<Instant>,
}

impl<T> Debouncer<T> {
    /// Create a debouncer
    ///
    /// `max_wait` shorter than `wait` is raised to `wait`.
    pub fn new(wait: Duration, max_wait: Option<Duration>, leading: bool, trailing: bool) -> Self {
        Self {
            wait,
            max_wait: max_wait.map(|max| max.max(wait)),
            leading,
            trailing,
            held: None,
            last_call: None,
            last_invoke: None,
            timer: None,
        }
    }

    /// Feed a value; returns a value to deliver right now, if any
    pub fn call(&mut self, now: Instant, value: T) -> Option<T> {
        let invoking = self.should_invoke(now);
        self.held = Some(value);
        self.last_call = Some(now);

        if invoking {
            if self.timer.is_none() {
                return self.leading_edge(now);
            }
            if self.max_wait.is_some() {
                // Burst ran past max_wait: deliver now and restart the timer
                self.timer = Some(now + self.wait);
                return self.invoke(now);
            }
        }

        if self.timer.is_none() {
            self.timer = Some(now + self.wait);
        }
        None
    }

    /// Timer callback; call at or after [`Debouncer::deadline`]
    pub fn expire(&mut self, now: Instant) -> Option<T> {
        let deadline = self.timer?;
        if now < deadline {
            return None;
        }

        if self.should_invoke(now) {
            return self.trailing_edge(now);
        }

        self.timer = Some(now + self.remaining_wait(now));
        None
    }

    /// Run the trailing edge immediately if a timer is armed
    pub fn flush(&mut self, now: Instant) -> Option<T> {
        if self.timer.is_none() {
            return None;
        }
        self.trailing_edge(now)
    }

    /// Disarm and forget the burst; returns the discarded value
    pub fn cancel(&mut self) -> Option<T> {
        self.timer = None;
        self.last_call = None;
        self.last_invoke = None;
        self.held.take()
    }

    /// Deadline of the armed timer
    pub fn deadline(&self) -> Option<Instant> {
        self.timer
    }

    /// True while a value is held for delivery
    pub fn is_pending(&self) -> bool {
        self.held.is_some()
    }

    pub fn max_wait(&self) -> Option<Duration> {
        self.max_wait
    }

    fn leading_edge(&mut self, now: Instant) -> Option<T> {
        self.last_invoke = Some(now);
        self.timer = Some(now + self.wait);
        if self.leading {
            self.invoke(now)
        } else {
            None
        }
    }

    fn trailing_edge(&mut self, now: Instant) -> Option<T> {
        self.timer = None;
        if self.trailing && self.held.is_some() {
            return self.invoke(now);
        }
        self.held = None;
        None
    }

    fn invoke(&mut self, now: Instant) -> Option<T> {
        self.last_invoke = Some(now);
        self.held.take()
    }

    fn should_invoke(&self, now: Instant) -> bool {
        let Some(last_call) = self.last_call else {
            return true;
        };

        if now.saturating_duration_since(last_call) >= self.wait {
            return true;
        }

        match (self.max_wait, self.last_invoke) {
            (Some(max_wait), Some(last_invoke)) => {
                now.saturating_duration_since(last_invoke) >= max_wait
            }
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    fn remaining_wait(&self, now: Instant) -> Duration {
        let since_call = self
            .last_call
            .map_or(self.wait, |t| now.saturating_duration_since(t));
        let waiting = self.wait.saturating_sub(since_call);

        match (self.max_wait, self.last_invoke) {
            (Some(max_wait), Some(last_invoke)) => {
                let since_invoke = now.saturating_duration_since(last_invoke);
                waiting.min(max_wait.saturating_sub(since_invoke))
            }
            _ => waiting,
        }
    }
}
