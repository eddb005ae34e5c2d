//! Notification scheduler
//!
//! Decides whether a value is delivered now, held behind a debounce timer, or
//! dropped. Owns at most one timer deadline. Configuration changes that arrive
//! while a value is held are queued and applied once the scheduler is idle
//! again, so an in-flight debounce always resolves under the parameters it was
//! armed with.

use crate::config::{DelayMode, NotifierConfig};
use crate::debounce::Debouncer;
use std::time::Instant;
use tracing::{debug, trace};

/// Whether a value is waiting to be delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Pending,
}

/// Outcome of [`NotificationScheduler::reconfigure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconfigure {
    /// Same as the active config; nothing rebuilt
    Unchanged,
    /// Scheduler rebuilt with the new config
    Applied,
    /// A value is pending; the new config waits for idle
    Deferred,
}

#[derive(Debug, Clone)]
enum Policy<T> {
    Disabled,
    Immediate,
    Debounced(Debouncer<T>),
}

impl<T> Policy<T> {
    fn build(config: &NotifierConfig) -> Self {
        match config.mode() {
            DelayMode::Disabled => Policy::Disabled,
            DelayMode::Immediate => Policy::Immediate,
            DelayMode::Debounce {
                wait,
                max_wait,
                leading,
                trailing,
            } => Policy::Debounced(Debouncer::new(wait, max_wait, leading, trailing)),
        }
    }
}

/// Gate and time-delay delivery of values to an owner
#[derive(Debug, Clone)]
pub struct NotificationScheduler<T> {
    config: NotifierConfig,
    policy: Policy<T>,
    queued: Option<NotifierConfig>,
}

impl<T> NotificationScheduler<T> {
    pub fn new(config: NotifierConfig) -> Self {
        Self {
            policy: Policy::build(&config),
            config,
            queued: None,
        }
    }

    /// Offer a value; returns it back if it must be delivered right now
    pub fn schedule(&mut self, now: Instant, value: T) -> Option<T> {
        let delivered = match &mut self.policy {
            Policy::Disabled => {
                trace!("scheduler disabled, dropping value");
                None
            }
            Policy::Immediate => Some(value),
            Policy::Debounced(debouncer) => {
                let delivered = debouncer.call(now, value);
                if delivered.is_none() {
                    trace!(deadline = ?debouncer.deadline(), "value held");
                }
                delivered
            }
        };
        self.settle();
        delivered
    }

    /// Timer expiry; a no-op before the deadline
    pub fn expire(&mut self, now: Instant) -> Option<T> {
        let delivered = match &mut self.policy {
            Policy::Debounced(debouncer) => debouncer.expire(now),
            _ => None,
        };
        self.settle();
        delivered
    }

    /// Deliver the held value now, if the timer is armed
    pub fn flush(&mut self, now: Instant) -> Option<T> {
        let delivered = match &mut self.policy {
            Policy::Debounced(debouncer) => debouncer.flush(now),
            _ => None,
        };
        self.settle();
        delivered
    }

    /// Disarm the timer and drop the held value, returning it
    pub fn cancel(&mut self) -> Option<T> {
        let discarded = match &mut self.policy {
            Policy::Debounced(debouncer) => debouncer.cancel(),
            _ => None,
        };
        self.settle();
        discarded
    }

    /// Replace the configuration, deferring while a value is pending
    pub fn reconfigure(&mut self, config: NotifierConfig) -> Reconfigure {
        if config == self.config {
            self.queued = None;
            return Reconfigure::Unchanged;
        }

        if self.is_pending() {
            debug!(?config, "notification pending, deferring reconfigure");
            self.queued = Some(config);
            return Reconfigure::Deferred;
        }

        self.rebuild(config);
        Reconfigure::Applied
    }

    pub fn state(&self) -> SchedulerState {
        if self.is_pending() {
            SchedulerState::Pending
        } else {
            SchedulerState::Idle
        }
    }

    pub fn is_pending(&self) -> bool {
        match &self.policy {
            Policy::Debounced(debouncer) => debouncer.is_pending(),
            _ => false,
        }
    }

    /// Deadline of the single armed timer
    pub fn deadline(&self) -> Option<Instant> {
        match &self.policy {
            Policy::Debounced(debouncer) => debouncer.deadline(),
            _ => None,
        }
    }

    /// Config the live scheduler was built from
    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Config waiting for the scheduler to go idle
    pub fn queued(&self) -> Option<&NotifierConfig> {
        self.queued.as_ref()
    }

    /// Apply a queued config once nothing is pending
    fn settle(&mut self) {
        if self.is_pending() {
            return;
        }
        if let Some(config) = self.queued.take() {
            self.rebuild(config);
        }
    }

    fn rebuild(&mut self, config: NotifierConfig) {
        debug!(?config, "rebuilding scheduler");
        self.policy = Policy::build(&config);
        self.config = config;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(delay_timeout_ms: i64) -> NotifierConfig {
        NotifierConfig {
            delay_timeout_ms,
            ..Default::default()
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_disabled_never_delivers() {
        let t0 = Instant::now();
        let mut s = NotificationScheduler::new(config(-1));
        assert_eq!(s.schedule(t0, "a"), None);
        assert_eq!(s.state(), SchedulerState::Idle);
        assert_eq!(s.deadline(), None);
        assert_eq!(s.flush(t0), None);
    }

    #[test]
    fn test_immediate_delivers_synchronously() {
        let t0 = Instant::now();
        let mut s = NotificationScheduler::new(config(0));
        assert_eq!(s.schedule(t0, "a"), Some("a"));
        assert_eq!(s.schedule(t0, "ab"), Some("ab"));
        assert_eq!(s.deadline(), None);
        assert!(!s.is_pending());
    }

    #[test]
    fn test_debounced_holds_until_deadline() {
        let t0 = Instant::now();
        let mut s = NotificationScheduler::new(config(100));
        assert_eq!(s.schedule(t0, "a"), None);
        assert_eq!(s.state(), SchedulerState::Pending);
        assert_eq!(s.deadline(), Some(t0 + ms(100)));
        assert_eq!(s.expire(t0 + ms(100)), Some("a"));
        assert_eq!(s.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_reconfigure_when_idle_applies_now() {
        let mut s: NotificationScheduler<&str> = NotificationScheduler::new(config(100));
        assert_eq!(s.reconfigure(config(100)), Reconfigure::Unchanged);
        assert_eq!(s.reconfigure(config(0)), Reconfigure::Applied);
        assert_eq!(s.config().delay_timeout_ms, 0);
    }

    #[test]
    fn test_reconfigure_while_pending_is_deferred() {
        let t0 = Instant::now();
        let mut s = NotificationScheduler::new(config(100));
        s.schedule(t0, "a");

        assert_eq!(s.reconfigure(config(500)), Reconfigure::Deferred);
        assert_eq!(s.config().delay_timeout_ms, 100);
        assert_eq!(s.queued().map(|c| c.delay_timeout_ms), Some(500));
        // Old deadline still armed
        assert_eq!(s.deadline(), Some(t0 + ms(100)));

        assert_eq!(s.expire(t0 + ms(100)), Some("a"));
        assert_eq!(s.config().delay_timeout_ms, 500);
        assert!(s.queued().is_none());

        let t1 = t0 + ms(1000);
        s.schedule(t1, "b");
        assert_eq!(s.deadline(), Some(t1 + ms(500)));
    }

    #[test]
    fn test_reconfigure_back_to_active_drops_queue() {
        let t0 = Instant::now();
        let mut s = NotificationScheduler::new(config(100));
        s.schedule(t0, "a");
        s.reconfigure(config(500));
        assert_eq!(s.reconfigure(config(100)), Reconfigure::Unchanged);
        assert!(s.queued().is_none());
        s.expire(t0 + ms(100));
        assert_eq!(s.config().delay_timeout_ms, 100);
    }

    #[test]
    fn test_cancel_applies_queued_config() {
        let t0 = Instant::now();
        let mut s = NotificationScheduler::new(config(100));
        s.schedule(t0, "a");
        s.reconfigure(config(0));
        assert_eq!(s.cancel(), Some("a"));
        assert_eq!(s.config().delay_timeout_ms, 0);
        assert_eq!(s.schedule(t0, "b"), Some("b"));
    }
}
