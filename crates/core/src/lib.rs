//! Delayed change notification for text inputs
//!
//! This crate provides:
//! - Edit buffer holding what the user currently sees
//! - Leading/trailing/max-wait debouncer with explicit deadlines
//! - Notification scheduler with deferred reconfiguration
//! - `DelayInput` component tying the two together (min-length gate, force notify, teardown flush)
//!
//! Nothing here owns a clock or a runtime. Every operation that depends on time
//! takes `now: Instant`, and the armed deadline is exposed so a host can sleep
//! until it and call back in.

pub mod buffer;
pub mod config;
pub mod debounce;
pub mod input;
pub mod scheduler;

// Re-exports
pub use buffer::{Edit, EditBuffer, Reconciled};
pub use config::{ConfigError, DelayMode, InputOptions, NotifierConfig};
pub use debounce::Debouncer;
pub use input::{DelayInput, Key, Notification, Trigger};
pub use scheduler::{NotificationScheduler, Reconfigure, SchedulerState};
