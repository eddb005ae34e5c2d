//! Tokio host for delayed-notification inputs
//!
//! This crate provides:
//! - One task per input owning the `DelayInput` and its single timer
//! - An ordered command channel for edits, keys, blur, external values and reconfiguration
//! - `OnChange` sinks (closures or a channel) receiving notifications
//! - Flush on teardown or when the handle is dropped
//!
//! ```no_run
//! # async fn demo() -> Result<(), settle_driver::DriverError> {
//! use settle_core::InputOptions;
//!
//! let (sink, mut changes) = settle_driver::ChannelSink::channel();
//! let input = settle_driver::spawn(InputOptions::default(), "", sink);
//! input.edit("rust")?;
//! let change = changes.recv().await;
//! input.teardown().await?;
//! # Ok(())
//! # }
//! ```

mod handle;
pub mod sink;
mod task;

pub use handle::DelayInputHandle;
pub use sink::{ChannelSink, OnChange};

use settle_core::InputOptions;
use thiserror::Error;

/// Errors talking to an input task
#[derive(Debug, Error)]
pub enum DriverError {
    /// The task already shut down (torn down or its sink panicked)
    #[error("input task has shut down")]
    Closed,

    /// The task panicked
    #[error("input task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Spawn an input task on the current tokio runtime
///
/// # Panics
///
/// Panics when called outside a tokio runtime.
pub fn spawn<S: OnChange>(
    options: InputOptions,
    initial: impl Into<String>,
    sink: S,
) -> DelayInputHandle {
    handle::spawn(options, initial.into(), sink)
}
