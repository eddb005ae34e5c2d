//! Owner-side handle to an input task

use crate::sink::OnChange;
use crate::task::{Command, InputTask};
use crate::DriverError;
use parking_lot::RwLock;
use settle_core::{DelayInput, InputOptions, Key};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle used by the host UI to feed events into an input task
///
/// Dropping the handle tears the input down: the task flushes any pending
/// edit to the sink and exits.
pub struct DelayInputHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: Arc<RwLock<String>>,
    task: JoinHandle<()>,
}

pub(crate) fn spawn<S: OnChange>(options: InputOptions, initial: String, sink: S) -> DelayInputHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    let snapshot = Arc::new(RwLock::new(initial.clone()));
    let input = DelayInput::new(options, initial);
    let task = tokio::spawn(InputTask::new(input, sink, Arc::clone(&snapshot), rx).run());

    DelayInputHandle {
        commands: tx,
        snapshot,
        task,
    }
}

impl DelayInputHandle {
    /// User edited the field; `value` is the full new contents
    pub fn edit(&self, value: impl Into<String>) -> Result<(), DriverError> {
        self.send(Command::Edit(value.into()))
    }

    pub fn key_down(&self, key: Key) -> Result<(), DriverError> {
        self.send(Command::KeyDown(key))
    }

    pub fn blur(&self) -> Result<(), DriverError> {
        self.send(Command::Blur)
    }

    /// Owner pushed a controlled value; ignored while an edit is pending
    pub fn external_value(&self, value: impl Into<String>) -> Result<(), DriverError> {
        self.send(Command::External(value.into()))
    }

    pub fn configure(&self, options: InputOptions) -> Result<(), DriverError> {
        self.send(Command::Configure(options))
    }

    /// Buffer contents as of the last processed command
    pub fn value(&self) -> String {
        self.snapshot.read().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Flush any pending edit and wait for the task to exit
    pub async fn teardown(self) -> Result<(), DriverError> {
        // Already gone is fine; the join below reports why
        let _ = self.commands.send(Command::Teardown);
        self.task.await?;
        Ok(())
    }

    fn send(&self, command: Command) -> Result<(), DriverError> {
        self.commands.send(command).map_err(|_| DriverError::Closed)
    }
}
