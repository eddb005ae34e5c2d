//! The per-input task
//!
//! Owns the `DelayInput` and the only live timer for it. Commands are handled
//! strictly in arrival order; a due timer is serviced before the next command.

use crate::sink::OnChange;
use parking_lot::RwLock;
use settle_core::{DelayInput, InputOptions, Key, Notification, Reconciled};
use std::future::pending;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant, Sleep};
use tracing::{debug, trace};

/// Events sent from a handle to its task
#[derive(Debug)]
pub(crate) enum Command {
    Edit(String),
    KeyDown(Key),
    Blur,
    External(String),
    Configure(InputOptions),
    Teardown,
}

pub(crate) struct InputTask<S> {
    input: DelayInput,
    sink: S,
    /// What the user sees, readable without a round trip
    snapshot: Arc<RwLock<String>>,
    /// Armed debounce timer; replaced on re-arm, dropped on cancel
    timer: Option<Pin<Box<Sleep>>>,
    commands: mpsc::UnboundedReceiver<Command>,
}

impl<S: OnChange> InputTask<S> {
    pub(crate) fn new(
        input: DelayInput,
        sink: S,
        snapshot: Arc<RwLock<String>>,
        commands: mpsc::UnboundedReceiver<Command>,
    ) -> Self {
        Self {
            input,
            sink,
            snapshot,
            timer: None,
            commands,
        }
    }

    /// Run until torn down or every handle is gone, then flush
    pub(crate) async fn run(mut self) {
        debug!("input task started");

        loop {
            tokio::select! {
                biased;

                _ = wait(&mut self.timer) => {
                    self.timer = None;
                    let fired = self.input.poll(now());
                    self.deliver(fired);
                }
                command = self.commands.recv() => match command {
                    Some(Command::Teardown) | None => break,
                    Some(command) => self.handle(command),
                },
            }
            self.rearm();
        }

        self.finish();
    }

    fn handle(&mut self, command: Command) {
        trace!(?command, "input command");

        let delivered = match command {
            Command::Edit(value) => {
                let delivered = self.input.edit(now(), value);
                self.publish();
                delivered
            }
            Command::KeyDown(key) => self.input.key_down(&key),
            Command::Blur => self.input.blur(),
            Command::External(value) => {
                if self.input.external_value(&value) == Reconciled::Adopted {
                    self.publish();
                }
                None
            }
            Command::Configure(options) => {
                let outcome = self.input.configure(options);
                debug!(?outcome, "reconfigured input");
                None
            }
            Command::Teardown => None,
        };

        self.deliver(delivered);
    }

    /// Keep the live timer in step with the scheduler deadline
    fn rearm(&mut self) {
        match self.input.deadline() {
            None => self.timer = None,
            Some(deadline) => {
                let deadline = Instant::from_std(deadline);
                let armed = self.timer.as_ref().map(|sleep| sleep.deadline());
                if armed != Some(deadline) {
                    trace!(?deadline, "arming timer");
                    self.timer = Some(Box::pin(sleep_until(deadline)));
                }
            }
        }
    }

    fn deliver(&mut self, notification: Option<Notification>) {
        if let Some(notification) = notification {
            debug!(trigger = ?notification.trigger, value = %notification.value, "notify");
            self.sink.on_change(notification);
        }
    }

    fn publish(&self) {
        let value = self.input.value();
        let mut snapshot = self.snapshot.write();
        if snapshot.as_str() != value {
            snapshot.clear();
            snapshot.push_str(value);
        }
    }

    fn finish(self) {
        let Self { input, mut sink, .. } = self;
        if let Some(notification) = input.teardown(now()) {
            debug!(value = %notification.value, "flushing pending edit on teardown");
            sink.on_change(notification);
        }
        debug!("input task stopped");
    }
}

async fn wait(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => pending().await,
    }
}

fn now() -> std::time::Instant {
    Instant::now().into_std()
}
