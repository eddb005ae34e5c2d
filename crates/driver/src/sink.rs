//! Notification sinks

use settle_core::Notification;
use tokio::sync::mpsc;
use tracing::warn;

/// Receives change notifications from an input task
///
/// Called on the input task, so it should return quickly. Forward to a
/// channel for anything expensive.
pub trait OnChange: Send + 'static {
    fn on_change(&mut self, notification: Notification);
}

impl<F> OnChange for F
where
    F: FnMut(Notification) + Send + 'static,
{
    fn on_change(&mut self, notification: Notification) {
        self(notification)
    }
}

/// Sink forwarding notifications into an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
    /// Create a sink and the receiver it feeds
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl OnChange for ChannelSink {
    fn on_change(&mut self, notification: Notification) {
        if let Err(e) = self.tx.send(notification) {
            warn!("Dropping notification, receiver closed: {:?}", e.0);
        }
    }
}
