//! Destinations for reminder notifications.

use log::{debug, info};
use tokio::sync::mpsc;

use crate::models::Notification;

/// Receives every notification the scheduler emits. Delivery is
/// fire-and-forget: a sink cannot fail a tick.
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, notification: &Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn deliver(&self, notification: &Notification) {
        info!(
            "Reminder for block {} (attempt {}): {}",
            notification.block_id, notification.attempt, notification.message
        );
    }
}

/// Forwards notifications over an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
    /// Creates a sink and the receiver its notifications arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for ChannelSink {
    fn deliver(&self, notification: &Notification) {
        if self.sender.send(notification.clone()).is_err() {
            debug!(
                "Dropped reminder for block {}: receiver closed",
                notification.block_id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_forwards() {
        let (sink, mut receiver) = ChannelSink::new();
        let notification = Notification {
            block_id: 3,
            title: "Notes".to_string(),
            message: "check in".to_string(),
            at: "2026-03-02T13:00:00Z".parse().unwrap(),
            attempt: 1,
        };

        sink.deliver(&notification);
        assert_eq!(receiver.recv().await, Some(notification.clone()));

        drop(receiver);
        sink.deliver(&notification);
    }
}
