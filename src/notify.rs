//! Notification Sink
//!
//! Fire-and-forget delivery of user-visible alerts. Sinks never report
//! failure back to the caller.

use tokio::sync::mpsc;

use crate::domain::Notification;

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Forwards alerts to whoever holds the receiver (the stdio host)
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        log::info!("[notify] {}: {}", notification.title, notification.message);
        if self.tx.send(notification).is_err() {
            log::debug!("Notification dropped, receiver closed");
        }
    }
}

/// Keeps every alert; for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: std::sync::Mutex<Vec<Notification>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NotificationKind;

    #[tokio::test]
    async fn test_channel_notifier_forwards() {
        let (notifier, mut rx) = ChannelNotifier::channel();
        notifier.notify(Notification::workspace_saved("Repo"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, NotificationKind::WorkspaceSaved);
        assert_eq!(received.message, "\"Repo\" has been saved");
    }

    #[test]
    fn test_channel_notifier_survives_closed_receiver() {
        let (notifier, rx) = ChannelNotifier::channel();
        drop(rx);
        notifier.notify(Notification::ides_unavailable(2));
    }
}
