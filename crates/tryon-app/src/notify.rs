use chrono::{DateTime, Utc};
use log::{error, info};
use tokio::sync::mpsc::UnboundedSender;

/// Id shared by every notification of one submission, so each replaces the last.
pub const PROCESSING_ID: &str = "processing";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    pub level: NotificationLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Transient progress messages; presentation belongs to the implementor.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn loading(&self, id: &str, message: &str) {
        self.notify(Notification::new(id, NotificationLevel::Loading, message));
    }

    fn success(&self, id: &str, message: &str) {
        self.notify(Notification::new(id, NotificationLevel::Success, message));
    }

    fn error(&self, id: &str, message: &str) {
        self.notify(Notification::new(id, NotificationLevel::Error, message));
    }
}

impl Notification {
    pub fn new(id: &str, level: NotificationLevel, message: &str) -> Self {
        Self {
            id: id.to_string(),
            level,
            message: message.to_string(),
            at: Utc::now(),
        }
    }
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Loading | NotificationLevel::Success => {
                info!("[{}] {}", notification.id, notification.message)
            }
            NotificationLevel::Error => error!("[{}] {}", notification.id, notification.message),
        }
    }
}

/// Forwards notifications to whoever renders them, e.g. a UI event loop.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new(tx: UnboundedSender<Notification>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        // A closed receiver just means nobody is watching anymore.
        let _ = self.tx.send(notification);
    }
}
