//! Notification sink — fire-and-forget success/error toasts.
//!
//! Not part of core correctness; the controller reports outcomes here
//! and moves on. The TUI drains a channel into its toast widget, the
//! CLI prints directly, tests record.

use tokio::sync::mpsc;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A single toast message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Fire-and-forget toast sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Success,
            message: message.to_owned(),
        });
    }

    fn error(&self, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Error,
            message: message.to_owned(),
        });
    }
}

/// Discards everything. For headless callers (CLI handles its own output).
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// Forwards toasts into an unbounded channel; the UI event loop drains it.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<Notification>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        // Receiver gone means the UI is shutting down — nothing to do.
        let _ = self.tx.send(notification);
    }
}
