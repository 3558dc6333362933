use tracing::{debug, info};

use super::queue::Notification;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DismissReason {
    Expired,
    Closed,
}

/// Presentation side of the toast queue. Slide-in/out animations live here;
/// the queue has already moved on when `hide` is called.
pub trait ToastSink: Send + 'static {
    fn show(&mut self, notification: &Notification);
    fn hide(&mut self, notification: &Notification, reason: DismissReason);
}

/// Renders toasts as log events.
#[derive(Debug, Default)]
pub struct LogSink;

impl ToastSink for LogSink {
    fn show(&mut self, notification: &Notification) {
        info!(
            id = %notification.id,
            kind = %notification.kind,
            icon = notification.kind.icon(),
            duration_ms = u64::try_from(notification.duration.as_millis()).unwrap_or(u64::MAX),
            "toast: {}",
            notification.message
        );
    }

    fn hide(&mut self, notification: &Notification, reason: DismissReason) {
        debug!(id = %notification.id, ?reason, "toast dismissed");
    }
}
