//! Toast notifications shown one at a time, oldest first.

mod center;
mod queue;
mod sink;

pub use center::{NotificationCenter, Notifier};
pub use queue::{Notification, NotificationId, NotificationQueue, QueueState, Transition};
pub use sink::{DismissReason, LogSink, ToastSink};
