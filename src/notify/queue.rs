use std::collections::VecDeque;
use std::fmt::{self, Display};
use std::time::Duration;

use uuid::Uuid;

use crate::types::NotificationKind;

/// Identifiant ordonné dans le temps (UUIDv7).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NotificationId(Uuid);

impl NotificationId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub duration: Duration,
}

impl Notification {
    /// A zero duration falls back to `fallback`.
    pub fn new(
        message: impl Into<String>,
        kind: NotificationKind,
        duration: Duration,
        fallback: Duration,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            message: message.into(),
            kind,
            duration: if duration.is_zero() { fallback } else { duration },
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueueState {
    Idle,
    Displaying,
}

/// What changed on screen after an operation.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Transition {
    pub hidden: Option<Notification>,
    pub shown: Option<Notification>,
}

/// Single-slot FIFO: at most one notification is visible, the rest wait in
/// insertion order.
#[derive(Debug)]
pub struct NotificationQueue {
    pending: VecDeque<Notification>,
    visible: Option<Notification>,
    fallback: Duration,
    shown: u64,
}

impl NotificationQueue {
    pub const fn new(fallback: Duration) -> Self {
        Self {
            pending: VecDeque::new(),
            visible: None,
            fallback,
            shown: 0,
        }
    }

    pub fn enqueue(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        duration: Duration,
    ) -> NotificationId {
        let notification = Notification::new(message, kind, duration, self.fallback);
        let id = notification.id;
        self.push(notification);
        id
    }

    pub fn push(&mut self, mut notification: Notification) -> Transition {
        if notification.duration.is_zero() {
            notification.duration = self.fallback;
        }
        self.pending.push_back(notification);
        Transition {
            hidden: None,
            shown: self.advance(),
        }
    }

    /// Removes `id` from the screen and shows the next pending item.
    ///
    /// Returns `None` when `id` is not the visible notification, so a timer
    /// racing a manual close advances the queue only once.
    pub fn dismiss(&mut self, id: NotificationId) -> Option<Transition> {
        if self.visible.as_ref().is_none_or(|current| current.id != id) {
            return None;
        }
        let hidden = self.visible.take();
        Some(Transition {
            hidden,
            shown: self.advance(),
        })
    }

    fn advance(&mut self) -> Option<Notification> {
        if self.visible.is_some() {
            return None;
        }
        let next = self.pending.pop_front()?;
        self.shown += 1;
        self.visible = Some(next.clone());
        Some(next)
    }

    /// Drops the oldest pending items so that at most `keep` remain.
    pub fn retain_latest(&mut self, keep: usize) -> usize {
        let excess = self.pending.len().saturating_sub(keep);
        self.pending.drain(..excess);
        excess
    }

    pub const fn state(&self) -> QueueState {
        if self.visible.is_some() {
            QueueState::Displaying
        } else {
            QueueState::Idle
        }
    }

    pub const fn visible(&self) -> Option<&Notification> {
        self.visible.as_ref()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Notification> {
        self.pending.iter()
    }

    pub const fn shown_count(&self) -> u64 {
        self.shown
    }
}
