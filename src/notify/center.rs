use std::num::NonZeroUsize;
use std::time::Duration;

use async_channel::{Receiver, Sender, TrySendError, bounded};
use lru::LruCache;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use crate::config::NotifySettings;
use crate::error::NotifyError;
use crate::types::NotificationKind;

use super::queue::{Notification, NotificationId, NotificationQueue, Transition};
use super::sink::{DismissReason, ToastSink};

enum Request {
    Enqueue(Notification),
    Dismiss(NotificationId),
}

/// Cloneable handle used by the page to post and close toasts.
#[derive(Clone, Debug)]
pub struct Notifier {
    tx: Sender<Request>,
    default_duration: Duration,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enqueue(n) => f.debug_tuple("Enqueue").field(&n.id).finish(),
            Self::Dismiss(id) => f.debug_tuple("Dismiss").field(id).finish(),
        }
    }
}

impl Notifier {
    /// Posts a toast with the configured default duration.
    ///
    /// # Errors
    ///
    /// Fails when the request channel is full or the center has stopped.
    pub fn notify(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Result<NotificationId, NotifyError> {
        self.notify_for(message, kind, self.default_duration)
    }

    /// # Errors
    ///
    /// Fails when the request channel is full or the center has stopped.
    pub fn notify_for(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        duration: Duration,
    ) -> Result<NotificationId, NotifyError> {
        let notification = Notification::new(message, kind, duration, self.default_duration);
        let id = notification.id;
        self.send(Request::Enqueue(notification))?;
        Ok(id)
    }

    /// Manual close. Closing a toast that already expired is a no-op.
    ///
    /// # Errors
    ///
    /// Fails when the request channel is full or the center has stopped.
    pub fn dismiss(&self, id: NotificationId) -> Result<(), NotifyError> {
        self.send(Request::Dismiss(id))
    }

    fn send(&self, request: Request) -> Result<(), NotifyError> {
        self.tx.try_send(request).map_err(|err| match err {
            TrySendError::Full(_) => NotifyError::QueueFull,
            TrySendError::Closed(_) => NotifyError::Closed,
        })
    }
}

/// Owns the queue on its own task; one dismissal deadline at a time.
pub struct NotificationCenter {
    notifier: Notifier,
    task: JoinHandle<u64>,
}

impl NotificationCenter {
    pub fn spawn<S: ToastSink>(settings: &NotifySettings, sink: S) -> Self {
        let (tx, rx) = bounded(settings.queue_bound.max(1));
        let worker = Worker {
            queue: NotificationQueue::new(settings.default_duration),
            sink,
            deadline: None,
            pending_limit: settings.pending_limit,
            dedup: settings.dedup_window.map(|window| Dedup {
                window,
                seen: LruCache::new(
                    NonZeroUsize::new(settings.dedup_cache_size).unwrap_or(NonZeroUsize::MIN),
                ),
            }),
        };
        let task = tokio::spawn(worker.run(rx));
        Self {
            notifier: Notifier {
                tx,
                default_duration: settings.default_duration,
            },
            task,
        }
    }

    pub fn notifier(&self) -> Notifier {
        self.notifier.clone()
    }

    /// Closes the request channel and waits for the worker.
    ///
    /// Returns how many toasts were displayed over the center's lifetime.
    pub async fn shutdown(self) -> u64 {
        self.notifier.tx.close();
        match self.task.await {
            Ok(shown) => shown,
            Err(err) => {
                warn!(error = %err, "notification task terminated unexpectedly");
                0
            }
        }
    }
}

struct Dedup {
    window: Duration,
    seen: LruCache<(NotificationKind, String), Instant>,
}

impl Dedup {
    fn is_repeat(&mut self, notification: &Notification, now: Instant) -> bool {
        let key = (notification.kind, notification.message.clone());
        if let Some(last) = self.seen.get(&key) {
            if now.duration_since(*last) < self.window {
                return true;
            }
        }
        self.seen.put(key, now);
        false
    }
}

struct Worker<S> {
    queue: NotificationQueue,
    sink: S,
    deadline: Option<(NotificationId, Instant)>,
    pending_limit: usize,
    dedup: Option<Dedup>,
}

impl<S: ToastSink> Worker<S> {
    async fn run(mut self, rx: Receiver<Request>) -> u64 {
        loop {
            let request = match self.deadline {
                Some((id, at)) => tokio::select! {
                    request = rx.recv() => request,
                    () = sleep_until(at) => {
                        self.dismiss(id, DismissReason::Expired);
                        continue;
                    }
                },
                None => rx.recv().await,
            };

            let Ok(request) = request else { break };
            match request {
                Request::Enqueue(notification) => self.enqueue(notification),
                Request::Dismiss(id) => self.dismiss(id, DismissReason::Closed),
            }
        }
        debug!(
            shown = self.queue.shown_count(),
            dropped_pending = self.queue.pending_len(),
            "notification center stopped"
        );
        self.queue.shown_count()
    }

    fn enqueue(&mut self, notification: Notification) {
        if let Some(dedup) = self.dedup.as_mut() {
            if dedup.is_repeat(&notification, Instant::now()) {
                debug!(id = %notification.id, "duplicate notification skipped");
                return;
            }
        }
        let transition = self.queue.push(notification);
        if self.pending_limit > 0 {
            let dropped = self.queue.retain_latest(self.pending_limit);
            if dropped > 0 {
                warn!(dropped, "pending notifications trimmed");
            }
        }
        self.apply(transition, DismissReason::Closed);
    }

    fn dismiss(&mut self, id: NotificationId, reason: DismissReason) {
        match self.queue.dismiss(id) {
            Some(transition) => self.apply(transition, reason),
            None => debug!(%id, ?reason, "dismissal ignored, notification not visible"),
        }
    }

    fn apply(&mut self, transition: Transition, reason: DismissReason) {
        if let Some(hidden) = transition.hidden.as_ref() {
            self.sink.hide(hidden, reason);
            self.deadline = None;
        }
        if let Some(shown) = transition.shown.as_ref() {
            self.sink.show(shown);
            self.deadline = Some((shown.id, Instant::now() + shown.duration));
        }
    }
}
