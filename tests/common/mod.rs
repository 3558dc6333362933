#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use vitrine::notify::{DismissReason, Notification, ToastSink};
use vitrine::types::NotificationKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Show {
        message: String,
        kind: NotificationKind,
        duration: Duration,
        at: Duration,
    },
    Hide {
        message: String,
        reason: DismissReason,
        at: Duration,
    },
}

/// Records what would be drawn, stamped with time since creation.
pub struct RecordingSink {
    origin: Instant,
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingSink {
    pub fn new() -> (Self, Arc<Mutex<Vec<Event>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Self {
            origin: Instant::now(),
            events: Arc::clone(&events),
        };
        (sink, events)
    }

    fn record(&self, event: Event) {
        self.events.lock().expect("sink lock").push(event);
    }
}

impl ToastSink for RecordingSink {
    fn show(&mut self, notification: &Notification) {
        self.record(Event::Show {
            message: notification.message.clone(),
            kind: notification.kind,
            duration: notification.duration,
            at: self.origin.elapsed(),
        });
    }

    fn hide(&mut self, notification: &Notification, reason: DismissReason) {
        self.record(Event::Hide {
            message: notification.message.clone(),
            reason,
            at: self.origin.elapsed(),
        });
    }
}

pub fn shown(events: &Arc<Mutex<Vec<Event>>>) -> Vec<(String, Duration)> {
    events
        .lock()
        .expect("sink lock")
        .iter()
        .filter_map(|event| match event {
            Event::Show { message, at, .. } => Some((message.clone(), *at)),
            Event::Hide { .. } => None,
        })
        .collect()
}

pub fn snapshot(events: &Arc<Mutex<Vec<Event>>>) -> Vec<Event> {
    events.lock().expect("sink lock").clone()
}
