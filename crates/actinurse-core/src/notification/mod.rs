//! Notification events raised by reminder countdowns.
//!
//! - [`generator`]: periodic sweep that raises `Expiring`/`Expired` events
//! - [`housekeeper`]: periodic purge of events past the retention window
//! - [`NotificationFeed`]: the event collection with its read flags

pub mod generator;
pub mod housekeeper;

pub use generator::SweepPolicy;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Expiring,
    Expired,
}

/// A generated alert tied to a reminder crossing a threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub id: String,
    pub kind: NotificationKind,
    pub reminder_id: String,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl NotificationEvent {
    pub fn new(
        kind: NotificationKind,
        reminder_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            reminder_id: reminder_id.into(),
            title: title.into(),
            message: message.into(),
            timestamp,
            read: false,
        }
    }
}

/// Notification collection, newest last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationFeed {
    events: Vec<NotificationEvent>,
}

impl NotificationFeed {
    pub fn new(events: Vec<NotificationEvent>) -> Self {
        Self { events }
    }

    pub fn as_slice(&self) -> &[NotificationEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&NotificationEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Whether a `(kind, reminder_id)` pair is already present.
    pub fn contains(&self, kind: NotificationKind, reminder_id: &str) -> bool {
        self.events
            .iter()
            .any(|e| e.kind == kind && e.reminder_id == reminder_id)
    }

    /// Append a batch, skipping pairs that are already present.
    /// Returns the events actually inserted.
    pub fn append(&mut self, batch: Vec<NotificationEvent>) -> Vec<NotificationEvent> {
        let mut inserted = Vec::with_capacity(batch.len());
        for event in batch {
            if self.contains(event.kind, &event.reminder_id) {
                continue;
            }
            self.events.push(event.clone());
            inserted.push(event);
        }
        inserted
    }

    pub fn unread_count(&self) -> usize {
        self.events.iter().filter(|e| !e.read).count()
    }

    /// Returns false if the id is unknown or already read.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.events.iter_mut().find(|e| e.id == id) {
            Some(event) if !event.read => {
                event.read = true;
                true
            }
            _ => false,
        }
    }

    /// Returns how many events changed.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for event in self.events.iter_mut().filter(|e| !e.read) {
            event.read = true;
            changed += 1;
        }
        changed
    }

    /// Acknowledge one event: it stays in the feed, marked read.
    pub fn dismiss(&mut self, id: &str) -> Option<NotificationEvent> {
        let event = self.events.iter_mut().find(|e| e.id == id)?;
        event.read = true;
        Some(event.clone())
    }

    /// Delete one event.
    pub fn remove(&mut self, id: &str) -> Option<NotificationEvent> {
        let pos = self.events.iter().position(|e| e.id == id)?;
        Some(self.events.remove(pos))
    }

    pub fn clear(&mut self) -> usize {
        let n = self.events.len();
        self.events.clear();
        n
    }

    /// Cascade for a completed or deleted reminder.
    pub fn remove_for_reminder(&mut self, reminder_id: &str) -> usize {
        let before = self.events.len();
        self.events.retain(|e| e.reminder_id != reminder_id);
        before - self.events.len()
    }

    /// Keep only events stamped at or after `cutoff`.
    pub fn retain_since(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.events.len();
        self.events.retain(|e| e.timestamp >= cutoff);
        before - self.events.len()
    }
}
