use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::notification::NotificationKind;
use crate::reminder::Category;

/// Every state change in the tracker produces an Event.
/// Sinks receive them synchronously, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ReminderCreated {
        reminder_id: String,
        category: Category,
        duration_minutes: u32,
        at: DateTime<Utc>,
    },
    ReminderEdited {
        reminder_id: String,
        duration_minutes: u32,
        /// Events of the previous countdown, now superseded.
        notifications_removed: usize,
        at: DateTime<Utc>,
    },
    ReminderDeleted {
        reminder_id: String,
        notifications_removed: usize,
        at: DateTime<Utc>,
    },
    ReminderCompletionToggled {
        reminder_id: String,
        completed: bool,
        notifications_removed: usize,
        at: DateTime<Utc>,
    },
    NotificationRaised {
        notification_id: String,
        reminder_id: String,
        kind: NotificationKind,
        at: DateTime<Utc>,
    },
    NotificationsRead {
        count: usize,
        at: DateTime<Utc>,
    },
    NotificationDismissed {
        notification_id: String,
        at: DateTime<Utc>,
    },
    NotificationRemoved {
        notification_id: String,
        at: DateTime<Utc>,
    },
    NotificationsCleared {
        count: usize,
        at: DateTime<Utc>,
    },
    NotificationsPurged {
        count: usize,
        at: DateTime<Utc>,
    },
    /// A snapshot write failed; memory is still authoritative.
    PersistFailed {
        key: String,
        error: String,
        at: DateTime<Utc>,
    },
}

/// Observer hook for UX-event logging.
pub trait EventSink: Send {
    fn record(&self, event: &Event);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &Event) {}
}

/// Logs each event at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &Event) {
        match serde_json::to_string(event) {
            Ok(json) => tracing::debug!(target: "actinurse::events", "{json}"),
            Err(_) => tracing::debug!(target: "actinurse::events", "{event:?}"),
        }
    }
}

/// Keeps every event in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &Event) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}
