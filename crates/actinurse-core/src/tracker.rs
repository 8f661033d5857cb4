//! The reminder tracker.
//!
//! Owns the reminder store and the notification feed, mirrors both to a
//! [`KvStore`] as whole snapshots after every mutation, and reports each
//! state change to an [`EventSink`].
//!
//! Storage failures never surface to callers: memory stays authoritative,
//! the failed snapshot is marked dirty, and the next mutation writes it
//! again.

use chrono::{DateTime, Duration, Utc};

use crate::clock::{Clock, SystemClock};
use crate::countdown::Countdown;
use crate::error::{StorageError, ValidationError};
use crate::events::{Event, EventSink, NullSink};
use crate::notification::{generator, housekeeper, NotificationEvent, NotificationFeed, SweepPolicy};
use crate::platform::{Background, LogNotifier, Notifier, Presence};
use crate::reminder::{Category, Reminder, ReminderFilter, ReminderStore, Summary};
use crate::storage::{snapshot, Config, KvStore, NOTIFICATIONS_KEY, REMINDERS_KEY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Dirty {
    reminders: bool,
    notifications: bool,
}

pub struct Tracker {
    reminders: ReminderStore,
    notifications: NotificationFeed,
    kv: Box<dyn KvStore>,
    clock: Box<dyn Clock>,
    sink: Box<dyn EventSink>,
    notifier: Box<dyn Notifier>,
    presence: Box<dyn Presence>,
    policy: SweepPolicy,
    retention: Duration,
    popups: bool,
    dirty: Dirty,
}

impl Tracker {
    /// Open a tracker over `kv`, loading both snapshots.
    ///
    /// A snapshot that cannot be decoded is logged and treated as empty.
    pub fn open(kv: impl KvStore + 'static) -> Self {
        let mut tracker = Self {
            reminders: ReminderStore::default(),
            notifications: NotificationFeed::default(),
            kv: Box::new(kv),
            clock: Box::new(SystemClock),
            sink: Box::new(NullSink),
            notifier: Box::new(LogNotifier),
            presence: Box::new(Background),
            policy: SweepPolicy::default(),
            retention: Duration::hours(housekeeper::DEFAULT_RETENTION_HOURS),
            popups: true,
            dirty: Dirty::default(),
        };
        if let Err(e) = tracker.reload() {
            tracing::warn!("starting with partially loaded state: {e}");
        }
        tracker
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn with_presence(mut self, presence: impl Presence + 'static) -> Self {
        self.presence = Box::new(presence);
        self
    }

    pub fn with_config(mut self, config: &Config) -> Self {
        self.policy = config.sweep_policy();
        self.retention = config.retention();
        self.popups = config.notifications.popups;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn reminders(&self) -> &[Reminder] {
        self.reminders.as_slice()
    }

    pub fn notifications(&self) -> &[NotificationEvent] {
        self.notifications.as_slice()
    }

    pub fn get(&self, id: &str) -> Option<&Reminder> {
        self.reminders.get(id)
    }

    pub fn list(&self, filter: &ReminderFilter) -> Vec<&Reminder> {
        self.reminders.list(filter)
    }

    pub fn countdown(&self, id: &str) -> Option<Countdown> {
        let now = self.clock.now();
        self.reminders.get(id).map(|r| r.countdown(now))
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.unread_count()
    }

    pub fn summary(&self) -> Summary {
        let mut summary = self.reminders.summary(self.clock.now());
        summary.unread_notifications = self.notifications.unread_count();
        summary
    }

    /// Whether some snapshot could not be written yet.
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty != Dirty::default()
    }

    // ── Reminder commands ────────────────────────────────────────────

    pub fn create(
        &mut self,
        name: &str,
        category: Category,
        duration_minutes: i64,
    ) -> Result<Reminder, ValidationError> {
        let now = self.clock.now();
        let reminder = self.reminders.create(name, category, duration_minutes, now)?;
        self.dirty.reminders = true;
        self.flush();
        self.emit(Event::ReminderCreated {
            reminder_id: reminder.id.clone(),
            category,
            duration_minutes: reminder.duration_minutes,
            at: now,
        });
        Ok(reminder)
    }

    /// Replace a reminder's fields and restart its countdown from now.
    ///
    /// Notifications raised for the previous countdown are removed.
    pub fn edit(
        &mut self,
        id: &str,
        name: &str,
        category: Category,
        duration_minutes: i64,
    ) -> Result<Reminder, ValidationError> {
        let now = self.clock.now();
        let reminder = self.reminders.edit(id, name, category, duration_minutes, now)?;
        let removed = self.notifications.remove_for_reminder(id);
        self.dirty.reminders = true;
        self.dirty.notifications |= removed > 0;
        self.flush();
        self.emit(Event::ReminderEdited {
            reminder_id: reminder.id.clone(),
            duration_minutes: reminder.duration_minutes,
            notifications_removed: removed,
            at: now,
        });
        Ok(reminder)
    }

    pub fn delete(&mut self, id: &str) -> Result<Reminder, ValidationError> {
        let reminder = self
            .reminders
            .delete(id)
            .ok_or_else(|| ValidationError::NotFound(id.to_string()))?;
        let removed = self.notifications.remove_for_reminder(id);
        self.dirty.reminders = true;
        self.dirty.notifications = true;
        self.flush();
        self.emit(Event::ReminderDeleted {
            reminder_id: reminder.id.clone(),
            notifications_removed: removed,
            at: self.clock.now(),
        });
        Ok(reminder)
    }

    /// Flip the completed flag, dropping the reminder's pending alerts.
    /// Returns the new flag.
    pub fn toggle_completed(&mut self, id: &str) -> Result<bool, ValidationError> {
        let completed = self
            .reminders
            .toggle_completed(id)
            .ok_or_else(|| ValidationError::NotFound(id.to_string()))?;
        let removed = self.notifications.remove_for_reminder(id);
        self.dirty.reminders = true;
        self.dirty.notifications |= removed > 0;
        self.flush();
        self.emit(Event::ReminderCompletionToggled {
            reminder_id: id.to_string(),
            completed,
            notifications_removed: removed,
            at: self.clock.now(),
        });
        Ok(completed)
    }

    // ── Notification commands ────────────────────────────────────────

    /// Run one generator sweep. Returns the newly raised events.
    pub fn sweep(&mut self) -> Vec<NotificationEvent> {
        let now = self.clock.now();
        let batch = generator::sweep(&self.reminders, &self.policy, now);
        let raised = self.notifications.append(batch);
        if raised.is_empty() {
            tracing::debug!("sweep at {now}: nothing new");
            return raised;
        }

        tracing::info!("sweep raised {} notification(s)", raised.len());
        for event in &raised {
            self.reminders.mark_notified(&event.reminder_id, event.kind);
        }
        self.dirty.reminders = true;
        self.dirty.notifications = true;
        self.flush();

        for event in &raised {
            tracing::debug!(
                reminder = %event.reminder_id,
                kind = ?event.kind,
                "notification raised"
            );
            self.emit(Event::NotificationRaised {
                notification_id: event.id.clone(),
                reminder_id: event.reminder_id.clone(),
                kind: event.kind,
                at: now,
            });
            self.popup(event);
        }
        raised
    }

    /// Purge events past the retention window. Returns how many were dropped.
    pub fn housekeep(&mut self) -> usize {
        let now = self.clock.now();
        let removed = housekeeper::purge(&mut self.notifications, self.retention, now);
        if removed > 0 {
            tracing::info!("purged {removed} notification(s) older than {}h", self.retention.num_hours());
            self.dirty.notifications = true;
            self.flush();
            self.emit(Event::NotificationsPurged { count: removed, at: now });
        }
        removed
    }

    pub fn mark_read(&mut self, id: &str) -> bool {
        let changed = self.notifications.mark_read(id);
        if changed {
            self.dirty.notifications = true;
            self.flush();
            self.emit(Event::NotificationsRead { count: 1, at: self.clock.now() });
        }
        changed
    }

    /// Mark everything read, as opening the notification panel does.
    pub fn mark_all_read(&mut self) -> usize {
        let changed = self.notifications.mark_all_read();
        if changed > 0 {
            self.dirty.notifications = true;
            self.flush();
            self.emit(Event::NotificationsRead { count: changed, at: self.clock.now() });
        }
        changed
    }

    /// Acknowledge one event. It stays in the feed, marked read.
    pub fn dismiss(&mut self, id: &str) -> Option<NotificationEvent> {
        let event = self.notifications.dismiss(id)?;
        self.dirty.notifications = true;
        self.flush();
        self.emit(Event::NotificationDismissed {
            notification_id: event.id.clone(),
            at: self.clock.now(),
        });
        Some(event)
    }

    /// Delete one event. The reminder is not alerted again for it.
    pub fn remove_notification(&mut self, id: &str) -> Option<NotificationEvent> {
        let event = self.notifications.remove(id)?;
        self.dirty.notifications = true;
        self.flush();
        self.emit(Event::NotificationRemoved {
            notification_id: event.id.clone(),
            at: self.clock.now(),
        });
        Some(event)
    }

    pub fn clear_notifications(&mut self) -> usize {
        let count = self.notifications.clear();
        if count > 0 {
            self.dirty.notifications = true;
            self.flush();
            self.emit(Event::NotificationsCleared { count, at: self.clock.now() });
        }
        count
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Re-read both snapshots from storage.
    ///
    /// A collection with unsaved changes keeps its in-memory state. On a
    /// read or decode error the current state is kept and the error returned.
    pub fn reload(&mut self) -> Result<(), StorageError> {
        let mut first_error = None;

        if !self.dirty.reminders {
            match snapshot::load(self.kv.as_ref(), REMINDERS_KEY) {
                Ok(items) => self.reminders = ReminderStore::new(items),
                Err(e) => {
                    tracing::warn!("could not load reminders: {e}");
                    first_error.get_or_insert(e);
                }
            }
        }
        if !self.dirty.notifications {
            match snapshot::load(self.kv.as_ref(), NOTIFICATIONS_KEY) {
                Ok(items) => self.notifications = NotificationFeed::new(items),
                Err(e) => {
                    tracing::warn!("could not load notifications: {e}");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Write every dirty snapshot now.
    pub fn flush(&mut self) {
        if self.dirty.reminders {
            let result = snapshot::save(self.kv.as_ref(), REMINDERS_KEY, self.reminders.as_slice());
            self.dirty.reminders = self.settle(REMINDERS_KEY, result);
        }
        if self.dirty.notifications {
            let result =
                snapshot::save(self.kv.as_ref(), NOTIFICATIONS_KEY, self.notifications.as_slice());
            self.dirty.notifications = self.settle(NOTIFICATIONS_KEY, result);
        }
    }

    /// Returns whether the snapshot is still dirty.
    fn settle(&self, key: &str, result: Result<(), StorageError>) -> bool {
        match result {
            Ok(()) => false,
            Err(e) => {
                tracing::warn!("could not persist '{key}', will retry on next change: {e}");
                self.emit(Event::PersistFailed {
                    key: key.to_string(),
                    error: e.to_string(),
                    at: self.clock.now(),
                });
                true
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn emit(&self, event: Event) {
        self.sink.record(&event);
    }

    fn popup(&self, event: &NotificationEvent) {
        if !self.popups || self.presence.is_foreground() || !self.notifier.is_permitted() {
            return;
        }
        if let Err(e) = self.notifier.show(&event.title, &event.message) {
            tracing::warn!("pop-up for reminder {} not shown: {e}", event.reminder_id);
        }
    }
}
