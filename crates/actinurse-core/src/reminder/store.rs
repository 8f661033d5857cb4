use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{validate, Category, Reminder, ReminderFilter, Summary};
use crate::error::ValidationError;
use crate::notification::NotificationKind;

/// Authoritative in-memory reminder collection.
///
/// Pure data: persistence and notification cascades live in
/// [`crate::Tracker`]. Insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderStore {
    reminders: Vec<Reminder>,
}

impl ReminderStore {
    pub fn new(reminders: Vec<Reminder>) -> Self {
        Self { reminders }
    }

    pub fn as_slice(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Reminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    /// Reminders still subject to countdown evaluation.
    pub fn active(&self) -> impl Iterator<Item = &Reminder> {
        self.reminders.iter().filter(|r| r.is_active())
    }

    pub fn create(
        &mut self,
        name: &str,
        category: Category,
        duration_minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<Reminder, ValidationError> {
        let (name, duration_minutes) = validate(name, duration_minutes)?;
        let mut reminder = Reminder {
            id: Uuid::new_v4().to_string(),
            name,
            category,
            duration_minutes,
            expires_at: now,
            created_at: now,
            completed: false,
            last_notified_kind: None,
        };
        reminder.rearm(now);
        self.reminders.push(reminder.clone());
        Ok(reminder)
    }

    /// Replace name, category and duration, restarting the countdown at `now`.
    pub fn edit(
        &mut self,
        id: &str,
        name: &str,
        category: Category,
        duration_minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<Reminder, ValidationError> {
        let (name, duration_minutes) = validate(name, duration_minutes)?;
        let reminder = self
            .reminders
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ValidationError::NotFound(id.to_string()))?;
        reminder.name = name;
        reminder.category = category;
        reminder.duration_minutes = duration_minutes;
        reminder.rearm(now);
        Ok(reminder.clone())
    }

    pub fn delete(&mut self, id: &str) -> Option<Reminder> {
        let pos = self.reminders.iter().position(|r| r.id == id)?;
        Some(self.reminders.remove(pos))
    }

    /// Flip the completed flag. Returns the new value.
    pub fn toggle_completed(&mut self, id: &str) -> Option<bool> {
        let reminder = self.reminders.iter_mut().find(|r| r.id == id)?;
        reminder.completed = !reminder.completed;
        Some(reminder.completed)
    }

    /// Record the alert just raised for `id`. Returns false for unknown ids.
    pub fn mark_notified(&mut self, id: &str, kind: NotificationKind) -> bool {
        match self.reminders.iter_mut().find(|r| r.id == id) {
            Some(reminder) => {
                reminder.last_notified_kind = Some(kind);
                true
            }
            None => false,
        }
    }

    pub fn list(&self, filter: &ReminderFilter) -> Vec<&Reminder> {
        self.reminders.iter().filter(|r| filter.matches(r)).collect()
    }

    /// Dashboard counts at `now`. The unread badge is filled in by the caller.
    pub fn summary(&self, now: DateTime<Utc>) -> Summary {
        let mut summary = Summary::default();
        for reminder in &self.reminders {
            summary.total += 1;
            *summary.by_category.entry(reminder.category).or_insert(0) += 1;
            if reminder.completed {
                summary.completed += 1;
            } else {
                summary.active += 1;
                if reminder.countdown(now).expired {
                    summary.expired += 1;
                }
            }
        }
        summary
    }
}
