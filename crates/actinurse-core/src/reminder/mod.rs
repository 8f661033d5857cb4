//! Reminder records and the in-memory reminder store.
//!
//! A reminder is a countdown tied to a nursing task. Its expiry is always
//! derived from `duration_minutes` at save time; nothing edits `expires_at`
//! directly.

mod store;
mod summary;

pub use store::ReminderStore;
pub use summary::Summary;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::countdown::Countdown;
use crate::error::ValidationError;
use crate::notification::NotificationKind;

/// Kind of nursing act a reminder belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Medication,
    Exam,
    Care,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Medication,
        Category::Exam,
        Category::Care,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Medication => "medication",
            Category::Exam => "exam",
            Category::Care => "care",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "medication" => Ok(Category::Medication),
            "exam" => Ok(Category::Exam),
            "care" => Ok(Category::Care),
            "other" => Ok(Category::Other),
            other => Err(format!(
                "unknown category '{other}', expected one of: medication, exam, care, other"
            )),
        }
    }
}

/// A user-defined countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub duration_minutes: u32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    /// Last alert raised for the current countdown. Cleared on edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_notified_kind: Option<NotificationKind>,
}

impl Reminder {
    /// Countdown state at `now`.
    pub fn countdown(&self, now: DateTime<Utc>) -> Countdown {
        Countdown::evaluate(self.expires_at, now)
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }

    /// Restart the countdown from `now`.
    fn rearm(&mut self, now: DateTime<Utc>) {
        self.expires_at = now + Duration::minutes(i64::from(self.duration_minutes));
        self.last_notified_kind = None;
    }
}

/// Status predicate for [`ReminderFilter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(format!(
                "unknown status '{other}', expected one of: all, active, completed"
            )),
        }
    }
}

/// Search and status filter used by the reminder list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderFilter {
    pub search_term: String,
    pub status: StatusFilter,
}

impl ReminderFilter {
    pub fn new(search_term: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search_term: search_term.into(),
            status,
        }
    }

    pub fn matches(&self, reminder: &Reminder) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Active => !reminder.completed,
            StatusFilter::Completed => reminder.completed,
        };
        if !status_ok {
            return false;
        }
        let term = self.search_term.trim();
        term.is_empty()
            || reminder
                .name
                .to_lowercase()
                .contains(&term.to_lowercase())
    }
}

/// Check reminder input, returning the trimmed name and the duration.
pub fn validate(name: &str, duration_minutes: i64) -> Result<(String, u32), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if duration_minutes <= 0 {
        return Err(ValidationError::NonPositiveDuration(duration_minutes));
    }
    let minutes = u32::try_from(duration_minutes)
        .map_err(|_| ValidationError::NotANumber(duration_minutes.to_string()))?;
    Ok((name.to_string(), minutes))
}

/// Parse a duration typed by the user.
pub fn parse_duration_minutes(input: &str) -> Result<i64, ValidationError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::NotANumber(input.to_string()))
}
