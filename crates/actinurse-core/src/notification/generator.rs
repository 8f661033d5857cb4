//! Notification generator.
//!
//! One sweep evaluates every active reminder against a single captured
//! `now` and proposes at most one new event per reminder:
//!
//! ```text
//! -grace < time_left <= 0           -> Expired  (unless already raised)
//! time_left > 0, minutes <= window  -> Expiring (unless any alert raised)
//! ```
//!
//! "Already raised" is read from [`Reminder::last_notified_kind`], so reading,
//! dismissing or clearing events never re-arms an alert. The sweep is pure;
//! appending, flagging, persisting and pop-ups are done by
//! [`crate::Tracker::sweep`].

use chrono::{DateTime, Duration, Utc};

use super::{NotificationEvent, NotificationKind};
use crate::reminder::{Reminder, ReminderStore};

/// Threshold windows of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPolicy {
    /// Reminders with this many whole minutes left or fewer are "expiring soon".
    pub expiring_window: Duration,
    /// How long after expiry an `Expired` event may still be raised.
    pub expired_grace: Duration,
}

impl Default for SweepPolicy {
    fn default() -> Self {
        Self {
            expiring_window: Duration::minutes(5),
            expired_grace: Duration::minutes(5),
        }
    }
}

/// Events that a sweep at `now` would raise.
pub fn sweep(
    reminders: &ReminderStore,
    policy: &SweepPolicy,
    now: DateTime<Utc>,
) -> Vec<NotificationEvent> {
    reminders
        .active()
        .filter_map(|r| evaluate(r, policy, now))
        .collect()
}

fn evaluate(reminder: &Reminder, policy: &SweepPolicy, now: DateTime<Utc>) -> Option<NotificationEvent> {
    let countdown = reminder.countdown(now);
    let time_left = countdown.time_left;
    let last = reminder.last_notified_kind;

    if time_left <= Duration::zero() {
        if time_left > -policy.expired_grace && last != Some(NotificationKind::Expired) {
            return Some(expired_event(reminder, now));
        }
        return None;
    }

    let minutes = countdown.minutes_remaining();
    if minutes <= policy.expiring_window.num_minutes() && last.is_none() {
        return Some(expiring_event(reminder, minutes, now));
    }
    None
}

fn expiring_event(reminder: &Reminder, minutes: i64, now: DateTime<Utc>) -> NotificationEvent {
    let message = match minutes {
        0 => format!("{} expires in less than a minute", reminder.name),
        1 => format!("{} expires in 1 minute", reminder.name),
        n => format!("{} expires in {n} minutes", reminder.name),
    };
    NotificationEvent::new(
        NotificationKind::Expiring,
        reminder.id.clone(),
        "Reminder expiring soon",
        message,
        now,
    )
}

fn expired_event(reminder: &Reminder, now: DateTime<Utc>) -> NotificationEvent {
    NotificationEvent::new(
        NotificationKind::Expired,
        reminder.id.clone(),
        "Reminder expired",
        format!("{} has expired ({})", reminder.name, reminder.category),
        now,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::Category;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
    }

    fn store_with(minutes: i64) -> (ReminderStore, Reminder) {
        let mut store = ReminderStore::default();
        let r = store.create("Antibiotics", Category::Medication, minutes, t0()).unwrap();
        (store, r)
    }

    #[test]
    fn nothing_while_far_from_expiry() {
        let (store, _) = store_with(60);
        assert!(sweep(&store, &SweepPolicy::default(), t0()).is_empty());
    }

    #[test]
    fn expiring_inside_window() {
        let (store, r) = store_with(60);
        let now = r.expires_at - Duration::minutes(4);
        let events = sweep(&store, &SweepPolicy::default(), now);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, NotificationKind::Expiring);
        assert_eq!(events[0].reminder_id, r.id);
        assert_eq!(events[0].timestamp, now);
        assert!(events[0].message.contains("4 minutes"));
    }

    #[test]
    fn expired_at_exact_instant() {
        let (store, r) = store_with(10);
        let events = sweep(&store, &SweepPolicy::default(), r.expires_at);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, NotificationKind::Expired);
    }

    #[test]
    fn expired_beyond_grace_is_ignored() {
        let (store, r) = store_with(10);
        let late = r.expires_at + Duration::minutes(5);
        assert!(sweep(&store, &SweepPolicy::default(), late).is_empty());
        let just_inside = r.expires_at + Duration::minutes(5) - Duration::seconds(1);
        assert_eq!(sweep(&store, &SweepPolicy::default(), just_inside).len(), 1);
    }

    #[test]
    fn completed_reminders_are_skipped() {
        let (mut store, r) = store_with(1);
        store.toggle_completed(&r.id);
        assert!(sweep(&store, &SweepPolicy::default(), r.expires_at).is_empty());
    }

    #[test]
    fn notified_flag_suppresses_duplicate() {
        let (mut store, r) = store_with(3);
        let policy = SweepPolicy::default();
        let first = sweep(&store, &policy, t0());
        assert_eq!(first.len(), 1);
        store.mark_notified(&r.id, NotificationKind::Expiring);

        assert!(sweep(&store, &policy, t0() + Duration::minutes(1)).is_empty());
        let expired = sweep(&store, &policy, r.expires_at);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].kind, NotificationKind::Expired);

        store.mark_notified(&r.id, NotificationKind::Expired);
        assert!(sweep(&store, &policy, r.expires_at + Duration::minutes(1)).is_empty());
    }

    #[test]
    fn custom_window_is_respected() {
        let (store, r) = store_with(60);
        let policy = SweepPolicy {
            expiring_window: Duration::minutes(15),
            ..SweepPolicy::default()
        };
        let now = r.expires_at - Duration::minutes(12);
        assert_eq!(sweep(&store, &policy, now).len(), 1);
    }
}
