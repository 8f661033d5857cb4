//! Retention sweep for notification events.

use chrono::{DateTime, Duration, Utc};

use super::NotificationFeed;

pub const DEFAULT_RETENTION_HOURS: i64 = 24;

/// Drop events stamped more than `retention` before `now`.
/// Returns how many were removed.
pub fn purge(feed: &mut NotificationFeed, retention: Duration, now: DateTime<Utc>) -> usize {
    feed.retain_since(now - retention)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{NotificationEvent, NotificationKind};
    use chrono::TimeZone;

    #[test]
    fn keeps_recent_and_drops_stale() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        let mut feed = NotificationFeed::new(vec![
            NotificationEvent::new(NotificationKind::Expired, "old", "t", "m", now - Duration::hours(25)),
            NotificationEvent::new(NotificationKind::Expired, "recent", "t", "m", now - Duration::hours(23)),
        ]);
        let removed = purge(&mut feed, Duration::hours(DEFAULT_RETENTION_HOURS), now);
        assert_eq!(removed, 1);
        assert_eq!(feed.as_slice()[0].reminder_id, "recent");
    }
}
