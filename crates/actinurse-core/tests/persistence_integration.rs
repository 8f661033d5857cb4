//! Integration tests for snapshot persistence and notification retention.
//!
//! Trackers are opened over a shared store the way two sessions of the
//! same user would be, or reopened over an on-disk database.

use std::sync::Arc;

use actinurse_core::storage::{NOTIFICATIONS_KEY, REMINDERS_KEY};
use actinurse_core::{
    Category, Config, Database, Event, KvStore, ManualClock, MemoryKv, RecordingSink, Tracker,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 12, 22, 0, 0).unwrap()
}

#[test]
fn test_state_survives_reopen_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("actinurse.db");
    let clock = ManualClock::new(t0());

    let (reminder_id, notification_id) = {
        let mut tracker = Tracker::open(Database::open_at(&path).unwrap()).with_clock(clock.clone());
        let r = tracker.create("Night meds", Category::Medication, 2).unwrap();
        let raised = tracker.sweep();
        tracker.mark_read(&raised[0].id);
        (r.id, raised[0].id.clone())
    };

    let tracker = Tracker::open(Database::open_at(&path).unwrap()).with_clock(clock);
    assert_eq!(tracker.reminders().len(), 1);
    assert_eq!(tracker.reminders()[0].id, reminder_id);
    assert_eq!(tracker.notifications().len(), 1);
    assert_eq!(tracker.notifications()[0].id, notification_id);
    assert!(tracker.notifications()[0].read);
    assert_eq!(tracker.unread_count(), 0);
}

#[test]
fn test_snapshots_use_camel_case_fields() {
    let kv = Arc::new(MemoryKv::new());
    let mut tracker = Tracker::open(kv.clone()).with_clock(ManualClock::new(t0()));
    tracker.create("IV line", Category::Care, 1).unwrap();
    tracker.sweep();

    let reminders: serde_json::Value =
        serde_json::from_str(&kv.get(REMINDERS_KEY).unwrap().unwrap()).unwrap();
    let first = &reminders[0];
    assert_eq!(first["name"], "IV line");
    assert_eq!(first["category"], "care");
    assert_eq!(first["durationMinutes"], 1);
    assert!(first["expiresAt"].is_string());
    assert!(first["createdAt"].is_string());
    assert_eq!(first["completed"], false);
    assert_eq!(first["lastNotifiedKind"], "expiring");

    let notifications: serde_json::Value =
        serde_json::from_str(&kv.get(NOTIFICATIONS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(notifications[0]["kind"], "expiring");
    assert_eq!(notifications[0]["reminderId"], first["id"]);
    assert_eq!(notifications[0]["read"], false);
}

#[test]
fn test_cleared_alert_stays_quiet_after_reopen() {
    let kv = Arc::new(MemoryKv::new());
    let clock = ManualClock::new(t0());
    let mut tracker = Tracker::open(kv.clone()).with_clock(clock.clone());
    tracker.create("Transfusion check", Category::Care, 3).unwrap();
    tracker.sweep();
    tracker.clear_notifications();

    let mut reopened = Tracker::open(kv).with_clock(clock.clone());
    clock.advance(Duration::minutes(1));
    assert!(reopened.sweep().is_empty());
}

#[test]
fn test_snapshot_without_notified_flag_still_loads() {
    let kv = Arc::new(MemoryKv::new());
    kv.set(
        REMINDERS_KEY,
        r#"[{"id":"r1","name":"Legacy","category":"exam","durationMinutes":5,
            "expiresAt":"2026-05-12T22:05:00Z","createdAt":"2026-05-12T22:00:00Z"}]"#,
    )
    .unwrap();

    let mut tracker = Tracker::open(kv).with_clock(ManualClock::new(t0()));
    assert_eq!(tracker.reminders()[0].last_notified_kind, None);
    assert!(!tracker.reminders()[0].completed);
    assert_eq!(tracker.sweep().len(), 1);
}

#[test]
fn test_corrupt_snapshot_starts_empty() {
    let kv = Arc::new(MemoryKv::new());
    kv.set(REMINDERS_KEY, "{not json").unwrap();

    let mut tracker = Tracker::open(kv.clone());
    assert!(tracker.reminders().is_empty());
    assert!(tracker.reload().is_err());

    // The next write replaces the unreadable blob.
    tracker.create("Fresh start", Category::Other, 5).unwrap();
    assert_eq!(Tracker::open(kv).reminders().len(), 1);
}

#[test]
fn test_last_writer_wins_between_sessions() {
    let kv = Arc::new(MemoryKv::new());
    let mut ward = Tracker::open(kv.clone());
    let mut desk = Tracker::open(kv.clone());

    ward.create("Ward round", Category::Exam, 30).unwrap();
    desk.create("Desk task", Category::Other, 30).unwrap();

    let names: Vec<_> = Tracker::open(kv.clone())
        .reminders()
        .iter()
        .map(|r| r.name.clone())
        .collect();
    assert_eq!(names, vec!["Desk task"]);

    // Reloading first picks up the other session's write.
    ward.reload().unwrap();
    assert_eq!(ward.reminders().len(), 1);
    ward.create("Ward round", Category::Exam, 30).unwrap();
    assert_eq!(Tracker::open(kv).reminders().len(), 2);
}

#[test]
fn test_write_failure_keeps_memory_authoritative() {
    let kv = Arc::new(MemoryKv::new());
    let sink = RecordingSink::new();
    let clock = ManualClock::new(t0());
    let mut tracker = Tracker::open(kv.clone())
        .with_clock(clock.clone())
        .with_sink(sink.clone());

    kv.fail_writes(true);
    let r = tracker.create("Catheter", Category::Care, 3).unwrap();
    assert_eq!(tracker.sweep().len(), 1);
    assert!(tracker.has_unsaved_changes());

    let failures: Vec<_> = sink
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Event::PersistFailed { key, .. } => Some(key),
            _ => None,
        })
        .collect();
    assert!(failures.contains(&REMINDERS_KEY.to_string()));
    assert!(failures.contains(&NOTIFICATIONS_KEY.to_string()));

    kv.fail_writes(false);
    tracker.flush();
    assert!(!tracker.has_unsaved_changes());

    let reopened = Tracker::open(kv);
    assert_eq!(reopened.reminders()[0].id, r.id);
    assert_eq!(reopened.notifications().len(), 1);
}

#[test]
fn test_housekeeping_respects_retention() {
    let kv = Arc::new(MemoryKv::new());
    let clock = ManualClock::new(t0());
    let mut tracker = Tracker::open(kv.clone()).with_clock(clock.clone());
    tracker.create("Early", Category::Medication, 1).unwrap();
    tracker.sweep();

    clock.advance(Duration::hours(2));
    tracker.create("Later", Category::Medication, 1).unwrap();
    tracker.sweep();
    assert_eq!(tracker.notifications().len(), 2);

    clock.set(t0() + Duration::hours(23));
    assert_eq!(tracker.housekeep(), 0);

    clock.set(t0() + Duration::hours(25));
    assert_eq!(tracker.housekeep(), 1);
    assert_eq!(tracker.notifications().len(), 1);
    assert_eq!(Tracker::open(kv).notifications().len(), 1);
}

#[test]
fn test_retention_follows_config() {
    let clock = ManualClock::new(t0());
    let mut config = Config::default();
    config.housekeeping.retention_hours = 1;
    let mut tracker = Tracker::open(MemoryKv::new())
        .with_clock(clock.clone())
        .with_config(&config);
    tracker.create("Short", Category::Care, 1).unwrap();
    tracker.sweep();

    clock.advance(Duration::minutes(90));
    assert_eq!(tracker.housekeep(), 1);
    assert!(tracker.notifications().is_empty());
}
