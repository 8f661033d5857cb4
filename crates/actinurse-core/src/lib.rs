//! # ActiNurse Core Library
//!
//! This library provides the reminder engine of the ActiNurse nursing-unit
//! tracker. It follows a CLI-first philosophy: every operation is available
//! through the standalone `actinurse` binary, which is a thin shell over
//! this crate.
//!
//! ## Architecture
//!
//! - **Reminder Store**: in-memory reminders, mirrored to local storage as a
//!   whole snapshot after every change
//! - **Countdown**: pure `(expires_at, now)` evaluation
//! - **Notifications**: a generator sweep that raises "expiring soon" and
//!   "expired" events once per reminder, and a housekeeper that purges old
//!   ones
//! - **Tracker**: the hosting component that wires the above to storage, a
//!   clock, an event sink and the platform notifier
//! - **Scheduler**: tokio timers driving the tracker's periodic sweeps
//!
//! ## Key Components
//!
//! - [`Tracker`]: reminder and notification operations
//! - [`Countdown`]: remaining-time evaluation
//! - [`Database`]: SQLite key-value snapshot storage
//! - [`Config`]: engine configuration

pub mod clock;
pub mod countdown;
pub mod error;
pub mod events;
pub mod notification;
pub mod platform;
pub mod reminder;
pub mod scheduler;
pub mod storage;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::Countdown;
pub use error::{ConfigError, CoreError, NotifyError, StorageError, ValidationError};
pub use events::{Event, EventSink, NullSink, RecordingSink, TracingSink};
pub use notification::{NotificationEvent, NotificationFeed, NotificationKind, SweepPolicy};
pub use platform::{Notifier, Presence};
pub use reminder::{Category, Reminder, ReminderFilter, ReminderStore, StatusFilter, Summary};
pub use scheduler::{RunReport, SchedulerConfig};
pub use storage::{Config, Database, KvStore, MemoryKv};
pub use tracker::Tracker;
