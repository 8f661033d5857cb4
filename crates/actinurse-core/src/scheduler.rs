//! Timer-driven driver for a [`Tracker`].
//!
//! Two recurring timers share one task with the tracker, so no tick ever
//! overlaps another or a user command:
//!
//! ```text
//! sweep        every sweep_interval         (first tick after one interval)
//! housekeeping every housekeeping_interval  (first tick immediately)
//! ```
//!
//! Detection latency is up to one sweep interval; the polling is coarse on
//! purpose and matches the browser client.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};

use crate::storage::Config;
use crate::tracker::Tracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub sweep_interval: Duration,
    pub housekeeping_interval: Duration,
    /// Re-read storage before each tick to pick up changes by other writers.
    pub reload_before_tick: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(60),
            housekeeping_interval: Duration::from_secs(3600),
            reload_before_tick: true,
        }
    }
}

impl From<&Config> for SchedulerConfig {
    fn from(config: &Config) -> Self {
        Self {
            sweep_interval: config.sweep_interval(),
            housekeeping_interval: config.housekeeping_interval(),
            reload_before_tick: true,
        }
    }
}

/// What a scheduler run did before shutdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub sweeps: usize,
    pub notifications_raised: usize,
    pub housekeeping_runs: usize,
    pub notifications_purged: usize,
}

/// Drive `tracker` until `shutdown` resolves.
pub async fn run<F>(tracker: &mut Tracker, config: SchedulerConfig, shutdown: F) -> RunReport
where
    F: Future<Output = ()>,
{
    let mut sweep = interval_at(Instant::now() + config.sweep_interval, config.sweep_interval);
    sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut housekeeping = interval(config.housekeeping_interval);
    housekeeping.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut report = RunReport::default();
    tokio::pin!(shutdown);

    tracing::info!(
        "scheduler started: sweep every {}s, housekeeping every {}s",
        config.sweep_interval.as_secs(),
        config.housekeeping_interval.as_secs()
    );

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = housekeeping.tick() => {
                if config.reload_before_tick {
                    if let Err(e) = tracker.reload() {
                        tracing::debug!("housekeeping on in-memory state: {e}");
                    }
                }
                report.housekeeping_runs += 1;
                report.notifications_purged += tracker.housekeep();
            }
            _ = sweep.tick() => {
                if config.reload_before_tick {
                    if let Err(e) = tracker.reload() {
                        tracing::debug!("sweeping in-memory state: {e}");
                    }
                }
                report.sweeps += 1;
                report.notifications_raised += tracker.sweep().len();
            }
        }
    }

    tracing::info!(
        "scheduler stopped after {} sweep(s), {} notification(s) raised",
        report.sweeps,
        report.notifications_raised
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::reminder::Category;
    use crate::storage::MemoryKv;
    use chrono::{TimeZone, Utc};

    fn tracker() -> Tracker {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap());
        Tracker::open(MemoryKv::new()).with_clock(clock)
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_on_schedule_until_shutdown() {
        let mut tracker = tracker();
        tracker.create("Meds", Category::Medication, 3).unwrap();

        let report = run(
            &mut tracker,
            SchedulerConfig::default(),
            tokio::time::sleep(Duration::from_secs(125)),
        )
        .await;

        assert_eq!(report.sweeps, 2);
        assert_eq!(report.housekeeping_runs, 1);
        assert_eq!(report.notifications_raised, 1);
        assert_eq!(tracker.notifications().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_shutdown_runs_nothing() {
        let mut tracker = tracker();
        let report = run(&mut tracker, SchedulerConfig::default(), async {}).await;
        assert_eq!(report, RunReport::default());
    }

    #[test]
    fn config_maps_intervals() {
        let mut cfg = Config::default();
        cfg.sweep.interval_secs = 15;
        let sched = SchedulerConfig::from(&cfg);
        assert_eq!(sched.sweep_interval, Duration::from_secs(15));
        assert_eq!(sched.housekeeping_interval, Duration::from_secs(3600));
    }
}
