//! Long-running sweep loop, the terminal stand-in for an open dashboard.

use actinurse_core::platform::Background;
use actinurse_core::scheduler::{self, SchedulerConfig};
use actinurse_core::Config;

use super::open_tracker;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut tracker = open_tracker()?
        .with_notifier(notifier())
        .with_presence(Background);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let report = runtime.block_on(scheduler::run(
        &mut tracker,
        SchedulerConfig::from(&config),
        async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("could not listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
        },
    ));

    tracker.flush();
    if tracker.has_unsaved_changes() {
        return Err("some changes could not be saved".into());
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(feature = "desktop-notify")]
fn notifier() -> actinurse_core::platform::DesktopNotifier {
    actinurse_core::platform::DesktopNotifier::new("ActiNurse")
}

#[cfg(not(feature = "desktop-notify"))]
fn notifier() -> actinurse_core::platform::LogNotifier {
    actinurse_core::platform::LogNotifier
}
