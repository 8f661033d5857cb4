pub mod completions;
pub mod config;
pub mod notification;
pub mod reminder;
pub mod summary;
pub mod watch;

use actinurse_core::{Config, Database, Tracker, TracingSink};

/// Open the tracker over the user's database with the saved configuration.
pub fn open_tracker() -> actinurse_core::error::Result<Tracker> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    Ok(Tracker::open(db).with_config(&config).with_sink(TracingSink))
}
