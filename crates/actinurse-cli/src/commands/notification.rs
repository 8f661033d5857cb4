use clap::Subcommand;

use super::open_tracker;

#[derive(Subcommand)]
pub enum NotificationAction {
    /// List notifications, newest first
    List {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Mark one notification read, or all of them
    Read {
        /// Notification ID
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        id: Option<String>,
        /// Mark every notification read
        #[arg(long)]
        all: bool,
    },
    /// Dismiss one notification, keeping it as read
    Dismiss {
        /// Notification ID
        id: String,
    },
    /// Delete one notification
    Remove {
        /// Notification ID
        id: String,
    },
    /// Remove all notifications
    Clear,
    /// Run one generator sweep now
    Sweep,
    /// Drop notifications past the retention window now
    Purge,
}

pub fn run(action: NotificationAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = open_tracker()?;

    match action {
        NotificationAction::List { unread, json } => {
            let events: Vec<_> = tracker
                .notifications()
                .iter()
                .rev()
                .filter(|n| !unread || !n.read)
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else if events.is_empty() {
                println!("no notifications");
            } else {
                for n in events {
                    let mark = if n.read { " " } else { "*" };
                    println!(
                        "{mark} {}  {}  {}: {}",
                        n.id,
                        n.timestamp.format("%Y-%m-%d %H:%M"),
                        n.title,
                        n.message
                    );
                }
            }
        }
        NotificationAction::Read { id: Some(id), .. } => {
            if tracker.notifications().iter().all(|n| n.id != id) {
                return Err(format!("notification not found: {id}").into());
            }
            tracker.mark_read(&id);
            println!("ok");
        }
        NotificationAction::Read { id: None, .. } => {
            let count = tracker.mark_all_read();
            println!("marked {count} notification(s) read");
        }
        NotificationAction::Dismiss { id } => {
            tracker
                .dismiss(&id)
                .ok_or_else(|| format!("notification not found: {id}"))?;
            println!("ok");
        }
        NotificationAction::Remove { id } => {
            tracker
                .remove_notification(&id)
                .ok_or_else(|| format!("notification not found: {id}"))?;
            println!("ok");
        }
        NotificationAction::Clear => {
            let count = tracker.clear_notifications();
            println!("cleared {count} notification(s)");
        }
        NotificationAction::Sweep => {
            let raised = tracker.sweep();
            println!("{}", serde_json::to_string_pretty(&raised)?);
        }
        NotificationAction::Purge => {
            let count = tracker.housekeep();
            println!("purged {count} notification(s)");
        }
    }
    Ok(())
}
