//! Reminder management commands for CLI.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::Serialize;

use super::open_tracker;
use actinurse_core::reminder::parse_duration_minutes;
use actinurse_core::{Category, Reminder, ReminderFilter, StatusFilter};

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Create a reminder
    Add {
        /// Reminder name
        name: String,
        /// Category: medication, exam, care or other
        #[arg(long, default_value = "other")]
        category: Category,
        /// Countdown length in minutes
        #[arg(long, allow_hyphen_values = true)]
        minutes: String,
    },
    /// Change a reminder and restart its countdown
    Edit {
        /// Reminder ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New category
        #[arg(long)]
        category: Option<Category>,
        /// New countdown length in minutes
        #[arg(long, allow_hyphen_values = true)]
        minutes: Option<String>,
    },
    /// Delete a reminder and its notifications
    Delete {
        /// Reminder ID
        id: String,
    },
    /// Mark a reminder completed, or active again
    Toggle {
        /// Reminder ID
        id: String,
    },
    /// Show one reminder with its countdown
    Show {
        /// Reminder ID
        id: String,
    },
    /// List reminders
    List {
        /// Case-insensitive name search
        #[arg(long, default_value = "")]
        search: String,
        /// Status filter: all, active or completed
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// A reminder together with its countdown at the time of the command.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReminderView<'a> {
    #[serde(flatten)]
    reminder: &'a Reminder,
    expired: bool,
    remaining: String,
}

impl<'a> ReminderView<'a> {
    fn new(reminder: &'a Reminder, now: DateTime<Utc>) -> Self {
        let countdown = reminder.countdown(now);
        Self {
            reminder,
            expired: countdown.expired,
            remaining: countdown.label(),
        }
    }
}

pub fn run(action: ReminderAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = open_tracker()?;

    match action {
        ReminderAction::Add {
            name,
            category,
            minutes,
        } => {
            let minutes = parse_duration_minutes(&minutes)?;
            let reminder = tracker.create(&name, category, minutes)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&ReminderView::new(&reminder, tracker.now()))?
            );
        }
        ReminderAction::Edit {
            id,
            name,
            category,
            minutes,
        } => {
            let current = tracker
                .get(&id)
                .cloned()
                .ok_or_else(|| format!("reminder not found: {id}"))?;
            let minutes = match minutes {
                Some(m) => parse_duration_minutes(&m)?,
                None => i64::from(current.duration_minutes),
            };
            let reminder = tracker.edit(
                &id,
                name.as_deref().unwrap_or(&current.name),
                category.unwrap_or(current.category),
                minutes,
            )?;
            println!(
                "{}",
                serde_json::to_string_pretty(&ReminderView::new(&reminder, tracker.now()))?
            );
        }
        ReminderAction::Delete { id } => {
            let reminder = tracker.delete(&id)?;
            println!("deleted: {} ({})", reminder.name, reminder.id);
        }
        ReminderAction::Toggle { id } => {
            let completed = tracker.toggle_completed(&id)?;
            println!("{}", if completed { "completed" } else { "active" });
        }
        ReminderAction::Show { id } => {
            let reminder = tracker
                .get(&id)
                .ok_or_else(|| format!("reminder not found: {id}"))?;
            println!(
                "{}",
                serde_json::to_string_pretty(&ReminderView::new(reminder, tracker.now()))?
            );
        }
        ReminderAction::List {
            search,
            status,
            json,
        } => {
            let now = tracker.now();
            let filter = ReminderFilter::new(search, status);
            let reminders = tracker.list(&filter);
            if json {
                let views: Vec<_> = reminders.iter().map(|r| ReminderView::new(r, now)).collect();
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else if reminders.is_empty() {
                println!("no reminders");
            } else {
                for r in reminders {
                    let mark = if r.completed { "x" } else { " " };
                    println!(
                        "[{mark}] {:<36}  {:<10}  {:>8}  {}",
                        r.id,
                        r.category.as_str(),
                        r.countdown(now).label(),
                        r.name
                    );
                }
            }
        }
    }
    Ok(())
}
