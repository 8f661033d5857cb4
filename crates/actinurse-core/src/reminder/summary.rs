use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Category;

/// Dashboard counts for the progress panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    /// Active reminders whose countdown has run out.
    pub expired: usize,
    pub by_category: BTreeMap<Category, usize>,
    /// Unread notification badge.
    pub unread_notifications: usize,
}

impl Summary {
    /// Completed share of all reminders, 0.0 .. 100.0.
    pub fn completion_pct(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }
}
