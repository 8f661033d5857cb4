//! Host platform hooks: system pop-ups and foreground focus.
//!
//! Pop-ups are best effort. A notifier without permission is skipped, and a
//! failing one is logged by the caller; neither aborts a sweep.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::NotifyError;

/// System-level pop-up alerts.
pub trait Notifier: Send {
    /// Whether the host granted permission to show pop-ups.
    fn is_permitted(&self) -> bool {
        true
    }

    fn show(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Whether the hosting view currently has the user's focus.
pub trait Presence: Send {
    fn is_foreground(&self) -> bool;
}

/// Writes pop-ups to the log instead of the desktop.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(target: "actinurse::popup", "{title}: {body}");
        Ok(())
    }
}

/// Host without notification permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedNotifier;

impl Notifier for DeniedNotifier {
    fn is_permitted(&self) -> bool {
        false
    }

    fn show(&self, _title: &str, _body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::PermissionDenied)
    }
}

/// Keeps `(title, body)` pairs in memory. Clones share the buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    shown: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        self.shown
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((title.to_string(), body.to_string()));
        Ok(())
    }
}

/// Desktop pop-ups through libnotify.
#[cfg(feature = "desktop-notify")]
#[derive(Debug)]
pub struct DesktopNotifier {
    ready: bool,
}

#[cfg(feature = "desktop-notify")]
impl DesktopNotifier {
    pub fn new(app_name: &str) -> Self {
        let ready = match libnotify::init(app_name) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("libnotify unavailable, pop-ups disabled: {e}");
                false
            }
        };
        Self { ready }
    }
}

#[cfg(feature = "desktop-notify")]
impl Notifier for DesktopNotifier {
    fn is_permitted(&self) -> bool {
        self.ready
    }

    fn show(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let notification = libnotify::Notification::new(title, Some(body), None);
        notification
            .show()
            .map_err(|e| NotifyError::Backend(e.to_string()))
    }
}

#[cfg(feature = "desktop-notify")]
impl Drop for DesktopNotifier {
    fn drop(&mut self) {
        if self.ready {
            libnotify::uninit();
        }
    }
}

/// Presence toggled by the host. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct FocusFlag {
    foreground: Arc<AtomicBool>,
}

impl FocusFlag {
    pub fn new(foreground: bool) -> Self {
        Self {
            foreground: Arc::new(AtomicBool::new(foreground)),
        }
    }

    pub fn set(&self, foreground: bool) {
        self.foreground.store(foreground, Ordering::Relaxed);
    }
}

impl Presence for FocusFlag {
    fn is_foreground(&self) -> bool {
        self.foreground.load(Ordering::Relaxed)
    }
}

/// A headless host never has focus.
#[derive(Debug, Clone, Copy, Default)]
pub struct Background;

impl Presence for Background {
    fn is_foreground(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_flag_is_shared() {
        let flag = FocusFlag::new(true);
        let handle = flag.clone();
        handle.set(false);
        assert!(!flag.is_foreground());
    }

    #[test]
    fn denied_notifier_reports_no_permission() {
        assert!(!DeniedNotifier.is_permitted());
        assert!(matches!(
            DeniedNotifier.show("t", "b"),
            Err(NotifyError::PermissionDenied)
        ));
    }

    #[test]
    fn recording_notifier_keeps_popups() {
        let n = RecordingNotifier::new();
        n.show("Reminder expired", "Meds has expired").unwrap();
        assert_eq!(n.shown().len(), 1);
    }
}
