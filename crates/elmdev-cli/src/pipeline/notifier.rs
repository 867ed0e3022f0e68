//! Build error notifications.
//!
//! Failures never abort a build cycle; they are reported through a
//! [`Notifier`] instead. The console notifier is always available, the
//! desktop notifier additionally raises an OS notification when the platform
//! has a way to show one.

use crate::ui;
use parking_lot::Mutex;
use std::process::Command;

/// A human-readable notification about a failed stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    /// Notification for a failed pipeline stage, titled after the stage name.
    pub fn build_error(stage: &str, message: &str) -> Self {
        Self {
            title: format!("Build error in {}", stage),
            message: message.to_string(),
        }
    }
}

/// Side channel for build failures.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Prints notifications to the terminal.
///
/// The full compiler output is printed once, under the title. The log only
/// records that a notification went out.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::debug!(title = %notification.title, "build failure reported");
        ui::error(&notification.title);
        eprintln!("{}", notification.message.trim_end());
    }
}

/// Console output plus a best-effort OS notification.
///
/// - Linux: `notify-send`
/// - macOS: `osascript`
/// - elsewhere: console only
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier {
    console: ConsoleNotifier,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn command(notification: &Notification) -> Option<Command> {
        // OS notifications are one-liners; the console keeps the full text.
        let summary = notification.message.lines().next().unwrap_or_default();

        if cfg!(target_os = "linux") {
            let mut cmd = Command::new("notify-send");
            cmd.arg(&notification.title).arg(summary);
            Some(cmd)
        } else if cfg!(target_os = "macos") {
            let script = format!(
                "display notification \"{}\" with title \"{}\"",
                escape_applescript(summary),
                escape_applescript(&notification.title)
            );
            let mut cmd = Command::new("osascript");
            cmd.arg("-e").arg(script);
            Some(cmd)
        } else {
            None
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, notification: &Notification) {
        self.console.notify(notification);

        let Some(mut cmd) = Self::command(notification) else {
            tracing::debug!("desktop notifications are not supported on this platform");
            return;
        };

        match cmd.spawn() {
            Ok(mut child) => {
                // Reap in the background so the notification never blocks a build.
                std::thread::spawn(move || {
                    let _ = child.wait();
                });
            }
            Err(e) => ui::warning(&format!("Failed to show desktop notification: {}", e)),
        }
    }
}

/// Collects notifications in memory.
///
/// Useful for embedding the pipeline where the host wants to surface
/// failures itself, and for tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.received.lock().push(notification.clone());
    }
}

fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
