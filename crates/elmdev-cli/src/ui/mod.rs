//! Terminal output: status lines, formatting helpers and a spinner.
//!
//! Everything goes to stderr so stdout stays clean for piping.
//!
//! ```no_run
//! use elmdev_cli::ui;
//!
//! ui::success("Build completed");
//! ui::error("Build error in elm");
//! ```

mod format;
mod messages;
mod spinner;

pub use format::{format_duration, format_size};
pub use messages::{error, info, success, warning};
pub use spinner::Spinner;

use std::sync::atomic::{AtomicBool, Ordering};

static COLORS: AtomicBool = AtomicBool::new(true);

/// Decide once whether status lines are coloured.
///
/// `--no-color`, `NO_COLOR` and terminals without colour support all turn
/// colours off.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && crate::logger::should_use_colors();
    COLORS.store(enabled, Ordering::Relaxed);
    console::set_colors_enabled_stderr(enabled);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
}

/// Whether interactive widgets (spinners) make sense on this terminal.
pub fn is_interactive() -> bool {
    !is_ci() && console::user_attended_stderr()
}
