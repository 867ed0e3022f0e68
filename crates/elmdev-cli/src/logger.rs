//! Logging setup on top of `tracing`.
//!
//! Level selection, in order:
//! 1. `--verbose`: DEBUG for elmdev crates
//! 2. `--quiet`: ERROR only
//! 3. `RUST_LOG`
//! 4. INFO for elmdev crates

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "elmdev=debug,elmdev_cli=debug,elmdev_config=debug";
const QUIET_FILTER: &str = "elmdev=error,elmdev_cli=error,elmdev_config=error";
const DEFAULT_FILTER: &str = "elmdev=info,elmdev_cli=info,elmdev_config=info";

/// Initialize the global tracing subscriber.
///
/// Call once, before anything logs. A second call is ignored.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(select_filter(verbose, quiet), no_color);
}

/// Initialize the global subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn select_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Whether coloured output should be used, honouring `NO_COLOR` and `FORCE_COLOR`.
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::Term::stderr().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn verbose_wins_over_quiet() {
        let filter = select_filter(true, true).to_string();
        assert!(filter.contains("elmdev_cli=debug"));
    }

    #[test]
    fn quiet_filter_only_shows_errors() {
        let filter = select_filter(false, true).to_string();
        assert!(filter.contains("elmdev_cli=error"));
    }

    #[test]
    #[serial]
    fn force_color_enables_colors() {
        unsafe { std::env::remove_var("NO_COLOR"); }
        unsafe { std::env::set_var("FORCE_COLOR", "1"); }
        assert!(should_use_colors());
        unsafe { std::env::remove_var("FORCE_COLOR"); }
    }

    #[test]
    #[serial]
    fn no_color_wins() {
        unsafe { std::env::set_var("NO_COLOR", "1"); }
        unsafe { std::env::set_var("FORCE_COLOR", "1"); }
        assert!(!should_use_colors());
        unsafe { std::env::remove_var("NO_COLOR"); }
        unsafe { std::env::remove_var("FORCE_COLOR"); }
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_logger(false, true, true);
        init_logger(false, true, true);
    }
}
