//! Subscriber setup for applications embedding bale.
//!
//! Only available with the `logging` feature. The library crates emit
//! `tracing` events and never install a subscriber; a binary either calls
//! [`init_logging`] or builds its own layer stack around [`env_filter`].

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events a [`LogLevel`] controls. Other crates never log
/// below `warn`.
pub const CRATES: [&str; 6] = [
    "bale",
    "bale_cli",
    "bale_config",
    "bale_bundler",
    "bale_plugin_css",
    "bale_plugin_serve",
];

/// Verbosity of bale's own log output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Silent,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    /// Includes one event per hook call
    Trace,
}

impl LogLevel {
    /// Level forced by `--verbose` / `--quiet`, if either is set.
    pub fn from_flags(verbose: bool, quiet: bool) -> Option<Self> {
        match (verbose, quiet) {
            (true, _) => Some(LogLevel::Debug),
            (false, true) => Some(LogLevel::Error),
            (false, false) => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Directives setting this level on every crate in [`CRATES`].
    pub fn directives(self) -> String {
        let mut directives = vec![self.min(LogLevel::Warn).as_str().to_string()];
        directives.extend(CRATES.iter().map(|krate| format!("{krate}={}", self.as_str())));
        directives.join(",")
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!(
                "unknown log level '{other}' (expected silent, error, warn, info, debug or trace)"
            )),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter for a forced level, else `RUST_LOG`, else `fallback`.
pub fn env_filter(forced: Option<LogLevel>, fallback: LogLevel) -> EnvFilter {
    match forced {
        Some(level) => EnvFilter::new(level.directives()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(fallback.directives())),
    }
}

/// Install a compact stderr subscriber at `level`.
///
/// Only the first subscriber installed in a process takes effect; later
/// calls do nothing.
///
/// # Example
///
/// ```rust,no_run
/// use bale_bundler::logging::{LogLevel, init_logging};
///
/// init_logging(LogLevel::Info);
/// ```
pub fn init_logging(level: LogLevel) {
    install(env_filter(Some(level), level));
}

/// Install a compact stderr subscriber driven by `RUST_LOG`, defaulting to `info`.
pub fn init_logging_from_env() {
    install(env_filter(None, LogLevel::Info));
}

fn install(filter: EnvFilter) {
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_parse_leniently() {
        assert_eq!("info".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert_eq!(" Warning ".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("off".parse::<LogLevel>(), Ok(LogLevel::Silent));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn flags_pick_a_level() {
        assert_eq!(LogLevel::from_flags(true, false), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_flags(false, true), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_flags(false, false), None);
    }

    #[test]
    fn directives_cover_every_bale_crate() {
        let directives = LogLevel::Trace.directives();
        assert!(directives.starts_with("warn,bale=trace,"));
        assert!(directives.contains("bale_plugin_serve=trace"));
        assert_eq!(directives.matches('=').count(), CRATES.len());
        let _filter = EnvFilter::new(directives);

        assert!(LogLevel::Error.directives().starts_with("error,bale=error,"));
    }

    #[test]
    fn installing_twice_is_harmless() {
        init_logging(LogLevel::Silent);
        init_logging_from_env();
    }
}
