//! Logging setup for the bale CLI.
//!
//! Library crates only emit `tracing` events; the binary installs the
//! subscriber. Log lines go to stderr next to the status messages so stdout
//! stays free for piping.
//!
//! # Example
//!
//! ```rust,no_run
//! use bale_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("Starting build");
//! ```

use bale_bundler::logging::{LogLevel, env_filter};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// The level is chosen in this order:
/// 1. `--verbose`: DEBUG for bale crates
/// 2. `--quiet`: ERROR only
/// 3. `RUST_LOG`
/// 4. WARN for bale crates; progress is reported through [`crate::ui`]
///
/// Calling it twice is a no-op.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = env_filter(LogLevel::from_flags(verbose, quiet), LogLevel::Warn);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
