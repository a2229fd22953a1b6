//! Command-line interface definition for bale.
//!
//! - `bale build` - load a configuration, run its plugins and write every target
//! - `bale check` - load and validate a configuration without building

mod commands;

use clap::Parser;

pub use commands::{BuildArgs, CheckArgs, Command};

/// bale - run a bundler configuration through its plugin pipeline
#[derive(Parser, Debug)]
#[command(
    name = "bale",
    version,
    about = "Run a bundler configuration through its plugin pipeline",
    long_about = "bale reads bale.toml, bale.config.json or the `bale` field of package.json,\n\
                  resolves it for the current mode (--mode or NODE_ENV) and drives the\n\
                  declared plugins over the entry module for every output target."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
