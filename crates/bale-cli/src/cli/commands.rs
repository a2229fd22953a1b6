use std::path::PathBuf;

use bale_config::{Environment, Mode};
use clap::{Args, Subcommand};

/// Available bale subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build every output target of a configuration
    ///
    /// Development plugins such as `serve` keep the process running until
    /// it is interrupted with Ctrl+C.
    Build(BuildArgs),

    /// Validate a configuration without building
    ///
    /// Resolves the configuration for the selected mode, instantiates its
    /// plugins and checks that the entry module exists.
    Check(CheckArgs),
}

/// Arguments for the build command
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Configuration file (default: discovered in the working directory)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Build mode, e.g. development or production (default: $NODE_ENV)
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Working directory relative paths resolve against
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

/// Arguments for the check command
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Configuration file (default: discovered in the working directory)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Build mode, e.g. development or production (default: $NODE_ENV)
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,
}

/// `--mode` when given, `NODE_ENV` otherwise.
pub(crate) fn environment(mode: Option<&str>) -> Environment {
    match mode {
        Some(mode) => Environment::new(Mode::from(mode)),
        None => Environment::from_env(),
    }
}

impl BuildArgs {
    pub fn environment(&self) -> Environment {
        environment(self.mode.as_deref())
    }
}

impl CheckArgs {
    pub fn environment(&self) -> Environment {
        environment(self.mode.as_deref())
    }
}
