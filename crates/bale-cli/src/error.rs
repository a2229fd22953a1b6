//! Error handling for the bale CLI.
//!
//! Library errors are wrapped unchanged; their messages already carry a hint
//! where one helps. [`cli_error_to_miette`] turns the result into a report at
//! the process boundary.

use std::path::PathBuf;

use bale_bundler::BuildError;
use bale_config::ConfigError;
use thiserror::Error;

mod miette;

pub use self::miette::{build_error_to_miette, cli_error_to_miette};

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be found, parsed, resolved or validated
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The build itself failed
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Working directory given with --cwd does not exist
    #[error("Working directory not found: {}\n\nHint: check the path passed to --cwd", .0.display())]
    DirectoryNotFound(PathBuf),

    /// I/O errors outside of the build (current directory, signals)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
