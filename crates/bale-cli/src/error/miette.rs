//! Miette report conversion for CLI errors.

use bale_bundler::BuildError;
use miette::Report;

use crate::error::CliError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        CliError::Build(e) => build_error_to_miette(e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert BuildError to miette Report
pub fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::Config(e) => miette::miette!("Configuration error: {}", e),
        BuildError::Plugin(e) => miette::miette!(
            "Build failed in plugin `{}` ({} hook):\n{:#}",
            e.plugin,
            e.hook,
            e.source
        ),
        BuildError::Io { path, source } => miette::miette!(
            "Build failed reading or writing {}: {}",
            path.display(),
            source
        ),
        other => miette::miette!("Build failed: {}", other),
    }
}
