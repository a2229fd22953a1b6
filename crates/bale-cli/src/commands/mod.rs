//! Command implementations for the bale CLI.
//!
//! - [`build`] - run the pipeline and write every output target
//! - [`check`] - load and validate only
//!
//! Both share [`registry`] and [`config_source`].

use std::path::{Path, PathBuf};

use bale_bundler::PluginRegistry;
use bale_config::{ConfigDiscovery, ConfigError, ConfigSource};

use crate::error::{CliError, Result};

pub mod build;
pub mod check;

pub use build::execute as build_execute;
pub use check::execute as check_execute;

/// Built-in plugins plus `css` and `serve`.
pub fn registry() -> PluginRegistry {
    let mut registry = PluginRegistry::with_builtins();
    bale_plugin_css::register(&mut registry);
    bale_plugin_serve::register(&mut registry);
    registry
}

/// Explicit `--config` (relative to `cwd`) or the first conventional file in `cwd`.
pub fn config_source(config: Option<&Path>, cwd: &Path) -> Result<ConfigSource> {
    let path = match config {
        Some(path) => cwd.join(path),
        None => ConfigDiscovery::new(cwd)
            .find()
            .ok_or_else(|| ConfigError::NotFound(cwd.to_path_buf()))?,
    };
    Ok(ConfigSource::file(path))
}

/// `--cwd` joined onto the process directory, which must exist.
pub(crate) fn working_dir(cwd: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    let dir = match cwd {
        Some(dir) => current.join(dir),
        None => current,
    };
    if !dir.is_dir() {
        return Err(CliError::DirectoryNotFound(dir));
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn registry_has_companion_plugins() {
        assert_eq!(
            registry().names(),
            vec!["banner", "css", "minify", "replace", "serve"]
        );
    }

    #[test]
    fn explicit_config_is_relative_to_cwd() {
        let dir = TempDir::new().unwrap();
        let source = config_source(Some(Path::new("configs/app.toml")), dir.path()).unwrap();
        assert!(matches!(source, ConfigSource::File(path) if path == dir.path().join("configs/app.toml")));
    }

    #[test]
    fn discovered_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bale.config.json"), "{}").unwrap();
        let source = config_source(None, dir.path()).unwrap();
        assert!(matches!(source, ConfigSource::File(path) if path.ends_with("bale.config.json")));
    }

    #[test]
    fn missing_config_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = config_source(None, dir.path()).unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::NotFound(_))));
    }

    #[test]
    fn missing_working_dir() {
        let err = working_dir(Some(Path::new("definitely/not/here"))).unwrap_err();
        assert!(matches!(err, CliError::DirectoryNotFound(_)));
    }
}
