//! Pluggable config validation strategies
//!
//! Separates filesystem validation (for CLI use) from schema validation (for library use).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use path_clean::PathClean;
use regex::Regex;

use crate::config::ResolvedConfig;
use crate::error::{ConfigError, Result};
use crate::output::OutputTarget;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern is valid")
});

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &ResolvedConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// Runs as part of [`RawConfig::resolve`](crate::RawConfig::resolve), so every
/// `ResolvedConfig` produced by this crate already satisfies it.
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &ResolvedConfig) -> Result<()> {
        validate_targets(&config.input, &config.output)
    }
}

/// The schema rules for an entry module and its output targets.
///
/// Usable on configurations that were assembled in code rather than resolved
/// from a file. Target files are compared after cleaning, together with the
/// sourcemaps they write, so no two targets can write the same path.
pub fn validate_targets(input: &Path, output: &[OutputTarget]) -> Result<()> {
    if input.to_string_lossy().trim().is_empty() {
        return Err(ConfigError::missing(
            "input",
            "Set `input` to the entry module, e.g. input = \"src/main.js\"",
        ));
    }
    if output.is_empty() {
        return Err(ConfigError::missing(
            "output",
            "Declare at least one output target with `file` and `format`",
        ));
    }

    let mut written: HashMap<PathBuf, usize> = HashMap::new();
    for (index, target) in output.iter().enumerate() {
        if target.file.to_string_lossy().trim().is_empty() {
            return Err(ConfigError::missing(
                format!("output[{index}].file"),
                "Every output target needs a destination `file`",
            ));
        }

        match target.global_name() {
            Some(name) if !IDENTIFIER.is_match(name) => {
                return Err(ConfigError::InvalidValue {
                    field: format!("output[{index}].name"),
                    message: format!("\"{name}\" is not a valid JavaScript identifier"),
                });
            }
            None if target.requires_global_name() => {
                return Err(ConfigError::MissingGlobalName {
                    file: target.file.clone(),
                });
            }
            _ => {}
        }

        let mut files = vec![(target.file.clean(), "file")];
        if target.sourcemap {
            files.push((target.sourcemap_file().clean(), "sourcemap"));
        }
        for (path, field) in files {
            if let Some(earlier) = written.insert(path.clone(), index) {
                return Err(ConfigError::InvalidValue {
                    field: format!("output[{index}].{field}"),
                    message: format!(
                        "'{}' is already written by output[{earlier}]",
                        path.display()
                    ),
                });
            }
        }
    }

    Ok(())
}

/// Filesystem validator (for CLI use)
///
/// Checks that the entry module exists on disk, relative to `root` unless the
/// configuration sets its own `cwd`.
///
/// # Example
///
/// ```no_run
/// use bale_config::{ConfigDiscovery, ConfigValidator, Environment, FsValidator};
///
/// let resolved = ConfigDiscovery::new(".")
///     .load()
///     .and_then(|raw| raw.resolve(&Environment::from_env()))
///     .unwrap();
/// FsValidator::new(".").validate(&resolved).unwrap();
/// ```
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &ResolvedConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        let base = match &config.cwd {
            Some(cwd) => self.root.join(cwd),
            None => self.root.clone(),
        };
        let path = base.join(&config.input);
        if !path.is_file() {
            return Err(ConfigError::EntryNotFound { path });
        }

        Ok(())
    }
}

pub fn validate_schema(config: &ResolvedConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

pub fn validate_fs(config: &ResolvedConfig, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(config)
}
