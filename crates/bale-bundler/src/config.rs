//! Resolved build configuration.
//!
//! A `BuildConfig` is what [`ConfigPipeline::load`](crate::ConfigPipeline::load)
//! produces: every condition evaluated, every plugin instantiated. It can also
//! be assembled by hand with the builder methods when plugins are constructed
//! in code.

use std::path::{Path, PathBuf};

use bale_config::{Environment, OutputTarget};
use path_clean::PathClean;

use crate::plugins::{PluginEntry, SharedPlugin};

/// Build configuration for one invocation. Read-only once built.
#[derive(Clone)]
pub struct BuildConfig {
    /// Entry module, relative to `cwd` unless absolute
    pub input: PathBuf,

    /// Output targets, built in order
    pub output: Vec<OutputTarget>,

    /// Declared plugin slots; `None` marks a falsy entry
    pub plugins: Vec<PluginEntry>,

    /// Environment every condition was evaluated against
    pub env: Environment,

    /// Directory relative paths are resolved against
    pub cwd: PathBuf,
}

impl BuildConfig {
    pub fn new(input: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: Vec::new(),
            plugins: Vec::new(),
            env: Environment::default(),
            cwd: cwd.into(),
        }
    }

    pub fn output(mut self, target: OutputTarget) -> Self {
        self.output.push(target);
        self
    }

    pub fn plugin(mut self, plugin: SharedPlugin) -> Self {
        self.plugins.push(Some(plugin));
        self
    }

    /// Append a plugin slot that may be empty, mirroring `cond && plugin()`.
    pub fn plugin_entry(mut self, entry: PluginEntry) -> Self {
        self.plugins.push(entry);
        self
    }

    pub fn env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    /// Resolve `path` against `cwd`.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.clean()
        } else {
            self.cwd.join(path).clean()
        }
    }

    /// Names of the plugins that will run, in order.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().flatten().map(|p| p.name()).collect()
    }
}

impl std::fmt::Debug for BuildConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plugins: Vec<Option<&str>> = self
            .plugins
            .iter()
            .map(|entry| entry.as_ref().map(|p| p.name()))
            .collect();
        f.debug_struct("BuildConfig")
            .field("input", &self.input)
            .field("output", &self.output)
            .field("plugins", &plugins)
            .field("env", &self.env)
            .field("cwd", &self.cwd)
            .finish()
    }
}
