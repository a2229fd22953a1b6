//! Plugin entries as they appear in a configuration.
//!
//! An entry is either a falsy placeholder (`false`, `null`, a disabled or
//! non-matching declaration) or something that names a plugin. Resolution turns
//! every entry into an `Option<PluginSpec>`; placeholders become `None` and keep
//! their slot so that callers can still see the declared shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::env::{Condition, Environment};
use crate::error::{ConfigError, Result};

fn default_true() -> bool {
    true
}

/// Long form of a plugin entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDecl {
    pub name: String,

    /// Only include the plugin when this holds for the build environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<Condition>,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Forwarded untouched to the plugin factory
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

/// One slot of the `plugins` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginEntryDecl {
    Flag(bool),
    Name(String),
    Decl(PluginDecl),
}

/// A plugin that takes part in the build.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginSpec {
    pub name: String,
    pub options: Value,
}

impl PluginSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Value::Null,
        }
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }
}

impl PluginEntryDecl {
    /// Evaluate the entry at `index` against `env`.
    pub fn resolve(&self, index: usize, env: &Environment) -> Result<Option<PluginSpec>> {
        match self {
            PluginEntryDecl::Flag(false) => Ok(None),
            PluginEntryDecl::Flag(true) => Err(ConfigError::InvalidPluginEntry {
                index,
                reason: "`true` does not name a plugin".to_string(),
            }),
            PluginEntryDecl::Name(name) => named(index, name).map(|name| Some(PluginSpec::new(name))),
            PluginEntryDecl::Decl(decl) => {
                let name = named(index, &decl.name)?;
                if !decl.enabled {
                    return Ok(None);
                }
                if let Some(condition) = &decl.when {
                    if !condition.holds(env) {
                        return Ok(None);
                    }
                }
                Ok(Some(PluginSpec::new(name).with_options(decl.options.clone())))
            }
        }
    }
}

fn named(index: usize, name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::InvalidPluginEntry {
            index,
            reason: "plugin name cannot be empty".to_string(),
        });
    }
    Ok(name.to_string())
}

/// Resolve a declared list. `null` slots are kept as `None`.
pub fn resolve_entries(
    entries: &[Option<PluginEntryDecl>],
    env: &Environment,
) -> Result<Vec<Option<PluginSpec>>> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Some(entry) => entry.resolve(index, env),
            None => Ok(None),
        })
        .collect()
}
