//! Top-level configuration: parsing, profile merging and resolution.
//!
//! For file discovery, see the `discovery` module.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::discovery::load_path;
use crate::env::{Environment, Mode};
use crate::error::{ConfigError, Result as ConfigResult};
use crate::output::{OneOrMany, OutputOptions, OutputTarget};
use crate::plugin::{PluginEntryDecl, PluginSpec, resolve_entries};
use crate::validation::{ConfigValidator, SchemaValidator};

/// Where a configuration declaration comes from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// `.toml`, `.json` or `package.json` file
    File(PathBuf),
    Toml(String),
    Json(String),
    Value(Value),
}

impl ConfigSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ConfigSource::File(path.into())
    }

    pub fn read(&self) -> ConfigResult<RawConfig> {
        match self {
            ConfigSource::File(path) => load_path(path),
            ConfigSource::Toml(text) => RawConfig::from_toml_str(text),
            ConfigSource::Json(text) => RawConfig::from_json_str(text),
            ConfigSource::Value(value) => RawConfig::from_value(value.clone()),
        }
    }
}

/// A configuration exactly as declared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OneOrMany<OutputOptions>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<Option<PluginEntryDecl>>>,

    /// Singular spelling found in hand-written configs; read as `plugins`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<Vec<Option<PluginEntryDecl>>>,

    /// Directory relative paths are resolved against (defaults to the caller's cwd)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,

    /// Per-mode overrides deep-merged over the base configuration
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub profiles: HashMap<String, Value>,
}

/// A configuration with every condition evaluated and required field present.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub input: PathBuf,
    pub output: Vec<OutputTarget>,
    /// Declared slots; `None` marks a falsy entry
    pub plugins: Vec<Option<PluginSpec>>,
    pub cwd: Option<PathBuf>,
    pub mode: Mode,
}

impl ResolvedConfig {
    pub fn active_plugins(&self) -> impl Iterator<Item = &PluginSpec> {
        self.plugins.iter().flatten()
    }
}

impl RawConfig {
    /// Create from `serde_json::Value` (for programmatic configs).
    ///
    /// # Example
    ///
    /// ```
    /// use bale_config::RawConfig;
    /// use serde_json::json;
    ///
    /// let raw = RawConfig::from_value(json!({
    ///     "input": "./main.js",
    ///     "output": { "file": "./bundle.js", "format": "esm" }
    /// }))
    /// .unwrap();
    /// assert_eq!(raw.input.as_deref(), Some("./main.js"));
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::parse("config", e))
    }

    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::parse("config", e))
    }

    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let toml_val: toml::Value =
            toml::from_str(text).map_err(|e| ConfigError::parse("TOML", e))?;
        let value = serde_json::to_value(toml_val).map_err(|e| ConfigError::parse("TOML", e))?;
        Self::from_value(value)
    }

    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| ConfigError::parse("JSON", e))?;
        Self::from_value(value)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        debug!(path = %path.display(), "reading configuration");

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Apply `profiles.<mode>` over the base configuration.
    ///
    /// Tables merge key by key; arrays and scalars are replaced.
    pub fn materialize_profile(mut self, mode: &Mode) -> ConfigResult<Self> {
        let Some(overrides) = self.profiles.get(mode.as_str()).cloned() else {
            return Ok(self);
        };
        if overrides.is_null() {
            return Ok(self);
        }

        let invalid = |err: serde_json::Error| ConfigError::InvalidProfileOverride {
            profile: mode.to_string(),
            message: err.to_string(),
        };

        let profiles = std::mem::take(&mut self.profiles);
        let mut base = serde_json::to_value(&self).map_err(invalid)?;
        merge_values(&mut base, &overrides);

        let mut merged: RawConfig = serde_json::from_value(base).map_err(invalid)?;
        merged.profiles = profiles;
        debug!(profile = %mode, "applied profile overrides");
        Ok(merged)
    }

    /// Evaluate the configuration against `env`.
    ///
    /// Fails when `input`, an output `file` or `format` is missing, or when a
    /// target breaks a schema rule (see [`SchemaValidator`]).
    pub fn resolve(self, env: &Environment) -> ConfigResult<ResolvedConfig> {
        let raw = self.materialize_profile(env.mode())?;

        let input = match raw.input.as_deref().map(str::trim) {
            Some(input) if !input.is_empty() => PathBuf::from(input),
            _ => {
                return Err(ConfigError::missing(
                    "input",
                    "Set `input` to the entry module, e.g. input = \"src/main.js\"",
                ));
            }
        };

        let output = resolve_outputs(raw.output, env)?;

        let entries = match (raw.plugins, raw.plugin) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::ConflictingFields {
                    first: "plugins".to_string(),
                    second: "plugin".to_string(),
                    hint: "Move every entry into `plugins`".to_string(),
                });
            }
            (Some(plugins), None) => plugins,
            (None, Some(plugin)) => {
                warn!("`plugin` is not a recognised key, reading it as `plugins`");
                plugin
            }
            (None, None) => Vec::new(),
        };
        let plugins = resolve_entries(&entries, env)?;

        let resolved = ResolvedConfig {
            input,
            output,
            plugins,
            cwd: raw.cwd,
            mode: env.mode().clone(),
        };
        SchemaValidator.validate(&resolved)?;

        debug!(
            mode = %resolved.mode,
            targets = resolved.output.len(),
            plugins = resolved.active_plugins().count(),
            "configuration resolved"
        );
        Ok(resolved)
    }
}

fn resolve_outputs(
    output: Option<OneOrMany<OutputOptions>>,
    env: &Environment,
) -> ConfigResult<Vec<OutputTarget>> {
    let Some(output) = output else {
        return Err(ConfigError::missing(
            "output",
            "Declare at least one output target with `file` and `format`",
        ));
    };

    let many = output.is_many();
    let options = output.into_vec();
    if options.is_empty() {
        return Err(ConfigError::missing(
            "output",
            "The `output` array is empty; declare at least one target",
        ));
    }

    options
        .into_iter()
        .enumerate()
        .map(|(index, options)| {
            let prefix = if many {
                format!("output[{index}]")
            } else {
                "output".to_string()
            };

            let file = options.file.ok_or_else(|| {
                ConfigError::missing(
                    format!("{prefix}.file"),
                    "Every output target needs a destination `file`",
                )
            })?;
            let format = options.format.ok_or_else(|| {
                ConfigError::missing(
                    format!("{prefix}.format"),
                    "Pick one of: esm, cjs, umd, iife, amd",
                )
            })?;

            Ok(OutputTarget {
                file,
                format,
                name: options.name,
                sourcemap: options.sourcemap.resolve(env),
                exports: options.exports,
                banner: options.banner,
                footer: options.footer,
            })
        })
        .collect()
}

fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use serde_json::json;

    fn quick_start() -> RawConfig {
        RawConfig::from_value(json!({
            "input": "./src/main.js",
            "output": {
                "file": "./dist/bundle.js",
                "format": "umd",
                "exports": "none",
                "sourcemap": "!production"
            },
            "plugins": [
                { "name": "babel", "options": { "presets": ["@babel/preset-env"] } },
                { "name": "serve", "when": "!production", "options": { "port": 3000 } },
                { "name": "uglify", "when": "production" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn production_resolves_babel_and_uglify() {
        let resolved = quick_start()
            .resolve(&Environment::new(Mode::Production))
            .unwrap();
        let names: Vec<_> = resolved.active_plugins().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["babel", "uglify"]);
        assert!(!resolved.output[0].sourcemap);
    }

    #[test]
    fn toggling_mode_only_changes_conditional_parts() {
        let prod = quick_start()
            .resolve(&Environment::new(Mode::Production))
            .unwrap();
        let dev = quick_start()
            .resolve(&Environment::new(Mode::Development))
            .unwrap();

        assert_eq!(prod.input, dev.input);
        assert_eq!(prod.plugins.len(), dev.plugins.len());
        assert_eq!(prod.plugins[0], dev.plugins[0]);
        assert!(prod.plugins[1].is_none() && dev.plugins[1].is_some());
        assert!(prod.plugins[2].is_some() && dev.plugins[2].is_none());

        let (mut p, d) = (prod.output[0].clone(), dev.output[0].clone());
        assert_ne!(p.sourcemap, d.sourcemap);
        p.sourcemap = d.sourcemap;
        assert_eq!(p, d);
    }

    #[test]
    fn missing_input_is_reported() {
        let raw = RawConfig::from_value(json!({
            "output": { "file": "bundle.js", "format": "esm" }
        }))
        .unwrap();
        let err = raw.resolve(&Environment::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref field, .. } if field == "input"));
    }

    #[test]
    fn blank_input_is_reported() {
        let raw = RawConfig::from_value(json!({
            "input": "  ",
            "output": { "file": "bundle.js", "format": "esm" }
        }))
        .unwrap();
        assert!(matches!(
            raw.resolve(&Environment::default()),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn missing_format_names_the_target() {
        let raw = RawConfig::from_value(json!({
            "input": "main.js",
            "output": [
                { "file": "a.js", "format": "esm" },
                { "file": "b.js" }
            ]
        }))
        .unwrap();
        let err = raw.resolve(&Environment::default()).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingField { ref field, .. } if field == "output[1].format")
        );
    }

    #[test]
    fn singular_plugin_key_is_read_as_plugins() {
        let raw = RawConfig::from_value(json!({
            "input": "./main.js",
            "output": { "file": "./bundle.js", "format": "esm" },
            "plugin": [{ "name": "babel", "options": { "exclude": "./node_modules/**" } }]
        }))
        .unwrap();
        let resolved = raw.resolve(&Environment::default()).unwrap();
        assert_eq!(resolved.active_plugins().next().unwrap().name, "babel");
    }

    #[test]
    fn both_plugin_keys_conflict() {
        let raw = RawConfig::from_value(json!({
            "input": "./main.js",
            "output": { "file": "./bundle.js", "format": "esm" },
            "plugins": [],
            "plugin": []
        }))
        .unwrap();
        assert!(matches!(
            raw.resolve(&Environment::default()),
            Err(ConfigError::ConflictingFields { .. })
        ));
    }

    #[test]
    fn profile_overrides_merge_into_outputs() {
        let raw = RawConfig::from_toml_str(
            r#"
input = "src/main.js"

[output]
file = "dist/bundle.js"
format = "esm"

[profiles.production.output]
format = "iife"
name = "App"
"#,
        )
        .unwrap();

        let prod = raw
            .clone()
            .resolve(&Environment::new(Mode::Production))
            .unwrap();
        assert_eq!(prod.output[0].format, OutputFormat::Iife);
        assert_eq!(prod.output[0].name.as_deref(), Some("App"));
        assert_eq!(prod.output[0].file, PathBuf::from("dist/bundle.js"));

        let dev = raw.resolve(&Environment::default()).unwrap();
        assert_eq!(dev.output[0].format, OutputFormat::Esm);
    }

    #[test]
    fn toml_arrays_may_mix_false_and_tables() {
        let raw = RawConfig::from_toml_str(
            r#"
input = "main.js"
output = { file = "bundle.js", format = "esm" }
plugins = ["a", false, { name = "b" }]
"#,
        )
        .unwrap();
        let resolved = raw.resolve(&Environment::default()).unwrap();
        assert_eq!(resolved.plugins.len(), 3);
        assert!(resolved.plugins[1].is_none());
    }

    #[test]
    fn to_value_round_trips_declared_fields() {
        let value = quick_start().to_value().unwrap();
        assert_eq!(value["output"]["format"], json!("umd"));
        assert_eq!(value["output"]["sourcemap"], json!("!production"));
    }
}
