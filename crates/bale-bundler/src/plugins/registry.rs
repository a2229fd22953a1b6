//! Name → factory lookup used when a configuration is loaded.
//!
//! Configuration files can only name plugins. The registry turns a
//! [`PluginSpec`] (name + options) into a live [`SharedPlugin`].

use std::sync::Arc;

use bale_config::{ConfigError, Environment, PluginSpec};
use indexmap::IndexMap;
use serde_json::Value;

use super::SharedPlugin;

/// Builds a plugin from its declared options.
pub type PluginFactory =
    Arc<dyn Fn(&Value, &Environment) -> anyhow::Result<SharedPlugin> + Send + Sync>;

/// Registry of plugin factories, keyed by the name used in configurations.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    factories: IndexMap<String, PluginFactory>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with `replace`, `banner` and `minify`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::builtins::register(&mut registry);
        registry
    }

    /// Add or replace a factory.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Value, &Environment) -> anyhow::Result<SharedPlugin> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Instantiate the plugin a spec names.
    ///
    /// # Errors
    ///
    /// `UnknownPlugin` when nothing is registered under the name, and
    /// `InvalidPluginOptions` when the factory rejects the options.
    pub fn create(&self, spec: &PluginSpec, env: &Environment) -> Result<SharedPlugin, ConfigError> {
        let factory = self
            .factories
            .get(&spec.name)
            .ok_or_else(|| ConfigError::UnknownPlugin {
                name: spec.name.clone(),
                available: self.names().join(", "),
            })?;

        factory(&spec.options, env).map_err(|err| ConfigError::InvalidPluginOptions {
            name: spec.name.clone(),
            message: format!("{err:#}"),
        })
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::Plugin;
    use async_trait::async_trait;
    use serde_json::json;

    // `Result::unwrap_err` needs the Ok type to be `Debug`.
    impl std::fmt::Debug for dyn Plugin {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_tuple("Plugin").field(&self.name()).finish()
        }
    }

    struct Named(String);

    #[async_trait]
    impl Plugin for Named {
        fn name(&self) -> &str {
            &self.0
        }
    }

    fn registry() -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        registry.register("noop", |_, _| Ok(Arc::new(Named("noop".into())) as SharedPlugin));
        registry.register("strict", |options, _| {
            anyhow::ensure!(options.is_object(), "expected a table of options");
            Ok(Arc::new(Named("strict".into())) as SharedPlugin)
        });
        registry
    }

    #[test]
    fn creates_registered_plugins() {
        let plugin = registry()
            .create(&PluginSpec::new("noop"), &Environment::default())
            .unwrap();
        assert_eq!(plugin.name(), "noop");
    }

    #[test]
    fn unknown_names_list_the_alternatives() {
        let err = registry()
            .create(&PluginSpec::new("vue"), &Environment::default())
            .unwrap_err();
        match err {
            ConfigError::UnknownPlugin { name, available } => {
                assert_eq!(name, "vue");
                assert_eq!(available, "noop, strict");
            }
            other => panic!("expected UnknownPlugin, got {other:?}"),
        }
    }

    #[test]
    fn factory_failures_become_invalid_options() {
        let registry = registry();
        let env = Environment::default();
        assert!(matches!(
            registry.create(&PluginSpec::new("strict").with_options(json!(3)), &env),
            Err(ConfigError::InvalidPluginOptions { ref name, .. }) if name == "strict"
        ));
        assert!(
            registry
                .create(&PluginSpec::new("strict").with_options(json!({})), &env)
                .is_ok()
        );
    }

    #[test]
    fn builtins_are_registered() {
        let registry = PluginRegistry::with_builtins();
        assert_eq!(registry.names(), ["banner", "minify", "replace"]);
    }
}
