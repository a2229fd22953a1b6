//! Declarative build configuration for bale.
//!
//! A configuration names one entry module, one or more output targets and an
//! ordered list of plugin entries. Some entries only apply in certain build
//! modes; they are resolved once against an explicit [`Environment`] and the
//! result ([`ResolvedConfig`]) is immutable afterwards.
//!
//! ```
//! use bale_config::{Environment, Mode, RawConfig};
//!
//! let raw = RawConfig::from_toml_str(
//!     r#"
//! input = "src/main.js"
//! output = { file = "dist/bundle.js", format = "esm" }
//! plugins = ["babel", { name = "serve", when = "!production" }]
//! "#,
//! )
//! .unwrap();
//!
//! let resolved = raw.resolve(&Environment::new(Mode::Production)).unwrap();
//! assert_eq!(resolved.active_plugins().count(), 1);
//! ```

pub mod config;
pub mod discovery;
pub mod env;
pub mod error;
pub mod output;
pub mod plugin;
pub mod validation;

pub use config::{ConfigSource, RawConfig, ResolvedConfig};
pub use env::{Condition, Environment, Mode, Toggle};
pub use error::{ConfigError, Result};
pub use output::{ExportsMode, OneOrMany, OutputFormat, OutputOptions, OutputTarget};
pub use plugin::{PluginDecl, PluginEntryDecl, PluginSpec};

pub use discovery::{ConfigDiscovery, discover, load_path};
pub use validation::{
    ConfigValidator, FsValidator, SchemaValidator, validate_fs, validate_schema, validate_targets,
};
