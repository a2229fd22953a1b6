#![cfg_attr(docsrs, feature(doc_cfg))]

//! # bale-bundler
//!
//! Loads a bale configuration and runs its plugin chain over one entry module,
//! writing one bundle per output target.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bale_bundler::ConfigPipeline;
//! use bale_config::{ConfigSource, Environment, Mode};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = ConfigPipeline::new("./my-app");
//! let config = pipeline.load(
//!     &ConfigSource::file("./my-app/bale.toml"),
//!     &Environment::new(Mode::Production),
//! )?;
//!
//! let output = pipeline.run(&config).await?;
//! for bundle in &output.bundles {
//!     println!("{} ({})", bundle.file.display(), bundle.target.format);
//! }
//! # Ok(()) }
//! ```
//!
//! ## Plugins in code
//!
//! Configuration files can only name plugins that a [`PluginRegistry`] knows.
//! Plugins built in code go straight into a [`BuildConfig`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use bale_bundler::{BuildConfig, ConfigPipeline, builtins::{MinifyOptions, MinifyPlugin}};
//! use bale_config::{Environment, OutputFormat, OutputTarget};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let env = Environment::from_env();
//! let config = BuildConfig::new("src/main.js", ".")
//!     .output(OutputTarget::new("dist/bundle.js", OutputFormat::Iife).with_name("App"))
//!     .plugin_entry(env.is_production().then(|| {
//!         Arc::new(MinifyPlugin::new(MinifyOptions::default())) as bale_bundler::SharedPlugin
//!     }))
//!     .env(env);
//!
//! ConfigPipeline::new(".").run(&config).await?;
//! # Ok(()) }
//! ```

pub mod builtins;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod plugins;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, env_filter, init_logging, init_logging_from_env};

pub use config::BuildConfig;
pub use error::{BuildError, Hook, PluginError, Result};
pub use pipeline::{BuildOutput, ConfigPipeline};
pub use output::LineMap;
pub use plugins::{
    BackgroundTask, BuildWarning, ChunkInfo, EmittedAsset, HookResult, OutputBundle, Plugin,
    PluginContext, PluginEntry, PluginFactory, PluginRegistry, RenderedChunk, SharedPlugin,
};

pub use bale_config;
