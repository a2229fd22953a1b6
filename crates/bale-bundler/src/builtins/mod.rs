//! Plugins that ship with the bundler.
//!
//! | name      | hooks         |
//! |-----------|---------------|
//! | `replace` | transform     |
//! | `banner`  | render_chunk  |
//! | `minify`  | render_chunk  |

use std::sync::Arc;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::plugins::{PluginRegistry, SharedPlugin};

mod banner;
mod minify;
mod replace;

pub use banner::{BannerOptions, BannerPlugin};
pub use minify::{MinifyOptions, MinifyPlugin};
pub use replace::{ReplaceOptions, ReplacePlugin};

pub(crate) fn register(registry: &mut PluginRegistry) {
    registry
        .register("replace", |options, env| {
            let options: ReplaceOptions = parse_options(options)?;
            Ok(Arc::new(ReplacePlugin::new(options, env)) as SharedPlugin)
        })
        .register("banner", |options, _| {
            let options: BannerOptions = parse_options(options)?;
            Ok(Arc::new(BannerPlugin::new(options)) as SharedPlugin)
        })
        .register("minify", |options, _| {
            let options: MinifyOptions = parse_options(options)?;
            Ok(Arc::new(MinifyPlugin::new(options)) as SharedPlugin)
        });
}

/// Deserialize plugin options; a missing table means defaults.
pub fn parse_options<T>(options: &Value) -> anyhow::Result<T>
where
    T: DeserializeOwned + Default,
{
    if options.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(options.clone()).context("options do not match the expected shape")
}
