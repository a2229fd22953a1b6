//! bale plugin for stylesheets imported from JavaScript
//!
//! `import './app.css'` statements are removed from the module during
//! `transform` and the referenced files are read relative to the importer.
//! During `generate_bundle` the collected stylesheets are concatenated in
//! import order and emitted next to each bundle (`bundle.css` by default).
//!
//! Removed imports leave an empty line behind, so line numbers of the module
//! do not move.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bale_bundler::PluginRegistry;
//!
//! let mut registry = PluginRegistry::with_builtins();
//! bale_plugin_css::register(&mut registry);
//! ```
//!
//! ```toml
//! plugins = [{ name = "css", options = { output = "bundle.css", minify = true } }]
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use anyhow::Context;
use async_trait::async_trait;
use bale_bundler::{
    EmittedAsset, HookResult, OutputBundle, Plugin, PluginContext, PluginRegistry, SharedPlugin,
    builtins::parse_options,
};
use lightningcss::{
    printer::PrinterOptions,
    stylesheet::{MinifyOptions, ParserOptions, StyleSheet},
};
use parking_lot::Mutex;
use regex::Regex;
use tracing::debug;

mod config;
pub use config::CssPluginOptions;

/// Name the plugin is registered under.
pub const PLUGIN_NAME: &str = "css";

static CSS_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*import[ \t]+['"]([^'"]+\.css)['"][ \t]*;?[ \t]*$"#)
        .expect("css import pattern is valid")
});

/// Register the `css` factory.
pub fn register(registry: &mut PluginRegistry) {
    registry.register(PLUGIN_NAME, |options, _| {
        let options: CssPluginOptions = parse_options(options)?;
        anyhow::ensure!(!options.output.trim().is_empty(), "`output` cannot be empty");
        Ok(Arc::new(CssPlugin::with_options(options)) as SharedPlugin)
    });
}

/// Collects CSS imported by the entry module and emits it as one asset.
#[derive(Debug, Default)]
pub struct CssPlugin {
    options: CssPluginOptions,
    /// Stylesheets in first-import order
    styles: Mutex<Vec<(PathBuf, String)>>,
}

impl CssPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CssPluginOptions) -> Self {
        Self {
            options,
            styles: Mutex::new(Vec::new()),
        }
    }

    /// Check if a file should be processed based on include/exclude patterns
    fn should_process(&self, path: &str) -> bool {
        if self
            .options
            .exclude
            .iter()
            .any(|pattern| path.contains(pattern.as_str()))
        {
            return false;
        }

        self.options.include.is_empty()
            || self
                .options
                .include
                .iter()
                .any(|pattern| path.contains(pattern.as_str()))
    }

    fn stylesheet(&self) -> anyhow::Result<Option<String>> {
        let styles = self.styles.lock();
        if styles.is_empty() {
            return Ok(None);
        }

        let joined = styles
            .iter()
            .map(|(_, css)| css.trim_end())
            .collect::<Vec<_>>()
            .join("\n");

        if !self.options.minify {
            return Ok(Some(format!("{joined}\n")));
        }
        minify_css(&self.options.output, &joined).map(Some)
    }
}

fn minify_css(filename: &str, source: &str) -> anyhow::Result<String> {
    let mut stylesheet = StyleSheet::parse(
        source,
        ParserOptions {
            filename: filename.to_string(),
            ..Default::default()
        },
    )
    .map_err(|e| anyhow::anyhow!("Failed to parse CSS for {filename}: {e:?}"))?;

    stylesheet
        .minify(MinifyOptions::default())
        .map_err(|e| anyhow::anyhow!("Failed to minify CSS for {filename}: {e:?}"))?;

    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .map_err(|e| anyhow::anyhow!("Failed to print CSS for {filename}: {e:?}"))?;

    Ok(result.code)
}

fn resolve_import(specifier: &str, importer: &Path, cwd: &Path) -> PathBuf {
    if specifier.starts_with("./") || specifier.starts_with("../") {
        importer.parent().unwrap_or(cwd).join(specifier)
    } else {
        cwd.join(specifier)
    }
}

#[async_trait]
impl Plugin for CssPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    async fn build_start(&self, _ctx: &PluginContext) -> HookResult<()> {
        self.styles.lock().clear();
        Ok(())
    }

    async fn transform(
        &self,
        code: &str,
        id: &Path,
        ctx: &PluginContext,
    ) -> HookResult<Option<String>> {
        let mut out = String::with_capacity(code.len());
        let mut last = 0;

        for caps in CSS_IMPORT.captures_iter(code) {
            let (Some(statement), Some(specifier)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let path = resolve_import(specifier.as_str(), id, ctx.cwd());
            if !self.should_process(&path.to_string_lossy()) {
                debug!(path = %path.display(), "skipping excluded stylesheet");
                continue;
            }

            let css = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read CSS file: {}", path.display()))?;
            debug!(path = %path.display(), bytes = css.len(), "collected stylesheet");

            {
                let mut styles = self.styles.lock();
                if !styles.iter().any(|(seen, _)| seen == &path) {
                    styles.push((path, css));
                }
            }

            out.push_str(&code[last..statement.start()]);
            last = statement.end();
        }

        if last == 0 {
            return Ok(None);
        }
        out.push_str(&code[last..]);
        Ok(Some(out))
    }

    async fn generate_bundle(&self, bundle: &OutputBundle, ctx: &PluginContext) -> HookResult<()> {
        if let Some(css) = self.stylesheet()? {
            debug!(
                bundle = %bundle.file.display(),
                output = %self.options.output,
                "emitting stylesheet"
            );
            ctx.emit_asset(EmittedAsset::new(self.options.output.clone(), css));
        }
        Ok(())
    }
}
