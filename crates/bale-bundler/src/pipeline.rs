//! Configuration loading and plugin-driven builds.

use std::future::Future;
use std::path::{Path, PathBuf};

use bale_config::{ConfigError, ConfigSource, Environment, ResolvedConfig, validate_targets};
use tracing::{debug, info, instrument, trace};

use crate::config::BuildConfig;
use crate::error::{BuildError, Hook, PluginError, Result};
use crate::output::sourcemap::{self, LineMap, lines_in};
use crate::output::{format, validate_output_path, write_files_atomic};
use crate::plugins::{
    BackgroundTask, BuildWarning, ChunkInfo, HookResult, OutputBundle, PluginContext, PluginEntry,
    PluginRegistry, SharedPlugin,
};

/// Everything a successful run produced.
#[derive(Debug)]
pub struct BuildOutput {
    /// One bundle per output target, in target order
    pub bundles: Vec<OutputBundle>,
    pub warnings: Vec<BuildWarning>,
    /// Detached tasks started by plugins; never awaited by the pipeline
    pub background: Vec<BackgroundTask>,
}

impl BuildOutput {
    pub fn bundle(&self, file: impl AsRef<Path>) -> Option<&OutputBundle> {
        let file = file.as_ref();
        self.bundles
            .iter()
            .find(|b| b.file == file || b.target.file == file)
    }
}

/// Loads configurations and runs plugin chains over them.
///
/// # Example
///
/// ```no_run
/// use bale_bundler::ConfigPipeline;
/// use bale_config::{ConfigSource, Environment};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let pipeline = ConfigPipeline::new(".");
/// let config = pipeline.load(&ConfigSource::file("bale.toml"), &Environment::from_env())?;
/// let output = pipeline.run(&config).await?;
/// println!("{} bundle(s)", output.bundles.len());
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct ConfigPipeline {
    registry: PluginRegistry,
    cwd: PathBuf,
}

impl ConfigPipeline {
    /// Pipeline with the built-in plugins registered.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self::with_registry(PluginRegistry::with_builtins(), cwd)
    }

    pub fn with_registry(registry: PluginRegistry, cwd: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            cwd: cwd.into(),
        }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PluginRegistry {
        &mut self.registry
    }

    /// Parse, resolve and validate a configuration, then instantiate its plugins.
    ///
    /// Conditions are evaluated against `env` exactly once; the returned
    /// config does not change afterwards.
    pub fn load(
        &self,
        source: &ConfigSource,
        env: &Environment,
    ) -> std::result::Result<BuildConfig, ConfigError> {
        let resolved = source.read()?.resolve(env)?;
        self.instantiate(resolved, env)
    }

    /// Instantiate the plugins of an already resolved configuration.
    pub fn instantiate(
        &self,
        resolved: ResolvedConfig,
        env: &Environment,
    ) -> std::result::Result<BuildConfig, ConfigError> {
        let plugins = resolved
            .plugins
            .iter()
            .map(|slot| match slot {
                Some(spec) => self.registry.create(spec, env).map(Some),
                None => Ok(None),
            })
            .collect::<std::result::Result<Vec<PluginEntry>, _>>()?;

        let cwd = match &resolved.cwd {
            Some(dir) => self.cwd.join(dir),
            None => self.cwd.clone(),
        };

        let config = BuildConfig {
            input: resolved.input,
            output: resolved.output,
            plugins,
            env: env.clone(),
            cwd,
        };
        debug!(plugins = ?config.plugin_names(), "configuration loaded");
        Ok(config)
    }

    /// Drop falsy entries, keeping the relative order of the rest.
    pub fn normalize_plugins(raw: &[PluginEntry]) -> Vec<SharedPlugin> {
        raw.iter().flatten().cloned().collect()
    }

    /// Run every plugin hook over the entry module and write each target.
    ///
    /// The configuration is checked against the schema rules first, so one
    /// assembled with [`BuildConfig::new`] fails before any hook runs.
    /// Targets are built one after another from the same transformed module.
    /// A failure stops the build; files of targets that were already written
    /// stay on disk.
    #[instrument(skip_all, fields(input = %config.input.display(), mode = %config.env.mode()))]
    pub async fn run(&self, config: &BuildConfig) -> Result<BuildOutput> {
        validate_targets(&config.input, &config.output)?;

        let ctx = PluginContext::new(config.env.clone(), config.cwd.clone());
        let plugins = Self::normalize_plugins(&config.plugins);
        info!(plugins = plugins.len(), targets = config.output.len(), "build started");

        match execute(config, &plugins, &ctx).await {
            Ok(bundles) => {
                info!(bundles = bundles.len(), "build finished");
                Ok(BuildOutput {
                    bundles,
                    warnings: ctx.take_warnings(),
                    background: ctx.take_background(),
                })
            }
            Err(err) => {
                for task in ctx.take_background() {
                    debug!(task = %task.name, "aborting background task after failed build");
                    task.handle.abort();
                }
                Err(err)
            }
        }
    }
}

async fn execute(
    config: &BuildConfig,
    plugins: &[SharedPlugin],
    ctx: &PluginContext,
) -> Result<Vec<OutputBundle>> {
    for plugin in plugins {
        invoke(ctx, plugin, Hook::BuildStart, plugin.build_start(ctx)).await?;
    }

    let specifier = config.input.to_string_lossy();
    let mut resolved = None;
    for plugin in plugins {
        let hook = plugin.resolve_id(&specifier, None, ctx);
        if let Some(id) = invoke(ctx, plugin, Hook::ResolveId, hook).await? {
            debug!(plugin = plugin.name(), id = %id.display(), "entry resolved by plugin");
            resolved = Some(config.resolve_path(&id));
            break;
        }
    }
    let entry = resolved.unwrap_or_else(|| config.resolve_path(&config.input));

    let mut loaded = None;
    for plugin in plugins {
        if let Some(source) = invoke(ctx, plugin, Hook::Load, plugin.load(&entry, ctx)).await? {
            debug!(plugin = plugin.name(), "entry loaded by plugin");
            loaded = Some(source);
            break;
        }
    }
    let source = match loaded {
        Some(source) => source,
        None => tokio::fs::read_to_string(&entry)
            .await
            .map_err(|e| BuildError::io(&entry, e))?,
    };

    let mut code = source.clone();
    for plugin in plugins {
        let hook = plugin.transform(&code, &entry, ctx);
        if let Some(next) = invoke(ctx, plugin, Hook::Transform, hook).await? {
            code = next;
        }
    }

    for plugin in plugins {
        invoke(ctx, plugin, Hook::BuildEnd, plugin.build_end(ctx)).await?;
    }

    let mut bundles = Vec::with_capacity(config.output.len());
    for target in &config.output {
        let file = config.resolve_path(&target.file);
        let wrapped = format::wrap(&code, target);

        let mut rendered = wrapped.code;
        let mut lines = wrapped.lines;
        for plugin in plugins {
            let chunk = ChunkInfo {
                entry: &entry,
                target,
            };
            let hook = plugin.render_chunk(&rendered, chunk, ctx);
            if let Some(next) = invoke(ctx, plugin, Hook::RenderChunk, hook).await? {
                lines = match &next.lines {
                    Some(map) => map.compose(&lines),
                    None if lines_in(&next.code) == lines_in(&rendered) => lines,
                    None => {
                        if target.sourcemap {
                            ctx.enter(plugin.name());
                            ctx.warn(format!(
                                "render_chunk changed the line layout of '{}' without a line map; its sourcemap loses those mappings",
                                target.file.display()
                            ));
                            ctx.leave();
                        }
                        let mut unknown = LineMap::new();
                        unknown.push_generated(lines_in(&next.code));
                        unknown
                    }
                };
                rendered = next.code;
            }
        }

        let map = target
            .sourcemap
            .then(|| sourcemap::line_map(&file, &entry, &source, &lines));
        if map.is_some() {
            if !rendered.is_empty() && !rendered.ends_with('\n') {
                rendered.push('\n');
            }
            rendered.push_str(&sourcemap::mapping_comment(&target.sourcemap_file()));
        }

        // Assets emitted before any target exists belong to the first one.
        let mut bundle = OutputBundle {
            target: target.clone(),
            file,
            code: rendered,
            map,
            assets: ctx.take_assets(),
        };

        for plugin in plugins {
            let hook = plugin.generate_bundle(&bundle, ctx);
            invoke(ctx, plugin, Hook::GenerateBundle, hook).await?;
        }
        bundle.assets.extend(ctx.take_assets());

        write_bundle(config, &bundle)?;
        info!(file = %bundle.file.display(), format = %target.format, "wrote bundle");

        for plugin in plugins {
            let hook = plugin.write_bundle(&bundle, ctx);
            invoke(ctx, plugin, Hook::WriteBundle, hook).await?;
        }
        bundles.push(bundle);
    }

    Ok(bundles)
}

fn write_bundle(config: &BuildConfig, bundle: &OutputBundle) -> Result<()> {
    let dir = bundle.dir().to_path_buf();
    let mut operations: Vec<(PathBuf, &[u8])> = vec![(bundle.file.clone(), bundle.code.as_bytes())];

    if let Some(map) = &bundle.map {
        let map_file = config.resolve_path(&bundle.target.sourcemap_file());
        operations.push((map_file, map.as_bytes()));
    }

    for asset in &bundle.assets {
        let path = validate_output_path(&dir, &asset.file_name)?;
        if operations.iter().any(|(existing, _)| existing == &path) {
            return Err(BuildError::InvalidOutputPath(format!(
                "asset '{}' would overwrite another file of this target",
                asset.file_name
            )));
        }
        operations.push((path, asset.source.as_slice()));
    }

    write_files_atomic(&operations)
}

async fn invoke<T, F>(ctx: &PluginContext, plugin: &SharedPlugin, hook: Hook, call: F) -> Result<T>
where
    F: Future<Output = HookResult<T>>,
{
    trace!(plugin = plugin.name(), %hook, "calling hook");
    ctx.enter(plugin.name());
    let result = call.await;
    ctx.leave();

    result.map_err(|source| {
        BuildError::Plugin(PluginError {
            plugin: plugin.name().to_string(),
            hook,
            source,
        })
    })
}
