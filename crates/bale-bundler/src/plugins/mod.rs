//! Plugin protocol for bale-bundler.
//!
//! A plugin is a named value implementing any subset of the [`Plugin`] hooks.
//! Every hook has a default that does nothing, so the pipeline only sees the
//! behaviour a plugin actually overrides. Hooks run strictly one after another
//! in declared plugin order.
//!
//! ```text
//! buildStart → resolveId → load → transform → buildEnd
//!     └─ per output target: renderChunk → generateBundle → (write) → writeBundle
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bale_config::OutputTarget;

use crate::output::LineMap;

mod context;
pub mod registry;

pub use context::{BackgroundTask, BuildWarning, EmittedAsset, PluginContext};
pub use registry::{PluginFactory, PluginRegistry};

/// Result returned by plugin hooks. Failures are wrapped into
/// [`PluginError`](crate::PluginError) with the plugin and hook name.
pub type HookResult<T> = anyhow::Result<T>;

pub type SharedPlugin = Arc<dyn Plugin>;

/// One slot of a resolved plugin list; `None` is a falsy placeholder.
pub type PluginEntry = Option<SharedPlugin>;

/// The module the pipeline is rendering a target from.
#[derive(Debug, Clone, Copy)]
pub struct ChunkInfo<'a> {
    /// Resolved id of the entry module
    pub entry: &'a Path,
    pub target: &'a OutputTarget,
}

/// Code returned by a `render_chunk` hook.
///
/// A hook that adds, removes or reorders lines reports where each of its
/// output lines came from in its input, so sourcemaps stay correct. Without
/// `lines` the layout is assumed unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChunk {
    pub code: String,
    pub lines: Option<LineMap>,
}

impl RenderedChunk {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            lines: None,
        }
    }

    pub fn with_lines(mut self, lines: LineMap) -> Self {
        self.lines = Some(lines);
        self
    }
}

impl From<String> for RenderedChunk {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

/// One rendered output target, handed to `generate_bundle` and `write_bundle`.
#[derive(Debug, Clone)]
pub struct OutputBundle {
    pub target: OutputTarget,
    /// Absolute destination of the bundle
    pub file: PathBuf,
    pub code: String,
    /// Serialized v3 sourcemap, when the target asks for one
    pub map: Option<String>,
    /// Assets emitted for this target, in emission order
    pub assets: Vec<EmittedAsset>,
}

impl OutputBundle {
    /// Directory the bundle and its assets are written to.
    pub fn dir(&self) -> &Path {
        self.file.parent().unwrap_or(Path::new(""))
    }
}

#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    async fn build_start(&self, _ctx: &PluginContext) -> HookResult<()> {
        Ok(())
    }

    /// Resolve a specifier to a module id. The first plugin returning `Some` wins.
    async fn resolve_id(
        &self,
        _specifier: &str,
        _importer: Option<&Path>,
        _ctx: &PluginContext,
    ) -> HookResult<Option<PathBuf>> {
        Ok(None)
    }

    /// Provide the source for a module id. The first plugin returning `Some` wins.
    async fn load(&self, _id: &Path, _ctx: &PluginContext) -> HookResult<Option<String>> {
        Ok(None)
    }

    /// Rewrite module source. `None` leaves the code as it was; the next
    /// plugin sees whatever the previous one produced.
    async fn transform(
        &self,
        _code: &str,
        _id: &Path,
        _ctx: &PluginContext,
    ) -> HookResult<Option<String>> {
        Ok(None)
    }

    async fn build_end(&self, _ctx: &PluginContext) -> HookResult<()> {
        Ok(())
    }

    /// Rewrite the wrapped output of one target. Chained like `transform`.
    async fn render_chunk(
        &self,
        _code: &str,
        _chunk: ChunkInfo<'_>,
        _ctx: &PluginContext,
    ) -> HookResult<Option<RenderedChunk>> {
        Ok(None)
    }

    /// Called once per target before anything is written. Extra files are
    /// added with [`PluginContext::emit_asset`].
    async fn generate_bundle(&self, _bundle: &OutputBundle, _ctx: &PluginContext) -> HookResult<()> {
        Ok(())
    }

    /// Called once per target after its files are on disk.
    async fn write_bundle(&self, _bundle: &OutputBundle, _ctx: &PluginContext) -> HookResult<()> {
        Ok(())
    }
}
