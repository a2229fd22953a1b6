//! Shared test utilities for bale-bundler tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;
use bale_bundler::{
    ChunkInfo, EmittedAsset, Hook, HookResult, OutputBundle, Plugin, PluginContext,
    PluginRegistry, RenderedChunk, SharedPlugin,
};
use parking_lot::Mutex;
use tempfile::TempDir;

/// Temporary project with an entry module at `src/main.js`.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new(entry_source: &str) -> Self {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir_all(dir.path().join("src")).expect("create src");
        fs::write(dir.path().join("src/main.js"), entry_source).expect("write entry");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("failed to read {relative}: {e}"))
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, contents).expect("write file");
    }
}

/// Hook calls observed across plugins, as `plugin:hook` strings.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Records every hook it sees and otherwise does nothing.
pub struct Recorder {
    pub name: String,
    pub log: CallLog,
}

impl Recorder {
    pub fn shared(name: &str, log: &CallLog) -> SharedPlugin {
        Arc::new(Self {
            name: name.to_string(),
            log: Arc::clone(log),
        })
    }

    fn record(&self, hook: Hook) {
        self.log.lock().push(format!("{}:{}", self.name, hook));
    }
}

#[async_trait]
impl Plugin for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn build_start(&self, _ctx: &PluginContext) -> HookResult<()> {
        self.record(Hook::BuildStart);
        Ok(())
    }

    async fn resolve_id(
        &self,
        _specifier: &str,
        _importer: Option<&Path>,
        _ctx: &PluginContext,
    ) -> HookResult<Option<PathBuf>> {
        self.record(Hook::ResolveId);
        Ok(None)
    }

    async fn load(&self, _id: &Path, _ctx: &PluginContext) -> HookResult<Option<String>> {
        self.record(Hook::Load);
        Ok(None)
    }

    async fn transform(
        &self,
        _code: &str,
        _id: &Path,
        _ctx: &PluginContext,
    ) -> HookResult<Option<String>> {
        self.record(Hook::Transform);
        Ok(None)
    }

    async fn build_end(&self, _ctx: &PluginContext) -> HookResult<()> {
        self.record(Hook::BuildEnd);
        Ok(())
    }

    async fn render_chunk(
        &self,
        _code: &str,
        _chunk: ChunkInfo<'_>,
        _ctx: &PluginContext,
    ) -> HookResult<Option<RenderedChunk>> {
        self.record(Hook::RenderChunk);
        Ok(None)
    }

    async fn generate_bundle(&self, _bundle: &OutputBundle, _ctx: &PluginContext) -> HookResult<()> {
        self.record(Hook::GenerateBundle);
        Ok(())
    }

    async fn write_bundle(&self, _bundle: &OutputBundle, _ctx: &PluginContext) -> HookResult<()> {
        self.record(Hook::WriteBundle);
        Ok(())
    }
}

/// Appends a marker comment in `transform` so chaining is visible.
pub struct Tag(pub &'static str);

#[async_trait]
impl Plugin for Tag {
    fn name(&self) -> &str {
        self.0
    }

    async fn transform(
        &self,
        code: &str,
        _id: &Path,
        _ctx: &PluginContext,
    ) -> HookResult<Option<String>> {
        Ok(Some(format!("{code}// {}\n", self.0)))
    }
}

/// Fails in `write_bundle` once it sees a target whose file name contains `needle`.
pub struct FailOnWrite {
    pub needle: &'static str,
}

#[async_trait]
impl Plugin for FailOnWrite {
    fn name(&self) -> &str {
        "fail-on-write"
    }

    async fn write_bundle(&self, bundle: &OutputBundle, _ctx: &PluginContext) -> HookResult<()> {
        if bundle.file.to_string_lossy().contains(self.needle) {
            bail!("refusing to finish {}", bundle.file.display());
        }
        Ok(())
    }
}

/// Emits a fixed asset from `generate_bundle`.
pub struct EmitAsset {
    pub file_name: &'static str,
    pub contents: &'static str,
}

#[async_trait]
impl Plugin for EmitAsset {
    fn name(&self) -> &str {
        "emit-asset"
    }

    async fn generate_bundle(&self, _bundle: &OutputBundle, ctx: &PluginContext) -> HookResult<()> {
        ctx.emit_asset(EmittedAsset::new(self.file_name, self.contents));
        Ok(())
    }
}

/// A plugin with no hooks, standing in for third-party plugins by name.
pub struct Stub(pub String);

#[async_trait]
impl Plugin for Stub {
    fn name(&self) -> &str {
        &self.0
    }
}

/// Built-ins plus `babel`, `serve` and `uglify` stand-ins.
pub fn demo_registry() -> PluginRegistry {
    let mut registry = PluginRegistry::with_builtins();
    for name in ["babel", "serve", "uglify"] {
        registry.register(name, move |_, _| Ok(Arc::new(Stub(name.to_string())) as SharedPlugin));
    }
    registry
}
