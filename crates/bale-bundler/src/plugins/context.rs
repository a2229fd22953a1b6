use std::future::Future;
use std::path::{Path, PathBuf};

use bale_config::Environment;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, warn};

/// A file produced by a plugin in addition to the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedAsset {
    /// Path relative to the directory of the bundle it belongs to
    pub file_name: String,
    pub source: Vec<u8>,
}

impl EmittedAsset {
    pub fn new(file_name: impl Into<String>, source: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildWarning {
    /// Plugin that raised the warning, if it came from a hook
    pub plugin: Option<String>,
    pub message: String,
}

/// Detached work started by a plugin, such as a development server.
///
/// The pipeline never awaits these. Whoever receives them from
/// [`BuildOutput`](crate::BuildOutput) decides how long the process lives.
#[derive(Debug)]
pub struct BackgroundTask {
    pub name: String,
    pub handle: JoinHandle<()>,
}

/// State shared by every hook of one build.
///
/// Hooks receive `&PluginContext`; anything they add goes through interior
/// mutability and is drained by the pipeline at well-defined points.
pub struct PluginContext {
    env: Environment,
    cwd: PathBuf,
    current: Mutex<Option<String>>,
    assets: Mutex<Vec<EmittedAsset>>,
    warnings: Mutex<Vec<BuildWarning>>,
    background: Mutex<Vec<BackgroundTask>>,
}

impl PluginContext {
    pub fn new(env: Environment, cwd: impl Into<PathBuf>) -> Self {
        Self {
            env,
            cwd: cwd.into(),
            current: Mutex::new(None),
            assets: Mutex::new(Vec::new()),
            warnings: Mutex::new(Vec::new()),
            background: Mutex::new(Vec::new()),
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Queue a file to be written next to the bundle of the current target.
    pub fn emit_asset(&self, asset: EmittedAsset) {
        self.assets.lock().push(asset);
    }

    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        let plugin = self.current.lock().clone();
        warn!(plugin = plugin.as_deref().unwrap_or("-"), "{message}");
        self.warnings.lock().push(BuildWarning { plugin, message });
    }

    /// Start a task that outlives the hook that spawned it.
    ///
    /// Must be called from within a tokio runtime. A task that fails is
    /// logged; its error does not reach the build.
    pub fn spawn_background<F>(&self, name: impl Into<String>, task: F)
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let name = name.into();
        let task_name = name.clone();
        let handle = tokio::spawn(async move {
            if let Err(err) = task.await {
                error!(task = %task_name, "background task failed: {err:#}");
            }
        });
        self.background.lock().push(BackgroundTask { name, handle });
    }

    pub(crate) fn enter(&self, plugin: &str) {
        *self.current.lock() = Some(plugin.to_string());
    }

    pub(crate) fn leave(&self) {
        *self.current.lock() = None;
    }

    pub(crate) fn take_assets(&self) -> Vec<EmittedAsset> {
        std::mem::take(&mut *self.assets.lock())
    }

    pub(crate) fn take_warnings(&self) -> Vec<BuildWarning> {
        std::mem::take(&mut *self.warnings.lock())
    }

    pub(crate) fn take_background(&self) -> Vec<BackgroundTask> {
        std::mem::take(&mut *self.background.lock())
    }
}

impl std::fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginContext")
            .field("env", &self.env)
            .field("cwd", &self.cwd)
            .finish_non_exhaustive()
    }
}
