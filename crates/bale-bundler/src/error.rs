use std::fmt;
use std::path::PathBuf;

use bale_config::ConfigError;

/// Plugin hook a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    BuildStart,
    ResolveId,
    Load,
    Transform,
    BuildEnd,
    RenderChunk,
    GenerateBundle,
    WriteBundle,
}

impl Hook {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hook::BuildStart => "buildStart",
            Hook::ResolveId => "resolveId",
            Hook::Load => "load",
            Hook::Transform => "transform",
            Hook::BuildEnd => "buildEnd",
            Hook::RenderChunk => "renderChunk",
            Hook::GenerateBundle => "generateBundle",
            Hook::WriteBundle => "writeBundle",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plugin hook returned an error.
#[derive(Debug, thiserror::Error)]
#[error("plugin `{plugin}` failed in {hook}: {source}")]
pub struct PluginError {
    pub plugin: String,
    pub hook: Hook,
    #[source]
    pub source: anyhow::Error,
}

/// Error types for pipeline runs.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// I/O error with the file involved.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }

    /// Name of the plugin involved, if any.
    pub fn plugin(&self) -> Option<&str> {
        match self {
            BuildError::Plugin(err) => Some(&err.plugin),
            _ => None,
        }
    }
}

/// Result type alias for bale-bundler operations.
pub type Result<T> = std::result::Result<T, BuildError>;
