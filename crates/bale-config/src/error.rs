//! Error types for configuration loading, resolution and validation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required field is absent or empty.
    #[error("missing required field `{field}`\n\nHint: {hint}")]
    MissingField { field: String, hint: String },

    /// A umd target exposes exports but has nowhere to put them.
    #[error(
        "output target '{}' uses the umd format but has no `name`\n\nHint: set `name` to the browser global, or `exports = \"none\"` if the bundle exposes nothing",
        .file.display()
    )]
    MissingGlobalName { file: PathBuf },

    #[error("invalid value for `{field}`: {message}")]
    InvalidValue { field: String, message: String },

    #[error("invalid plugin entry at index {index}: {reason}")]
    InvalidPluginEntry { index: usize, reason: String },

    #[error("unknown plugin `{name}`\n\nHint: registered plugins are: {available}")]
    UnknownPlugin { name: String, available: String },

    #[error("invalid options for plugin `{name}`: {message}")]
    InvalidPluginOptions { name: String, message: String },

    #[error("conflicting fields `{first}` and `{second}`\n\nHint: {hint}")]
    ConflictingFields {
        first: String,
        second: String,
        hint: String,
    },

    // Filesystem validation errors (CLI use)
    #[error("entry module not found: {}", .path.display())]
    EntryNotFound { path: PathBuf },

    // Config discovery / parsing errors
    #[error("no bale.toml, bale.config.json or package.json `bale` field in {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to parse {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("invalid override in profile `{profile}`: {message}")]
    InvalidProfileOverride { profile: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn missing(field: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            hint: hint.into(),
        }
    }

    pub(crate) fn parse(origin: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            origin: origin.into(),
            message: err.to_string(),
        }
    }
}
