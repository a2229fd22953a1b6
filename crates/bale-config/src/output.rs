//! Output target declarations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::env::Toggle;

/// Module format of an emitted bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ES module (also accepted as `es` or `module`)
    #[serde(alias = "es", alias = "module")]
    Esm,
    /// CommonJS (also accepted as `commonjs`)
    #[serde(alias = "commonjs")]
    Cjs,
    /// Universal module definition: AMD, CommonJS and browser global
    Umd,
    /// Immediately invoked function expression for `<script>` tags
    Iife,
    /// AMD `define()` wrapper
    Amd,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Esm => "esm",
            OutputFormat::Cjs => "cjs",
            OutputFormat::Umd => "umd",
            OutputFormat::Iife => "iife",
            OutputFormat::Amd => "amd",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the bundle hands to its consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportsMode {
    #[default]
    Auto,
    Named,
    Default,
    /// Side effects only; nothing is exposed.
    None,
}

/// Either one value or an ordered list of them.
// `Many` is tried first: a struct whose fields all default would also accept `[]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, OneOrMany::Many(_))
    }
}

/// Output target as declared. Required fields are optional here so their
/// absence can be reported instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,

    /// Browser global for umd/iife bundles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub sourcemap: Toggle,

    #[serde(default)]
    pub exports: ExportsMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

/// A fully specified output target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub file: PathBuf,
    pub format: OutputFormat,
    pub name: Option<String>,
    pub sourcemap: bool,
    pub exports: ExportsMode,
    pub banner: Option<String>,
    pub footer: Option<String>,
}

impl OutputTarget {
    pub fn new(file: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            file: file.into(),
            format,
            name: None,
            sourcemap: false,
            exports: ExportsMode::Auto,
            banner: None,
            footer: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_sourcemap(mut self, sourcemap: bool) -> Self {
        self.sourcemap = sourcemap;
        self
    }

    pub fn with_exports(mut self, exports: ExportsMode) -> Self {
        self.exports = exports;
        self
    }

    /// Whether consumers reach this bundle through a global variable.
    /// The global name, if one is set and not blank.
    pub fn global_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }

    pub fn requires_global_name(&self) -> bool {
        self.format == OutputFormat::Umd && self.exports != ExportsMode::None
    }

    /// Path of the sourcemap written next to the bundle.
    pub fn sourcemap_file(&self) -> PathBuf {
        let mut name = self.file.as_os_str().to_os_string();
        name.push(".map");
        PathBuf::from(name)
    }
}
