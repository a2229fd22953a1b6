use serde::Deserialize;

/// Configuration options for the CSS plugin
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CssPluginOptions {
    /// File name of the emitted stylesheet, relative to the bundle
    pub output: String,

    /// Minify the emitted stylesheet with lightningcss
    pub minify: bool,

    /// Only handle stylesheets whose path contains one of these
    pub include: Vec<String>,

    /// Never handle stylesheets whose path contains one of these
    pub exclude: Vec<String>,
}

impl Default for CssPluginOptions {
    fn default() -> Self {
        Self {
            output: "bundle.css".to_string(),
            minify: false,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl CssPluginOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include.push(pattern.into());
        self
    }

    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }
}
