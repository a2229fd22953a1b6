use async_trait::async_trait;
use serde::Deserialize;

use crate::output::LineMap;
use crate::plugins::{ChunkInfo, HookResult, Plugin, PluginContext, RenderedChunk};

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MinifyOptions {
    /// Keep `/*! ... */` and `//!` comments
    pub preserve_license: bool,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            preserve_license: true,
        }
    }
}

/// Line-level compactor for production builds.
///
/// Drops whole-line `//` comments, blank lines and leading indentation, and
/// reports which input line each kept line came from. It never rewrites the
/// inside of a line. Lines that start inside a multi-line template literal
/// are kept verbatim; backticks are counted naively, so one inside a string
/// or comment can throw that tracking off.
#[derive(Debug)]
pub struct MinifyPlugin {
    options: MinifyOptions,
}

impl MinifyPlugin {
    pub fn new(options: MinifyOptions) -> Self {
        Self { options }
    }

    fn compact(&self, code: &str) -> (String, LineMap) {
        let mut out = String::with_capacity(code.len());
        let mut lines = LineMap::new();
        let mut in_template = false;

        for (index, raw) in code.lines().enumerate() {
            let line = if in_template {
                raw
            } else {
                let line = raw.trim_start();
                if line.is_empty() {
                    continue;
                }
                if line.starts_with("//")
                    && !(self.options.preserve_license && line.starts_with("//!"))
                {
                    continue;
                }
                line
            };
            in_template ^= unescaped_backticks(line) % 2 == 1;
            let line = if in_template { line } else { line.trim_end() };

            out.push_str(line);
            out.push('\n');
            lines.push(u32::try_from(index).ok());
        }
        (out, lines)
    }
}

fn unescaped_backticks(line: &str) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for c in line.chars() {
        match c {
            '\\' => escaped = !escaped,
            '`' if !escaped => count += 1,
            _ => escaped = false,
        }
    }
    count
}

#[async_trait]
impl Plugin for MinifyPlugin {
    fn name(&self) -> &str {
        "minify"
    }

    async fn render_chunk(
        &self,
        code: &str,
        _chunk: ChunkInfo<'_>,
        _ctx: &PluginContext,
    ) -> HookResult<Option<RenderedChunk>> {
        let (code, lines) = self.compact(code);
        Ok(Some(RenderedChunk::new(code).with_lines(lines)))
    }
}
