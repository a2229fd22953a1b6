use async_trait::async_trait;
use serde::Deserialize;

use crate::output::LineMap;
use crate::output::sourcemap::lines_in;
use crate::plugins::{ChunkInfo, HookResult, Plugin, PluginContext, RenderedChunk};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BannerOptions {
    pub text: String,
}

/// Prepends a fixed comment to every rendered chunk.
///
/// Unlike the `banner` field of an output target, this runs inside the
/// render chain, so later plugins see it.
#[derive(Debug)]
pub struct BannerPlugin {
    banner: String,
}

impl BannerPlugin {
    pub fn new(options: BannerOptions) -> Self {
        let text = options.text.trim_end();
        let banner = if text.is_empty() || text.starts_with("/*") || text.starts_with("//") {
            text.to_string()
        } else {
            format!("/*! {text} */")
        };
        Self { banner }
    }
}

#[async_trait]
impl Plugin for BannerPlugin {
    fn name(&self) -> &str {
        "banner"
    }

    async fn render_chunk(
        &self,
        code: &str,
        _chunk: ChunkInfo<'_>,
        _ctx: &PluginContext,
    ) -> HookResult<Option<RenderedChunk>> {
        if self.banner.is_empty() {
            return Ok(None);
        }
        let mut lines = LineMap::new();
        lines.push_generated(lines_in(&self.banner));
        for line in 0..lines_in(code) {
            lines.push(Some(line));
        }
        Ok(Some(
            RenderedChunk::new(format!("{}\n{code}", self.banner)).with_lines(lines),
        ))
    }
}
