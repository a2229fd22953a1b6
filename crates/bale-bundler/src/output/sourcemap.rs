//! v3 sourcemaps for wrapped output.

use std::path::{Component, Path, PathBuf};

use oxc_sourcemap::SourceMapBuilder;

use super::format::line_count;

/// Where each line of a piece of code came from.
///
/// Entry `i` is the line of the previous stage that line `i` was produced
/// from, or `None` for a line with no origin (wrapper code, banners).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineMap(Vec<Option<u32>>);

impl LineMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line maps to itself.
    pub fn identity(lines: u32) -> Self {
        Self((0..lines).map(Some).collect())
    }

    /// Map for `code` whose lines are unchanged from the previous stage.
    pub fn unchanged(code: &str) -> Self {
        Self::identity(lines_in(code))
    }

    pub fn push(&mut self, origin: Option<u32>) {
        self.0.push(origin);
    }

    /// Append `count` lines without an origin.
    pub fn push_generated(&mut self, count: u32) {
        self.0.extend((0..count).map(|_| None));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Origin of output line `line`.
    pub fn origin(&self, line: usize) -> Option<u32> {
        self.0.get(line).copied().flatten()
    }

    /// Follow each origin through `earlier`, the map of the stage before this one.
    pub fn compose(&self, earlier: &LineMap) -> LineMap {
        LineMap(
            self.0
                .iter()
                .map(|origin| origin.and_then(|line| earlier.origin(line as usize)))
                .collect(),
        )
    }

    fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.iter().enumerate().filter_map(|(dst, origin)| {
            let dst = u32::try_from(dst).ok()?;
            origin.map(|src| (dst, src))
        })
    }
}

/// Number of lines in `text`, counting a final line without a newline.
pub fn lines_in(text: &str) -> u32 {
    line_count(text) + u32::from(!text.is_empty() && !text.ends_with('\n'))
}

/// Build a line map from the rendered bundle back to the entry module.
///
/// `lines` gives the entry line of every bundle line. Lines without an origin,
/// or pointing past the end of `source`, get no segment. Every segment starts
/// at column 0. The entry source is embedded as `sourcesContent`.
pub fn line_map(bundle_file: &Path, entry: &Path, source: &str, lines: &LineMap) -> String {
    let dir = bundle_file.parent().unwrap_or(Path::new(""));
    let source_name = relative_path(entry, dir);

    let mut builder = SourceMapBuilder::default();
    if let Some(file) = bundle_file.file_name().and_then(|f| f.to_str()) {
        builder.set_file(file);
    }
    let source_id = builder.set_source_and_content(&to_slash(&source_name), source);

    let source_lines = lines_in(source);
    for (dst, src) in lines.iter().filter(|&(_, src)| src < source_lines) {
        builder.add_token(dst, 0, src, 0, Some(source_id), None);
    }

    builder.into_sourcemap().to_json_string()
}

/// Comment appended to a bundle that has a sourcemap next to it.
pub fn mapping_comment(map_file: &Path) -> String {
    let name = map_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("//# sourceMappingURL={name}\n")
}

/// `path` relative to `base`. Both are expected to be absolute and clean.
fn relative_path(path: &Path, base: &Path) -> PathBuf {
    let path_parts: Vec<Component> = path.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }
    relative
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
