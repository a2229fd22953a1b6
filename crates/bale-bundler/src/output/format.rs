//! Module format wrappers.
//!
//! The entry module is emitted as-is inside a wrapper chosen by the target's
//! format. Module code is never re-indented, so every source line keeps its
//! columns and only moves down by [`Wrapped::header_lines`].

use bale_config::{ExportsMode, OutputFormat, OutputTarget};

use super::sourcemap::{LineMap, lines_in};

/// Wrapped output for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapped {
    pub code: String,
    /// Lines emitted before the first line of module code
    pub header_lines: u32,
    /// Origin of every line of `code` in the module body
    pub lines: LineMap,
}

/// Wrap `body` for `target`, adding its banner and footer outside the wrapper.
pub fn wrap(body: &str, target: &OutputTarget) -> Wrapped {
    let (prefix, suffix) = wrapper(target);

    let mut header = String::new();
    if let Some(banner) = target.banner.as_deref().filter(|b| !b.is_empty()) {
        header.push_str(banner.trim_end_matches('\n'));
        header.push('\n');
    }
    header.push_str(&prefix);

    let mut code = String::with_capacity(header.len() + body.len() + suffix.len() + 1);
    code.push_str(&header);
    code.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        code.push('\n');
    }
    code.push_str(&suffix);

    if let Some(footer) = target.footer.as_deref().filter(|f| !f.is_empty()) {
        code.push_str(footer.trim_end_matches('\n'));
        code.push('\n');
    }

    let header_lines = line_count(&header);
    let body_lines = lines_in(body);
    let mut lines = LineMap::new();
    lines.push_generated(header_lines);
    for line in 0..body_lines {
        lines.push(Some(line));
    }
    lines.push_generated(lines_in(&code).saturating_sub(header_lines + body_lines));

    Wrapped {
        code,
        header_lines,
        lines,
    }
}

fn wrapper(target: &OutputTarget) -> (String, String) {
    let name = target.global_name();
    let exposes = target.exports != ExportsMode::None;

    match target.format {
        OutputFormat::Esm => (String::new(), String::new()),
        OutputFormat::Cjs => ("'use strict';\n\n".to_string(), String::new()),
        OutputFormat::Iife => {
            let open = match name.filter(|_| exposes) {
                Some(name) => format!("var {name} = (function () {{\n'use strict';\n\n"),
                None => "(function () {\n'use strict';\n\n".to_string(),
            };
            (open, "})();\n".to_string())
        }
        OutputFormat::Amd => (
            "define((function () { 'use strict';\n\n".to_string(),
            "}));\n".to_string(),
        ),
        OutputFormat::Umd => match name.filter(|_| exposes) {
            Some(name) => (
                format!(
                    "(function (global, factory) {{\n\
                     typeof exports === 'object' && typeof module !== 'undefined' ? module.exports = factory() :\n\
                     typeof define === 'function' && define.amd ? define(factory) :\n\
                     (global = typeof globalThis !== 'undefined' ? globalThis : global || self, global.{name} = factory());\n\
                     }})(this, (function () {{ 'use strict';\n\n"
                ),
                "}));\n".to_string(),
            ),
            None => (
                "(function (factory) {\n\
                 typeof define === 'function' && define.amd ? define(factory) :\n\
                 factory();\n\
                 })((function () { 'use strict';\n\n"
                    .to_string(),
                "}));\n".to_string(),
            ),
        },
    }
}

pub(crate) fn line_count(text: &str) -> u32 {
    u32::try_from(text.matches('\n').count()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "console.log('hi');";

    #[test]
    fn esm_is_untouched() {
        let target = OutputTarget::new("bundle.js", OutputFormat::Esm);
        let wrapped = wrap(BODY, &target);
        assert_eq!(wrapped.code, "console.log('hi');\n");
        assert_eq!(wrapped.header_lines, 0);
    }

    #[test]
    fn cjs_adds_strict_mode() {
        let target = OutputTarget::new("bundle.cjs", OutputFormat::Cjs);
        let wrapped = wrap(BODY, &target);
        assert!(wrapped.code.starts_with("'use strict';\n\nconsole.log"));
        assert_eq!(wrapped.header_lines, 2);
    }

    #[test]
    fn iife_assigns_the_global_name() {
        let target = OutputTarget::new("bundle.js", OutputFormat::Iife).with_name("App");
        let wrapped = wrap(BODY, &target);
        assert!(wrapped.code.starts_with("var App = (function () {"));
        assert!(wrapped.code.ends_with("})();\n"));
        assert_eq!(wrapped.header_lines, 3);
    }

    #[test]
    fn umd_exposes_global_and_module_exports() {
        let target = OutputTarget::new("bundle.js", OutputFormat::Umd).with_name("App");
        let wrapped = wrap(BODY, &target);
        assert!(wrapped.code.contains("global.App = factory()"));
        assert!(wrapped.code.contains("module.exports = factory()"));
        let first_body_line = wrapped.code.lines().nth(wrapped.header_lines as usize);
        assert_eq!(first_body_line, Some(BODY));
    }

    #[test]
    fn umd_without_exports_only_runs_the_factory() {
        let target = OutputTarget::new("bundle.js", OutputFormat::Umd)
            .with_exports(ExportsMode::None);
        let wrapped = wrap(BODY, &target);
        assert!(!wrapped.code.contains("global."));
        assert_eq!(
            wrapped.code.lines().nth(wrapped.header_lines as usize),
            Some(BODY)
        );
    }

    #[test]
    fn banner_and_footer_sit_outside_the_wrapper() {
        let mut target = OutputTarget::new("bundle.js", OutputFormat::Amd);
        target.banner = Some("/* top */".into());
        target.footer = Some("/* bottom */\n".into());
        let wrapped = wrap(BODY, &target);

        assert!(wrapped.code.starts_with("/* top */\ndefine("));
        assert!(wrapped.code.ends_with("}));\n/* bottom */\n"));
        assert_eq!(wrapped.header_lines, 3);
    }

    #[test]
    fn line_origins_cover_the_whole_wrapper() {
        let target = OutputTarget::new("bundle.js", OutputFormat::Iife);
        let wrapped = wrap("a();\nb();", &target);

        assert_eq!(wrapped.lines.len(), wrapped.code.lines().count());
        assert_eq!(wrapped.lines.origin(2), None);
        assert_eq!(wrapped.lines.origin(3), Some(0));
        assert_eq!(wrapped.lines.origin(4), Some(1));
        assert_eq!(wrapped.lines.origin(5), None);
    }
}
