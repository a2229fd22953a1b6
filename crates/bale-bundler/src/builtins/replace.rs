use std::path::Path;

use async_trait::async_trait;
use bale_config::Environment;
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;

use crate::plugins::{HookResult, Plugin, PluginContext};

const NODE_ENV_KEY: &str = "process.env.NODE_ENV";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplaceOptions {
    /// Identifier path → replacement code, inserted verbatim
    pub values: IndexMap<String, String>,
}

/// Replaces identifier paths such as `process.env.NODE_ENV` with literal code.
///
/// `process.env.NODE_ENV` defaults to the build mode as a string literal.
/// Matches respect identifier boundaries and skip member accesses, so
/// `process.env.NODE_ENV_X` and `process.env.NODE_ENV.length` are untouched.
#[derive(Debug)]
pub struct ReplacePlugin {
    values: IndexMap<String, String>,
    pattern: Option<Regex>,
}

impl ReplacePlugin {
    pub fn new(options: ReplaceOptions, env: &Environment) -> Self {
        let mut values = options.values;
        if !values.contains_key(NODE_ENV_KEY) {
            values.insert(
                NODE_ENV_KEY.to_string(),
                serde_json::Value::from(env.mode().as_str()).to_string(),
            );
        }

        // Longest keys first so `a.b.c` wins over `a.b`.
        let mut keys: Vec<&str> = values.keys().map(String::as_str).collect();
        keys.sort_by_key(|key| std::cmp::Reverse(key.len()));
        let alternation = keys
            .iter()
            .map(|key| regex::escape(key))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"\b(?:{alternation})\b")).ok();

        Self { values, pattern }
    }

    fn replace(&self, code: &str) -> Option<String> {
        let pattern = self.pattern.as_ref()?;
        let mut out = String::with_capacity(code.len());
        let mut last = 0;
        let mut changed = false;

        for found in pattern.find_iter(code) {
            let rest = &code[found.end()..];
            let preceded_by_dot = code[..found.start()].ends_with('.');
            if rest.starts_with('.') || rest.starts_with('$') || preceded_by_dot {
                continue;
            }
            if let Some(value) = self.values.get(found.as_str()) {
                out.push_str(&code[last..found.start()]);
                out.push_str(value);
                last = found.end();
                changed = true;
            }
        }

        changed.then(|| {
            out.push_str(&code[last..]);
            out
        })
    }
}

#[async_trait]
impl Plugin for ReplacePlugin {
    fn name(&self) -> &str {
        "replace"
    }

    async fn transform(
        &self,
        code: &str,
        _id: &Path,
        _ctx: &PluginContext,
    ) -> HookResult<Option<String>> {
        Ok(self.replace(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bale_config::Mode;

    fn plugin(values: &[(&str, &str)], mode: Mode) -> ReplacePlugin {
        let options = ReplaceOptions {
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };
        ReplacePlugin::new(options, &Environment::new(mode))
    }

    #[test]
    fn node_env_defaults_to_the_mode() {
        let replace = plugin(&[], Mode::Production);
        assert_eq!(
            replace
                .replace("if (process.env.NODE_ENV !== 'production') warn();")
                .unwrap(),
            "if (\"production\" !== 'production') warn();"
        );
    }

    #[test]
    fn explicit_values_override_the_default() {
        let replace = plugin(
            &[("process.env.NODE_ENV", "'dev'"), ("__VERSION__", "\"1.0.0\"")],
            Mode::Production,
        );
        assert_eq!(
            replace.replace("log(process.env.NODE_ENV, __VERSION__)").unwrap(),
            "log('dev', \"1.0.0\")"
        );
    }

    #[test]
    fn respects_identifier_and_member_boundaries() {
        let replace = plugin(&[("DEBUG", "false")], Mode::Development);
        assert!(replace.replace("const DEBUG_LEVEL = 1; config.DEBUG; DEBUG.x").is_none());
        assert_eq!(replace.replace("if (DEBUG) {}").unwrap(), "if (false) {}");
    }

    #[test]
    fn untouched_code_reports_no_change() {
        let replace = plugin(&[], Mode::Development);
        assert!(replace.replace("console.log('hi');").is_none());
    }
}
