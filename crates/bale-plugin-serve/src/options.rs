//! Options accepted by the `serve` plugin.

use std::path::PathBuf;

use bale_bundler::bale_config::OneOrMany;
use serde::{Deserialize, Deserializer};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 10001;

/// Development server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ServeOptions {
    /// Interface to bind
    pub host: String,

    /// Port to listen on; `0` picks a free one. Numeric strings are accepted.
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,

    /// Directories served, searched in order. Relative entries resolve against
    /// the build's working directory; an empty list serves that directory.
    #[serde(alias = "content_base", deserialize_with = "deserialize_dirs")]
    pub content_base: Vec<PathBuf>,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            content_base: Vec::new(),
        }
    }
}

impl ServeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn content_base(mut self, dir: impl Into<PathBuf>) -> Self {
        self.content_base.push(dir.into());
        self
    }
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(port) => Ok(port),
        Port::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid port `{text}`"))),
    }
}

fn deserialize_dirs<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(OneOrMany::<PathBuf>::deserialize(deserializer)?.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let options: ServeOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options, ServeOptions::default());
        assert_eq!(options.host, "localhost");
        assert_eq!(options.port, 10001);
    }

    #[test]
    fn port_may_be_a_string() {
        let options: ServeOptions =
            serde_json::from_value(json!({ "port": "3000", "contentBase": ["./dist"] })).unwrap();
        assert_eq!(options.port, 3000);
        assert_eq!(options.content_base, vec![PathBuf::from("./dist")]);
    }

    #[test]
    fn single_content_base() {
        let options: ServeOptions =
            serde_json::from_value(json!({ "contentBase": "public" })).unwrap();
        assert_eq!(options.content_base, vec![PathBuf::from("public")]);
    }

    #[test]
    fn bad_port_is_rejected() {
        assert!(serde_json::from_value::<ServeOptions>(json!({ "port": "http" })).is_err());
        assert!(serde_json::from_value::<ServeOptions>(json!({ "port": 70000 })).is_err());
    }
}
