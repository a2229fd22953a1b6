//! Build environment and the predicates evaluated against it.
//!
//! The environment is read once (normally from `NODE_ENV`) and passed into
//! [`RawConfig::resolve`](crate::RawConfig::resolve) explicitly. Nothing in this
//! crate looks at process state on its own except [`Environment::from_env`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Name of the process-wide variable selecting the build mode.
pub const MODE_ENV_VAR: &str = "NODE_ENV";

/// Build mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mode {
    #[default]
    Development,
    Production,
    Test,
    Custom(String),
}

impl Mode {
    pub fn as_str(&self) -> &str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
            Mode::Test => "test",
            Mode::Custom(name) => name,
        }
    }
}

impl From<&str> for Mode {
    fn from(value: &str) -> Self {
        match value.trim() {
            "production" => Mode::Production,
            "development" | "" => Mode::Development,
            "test" => Mode::Test,
            other => Mode::Custom(other.to_string()),
        }
    }
}

impl From<String> for Mode {
    fn from(value: String) -> Self {
        Mode::from(value.as_str())
    }
}

impl From<Mode> for String {
    fn from(value: Mode) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for Mode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Mode::from(s))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External state a configuration is resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Environment {
    mode: Mode,
}

impl Environment {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    /// Build from the raw value of `NODE_ENV`. Unset or blank means development.
    pub fn from_node_env(value: Option<&str>) -> Self {
        Self::new(value.map(Mode::from).unwrap_or_default())
    }

    /// Read `NODE_ENV` from the current process.
    pub fn from_env() -> Self {
        let value = std::env::var(MODE_ENV_VAR).ok();
        Self::from_node_env(value.as_deref())
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_production(&self) -> bool {
        self.mode == Mode::Production
    }
}

/// Predicate over the build mode, written `production` or `!production`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Condition {
    mode: Mode,
    negated: bool,
}

impl Condition {
    pub fn is(mode: Mode) -> Self {
        Self {
            mode,
            negated: false,
        }
    }

    pub fn not(mode: Mode) -> Self {
        Self {
            mode,
            negated: true,
        }
    }

    pub fn holds(&self, env: &Environment) -> bool {
        (env.mode() == &self.mode) != self.negated
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negated, name) = match s.strip_prefix('!') {
            Some(rest) => (true, rest.trim()),
            None => (false, s),
        };

        if name.is_empty() {
            return Err(format!("invalid condition \"{s}\": expected a mode name"));
        }

        Ok(Self {
            mode: Mode::from(name),
            negated,
        })
    }
}

impl TryFrom<String> for Condition {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Condition> for String {
    fn from(value: Condition) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        f.write_str(self.mode.as_str())
    }
}

/// A boolean option that may depend on the build mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Toggle {
    Flag(bool),
    When(Condition),
}

impl Toggle {
    pub fn resolve(&self, env: &Environment) -> bool {
        match self {
            Toggle::Flag(value) => *value,
            Toggle::When(condition) => condition.holds(env),
        }
    }
}

impl Default for Toggle {
    fn default() -> Self {
        Toggle::Flag(false)
    }
}

impl From<bool> for Toggle {
    fn from(value: bool) -> Self {
        Toggle::Flag(value)
    }
}
