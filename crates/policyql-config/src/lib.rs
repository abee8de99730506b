//! Configuration for the PolicyQL tools.
//!
//! Settings come from an optional `policyql.toml` and are then overridden by
//! environment variables:
//!
//! - `POLICYQL_MAX_DEPTH`: compiler nesting limit (1-4096, default 64)
//! - `POLICYQL_DEFAULT_SUBJECT`: subject alias for top-level queries (default `subject`)
//! - `POLICYQL_LOG`: tracing filter directive (default `policyql=info`)
//!
//! Every field is optional; unknown keys are rejected.

use policyql_core::{DEFAULT_MAX_DEPTH, DEFAULT_SUBJECT, compile::CompileOptions};
use serde::Deserialize;
use std::{fs, io, path::Path};
use thiserror::Error as ThisError;

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "policyql.toml";

pub const ENV_MAX_DEPTH: &str = "POLICYQL_MAX_DEPTH";
pub const ENV_DEFAULT_SUBJECT: &str = "POLICYQL_DEFAULT_SUBJECT";
pub const ENV_LOG: &str = "POLICYQL_LOG";

/// Default tracing filter directive.
pub const DEFAULT_LOG_FILTER: &str = "policyql=info";

/// Upper bound accepted for `max_depth`.
pub const MAX_DEPTH_LIMIT: usize = 4096;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

impl ConfigError {
    fn invalid(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

///
/// CompilerConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    pub max_depth: usize,
    pub default_subject: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            default_subject: DEFAULT_SUBJECT.to_string(),
        }
    }
}

///
/// LogConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

///
/// Config
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub compiler: CompilerConfig,
    pub log: LogConfig,
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;

        Ok(config)
    }

    /// Read `path`, or fall back to defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&text)
    }

    /// File (if any), then process environment.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load(path)?.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(ENV_MAX_DEPTH) {
            self.compiler.max_depth = value.trim().parse().map_err(|_| {
                ConfigError::invalid(ENV_MAX_DEPTH, format!("'{value}' is not a whole number"))
            })?;
        }
        if let Some(value) = lookup(ENV_DEFAULT_SUBJECT) {
            self.compiler.default_subject = value;
        }
        if let Some(value) = lookup(ENV_LOG) {
            self.log.filter = value;
        }

        self.validate()?;

        Ok(self)
    }

    #[must_use]
    pub const fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            max_depth: self.compiler.max_depth,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let depth = self.compiler.max_depth;
        if !(1..=MAX_DEPTH_LIMIT).contains(&depth) {
            return Err(ConfigError::invalid(
                "compiler.max_depth",
                format!("{depth} is outside 1..={MAX_DEPTH_LIMIT}"),
            ));
        }

        let subject = &self.compiler.default_subject;
        if !is_identifier(subject) {
            return Err(ConfigError::invalid(
                "compiler.default_subject",
                format!("'{subject}' is not an identifier"),
            ));
        }

        Ok(())
    }
}

/// Whether `name` can be used as a subject alias: `[A-Za-z_][A-Za-z0-9_]*`.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

///
/// TESTS
///
