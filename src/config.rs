//! TOML configuration for catrefine.
//!
//! ```toml
//! [special]
//! orphan = "orphan"
//! list_structure = ["rdffirst", "rdfrest", "rdftype"]
//!
//! [limits]
//! max_symbols = 1024
//! max_triples = 2000
//! max_sets = 5000
//! max_rules = 500000
//!
//! [output]
//! format = "prolog"
//! ```
//!
//! Every field is optional and falls back to the values shown.

use std::path::Path;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{EngineConfig, Limits};
use crate::export::OutputFormat;
use crate::symbol::SpecialNames;

/// Errors from configuration files.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(catrefine::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(catrefine::config::parse),
        help("Check the TOML syntax and the field names in the config file.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(catrefine::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Capacity bounds as written in the `[limits]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_symbols")]
    pub max_symbols: usize,
    #[serde(default = "default_max_triples")]
    pub max_triples: usize,
    #[serde(default = "default_max_sets")]
    pub max_sets: usize,
    #[serde(default = "default_max_rules")]
    pub max_rules: usize,
}

fn default_max_symbols() -> usize {
    Limits::default().max_symbols
}
fn default_max_triples() -> usize {
    Limits::default().max_triples
}
fn default_max_sets() -> usize {
    Limits::default().max_sets
}
fn default_max_rules() -> usize {
    Limits::default().max_rules
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_symbols: default_max_symbols(),
            max_triples: default_max_triples(),
            max_sets: default_max_sets(),
            max_rules: default_max_rules(),
        }
    }
}

impl From<&LimitsConfig> for Limits {
    fn from(c: &LimitsConfig) -> Self {
        Limits {
            max_symbols: c.max_symbols,
            max_triples: c.max_triples,
            max_sets: c.max_sets,
            max_rules: c.max_rules,
        }
    }
}

/// The `[output]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub special: SpecialNames,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Convert to the engine's configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            special: self.special.clone(),
            limits: Limits::from(&self.limits),
        }
    }

    /// Parse from TOML text; `path` names the source in errors.
    pub fn from_toml(content: &str, path: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            message: e.to_string(),
        })
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content, &path.display().to_string())
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("", "<empty>").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.special.orphan, "orphan");
        assert_eq!(config.limits.max_symbols, 1024);
        assert_eq!(config.output.format, OutputFormat::Prolog);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = Config::from_toml(
            "[limits]\nmax_sets = 20000\n\n[output]\nformat = \"json\"\n",
            "<inline>",
        )
        .unwrap();
        assert_eq!(config.limits.max_sets, 20000);
        assert_eq!(config.limits.max_rules, 500_000);
        assert_eq!(config.output.format, OutputFormat::Json);

        let engine = config.engine_config();
        assert_eq!(engine.limits.max_sets, 20000);
        assert_eq!(engine.special, SpecialNames::default());
    }

    #[test]
    fn custom_special_names() {
        let config = Config::from_toml(
            "[special]\norphan = \"loose\"\nlist_structure = [\"head\", \"tail\"]\n",
            "<inline>",
        )
        .unwrap();
        assert_eq!(config.special.orphan, "loose");
        assert_eq!(config.special.list_structure, vec!["head", "tail"]);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = Config::from_toml("[limits\n", "bad.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == "bad.toml"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("conf").join("catrefine.toml");
        let mut config = Config::default();
        config.limits.max_triples = 12;
        config.output.format = OutputFormat::Json;
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
