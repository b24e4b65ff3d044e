//! Configuration management for Prism.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. All config structs implement `Default`; a missing file means
//! defaults, a malformed file is an error.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration, one field per TOML section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `[general]`: paths and cache sizing
    pub general: GeneralConfig,

    /// `[interpret]`: classification and attribution settings
    pub interpret: InterpretConfig,

    /// `[output]`: one-shot result serialization
    pub output: OutputConfig,

    /// `[logging]`: level and format
    pub logging: LoggingConfig,
}

impl Config {
    /// Load the configuration, falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate a config file at an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Path of the config file inside the platform config directory
    /// (`~/.config/prism/config.toml` on Linux), with `~/.prism/config.toml`
    /// as the fallback when platform directories cannot be resolved.
    pub fn default_path() -> PathBuf {
        match directories::ProjectDirs::from("com", "prism", "prism") {
            Some(dirs) => dirs.config_dir().join("config.toml"),
            None => {
                let home = std::env::var("HOME").unwrap_or_else(|_| String::from("."));
                PathBuf::from(home).join(".prism").join("config.toml")
            }
        }
    }

    /// Model directory from `[general]`, with a leading `~` expanded.
    pub fn model_dir(&self) -> PathBuf {
        let raw = self.general.model_dir.to_string_lossy();
        PathBuf::from(shellexpand::tilde(raw.as_ref()).into_owned())
    }

    /// Render the full config as pretty-printed TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ValidationError(format!("TOML serialization failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.general.cache_capacity, 1);
        assert_eq!(config.interpret.max_text_chars, 850);
        assert_eq!(config.interpret.batch_size, 2);
        assert_eq!(config.interpret.candidate_labels.len(), 9);
    }

    #[test]
    fn test_to_toml_contains_sections() {
        let toml = Config::default().to_toml().unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[interpret]"));
        assert!(toml.contains("hypothesis_template"));
    }

    #[test]
    fn test_toml_roundtrip_preserves_labels() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(
            parsed.interpret.candidate_labels,
            config.interpret.candidate_labels
        );
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[interpret]\nbatch_size = 4\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.interpret.batch_size, 4);
        // Untouched sections fall back to defaults
        assert_eq!(config.interpret.max_text_chars, 850);
        assert_eq!(config.general.cache_capacity, 1);
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[interpret]\nbatch_size = 0\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_model_dir_expands_tilde() {
        let config = Config::default();
        let dir = config.model_dir();
        assert!(!dir.to_string_lossy().starts_with('~'));
    }
}
