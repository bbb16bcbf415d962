use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::domain::models::PreferenceOption;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Knowledge path cannot be empty")]
    EmptyKnowledgePath,

    #[error("Preference {0} is enabled more than once")]
    DuplicatePreference(PreferenceOption),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .mender/config.yaml (project config)
    /// 3. .mender/local.yaml (project local overrides, optional)
    /// 4. Environment variables (MENDER_* prefix, highest priority)
    ///
    /// An unrecognized preference name in any source fails extraction --
    /// configuration errors are fatal at startup, never silently ignored.
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".mender/config.yaml"))
            .merge(Yaml::file(".mender/local.yaml"))
            .merge(Env::prefixed("MENDER_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Write the resolved configuration back to disk as YAML, so the
    /// effective preference weights of a session are inspectable and can
    /// seed the next run.
    pub fn save_to_file(config: &Config, path: impl AsRef<std::path::Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context(format!("Failed to create {}", parent.display()))?;
            }
        }
        let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;
        std::fs::write(path, yaml).context(format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.knowledge.path.is_empty() {
            return Err(ConfigError::EmptyKnowledgePath);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let mut seen = Vec::with_capacity(config.preferences.enabled.len());
        for &option in &config.preferences.enabled {
            if seen.contains(&option) {
                return Err(ConfigError::DuplicatePreference(option));
            }
            seen.push(option);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.knowledge.path, ".mender/knowledge.json");
        assert!(config.knowledge.save_after_reward);
        assert_eq!(config.logging.level, "info");
        assert!(config.preferences.enabled.is_empty());
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_empty_knowledge_path_rejected() {
        let mut config = Config::default();
        config.knowledge.path = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyKnowledgePath)
        ));
    }

    #[test]
    fn test_duplicate_preference_rejected() {
        let mut config = Config::default();
        config.preferences.enabled = vec![
            PreferenceOption::PunishDeletion,
            PreferenceOption::ShortSequencesOfActions,
            PreferenceOption::PunishDeletion,
        ];
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::DuplicatePreference(
                PreferenceOption::PunishDeletion
            ))
        ));
    }
}
