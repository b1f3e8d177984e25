//! Configuration discovery and loading
//!
//! This module handles the configuration discovery hierarchy:
//! 1. Explicit `--config <path>`
//! 2. Current directory: ./agent-tools.toml or ./.agent-tools/config.toml
//! 3. User config: ~/.agent-tools/config.toml
//! 4. Built-in defaults

use crate::env::{self, ConfigError};
use crate::llm::LlmSettings;
use crate::search::SearchSettings;
use serde::{Deserialize, Serialize};
use std::env as std_env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub llm: LlmSettings,
    pub search: SearchSettings,
}

impl ToolsConfig {
    /// Load from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ToolsConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search.validate().map_err(ConfigError::Invalid)?;
        if !self.llm.temperature.is_finite() || self.llm.temperature < 0.0 {
            return Err(ConfigError::Invalid(
                "llm.temperature must be a non-negative number".to_string(),
            ));
        }
        if self.llm.anthropic_max_tokens == 0 {
            return Err(ConfigError::Invalid(
                "llm.anthropic_max_tokens must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Load `explicit` if given, otherwise the first file in the hierarchy,
    /// otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<ToolsConfig, ConfigError> {
        if let Some(path) = explicit {
            info!("Loading configuration from: {}", path.display());
            return ToolsConfig::from_toml_file(path);
        }
        Self::discover_config()
    }

    /// Discover and load configuration using the hierarchy
    pub fn discover_config() -> Result<ToolsConfig, ConfigError> {
        if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {}", config_path.display());
            return ToolsConfig::from_toml_file(config_path);
        }

        debug!("No configuration file found, using defaults");
        Ok(ToolsConfig::default())
    }

    /// Find configuration file using discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        let current_dir = std_env::current_dir().ok();
        let home_dir = Self::get_home_dir();
        Self::find_in(current_dir.as_deref(), home_dir.as_deref())
    }

    fn find_in(current_dir: Option<&Path>, home_dir: Option<&Path>) -> Option<PathBuf> {
        for candidate in Self::config_candidates(current_dir, home_dir) {
            debug!("Checking for config file: {}", candidate.display());
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }

    /// Configuration file candidates in priority order
    fn config_candidates(current_dir: Option<&Path>, home_dir: Option<&Path>) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Some(current_dir) = current_dir {
            candidates.push(env::project_config_file_path(current_dir));
            candidates.push(env::local_config_file_path(current_dir));
        }

        if let Some(home_dir) = home_dir {
            candidates.push(env::user_config_file_path(home_dir));
        }

        candidates
    }

    fn get_home_dir() -> Option<PathBuf> {
        std_env::var_os("HOME")
            .or_else(|| std_env::var_os("USERPROFILE"))
            .map(PathBuf::from)
    }
}
