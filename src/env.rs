//! Environment constants, path utilities and layered `.env` resolution.
//!
//! Variables are resolved with the following precedence:
//! 1. The process environment
//! 2. `.env.local` (user-specific overrides)
//! 3. `.env` (project defaults)
//! 4. `.env.example` (template values)
//!
//! The first definition found for a name wins. Nothing is written back into the
//! process environment; callers hold an [`Environment`] value and query it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Application directory name for configuration (hidden, like .git)
pub const TOOLS_DIR_NAME: &str = ".agent-tools";

/// Configuration file name inside [`TOOLS_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration file name at the project root
pub const PROJECT_CONFIG_FILE_NAME: &str = "agent-tools.toml";

/// `.env` files in precedence order (highest first)
pub const ENV_FILES: [&str; 3] = [".env.local", ".env", ".env.example"];

/// Credential and endpoint variable names
pub mod vars {
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const DEEPSEEK_API_KEY: &str = "DEEPSEEK_API_KEY";
    pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
    pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";

    /// Overrides the base URL of the `local` provider
    pub const LOCAL_LLM_BASE_URL: &str = "LOCAL_LLM_BASE_URL";
}

/// Errors raised while reading configuration or credentials.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not found in environment variables")]
    MissingCredential(&'static str),
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Resolved view over the process environment and the `.env` file layers.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
    loaded_files: Vec<PathBuf>,
}

impl Environment {
    /// Load from the process environment and `.env` files in the current directory.
    pub fn load() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(|source| ConfigError::Io {
            path: PathBuf::from("."),
            source,
        })?;
        Self::load_layers(std::env::vars(), &cwd)
    }

    /// Load `.env` files from `dir`, with `process_vars` taking precedence over them.
    pub fn load_layers<I>(process_vars: I, dir: &Path) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut env = Self::from_vars(process_vars);

        info!("Current working directory: {}", dir.display());
        debug!("Looking for environment files: {:?}", ENV_FILES);

        for file_name in ENV_FILES {
            let path = dir.join(file_name);
            debug!("Checking {}", path.display());
            if !path.is_file() {
                continue;
            }

            info!("Found {}, loading variables...", file_name);
            let keys = env.merge_file(&path)?;
            info!("Keys loaded from {}: {:?}", file_name, keys);
            env.loaded_files.push(path);
        }

        if env.loaded_files.is_empty() {
            warn!("No .env files found. Using system environment variables only.");
            let mut names: Vec<&str> = env.vars.keys().map(String::as_str).collect();
            names.sort_unstable();
            debug!("Available system environment variables: {:?}", names);
        }

        Ok(env)
    }

    /// Build an environment from explicit variables, without reading any file.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            loaded_files: Vec::new(),
        }
    }

    /// Merge a dotenv file without overriding names already defined.
    /// Returns every key name the file declares.
    fn merge_file(&mut self, path: &Path) -> Result<Vec<String>, ConfigError> {
        let iter = dotenvy::from_path_iter(path).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut keys = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            keys.push(key.clone());
            self.vars.entry(key).or_insert(value);
        }
        Ok(keys)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Look up a credential; empty values count as missing.
    pub fn require(&self, name: &'static str) -> Result<&str, ConfigError> {
        match self.get(name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ConfigError::MissingCredential(name)),
        }
    }

    pub fn loaded_files(&self) -> &[PathBuf] {
        &self.loaded_files
    }
}

/// Build the tools directory path under `root`
pub fn tools_dir_path(root: &Path) -> PathBuf {
    root.join(TOOLS_DIR_NAME)
}

/// Build the project-level config file path (`./agent-tools.toml`)
pub fn project_config_file_path(current_dir: &Path) -> PathBuf {
    current_dir.join(PROJECT_CONFIG_FILE_NAME)
}

/// Build the local config file path (`./.agent-tools/config.toml`)
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    tools_dir_path(current_dir).join(CONFIG_FILE_NAME)
}

/// Build the user config file path (`~/.agent-tools/config.toml`)
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    tools_dir_path(home_dir).join(CONFIG_FILE_NAME)
}
