//! Configuration System
//!
//! Layered configuration for the command-line adapter. Sources, lowest to
//! highest precedence:
//! 1. Built-in defaults (git paths ignored, symlinks rejected)
//! 2. Optional TOML config file
//! 3. `MODELDIGEST_*` environment variables (`__` separates nested keys,
//!    `MODELDIGEST_IGNORE_PATHS` is comma separated)
//! 4. Explicit command-line flags, applied by the caller

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use crate::options::Options;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const ENV_PREFIX: &str = "MODELDIGEST";

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Paths to ignore, absolute or relative to the model root
    #[serde(default)]
    pub ignore_paths: Vec<PathBuf>,

    /// Ignore `.git`, `.gitignore`, `.gitattributes` and `.github`
    #[serde(default = "default_true")]
    pub ignore_git_paths: bool,

    /// Follow symbolic links instead of failing on them
    #[serde(default)]
    pub allow_symlinks: bool,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_true() -> bool {
    true
}

impl Default for DigestConfig {
    fn default() -> Self {
        let options = Options::default();
        Self {
            ignore_paths: options.ignore_paths,
            ignore_git_paths: options.ignore_git_paths,
            allow_symlinks: options.allow_symlinks,
            logging: LoggingConfig::default(),
        }
    }
}

impl DigestConfig {
    /// Serialization options described by this configuration
    pub fn options(&self) -> Options {
        Options {
            ignore_paths: self.ignore_paths.clone(),
            ignore_git_paths: self.ignore_git_paths,
            allow_symlinks: self.allow_symlinks,
        }
    }
}

/// Loads [`DigestConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, the optional config file, then the process environment
    pub fn load(config_file: Option<&Path>) -> Result<DigestConfig, ConfigError> {
        Self::load_with_env(config_file, None)
    }

    /// Load a config file on top of the defaults, ignoring the environment
    pub fn load_from_file(config_file: &Path) -> Result<DigestConfig, ConfigError> {
        Self::load_with_env(Some(config_file), Some(HashMap::new()))
    }

    /// Like [`ConfigLoader::load`], reading environment variables from `env`
    /// instead of the process environment when given.
    pub fn load_with_env(
        config_file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<DigestConfig, ConfigError> {
        let mut builder = builder_with_defaults()?;

        if let Some(path) = config_file {
            if !path.is_file() {
                return Err(ConfigError::Invalid(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!(config_path = %path.display(), "Loading config file");
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("ignore_paths")
            .try_parsing(true)
            .source(env);

        let config: DigestConfig = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}

fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = DigestConfig::default();
    Ok(Config::builder()
        .set_default("ignore_paths", Vec::<String>::new())?
        .set_default("ignore_git_paths", defaults.ignore_git_paths)?
        .set_default("allow_symlinks", defaults.allow_symlinks)?
        .set_default("logging.level", defaults.logging.level)?
        .set_default("logging.format", defaults.logging.format)?
        .set_default("logging.output", defaults.logging.output)?)
}
