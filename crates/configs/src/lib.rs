//! # configs
//!
//! Layered settings: compiled defaults, then an optional TOML file, then
//! `MODBOARD__SECTION__KEY` environment variables (a `.env` file is loaded
//! into the environment first).

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "MODBOARD";
pub const DEFAULT_CONFIG_FILE: &str = "modboard.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub entries_file: String,
    pub log_file: String,
    pub word_list_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            entries_file: "user-text.json".into(),
            log_file: "content_log_cleaned.json".into(),
            word_list_file: "moderation_list.txt".into(),
        }
    }
}

impl StorageSettings {
    pub fn entries_path(&self) -> PathBuf {
        self.data_dir.join(&self.entries_file)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(&self.log_file)
    }

    pub fn word_list_path(&self) -> PathBuf {
        self.data_dir.join(&self.word_list_file)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    Http,
    Stub,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    pub backend: ClassifierBackend,
    pub sentiment_url: Option<String>,
    pub toxicity_url: Option<String>,
    pub api_token: Option<SecretString>,
    pub timeout_ms: u64,
    pub toxicity_threshold: f64,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::Stub,
            sentiment_url: None,
            toxicity_url: None,
            api_token: None,
            timeout_ms: 10_000,
            toxicity_threshold: 0.7,
        }
    }
}

impl ClassifierSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `services=debug`
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub classifier: ClassifierSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Loads settings from `path` (or `modboard.toml` if present) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!(path = %env_file.display(), "loaded .env");
        }

        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let classifier = &self.classifier;
        if !(0.0..=1.0).contains(&classifier.toxicity_threshold) {
            return Err(ConfigError::Invalid(format!(
                "classifier.toxicity_threshold must be within [0, 1], got {}",
                classifier.toxicity_threshold
            )));
        }
        if classifier.timeout_ms == 0 {
            return Err(ConfigError::Invalid("classifier.timeout_ms must be positive".into()));
        }
        if classifier.backend == ClassifierBackend::Http
            && (classifier.sentiment_url.is_none() || classifier.toxicity_url.is_none())
        {
            return Err(ConfigError::Invalid(
                "http classifier backend requires sentiment_url and toxicity_url".into(),
            ));
        }
        Ok(())
    }
}
