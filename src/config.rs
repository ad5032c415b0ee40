// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{Result, TriageError};
use crate::utils::validation::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub classifier: ClassifierConfig,
    pub ingest: IngestConfig,
    pub storage: StorageConfig,
}

/// Settings for the external chat-completions classifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Honour HTTP(S)_PROXY from the environment.
    #[serde(default = "default_use_system_proxy")]
    pub use_system_proxy: bool,
}

fn default_use_system_proxy() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    pub mode: ClassificationMode,
    /// Offer every N-th data row to the external classifier; 1 means every row.
    pub external_every: usize,
    #[serde(default)]
    pub overflow: OverflowPolicy,
    pub show_progress: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub credentials_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationMode {
    ExternalFirst,
    RuleOnly,
}

/// What to do with data rows carrying more fields than the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    #[default]
    Truncate,
    Reject,
}

impl ClassifierConfig {
    pub fn has_credential(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            timeout_secs: 30,
            api_key: None,
            use_system_proxy: true,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            mode: ClassificationMode::ExternalFirst,
            external_every: 1,
            overflow: OverflowPolicy::Truncate,
            show_progress: true,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("INBOX_TRIAGE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| TriageError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| TriageError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            ingest: IngestConfig::default(),
            storage: StorageConfig {
                credentials_path: PathBuf::from("./data/credentials.json"),
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.ingest.external_every == 0 {
            return Err(TriageError::Config(
                "external_every must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.classifier.temperature) {
            return Err(TriageError::Config(format!(
                "temperature must be within 0.0 and 2.0, got {}",
                self.classifier.temperature
            )));
        }

        if self.classifier.timeout_secs == 0 {
            return Err(TriageError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Validator::validate_url(&self.classifier.endpoint)
            .map_err(|e| TriageError::Config(e.to_string()))?;

        Ok(())
    }
}
