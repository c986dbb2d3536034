//! Configuration system for the image processing workflow
//!
//! Configuration is a TOML file with three sections. Every field has a
//! default, so an empty file (or no file at all) yields the deterministic
//! supervisor with the fixed routing table.

use crate::routing::RoutingTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Main workflow configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub workflow: WorkflowSection,
    #[serde(default)]
    pub routing: RoutingConfig,
}

/// Workflow section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowSection {
    /// Maximum router decisions before the workflow is forced to END
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for WorkflowSection {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}

fn default_max_iterations() -> usize {
    10
}

/// Routing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoutingConfig {
    /// Routing strategy: "deterministic" or "classifier"
    #[serde(default)]
    pub strategy: RoutingStrategy,

    /// Transition table for the deterministic strategy, keyed by current task
    /// (`none` for a fresh workflow). Empty means the built-in table.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub table: BTreeMap<String, String>,

    /// Classifier configuration (required if strategy = "classifier")
    pub classifier: Option<ClassifierConfig>,
}

/// Routing strategy selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoutingStrategy {
    #[default]
    Deterministic,
    Classifier,
}

/// LLM classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifierConfig {
    /// LLM provider; only "openai" is supported
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable containing the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Temperature for routing decisions (default: 0.0)
    #[serde(default)]
    pub temperature: f64,
    /// Optional max tokens for the reply
    pub max_tokens: Option<u32>,
    /// Override for the provider endpoint
    pub base_url: Option<String>,
    /// HTTP timeout in seconds; unset means no timeout
    pub timeout_secs: Option<u64>,
    /// Override for the supervisor system prompt
    pub system_prompt: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: 0.0,
            max_tokens: None,
            base_url: None,
            timeout_secs: None,
            system_prompt: None,
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RoutingConfig {
    /// Validate routing configuration consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strategy == RoutingStrategy::Classifier && self.classifier.is_none() {
            return Err(ConfigError::InvalidConfig(
                "Classifier routing strategy requires [routing.classifier] configuration"
                    .to_string(),
            ));
        }

        if let Some(classifier) = &self.classifier {
            if !(0.0..=2.0).contains(&classifier.temperature) {
                return Err(ConfigError::InvalidConfig(format!(
                    "Classifier temperature {} must be between 0.0 and 2.0",
                    classifier.temperature
                )));
            }
        }

        self.routing_table()?;
        Ok(())
    }

    /// Build the validated routing table this configuration describes
    pub fn routing_table(&self) -> Result<RoutingTable, ConfigError> {
        if self.table.is_empty() {
            return Ok(RoutingTable::default());
        }
        RoutingTable::from_entries(&self.table)
            .map_err(|e| ConfigError::InvalidConfig(format!("[routing.table]: {e}")))
    }
}

impl WorkflowConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: WorkflowConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workflow.max_iterations == 0 {
            return Err(ConfigError::InvalidConfig(
                "workflow.max_iterations must be at least 1".to_string(),
            ));
        }
        self.routing.validate()
    }

    /// Get the classifier API key from its environment variable
    pub fn get_classifier_api_key(&self) -> Result<String, ConfigError> {
        let env_name = self
            .routing
            .classifier
            .as_ref()
            .map(|c| c.api_key_env.as_str())
            .ok_or_else(|| {
                ConfigError::InvalidConfig("No [routing.classifier] section".to_string())
            })?;

        std::env::var(env_name).map_err(|_| ConfigError::EnvVarNotFound(env_name.to_string()))
    }
}
