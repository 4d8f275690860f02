use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use specimen_generate::{ConstructorPolicy, GenerateOptions};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Contents of the optional `--config` TOML file.
///
/// Every generation knob is optional; unset ones fall back to the engine
/// defaults and command-line flags win over both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub seed: Option<u64>,
    pub max_collection_size: Option<usize>,
    pub max_recursion_depth: Option<usize>,
    pub max_string_length: Option<usize>,
    pub constructor_policy: Option<ConstructorPolicy>,
    pub logging: LoggingSettings,
}

/// Generation knobs given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub max_collection_size: Option<usize>,
    pub max_recursion_depth: Option<usize>,
    pub max_string_length: Option<usize>,
    pub constructor_policy: Option<ConstructorPolicy>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn generate_options(&self, overrides: Overrides) -> GenerateOptions {
        let defaults = GenerateOptions::default();
        GenerateOptions {
            seed: overrides.seed.or(self.seed).unwrap_or(defaults.seed),
            max_collection_size: overrides
                .max_collection_size
                .or(self.max_collection_size)
                .unwrap_or(defaults.max_collection_size),
            max_recursion_depth: overrides
                .max_recursion_depth
                .or(self.max_recursion_depth)
                .unwrap_or(defaults.max_recursion_depth),
            max_string_length: overrides
                .max_string_length
                .or(self.max_string_length)
                .unwrap_or(defaults.max_string_length),
            constructor_policy: overrides
                .constructor_policy
                .or(self.constructor_policy)
                .unwrap_or(defaults.constructor_policy),
        }
    }
}
