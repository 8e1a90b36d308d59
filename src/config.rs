use crate::translator::{DEFAULT_TIMEZONE, MappingError, MappingRule, MappingTable, default_rules};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Unknown timezone '{name}': {reason}")]
    UnknownTimezone { name: String, reason: String },
    #[error("Invalid mapping table: {0}")]
    InvalidMapping(#[from] MappingError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// IANA timezone PAN timestamps are written in.
    pub timezone: String,
    /// Copy translations to the system clipboard.
    pub clipboard: bool,
    /// Field and operator vocabulary, applied in order.
    pub mappings: Vec<MappingRule>,
    /// Appended after `mappings`, so site-specific fields need not repeat the defaults.
    pub extra_mappings: Vec<MappingRule>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.name().to_string(),
            clipboard: true,
            mappings: default_rules(),
            extra_mappings: Vec::new(),
        }
    }
}

impl TranslatorConfig {
    pub fn parse_timezone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| ConfigError::UnknownTimezone {
                name: self.timezone.clone(),
                reason: e.to_string(),
            })
    }

    pub fn mapping_table(&self) -> Result<MappingTable, ConfigError> {
        let rules = self
            .mappings
            .iter()
            .chain(&self.extra_mappings)
            .cloned()
            .collect();
        Ok(MappingTable::new(rules)?)
    }
}

pub fn load_config(path: Option<&Path>) -> Result<TranslatorConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<TranslatorConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<TranslatorConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn default_config() -> &'static TranslatorConfig {
    static DEFAULT_CONFIG: LazyLock<TranslatorConfig> = LazyLock::new(TranslatorConfig::default);
    &DEFAULT_CONFIG
}
