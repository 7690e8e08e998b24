use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

use crate::currency::{CurrencyError, CurrencyInfo, CurrencyRegistry};
use crate::transfer::MAX_DESCRIPTION_LEN;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid currency table: {0}")]
    Currency(#[from] CurrencyError),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    #[serde(default)]
    pub use_json: bool,
    #[serde(default = "default_rotation")]
    pub rotation: String,
    /// Currency table; empty means the built-in TRY/USD/EUR set
    #[serde(default)]
    pub currencies: Vec<CurrencyInfo>,
    #[serde(default)]
    pub transfer: TransferSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TransferSettings {
    #[serde(default = "default_max_description_len")]
    pub max_description_len: usize,
    /// Re-fetch rates once when a pair is missing
    #[serde(default = "default_true")]
    pub retry_on_missing_rate: bool,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            max_description_len: MAX_DESCRIPTION_LEN,
            retry_on_missing_rate: true,
        }
    }
}

fn default_rotation() -> String {
    "never".to_string()
}

fn default_max_description_len() -> usize {
    MAX_DESCRIPTION_LEN
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "banking_core.log".to_string(),
            use_json: false,
            rotation: default_rotation(),
            currencies: Vec::new(),
            transfer: TransferSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml`
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        Self::from_file(&format!("config/{}.yaml", env))
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Registry built from `currencies`, or the built-ins when none are listed.
    pub fn currency_registry(&self) -> Result<CurrencyRegistry, ConfigError> {
        if self.currencies.is_empty() {
            return Ok(CurrencyRegistry::builtin());
        }
        Ok(CurrencyRegistry::from_entries(self.currencies.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::CurrencyCode;

    #[test]
    fn test_minimal_config_defaults() {
        let yaml = r#"
log_level: "debug"
log_dir: "./logs"
log_file: "banking.log"
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.rotation, "never");
        assert!(!config.use_json);
        assert_eq!(config.transfer, TransferSettings::default());
        assert_eq!(config.currency_registry().unwrap().len(), 3);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
log_level: "info"
log_dir: "/var/log/banking"
log_file: "core.log"
use_json: true
rotation: "daily"
transfer:
  max_description_len: 140
  retry_on_missing_rate: false
currencies:
  - { code: 1, iso: "TRY", symbol: "₺", name: "Türk Lirası" }
  - { code: 4, iso: "GBP", symbol: "£", name: "İngiliz Sterlini", minor_units: 2 }
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert!(config.use_json);
        assert_eq!(config.transfer.max_description_len, 140);
        assert!(!config.transfer.retry_on_missing_rate);

        let registry = config.currency_registry().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.symbol(CurrencyCode(4)), "£");
        assert!(registry.get(CurrencyCode::USD).is_none());
    }

    #[test]
    fn test_invalid_currency_table() {
        let yaml = r#"
log_level: "info"
log_dir: "./logs"
log_file: "core.log"
currencies:
  - { code: 1, iso: "try", symbol: "₺", name: "Türk Lirası" }
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert!(matches!(
            config.currency_registry(),
            Err(ConfigError::Currency(CurrencyError::InvalidIso(_)))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_file("config/does-not-exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            AppConfig::from_yaml_str("log_level: [unclosed"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.yaml");
        fs::write(&path, "log_level: warn\nlog_dir: ./logs\nlog_file: t.log\n").unwrap();
        let config = AppConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.log_level, "warn");
    }
}
