//! Ledger configuration via `ledger.toml`
//!
//! A ledger is configured by a small TOML file. Every key is optional; a
//! missing file is not an error for callers that use
//! [`LedgerConfig::write_default_if_missing`] first.

use serde::{Deserialize, Serialize};
use std::path::Path;

use ledger_core::{LedgerError, Result};

/// Config file name used when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = "ledger.toml";

/// Default name the contract registers its transactions under.
pub const DEFAULT_CONTRACT_NAME: &str = "review_event";

/// Ledger configuration loaded from `ledger.toml`.
///
/// # Example
///
/// ```toml
/// contract_name = "review_event"
/// bootstrap = true
/// stamp_mutations = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Name the contract registers its transactions under; accepted as a
    /// `<contract_name>:` qualifier on invocations.
    #[serde(default = "default_contract_name")]
    pub contract_name: String,
    /// Seed the initial events once when the ledger is opened.
    #[serde(default)]
    pub bootstrap: bool,
    /// Set `Event.timestamp` to the transaction timestamp on every write.
    #[serde(default)]
    pub stamp_mutations: bool,
}

fn default_contract_name() -> String {
    DEFAULT_CONTRACT_NAME.to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            contract_name: default_contract_name(),
            bootstrap: false,
            stamp_mutations: false,
        }
    }
}

impl LedgerConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Review event ledger configuration
#
# Name the contract registers its transactions under. Calls may be
# qualified with it, as in `review_event:QueryEvent`.
contract_name = "review_event"

# Seed Event0..Event3 when the ledger is opened (default: false).
bootstrap = false

# Set each event's timestamp to the transaction time on every write
# (default: false, the timestamp is left as stored).
stamp_mutations = false
"#
    }

    /// Parse a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` on malformed TOML, unknown keys or an empty
    /// contract name.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LedgerConfig = toml::from_str(content)
            .map_err(|e| LedgerError::invalid_input(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::store(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            LedgerError::InvalidInput { message } => LedgerError::invalid_input(format!(
                "{} ({})",
                message,
                path.display()
            )),
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                LedgerError::store(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LedgerError::invalid_input(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            LedgerError::store(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    fn validate(&self) -> Result<()> {
        if self.contract_name.trim().is_empty() {
            return Err(LedgerError::invalid_input("contract_name must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = LedgerConfig::default();
        assert_eq!(config.contract_name, "review_event");
        assert!(!config.bootstrap);
        assert!(!config.stamp_mutations);
    }

    #[test]
    fn default_toml_parses_to_default() {
        let config = LedgerConfig::from_toml_str(LedgerConfig::default_toml()).unwrap();
        assert_eq!(config, LedgerConfig::default());
    }

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(LedgerConfig::from_toml_str("").unwrap(), LedgerConfig::default());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = LedgerConfig::from_toml_str("durability = \"always\"").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput { .. }));
    }

    #[test]
    fn empty_contract_name_is_rejected() {
        assert!(LedgerConfig::from_toml_str("contract_name = \"  \"").is_err());
    }

    #[test]
    fn write_default_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(!path.exists());

        LedgerConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());
        assert_eq!(LedgerConfig::from_file(&path).unwrap(), LedgerConfig::default());
    }

    #[test]
    fn write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "bootstrap = true\n").unwrap();

        LedgerConfig::write_default_if_missing(&path).unwrap();

        assert!(LedgerConfig::from_file(&path).unwrap().bootstrap);
    }

    #[test]
    fn write_to_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = LedgerConfig {
            contract_name: "fabcar".to_string(),
            bootstrap: true,
            stamp_mutations: true,
        };

        config.write_to_file(&path).unwrap();
        assert_eq!(LedgerConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_a_store_error() {
        let dir = TempDir::new().unwrap();
        let err = LedgerConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.is_store());
    }
}
