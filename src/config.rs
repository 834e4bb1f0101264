//! Configuration management for LedgerChain

use crate::blockchain::{HashScope, DEFAULT_GENESIS_LABEL};
use crate::economics::DEFAULT_BLOCK_REWARD;
use crate::error::ChainError;
use crate::transaction::Amount;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// File read by [`load_config`] from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ledgerchain.toml";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub validators: ValidatorConfig,
    #[serde(default)]
    pub rewards: RewardConfig,
    #[serde(default = "default_accounts")]
    pub accounts: Vec<AccountConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ChainConfig {
    #[serde(default = "default_genesis_label")]
    pub genesis_label: String,
    /// Payload label stamped on produced blocks.
    #[serde(default)]
    pub block_label: String,
    #[serde(default)]
    pub hash_scope: HashScope,
    /// Fixed genesis timestamp; the current time is used when absent.
    #[serde(default)]
    pub genesis_timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ValidatorConfig {
    #[serde(default = "default_validators")]
    pub authorized: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RewardConfig {
    #[serde(default = "default_block_reward")]
    pub block_reward: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AccountConfig {
    pub id: String,
    pub balance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            validators: ValidatorConfig::default(),
            rewards: RewardConfig::default(),
            accounts: default_accounts(),
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            genesis_label: default_genesis_label(),
            block_label: String::new(),
            hash_scope: HashScope::default(),
            genesis_timestamp: None,
        }
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            authorized: default_validators(),
        }
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            block_reward: default_block_reward(),
        }
    }
}

impl Config {
    /// Check the values serde cannot: ids, duplicates and balance ranges.
    pub fn validate(&self) -> Result<(), ChainError> {
        if self.validators.authorized.is_empty() {
            return Err(ChainError::ConfigError(
                "validators.authorized must name at least one validator".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for validator in &self.validators.authorized {
            if validator.trim().is_empty() {
                return Err(ChainError::ConfigError(
                    "validators.authorized contains an empty id".to_string(),
                ));
            }
            if !seen.insert(validator.as_str()) {
                return Err(ChainError::ConfigError(format!(
                    "validator {} is listed more than once",
                    validator
                )));
            }
        }

        self.initial_balances().map(|_| ())
    }

    /// Starting balances converted to ledger amounts.
    pub fn initial_balances(&self) -> Result<Vec<(String, Amount)>, ChainError> {
        let mut seen = HashSet::new();
        let mut balances = Vec::with_capacity(self.accounts.len());

        for account in &self.accounts {
            if account.id.trim().is_empty() {
                return Err(ChainError::ConfigError(
                    "accounts contains an empty id".to_string(),
                ));
            }
            if !seen.insert(account.id.as_str()) {
                return Err(ChainError::ConfigError(format!(
                    "account {} is listed more than once",
                    account.id
                )));
            }
            if !account.balance.is_finite() || account.balance < 0.0 {
                return Err(ChainError::ConfigError(format!(
                    "account {} has invalid balance {}",
                    account.id, account.balance
                )));
            }
            let balance = Amount::checked_from_num(account.balance).ok_or_else(|| {
                ChainError::ConfigError(format!(
                    "account {} balance {} is out of range",
                    account.id, account.balance
                ))
            })?;
            balances.push((account.id.clone(), balance));
        }

        Ok(balances)
    }
}

pub fn parse_config(contents: &str) -> Result<Config, ChainError> {
    let config: Config = if contents.trim().is_empty() {
        Config::default()
    } else {
        toml::from_str(contents)?
    };
    config.validate()?;
    Ok(config)
}

pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, ChainError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        ChainError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_config(&contents)
}

/// Load `ledgerchain.toml` from the working directory, or defaults when it is absent.
pub fn load_config() -> Result<Config, ChainError> {
    let path = Path::new(DEFAULT_CONFIG_FILE);
    if path.exists() {
        load_config_from(path)
    } else {
        Ok(Config::default())
    }
}

fn default_genesis_label() -> String {
    DEFAULT_GENESIS_LABEL.to_string()
}

fn default_validators() -> Vec<String> {
    vec![
        "validator1".to_string(),
        "validator2".to_string(),
        "validator3".to_string(),
    ]
}

fn default_block_reward() -> u64 {
    DEFAULT_BLOCK_REWARD
}

fn default_accounts() -> Vec<AccountConfig> {
    [("Alice", 100.0), ("Bob", 50.0), ("Charlie", 20.0)]
        .into_iter()
        .map(|(id, balance)| AccountConfig {
            id: id.to_string(),
            balance,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chain.genesis_label, "Genesis Block");
        assert_eq!(config.chain.block_label, "");
        assert_eq!(config.chain.hash_scope, HashScope::Header);
        assert_eq!(config.validators.authorized.len(), 3);
        assert_eq!(config.rewards.block_reward, 1);
        assert_eq!(config.accounts.len(), 3);
    }

    #[test]
    fn test_empty_contents_yield_defaults() {
        assert_eq!(parse_config("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = parse_config(
            r#"
            [chain]
            hash_scope = "full"

            [rewards]
            block_reward = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.chain.hash_scope, HashScope::Full);
        assert_eq!(config.chain.genesis_label, "Genesis Block");
        assert_eq!(config.rewards.block_reward, 3);
        assert_eq!(config.validators, ValidatorConfig::default());
        assert_eq!(config.accounts.len(), 3);
    }

    #[test]
    fn test_full_config() {
        let config = parse_config(
            r#"
            [chain]
            genesis_label = "Start"
            block_label = "batch"
            genesis_timestamp = "2024-01-01T00:00:00Z"

            [validators]
            authorized = ["v1"]

            [[accounts]]
            id = "Dana"
            balance = 12.5
            "#,
        )
        .unwrap();
        assert_eq!(config.chain.block_label, "batch");
        assert_eq!(config.chain.genesis_timestamp.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(config.validators.authorized, vec!["v1".to_string()]);
        let balances = config.initial_balances().unwrap();
        assert_eq!(balances, vec![("Dana".to_string(), Amount::from_num(12.5))]);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = Config::default();
        config.validators.authorized.clear();
        assert!(matches!(config.validate(), Err(ChainError::ConfigError(_))));

        let mut config = Config::default();
        config.validators.authorized.push("validator1".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.accounts[0].balance = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.accounts[1].id = "Alice".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.accounts[2].balance = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            parse_config("[chain\nhash_scope = 1"),
            Err(ChainError::ConfigError(_))
        ));
        assert!(parse_config("[chain]\nhash_scope = \"merkle\"").is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[rewards]\nblock_reward = 5").unwrap();
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.rewards.block_reward, 5);
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = load_config_from(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ChainError::ConfigError(_))));
    }
}
