use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::chain::ChainProfile;
use crate::pool::{IdStrategy, PoolConfig};

/// Worker pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSection {
    /// Identifier policy: sequential or random
    #[serde(default)]
    pub id_strategy: IdStrategy,

    /// Prefix for generated worker identifiers
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// Workers created idle at startup
    #[serde(default)]
    pub prewarm: usize,
}

fn default_id_prefix() -> String {
    "worker".to_string()
}

impl Default for PoolSection {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::default(),
            id_prefix: default_id_prefix(),
            prewarm: 0,
        }
    }
}

impl PoolSection {
    /// Pool settings derived from this section
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            id_strategy: self.id_strategy,
            id_prefix: self.id_prefix.clone(),
            ..PoolConfig::default()
        }
    }
}

/// Handler chain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSection {
    /// Chain layout: uat or debug
    #[serde(default)]
    pub profile: ChainProfile,

    /// File written by the ERROR node
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Recipient for the FATAL node
    #[serde(default = "default_email_recipient")]
    pub email_recipient: String,
}

fn default_log_file() -> PathBuf {
    PathBuf::from("poolchain.log")
}

fn default_email_recipient() -> String {
    "ops@example.com".to_string()
}

impl Default for ChainSection {
    fn default() -> Self {
        Self {
            profile: ChainProfile::default(),
            log_file: default_log_file(),
            email_recipient: default_email_recipient(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Worker pool settings
    #[serde(default)]
    pub pool: PoolSection,

    /// Handler chain settings
    #[serde(default)]
    pub chain: ChainSection,
}

/// Load configuration from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())
        .context(format!("Failed to read config file: {:?}", path.as_ref()))?;

    let config: Config = serde_yaml::from_str(&content)
        .context("Failed to parse YAML configuration")?;

    Ok(config)
}

/// Load configuration from environment variables
///
/// Every variable is optional; unset ones keep their defaults:
/// - POOLCHAIN_ID_STRATEGY (sequential, random)
/// - POOLCHAIN_ID_PREFIX
/// - POOLCHAIN_PREWARM
/// - POOLCHAIN_PROFILE (uat, debug)
/// - POOLCHAIN_LOG_FILE
/// - POOLCHAIN_EMAIL
pub fn load_from_env() -> Result<Config> {
    // Try to load .env file if it exists (don't fail if it doesn't)
    let _ = dotenvy::dotenv();

    let mut config = Config::default();

    if let Ok(strategy) = std::env::var("POOLCHAIN_ID_STRATEGY") {
        config.pool.id_strategy = strategy
            .parse::<IdStrategy>()
            .map_err(anyhow::Error::msg)
            .context("Invalid POOLCHAIN_ID_STRATEGY")?;
    }

    if let Ok(prefix) = std::env::var("POOLCHAIN_ID_PREFIX") {
        config.pool.id_prefix = prefix;
    }

    if let Ok(prewarm) = std::env::var("POOLCHAIN_PREWARM") {
        config.pool.prewarm = prewarm
            .trim()
            .parse::<usize>()
            .context("Invalid POOLCHAIN_PREWARM")?;
    }

    if let Ok(profile) = std::env::var("POOLCHAIN_PROFILE") {
        config.chain.profile = profile
            .parse::<ChainProfile>()
            .map_err(anyhow::Error::msg)
            .context("Invalid POOLCHAIN_PROFILE")?;
    }

    if let Ok(log_file) = std::env::var("POOLCHAIN_LOG_FILE") {
        config.chain.log_file = PathBuf::from(log_file);
    }

    if let Ok(email) = std::env::var("POOLCHAIN_EMAIL") {
        config.chain.email_recipient = email;
    }

    Ok(config)
}

/// Load configuration from file or environment
///
/// Reads the YAML file when a path is given, otherwise falls back to
/// environment variables.
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    match config_path {
        Some(path) => load_from_yaml(path),
        None => load_from_env(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_yaml() {
        let yaml = r#"
pool:
  id_strategy: random
  id_prefix: job
  prewarm: 4

chain:
  profile: debug
  log_file: /var/log/app.log
  email_recipient: oncall@example.com
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.pool.id_strategy, IdStrategy::Random);
        assert_eq!(config.pool.id_prefix, "job");
        assert_eq!(config.pool.prewarm, 4);

        assert_eq!(config.chain.profile, ChainProfile::Debug);
        assert_eq!(config.chain.log_file, PathBuf::from("/var/log/app.log"));
        assert_eq!(config.chain.email_recipient, "oncall@example.com");
    }

    #[test]
    fn test_default_values() {
        let config: Config = serde_yaml::from_str("pool:\n  prewarm: 1\n").unwrap();

        assert_eq!(config.pool.id_strategy, IdStrategy::Sequential);
        assert_eq!(config.pool.id_prefix, "worker");
        assert_eq!(config.chain.profile, ChainProfile::Uat);
        assert_eq!(config.chain.log_file, PathBuf::from("poolchain.log"));
    }

    #[test]
    fn test_unknown_profile_is_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str("chain:\n  profile: prod\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_pool_config_from_section() {
        let section = PoolSection {
            id_strategy: IdStrategy::Random,
            id_prefix: "x".to_string(),
            prewarm: 0,
        };
        let pool_config = section.pool_config();
        assert_eq!(pool_config.id_strategy, IdStrategy::Random);
        assert_eq!(pool_config.id_prefix, "x");
    }
}
