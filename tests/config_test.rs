use poolchain::chain::{ChainProfile, Severity};
use poolchain::pool::IdStrategy;
use poolchain::Core;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

// Environment variables are process-wide; serialize the tests that touch them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const ENV_VARS: [&str; 6] = [
    "POOLCHAIN_ID_STRATEGY",
    "POOLCHAIN_ID_PREFIX",
    "POOLCHAIN_PREWARM",
    "POOLCHAIN_PROFILE",
    "POOLCHAIN_LOG_FILE",
    "POOLCHAIN_EMAIL",
];

/// Run `f` with the given variables set, restoring the originals afterwards
fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let saved: Vec<(&str, Option<String>)> =
        ENV_VARS.iter().map(|k| (*k, env::var(k).ok())).collect();
    for key in ENV_VARS {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    let result = f();

    for (key, value) in saved {
        match value {
            Some(v) => env::set_var(key, v),
            None => env::remove_var(key),
        }
    }
    result
}

/// Test loading configuration from YAML file
#[test]
fn test_load_yaml_config() {
    let yaml = r#"
pool:
  id_strategy: sequential
  id_prefix: job
  prewarm: 2

chain:
  profile: debug
  log_file: chain.log
  email_recipient: oncall@example.com
"#;

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, yaml).unwrap();

    let config = poolchain::config::load_from_yaml(&config_path).unwrap();

    assert_eq!(config.pool.id_strategy, IdStrategy::Sequential);
    assert_eq!(config.pool.id_prefix, "job");
    assert_eq!(config.pool.prewarm, 2);
    assert_eq!(config.chain.profile, ChainProfile::Debug);
    assert_eq!(config.chain.log_file, PathBuf::from("chain.log"));
    assert_eq!(config.chain.email_recipient, "oncall@example.com");
}

/// Test that a missing file is reported with its path
#[test]
fn test_missing_yaml_file() {
    let err = poolchain::config::load_config(Some("/nonexistent/poolchain.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

/// Test that malformed YAML is rejected
#[test]
fn test_invalid_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bad.yaml");
    fs::write(&config_path, "pool:\n  prewarm: lots\n").unwrap();

    let err = poolchain::config::load_from_yaml(&config_path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse YAML configuration"));
}

/// Test loading configuration from environment variables
#[test]
fn test_load_env_config() {
    let config = with_env(
        &[
            ("POOLCHAIN_ID_STRATEGY", "random"),
            ("POOLCHAIN_ID_PREFIX", "task"),
            ("POOLCHAIN_PREWARM", "3"),
            ("POOLCHAIN_PROFILE", "DEBUG"),
            ("POOLCHAIN_LOG_FILE", "/tmp/poolchain-test.log"),
            ("POOLCHAIN_EMAIL", "sre@example.com"),
        ],
        poolchain::config::load_from_env,
    )
    .unwrap();

    assert_eq!(config.pool.id_strategy, IdStrategy::Random);
    assert_eq!(config.pool.id_prefix, "task");
    assert_eq!(config.pool.prewarm, 3);
    assert_eq!(config.chain.profile, ChainProfile::Debug);
    assert_eq!(config.chain.log_file, PathBuf::from("/tmp/poolchain-test.log"));
    assert_eq!(config.chain.email_recipient, "sre@example.com");
}

/// Test that unset environment variables keep their defaults
#[test]
fn test_env_defaults() {
    let config = with_env(&[], poolchain::config::load_from_env).unwrap();

    assert_eq!(config.pool.id_strategy, IdStrategy::Sequential);
    assert_eq!(config.pool.prewarm, 0);
    assert_eq!(config.chain.profile, ChainProfile::Uat);
}

/// Test that invalid environment values are errors, not silent defaults
#[test]
fn test_env_invalid_values() {
    let err = with_env(
        &[("POOLCHAIN_PROFILE", "staging")],
        poolchain::config::load_from_env,
    )
    .unwrap_err();
    assert!(err.to_string().contains("POOLCHAIN_PROFILE"));

    let err = with_env(
        &[("POOLCHAIN_PREWARM", "many")],
        poolchain::config::load_from_env,
    )
    .unwrap_err();
    assert!(err.to_string().contains("POOLCHAIN_PREWARM"));
}

/// Test that Core wires pool and chain from configuration
#[test]
fn test_core_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let yaml = format!(
        "pool:\n  prewarm: 2\nchain:\n  profile: uat\n  log_file: {}\n",
        temp_dir.path().join("logs").join("chain.log").display()
    );
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, yaml).unwrap();

    let config = poolchain::config::load_from_yaml(&config_path).unwrap();
    let core = Core::new(config).unwrap();

    assert_eq!(core.pool.available_count(), 2);
    assert_eq!(
        core.chain().thresholds(),
        vec![Severity::Debug, Severity::Error, Severity::Fatal]
    );

    let report = core.log(Severity::Error, "written to nested dir");
    assert!(report.is_ok());
    assert!(temp_dir.path().join("logs").join("chain.log").exists());
}
