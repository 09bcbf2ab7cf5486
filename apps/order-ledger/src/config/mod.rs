//! Configuration module for the order ledger.
//!
//! YAML loading with environment variable interpolation and validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use order_ledger::config::load_config_or_default;
//!
//! // Falls back to defaults when config.yaml does not exist
//! let config = load_config_or_default(None)?;
//!
//! println!("opening balance: {}", config.engine.opening_balance);
//! ```

mod engine;
mod instruments;
mod observability;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::shared::{Money, Symbol};

/// Ceiling on the configured opening balance.
const MAX_OPENING_BALANCE: u64 = 1_000_000_000_000_000;

pub use engine::{CommitRetryConfig, EngineSettings};
pub use instruments::{InstrumentSeed, QuotesConfig};
pub use observability::{LogFormat, LoggingConfig, MetricsSettings, ObservabilityConfig};

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "ORDER_LEDGER_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Engine limits and commit retry.
    #[serde(default)]
    pub engine: EngineSettings,
    /// Instruments seeded into the catalog.
    #[serde(default)]
    pub instruments: Vec<InstrumentSeed>,
    /// Accounts opened at startup.
    #[serde(default)]
    pub accounts: Vec<String>,
    /// Quote refresh loop.
    #[serde(default)]
    pub quotes: QuotesConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to `config.yaml`.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Like [`load_config`], but a missing file yields the defaults.
///
/// # Errors
///
/// Returns a `ConfigError` if an existing file cannot be read, parsed, or
/// validated.
pub fn load_config_or_default(path: Option<&str>) -> Result<Config, ConfigError> {
    match load_config(path) {
        Err(ConfigError::ReadError { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            let config = Config::default();
            validate_config(&config)?;
            Ok(config)
        }
        other => other,
    }
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let var_name = cap.get(1).map_or("", |m| m.as_str());
        let default_value = cap.get(2).map(|m| m.as_str());

        match std::env::var(var_name) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let engine = &config.engine;

    if engine.opening_balance.is_sign_negative() {
        return Err(ConfigError::ValidationError(
            "engine.opening_balance must not be negative".to_string(),
        ));
    }
    if engine.opening_balance > rust_decimal::Decimal::from(MAX_OPENING_BALANCE) {
        return Err(ConfigError::ValidationError(format!(
            "engine.opening_balance must not exceed {MAX_OPENING_BALANCE}"
        )));
    }
    if engine.max_order_quantity == 0 {
        return Err(ConfigError::ValidationError(
            "engine.max_order_quantity must be at least 1".to_string(),
        ));
    }
    if engine.max_page_size == 0 {
        return Err(ConfigError::ValidationError(
            "engine.max_page_size must be at least 1".to_string(),
        ));
    }

    let retry = &engine.commit_retry;
    if retry.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "engine.commit_retry.max_attempts must be at least 1".to_string(),
        ));
    }
    if retry.backoff_multiplier < 1.0 {
        return Err(ConfigError::ValidationError(
            "engine.commit_retry.backoff_multiplier must be at least 1.0".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&retry.jitter_factor) {
        return Err(ConfigError::ValidationError(
            "engine.commit_retry.jitter_factor must be between 0.0 and 1.0".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for seed in &config.instruments {
        let symbol = Symbol::new(&seed.symbol);
        symbol
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("instruments: {e}")))?;
        if !seen.insert(symbol.clone()) {
            return Err(ConfigError::ValidationError(format!(
                "instruments: duplicate symbol {symbol}"
            )));
        }
        if let Some(price) = seed.price
            && price <= rust_decimal::Decimal::ZERO
        {
            return Err(ConfigError::ValidationError(format!(
                "instruments: price of {symbol} must be positive"
            )));
        }
        if let Some(price) = seed.price
            && Money::new(price) > Money::MAX_PRICE
        {
            return Err(ConfigError::ValidationError(format!(
                "instruments: price of {symbol} must not exceed {}",
                Money::MAX_PRICE
            )));
        }
    }

    if config.accounts.iter().any(|a| a.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "accounts: account ids must not be empty".to_string(),
        ));
    }

    Ok(())
}
