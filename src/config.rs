//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::crypto::{DEFAULT_BCRYPT_COST, MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use crate::services::inference::{DEFAULT_INFERENCE_URL, PLACEHOLDER_API_KEY};

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Directory backing the file store
    pub data_dir: PathBuf,
    /// Inference endpoint (text-to-image model)
    pub inference_url: String,
    /// Upper bound on one inference round trip
    pub inference_timeout: Duration,
    /// Simulated latency of demo generations
    pub demo_delay: Duration,
    /// bcrypt work factor
    pub bcrypt_cost: u32,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Inference API key; absent means demo mode
    pub inference_api_key: Option<String>,
}

impl Config {
    /// Config for tests: no inference key, no demo delay, cheapest hashing.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
            inference_url: DEFAULT_INFERENCE_URL.to_string(),
            inference_timeout: Duration::from_secs(30),
            demo_delay: Duration::ZERO,
            bcrypt_cost: MIN_BCRYPT_COST,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            inference_api_key: None,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bcrypt_cost: u32 = parse_or(&lookup, "BCRYPT_COST", DEFAULT_BCRYPT_COST);
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid("BCRYPT_COST"));
        }

        Ok(Self {
            frontend_url: lookup("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            port: parse_or(&lookup, "PORT", 8080),
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            inference_url: lookup("INFERENCE_URL")
                .unwrap_or_else(|| DEFAULT_INFERENCE_URL.to_string()),
            inference_timeout: Duration::from_secs(parse_or(
                &lookup,
                "INFERENCE_TIMEOUT_SECS",
                30,
            )),
            demo_delay: Duration::from_millis(parse_or(&lookup, "DEMO_DELAY_MS", 2000)),
            bcrypt_cost,

            jwt_signing_key: lookup("JWT_SIGNING_KEY")
                .ok_or(ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            inference_api_key: lookup("HUGGINGFACE_API_KEY").map(|v| v.trim().to_string()),
        })
    }

    /// The inference key, if one is configured and is not the sample value.
    pub fn inference_credential(&self) -> Option<&str> {
        self.inference_api_key
            .as_deref()
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }
}

fn parse_or<T: FromStr>(lookup: impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    lookup(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_config_from_lookup() {
        let config = Config::from_lookup(vars(&[
            ("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!"),
            ("DEMO_DELAY_MS", "15"),
            ("PORT", " 9090 "),
        ]))
        .expect("Config should load");

        assert_eq!(config.jwt_signing_key, b"test_jwt_key_32_bytes_minimum!!");
        assert_eq!(config.demo_delay, Duration::from_millis(15));
        assert_eq!(config.port, 9090);
        assert_eq!(config.inference_timeout, Duration::from_secs(30));
        assert_eq!(config.bcrypt_cost, DEFAULT_BCRYPT_COST);
    }

    #[test]
    fn test_missing_signing_key() {
        let err = Config::from_lookup(vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SIGNING_KEY")));
    }

    #[test]
    fn test_bcrypt_cost_out_of_range() {
        let err = Config::from_lookup(vars(&[
            ("JWT_SIGNING_KEY", "k"),
            ("BCRYPT_COST", "3"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("BCRYPT_COST")));
    }

    #[test]
    fn test_placeholder_key_is_not_a_credential() {
        let mut config = Config::test_default();
        assert_eq!(config.inference_credential(), None);

        config.inference_api_key = Some(PLACEHOLDER_API_KEY.to_string());
        assert_eq!(config.inference_credential(), None);

        config.inference_api_key = Some(String::new());
        assert_eq!(config.inference_credential(), None);

        config.inference_api_key = Some("hf_real".to_string());
        assert_eq!(config.inference_credential(), Some("hf_real"));
    }
}
