//! Trainer settings: table defaults plus the oracle endpoint.
//!
//! Values come from [`TrainerConfig::default`], a JSON document, or the
//! environment (`HOLDEM_TRAINER_*`), with the environment overriding
//! whatever was loaded before it.

use crate::game::FirstToAct;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const ENV_PREFIX: &str = "HOLDEM_TRAINER_";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(String),
    #[error("invalid value for {key}: {value:?}")]
    BadValue { key: String, value: String },
    #[error("starting stack must be positive")]
    ZeroStack,
    #[error("default bet must be positive")]
    ZeroBet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub url: String,
    pub timeout_ms: u64,
    /// Extra attempts after the first failure before failing open.
    pub retries: u32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self { url: "http://127.0.0.1:5000/ai-move".to_string(), timeout_ms: 5000, retries: 1 }
    }
}

impl OracleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub starting_stack: u64,
    pub ante: u64,
    /// Bet used when the oracle names a bet without an amount and none is outstanding.
    pub default_bet: u64,
    pub first_to_act: FirstToAct,
    /// Reset a busted side to `starting_stack` at the next hand.
    pub rebuy_busted: bool,
    pub oracle: OracleConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            starting_stack: 1000,
            ante: 0,
            default_bet: 10,
            first_to_act: FirstToAct::DealerOpponent,
            rebuy_busted: true,
            oracle: OracleConfig::default(),
        }
    }
}

impl TrainerConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    ///
    /// ```
    /// use holdem_trainer::config::TrainerConfig;
    ///
    /// let cfg = TrainerConfig::from_json(r#"{"starting_stack": 500, "oracle": {"retries": 0}}"#).unwrap();
    /// assert_eq!(cfg.starting_stack, 500);
    /// assert_eq!(cfg.oracle.retries, 0);
    /// assert_eq!(cfg.default_bet, 10);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        cfg.apply_overrides(|key| env::var(format!("{ENV_PREFIX}{key}")).ok())?;
        Ok(cfg)
    }

    /// Apply overrides from any key lookup (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("STARTING_STACK") {
            self.starting_stack = parse_value("STARTING_STACK", &v)?;
        }
        if let Some(v) = lookup("ANTE") {
            self.ante = parse_value("ANTE", &v)?;
        }
        if let Some(v) = lookup("DEFAULT_BET") {
            self.default_bet = parse_value("DEFAULT_BET", &v)?;
        }
        if let Some(v) = lookup("FIRST_TO_ACT") {
            self.first_to_act = match v.trim().to_ascii_lowercase().as_str() {
                "dealer" => FirstToAct::Dealer,
                "dealer_opponent" | "opponent" => FirstToAct::DealerOpponent,
                _ => return Err(bad("FIRST_TO_ACT", &v)),
            };
        }
        if let Some(v) = lookup("REBUY_BUSTED") {
            self.rebuy_busted = parse_value("REBUY_BUSTED", &v)?;
        }
        if let Some(v) = lookup("ORACLE_URL") {
            self.oracle.url = v;
        }
        if let Some(v) = lookup("ORACLE_TIMEOUT_MS") {
            self.oracle.timeout_ms = parse_value("ORACLE_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("ORACLE_RETRIES") {
            self.oracle.retries = parse_value("ORACLE_RETRIES", &v)?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_stack == 0 {
            return Err(ConfigError::ZeroStack);
        }
        if self.default_bet == 0 {
            return Err(ConfigError::ZeroBet);
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| bad(key, value))
}

fn bad(key: &str, value: &str) -> ConfigError {
    ConfigError::BadValue { key: format!("{ENV_PREFIX}{key}"), value: value.to_string() }
}
