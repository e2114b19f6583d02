//! Configuration for the pricing pipeline

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{ChainError, ChainResult};
use crate::data::CacheConfig;
use crate::pipeline::DEFAULT_RISK_FREE_RATE;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Underlying symbol to fetch
    pub symbol: String,
    /// Annualized risk-free rate
    pub risk_free_rate: f64,
    /// Only price the nearest N expiries (None = all)
    pub max_expiries: Option<usize>,
    /// Price on the rayon pool
    pub parallel: bool,
    /// Snapshot cache
    pub cache: CacheConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            symbol: "SPY".to_string(),
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            max_expiries: None,
            parallel: false,
            cache: CacheConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> ChainResult<Self> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| ChainError::config(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ChainResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(ChainError::config("symbol must not be empty"));
        }
        if !self.risk_free_rate.is_finite() || self.risk_free_rate.abs() >= 1.0 {
            return Err(ChainError::config(format!(
                "risk_free_rate must be a decimal rate in (-1, 1), got {}",
                self.risk_free_rate
            )));
        }
        if self.max_expiries == Some(0) {
            return Err(ChainError::config("max_expiries must be at least 1"));
        }
        if self.cache.max_age_hours < 0 {
            return Err(ChainError::config("cache.max_age_hours must not be negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.risk_free_rate, 0.045);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pricer.json");
        fs::write(&path, r#"{"symbol": "QQQ", "max_expiries": 3, "cache": {"enabled": false}}"#).unwrap();

        let config = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.symbol, "QQQ");
        assert_eq!(config.max_expiries, Some(3));
        assert_eq!(config.risk_free_rate, DEFAULT_RISK_FREE_RATE);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.max_age_hours, 24);
    }

    #[test]
    fn test_invalid() {
        let bad_rate = PipelineConfig {
            risk_free_rate: 4.5,
            ..Default::default()
        };
        assert!(matches!(bad_rate.validate(), Err(ChainError::Config(_))));

        let no_expiries = PipelineConfig {
            max_expiries: Some(0),
            ..Default::default()
        };
        assert!(no_expiries.validate().is_err());

        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            PipelineConfig::from_json_file(&path),
            Err(ChainError::Config(_))
        ));
    }
}
