//! # Engine Configuration
//!
//! Every fixed constant of the quest lifecycle, with defaults. Hosts may
//! override any subset from a JSON file; missing fields keep their defaults.

use crate::progression::{DEFAULT_THRESHOLDS, ThresholdError, ThresholdTable};
use crate::verification::{
    DEFAULT_EMOTIONAL_KEYWORDS, DEFAULT_RECORDING_MIN_CHARS, DEFAULT_TEXT_MIN_CHARS,
    VerificationRules,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SECOND_MS: u64 = 1_000;
const HOUR_MS: u64 = 60 * 60 * SECOND_MS;

/// Errors raised while assembling an engine.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid experience thresholds: {0}")]
    Thresholds(#[from] ThresholdError),

    #[error("witness delay window is inverted ({min_ms}ms > {max_ms}ms)")]
    WitnessWindow { min_ms: u64, max_ms: u64 },

    #[error("witness success chance must be 0..=100, got {0}")]
    WitnessChance(u8),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Lifecycle constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long a verified quest stays off the board.
    pub cooldown_ms: u64,
    /// Delay between verification and the reflection prompt.
    pub reflection_delay_ms: u64,
    /// Simulated verification time after a proof is submitted.
    pub verification_delay_ms: u64,
    /// How long a success is displayed before the next quest is selected.
    pub display_delay_ms: u64,
    /// Interval of the due-reflection poll.
    pub reflection_poll_ms: u64,
    pub text_min_chars: usize,
    pub recording_min_chars: usize,
    pub reflection_min_chars: usize,
    /// Experience granted for sealing a reflection.
    pub reflection_bonus: u64,
    /// Mock witness response window, inclusive.
    pub witness_min_delay_ms: u64,
    pub witness_max_delay_ms: u64,
    /// Mock witness success chance, percent.
    pub witness_success_percent: u8,
    pub emotional_keywords: Vec<String>,
    pub thresholds: Vec<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 24 * HOUR_MS,
            reflection_delay_ms: 12 * HOUR_MS,
            verification_delay_ms: 1_500,
            display_delay_ms: 3 * SECOND_MS,
            reflection_poll_ms: 60 * SECOND_MS,
            text_min_chars: DEFAULT_TEXT_MIN_CHARS,
            recording_min_chars: DEFAULT_RECORDING_MIN_CHARS,
            reflection_min_chars: 50,
            reflection_bonus: 25,
            witness_min_delay_ms: 3 * SECOND_MS,
            witness_max_delay_ms: 8 * SECOND_MS,
            witness_success_percent: 70,
            emotional_keywords: DEFAULT_EMOTIONAL_KEYWORDS
                .iter()
                .map(|k| (*k).to_string())
                .collect(),
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.threshold_table()?;
        if self.witness_min_delay_ms > self.witness_max_delay_ms {
            return Err(ConfigError::WitnessWindow {
                min_ms: self.witness_min_delay_ms,
                max_ms: self.witness_max_delay_ms,
            });
        }
        if self.witness_success_percent > 100 {
            return Err(ConfigError::WitnessChance(self.witness_success_percent));
        }
        Ok(())
    }

    pub fn threshold_table(&self) -> Result<ThresholdTable, ThresholdError> {
        ThresholdTable::new(self.thresholds.clone())
    }

    #[must_use]
    pub fn verification_rules(&self) -> VerificationRules {
        VerificationRules {
            text_min_chars: self.text_min_chars,
            recording_min_chars: self.recording_min_chars,
            emotional_keywords: self
                .emotional_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cooldown_ms, 86_400_000);
        assert_eq!(config.reflection_delay_ms, 43_200_000);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"reflection_delay_ms": 0, "reflection_bonus": 40}"#);
        assert!(config.is_ok());
        let config = config.unwrap_or_default();
        assert_eq!(config.reflection_delay_ms, 0);
        assert_eq!(config.reflection_bonus, 40);
        assert_eq!(config.text_min_chars, 150);
    }

    #[test]
    fn bad_thresholds_rejected() {
        let result = EngineConfig::from_json(r#"{"thresholds": [5, 10]}"#);
        assert!(matches!(result, Err(ConfigError::Thresholds(_))));
    }

    #[test]
    fn inverted_witness_window_rejected() {
        let config = EngineConfig {
            witness_min_delay_ms: 9_000,
            witness_max_delay_ms: 1_000,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WitnessWindow { .. })
        ));
    }
}
