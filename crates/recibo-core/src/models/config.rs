//! Configuration model

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for recibo.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReciboConfig {
    /// Field extraction settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Escalation settings.
    #[serde(default)]
    pub escalation: EscalationConfig,
}

impl ReciboConfig {
    /// Load configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Settings that steer the field scanners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Currency assigned to amounts that carry no symbol of their own.
    pub default_currency: String,

    /// How to read ambiguous numeric dates such as 03/04/2025.
    pub date_order: DateOrder,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_currency: "USD".to_string(),
            date_order: DateOrder::MonthFirst,
        }
    }
}

/// Component order for ambiguous numeric dates.
///
/// Only consulted when both the day and month values are 12 or less;
/// otherwise the components disambiguate themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// US style: 03/04/2025 is March 4th.
    #[default]
    MonthFirst,
    /// European style: 03/04/2025 is April 3rd.
    DayFirst,
}

/// Settings for the escalation decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationConfig {
    /// Overall confidence below this value triggers escalation.
    pub threshold: f32,

    /// Per-field weights for the overall confidence.
    pub weights: ConfidenceWeights,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            weights: ConfidenceWeights::default(),
        }
    }
}

/// Weights used to combine per-field confidences into an overall score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    pub amount: f32,
    pub date: f32,
    pub provider: f32,
    pub description: f32,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            amount: 0.4,
            date: 0.3,
            provider: 0.2,
            description: 0.1,
        }
    }
}
