//! Configuration structures for the extraction pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main configuration for the recu pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecuConfig {
    /// Local extraction configuration.
    pub extraction: ExtractionConfig,

    /// Product normalizer configuration.
    pub normalizer: NormalizerConfig,

    /// Template learning configuration.
    pub learning: LearningConfig,

    /// External AI fallback configuration.
    pub ai: AiConfig,
}

/// Local extraction and fallback-decision configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum local confidence to skip the AI fallback.
    pub min_confidence: f32,

    /// Item count granting full item-count credit in the confidence score.
    pub min_items: usize,

    /// Currency tag used when none is detected.
    pub default_currency: String,

    /// Absolute tolerance when checking a printed line total against
    /// qty x price.
    pub total_tolerance: Decimal,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.85,
            min_items: 3,
            default_currency: "CDF".to_string(),
            total_tolerance: Decimal::new(1, 2),
        }
    }
}

/// Product normalizer thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Confidence below which a match needs manual review.
    pub accept_threshold: f32,

    /// Minimum combined similarity for a fuzzy match.
    pub fuzzy_floor: f32,

    /// Minimum cosine similarity for a semantic match.
    pub semantic_floor: f32,

    /// Number of ranked suggestions attached to every result.
    pub suggestion_limit: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            accept_threshold: 0.85,
            fuzzy_floor: 0.55,
            semantic_floor: 0.5,
            suggestion_limit: 3,
        }
    }
}

/// Template learning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Corrected samples required before a shop template is synthesized.
    pub min_samples: usize,

    /// Local confidence at or above which corrections are not learned from.
    pub max_local_confidence: f32,

    /// Acceptance threshold written into learned templates.
    pub learned_threshold: f32,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            min_samples: 3,
            max_local_confidence: 0.8,
            learned_threshold: 0.7,
        }
    }
}

/// External AI fallback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Minimum interval between outgoing AI requests, in milliseconds.
    pub min_request_interval_ms: u64,

    /// Confidence assigned when the AI response does not report one.
    pub default_confidence: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            min_request_interval_ms: 1000,
            default_confidence: 0.9,
        }
    }
}

impl RecuConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RecuConfig::default();
        assert_eq!(config.extraction.min_confidence, 0.85);
        assert_eq!(config.extraction.min_items, 3);
        assert_eq!(config.learning.min_samples, 3);
        assert_eq!(config.normalizer.accept_threshold, 0.85);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RecuConfig =
            serde_json::from_str(r#"{"extraction": {"default_currency": "USD"}}"#).unwrap();
        assert_eq!(config.extraction.default_currency, "USD");
        assert_eq!(config.extraction.min_items, 3);
        assert_eq!(config.ai.min_request_interval_ms, 1000);
    }
}
