//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::arrangement::ComparisonPolicy;

/// Arrangement construction settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrangementConfig {
    /// Tolerance for ordering crossing events
    pub comparison: ComparisonPolicy,
}

/// End-to-end settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Homology dimension d: the engines read ∂_d and ∂_{d+1}
    pub homology_dimension: usize,
    pub arrangement: ArrangementConfig,
    /// Re-reduce every face from scratch and compare with the vineyard result
    pub verify_barcodes: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            homology_dimension: 0,
            arrangement: ArrangementConfig::default(),
            verify_barcodes: false,
        }
    }
}

impl PipelineConfig {
    pub fn with_dimension(homology_dimension: usize) -> Self {
        Self { homology_dimension, ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.homology_dimension, 0);
        assert!(!config.verify_barcodes);
        assert!((config.arrangement.comparison.epsilon - 2f64.powi(-30)).abs() < 1e-20);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = PipelineConfig { verify_barcodes: true, ..PipelineConfig::with_dimension(1) };
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
        assert_eq!(
            back.arrangement.comparison.epsilon.to_bits(),
            2f64.powi(-30).to_bits()
        );
    }
}
