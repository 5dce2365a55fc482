// abacus-core/src/domain/detection/config.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// What to do with a feature whose standard deviation is zero.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ZeroVariancePolicy {
    /// Every value of the feature becomes 0.0.
    #[default]
    Substitute,
    /// Abort the run with a degenerate column error.
    Fail,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, Validate, PartialEq)]
pub struct EncodingConfig {
    #[serde(default)]
    pub zero_variance: ZeroVariancePolicy,

    /// Extra columns kept out of the model input (the derived annotation
    /// columns are always excluded).
    #[serde(default)]
    pub exclude_columns: Vec<String>,
}

/// Isolation forest settings.
#[derive(Debug, Deserialize, Serialize, Clone, Validate, PartialEq)]
pub struct DetectionConfig {
    /// Expected share of anomalous rows.
    #[validate(range(exclusive_min = 0.0, max = 0.5))]
    #[serde(default = "default_contamination")]
    pub contamination: f64,

    #[serde(default = "default_seed")]
    pub seed: u64,

    #[validate(range(min = 1))]
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,

    #[validate(range(min = 2))]
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,

    #[validate(range(min = 2))]
    #[serde(default = "default_min_rows")]
    pub min_rows: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            contamination: default_contamination(),
            seed: default_seed(),
            n_estimators: default_n_estimators(),
            max_samples: default_max_samples(),
            min_rows: default_min_rows(),
        }
    }
}

fn default_contamination() -> f64 {
    0.05
}

fn default_seed() -> u64 {
    42
}

fn default_n_estimators() -> usize {
    100
}

fn default_max_samples() -> usize {
    256
}

fn default_min_rows() -> usize {
    5
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_contamination_bounds() {
        assert!(DetectionConfig::default().validate().is_ok());

        let zero = DetectionConfig {
            contamination: 0.0,
            ..DetectionConfig::default()
        };
        assert!(zero.validate().is_err());

        let too_high = DetectionConfig {
            contamination: 0.6,
            ..DetectionConfig::default()
        };
        assert!(too_high.validate().is_err());
    }

    #[test]
    fn test_policy_from_yaml() {
        let cfg: EncodingConfig = serde_yaml::from_str("zero_variance: fail\n").unwrap();
        assert_eq!(cfg.zero_variance, ZeroVariancePolicy::Fail);
        assert!(cfg.exclude_columns.is_empty());
    }
}
