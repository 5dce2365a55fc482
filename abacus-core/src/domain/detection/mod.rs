// abacus-core/src/domain/detection/mod.rs

pub mod config;
pub mod encoder;
pub mod fuser;
pub mod isolation;
pub mod model;

pub use config::{DetectionConfig, EncodingConfig, ZeroVariancePolicy};
pub use encoder::{EncodedFeature, EncodedMatrix, EncodingContext, FeatureEncoding};
pub use fuser::{AnomalyBreakdown, AnomalyFuser, AnomalyStats, AnomalyVerdict};
pub use isolation::{IsolationForest, IsolationForestParams};
pub use model::{OutlierDetector, OutlierScores};
