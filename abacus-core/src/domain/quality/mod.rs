// abacus-core/src/domain/quality/mod.rs

pub mod imputation;
pub mod scorer;
pub mod validator;
pub mod violation;

pub use imputation::{ImputedDataset, Imputer, UNKNOWN_PLACEHOLDER};
pub use scorer::{QualityReport, QualityScorer};
pub use validator::SchemaValidator;
pub use violation::{ValidationFlags, Violation};
