pub mod dataset;
pub mod detection;
pub mod error;
pub mod ports;
pub mod project;
pub mod quality;

#[cfg(test)]
pub(crate) mod test_support;

// Shortcut for callers outside the domain
pub use error::DomainError;
