// abacus-core/src/lib.rs

// 1. Documentation
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts the application needs from the outside world (dataset loading).
pub mod ports;

// 2. Domain (business core)
// Validation rules, quality scoring, encoding, isolation forest, fusion.
// Depends on nothing else (neither infra nor app).
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB / DataFusion loaders, YAML config, JSON record store.
pub mod infrastructure;

// 4. Application (Use Cases)
// Analysis of one dataset, multi-dataset pipeline, record queries, clean.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::AbacusError;
