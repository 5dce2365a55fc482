// src/domain/ports/mod.rs

pub mod repository;

pub use repository::DatasetRepository;
