//! # Endotype
//!
//! Atherosclerosis endotype explorer.
//!
//! This crate provides:
//! - A fixed, rule-based rubric that classifies biomarker inputs into one of
//!   four endotypes
//! - The static reference table describing each endotype
//! - Report export (JSON / plain text)
//! - Terminal UI for entering inputs and viewing results
//!
//! **Visualization only.** The rubric uses placeholder thresholds and is not a
//! validated model. Do not use it for clinical or research decisions.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (PatientInput, EndotypeRecord, rubric)
//! - `ports`: Trait definitions for prediction and report export
//! - `adapters`: Concrete implementations (rubric predictor, file reports, log sanitizing)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Environment-driven runtime settings
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{predict, EndotypeId, EndotypeRecord, PatientInput, PredictionResult};

/// Result type for endotype operations
pub type Result<T> = std::result::Result<T, EndotypeError>;

/// Main error type for the crate
#[derive(Debug, thiserror::Error)]
pub enum EndotypeError {
    #[error("Invalid patient data: {0}")]
    Validation(String),

    #[error("Predictor failed: {0}")]
    Predictor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
