//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and whatever actually produces predictions or
//! receives exported reports.

mod predictor;
mod report;

pub use predictor::EndotypePredictor;
pub use report::{ReportFormat, ReportWriter};
