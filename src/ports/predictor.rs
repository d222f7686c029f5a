//! Predictor port: the `predict` contract.
//!
//! The rubric is one implementation. A trained model behind a remote service
//! would be another, with the same signature and different internals.

use crate::domain::{PatientInput, PredictionResult};
use crate::EndotypeError;

/// Trait for endotype prediction.
pub trait EndotypePredictor: Send + Sync {
    /// Short identifier shown in logs and reports.
    fn name(&self) -> &'static str;

    /// Produce a prediction for a validated input.
    ///
    /// # Errors
    /// Implementations backed by external resources may fail. The rule-based
    /// rubric never does.
    fn predict(&self, input: PatientInput) -> Result<PredictionResult, EndotypeError>;
}
