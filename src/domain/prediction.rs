//! Prediction result: classification packaged with its record and input.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::endotype::{lookup, EndotypeId, EndotypeRecord};
use super::patient::PatientInput;
use super::scoring::{score, ScoreBreakdown};

/// Shown ahead of every recommendation block and in every exported report.
pub const NOT_VALIDATED_NOTICE: &str = "NOT RELIABLE: This prediction is NOT validated and NOT reliable. \
For visualization only. Full functionality under development.";

/// Outcome of one classification call.
///
/// Lives for one display cycle; nothing caches or persists it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub endotype: EndotypeId,

    /// Reference record resolved from the static table
    pub record: &'static EndotypeRecord,

    /// Rubric rules that produced `endotype`
    pub score: ScoreBreakdown,

    /// The exact input that produced this result
    pub raw_input: PatientInput,

    pub timestamp: DateTime<Utc>,
}

impl PredictionResult {
    /// Whether two results agree on everything except when they were computed.
    #[must_use]
    pub fn same_outcome(&self, other: &Self) -> bool {
        self.endotype == other.endotype
            && std::ptr::eq(self.record, other.record)
            && self.score == other.score
            && self.raw_input == other.raw_input
    }
}

/// Classify the input and resolve its reference record, stamped with `now`.
#[must_use]
pub fn predict(input: PatientInput) -> PredictionResult {
    predict_at(input, Utc::now())
}

/// Same as [`predict`] with an explicit timestamp.
#[must_use]
pub fn predict_at(input: PatientInput, timestamp: DateTime<Utc>) -> PredictionResult {
    let breakdown = score(&input);
    let endotype = breakdown.endotype();
    PredictionResult {
        endotype,
        record: lookup(endotype),
        score: breakdown,
        raw_input: input,
        timestamp,
    }
}
