//! Domain layer: Core business types and logic.
//!
//! Pure types and functions with no I/O. The rubric, the reference table and
//! prediction packaging all live here.

mod endotype;
mod patient;
mod prediction;
pub mod scoring;

pub use endotype::{lookup, reference_table, EndotypeId, EndotypeRecord, InvalidEndotype};
pub use patient::{ranges, Biomarkers, Demographics, PatientInput, Sex, SmokingStatus};
pub use prediction::{predict, predict_at, PredictionResult, NOT_VALIDATED_NOTICE};
pub use scoring::{classify, score, ScoreBreakdown, ScoringRule};
