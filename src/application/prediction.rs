//! Prediction service: Orchestrates a prediction and its export.
//!
//! This service coordinates:
//! - Delegating to the configured predictor
//! - Logging outcomes without raw patient values
//! - Counting predictions for the current session (memory only)
//! - Report export

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::domain::{PatientInput, PredictionResult};
use crate::ports::{EndotypePredictor, ReportFormat, ReportWriter};
use crate::EndotypeError;

/// Service for running endotype predictions.
///
/// Holds no per-prediction state; concurrent calls need no coordination.
pub struct PredictionService<P, R>
where
    P: EndotypePredictor,
    R: ReportWriter,
{
    predictor: Arc<P>,
    reports: Arc<R>,
    session_count: AtomicUsize,
}

impl<P, R> PredictionService<P, R>
where
    P: EndotypePredictor,
    R: ReportWriter,
{
    /// Create a new prediction service.
    pub fn new(predictor: Arc<P>, reports: Arc<R>) -> Self {
        Self {
            predictor,
            reports,
            session_count: AtomicUsize::new(0),
        }
    }

    /// Name of the underlying predictor.
    #[must_use]
    pub fn predictor_name(&self) -> &'static str {
        self.predictor.name()
    }

    /// The report writer used by [`Self::export`].
    #[must_use]
    pub fn reports(&self) -> &R {
        &self.reports
    }

    /// Validate the input and run one prediction.
    ///
    /// # Errors
    /// Returns error if the input is out of range or the predictor fails.
    pub fn predict(&self, input: PatientInput) -> Result<PredictionResult, EndotypeError> {
        input
            .validate()
            .map_err(|errors| EndotypeError::Validation(errors.join(", ")))?;

        tracing::debug!("Running predictor {}", self.predictor.name());

        let result = self.predictor.predict(input)?;
        self.session_count.fetch_add(1, Ordering::Relaxed);

        tracing::info!(
            endotype = result.endotype.get(),
            score = result.score.total(),
            risk = result.record.risk_category,
            "Prediction complete"
        );
        tracing::debug!(
            "Rules fired: {:?}",
            result
                .score
                .rules
                .iter()
                .map(|r| r.description())
                .collect::<Vec<_>>()
        );

        Ok(result)
    }

    /// Number of successful predictions since the service was created.
    #[must_use]
    pub fn predictions_this_session(&self) -> usize {
        self.session_count.load(Ordering::Relaxed)
    }

    /// Export a prediction as a report.
    ///
    /// # Errors
    /// Returns error if rendering or writing fails.
    pub fn export(
        &self,
        result: &PredictionResult,
        format: ReportFormat,
    ) -> Result<PathBuf, EndotypeError> {
        self.reports.write_report(result, format).map_err(|e| {
            tracing::error!("Report export failed: {}", e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FileReportWriter, RubricPredictor};
    use crate::domain::{EndotypeId, Sex};
    use tempfile::tempdir;

    struct UnavailablePredictor;

    impl EndotypePredictor for UnavailablePredictor {
        fn name(&self) -> &'static str {
            "remote (offline)"
        }

        fn predict(&self, _input: PatientInput) -> Result<PredictionResult, EndotypeError> {
            Err(EndotypeError::Predictor("backend unreachable".to_string()))
        }
    }

    fn create_test_service(
        dir: &std::path::Path,
    ) -> PredictionService<RubricPredictor, FileReportWriter> {
        PredictionService::new(
            Arc::new(RubricPredictor::new()),
            Arc::new(FileReportWriter::new(dir)),
        )
    }

    #[test]
    fn test_prediction_pipeline() {
        let dir = tempdir().expect("tempdir");
        let service = create_test_service(dir.path());
        assert_eq!(service.predictions_this_session(), 0);

        let input = PatientInput::new(50.0, Sex::Male, 1800.0, 1000.0).with_crp(4.0);
        let result = service.predict(input).expect("Should predict");

        assert_eq!(result.endotype, EndotypeId::Two);
        assert_eq!(result.record.risk_category, "Low-Moderate");
        assert_eq!(service.predictions_this_session(), 1);
    }

    #[test]
    fn test_export_round_trip_to_disk() {
        let dir = tempdir().expect("tempdir");
        let service = create_test_service(dir.path());

        let result = service
            .predict(PatientInput::new(40.0, Sex::Female, 1000.0, 1000.0))
            .expect("Should predict");
        let path = service
            .export(&result, ReportFormat::Text)
            .expect("Should export");

        assert!(path.starts_with(dir.path()));
        let body = std::fs::read_to_string(path).expect("read report");
        assert!(body.contains("Endotype:            1 (Endotype 1)"));
    }

    #[test]
    fn test_out_of_range_input_is_rejected() {
        let dir = tempdir().expect("tempdir");
        let service = create_test_service(dir.path());

        let err = service
            .predict(PatientInput::new(12.0, Sex::Male, 1000.0, 1000.0))
            .expect_err("Should fail");
        assert!(matches!(err, EndotypeError::Validation(ref m) if m.starts_with("Age")));
        assert_eq!(service.predictions_this_session(), 0);
    }

    #[test]
    fn test_predictor_failure_is_not_counted() {
        let dir = tempdir().expect("tempdir");
        let service = PredictionService::new(
            Arc::new(UnavailablePredictor),
            Arc::new(FileReportWriter::new(dir.path())),
        );

        let err = service
            .predict(PatientInput::new(40.0, Sex::Female, 1000.0, 1000.0))
            .expect_err("Should fail");
        assert!(matches!(err, EndotypeError::Predictor(_)));
        assert_eq!(service.predictions_this_session(), 0);
        assert_eq!(service.predictor_name(), "remote (offline)");
    }
}
