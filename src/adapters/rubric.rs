//! Rubric adapter: Implementation of EndotypePredictor using the fixed
//! scoring rubric.

use crate::domain::{self, PatientInput, PredictionResult};
use crate::ports::EndotypePredictor;
use crate::EndotypeError;

/// Rule-based predictor. Stateless and infallible.
#[derive(Debug, Clone, Copy, Default)]
pub struct RubricPredictor;

impl RubricPredictor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EndotypePredictor for RubricPredictor {
    fn name(&self) -> &'static str {
        "rubric-v1 (mock, not validated)"
    }

    fn predict(&self, input: PatientInput) -> Result<PredictionResult, EndotypeError> {
        Ok(domain::predict(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EndotypeId, Sex};
    use std::sync::Arc;

    #[test]
    fn test_rubric_matches_domain_predict() {
        let input = PatientInput::new(60.0, Sex::Female, 1600.0, 2500.0);
        let via_port = RubricPredictor::new()
            .predict(input.clone())
            .expect("rubric is infallible");
        assert!(via_port.same_outcome(&domain::predict(input)));
        assert_eq!(via_port.endotype, EndotypeId::Two);
    }

    #[test]
    fn test_shared_across_threads() {
        let predictor: Arc<dyn EndotypePredictor> = Arc::new(RubricPredictor::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let predictor = Arc::clone(&predictor);
                std::thread::spawn(move || {
                    let il6r = 1000.0 + 600.0 * f64::from(i);
                    predictor
                        .predict(PatientInput::new(50.0, Sex::Male, il6r, 1000.0))
                        .expect("rubric is infallible")
                        .endotype
                })
            })
            .collect();

        let ids: Vec<EndotypeId> = handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .collect();
        assert_eq!(
            ids,
            vec![EndotypeId::One, EndotypeId::One, EndotypeId::Two, EndotypeId::Two]
        );
    }
}
