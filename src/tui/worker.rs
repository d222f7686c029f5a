//! Background prediction worker.
//!
//! The rubric itself is instantaneous. The worker exists so the cosmetic
//! "remote service" delay can elapse without blocking the TUI main loop.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::application::PredictionService;
use crate::domain::{PatientInput, PredictionResult};
use crate::ports::{EndotypePredictor, ReportWriter};

/// Progress updates from the prediction worker.
#[derive(Debug, Clone)]
pub enum PredictionProgress {
    /// Simulated latency is elapsing
    Waiting,
    /// Calling the predictor
    Predicting,
    /// Prediction complete
    Complete(PredictionResult),
    /// The predictor reported an error
    Error(String),
}

/// Handle to a running prediction worker.
pub struct PredictionWorkerHandle {
    /// Receiver for progress updates
    pub progress_rx: Receiver<PredictionProgress>,
    _handle: JoinHandle<()>,
}

impl PredictionWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<PredictionProgress> {
        self.progress_rx.try_recv().ok()
    }
}

/// Runs one prediction on a background thread.
pub struct PredictionWorker;

impl PredictionWorker {
    /// Spawn a background prediction.
    ///
    /// Returns a handle to receive progress updates.
    pub fn spawn<P, R>(
        service: Arc<PredictionService<P, R>>,
        input: PatientInput,
        latency: Duration,
    ) -> PredictionWorkerHandle
    where
        P: EndotypePredictor + 'static,
        R: ReportWriter + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_with_progress(service, input, latency, tx);
        });

        PredictionWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_with_progress<P, R>(
        service: Arc<PredictionService<P, R>>,
        input: PatientInput,
        latency: Duration,
        tx: Sender<PredictionProgress>,
    ) where
        P: EndotypePredictor + 'static,
        R: ReportWriter + 'static,
    {
        let _ = tx.send(PredictionProgress::Waiting);
        if !latency.is_zero() {
            thread::sleep(latency);
        }

        let _ = tx.send(PredictionProgress::Predicting);
        match service.predict(input) {
            Ok(result) => {
                let _ = tx.send(PredictionProgress::Complete(result));
            }
            Err(e) => {
                let _ = tx.send(PredictionProgress::Error(e.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FileReportWriter, RubricPredictor};
    use crate::domain::{EndotypeId, Sex};

    #[test]
    fn test_worker_delivers_result() {
        let service = Arc::new(PredictionService::new(
            Arc::new(RubricPredictor::new()),
            Arc::new(FileReportWriter::new(std::env::temp_dir())),
        ));
        let input = PatientInput::new(70.0, Sex::Male, 2500.0, 3500.0)
            .with_tnfr1(1200.0)
            .with_ldl(140.0);

        let handle = PredictionWorker::spawn(service.clone(), input, Duration::from_millis(5));

        let mut seen = Vec::new();
        loop {
            match handle
                .progress_rx
                .recv_timeout(Duration::from_secs(5))
                .expect("worker should report")
            {
                PredictionProgress::Complete(result) => {
                    assert_eq!(result.endotype, EndotypeId::Four);
                    break;
                }
                PredictionProgress::Error(message) => panic!("unexpected error: {message}"),
                other => seen.push(format!("{other:?}")),
            }
        }

        assert_eq!(seen, vec!["Waiting".to_string(), "Predicting".to_string()]);
        assert_eq!(service.predictions_this_session(), 1);
    }
}
