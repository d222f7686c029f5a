//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Dashboard with predictor status and the endotype reference table
//! - Patient data input
//! - Prediction progress and results

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
pub use worker::{PredictionProgress, PredictionWorker, PredictionWorkerHandle};
