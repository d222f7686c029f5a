//! Report port: Trait for exporting a prediction outside the process.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::PredictionResult;
use crate::EndotypeError;

/// Output format for an exported report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Text,
}

impl ReportFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
        }
    }
}

/// Trait for report destinations.
///
/// Export is write-only: nothing is ever read back.
pub trait ReportWriter: Send + Sync {
    /// Write one report and return where it landed.
    ///
    /// # Errors
    /// Returns error if rendering or writing fails.
    fn write_report(
        &self,
        result: &PredictionResult,
        format: ReportFormat,
    ) -> Result<PathBuf, EndotypeError>;
}
