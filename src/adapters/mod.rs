//! Adapters layer: Concrete implementations of ports.
//!
//! - `rubric`: the rule-based endotype predictor
//! - `report`: JSON / text report rendering and file export
//! - `sanitize`: patient-value filtering for logs

pub mod report;
pub mod rubric;
pub mod sanitize;

pub use report::FileReportWriter;
pub use rubric::RubricPredictor;
