//! Report adapter: renders predictions as JSON or text and writes them to a
//! directory.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    EndotypeId, EndotypeRecord, PatientInput, PredictionResult, ScoringRule, NOT_VALIDATED_NOTICE,
};
use crate::ports::{ReportFormat, ReportWriter};
use crate::EndotypeError;

/// One fired rubric rule as it appears in an exported report.
#[derive(Debug, Clone, Serialize)]
pub struct RuleEntry {
    pub rule: ScoringRule,
    pub description: &'static str,
    pub points: u8,
}

/// JSON document written for a prediction.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedReport<'a> {
    pub notice: &'static str,
    pub predicted_at: DateTime<Utc>,
    pub endotype: EndotypeId,
    pub score: u8,
    pub rules_fired: Vec<RuleEntry>,
    pub record: &'static EndotypeRecord,
    pub input: &'a PatientInput,
}

impl<'a> ExportedReport<'a> {
    #[must_use]
    pub fn new(result: &'a PredictionResult) -> Self {
        Self {
            notice: NOT_VALIDATED_NOTICE,
            predicted_at: result.timestamp,
            endotype: result.endotype,
            score: result.score.total(),
            rules_fired: result
                .score
                .rules
                .iter()
                .map(|rule| RuleEntry {
                    rule: *rule,
                    description: rule.description(),
                    points: rule.points(),
                })
                .collect(),
            record: result.record,
            input: &result.raw_input,
        }
    }
}

/// Render a prediction as pretty-printed JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn render_json(result: &PredictionResult) -> Result<String, EndotypeError> {
    Ok(serde_json::to_string_pretty(&ExportedReport::new(result))?)
}

fn measured(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v} {unit}"),
        None => "not measured".to_string(),
    }
}

/// Render a prediction as a plain-text summary.
#[must_use]
pub fn render_text(result: &PredictionResult) -> String {
    let record = result.record;
    let d = &result.raw_input.demographics;
    let b = &result.raw_input.biomarkers;

    let mut lines = vec![
        "Atherosclerosis Endotype Report".to_string(),
        "===============================".to_string(),
        format!("Predicted: {}", result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")),
        String::new(),
        NOT_VALIDATED_NOTICE.to_string(),
        String::new(),
        format!("Endotype:            {} ({})", result.endotype, record.name),
        format!("Description:         {}", record.description),
        format!("Hazard ratio:        {:.1}", record.hazard_ratio),
        format!("Confidence interval: {}", record.confidence_interval),
        format!("Risk category:       {}", record.risk_category),
        String::new(),
        format!(
            "Score: {} / {}",
            result.score.total(),
            crate::domain::scoring::MAX_SCORE
        ),
    ];

    if result.score.rules.is_empty() {
        lines.push("  (no rubric rules fired)".to_string());
    }
    for rule in &result.score.rules {
        lines.push(format!("  +{}  {}", rule.points(), rule.description()));
    }

    lines.push(String::new());
    lines.push("Inputs".to_string());
    lines.push(format!("  Age:     {} years", d.age));
    lines.push(format!("  Sex:     {}", d.sex.label()));
    lines.push(format!("  BMI:     {}", measured(d.bmi, "kg/m2")));
    lines.push(format!(
        "  Smoking: {}",
        d.smoking.map_or("not recorded", |s| s.label())
    ));
    lines.push(format!("  IL6R:    {} pg/mL", b.il6r));
    lines.push(format!("  HSPB1:   {} pg/mL", b.hspb1));
    lines.push(format!("  TNFR1:   {}", measured(b.tnfr1, "pg/mL")));
    lines.push(format!("  hs-CRP:  {}", measured(b.crp, "mg/L")));
    lines.push(format!("  LDL:     {}", measured(b.ldl, "mg/dL")));
    lines.push(format!("  HDL:     {}", measured(b.hdl, "mg/dL")));

    lines.push(String::new());
    lines.push("Biological pathways".to_string());
    for (i, pathway) in record.pathways.iter().enumerate() {
        lines.push(format!("  {}. {}", i + 1, pathway));
    }

    lines.push(String::new());
    lines.push("Recommended actions".to_string());
    lines.push(format!("  {NOT_VALIDATED_NOTICE}"));
    for recommendation in record.recommendations {
        lines.push(format!("  - {recommendation}"));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render in the requested format.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn render(result: &PredictionResult, format: ReportFormat) -> Result<String, EndotypeError> {
    match format {
        ReportFormat::Json => render_json(result),
        ReportFormat::Text => Ok(render_text(result)),
    }
}

/// Writes reports as individual files under a directory.
#[derive(Debug, Clone)]
pub struct FileReportWriter {
    dir: PathBuf,
}

impl FileReportWriter {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create `endotype-report-<stamp>[-n].<ext>` exclusively, taking the
    /// first suffix nobody else holds.
    fn create_unique(
        &self,
        timestamp: DateTime<Utc>,
        format: ReportFormat,
    ) -> Result<(PathBuf, File), EndotypeError> {
        let stem = format!("endotype-report-{}", timestamp.format("%Y%m%d-%H%M%S"));
        let ext = format.extension();

        let mut n = 0u32;
        loop {
            let name = if n == 0 {
                format!("{stem}.{ext}")
            } else {
                format!("{stem}-{n}.{ext}")
            };
            let path = self.dir.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl ReportWriter for FileReportWriter {
    fn write_report(
        &self,
        result: &PredictionResult,
        format: ReportFormat,
    ) -> Result<PathBuf, EndotypeError> {
        let body = render(result, format)?;
        fs::create_dir_all(&self.dir)?;

        let (path, mut file) = self.create_unique(result.timestamp, format)?;
        file.write_all(body.as_bytes())?;

        tracing::info!("Exported {:?} report to {}", format, path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{predict_at, Sex, SmokingStatus};
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn sample_result() -> PredictionResult {
        let input = PatientInput::new(70.0, Sex::Male, 2500.0, 3500.0)
            .with_smoking(SmokingStatus::Current)
            .with_tnfr1(1200.0)
            .with_ldl(140.0);
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 5).unwrap();
        predict_at(input, ts)
    }

    #[test]
    fn test_json_report_shape() {
        let json = render_json(&sample_result()).expect("render");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");

        assert_eq!(value["endotype"], 4);
        assert_eq!(value["score"], 7);
        assert_eq!(value["rules_fired"][0]["rule"], "il6r_high");
        assert_eq!(value["rules_fired"][0]["points"], 2);
        assert_eq!(value["record"]["risk_category"], "Very High");
        assert_eq!(value["record"]["pathways"].as_array().map(Vec::len), Some(6));
        assert_eq!(value["input"]["biomarkers"]["tnfr1"], 1200.0);
        assert!(value["input"]["biomarkers"]["crp"].is_null());
        assert_eq!(value["notice"], NOT_VALIDATED_NOTICE);
        assert_eq!(value["predicted_at"], "2024-03-01T09:30:05Z");
    }

    #[test]
    fn test_text_report_content() {
        let text = render_text(&sample_result());

        assert!(text.contains("Endotype:            4 (Endotype 4)"));
        assert!(text.contains("Hazard ratio:        5.2"));
        assert!(text.contains("Score: 7 / 9"));
        assert!(text.contains("  +2  IL6R > 2000 pg/mL"));
        assert!(text.contains("  hs-CRP:  not measured"));
        assert!(text.contains("  Smoking: Current"));

        // The notice precedes the first recommendation.
        let notice = text.rfind(NOT_VALIDATED_NOTICE).expect("notice");
        let first = text
            .find("Urgent cardiovascular risk assessment")
            .expect("recommendation");
        assert!(notice < first);

        // Pathway order is preserved.
        let p1 = text.find("1. ↑↑↑ Multi-pathway").expect("first pathway");
        let p6 = text.find("6. Advanced plaque instability markers").expect("last pathway");
        assert!(p1 < p6);
    }

    #[test]
    fn test_hazard_ratio_one_decimal() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 5).unwrap();
        let result = predict_at(PatientInput::new(40.0, Sex::Female, 1000.0, 1000.0), ts);
        let text = render_text(&result);
        assert!(text.contains("Hazard ratio:        1.0"));
        assert!(text.contains("(no rubric rules fired)"));
    }

    #[test]
    fn test_file_writer_creates_unique_files() {
        let dir = tempdir().expect("tempdir");
        let writer = FileReportWriter::new(dir.path().join("nested"));
        let result = sample_result();

        let first = writer
            .write_report(&result, ReportFormat::Json)
            .expect("write json");
        let second = writer
            .write_report(&result, ReportFormat::Json)
            .expect("write json again");
        let text = writer
            .write_report(&result, ReportFormat::Text)
            .expect("write text");

        assert_eq!(
            first.file_name().and_then(|n| n.to_str()),
            Some("endotype-report-20240301-093005.json")
        );
        assert_eq!(
            second.file_name().and_then(|n| n.to_str()),
            Some("endotype-report-20240301-093005-1.json")
        );
        assert_eq!(text.extension().and_then(|e| e.to_str()), Some("txt"));

        let body = std::fs::read_to_string(&first).expect("read back");
        assert!(body.contains("\"endotype\": 4"));
    }

    #[test]
    fn test_concurrent_exports_never_overwrite() {
        let dir = tempdir().expect("tempdir");
        let writer = std::sync::Arc::new(FileReportWriter::new(dir.path()));
        let result = std::sync::Arc::new(sample_result());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let writer = std::sync::Arc::clone(&writer);
                let result = std::sync::Arc::clone(&result);
                std::thread::spawn(move || {
                    writer
                        .write_report(&result, ReportFormat::Text)
                        .expect("write text")
                })
            })
            .collect();

        let mut paths: Vec<PathBuf> = handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 8);

        let on_disk = std::fs::read_dir(dir.path()).expect("read dir").count();
        assert_eq!(on_disk, 8);
        for path in &paths {
            let body = std::fs::read_to_string(path).expect("read back");
            assert!(body.starts_with("Atherosclerosis Endotype Report"));
        }
    }

    #[test]
    fn test_existing_report_is_not_truncated() {
        let dir = tempdir().expect("tempdir");
        let taken = dir.path().join("endotype-report-20240301-093005.txt");
        std::fs::write(&taken, "keep me").expect("seed");

        let path = FileReportWriter::new(dir.path())
            .write_report(&sample_result(), ReportFormat::Text)
            .expect("write text");

        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("endotype-report-20240301-093005-1.txt")
        );
        assert_eq!(std::fs::read_to_string(&taken).expect("read"), "keep me");
    }
}
