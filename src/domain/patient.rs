//! Patient input types for endotype classification.
//!
//! Six scoring inputs (age, IL6R, HSPB1, CRP, TNFR1, LDL) plus descriptive
//! fields that are collected and carried for audit but never scored.

use serde::{Deserialize, Serialize};

use self::ranges::{AGE_RANGE, BMI_RANGE, CRP_RANGE, HDL_RANGE, LDL_RANGE, PG_ML_RANGE};

/// Biological sex as selected on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// All selectable values, in form order.
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Smoking history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmokingStatus {
    Never,
    Former,
    Current,
}

impl SmokingStatus {
    /// All selectable values, in form order.
    pub const ALL: [SmokingStatus; 3] = [
        SmokingStatus::Never,
        SmokingStatus::Former,
        SmokingStatus::Current,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Never => "Never",
            Self::Former => "Former",
            Self::Current => "Current",
        }
    }
}

/// Demographic fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    /// Age in years
    pub age: f64,

    pub sex: Sex,

    /// Body mass index in kg/m² (not scored)
    pub bmi: Option<f64>,

    /// Smoking history (not scored)
    pub smoking: Option<SmokingStatus>,
}

/// Circulating biomarker measurements.
///
/// `il6r` and `hspb1` are mandatory. Every optional value left out of the
/// form is `None`, which is distinct from a measured zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biomarkers {
    /// Soluble IL-6 receptor, pg/mL
    pub il6r: f64,

    /// Heat shock protein beta-1, pg/mL
    pub hspb1: f64,

    /// TNF receptor 1, pg/mL
    pub tnfr1: Option<f64>,

    /// High-sensitivity C-reactive protein, mg/L
    pub crp: Option<f64>,

    /// LDL cholesterol, mg/dL
    pub ldl: Option<f64>,

    /// HDL cholesterol, mg/dL (not scored)
    pub hdl: Option<f64>,
}

/// A complete, already-parsed form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    pub demographics: Demographics,
    pub biomarkers: Biomarkers,
}

impl PatientInput {
    /// Build an input from the mandatory fields only.
    #[must_use]
    pub fn new(age: f64, sex: Sex, il6r: f64, hspb1: f64) -> Self {
        Self {
            demographics: Demographics {
                age,
                sex,
                bmi: None,
                smoking: None,
            },
            biomarkers: Biomarkers {
                il6r,
                hspb1,
                tnfr1: None,
                crp: None,
                ldl: None,
                hdl: None,
            },
        }
    }

    #[must_use]
    pub fn with_bmi(mut self, bmi: f64) -> Self {
        self.demographics.bmi = Some(bmi);
        self
    }

    #[must_use]
    pub fn with_smoking(mut self, smoking: SmokingStatus) -> Self {
        self.demographics.smoking = Some(smoking);
        self
    }

    #[must_use]
    pub fn with_tnfr1(mut self, tnfr1: f64) -> Self {
        self.biomarkers.tnfr1 = Some(tnfr1);
        self
    }

    #[must_use]
    pub fn with_crp(mut self, crp: f64) -> Self {
        self.biomarkers.crp = Some(crp);
        self
    }

    #[must_use]
    pub fn with_ldl(mut self, ldl: f64) -> Self {
        self.biomarkers.ldl = Some(ldl);
        self
    }

    #[must_use]
    pub fn with_hdl(mut self, hdl: f64) -> Self {
        self.biomarkers.hdl = Some(hdl);
        self
    }

    /// Validate that all values are finite and within plausible ranges.
    ///
    /// The classifier accepts any input; this is the gate the form applies
    /// before a submission reaches it.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let d = &self.demographics;
        let b = &self.biomarkers;

        check_range(&mut errors, "Age", Some(d.age), AGE_RANGE);
        check_range(&mut errors, "BMI", d.bmi, BMI_RANGE);
        check_range(&mut errors, "IL6R", Some(b.il6r), PG_ML_RANGE);
        check_range(&mut errors, "HSPB1", Some(b.hspb1), PG_ML_RANGE);
        check_range(&mut errors, "TNFR1", b.tnfr1, PG_ML_RANGE);
        check_range(&mut errors, "hs-CRP", b.crp, CRP_RANGE);
        check_range(&mut errors, "LDL", b.ldl, LDL_RANGE);
        check_range(&mut errors, "HDL", b.hdl, HDL_RANGE);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Accepted `[min, max]` ranges, shared with the input form.
pub mod ranges {
    pub const AGE_RANGE: (f64, f64) = (18.0, 120.0);
    pub const BMI_RANGE: (f64, f64) = (10.0, 80.0);
    pub const PG_ML_RANGE: (f64, f64) = (0.0, 100_000.0);
    pub const CRP_RANGE: (f64, f64) = (0.0, 500.0);
    pub const LDL_RANGE: (f64, f64) = (0.0, 1000.0);
    pub const HDL_RANGE: (f64, f64) = (0.0, 300.0);
}

fn check_range(errors: &mut Vec<String>, label: &str, value: Option<f64>, (min, max): (f64, f64)) {
    let Some(value) = value else {
        return;
    };
    if !value.is_finite() {
        errors.push(format!("{label} must be a finite number"));
    } else if !(min..=max).contains(&value) {
        errors.push(format!("{label} {value} out of range [{min}, {max}]"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PatientInput {
        PatientInput::new(58.0, Sex::Female, 1800.0, 2400.0)
            .with_bmi(27.4)
            .with_smoking(SmokingStatus::Former)
            .with_tnfr1(900.0)
            .with_crp(2.1)
            .with_ldl(128.0)
            .with_hdl(52.0)
    }

    #[test]
    fn test_new_leaves_optionals_absent() {
        let input = PatientInput::new(40.0, Sex::Male, 1000.0, 1000.0);
        assert!(input.demographics.bmi.is_none());
        assert!(input.demographics.smoking.is_none());
        assert!(input.biomarkers.tnfr1.is_none());
        assert!(input.biomarkers.crp.is_none());
        assert!(input.biomarkers.ldl.is_none());
        assert!(input.biomarkers.hdl.is_none());
    }

    #[test]
    fn test_validation() {
        assert!(sample().validate().is_ok());

        let mut invalid = sample();
        invalid.demographics.age = 10.0;
        invalid.biomarkers.crp = Some(-1.0);
        let errors = invalid.validate().expect_err("Should fail");
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("Age"));
        assert!(errors[1].starts_with("hs-CRP"));
    }

    #[test]
    fn test_validation_rejects_non_finite() {
        let mut invalid = sample();
        invalid.biomarkers.il6r = f64::NAN;
        let errors = invalid.validate().expect_err("Should fail");
        assert_eq!(errors, vec!["IL6R must be a finite number".to_string()]);
    }

    #[test]
    fn test_absent_optionals_are_not_validated() {
        let input = PatientInput::new(70.0, Sex::Male, 0.0, 0.0);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(json["demographics"]["sex"], "female");
        assert_eq!(json["demographics"]["smoking"], "former");
        assert_eq!(json["biomarkers"]["il6r"], 1800.0);

        let absent = serde_json::to_value(PatientInput::new(40.0, Sex::Male, 1.0, 1.0))
            .expect("serialize");
        assert!(absent["biomarkers"]["crp"].is_null());
    }
}
