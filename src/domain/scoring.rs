//! Rule-based endotype rubric.
//!
//! NOT a validated model: fixed placeholder thresholds accumulated into an
//! integer score, then bucketed. Thresholds are kept exactly as published in
//! the demonstration tool.

use serde::{Deserialize, Serialize};

use super::endotype::EndotypeId;
use super::patient::PatientInput;

pub const IL6R_HIGH: f64 = 2000.0;
pub const IL6R_MODERATE: f64 = 1500.0;
pub const HSPB1_HIGH: f64 = 3000.0;
pub const HSPB1_MODERATE: f64 = 2000.0;
pub const CRP_ELEVATED: f64 = 3.0;
pub const TNFR1_ELEVATED: f64 = 1000.0;
pub const AGE_ELEVATED: f64 = 65.0;
pub const LDL_ELEVATED: f64 = 130.0;

/// Highest attainable score.
pub const MAX_SCORE: u8 = 9;

/// A single rubric rule that can award points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    Il6rHigh,
    Il6rModerate,
    Hspb1High,
    Hspb1Moderate,
    CrpElevated,
    Tnfr1Elevated,
    AgeOver65,
    LdlElevated,
}

impl ScoringRule {
    #[must_use]
    pub fn points(&self) -> u8 {
        match self {
            Self::Il6rHigh | Self::Hspb1High => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Il6rHigh => "IL6R > 2000 pg/mL",
            Self::Il6rModerate => "IL6R 1500-2000 pg/mL",
            Self::Hspb1High => "HSPB1 > 3000 pg/mL",
            Self::Hspb1Moderate => "HSPB1 2000-3000 pg/mL",
            Self::CrpElevated => "hs-CRP > 3 mg/L",
            Self::Tnfr1Elevated => "TNFR1 > 1000 pg/mL",
            Self::AgeOver65 => "Age > 65 years",
            Self::LdlElevated => "LDL > 130 mg/dL",
        }
    }
}

/// The rules that fired for one input, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub rules: Vec<ScoringRule>,
}

impl ScoreBreakdown {
    #[must_use]
    pub fn total(&self) -> u8 {
        self.rules.iter().map(ScoringRule::points).sum()
    }

    #[must_use]
    pub fn endotype(&self) -> EndotypeId {
        EndotypeId::from_score(self.total())
    }

    fn award(&mut self, rule: ScoringRule) {
        self.rules.push(rule);
    }
}

fn exceeds(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}

/// Evaluate every rubric rule against the input.
#[must_use]
pub fn score(input: &PatientInput) -> ScoreBreakdown {
    let b = &input.biomarkers;
    let d = &input.demographics;
    let mut breakdown = ScoreBreakdown::default();

    if b.il6r > IL6R_HIGH {
        breakdown.award(ScoringRule::Il6rHigh);
    } else if b.il6r > IL6R_MODERATE {
        breakdown.award(ScoringRule::Il6rModerate);
    }

    if b.hspb1 > HSPB1_HIGH {
        breakdown.award(ScoringRule::Hspb1High);
    } else if b.hspb1 > HSPB1_MODERATE {
        breakdown.award(ScoringRule::Hspb1Moderate);
    }

    if exceeds(b.crp, CRP_ELEVATED) {
        breakdown.award(ScoringRule::CrpElevated);
    }
    if exceeds(b.tnfr1, TNFR1_ELEVATED) {
        breakdown.award(ScoringRule::Tnfr1Elevated);
    }
    if d.age > AGE_ELEVATED {
        breakdown.award(ScoringRule::AgeOver65);
    }
    if exceeds(b.ldl, LDL_ELEVATED) {
        breakdown.award(ScoringRule::LdlElevated);
    }

    breakdown
}

/// Classify an input into its endotype.
#[must_use]
pub fn classify(input: &PatientInput) -> EndotypeId {
    score(input).endotype()
}
