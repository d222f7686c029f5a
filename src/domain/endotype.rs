//! Endotype identifiers and the static reference table.
//!
//! The table mirrors the four subclinical atherosclerosis endotypes and their
//! descriptive content. It is a process-wide `static`: initialised at compile
//! time, never mutated, shared freely between threads.

use serde::{Deserialize, Serialize};

/// Endotype bucket, ordered from lowest (`One`) to highest (`Four`) risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum EndotypeId {
    One,
    Two,
    Three,
    Four,
}

/// A numeric endotype outside 1..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unknown endotype {0}: expected 1-4")]
pub struct InvalidEndotype(pub u8);

impl EndotypeId {
    /// All endotypes in ascending risk order.
    pub const ALL: [EndotypeId; 4] = [Self::One, Self::Two, Self::Three, Self::Four];

    /// Map a rubric score onto its ordinal bucket.
    ///
    /// Inclusive upper bounds: `<=1`, `<=3`, `<=5`, everything above.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        if score <= 1 {
            Self::One
        } else if score <= 3 {
            Self::Two
        } else if score <= 5 {
            Self::Three
        } else {
            Self::Four
        }
    }

    /// Numeric value, 1-4.
    #[must_use]
    pub fn get(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    /// Descriptive record for this endotype.
    #[must_use]
    pub fn record(&self) -> &'static EndotypeRecord {
        lookup(*self)
    }
}

impl From<EndotypeId> for u8 {
    fn from(id: EndotypeId) -> Self {
        id.get()
    }
}

impl TryFrom<u8> for EndotypeId {
    type Error = InvalidEndotype;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            other => Err(InvalidEndotype(other)),
        }
    }
}

impl std::fmt::Display for EndotypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Descriptive content attached to an endotype.
///
/// `risk_style_tag` is an opaque presentation token. The core never reads it;
/// renderers map it onto their own styling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndotypeRecord {
    pub name: &'static str,
    pub description: &'static str,
    pub hazard_ratio: f64,
    pub confidence_interval: &'static str,
    pub risk_category: &'static str,
    pub risk_style_tag: &'static str,
    /// Ordered; the most severe mechanisms come last.
    pub pathways: &'static [&'static str],
    /// Ordered by increasing clinical intensity.
    pub recommendations: &'static [&'static str],
}

static ENDOTYPE_1: EndotypeRecord = EndotypeRecord {
    name: "Endotype 1",
    description: "Lowest risk profile with minimal inflammatory markers and optimal biomarker levels.",
    hazard_ratio: 1.0,
    confidence_interval: "Reference",
    risk_category: "Low",
    risk_style_tag: "bg-success",
    pathways: &[
        "Baseline inflammatory state",
        "Normal vascular function",
        "Minimal oxidative stress",
    ],
    recommendations: &[
        "Continue standard cardiovascular risk factor management",
        "Regular monitoring of lipid profile and blood pressure",
        "Maintain healthy lifestyle modifications",
    ],
};

static ENDOTYPE_2: EndotypeRecord = EndotypeRecord {
    name: "Endotype 2",
    description: "Low-moderate risk with elevated IL6R signaling and mild inflammatory response.",
    hazard_ratio: 2.1,
    confidence_interval: "1.5-2.9",
    risk_category: "Low-Moderate",
    risk_style_tag: "bg-info",
    pathways: &[
        "↑ IL6R-mediated inflammation",
        "Activated acute phase response",
        "Endothelial activation",
        "JAK-STAT signaling pathway",
    ],
    recommendations: &[
        "Consider intensified statin therapy",
        "Monitor inflammatory markers (hs-CRP, IL6R)",
        "Evaluate for anti-inflammatory interventions",
        "Optimize management of diabetes and hypertension",
    ],
};

static ENDOTYPE_3: EndotypeRecord = EndotypeRecord {
    name: "Endotype 3",
    description: "Moderate-high risk characterized by significant HSPB1 elevation and cellular stress response activation.",
    hazard_ratio: 3.5,
    confidence_interval: "2.7-4.5",
    risk_category: "Moderate-High",
    risk_style_tag: "bg-warning text-dark",
    pathways: &[
        "↑↑ Heat shock protein response",
        "↑ Cellular stress pathways",
        "TNF-α signaling activation",
        "Oxidative stress response",
        "Protein folding stress",
    ],
    recommendations: &[
        "Aggressive cardiovascular risk modification",
        "Consider advanced lipid-lowering therapy (PCSK9 inhibitors)",
        "Evaluate for secondary prevention strategies",
        "Close monitoring of cardiovascular events",
        "Consider specialized cardiology referral",
    ],
};

static ENDOTYPE_4: EndotypeRecord = EndotypeRecord {
    name: "Endotype 4",
    description: "Highest risk with multi-pathway activation including IL6R, HSPB1, and systemic inflammatory dysregulation.",
    hazard_ratio: 5.2,
    confidence_interval: "4.1-6.8",
    risk_category: "Very High",
    risk_style_tag: "bg-danger",
    pathways: &[
        "↑↑↑ Multi-pathway inflammatory activation",
        "↑↑ IL6R/JAK-STAT signaling",
        "↑↑ HSPB1-mediated stress response",
        "↑↑ TNFR1 activation",
        "Systemic endothelial dysfunction",
        "Advanced plaque instability markers",
    ],
    recommendations: &[
        "Urgent cardiovascular risk assessment",
        "Maximal medical therapy for atherosclerosis",
        "Consider clinical trial enrollment for novel therapies",
        "Evaluate for coronary imaging (CT angiography or invasive angiography)",
        "Frequent follow-up with cardiology",
        "Consider anti-inflammatory therapy (e.g., colchicine, IL-6 inhibitors)",
        "Aggressive management of all modifiable risk factors",
    ],
};

/// Resolve an endotype to its reference record.
#[must_use]
pub fn lookup(id: EndotypeId) -> &'static EndotypeRecord {
    match id {
        EndotypeId::One => &ENDOTYPE_1,
        EndotypeId::Two => &ENDOTYPE_2,
        EndotypeId::Three => &ENDOTYPE_3,
        EndotypeId::Four => &ENDOTYPE_4,
    }
}

/// The full reference table in ascending risk order.
pub fn reference_table() -> impl Iterator<Item = (EndotypeId, &'static EndotypeRecord)> {
    EndotypeId::ALL.into_iter().map(|id| (id, lookup(id)))
}
