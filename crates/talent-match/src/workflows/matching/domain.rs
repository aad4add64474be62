use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for employees across every source table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl EmployeeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Yearly performance roster row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub employee_id: EmployeeId,
    pub year: i32,
    pub rating: u8,
}

/// Score for a single competency pillar in a given year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyRecord {
    pub employee_id: EmployeeId,
    pub pillar_code: String,
    pub score: f64,
    pub year: i32,
}

/// Psychometric profile. Each measurement may be absent independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsychometricRecord {
    pub employee_id: EmployeeId,
    pub pauli: Option<f64>,
    pub gtq: Option<f64>,
    pub iq: Option<f64>,
}

impl PsychometricRecord {
    /// The measurement for `dimension`; NaN counts as missing.
    pub fn value(&self, dimension: PsychometricDimension) -> Option<f64> {
        let value = match dimension {
            PsychometricDimension::Pauli => self.pauli,
            PsychometricDimension::Gtq => self.gtq,
            PsychometricDimension::Iq => self.iq,
        };
        value.filter(|value| !value.is_nan())
    }
}

/// Display record joined onto rankings and the benchmark picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    pub employee_id: EmployeeId,
    pub fullname: String,
}

/// The three psychometric measurements and their fixed sub-score weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PsychometricDimension {
    Pauli,
    Gtq,
    Iq,
}

impl PsychometricDimension {
    pub const ALL: [PsychometricDimension; 3] = [
        PsychometricDimension::Pauli,
        PsychometricDimension::Gtq,
        PsychometricDimension::Iq,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PsychometricDimension::Pauli => "PAULI",
            PsychometricDimension::Gtq => "GTQ",
            PsychometricDimension::Iq => "IQ",
        }
    }

    pub const fn weight(self) -> f64 {
        match self {
            PsychometricDimension::Pauli => 0.60,
            PsychometricDimension::Gtq => 0.28,
            PsychometricDimension::Iq => 0.12,
        }
    }
}

/// Non-fatal data gap absorbed while building a baseline or scoring an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "dimension", rename_all = "snake_case")]
pub enum SignalGap {
    /// No benchmark employee had psychometric data; the neutral baseline was used.
    NoPsychometricBaseline,
    /// The employee has no psychometric record at all.
    NoPsychometricRecord,
    MissingPsychometricValue(PsychometricDimension),
    MissingPillar(String),
    /// The baseline for this dimension has no usable mean or deviation.
    UndefinedBaseline(String),
}

impl SignalGap {
    pub fn describe(&self) -> String {
        match self {
            SignalGap::NoPsychometricBaseline => {
                "benchmarks have no psychometric data; neutral baseline applied".to_string()
            }
            SignalGap::NoPsychometricRecord => "no psychometric record".to_string(),
            SignalGap::MissingPsychometricValue(dimension) => {
                format!("missing {} value", dimension.label())
            }
            SignalGap::MissingPillar(code) => format!("no score for pillar {code}"),
            SignalGap::UndefinedBaseline(name) => {
                format!("baseline for {name} is undefined or has no spread; scored as 0")
            }
        }
    }
}

/// Composite match for one employee against the current baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub employee_id: EmployeeId,
    pub competency_score: f64,
    pub psychometric_score: f64,
    pub behavioral_score: f64,
    pub contextual_score: f64,
    pub final_match_score: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signal_gaps: Vec<SignalGap>,
}

impl MatchResult {
    pub fn category(&self) -> MatchCategory {
        MatchCategory::from_score(self.final_match_score)
    }
}

/// Banding of the final match score used by the ranked table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    Excellent,
    Good,
    Moderate,
    Low,
}

impl MatchCategory {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            MatchCategory::Excellent
        } else if score >= 60.0 {
            MatchCategory::Good
        } else if score >= 40.0 {
            MatchCategory::Moderate
        } else {
            MatchCategory::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            MatchCategory::Excellent => "Excellent",
            MatchCategory::Good => "Good",
            MatchCategory::Moderate => "Moderate",
            MatchCategory::Low => "Low",
        }
    }
}
