//! Interpretation stage outcome types

use std::fmt;

/// Terminal eligibility outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The provisions indicate eligibility
    Eligible,

    /// The provisions indicate ineligibility
    NotEligible,

    /// No definitive answer can be given
    RequiresMoreData,
}

impl Outcome {
    /// Get the outcome name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Eligible => "Eligible",
            Outcome::NotEligible => "NotEligible",
            Outcome::RequiresMoreData => "RequiresMoreData",
        }
    }

    /// Parse an outcome name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "eligible" => Some(Outcome::Eligible),
            "noteligible" | "not_eligible" => Some(Outcome::NotEligible),
            "requiresmoredata" | "requires_more_data" => Some(Outcome::RequiresMoreData),
            _ => None,
        }
    }

    /// Whether the outcome is a definitive, actionable answer
    pub fn is_actionable(&self) -> bool {
        matches!(self, Outcome::Eligible | Outcome::NotEligible)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether protected-characteristic language appeared outside a
/// non-discrimination context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BiasFlag {
    /// Bias exposure detected
    Yes,

    /// No bias exposure detected
    #[default]
    No,
}

impl BiasFlag {
    /// Get the flag as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            BiasFlag::Yes => "Yes",
            BiasFlag::No => "No",
        }
    }

    /// Whether the flag is raised
    pub fn is_raised(&self) -> bool {
        *self == BiasFlag::Yes
    }
}

impl From<bool> for BiasFlag {
    fn from(raised: bool) -> Self {
        if raised {
            BiasFlag::Yes
        } else {
            BiasFlag::No
        }
    }
}

impl fmt::Display for BiasFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the interpretation stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpretationResult {
    /// Terminal outcome
    pub final_outcome: Outcome,

    /// Non-empty explanation of the outcome
    pub rationale_summary: String,

    /// Bias exposure flag
    pub bias_flag: BiasFlag,
}

impl InterpretationResult {
    /// Create a result that needs more data and carries no bias flag
    pub fn requires_more_data(rationale: impl Into<String>) -> Self {
        Self {
            final_outcome: Outcome::RequiresMoreData,
            rationale_summary: rationale.into(),
            bias_flag: BiasFlag::No,
        }
    }
}
