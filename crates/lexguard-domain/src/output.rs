//! Final formatted output of the pipeline

use crate::citation::{Citation, RetrievalResult};
use crate::outcome::{InterpretationResult, Outcome};
use crate::query::QueryId;
use std::collections::BTreeSet;

/// Display text plus the structured, authoritative fields
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedOutput {
    /// Conclusion, interpretation, legal basis and compliance notes sections
    pub display_text: String,

    /// Mirrors the interpretation outcome
    pub outcome: Outcome,

    /// Mirrors the retrieval top citations
    pub citations: Vec<Citation>,

    /// Whether the outcome is backed by complete citations
    pub traceability_compliant: bool,

    /// Jurisdictions derived from section id prefixes
    pub jurisdictions_referenced: BTreeSet<String>,
}

/// Everything one `analyze` invocation produced
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Correlation id for audit records
    pub query_id: QueryId,

    /// Retrieval stage result
    pub retrieval: RetrievalResult,

    /// Interpretation stage result
    pub interpretation: InterpretationResult,

    /// Formatting stage result
    pub output: FormattedOutput,
}
