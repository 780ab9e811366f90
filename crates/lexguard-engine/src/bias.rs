//! Protected-characteristic bias detection
//!
//! Flags protected-characteristic language that appears outside a
//! recognised non-discrimination context. Two suppressions keep ordinary
//! questions from being flagged: legal-context phrases anywhere in the
//! combined text, and queries that read as plain eligibility questions
//! (unless outcomes between groups are being compared).

use crate::config::BiasConfig;
use crate::text::contains_word;
use lexguard_domain::{BiasFlag, Citation};

/// The term that raised the bias flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiasFinding {
    /// Protected-characteristic term found
    pub term: String,

    /// Whether comparative-outcome phrasing was present
    pub comparative: bool,
}

/// Detects protected-characteristic bias exposure
#[derive(Debug, Clone)]
pub struct BiasDetector {
    config: BiasConfig,
}

impl BiasDetector {
    /// Create a detector with the given lexicons
    pub fn new(config: BiasConfig) -> Self {
        Self { config }
    }

    /// Bias flag for the query and citation texts
    pub fn assess(&self, citations: &[Citation], query: &str) -> BiasFlag {
        BiasFlag::from(self.detect(citations, query).is_some())
    }

    /// The first protected term that triggers the flag, if any
    pub fn detect(&self, citations: &[Citation], query: &str) -> Option<BiasFinding> {
        let mut combined = citations
            .iter()
            .map(|citation| citation.citation_text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        combined.push(' ');
        combined.push_str(query);
        let combined = combined.to_lowercase();
        let query = query.to_lowercase();

        let has_legal_context = self
            .config
            .legal_context_phrases
            .iter()
            .any(|phrase| contains_word(&combined, &phrase.to_lowercase()));
        if has_legal_context {
            return None;
        }

        let legitimate = self
            .config
            .legitimate_question_patterns
            .iter()
            .any(|pattern| !pattern.is_empty() && query.contains(&pattern.to_lowercase()));
        let comparative = self
            .config
            .comparative_phrases
            .iter()
            .any(|phrase| contains_word(&combined, &phrase.to_lowercase()));

        if legitimate && !comparative {
            return None;
        }

        self.config
            .protected_terms
            .iter()
            .find(|term| contains_word(&combined, &term.to_lowercase()))
            .map(|term| BiasFinding {
                term: term.clone(),
                comparative,
            })
    }
}
