//! Outcome classification from citation text signals

use crate::bias::BiasDetector;
use crate::config::{BiasConfig, OutcomeConfig};
use crate::text::{contains_affirmed, contains_word, contains_word_start};
use lexguard_domain::{BiasFlag, Citation, InterpretationResult, Outcome};

/// Rationale when no citations were retrieved
pub const NO_CITATIONS_RATIONALE: &str = "No relevant legal citations were found for this \
     query. Please provide more details about your situation or consult the responsible \
     authority directly.";

/// Indicator tallies over the citation texts
///
/// Each term counts at most once per citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutcomeIndicators {
    /// Affirmed eligibility terms
    pub eligibility: u32,

    /// Ineligibility terms
    pub ineligibility: u32,

    /// Uncertainty terms plus exception and conflict adjustments
    pub uncertainty: u32,
}

/// Classifies citations into a terminal outcome with a rationale
#[derive(Debug, Clone)]
pub struct OutcomeClassifier {
    config: OutcomeConfig,
    bias: BiasDetector,
}

impl OutcomeClassifier {
    /// Create a classifier with the given lexicons
    pub fn new(config: OutcomeConfig, bias: BiasConfig) -> Self {
        Self {
            config,
            bias: BiasDetector::new(bias),
        }
    }

    /// Classify the retrieved citations
    pub fn classify(
        &self,
        citations: &[Citation],
        conflict_score: u8,
        query: &str,
    ) -> InterpretationResult {
        if citations.is_empty() {
            return InterpretationResult::requires_more_data(NO_CITATIONS_RATIONALE);
        }

        let bias_flag: BiasFlag = match self.bias.detect(citations, query) {
            Some(finding) => {
                tracing::warn!(
                    term = %finding.term,
                    comparative = finding.comparative,
                    "Protected-characteristic language outside a non-discrimination context"
                );
                BiasFlag::Yes
            }
            None => BiasFlag::No,
        };

        let indicators = self.tally(citations, conflict_score);
        tracing::debug!(
            eligibility = indicators.eligibility,
            ineligibility = indicators.ineligibility,
            uncertainty = indicators.uncertainty,
            conflict_score,
            "Tallied outcome indicators"
        );

        let count = citations.len();
        let sections = leading_sections(citations);

        let (final_outcome, rationale_summary) = if indicators.uncertainty
            > self.config.uncertainty_limit
            || conflict_score >= self.config.conflict_limit
        {
            (
                Outcome::RequiresMoreData,
                format!(
                    "The {} cited provisions contain significant uncertainty or competing \
                     requirements (conflict score {}/10). Additional information about your \
                     specific circumstances is needed for a definitive determination.",
                    count, conflict_score
                ),
            )
        } else if indicators.ineligibility > indicators.eligibility {
            (
                Outcome::NotEligible,
                format!(
                    "Based on {} cited provisions, particularly {}, the requirements indicate \
                     that the eligibility criteria are not met (conflict score {}/10).",
                    count, sections, conflict_score
                ),
            )
        } else if indicators.eligibility > 0 {
            (
                Outcome::Eligible,
                format!(
                    "Based on {} cited provisions, particularly {}, the eligibility criteria \
                     appear to be met (conflict score {}/10).",
                    count, sections, conflict_score
                ),
            )
        } else {
            (
                Outcome::RequiresMoreData,
                format!(
                    "The {} cited provisions do not clearly establish eligibility or \
                     ineligibility (conflict score {}/10). More specific details are needed.",
                    count, conflict_score
                ),
            )
        };

        InterpretationResult {
            final_outcome,
            rationale_summary,
            bias_flag,
        }
    }

    /// Tally indicator terms across the citation texts
    pub fn tally(&self, citations: &[Citation], conflict_score: u8) -> OutcomeIndicators {
        let texts: Vec<String> = citations
            .iter()
            .map(|citation| citation.citation_text.to_lowercase())
            .collect();

        let count = |terms: &[String], matches: fn(&str, &str) -> bool| -> u32 {
            texts
                .iter()
                .map(|text| {
                    terms
                        .iter()
                        .filter(|term| matches(text, &term.to_lowercase()))
                        .count() as u32
                })
                .sum()
        };

        let mut indicators = OutcomeIndicators {
            eligibility: count(&self.config.eligibility_terms, contains_affirmed),
            ineligibility: count(&self.config.ineligibility_terms, contains_word),
            uncertainty: count(&self.config.uncertainty_terms, contains_word),
        };

        let has_exception = texts.iter().any(|text| {
            self.config
                .exception_markers
                .iter()
                .any(|marker| contains_word_start(text, &marker.to_lowercase()))
        });
        if has_exception {
            indicators.uncertainty += self.config.exception_uncertainty;
        }
        if conflict_score >= self.config.conflict_uncertainty_threshold {
            indicators.uncertainty += self.config.conflict_uncertainty;
        }

        indicators
    }
}

/// The first two section ids, joined for a rationale
fn leading_sections(citations: &[Citation]) -> String {
    let sections: Vec<&str> = citations
        .iter()
        .map(|citation| citation.section_id.trim())
        .filter(|section| !section.is_empty())
        .take(2)
        .collect();

    if sections.is_empty() {
        "the retrieved provisions".to_string()
    } else {
        sections.join(" and ")
    }
}
