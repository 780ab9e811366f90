//! Traceability checks and display rendering

use crate::config::FormatterConfig;
use lexguard_domain::{
    BiasFlag, Citation, FormattedOutput, InterpretationResult, Outcome, RetrievalResult,
};
use std::collections::BTreeSet;

/// Legal basis text when nothing was retrieved
pub const NO_CITATIONS_MESSAGE: &str = "No specific legal citations were found for this query.";

const ELLIPSIS: &str = "...";

/// Validates traceability and renders the final output
#[derive(Debug, Clone)]
pub struct TraceabilityFormatter {
    config: FormatterConfig,
}

impl TraceabilityFormatter {
    /// Create a formatter with the given prefix table and limits
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    /// Render the final output
    pub fn format(
        &self,
        retrieval: &RetrievalResult,
        interpretation: &InterpretationResult,
    ) -> FormattedOutput {
        let outcome = interpretation.final_outcome;
        let citations = &retrieval.top_citations;
        let traceability_compliant = is_traceable(outcome, citations);

        if !traceability_compliant {
            tracing::warn!(
                outcome = %outcome,
                citations = citations.len(),
                "Actionable outcome is not backed by complete citations"
            );
        }

        let mut sections = vec![
            conclusion_heading(outcome, !citations.is_empty()).to_string(),
            format!(
                "**INTERPRETATION**\n{}{}",
                empathy_preamble(outcome),
                interpretation.rationale_summary
            ),
            self.legal_basis(citations),
        ];

        let notes = self.compliance_notes(
            retrieval.conflict_score,
            interpretation.bias_flag,
            traceability_compliant,
        );
        if !notes.is_empty() {
            sections.push(format!("**COMPLIANCE NOTES**\n{}", notes.join("\n")));
        }

        FormattedOutput {
            display_text: sections.join("\n\n"),
            outcome,
            citations: citations.clone(),
            traceability_compliant,
            jurisdictions_referenced: self.jurisdictions(citations),
        }
    }

    /// Jurisdictions named by section id prefixes
    pub fn jurisdictions(&self, citations: &[Citation]) -> BTreeSet<String> {
        citations
            .iter()
            .filter_map(|citation| {
                let section = citation.section_id.trim().to_uppercase();
                self.config
                    .section_prefixes
                    .iter()
                    .find(|(prefix, _)| section.starts_with(&prefix.to_uppercase()))
                    .map(|(_, name)| name.clone())
            })
            .collect()
    }

    fn legal_basis(&self, citations: &[Citation]) -> String {
        if citations.is_empty() {
            return format!("**LEGAL BASIS**\n{}", NO_CITATIONS_MESSAGE);
        }

        let entries: Vec<String> = citations
            .iter()
            .enumerate()
            .map(|(i, citation)| {
                format!(
                    "{}. {} - {}\n   \"{}\"",
                    i + 1,
                    citation.section_id,
                    citation.title,
                    excerpt(&citation.citation_text, self.config.excerpt_chars)
                )
            })
            .collect();

        format!("**LEGAL BASIS**\n{}", entries.join("\n"))
    }

    fn compliance_notes(
        &self,
        conflict_score: u8,
        bias_flag: BiasFlag,
        traceability_compliant: bool,
    ) -> Vec<String> {
        let mut notes = Vec::new();

        if conflict_score >= self.config.high_conflict_threshold {
            notes.push(format!(
                "- High conflict between the cited provisions (score {}/10). Review each \
                 provision carefully or seek professional advice.",
                conflict_score
            ));
        }
        if bias_flag.is_raised() {
            notes.push(
                "- Potential bias: protected-characteristic language appears outside a \
                 non-discrimination context. This determination should receive human review."
                    .to_string(),
            );
        }
        if !traceability_compliant {
            notes.push(
                "- Traceability warning: one or more citations lack a section identifier or \
                 citation text."
                    .to_string(),
            );
        }

        notes
    }
}

/// Whether an outcome is adequately backed by citations
///
/// A non-definitive outcome is traceable by construction; definitive
/// outcomes need every citation to carry a section id and text.
pub fn is_traceable(outcome: Outcome, citations: &[Citation]) -> bool {
    !outcome.is_actionable() || citations.iter().all(Citation::is_complete)
}

fn conclusion_heading(outcome: Outcome, has_citations: bool) -> &'static str {
    match (outcome, has_citations) {
        (Outcome::Eligible, _) => "**DETERMINATION: ELIGIBLE**",
        (Outcome::NotEligible, _) => "**DETERMINATION: NOT ELIGIBLE**",
        (Outcome::RequiresMoreData, true) => "**DETERMINATION: ADDITIONAL INFORMATION REQUIRED**",
        (Outcome::RequiresMoreData, false) => "**DETERMINATION: UNABLE TO DETERMINE**",
    }
}

fn empathy_preamble(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Eligible => "Good news: ",
        Outcome::NotEligible => {
            "We understand this may not be the answer you were hoping for. "
        }
        Outcome::RequiresMoreData => "We want to make sure you receive an accurate answer. ",
    }
}

/// First `max_chars` characters of `text`, with an ellipsis if cut
fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citation(section: &str, text: &str) -> Citation {
        Citation {
            id: section.to_lowercase(),
            section_id: section.to_string(),
            title: "Provision".to_string(),
            citation_text: text.to_string(),
            jurisdiction: None,
            category: None,
        }
    }

    fn formatter() -> TraceabilityFormatter {
        TraceabilityFormatter::new(FormatterConfig::default())
    }

    fn interpretation(outcome: Outcome, bias_flag: BiasFlag) -> InterpretationResult {
        InterpretationResult {
            final_outcome: outcome,
            rationale_summary: "Because of the cited rules.".to_string(),
            bias_flag,
        }
    }

    #[test]
    fn test_empty_retrieval() {
        let output = formatter().format(
            &RetrievalResult::empty(),
            &InterpretationResult::requires_more_data("Nothing found."),
        );

        assert!(output.display_text.contains("No specific legal citations"));
        assert!(output.display_text.starts_with("**DETERMINATION: UNABLE TO DETERMINE**"));
        assert!(output.traceability_compliant);
        assert!(output.jurisdictions_referenced.is_empty());
        assert!(!output.display_text.contains("COMPLIANCE NOTES"));
    }

    #[test]
    fn test_truncation() {
        let text = "a".repeat(200) + &"b".repeat(50);
        let retrieval = RetrievalResult {
            top_citations: vec![citation("DE-1", &text)],
            conflict_score: 1,
        };
        let output = formatter().format(&retrieval, &interpretation(Outcome::Eligible, BiasFlag::No));

        let expected = format!("\"{}...\"", "a".repeat(200));
        assert!(output.display_text.contains(&expected));
        assert!(!output.display_text.contains("ab"));
        assert_eq!(output.citations[0].citation_text.chars().count(), 250);
    }

    #[test]
    fn test_short_text_not_truncated() {
        assert_eq!(excerpt("short", 200), "short");
        assert_eq!(excerpt("ééé", 2), "éé...");
    }

    #[test]
    fn test_traceability_rules() {
        let incomplete = vec![citation("DE-1", ""), citation("DE-2", "Text")];
        assert!(!is_traceable(Outcome::Eligible, &incomplete));
        assert!(!is_traceable(Outcome::NotEligible, &incomplete));
        assert!(is_traceable(Outcome::RequiresMoreData, &incomplete));
        assert!(is_traceable(Outcome::Eligible, &[citation("DE-1", "Text")]));
    }

    #[test]
    fn test_compliance_notes_order() {
        let retrieval = RetrievalResult {
            top_citations: vec![citation("", "Text"), citation("EU-2", "Text")],
            conflict_score: 7,
        };
        let output =
            formatter().format(&retrieval, &interpretation(Outcome::NotEligible, BiasFlag::Yes));

        assert!(!output.traceability_compliant);
        let text = &output.display_text;
        let conflict = text.find("High conflict").unwrap();
        let bias = text.find("Potential bias").unwrap();
        let trace = text.find("Traceability warning").unwrap();
        assert!(conflict < bias && bias < trace);
    }

    #[test]
    fn test_section_order() {
        let retrieval = RetrievalResult {
            top_citations: vec![citation("FR-1", "Text")],
            conflict_score: 1,
        };
        let output = formatter().format(&retrieval, &interpretation(Outcome::Eligible, BiasFlag::No));
        let text = &output.display_text;

        assert!(text.starts_with("**DETERMINATION: ELIGIBLE**\n\n**INTERPRETATION**\nGood news: "));
        assert!(text.contains("**LEGAL BASIS**\n1. FR-1 - Provision\n   \"Text\""));
        assert!(!text.contains("COMPLIANCE NOTES"));
    }

    #[test]
    fn test_jurisdictions_from_prefixes() {
        let citations = vec![
            citation("CA-EI-12", "t"),
            citation("de-sgb-7", "t"),
            citation("EU-GDPR-6", "t"),
            citation("CA-OAS-3", "t"),
            citation("ZZ-1", "t"),
        ];
        let names: Vec<String> = formatter().jurisdictions(&citations).into_iter().collect();
        assert_eq!(names, vec!["Canada", "European Union", "Germany"]);
    }
}
