//! Conflict scoring across retrieved citations
//!
//! Baseline signals (categories and qualifying terms) always run. When the
//! citations carry jurisdiction metadata, cross-jurisdiction signals are
//! layered on top of the baseline.

use crate::config::ConflictConfig;
use crate::text::{contains_name, contains_word_start};
use lexguard_domain::{Category, Citation, LegalProvision};
use std::collections::{BTreeMap, BTreeSet};

const ELIGIBILITY_EXCEPTION_WEIGHT: u32 = 3;
const DEFINITIONAL_DIVERGENCE_WEIGHT: u32 = 2;
const SHARED_CATEGORY_WEIGHT: u32 = 5;
const MULTI_JURISDICTION_WEIGHT: u32 = 2;
const MULTI_G7_WEIGHT: u32 = 2;
const STRINGENCY_SPREAD_WEIGHT: u32 = 2;
const EU_BOUNDARY_WEIGHT: u32 = 1;

/// Lower bound of the conflict score when citations exist
pub const MIN_CONFLICT_SCORE: u8 = 1;
/// Upper bound of the conflict score
pub const MAX_CONFLICT_SCORE: u8 = 10;

/// Breakdown of the conflict indicator sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConflictIndicators {
    /// Eligibility and Exceptions documents side by side
    pub eligibility_exception: u32,

    /// Two or more Definitions documents
    pub definitional_divergence: u32,

    /// Qualifying terms, one per citation/term pair
    pub qualifier_terms: u32,

    /// Cross-jurisdiction signals (zero without jurisdiction metadata)
    pub jurisdictional: u32,
}

impl ConflictIndicators {
    /// Sum of all indicators
    pub fn total(&self) -> u32 {
        self.eligibility_exception
            + self.definitional_divergence
            + self.qualifier_terms
            + self.jurisdictional
    }

    /// Normalised score: half the indicator sum plus one, clamped to 1-10
    pub fn score(&self) -> u8 {
        let raw = self.total() / 2 + 1;
        raw.clamp(MIN_CONFLICT_SCORE as u32, MAX_CONFLICT_SCORE as u32) as u8
    }
}

/// Computes a bounded conflict score for a set of citations
#[derive(Debug, Clone)]
pub struct ConflictAnalyzer {
    config: ConflictConfig,
}

impl ConflictAnalyzer {
    /// Create an analyzer with the given lexicons and tables
    pub fn new(config: ConflictConfig) -> Self {
        Self { config }
    }

    /// Conflict score in [1, 10]
    ///
    /// Fewer than two citations cannot conflict and score 1.
    pub fn score(&self, citations: &[Citation], candidates: &[LegalProvision]) -> u8 {
        if citations.len() < 2 {
            return MIN_CONFLICT_SCORE;
        }
        let indicators = self.indicators(citations, candidates);
        let score = indicators.score();

        tracing::debug!(
            citations = citations.len(),
            indicator_sum = indicators.total(),
            jurisdictional = indicators.jurisdictional,
            score,
            "Computed conflict score"
        );

        score
    }

    /// Raw indicator breakdown
    ///
    /// A citation without a category takes the category of the candidate it
    /// was projected from.
    pub fn indicators(
        &self,
        citations: &[Citation],
        candidates: &[LegalProvision],
    ) -> ConflictIndicators {
        let categories: Vec<Option<Category>> = citations
            .iter()
            .map(|citation| resolve_category(citation, candidates))
            .collect();

        let has = |wanted: &Category| categories.iter().flatten().any(|c| c == wanted);

        let mut indicators = ConflictIndicators::default();

        if has(&Category::Eligibility) && has(&Category::Exceptions) {
            indicators.eligibility_exception = ELIGIBILITY_EXCEPTION_WEIGHT;
        }

        let definitions = categories
            .iter()
            .flatten()
            .filter(|c| **c == Category::Definitions)
            .count();
        if definitions >= 2 {
            indicators.definitional_divergence = DEFINITIONAL_DIVERGENCE_WEIGHT;
        }

        indicators.qualifier_terms = citations
            .iter()
            .map(|citation| {
                let text = citation.citation_text.to_lowercase();
                self.config
                    .qualifier_terms
                    .iter()
                    .filter(|term| contains_word_start(&text, &term.to_lowercase()))
                    .count() as u32
            })
            .sum();

        indicators.jurisdictional = self.jurisdictional_indicators(citations, &categories);
        indicators
    }

    fn jurisdictional_indicators(
        &self,
        citations: &[Citation],
        categories: &[Option<Category>],
    ) -> u32 {
        // Keyed by lower-cased name so spelling variants count once
        let mut jurisdictions: BTreeMap<String, &str> = BTreeMap::new();
        let mut per_category: BTreeMap<&Category, BTreeSet<String>> = BTreeMap::new();

        for (citation, category) in citations.iter().zip(categories) {
            let Some(jurisdiction) = citation.jurisdiction.as_deref().map(str::trim) else {
                continue;
            };
            if jurisdiction.is_empty() {
                continue;
            }
            let key = jurisdiction.to_lowercase();
            jurisdictions.entry(key.clone()).or_insert(jurisdiction);
            if let Some(category) = category {
                per_category.entry(category).or_default().insert(key);
            }
        }

        if jurisdictions.is_empty() {
            return 0;
        }

        let mut sum = 0;

        let shared_categories = per_category.values().filter(|set| set.len() >= 2).count() as u32;
        sum += shared_categories * SHARED_CATEGORY_WEIGHT;

        if jurisdictions.len() > 1 {
            sum += MULTI_JURISDICTION_WEIGHT;
        }

        let g7: Vec<&str> = jurisdictions
            .values()
            .copied()
            .filter(|name| contains_name(&self.config.g7_jurisdictions, name))
            .collect();
        if g7.len() > 1 {
            sum += MULTI_G7_WEIGHT;
        }

        let ranks: Vec<u8> = g7.iter().filter_map(|name| self.stringency(name)).collect();
        if let (Some(high), Some(low)) = (ranks.iter().max(), ranks.iter().min()) {
            if high - low >= self.config.stringency_spread_threshold {
                sum += STRINGENCY_SPREAD_WEIGHT;
            }
        }

        let eu_aligned = jurisdictions
            .values()
            .any(|name| contains_name(&self.config.eu_aligned, name));
        let non_eu = jurisdictions
            .values()
            .any(|name| contains_name(&self.config.non_eu, name));
        if eu_aligned && non_eu {
            sum += EU_BOUNDARY_WEIGHT;
        }

        sum
    }

    fn stringency(&self, jurisdiction: &str) -> Option<u8> {
        self.config
            .stringency
            .iter()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(jurisdiction))
            .map(|(_, rank)| *rank)
    }
}

fn resolve_category(citation: &Citation, candidates: &[LegalProvision]) -> Option<Category> {
    citation.category.clone().or_else(|| {
        candidates
            .iter()
            .find(|provision| provision.id == citation.id)
            .map(|provision| provision.category.clone())
    })
}
