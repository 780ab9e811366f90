//! Relevance scoring of candidate provisions

use crate::config::RetrievalConfig;
use crate::text::{count_occurrences, query_terms};
use lexguard_domain::traits::SimilarityModel;
use lexguard_domain::{Category, Citation, LegalProvision};
use std::collections::BTreeSet;
use std::fmt;

const SECONDS_PER_DAY: u64 = 86_400;

/// How the base relevance of a candidate is computed
///
/// Category priors, recency bonus and jurisdiction boost are applied on top
/// of the base score in both modes.
#[derive(Default)]
pub enum ScoringMode {
    /// Weighted count of query-term occurrences
    #[default]
    Keyword,

    /// Similarity in [0, 1] from a pluggable model, scaled to keyword magnitude
    Similarity(Box<dyn SimilarityModel + Send + Sync>),
}

impl fmt::Debug for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringMode::Keyword => f.write_str("Keyword"),
            ScoringMode::Similarity(_) => f.write_str("Similarity"),
        }
    }
}

/// A candidate with its relevance score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProvision<'a> {
    /// The candidate
    pub provision: &'a LegalProvision,

    /// Final score after all adjustments
    pub score: f64,
}

/// Ranks candidate provisions against a query
#[derive(Debug)]
pub struct RelevanceScorer {
    config: RetrievalConfig,
    mode: ScoringMode,
}

impl RelevanceScorer {
    /// Create a keyword scorer with the given configuration
    pub fn new(config: RetrievalConfig) -> Self {
        Self {
            config,
            mode: ScoringMode::Keyword,
        }
    }

    /// Replace the scoring mode
    pub fn with_mode(mut self, mode: ScoringMode) -> Self {
        self.mode = mode;
        self
    }

    /// Score every candidate and sort by descending score
    ///
    /// The sort is stable, so equal scores keep candidate order.
    pub fn rank<'a>(
        &self,
        query: &str,
        candidates: &'a [LegalProvision],
        primary_jurisdiction: Option<&str>,
        evaluated_at: u64,
    ) -> Vec<ScoredProvision<'a>> {
        let terms = query_terms(query, self.config.min_term_chars);
        let hint = primary_jurisdiction
            .map(str::trim)
            .filter(|hint| !hint.is_empty());

        let mut scored: Vec<ScoredProvision<'a>> = candidates
            .iter()
            .take(self.config.candidate_limit)
            .map(|provision| {
                let mut score = self.base_score(query, &terms, provision)
                    + self.category_prior(&provision.category)
                    + self.recency_bonus(provision, evaluated_at);

                if let Some(hint) = hint {
                    if provision.jurisdiction.trim().eq_ignore_ascii_case(hint) {
                        score *= self.config.jurisdiction_boost;
                    }
                }

                ScoredProvision { provision, score }
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }

    /// Top citations for the query, best first
    pub fn top_citations(
        &self,
        query: &str,
        candidates: &[LegalProvision],
        primary_jurisdiction: Option<&str>,
        evaluated_at: u64,
    ) -> Vec<Citation> {
        let ranked = self.rank(query, candidates, primary_jurisdiction, evaluated_at);

        if let Some(best) = ranked.first() {
            tracing::debug!(
                candidates = candidates.len(),
                best_section = %best.provision.section_id,
                best_score = best.score,
                "Ranked candidate provisions"
            );
        }

        ranked
            .into_iter()
            .take(self.config.top_k)
            .map(|scored| Citation::from_provision(scored.provision))
            .collect()
    }

    fn base_score(&self, query: &str, terms: &[String], provision: &LegalProvision) -> f64 {
        match &self.mode {
            ScoringMode::Keyword => {
                let haystack = format!(
                    "{} {} {}",
                    provision.title,
                    provision.citation_text,
                    provision.category
                )
                .to_lowercase();
                let occurrences: usize = terms
                    .iter()
                    .map(|term| count_occurrences(&haystack, term))
                    .sum();
                occurrences as f64 * self.config.term_weight
            }
            ScoringMode::Similarity(model) => {
                let similarity = model.similarity(query, provision);
                let similarity = if similarity.is_finite() {
                    similarity.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                similarity * self.config.similarity_scale
            }
        }
    }

    fn category_prior(&self, category: &Category) -> f64 {
        match category {
            Category::Eligibility => self.config.eligibility_prior,
            Category::Exceptions => self.config.exceptions_prior,
            Category::Definitions => self.config.definitions_prior,
            Category::Other(_) => 0.0,
        }
    }

    fn recency_bonus(&self, provision: &LegalProvision, evaluated_at: u64) -> f64 {
        let window = self.config.recency_window_days.saturating_mul(SECONDS_PER_DAY);
        match provision.effective_date {
            Some(date) if evaluated_at.saturating_sub(date) <= window => self.config.recency_bonus,
            _ => 0.0,
        }
    }
}

/// Jaccard overlap between query terms and document terms
///
/// A dependency-free stand-in for an embedding backend.
#[derive(Debug, Clone)]
pub struct TokenOverlapSimilarity {
    min_term_chars: usize,
}

impl TokenOverlapSimilarity {
    /// Create a similarity model ignoring terms shorter than `min_term_chars`
    pub fn new(min_term_chars: usize) -> Self {
        Self { min_term_chars }
    }
}

impl Default for TokenOverlapSimilarity {
    fn default() -> Self {
        Self::new(4)
    }
}

impl SimilarityModel for TokenOverlapSimilarity {
    fn similarity(&self, query: &str, provision: &LegalProvision) -> f64 {
        let query_set: BTreeSet<String> =
            query_terms(query, self.min_term_chars).into_iter().collect();
        let document = format!("{} {}", provision.title, provision.citation_text);
        let document_set: BTreeSet<String> =
            query_terms(&document, self.min_term_chars).into_iter().collect();

        let union = query_set.union(&document_set).count();
        if union == 0 {
            return 0.0;
        }
        query_set.intersection(&document_set).count() as f64 / union as f64
    }
}
