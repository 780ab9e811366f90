//! Engine configuration
//!
//! Every lexicon and threshold the pipeline uses is an explicit value here,
//! owned by the component that reads it, so callers and tests can swap
//! lexicons without touching process-wide state.

use crate::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Top-level configuration for the compliance engine
///
/// # Examples
///
/// ```
/// use lexguard_engine::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.retrieval.top_k, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Retrieval and relevance scoring
    pub retrieval: RetrievalConfig,

    /// Conflict scoring lexicons and jurisdiction tables
    pub conflict: ConflictConfig,

    /// Misuse phrases
    pub misuse: MisuseConfig,

    /// Bias lexicons
    pub bias: BiasConfig,

    /// Outcome indicator lexicons and thresholds
    pub outcome: OutcomeConfig,

    /// Output rendering
    pub formatter: FormatterConfig,
}

impl EngineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), EngineError> {
        let retrieval = &self.retrieval;
        if retrieval.candidate_limit == 0 {
            return Err(EngineError::Config(
                "retrieval.candidate_limit must be greater than 0".to_string(),
            ));
        }
        if retrieval.top_k == 0 {
            return Err(EngineError::Config(
                "retrieval.top_k must be greater than 0".to_string(),
            ));
        }
        if retrieval.categories.is_empty() {
            return Err(EngineError::Config(
                "retrieval.categories must not be empty".to_string(),
            ));
        }
        if !(retrieval.jurisdiction_boost >= 1.0) {
            return Err(EngineError::Config(format!(
                "retrieval.jurisdiction_boost must be at least 1.0, got {}",
                retrieval.jurisdiction_boost
            )));
        }
        for (jurisdiction, rank) in &self.conflict.stringency {
            if !(5..=10).contains(rank) {
                return Err(EngineError::Config(format!(
                    "conflict.stringency rank for {} must be within 5-10, got {}",
                    jurisdiction, rank
                )));
            }
        }
        if self.formatter.excerpt_chars == 0 {
            return Err(EngineError::Config(
                "formatter.excerpt_chars must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| EngineError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

/// Retrieval and relevance scoring parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Maximum candidates requested from the store
    pub candidate_limit: usize,

    /// Number of citations kept after ranking
    pub top_k: usize,

    /// Category names requested from the store
    pub categories: Vec<String>,

    /// Query terms shorter than this are ignored
    pub min_term_chars: usize,

    /// Score per term occurrence
    pub term_weight: f64,

    /// Prior for Eligibility documents
    pub eligibility_prior: f64,

    /// Prior for Exceptions documents
    pub exceptions_prior: f64,

    /// Prior for Definitions documents
    pub definitions_prior: f64,

    /// Bonus for recently effective documents
    pub recency_bonus: f64,

    /// Window for the recency bonus (days)
    pub recency_window_days: u64,

    /// Multiplier for documents in the primary jurisdiction
    pub jurisdiction_boost: f64,

    /// Scale applied to similarity scores in [0, 1]
    pub similarity_scale: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            candidate_limit: 20,
            top_k: 5,
            categories: strings(&["Eligibility", "Definitions", "Exceptions"]),
            min_term_chars: 4,
            term_weight: 10.0,
            eligibility_prior: 20.0,
            exceptions_prior: 15.0,
            definitions_prior: 10.0,
            recency_bonus: 5.0,
            recency_window_days: 365,
            jurisdiction_boost: 1.5,
            similarity_scale: 100.0,
        }
    }
}

/// Conflict scoring lexicons and jurisdiction tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflictConfig {
    /// Qualifying terms that signal internal tension
    pub qualifier_terms: Vec<String>,

    /// G7 member jurisdictions (the EU counts as a member)
    pub g7_jurisdictions: Vec<String>,

    /// Jurisdictions aligned with EU data-protection law
    pub eu_aligned: Vec<String>,

    /// G7 jurisdictions outside the EU
    pub non_eu: Vec<String>,

    /// Minimum rank spread that counts as divergent
    pub stringency_spread_threshold: u8,

    /// Data-protection stringency rank per jurisdiction (5-10)
    pub stringency: BTreeMap<String, u8>,
}

impl Default for ConflictConfig {
    fn default() -> Self {
        let stringency = [
            ("European Union", 10),
            ("Germany", 10),
            ("France", 9),
            ("Italy", 8),
            ("United Kingdom", 8),
            ("Canada", 7),
            ("Japan", 7),
            ("United States", 5),
        ]
        .into_iter()
        .map(|(name, rank)| (name.to_string(), rank))
        .collect();

        Self {
            qualifier_terms: strings(&[
                "except",
                "unless",
                "however",
                "notwithstanding",
                "provided that",
                "subject to",
            ]),
            g7_jurisdictions: strings(&[
                "Canada",
                "France",
                "Germany",
                "Italy",
                "Japan",
                "United Kingdom",
                "United States",
                "European Union",
            ]),
            eu_aligned: strings(&["European Union", "Germany", "France", "Italy"]),
            non_eu: strings(&["United States", "Japan", "United Kingdom", "Canada"]),
            stringency_spread_threshold: 3,
            stringency,
        }
    }
}

/// Misuse phrase lexicon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MisuseConfig {
    /// Phrases that signal circumvention intent on their own
    pub phrases: Vec<String>,

    /// Topics of the compound heuristic
    pub guarded_topics: Vec<String>,

    /// Verb of the compound heuristic
    pub request_verb: String,

    /// Method words of the compound heuristic
    pub method_words: Vec<String>,
}

impl Default for MisuseConfig {
    fn default() -> Self {
        Self {
            phrases: strings(&[
                "circumvent",
                "bypass",
                "loophole",
                "evade",
                "how to violate",
                "get around the law",
                "avoid detection",
                "without getting caught",
                "trick the system",
                "falsify",
            ]),
            guarded_topics: strings(&["safety", "restriction", "prohibited"]),
            request_verb: "suggest".to_string(),
            method_words: strings(&["step", "way"]),
        }
    }
}

/// Bias detection lexicons
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BiasConfig {
    /// Protected-characteristic terms
    pub protected_terms: Vec<String>,

    /// Phrases that establish a non-discrimination context
    pub legal_context_phrases: Vec<String>,

    /// Query patterns of ordinary eligibility questions
    pub legitimate_question_patterns: Vec<String>,

    /// Phrasing that compares outcomes between groups
    pub comparative_phrases: Vec<String>,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            protected_terms: strings(&[
                "race",
                "racial",
                "ethnicity",
                "ethnic",
                "gender",
                "sex",
                "religion",
                "religious",
                "nationality",
                "national origin",
                "age",
                "age-related",
                "older",
                "elderly",
                "younger",
                "disability",
                "disabled",
                "sexual orientation",
                "marital status",
                "pregnancy",
            ]),
            legal_context_phrases: strings(&[
                "without regard to",
                "protected class",
                "protected characteristic",
                "non-discriminatory",
                "non-discrimination",
                "anti-discrimination",
                "shall not discriminate",
                "equal treatment",
                "equal opportunity",
                "regardless of",
            ]),
            legitimate_question_patterns: strings(&[
                "am i eligible",
                "what are the requirements",
                "do i qualify",
                "can i apply",
                "how do i apply",
                "what documents",
                "who is eligible",
            ]),
            comparative_phrases: strings(&["more likely", "less likely"]),
        }
    }
}

/// Outcome indicator lexicons and thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeConfig {
    /// Terms indicating eligibility
    pub eligibility_terms: Vec<String>,

    /// Terms indicating ineligibility
    pub ineligibility_terms: Vec<String>,

    /// Terms indicating discretion or uncertainty
    pub uncertainty_terms: Vec<String>,

    /// Exception markers
    pub exception_markers: Vec<String>,

    /// Uncertainty added when any citation carries an exception marker
    pub exception_uncertainty: u32,

    /// Conflict score from which uncertainty is raised
    pub conflict_uncertainty_threshold: u8,

    /// Uncertainty added at the conflict threshold
    pub conflict_uncertainty: u32,

    /// Uncertainty above this forces RequiresMoreData
    pub uncertainty_limit: u32,

    /// Conflict score from which RequiresMoreData is forced
    pub conflict_limit: u8,
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        Self {
            eligibility_terms: strings(&["eligible", "entitled", "qualifies"]),
            ineligibility_terms: strings(&[
                "not eligible",
                "ineligible",
                "excluded",
                "prohibited",
                "disqualified",
            ]),
            uncertainty_terms: strings(&[
                "may",
                "discretion",
                "case-by-case",
                "subject to review",
                "upon approval",
            ]),
            exception_markers: strings(&["except", "unless", "provided that"]),
            exception_uncertainty: 2,
            conflict_uncertainty_threshold: 7,
            conflict_uncertainty: 3,
            uncertainty_limit: 2,
            conflict_limit: 8,
        }
    }
}

/// Output rendering parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Citation excerpt length (characters)
    pub excerpt_chars: usize,

    /// Conflict score that triggers the high-conflict note and audit record
    pub high_conflict_threshold: u8,

    /// Section id prefix to jurisdiction name
    pub section_prefixes: BTreeMap<String, String>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        let section_prefixes = [
            ("CA-", "Canada"),
            ("DE-", "Germany"),
            ("EU-", "European Union"),
            ("FR-", "France"),
            ("IT-", "Italy"),
            ("JP-", "Japan"),
            ("UK-", "United Kingdom"),
            ("US-", "United States"),
        ]
        .into_iter()
        .map(|(prefix, name)| (prefix.to_string(), name.to_string()))
        .collect();

        Self {
            excerpt_chars: 200,
            high_conflict_threshold: 7,
            section_prefixes,
        }
    }
}
