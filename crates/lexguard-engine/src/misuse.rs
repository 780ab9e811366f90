//! Circumvention and misuse intent detection
//!
//! Runs on the raw query before any retrieved text is considered. Matching
//! is plain case-insensitive substring search, so "circumventing" matches
//! "circumvent".

use crate::config::MisuseConfig;

/// How a misuse match was made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MisuseKind {
    /// A listed misuse phrase occurs in the query
    Phrase,

    /// A request for steps or ways around a safety restriction
    SafetyWorkaround,
}

/// A positive misuse detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MisuseMatch {
    /// How the match was made
    pub kind: MisuseKind,

    /// The matched phrase, or a description of the compound match
    pub phrase: String,
}

impl MisuseMatch {
    /// Rationale shown to the user when the pipeline short-circuits
    pub fn rationale(&self) -> String {
        format!(
            "This request appears to seek ways to avoid legal or safety obligations \
             (matched: \"{}\"). In line with the safety principle, no eligibility \
             guidance is given for circumventing regulatory requirements. Please \
             rephrase the question around how to meet the applicable requirements.",
            self.phrase
        )
    }
}

/// Detects circumvention intent in a query
#[derive(Debug, Clone)]
pub struct MisuseDetector {
    config: MisuseConfig,
}

impl MisuseDetector {
    /// Create a detector with the given phrase lexicon
    pub fn new(config: MisuseConfig) -> Self {
        Self { config }
    }

    /// Check a query for misuse intent
    pub fn detect(&self, query: &str) -> Option<MisuseMatch> {
        let query = query.to_lowercase();

        if let Some(phrase) = self
            .config
            .phrases
            .iter()
            .find(|phrase| !phrase.is_empty() && query.contains(&phrase.to_lowercase()))
        {
            return Some(MisuseMatch {
                kind: MisuseKind::Phrase,
                phrase: phrase.clone(),
            });
        }

        let topic = self
            .config
            .guarded_topics
            .iter()
            .find(|topic| !topic.is_empty() && query.contains(&topic.to_lowercase()))?;

        let verb = self.config.request_verb.to_lowercase();
        if verb.is_empty() || !query.contains(&verb) {
            return None;
        }

        let method = self
            .config
            .method_words
            .iter()
            .find(|word| !word.is_empty() && query.contains(&word.to_lowercase()))?;

        Some(MisuseMatch {
            kind: MisuseKind::SafetyWorkaround,
            phrase: format!("{} {} around {}", self.config.request_verb, method, topic),
        })
    }
}
