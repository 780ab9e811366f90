//! Lexguard Engine
//!
//! Deterministic, auditable compliance analysis over retrieved legal
//! provisions. This is a heuristic classifier, not a legal-reasoning engine.
//!
//! The pipeline has three stages:
//! - **Retrieval & relevance**: rank store candidates against the query
//!   ([`RelevanceScorer`]) and score their mutual conflict ([`ConflictAnalyzer`])
//! - **Interpretation**: short-circuit on misuse intent ([`MisuseDetector`]),
//!   flag bias exposure ([`BiasDetector`]) and decide an outcome
//!   ([`OutcomeClassifier`])
//! - **Formatting**: enforce traceability and render the display text
//!   ([`TraceabilityFormatter`])
//!
//! # Examples
//!
//! ```
//! use lexguard_engine::{ComplianceEngine, EngineConfig};
//! use lexguard_domain::{Outcome, RetrievalResult};
//!
//! let engine = ComplianceEngine::new(EngineConfig::default()).unwrap();
//! let retrieval = RetrievalResult::empty();
//! let interpretation = engine.interpret(&retrieval, "Am I eligible for a grant?");
//! assert_eq!(interpretation.final_outcome, Outcome::RequiresMoreData);
//!
//! let output = engine.format(&retrieval, &interpretation);
//! assert!(output.display_text.contains("No specific legal citations"));
//! ```

#![warn(missing_docs)]

mod audit;
mod bias;
mod config;
mod conflict;
mod engine;
mod error;
mod formatter;
mod misuse;
mod outcome;
mod scorer;
mod text;

pub use audit::TracingAuditSink;
pub use bias::{BiasDetector, BiasFinding};
pub use config::{
    BiasConfig, ConflictConfig, EngineConfig, FormatterConfig, MisuseConfig, OutcomeConfig,
    RetrievalConfig,
};
pub use conflict::{ConflictAnalyzer, ConflictIndicators, MAX_CONFLICT_SCORE, MIN_CONFLICT_SCORE};
pub use engine::ComplianceEngine;
pub use error::EngineError;
pub use formatter::{is_traceable, TraceabilityFormatter, NO_CITATIONS_MESSAGE};
pub use misuse::{MisuseDetector, MisuseKind, MisuseMatch};
pub use outcome::{OutcomeClassifier, OutcomeIndicators, NO_CITATIONS_RATIONALE};
pub use scorer::{RelevanceScorer, ScoredProvision, ScoringMode, TokenOverlapSimilarity};
