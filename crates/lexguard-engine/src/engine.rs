//! The three-stage compliance analysis pipeline

use crate::conflict::ConflictAnalyzer;
use crate::formatter::TraceabilityFormatter;
use crate::misuse::MisuseDetector;
use crate::outcome::OutcomeClassifier;
use crate::scorer::{RelevanceScorer, ScoringMode};
use crate::{EngineConfig, EngineError};
use lexguard_domain::traits::{AuditSink, ProvisionStore, RetrievalRequest};
use lexguard_domain::{
    AnalysisReport, AuditEvent, AuditRecord, BiasFlag, Category, FormattedOutput,
    InterpretationResult, QueryId, RetrievalResult,
};
use std::fmt::Display;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current timestamp in seconds since Unix epoch
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Answers compliance questions against a document store
///
/// Retrieval & relevance scoring, interpretation (misuse, conflict, bias,
/// outcome), then traceability formatting. The store and the audit sink are
/// passed per call; the engine holds no per-query state, so one engine can
/// serve concurrent invocations.
///
/// # Examples
///
/// ```no_run
/// use lexguard_engine::{ComplianceEngine, TracingAuditSink};
///
/// # async fn run<S>(store: &S) -> Result<(), Box<dyn std::error::Error>>
/// # where S: lexguard_domain::traits::ProvisionStore, S::Error: std::fmt::Display {
/// let engine = ComplianceEngine::default_config();
/// let report = engine
///     .analyze(store, &TracingAuditSink, "Am I eligible for child benefit?", Some("Germany"))
///     .await?;
/// println!("{}", report.output.display_text);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ComplianceEngine {
    config: EngineConfig,
    scorer: RelevanceScorer,
    conflict: ConflictAnalyzer,
    misuse: MisuseDetector,
    classifier: OutcomeClassifier,
    formatter: TraceabilityFormatter,
}

impl ComplianceEngine {
    /// Create an engine from a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Create an engine with default configuration
    pub fn default_config() -> Self {
        Self::build(EngineConfig::default())
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            scorer: RelevanceScorer::new(config.retrieval.clone()),
            conflict: ConflictAnalyzer::new(config.conflict.clone()),
            misuse: MisuseDetector::new(config.misuse.clone()),
            classifier: OutcomeClassifier::new(config.outcome.clone(), config.bias.clone()),
            formatter: TraceabilityFormatter::new(config.formatter.clone()),
            config,
        }
    }

    /// Replace the relevance scoring mode
    pub fn with_scoring_mode(mut self, mode: ScoringMode) -> Self {
        self.scorer = self.scorer.with_mode(mode);
        self
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a question, evaluated at the current time
    pub async fn analyze<S, A>(
        &self,
        store: &S,
        audit: &A,
        query: &str,
        primary_jurisdiction: Option<&str>,
    ) -> Result<AnalysisReport, EngineError>
    where
        S: ProvisionStore,
        S::Error: Display,
        A: AuditSink,
        A::Error: Display,
    {
        self.analyze_at(store, audit, query, primary_jurisdiction, current_timestamp())
            .await
    }

    /// Analyze a question with an explicit evaluation time
    ///
    /// The evaluation time drives the recency bonus and stamps audit records.
    /// Identical inputs against an unchanged store give identical output.
    pub async fn analyze_at<S, A>(
        &self,
        store: &S,
        audit: &A,
        query: &str,
        primary_jurisdiction: Option<&str>,
        evaluated_at: u64,
    ) -> Result<AnalysisReport, EngineError>
    where
        S: ProvisionStore,
        S::Error: Display,
        A: AuditSink,
        A::Error: Display,
    {
        let query_id = QueryId::new();

        let retrieval = self
            .retrieve(store, query, primary_jurisdiction, evaluated_at)
            .await?;
        let interpretation = self.interpret(&retrieval, query);
        let output = self.format(&retrieval, &interpretation);

        tracing::info!(
            %query_id,
            outcome = %interpretation.final_outcome,
            conflict_score = retrieval.conflict_score,
            citations = retrieval.top_citations.len(),
            bias_flag = %interpretation.bias_flag,
            traceable = output.traceability_compliant,
            "Analysis complete"
        );

        self.emit_audit(
            audit,
            query_id,
            evaluated_at,
            query,
            primary_jurisdiction,
            &retrieval,
            &interpretation,
        );

        Ok(AnalysisReport {
            query_id,
            retrieval,
            interpretation,
            output,
        })
    }

    /// Retrieval and relevance stage
    ///
    /// Store failures are fatal; an empty candidate set is not and yields
    /// the empty result without running conflict analysis.
    pub async fn retrieve<S>(
        &self,
        store: &S,
        query: &str,
        primary_jurisdiction: Option<&str>,
        evaluated_at: u64,
    ) -> Result<RetrievalResult, EngineError>
    where
        S: ProvisionStore,
        S::Error: Display,
    {
        let request = RetrievalRequest {
            categories: self
                .config
                .retrieval
                .categories
                .iter()
                .map(|name| Category::parse(name))
                .collect(),
            limit: self.config.retrieval.candidate_limit,
            primary_jurisdiction: primary_jurisdiction.map(str::to_string),
        };

        let candidates = store
            .fetch_candidates(&request)
            .await
            .map_err(|e| EngineError::Retrieval(format!("Failed to fetch candidates: {}", e)))?;

        tracing::debug!(candidates = candidates.len(), "Fetched candidate provisions");

        let top_citations =
            self.scorer
                .top_citations(query, &candidates, primary_jurisdiction, evaluated_at);
        if top_citations.is_empty() {
            return Ok(RetrievalResult::empty());
        }

        let conflict_score = self.conflict.score(&top_citations, &candidates);
        Ok(RetrievalResult {
            top_citations,
            conflict_score,
        })
    }

    /// Interpretation stage
    ///
    /// Misuse intent short-circuits everything else, including bias
    /// detection: the result always carries `BiasFlag::No`.
    pub fn interpret(&self, retrieval: &RetrievalResult, query: &str) -> InterpretationResult {
        if let Some(found) = self.misuse.detect(query) {
            tracing::warn!(phrase = %found.phrase, "Misuse intent detected, skipping analysis");
            return InterpretationResult::requires_more_data(found.rationale());
        }

        self.classifier
            .classify(&retrieval.top_citations, retrieval.conflict_score, query)
    }

    /// Formatting and traceability stage
    pub fn format(
        &self,
        retrieval: &RetrievalResult,
        interpretation: &InterpretationResult,
    ) -> FormattedOutput {
        self.formatter.format(retrieval, interpretation)
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_audit<A>(
        &self,
        audit: &A,
        query_id: QueryId,
        recorded_at: u64,
        query: &str,
        primary_jurisdiction: Option<&str>,
        retrieval: &RetrievalResult,
        interpretation: &InterpretationResult,
    ) where
        A: AuditSink,
        A::Error: Display,
    {
        let citation_count = retrieval.top_citations.len();
        let mut events = Vec::new();

        if interpretation.bias_flag == BiasFlag::Yes {
            events.push(AuditEvent::BiasDetected {
                query: query.to_string(),
                rationale: interpretation.rationale_summary.clone(),
            });
        }
        if retrieval.conflict_score >= self.config.formatter.high_conflict_threshold {
            events.push(AuditEvent::HighConflict {
                conflict_score: retrieval.conflict_score,
                citation_count,
            });
        }
        events.push(AuditEvent::QueryCompleted {
            query: query.to_string(),
            primary_jurisdiction: primary_jurisdiction.map(str::to_string),
            outcome: interpretation.final_outcome,
            conflict_score: retrieval.conflict_score,
            citation_count,
            bias_flag: interpretation.bias_flag,
        });

        for event in events {
            let kind = event.kind();
            if let Err(e) = audit.record(&AuditRecord::new(query_id, recorded_at, event)) {
                tracing::warn!(%query_id, kind, error = %e, "Failed to write audit record");
            }
        }
    }
}
