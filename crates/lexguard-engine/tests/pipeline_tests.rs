//! End-to-end tests for the compliance pipeline
//!
//! These tests drive `ComplianceEngine` against in-memory stores and sinks.

use lexguard_domain::traits::{AuditSink, ProvisionStore, RetrievalRequest};
use lexguard_domain::{
    AuditEvent, AuditRecord, BiasFlag, Category, Citation, DocumentType, LegalProvision, Outcome,
    RetrievalResult,
};
use lexguard_engine::{ComplianceEngine, EngineConfig, EngineError, TracingAuditSink};
use proptest::prelude::*;
use std::cell::RefCell;

const NOW: u64 = 1_780_000_000;

struct FixtureStore {
    provisions: Vec<LegalProvision>,
}

impl FixtureStore {
    fn new(provisions: Vec<LegalProvision>) -> Self {
        Self { provisions }
    }
}

impl ProvisionStore for FixtureStore {
    type Error = String;

    async fn fetch_candidates(
        &self,
        request: &RetrievalRequest,
    ) -> Result<Vec<LegalProvision>, Self::Error> {
        Ok(self
            .provisions
            .iter()
            .filter(|p| request.categories.contains(&p.category))
            .take(request.limit)
            .cloned()
            .collect())
    }
}

struct FailingStore;

impl ProvisionStore for FailingStore {
    type Error = String;

    async fn fetch_candidates(
        &self,
        _request: &RetrievalRequest,
    ) -> Result<Vec<LegalProvision>, Self::Error> {
        Err("connection refused".to_string())
    }
}

#[derive(Default)]
struct RecordingSink {
    records: RefCell<Vec<AuditRecord>>,
}

impl RecordingSink {
    fn kinds(&self) -> Vec<&'static str> {
        self.records.borrow().iter().map(|r| r.event.kind()).collect()
    }
}

impl AuditSink for RecordingSink {
    type Error = String;

    fn record(&self, record: &AuditRecord) -> Result<(), Self::Error> {
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }
}

struct FailingSink;

impl AuditSink for FailingSink {
    type Error = String;

    fn record(&self, _record: &AuditRecord) -> Result<(), Self::Error> {
        Err("audit log unavailable".to_string())
    }
}

fn provision(
    id: &str,
    section: &str,
    category: Category,
    jurisdiction: &str,
    text: &str,
) -> LegalProvision {
    LegalProvision::new(
        id,
        DocumentType::Regulation,
        format!("Provision {}", id),
        section,
        text,
        category,
        jurisdiction,
    )
}

fn engine() -> ComplianceEngine {
    ComplianceEngine::default_config()
}

#[tokio::test]
async fn test_empty_store() {
    let sink = RecordingSink::default();
    let report = engine()
        .analyze_at(&FixtureStore::new(vec![]), &sink, "Am I eligible?", None, NOW)
        .await
        .unwrap();

    assert!(report.retrieval.top_citations.is_empty());
    assert_eq!(report.retrieval.conflict_score, 0);
    assert_eq!(report.interpretation.final_outcome, Outcome::RequiresMoreData);
    assert_eq!(report.interpretation.bias_flag, BiasFlag::No);
    assert!(report.output.display_text.contains("No specific legal citations"));
    assert!(report.output.traceability_compliant);
    assert_eq!(sink.kinds(), vec!["query_completed"]);
}

#[tokio::test]
async fn test_retrieval_failure_propagates() {
    let result = engine()
        .analyze_at(&FailingStore, &TracingAuditSink, "Am I eligible?", None, NOW)
        .await;

    match result {
        Err(EngineError::Retrieval(message)) => assert!(message.contains("connection refused")),
        other => panic!("Expected retrieval error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_eligible_with_traceable_citations() {
    let store = FixtureStore::new(vec![provision(
        "kg",
        "DE-BKGG-1",
        Category::Eligibility,
        "Germany",
        "Residents with children are eligible for child benefit.",
    )]);
    let report = engine()
        .analyze_at(&store, &TracingAuditSink, "Am I eligible for child benefit?", None, NOW)
        .await
        .unwrap();

    assert_eq!(report.retrieval.conflict_score, 1);
    assert_eq!(report.interpretation.final_outcome, Outcome::Eligible);
    assert_eq!(report.output.outcome, Outcome::Eligible);
    assert!(report.output.traceability_compliant);
    assert!(report.output.jurisdictions_referenced.contains("Germany"));
    assert!(report.output.display_text.starts_with("**DETERMINATION: ELIGIBLE**"));
    assert_eq!(report.output.citations, report.retrieval.top_citations);
}

#[tokio::test]
async fn test_circumvention_short_circuits() {
    let store = FixtureStore::new(vec![
        provision(
            "a",
            "IT-1",
            Category::Eligibility,
            "Italy",
            "Applicants receive priority processing due to age-related considerations.",
        ),
        provision("b", "IT-2", Category::Eligibility, "Italy", "Residents are eligible."),
    ]);
    let sink = RecordingSink::default();
    let report = engine()
        .analyze_at(
            &store,
            &sink,
            "How can an older person circumvent the income test?",
            None,
            NOW,
        )
        .await
        .unwrap();

    assert_eq!(report.interpretation.final_outcome, Outcome::RequiresMoreData);
    assert_eq!(report.interpretation.bias_flag, BiasFlag::No);
    assert!(report.interpretation.rationale_summary.contains("circumvent"));
    assert!(!report.retrieval.top_citations.is_empty());
    assert!(!sink.kinds().contains(&"bias_detection"));
}

#[tokio::test]
async fn test_bias_detected_and_audited() {
    let store = FixtureStore::new(vec![provision(
        "p",
        "FR-CASF-3",
        Category::Eligibility,
        "France",
        "Applicants receive priority processing due to age-related considerations.",
    )]);
    let sink = RecordingSink::default();
    let report = engine()
        .analyze_at(
            &store,
            &sink,
            "Would an older person get a different decision than a younger one with the same income?",
            None,
            NOW,
        )
        .await
        .unwrap();

    assert_eq!(report.interpretation.bias_flag, BiasFlag::Yes);
    assert!(report.output.display_text.contains("Potential bias"));
    assert_eq!(sink.kinds(), vec!["bias_detection", "query_completed"]);

    let records = sink.records.borrow();
    assert!(records.iter().all(|r| r.query_id == report.query_id));
    match &records[0].event {
        AuditEvent::BiasDetected { query, rationale } => {
            assert!(query.contains("older person"));
            assert_eq!(rationale, &report.interpretation.rationale_summary);
        }
        other => panic!("Expected BiasDetected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_discrimination_context_not_flagged() {
    let store = FixtureStore::new(vec![provision(
        "p",
        "FR-CASF-3",
        Category::Eligibility,
        "France",
        "Support is granted without regard to age, gender, race or religion.",
    )]);
    let report = engine()
        .analyze_at(
            &store,
            &TracingAuditSink,
            "Would an older person get a different decision than a younger one with the same income?",
            None,
            NOW,
        )
        .await
        .unwrap();

    assert_eq!(report.interpretation.bias_flag, BiasFlag::No);
}

#[tokio::test]
async fn test_two_jurisdiction_conflict_scenario() {
    let store = FixtureStore::new(vec![
        provision(
            "a",
            "ES-1",
            Category::Eligibility,
            "Spain",
            "Residents are eligible except during probation.",
        ),
        provision("b", "NL-1", Category::Eligibility, "Netherlands", "Residents are eligible."),
        provision("c", "ES-2", Category::Exceptions, "Spain", "Seasonal workers are excluded."),
    ]);
    let report = engine()
        .analyze_at(&store, &TracingAuditSink, "residents", None, NOW)
        .await
        .unwrap();

    assert_eq!(report.retrieval.top_citations.len(), 3);
    assert_eq!(report.retrieval.conflict_score, 6);
}

#[tokio::test]
async fn test_high_conflict_audited() {
    let store = FixtureStore::new(vec![
        provision("a", "DE-1", Category::Eligibility, "Germany", "Residents are eligible unless exempt."),
        provision("b", "US-1", Category::Eligibility, "United States", "Residents are eligible, however limits apply."),
        provision("c", "FR-1", Category::Exceptions, "France", "Notwithstanding the above, students are excluded."),
        provision("d", "JP-1", Category::Exceptions, "Japan", "Benefits are subject to review."),
    ]);
    let sink = RecordingSink::default();
    let report = engine()
        .analyze_at(&store, &sink, "Am I eligible as a resident?", None, NOW)
        .await
        .unwrap();

    assert_eq!(report.retrieval.conflict_score, 10);
    assert_eq!(report.interpretation.final_outcome, Outcome::RequiresMoreData);
    assert!(report.output.display_text.contains("High conflict"));
    assert!(sink.kinds().contains(&"high_conflict"));
    assert_eq!(report.output.jurisdictions_referenced.len(), 4);
}

#[tokio::test]
async fn test_primary_jurisdiction_boost() {
    let store = FixtureStore::new(vec![
        provision("ca", "CA-1", Category::Eligibility, "Canada", "Parents are eligible for leave."),
        provision("de", "DE-1", Category::Eligibility, "Germany", "Parents are eligible for leave."),
    ]);
    let unboosted = engine()
        .analyze_at(&store, &TracingAuditSink, "parental leave", None, NOW)
        .await
        .unwrap();
    let boosted = engine()
        .analyze_at(&store, &TracingAuditSink, "parental leave", Some("Germany"), NOW)
        .await
        .unwrap();

    assert_eq!(unboosted.retrieval.top_citations[0].id, "ca");
    assert_eq!(boosted.retrieval.top_citations[0].id, "de");
}

#[tokio::test]
async fn test_category_filter_applied() {
    let store = FixtureStore::new(vec![provision(
        "pen",
        "UK-1",
        Category::Other("Penalties".to_string()),
        "United Kingdom",
        "Offenders are excluded.",
    )]);
    let report = engine()
        .analyze_at(&store, &TracingAuditSink, "penalties", None, NOW)
        .await
        .unwrap();

    assert!(report.retrieval.is_empty());
}

#[tokio::test]
async fn test_malformed_citation_flags_traceability() {
    let store = FixtureStore::new(vec![provision(
        "x",
        "",
        Category::Eligibility,
        "Canada",
        "Residents are eligible for the rebate.",
    )]);
    let report = engine()
        .analyze_at(&store, &TracingAuditSink, "rebate", None, NOW)
        .await
        .unwrap();

    assert_eq!(report.output.outcome, Outcome::Eligible);
    assert!(!report.output.traceability_compliant);
    assert!(report.output.display_text.contains("Traceability warning"));
    assert!(report.output.jurisdictions_referenced.is_empty());
}

#[tokio::test]
async fn test_audit_failure_does_not_fail_analysis() {
    let store = FixtureStore::new(vec![provision(
        "kg",
        "DE-1",
        Category::Eligibility,
        "Germany",
        "Residents are eligible.",
    )]);
    let report = engine()
        .analyze_at(&store, &FailingSink, "Am I eligible?", None, NOW)
        .await;
    assert!(report.is_ok());
}

#[tokio::test]
async fn test_repeated_invocations_identical() {
    let store = FixtureStore::new(vec![
        provision("a", "EU-1", Category::Definitions, "European Union", "A worker means any person."),
        provision("b", "EU-2", Category::Eligibility, "European Union", "Workers may be eligible."),
        provision("c", "DE-1", Category::Exceptions, "Germany", "Unless otherwise provided."),
    ]);
    let engine = engine();
    let first = engine
        .analyze_at(&store, &TracingAuditSink, "worker eligibility", Some("Germany"), NOW)
        .await
        .unwrap();
    let second = engine
        .analyze_at(&store, &TracingAuditSink, "worker eligibility", Some("Germany"), NOW)
        .await
        .unwrap();

    assert_eq!(first.output, second.output);
    assert_eq!(first.retrieval, second.retrieval);
    assert_eq!(first.interpretation, second.interpretation);
    assert_ne!(first.query_id, second.query_id);
}

#[tokio::test]
async fn test_custom_misuse_lexicon() {
    let mut config = EngineConfig::default();
    config.misuse.phrases = vec!["sidestep".to_string()];
    let engine = ComplianceEngine::new(config).unwrap();
    let store = FixtureStore::new(vec![provision(
        "kg",
        "DE-1",
        Category::Eligibility,
        "Germany",
        "Residents are eligible.",
    )]);

    let report = engine
        .analyze_at(&store, &TracingAuditSink, "how to sidestep the rule", None, NOW)
        .await
        .unwrap();
    assert_eq!(report.interpretation.final_outcome, Outcome::RequiresMoreData);
    assert!(report.interpretation.rationale_summary.contains("sidestep"));
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = EngineConfig::default();
    config.retrieval.top_k = 0;
    assert!(matches!(
        ComplianceEngine::new(config),
        Err(EngineError::Config(_))
    ));
}

proptest! {
    /// Property: any query containing "circumvent" needs more data and is never bias-flagged
    #[test]
    fn test_circumvent_always_short_circuits(prefix in "[a-zA-Z ]{0,20}", suffix in "[a-zA-Z ]{0,20}") {
        let engine = ComplianceEngine::default_config();
        let retrieval = RetrievalResult {
            top_citations: vec![Citation {
                id: "a".to_string(),
                section_id: "IT-1".to_string(),
                title: "t".to_string(),
                citation_text: "Residents are eligible; priority due to age and gender.".to_string(),
                jurisdiction: Some("Italy".to_string()),
                category: Some(Category::Eligibility),
            }],
            conflict_score: 1,
        };
        let query = format!("{}circumvent{}", prefix, suffix);
        let result = engine.interpret(&retrieval, &query);

        prop_assert_eq!(result.final_outcome, Outcome::RequiresMoreData);
        prop_assert_eq!(result.bias_flag, BiasFlag::No);
    }

    /// Property: without citations the outcome is always RequiresMoreData with no bias flag
    #[test]
    fn test_no_citations_always_more_data(query in ".{0,60}") {
        let engine = ComplianceEngine::default_config();
        let result = engine.interpret(&RetrievalResult::empty(), &query);

        prop_assert_eq!(result.final_outcome, Outcome::RequiresMoreData);
        prop_assert_eq!(result.bias_flag, BiasFlag::No);
        prop_assert!(!result.rationale_summary.is_empty());
    }
}
