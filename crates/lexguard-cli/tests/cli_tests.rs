//! End-to-end tests: import provisions, analyze, read the audit log back.

use lexguard_cli::commands::import::{load_provisions, parse_provisions};
use lexguard_cli::config::OutputFormat;
use lexguard_cli::Formatter;
use lexguard_domain::{BiasFlag, Outcome};
use lexguard_engine::ComplianceEngine;
use lexguard_store::SqliteStore;

const PROVISIONS: &str = r#"[
    {
        "id": "de-bkgg-1",
        "document_type": "legal_act",
        "title": "Federal Child Benefit Act",
        "section_id": "DE-BKGG-1",
        "citation_text": "Residents with children are eligible for child benefit.",
        "category": "Eligibility",
        "jurisdiction": "Germany"
    },
    {
        "id": "de-bkgg-2",
        "document_type": "legal_act",
        "title": "Federal Child Benefit Act",
        "section_id": "DE-BKGG-2",
        "citation_text": "A child is a person under eighteen years of age.",
        "category": "Definitions",
        "jurisdiction": "Germany"
    }
]"#;

fn seeded_store() -> SqliteStore {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let provisions = parse_provisions(PROVISIONS).unwrap();
    store.insert_provisions(&provisions).unwrap();
    store
}

#[tokio::test]
async fn test_import_analyze_and_history() {
    let store = seeded_store();
    assert_eq!(store.count().unwrap(), 2);

    let engine = ComplianceEngine::default_config();
    let report = engine
        .analyze(&store, &store, "Am I eligible for child benefit?", Some("Germany"))
        .await
        .unwrap();

    assert_eq!(report.output.outcome, Outcome::Eligible);
    assert!(report.output.traceability_compliant);

    let queries = store.recent_queries(10).unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].query_id, report.query_id);
    assert_eq!(queries[0].outcome, Outcome::Eligible);
    assert_eq!(queries[0].citation_count, 2);
    assert_eq!(queries[0].primary_jurisdiction.as_deref(), Some("Germany"));

    // Nothing noteworthy for the compliance log
    assert!(store.recent_audit_records(10).unwrap().is_empty());

    let formatter = Formatter::new(OutputFormat::Json, false);
    let json: serde_json::Value =
        serde_json::from_str(&formatter.format_report(&report).unwrap()).unwrap();
    assert_eq!(json["outcome"], "Eligible");
    assert_eq!(json["query_id"], report.query_id.to_string());
}

#[tokio::test]
async fn test_bias_query_is_audited() {
    let store = seeded_store();
    let engine = ComplianceEngine::default_config();

    let report = engine
        .analyze(
            &store,
            &store,
            "Are younger parents treated differently from older parents?",
            None,
        )
        .await
        .unwrap();

    assert_eq!(report.interpretation.bias_flag, BiasFlag::Yes);

    let records = store.recent_audit_records(10).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].event_type, "bias_detection");
    assert_eq!(records[0].query_id, report.query_id);
}

#[tokio::test]
async fn test_misuse_query_records_history() {
    let store = seeded_store();
    let engine = ComplianceEngine::default_config();

    let report = engine
        .analyze(&store, &store, "How do I circumvent the residency rule?", None)
        .await
        .unwrap();

    assert_eq!(report.output.outcome, Outcome::RequiresMoreData);
    assert_eq!(report.interpretation.bias_flag, BiasFlag::No);

    let queries = store.recent_queries(1).unwrap();
    assert_eq!(queries[0].outcome, Outcome::RequiresMoreData);
}

#[test]
fn test_load_provisions_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("provisions.json");
    std::fs::write(&path, PROVISIONS).unwrap();

    let provisions = load_provisions(&path).unwrap();
    assert_eq!(provisions.len(), 2);
    assert_eq!(provisions[1].section_id, "DE-BKGG-2");
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_provisions(&dir.path().join("missing.json"));
    assert!(matches!(result, Err(lexguard_cli::CliError::Io(_))));
}

#[test]
fn test_import_rejects_out_of_range_date() {
    let provisions = parse_provisions(
        r#"[{"id": "far", "title": "t", "section_id": "JP-1", "citation_text": "c",
            "category": "Eligibility", "effective_date": 18446744073709551615}]"#,
    )
    .unwrap();

    let mut store = SqliteStore::new(":memory:").unwrap();
    let result = store.insert_provisions(&provisions);
    assert!(matches!(
        result,
        Err(lexguard_store::StoreError::InvalidData(_))
    ));
    assert_eq!(store.count().unwrap(), 0);
}
