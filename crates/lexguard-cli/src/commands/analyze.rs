//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lexguard_engine::{ComplianceEngine, TracingAuditSink};
use lexguard_store::SqliteStore;

/// Execute the analyze command.
pub async fn execute_analyze(
    args: AnalyzeArgs,
    engine: &ComplianceEngine,
    store: &SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let query = args.query.trim();
    if query.is_empty() {
        return Err(CliError::InvalidInput("Query must not be empty".to_string()));
    }

    let jurisdiction = args.jurisdiction.as_deref();
    tracing::debug!(jurisdiction, dry_run = args.dry_run, "Starting analysis");

    let report = if args.dry_run {
        engine
            .analyze(store, &TracingAuditSink, query, jurisdiction)
            .await?
    } else {
        engine.analyze(store, store, query, jurisdiction).await?
    };

    println!("{}", formatter.format_report(&report)?);

    Ok(())
}
