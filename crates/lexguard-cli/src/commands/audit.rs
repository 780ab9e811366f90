//! Audit command implementation.

use crate::cli::AuditArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lexguard_store::SqliteStore;

/// Execute the audit command.
pub fn execute_audit(args: AuditArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    if args.limit == 0 {
        return Err(CliError::InvalidInput(
            "Limit must be greater than zero".to_string(),
        ));
    }

    let output = if args.queries {
        formatter.format_queries(&store.recent_queries(args.limit)?)?
    } else {
        formatter.format_audit_records(&store.recent_audit_records(args.limit)?)?
    };

    println!("{}", output);

    Ok(())
}
