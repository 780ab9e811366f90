//! Import command implementation.

use crate::cli::ImportArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lexguard_domain::{Category, DocumentType, LegalProvision};
use lexguard_store::SqliteStore;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Execute the import command.
pub fn execute_import(
    args: ImportArgs,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let provisions = load_provisions(Path::new(&args.file))?;
    let count = store.insert_provisions(&provisions)?;
    tracing::info!(file = %args.file, count, "Imported provisions");

    println!("{}", formatter.bulk_result("Imported", count));

    Ok(())
}

/// Read and validate a JSON array of provisions.
pub fn load_provisions(path: &Path) -> Result<Vec<LegalProvision>> {
    let json_data = fs::read_to_string(path)?;
    parse_provisions(&json_data)
}

/// Parse a JSON array of provisions.
pub fn parse_provisions(json_data: &str) -> Result<Vec<LegalProvision>> {
    let records: Vec<ProvisionRecord> = serde_json::from_str(json_data)?;

    if records.is_empty() {
        return Err(CliError::InvalidInput("No provisions provided".to_string()));
    }

    records
        .into_iter()
        .map(ProvisionRecord::into_provision)
        .collect()
}

/// Provision definition for JSON input.
#[derive(Debug, Deserialize)]
struct ProvisionRecord {
    id: String,
    #[serde(default = "default_document_type")]
    document_type: String,
    title: String,
    section_id: String,
    citation_text: String,
    category: String,
    #[serde(default)]
    jurisdiction: String,
    #[serde(default)]
    effective_date: Option<u64>,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

impl ProvisionRecord {
    fn into_provision(self) -> Result<LegalProvision> {
        if self.id.trim().is_empty() {
            return Err(CliError::InvalidInput(
                "Provision id must not be empty".to_string(),
            ));
        }

        let document_type: DocumentType = self.document_type.parse().map_err(|e| {
            CliError::InvalidInput(format!(
                "{} for provision {}. Expected legal_act, regulation or policy",
                e, self.id
            ))
        })?;

        Ok(LegalProvision {
            id: self.id,
            document_type,
            title: self.title,
            section_id: self.section_id,
            citation_text: self.citation_text,
            category: Category::parse(&self.category),
            jurisdiction: self.jurisdiction,
            effective_date: self.effective_date,
            metadata: self.metadata,
        })
    }
}

fn default_document_type() -> String {
    "regulation".to_string()
}
