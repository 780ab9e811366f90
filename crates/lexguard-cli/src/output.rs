//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use lexguard_domain::{AnalysisReport, Citation, Outcome};
use lexguard_store::{AuditLogEntry, QueryLogEntry};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an analysis report.
    pub fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_report_json(report),
            OutputFormat::Text => Ok(self.format_report_text(report)),
        }
    }

    fn format_report_json(&self, report: &AnalysisReport) -> Result<String> {
        let citations: Vec<serde_json::Value> = report
            .output
            .citations
            .iter()
            .map(|c| {
                serde_json::json!({
                    "section_id": c.section_id,
                    "title": c.title,
                    "jurisdiction": c.jurisdiction,
                    "category": c.category.as_ref().map(|cat| cat.as_str()),
                    "citation_text": c.citation_text,
                })
            })
            .collect();

        let value = serde_json::json!({
            "query_id": report.query_id.to_string(),
            "outcome": report.output.outcome.as_str(),
            "rationale": report.interpretation.rationale_summary,
            "bias_flag": report.interpretation.bias_flag.as_str(),
            "conflict_score": report.retrieval.conflict_score,
            "traceability_compliant": report.output.traceability_compliant,
            "jurisdictions_referenced": report.output.jurisdictions_referenced,
            "citations": citations,
            "display_text": report.output.display_text,
        });

        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn format_report_text(&self, report: &AnalysisReport) -> String {
        let mut lines = report.output.display_text.lines();
        let heading = lines.next().unwrap_or_default();
        let rest: Vec<&str> = lines.collect();

        let color = match report.output.outcome {
            Outcome::Eligible => "green",
            Outcome::NotEligible => "red",
            Outcome::RequiresMoreData => "yellow",
        };

        let mut out = self.colorize(heading, color);
        if !rest.is_empty() {
            out.push('\n');
            out.push_str(&rest.join("\n"));
        }

        if !report.output.citations.is_empty() {
            out.push_str("\n\n");
            out.push_str(&self.citations_table(&report.output.citations));
            out.push('\n');
            out.push_str(&self.info(&format!(
                "Conflict score: {}/10",
                report.retrieval.conflict_score
            )));
        }

        out
    }

    fn citations_table(&self, citations: &[Citation]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Section", "Title", "Jurisdiction", "Category"]);

        for citation in citations {
            builder.push_record([
                citation.section_id.clone(),
                citation.title.clone(),
                citation.jurisdiction.clone().unwrap_or_else(|| "-".to_string()),
                citation
                    .category
                    .as_ref()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format compliance audit records.
    pub fn format_audit_records(&self, records: &[AuditLogEntry]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> = records
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "query_id": r.query_id.to_string(),
                            "event_type": r.event_type,
                            "payload": r.payload,
                            "recorded_at": r.recorded_at,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Text => {
                if records.is_empty() {
                    return Ok(self.colorize("No audit records found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Query", "Event", "Details", "Recorded"]);
                for record in records {
                    builder.push_record([
                        short_id(&record.query_id.to_string()),
                        record.event_type.clone(),
                        record.payload.to_string(),
                        record.recorded_at.to_string(),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format the query history.
    pub fn format_queries(&self, queries: &[QueryLogEntry]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> = queries
                    .iter()
                    .map(|q| {
                        serde_json::json!({
                            "query_id": q.query_id.to_string(),
                            "query": q.query,
                            "primary_jurisdiction": q.primary_jurisdiction,
                            "outcome": q.outcome.as_str(),
                            "conflict_score": q.conflict_score,
                            "citation_count": q.citation_count,
                            "bias_flag": q.bias_flag.as_str(),
                            "recorded_at": q.recorded_at,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Text => {
                if queries.is_empty() {
                    return Ok(self.colorize("No queries found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Query", "Question", "Outcome", "Conflict", "Citations", "Bias"]);
                for q in queries {
                    builder.push_record([
                        short_id(&q.query_id.to_string()),
                        q.query.clone(),
                        q.outcome.to_string(),
                        q.conflict_score.to_string(),
                        q.citation_count.to_string(),
                        q.bias_flag.to_string(),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format bulk operation result.
    pub fn bulk_result(&self, operation: &str, count: usize) -> String {
        self.success(&format!("{} {} provision(s)", operation, count))
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().bold().to_string(),
            "green" => text.green().bold().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

// Leading segment of a UUID, for table readability
fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}
