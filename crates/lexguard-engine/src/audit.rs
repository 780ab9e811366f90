//! Audit sink that writes records to the tracing subscriber

use lexguard_domain::traits::AuditSink;
use lexguard_domain::{AuditEvent, AuditRecord};
use std::convert::Infallible;

/// Emits audit records as structured `tracing` events
///
/// Used when no persistent audit log is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    type Error = Infallible;

    fn record(&self, record: &AuditRecord) -> Result<(), Self::Error> {
        let query_id = record.query_id.to_string();
        match &record.event {
            AuditEvent::QueryCompleted {
                outcome,
                conflict_score,
                citation_count,
                bias_flag,
                primary_jurisdiction,
                ..
            } => tracing::info!(
                target: "lexguard::audit",
                %query_id,
                kind = record.event.kind(),
                %outcome,
                conflict_score,
                citation_count,
                %bias_flag,
                primary_jurisdiction = primary_jurisdiction.as_deref().unwrap_or("-"),
                "Query completed"
            ),
            AuditEvent::BiasDetected { query, rationale } => tracing::warn!(
                target: "lexguard::audit",
                %query_id,
                kind = record.event.kind(),
                query = %query,
                rationale = %rationale,
                "Bias detection"
            ),
            AuditEvent::HighConflict {
                conflict_score,
                citation_count,
            } => tracing::warn!(
                target: "lexguard::audit",
                %query_id,
                kind = record.event.kind(),
                conflict_score,
                citation_count,
                "High conflict"
            ),
        }
        Ok(())
    }
}
