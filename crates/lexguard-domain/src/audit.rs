//! Audit records produced by the pipeline

use crate::outcome::{BiasFlag, Outcome};
use crate::query::QueryId;

/// Something the pipeline reports to the audit sink
#[derive(Debug, Clone, PartialEq)]
pub enum AuditEvent {
    /// An analysis finished (query history)
    QueryCompleted {
        /// The user's question
        query: String,
        /// Primary jurisdiction hint, if supplied
        primary_jurisdiction: Option<String>,
        /// Final outcome
        outcome: Outcome,
        /// Conflict score of the retrieval
        conflict_score: u8,
        /// Number of top citations
        citation_count: usize,
        /// Bias flag of the interpretation
        bias_flag: BiasFlag,
    },

    /// Protected-characteristic language outside a non-discrimination context
    BiasDetected {
        /// The user's question
        query: String,
        /// Rationale given for the outcome
        rationale: String,
    },

    /// Retrieved provisions disagree strongly
    HighConflict {
        /// Conflict score of the retrieval
        conflict_score: u8,
        /// Number of top citations
        citation_count: usize,
    },
}

impl AuditEvent {
    /// Stable event kind name, used as a storage discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            AuditEvent::QueryCompleted { .. } => "query_completed",
            AuditEvent::BiasDetected { .. } => "bias_detection",
            AuditEvent::HighConflict { .. } => "high_conflict",
        }
    }
}

/// An audit event stamped with its query id and time
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    /// Invocation the event belongs to
    pub query_id: QueryId,

    /// When the event was recorded (seconds since Unix epoch)
    pub recorded_at: u64,

    /// The event itself
    pub event: AuditEvent,
}

impl AuditRecord {
    /// Create a new record
    pub fn new(query_id: QueryId, recorded_at: u64, event: AuditEvent) -> Self {
        Self {
            query_id,
            recorded_at,
            event,
        }
    }
}
