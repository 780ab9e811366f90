//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the analysis pipeline and
//! infrastructure. Implementations live in other crates.

use crate::{AuditRecord, Category, LegalProvision};

/// Request sent to the document store gateway
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RetrievalRequest {
    /// Coarse category filter
    pub categories: Vec<Category>,

    /// Maximum number of candidates to return
    pub limit: usize,

    /// Jurisdiction to favour, for boosted retrieval
    pub primary_jurisdiction: Option<String>,
}

/// Trait for retrieving candidate provisions
///
/// Implemented by the infrastructure layer (lexguard-store). An empty result
/// is valid and distinct from an error.
#[allow(async_fn_in_trait)]
pub trait ProvisionStore {
    /// Error type for store operations
    type Error;

    /// Fetch candidate provisions matching the request
    async fn fetch_candidates(
        &self,
        request: &RetrievalRequest,
    ) -> Result<Vec<LegalProvision>, Self::Error>;
}

/// Trait for recording audit events
///
/// The pipeline treats the sink as fire-and-forget: errors are logged and
/// never fail an analysis.
pub trait AuditSink {
    /// Error type for sink operations
    type Error;

    /// Record one audit event
    fn record(&self, record: &AuditRecord) -> Result<(), Self::Error>;
}

/// Trait for similarity-based relevance scoring
///
/// Replaces keyword term counting in the relevance scorer.
pub trait SimilarityModel {
    /// Similarity of the query to the provision, in [0, 1]
    fn similarity(&self, query: &str, provision: &LegalProvision) -> f64;
}
