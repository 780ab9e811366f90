//! Citations and the retrieval stage result

use crate::provision::{Category, LegalProvision};

/// A rendered reference to a specific legal provision
///
/// Every citation is a projection of a provision in the candidate set that
/// produced it; `id` is the link back.
#[derive(Debug, Clone, PartialEq)]
pub struct Citation {
    /// Identity of the source provision
    pub id: String,

    /// Jurisdiction-prefixed section identifier
    pub section_id: String,

    /// Title of the source provision
    pub title: String,

    /// Provision text
    pub citation_text: String,

    /// Jurisdiction, when the source provision carries one
    pub jurisdiction: Option<String>,

    /// Category of the source provision
    pub category: Option<Category>,
}

impl Citation {
    /// Project a provision into a citation
    ///
    /// A blank jurisdiction is treated as missing metadata.
    pub fn from_provision(provision: &LegalProvision) -> Self {
        let jurisdiction = provision.jurisdiction.trim();
        Self {
            id: provision.id.clone(),
            section_id: provision.section_id.clone(),
            title: provision.title.clone(),
            citation_text: provision.citation_text.clone(),
            jurisdiction: (!jurisdiction.is_empty()).then(|| jurisdiction.to_string()),
            category: Some(provision.category.clone()),
        }
    }

    /// Whether the citation carries the fields traceability requires
    pub fn is_complete(&self) -> bool {
        !self.section_id.trim().is_empty() && !self.citation_text.trim().is_empty()
    }
}

/// Output of the retrieval and relevance stage
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalResult {
    /// Top citations, best first (at most five by default)
    pub top_citations: Vec<Citation>,

    /// Conflict score: 1-10, or 0 only when there are no citations
    pub conflict_score: u8,
}

impl RetrievalResult {
    /// The empty result: no citations, conflict score 0
    pub fn empty() -> Self {
        Self {
            top_citations: Vec::new(),
            conflict_score: 0,
        }
    }

    /// Whether any citations were found
    pub fn is_empty(&self) -> bool {
        self.top_citations.is_empty()
    }
}
