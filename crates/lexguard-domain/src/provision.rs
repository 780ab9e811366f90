//! Legal provision records as supplied by the document store

use std::collections::BTreeMap;
use std::fmt;

/// Kind of legal instrument a provision belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    /// Primary legislation
    LegalAct,

    /// Secondary legislation or binding regulation
    Regulation,

    /// Administrative policy or guidance
    Policy,
}

impl DocumentType {
    /// Get the document type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::LegalAct => "legal_act",
            DocumentType::Regulation => "regulation",
            DocumentType::Policy => "policy",
        }
    }

    /// Parse a document type, accepting both snake case and display names
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "legalact" | "act" => Some(DocumentType::LegalAct),
            "regulation" => Some(DocumentType::Regulation),
            "policy" => Some(DocumentType::Policy),
            _ => None,
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid document type: {}", s))
    }
}

/// Subject-matter category of a provision
///
/// The three named categories are the ones the relevance scorer retrieves
/// and weights; anything else is carried through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Who qualifies for a benefit, licence or status
    Eligibility,

    /// Defined terms
    Definitions,

    /// Carve-outs from the general rule
    Exceptions,

    /// Any other category name, stored verbatim
    Other(String),
}

impl Category {
    /// Get the category name as a string
    pub fn as_str(&self) -> &str {
        match self {
            Category::Eligibility => "Eligibility",
            Category::Definitions => "Definitions",
            Category::Exceptions => "Exceptions",
            Category::Other(name) => name,
        }
    }

    /// Parse a category name (case-insensitive); unknown names become `Other`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "eligibility" => Category::Eligibility,
            "definitions" | "definition" => Category::Definitions,
            "exceptions" | "exception" => Category::Exceptions,
            _ => Category::Other(s.trim().to_string()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A legal provision retrieved from the document store
///
/// Provisions are owned by the store and are read-only to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct LegalProvision {
    /// Store identity
    pub id: String,

    /// Kind of instrument
    pub document_type: DocumentType,

    /// Human-readable title
    pub title: String,

    /// Jurisdiction-prefixed section identifier, e.g. `DE-SGB-II-7`
    pub section_id: String,

    /// Provision text
    pub citation_text: String,

    /// Subject-matter category
    pub category: Category,

    /// Free-form country or region name
    pub jurisdiction: String,

    /// When the provision took effect (seconds since Unix epoch)
    pub effective_date: Option<u64>,

    /// Opaque store metadata
    pub metadata: BTreeMap<String, String>,
}

impl LegalProvision {
    /// Create a provision with no effective date and empty metadata
    pub fn new(
        id: impl Into<String>,
        document_type: DocumentType,
        title: impl Into<String>,
        section_id: impl Into<String>,
        citation_text: impl Into<String>,
        category: Category,
        jurisdiction: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            document_type,
            title: title.into(),
            section_id: section_id.into(),
            citation_text: citation_text.into(),
            category,
            jurisdiction: jurisdiction.into(),
            effective_date: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Set the effective date
    pub fn with_effective_date(mut self, effective_date: u64) -> Self {
        self.effective_date = Some(effective_date);
        self
    }
}
