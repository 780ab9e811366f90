//! Lexguard Domain Layer
//!
//! This crate contains the data model shared by every other Lexguard crate.
//! It keeps external dependencies to a minimum and defines the value objects
//! and trait interfaces that the pipeline, the storage adapter, and the CLI
//! depend upon.
//!
//! ## Key Concepts
//!
//! - **LegalProvision**: A retrieved legal act, regulation or policy section
//! - **Citation**: A traceable projection of a provision used as evidence
//! - **RetrievalResult**: Ranked top citations plus a conflict score (0-10)
//! - **InterpretationResult**: Outcome, rationale and bias flag
//! - **FormattedOutput**: Display text plus the structured, traceable fields
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - Storage and audit adapters live in `lexguard-store`
//! - The analysis pipeline lives in `lexguard-engine`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod citation;
pub mod outcome;
pub mod output;
pub mod provision;
pub mod query;
pub mod traits;

// Re-exports for convenience
pub use audit::{AuditEvent, AuditRecord};
pub use citation::{Citation, RetrievalResult};
pub use outcome::{BiasFlag, InterpretationResult, Outcome};
pub use output::{AnalysisReport, FormattedOutput};
pub use provision::{Category, DocumentType, LegalProvision};
pub use query::QueryId;
