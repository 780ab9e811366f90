//! Engine error types

use thiserror::Error;

/// Errors that can occur during an analysis
///
/// Only retrieval can fail an invocation; every later stage is total.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Document store unreachable or query failed
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
