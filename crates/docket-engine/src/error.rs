//! Error types for engine operations

use thiserror::Error;

/// Errors that can occur while loading or computing a case analysis
///
/// Missing or malformed case data is never an error: it is clamped, dropped,
/// or replaced by defaults. Only the situations below surface.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A newer request superseded this computation
    #[error("Computation cancelled")]
    Cancelled,

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The data-access collaborator failed
    #[error("Store error: {0}")]
    Store(String),

    /// Background task failure (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}
