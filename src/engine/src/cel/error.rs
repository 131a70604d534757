//! Error types for CEL operations

use thiserror::Error;

/// CEL operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CelError {
    #[error("CEL compilation failed for '{expression}': {message}")]
    CompilationError { expression: String, message: String },

    #[error("CEL evaluation failed for '{expression}': {message}")]
    EvaluationError { expression: String, message: String },

    #[error("Expression did not return boolean result")]
    NonBooleanResult,
}

/// Result type for CEL operations
pub type Result<T> = std::result::Result<T, CelError>;
