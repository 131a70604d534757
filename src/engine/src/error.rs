//! Error types for the translation engine

use fedpolicy_core::CoreError;
use thiserror::Error;

use crate::cel::CelError;

/// Translation engine errors
///
/// Configuration errors abort the evaluation that hit them and carry enough
/// context to find the offending profile and rule. Evaluation errors coming
/// from expressions or value conversion pass through unchanged.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid profile or action definition, located by profile and rule
    #[error("Configuration error in profile '{profile}'{}: {message}", rule_suffix(.rule))]
    Configuration {
        profile: String,
        /// 1-based rule index
        rule: Option<usize>,
        message: String,
    },

    /// Included profile does not exist
    #[error("The translation profile '{included}' included in profile '{profile}' (rule {rule}) does not exist")]
    ProfileNotFound {
        profile: String,
        rule: usize,
        included: String,
    },

    /// Profile inclusion chain returns to a profile already being evaluated
    #[error("Translation profile inclusion cycle: {}", .0.join(" -> "))]
    InclusionCycle(Vec<String>),

    /// Invalid attribute statement definition
    #[error("Invalid attribute statement: {0}")]
    InvalidStatement(String),

    /// Expression evaluation error
    #[error("Expression evaluation failed: {0}")]
    Evaluation(#[from] CelError),

    /// Value type error (group path, attribute values, conversion)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn rule_suffix(rule: &Option<usize>) -> String {
    match rule {
        Some(index) => format!(" (rule {})", index),
        None => String::new(),
    }
}

impl EngineError {
    /// Configuration error for a whole profile
    pub fn profile_config(profile: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Configuration {
            profile: profile.into(),
            rule: None,
            message: message.into(),
        }
    }

    /// Configuration error for one rule of a profile
    pub fn rule_config(profile: impl Into<String>, rule: usize, message: impl Into<String>) -> Self {
        EngineError::Configuration {
            profile: profile.into(),
            rule: Some(rule),
            message: message.into(),
        }
    }

    /// Whether this error comes from configuration rather than evaluation
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EngineError::Configuration { .. }
                | EngineError::ProfileNotFound { .. }
                | EngineError::InclusionCycle(_)
                | EngineError::InvalidStatement(_)
        )
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
