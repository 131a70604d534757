//! Unified error types for the shared value types
//!
//! Group paths and attribute values are validated when they are built, so
//! these errors usually surface while an embedding system assembles its input.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for the fedpolicy value types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Malformed group path
    #[error("Invalid group path '{path}': {reason}")]
    InvalidGroupPath { path: String, reason: String },

    /// Attribute definition or value is not acceptable
    #[error("Illegal attribute value: {0}")]
    IllegalAttributeValue(String),

    /// Internal value encoding could not be converted
    #[error("Value conversion failed for attribute '{attribute}': {reason}")]
    ValueConversion { attribute: String, reason: String },

    /// Serialization/Deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CoreError {
    /// Create an invalid group path error
    pub fn invalid_group_path<P: Into<String>, R: Into<String>>(path: P, reason: R) -> Self {
        CoreError::InvalidGroupPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an illegal attribute value error
    pub fn illegal_attribute_value<S: Into<String>>(msg: S) -> Self {
        CoreError::IllegalAttributeValue(msg.into())
    }

    /// Create a value conversion error
    pub fn value_conversion<A: Into<String>, R: Into<String>>(attribute: A, reason: R) -> Self {
        CoreError::ValueConversion {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        CoreError::Serialization(msg.into())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}
