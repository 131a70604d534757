//! # Fedpolicy Core
//!
//! Shared value types and error handling for the fedpolicy workspace.
//! Embedding systems build identities, attributes and group paths with these
//! types before handing a snapshot to the translation engine.

pub mod types;
pub mod error;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use types::{Attribute, GroupPath, Identity, ImportStatus, ValueSyntax, VerifiableEmail};
