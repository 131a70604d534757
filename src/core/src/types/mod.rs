//! Shared types for the fedpolicy workspace

pub mod group;
pub mod identity;
pub mod attribute;

// Re-export commonly used types
pub use group::GroupPath;
pub use identity::{Identity, ImportStatus};
pub use attribute::{Attribute, ValueSyntax, VerifiableEmail};
