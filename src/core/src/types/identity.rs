//! Identity types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed identity of an entity (e.g. `userName:alice`, `x500Name:CN=Alice`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Identity type (userName, x500Name, email, identifier, ...)
    pub type_id: String,

    /// Comparable identity value
    pub value: String,
}

impl Identity {
    /// Create a new identity
    pub fn new(type_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_id, self.value)
    }
}

/// Whether an identity was imported from an external source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportStatus {
    /// The identity was imported
    Imported,
    /// The identity was not imported
    NotImported,
}

impl ImportStatus {
    /// Human readable form exposed to expressions
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Imported => "imported",
            ImportStatus::NotImported => "notImported",
        }
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_display() {
        let id = Identity::new("userName", "alice");
        assert_eq!(id.to_string(), "userName:alice");
    }

    #[test]
    fn test_identity_serde() {
        let id = Identity::new("email", "alice@example.com");
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json["typeId"], "email");
        assert_eq!(json["value"], "alice@example.com");
    }

    #[test]
    fn test_import_status_display() {
        assert_eq!(ImportStatus::Imported.to_string(), "imported");
        assert_eq!(ImportStatus::NotImported.to_string(), "notImported");
    }
}
