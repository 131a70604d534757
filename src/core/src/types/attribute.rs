//! Attribute types
//!
//! Attribute values are kept in their internal string encoding. Turning them
//! into the form exposed to relying parties or expressions is the job of a
//! value converter in the engine crate.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::group::GroupPath;
use crate::error::{CoreError, Result};

/// Value syntax of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueSyntax {
    /// Plain string, internal and external forms are identical
    #[default]
    String,
    /// Email address with confirmation state, internally a JSON object
    VerifiableEmail,
    /// Signed 64-bit integer
    Integer,
    /// Floating point number
    FloatingPoint,
}

/// Structured value of a `verifiableEmail` attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiableEmail {
    /// The email address
    pub value: String,

    /// Whether the address was confirmed
    #[serde(default)]
    pub confirmed: bool,
}

impl VerifiableEmail {
    /// Create a new email value
    pub fn new(value: impl Into<String>, confirmed: bool) -> Self {
        Self {
            value: value.into(),
            confirmed,
        }
    }

    /// Internal encoding stored in `Attribute::values`
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(CoreError::from)
    }

    /// Parse the internal encoding
    pub fn decode(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(CoreError::from)
    }
}

/// Attribute held by an entity in a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    /// Attribute name (e.g., "email", "role")
    pub name: String,

    /// Group in which the attribute is held
    pub group_path: GroupPath,

    /// Syntax of the values
    #[serde(default)]
    pub value_syntax: ValueSyntax,

    /// Values in internal encoding
    #[serde(default)]
    pub values: Vec<String>,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(
        name: impl Into<String>,
        group_path: GroupPath,
        value_syntax: ValueSyntax,
        values: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            group_path,
            value_syntax,
            values,
        }
    }

    /// Create a string attribute
    pub fn string<I, V>(name: impl Into<String>, group_path: GroupPath, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(
            name,
            group_path,
            ValueSyntax::String,
            values.into_iter().map(Into::into).collect(),
        )
    }

    /// Create a single valued verifiable email attribute
    pub fn verifiable_email(
        name: impl Into<String>,
        group_path: GroupPath,
        email: impl Into<String>,
        confirmed: bool,
    ) -> Result<Self> {
        let encoded = VerifiableEmail::new(email, confirmed).encode()?;
        Ok(Self::new(name, group_path, ValueSyntax::VerifiableEmail, vec![encoded]))
    }

    /// Returns the first value, if any
    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(|v| v.as_str())
    }

    /// Checks if every required value is present among this attribute's values
    pub fn contains_all_values(&self, required: &[String]) -> bool {
        required.iter().all(|v| self.values.contains(v))
    }

    /// Appends values that are not already present
    ///
    /// Returns the number of values added.
    pub fn merge_values(&mut self, other: &[String]) -> usize {
        let mut added = 0;
        for value in other {
            if !self.values.contains(value) {
                self.values.push(value.clone());
                added += 1;
            }
        }
        added
    }

    /// Validate the attribute definition and its internal encoding
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::illegal_attribute_value("attribute name cannot be empty"));
        }

        for value in &self.values {
            let valid = match self.value_syntax {
                ValueSyntax::String => true,
                ValueSyntax::VerifiableEmail => VerifiableEmail::decode(value).is_ok(),
                ValueSyntax::Integer => value.parse::<i64>().is_ok(),
                ValueSyntax::FloatingPoint => value.parse::<f64>().is_ok(),
            };
            if !valid {
                return Err(CoreError::illegal_attribute_value(format!(
                    "value '{}' of attribute '{}' is not a valid {:?}",
                    value, self.name, self.value_syntax
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}: [{}]", self.name, self.group_path, self.values.join(", "))
    }
}
