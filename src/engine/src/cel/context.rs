//! Evaluation context for CEL expressions

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Flat mapping of variable names to values available during evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalContext {
    variables: HashMap<String, Value>,
}

impl EvalContext {
    /// Create an empty evaluation context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Builder form of [`EvalContext::insert`]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up a variable
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Whether a variable is defined
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the context has no variables
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// All variables for CEL evaluation
    pub fn variables(&self) -> &HashMap<String, Value> {
        &self.variables
    }
}
