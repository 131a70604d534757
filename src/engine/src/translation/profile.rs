//! Translation profiles

use serde::{Deserialize, Serialize};
use std::fmt;

use super::rule::TranslationRule;
use crate::error::{EngineError, Result};

/// How a profile may be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileMode {
    /// Regular profile
    #[default]
    Active,
    /// Managed outside the management layer; evaluates normally
    ReadOnly,
    /// Kept for reference only; cannot be evaluated
    Unsupported,
}

/// Named, ordered list of translation rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationProfile {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub mode: ProfileMode,

    #[serde(default)]
    pub rules: Vec<TranslationRule>,
}

impl TranslationProfile {
    /// Create an active profile
    pub fn new(name: impl Into<String>, rules: Vec<TranslationRule>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            mode: ProfileMode::Active,
            rules,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_mode(mut self, mode: ProfileMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check the profile name and every rule's action
    ///
    /// Rule indexes in errors are 1-based.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::profile_config(&self.name, "profile name cannot be empty"));
        }

        for (index, rule) in self.rules.iter().enumerate() {
            rule.action
                .validate()
                .map_err(|message| EngineError::rule_config(&self.name, index + 1, message))?;
        }

        Ok(())
    }

    /// Fail unless the profile can be evaluated
    pub fn ensure_supported(&self) -> Result<()> {
        if self.mode == ProfileMode::Unsupported {
            return Err(EngineError::profile_config(
                &self.name,
                "profile is in unsupported mode and cannot be evaluated",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for TranslationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} rules)", self.name, self.rules.len())
    }
}
