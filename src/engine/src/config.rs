//! Engine configuration
//!
//! Environment variables:
//! - `FEDPOLICY_MAX_INCLUSION_DEPTH` - deepest profile inclusion chain (default: 32)
//! - `FEDPOLICY_SEED_RESULT` - seed results with the entity's data (default: true)
//! - `FEDPOLICY_CACHE_EXPRESSIONS` - cache compiled CEL programs (default: true)

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Translation engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Maximum length of a profile inclusion chain, the top-level profile included
    pub max_inclusion_depth: usize,

    /// Start every top-level evaluation with the entity's attributes and identities
    pub seed_result_with_input: bool,

    /// Keep compiled expressions in the evaluator cache
    pub cache_compiled_expressions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_inclusion_depth: 32,
            seed_result_with_input: true,
            cache_compiled_expressions: true,
        }
    }
}

impl EngineConfig {
    /// Build a configuration from `FEDPOLICY_*` environment variables
    ///
    /// Unset variables keep their defaults. Unparsable values are logged and
    /// ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            max_inclusion_depth: parse_var(
                &lookup,
                "FEDPOLICY_MAX_INCLUSION_DEPTH",
                defaults.max_inclusion_depth,
            ),
            seed_result_with_input: parse_var(
                &lookup,
                "FEDPOLICY_SEED_RESULT",
                defaults.seed_result_with_input,
            ),
            cache_compiled_expressions: parse_var(
                &lookup,
                "FEDPOLICY_CACHE_EXPRESSIONS",
                defaults.cache_compiled_expressions,
            ),
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid value '{}' for {}", raw, key);
            default
        }),
        None => default,
    }
}
