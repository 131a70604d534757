//! Compiled regex cache for filter actions

use dashmap::DashMap;
use regex::Regex;
use std::sync::Arc;

/// Compile a pattern that must match the whole input
pub fn compile_full_match(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

/// Thread-safe cache of full-match patterns
#[derive(Debug, Default)]
pub struct PatternCache {
    patterns: DashMap<String, Arc<Regex>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the compiled form of a pattern, compiling it on first use
    pub fn get(&self, pattern: &str) -> Result<Arc<Regex>, regex::Error> {
        if let Some(regex) = self.patterns.get(pattern) {
            return Ok(regex.clone());
        }

        let regex = Arc::new(compile_full_match(pattern)?);
        self.patterns.insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn clear(&self) {
        self.patterns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_match() {
        let regex = compile_full_match("mail").unwrap();
        assert!(regex.is_match("mail"));
        assert!(!regex.is_match("email"));

        let regex = compile_full_match("a|b").unwrap();
        assert!(regex.is_match("b"));
        assert!(!regex.is_match("ab"));
    }

    #[test]
    fn test_cache_reuses_compiled_patterns() {
        let cache = PatternCache::new();
        cache.get(".*").unwrap();
        cache.get(".*").unwrap();
        assert_eq!(cache.len(), 1);

        assert!(cache.get("(").is_err());
        assert_eq!(cache.len(), 1);
    }
}
