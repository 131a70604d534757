//! Profile lookup

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::profile::TranslationProfile;
use crate::error::Result;

/// Source of translation profiles, looked up by name at inclusion time
///
/// Implementations must give a consistent view for the duration of one
/// translation.
pub trait ProfileRepository: Send + Sync {
    /// Profile by name
    fn get(&self, name: &str) -> Option<Arc<TranslationProfile>>;

    /// Names of all profiles
    fn list(&self) -> Vec<String>;
}

/// Immutable in-memory profile snapshot
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileRepository {
    profiles: HashMap<String, Arc<TranslationProfile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository, validating every profile
    ///
    /// A later profile replaces an earlier one with the same name.
    pub fn with_profiles(profiles: impl IntoIterator<Item = TranslationProfile>) -> Result<Self> {
        let mut map = HashMap::new();
        for profile in profiles {
            profile.validate()?;
            map.insert(profile.name.clone(), Arc::new(profile));
        }
        Ok(Self { profiles: map })
    }

    /// Load a JSON array of profiles
    pub fn from_json(json: &str) -> Result<Self> {
        let profiles: Vec<TranslationProfile> = serde_json::from_str(json)?;
        Self::with_profiles(profiles)
    }

    /// Load a JSON array of profiles from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let repository = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!("Loaded {} translation profiles from {}", repository.len(), path.display());
        Ok(repository)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileRepository for InMemoryProfileRepository {
    fn get(&self, name: &str) -> Option<Arc<TranslationProfile>> {
        self.profiles.get(name).cloned()
    }

    fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        names.sort();
        names
    }
}
