//! Translation profiles
//!
//! Profiles are ordered lists of rules; each rule pairs a condition with an
//! action that updates a [`TranslationResult`]. Profiles can include other
//! profiles by name, and an execution break stops the current profile.
//!
//! # Example
//!
//! ```rust
//! use fedpolicy_engine::translation::{
//!     ActionKind, InMemoryProfileRepository, TranslationEngine, TranslationProfile, TranslationRule,
//! };
//! use fedpolicy_engine::TranslationInput;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let common = TranslationProfile::new("common", vec![
//!     TranslationRule::always(ActionKind::filter_attribute("internal.*")),
//! ]);
//! let main = TranslationProfile::new("main", vec![
//!     TranslationRule::always(ActionKind::include_profile("common")),
//!     TranslationRule::always(ActionKind::create_attribute("org", "'ACME'")),
//! ]);
//!
//! let repository = InMemoryProfileRepository::with_profiles([common, main])?;
//! let engine = TranslationEngine::new(Arc::new(repository));
//!
//! let result = engine.translate_named("main", &TranslationInput::new("saml", "sp"))?;
//! assert_eq!(result.attribute("org").unwrap().attribute.values, vec!["ACME"]);
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod engine;
pub mod pattern;
pub mod profile;
pub mod repository;
pub mod result;
pub mod rule;


pub use action::{ActionContext, ActionKind, RuleSignal};
pub use engine::{TranslationEngine, TranslationEngineBuilder};
pub use pattern::PatternCache;
pub use profile::{ProfileMode, TranslationProfile};
pub use repository::{InMemoryProfileRepository, ProfileRepository};
pub use result::{DynamicAttribute, TranslationResult};
pub use rule::TranslationRule;
