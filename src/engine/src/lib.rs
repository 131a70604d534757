//! # Fedpolicy Engine
//!
//! Attribute and identity translation for identity federation.
//!
//! ## Features
//!
//! - **Translation profiles**: ordered rules of CEL conditions and actions,
//!   with profile inclusion, execution breaks and cycle detection
//! - **Context building** from a read-only snapshot of the entity
//! - **Attribute statements**: six directional statement variants that grant
//!   or copy attributes along the group tree, with conflict resolution
//! - **Pluggable expression evaluation** through [`ExpressionEvaluator`]
//!
//! ## Example
//!
//! ```rust
//! use fedpolicy_engine::{TranslationEngine, TranslationInput, TranslationProfile, TranslationRule};
//! use fedpolicy_engine::translation::ActionKind;
//! use fedpolicy_core::{Attribute, GroupPath, Identity};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = TranslationEngine::builder().build();
//!
//! let profile = TranslationProfile::new("release", vec![
//!     TranslationRule::new("protocol == 'saml'", ActionKind::create_attribute("org", "'ACME'")),
//! ]);
//!
//! let input = TranslationInput::new("saml", "sp.example.com")
//!     .with_identity(Identity::new("userName", "alice"))
//!     .with_attribute(Attribute::string("email", GroupPath::root(), ["alice@example.com"]));
//!
//! let result = engine.translate(&profile, &input)?;
//! assert!(result.attribute("org").is_some());
//! assert!(result.attribute("email").is_some());
//! # Ok(())
//! # }
//! ```

pub mod cel;  // CEL expression engine
pub mod config;
pub mod context;
pub mod error;
pub mod statements;
pub mod translation;

// Re-export commonly used types
pub use cel::{EvalContext, ExpressionEvaluator};
pub use config::EngineConfig;
pub use context::{AttributeValueConverter, ContextBuilder, SyntaxValueConverter, TranslationInput};
pub use error::{EngineError, Result};
pub use statements::{
    AttributeIndex, AttributeStatement, ConflictResolution, Direction, EffectiveAttribute,
    EffectiveAttributesResolver, GroupStatements, StatementProcessor,
};
pub use translation::{
    InMemoryProfileRepository, ProfileMode, ProfileRepository, TranslationEngine,
    TranslationProfile, TranslationResult, TranslationRule,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
