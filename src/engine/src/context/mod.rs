//! Evaluation context construction
//!
//! Turns a read-only [`TranslationInput`] snapshot into the flat variable map
//! consumed by the expression evaluator.
//!
//! # Example
//!
//! ```rust
//! use fedpolicy_engine::context::{ContextBuilder, ContextKey, TranslationInput};
//! use fedpolicy_core::{Attribute, GroupPath};
//!
//! let input = TranslationInput::new("oidc", "client-1")
//!     .with_attribute(Attribute::string("role", GroupPath::root(), ["admin", "user"]));
//!
//! let ctx = ContextBuilder::default().build(&input).unwrap();
//! assert_eq!(ctx.get(ContextKey::Attr.as_str()).unwrap()["role"], "admin");
//! assert_eq!(ctx.get(ContextKey::Idp.as_str()).unwrap(), "_LOCAL");
//! ```

pub mod builder;
pub mod converter;
pub mod input;

pub use builder::{ContextBuilder, ContextKey, DEFAULT_UPSTREAM_PROTOCOL, LOCAL_IDP};
pub use converter::{AttributeValueConverter, SyntaxValueConverter};
pub use input::{AuthenticationContext, TranslationInput};
