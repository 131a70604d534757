//! CEL (Common Expression Language) expression engine for rule conditions
//!
//! The translation engine only depends on [`ExpressionEvaluator`]; the CEL
//! [`Engine`] is the default implementation, with compiled program caching.

pub mod engine;
pub mod context;
pub mod error;
pub mod convert;
pub mod evaluator;

pub use engine::{CacheStats, Engine};
pub use context::EvalContext;
pub use error::{CelError, Result};
pub use evaluator::ExpressionEvaluator;
