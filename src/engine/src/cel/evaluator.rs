//! Expression evaluation seam
//!
//! Rules and actions never parse expressions themselves. They hand the
//! expression text and the evaluation context to an evaluator, which lets
//! tests substitute a trivial implementation.

use serde_json::Value;

use super::context::EvalContext;
use super::error::Result;

/// Evaluates conditions and value-producing expressions against a context
pub trait ExpressionEvaluator: Send + Sync {
    /// Evaluate a boolean condition
    fn evaluate_condition(&self, expression: &str, ctx: &EvalContext) -> Result<bool>;

    /// Evaluate an expression producing a value
    fn evaluate_value(&self, expression: &str, ctx: &EvalContext) -> Result<Value>;
}
