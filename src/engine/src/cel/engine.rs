//! CEL expression engine with compiled program caching

use cel_interpreter::objects::Value as CelValue;
use cel_interpreter::{Context, Program};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

use crate::cel::{
    context::EvalContext,
    convert::{cel_to_json, json_to_cel},
    error::{CelError, Result},
    evaluator::ExpressionEvaluator,
};

/// Expression used when a condition is left empty
const ALWAYS_TRUE: &str = "true";

/// CEL engine for compiling and evaluating expressions
pub struct Engine {
    /// Compiled program cache (thread-safe)
    program_cache: Arc<DashMap<String, Arc<Program>>>,

    /// Whether compiled programs are kept
    caching: bool,
}

impl Engine {
    /// Create a new CEL engine with program caching
    pub fn new() -> Self {
        Self::with_caching(true)
    }

    /// Create a CEL engine, optionally without the program cache
    pub fn with_caching(caching: bool) -> Self {
        Self {
            program_cache: Arc::new(DashMap::new()),
            caching,
        }
    }

    /// Compile a CEL expression and cache the result
    ///
    /// An empty expression compiles to `true`.
    ///
    /// # Errors
    /// Returns error if expression cannot be compiled
    pub fn compile(&self, expr: &str) -> Result<Arc<Program>> {
        let expr = normalize(expr);

        if let Some(prog) = self.program_cache.get(expr) {
            return Ok(prog.clone());
        }

        let program = Program::compile(expr).map_err(|e| CelError::CompilationError {
            expression: expr.to_string(),
            message: format!("{:?}", e),
        })?;

        let arc_program = Arc::new(program);
        if self.caching {
            self.program_cache.insert(expr.to_string(), arc_program.clone());
        }

        Ok(arc_program)
    }

    /// Execute a compiled program with the given context
    ///
    /// # Errors
    /// Returns error if evaluation fails
    pub fn execute(&self, expr: &str, program: &Program, ctx: &EvalContext) -> Result<CelValue> {
        let mut cel_context = Context::default();

        for (key, value) in ctx.variables() {
            cel_context.add_variable_from_value(key.clone(), json_to_cel(value));
        }

        let result = program
            .execute(&cel_context)
            .map_err(|e| CelError::EvaluationError {
                expression: expr.to_string(),
                message: format!("{:?}", e),
            })?;

        trace!(expression = expr, result = ?result, "Evaluated expression");
        Ok(result)
    }

    /// Compile and evaluate a boolean expression in one call
    pub fn evaluate_expression(&self, expr: &str, ctx: &EvalContext) -> Result<bool> {
        let program = self.compile(expr)?;
        let result = self.execute(expr, &program, ctx)?;
        Self::to_bool(&result)
    }

    /// Compile and evaluate a value-producing expression in one call
    pub fn evaluate_to_json(&self, expr: &str, ctx: &EvalContext) -> Result<Value> {
        let program = self.compile(expr)?;
        let result = self.execute(expr, &program, ctx)?;
        Ok(cel_to_json(&result))
    }

    /// Clear the compiled program cache
    pub fn clear_cache(&self) {
        self.program_cache.clear();
    }

    /// Get cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            size: self.program_cache.len(),
        }
    }

    /// Convert CEL result to boolean
    fn to_bool(value: &CelValue) -> Result<bool> {
        match value {
            CelValue::Bool(b) => Ok(*b),
            _ => Err(CelError::NonBooleanResult),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionEvaluator for Engine {
    fn evaluate_condition(&self, expression: &str, ctx: &EvalContext) -> Result<bool> {
        self.evaluate_expression(expression, ctx)
    }

    fn evaluate_value(&self, expression: &str, ctx: &EvalContext) -> Result<Value> {
        self.evaluate_to_json(expression, ctx)
    }
}

fn normalize(expr: &str) -> &str {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        ALWAYS_TRUE
    } else {
        trimmed
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cached programs
    pub size: usize,
}
