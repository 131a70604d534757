//! Translation rules

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::action::{ActionContext, ActionKind, RuleSignal};
use super::result::TranslationResult;
use crate::error::Result;

/// Condition paired with an action
///
/// Rules hold no per-call state and can be shared between concurrent
/// translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRule {
    /// Boolean expression, empty means always
    #[serde(default)]
    pub condition: String,

    pub action: ActionKind,
}

impl TranslationRule {
    pub fn new(condition: impl Into<String>, action: ActionKind) -> Self {
        Self {
            condition: condition.into(),
            action,
        }
    }

    /// Rule whose action always runs
    pub fn always(action: ActionKind) -> Self {
        Self::new("", action)
    }

    /// Evaluate the condition and, when it holds, run the action
    ///
    /// Errors from the condition or the action are returned unchanged.
    pub fn invoke(&self, ctx: &ActionContext<'_>, result: &mut TranslationResult) -> Result<RuleSignal> {
        if !ctx
            .evaluator
            .evaluate_condition(&self.condition, ctx.context)?
        {
            debug!("Condition not met: {}", self.condition);
            return Ok(RuleSignal::Continue);
        }

        debug!("Condition met, invoking {}", self.action);
        self.action.invoke(ctx, result)
    }
}
