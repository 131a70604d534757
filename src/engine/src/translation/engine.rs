//! Profile evaluation
//!
//! Rules run strictly in declaration order against one result accumulator.
//! Included profiles share the caller's input, context and accumulator, so a
//! chain of inclusions composes into a single result.

use std::sync::Arc;
use tracing::{debug, debug_span, info};

use super::action::{ActionContext, RuleSignal};
use super::pattern::PatternCache;
use super::profile::TranslationProfile;
use super::repository::{InMemoryProfileRepository, ProfileRepository};
use super::result::TranslationResult;
use crate::cel::{Engine as CelEngine, EvalContext, ExpressionEvaluator};
use crate::config::EngineConfig;
use crate::context::{AttributeValueConverter, ContextBuilder, SyntaxValueConverter, TranslationInput};
use crate::error::{EngineError, Result};

/// Translation engine
///
/// # Architecture
///
/// ```text
/// TranslationInput → ContextBuilder → EvalContext
///                                        ↓
/// TranslationProfile → rule → condition → action → TranslationResult
///                        ↑                   ↓
///                        └── includeProfile ─┘  (ProfileRepository)
/// ```
pub struct TranslationEngine {
    /// Condition and value expressions
    evaluator: Arc<dyn ExpressionEvaluator>,

    /// Profiles available for inclusion
    repository: Arc<dyn ProfileRepository>,

    /// Attribute value forms exposed to expressions and filters
    converter: Arc<dyn AttributeValueConverter>,

    context_builder: ContextBuilder,

    /// Compiled filter patterns
    patterns: PatternCache,

    config: EngineConfig,
}

impl TranslationEngine {
    pub fn builder() -> TranslationEngineBuilder {
        TranslationEngineBuilder::default()
    }

    /// Engine with default components over the given repository
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self::builder().repository(repository).build()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn repository(&self) -> &Arc<dyn ProfileRepository> {
        &self.repository
    }

    /// Evaluation context for an input
    pub fn build_context(&self, input: &TranslationInput) -> Result<EvalContext> {
        self.context_builder.build(input)
    }

    /// Evaluate a profile against an input
    ///
    /// The result starts from the entity's current attributes and identities
    /// unless seeding is disabled in the configuration. On error the partial
    /// result is dropped.
    pub fn translate(
        &self,
        profile: &TranslationProfile,
        input: &TranslationInput,
    ) -> Result<TranslationResult> {
        let mut result = if self.config.seed_result_with_input {
            TranslationResult::seeded(input)
        } else {
            TranslationResult::new()
        };
        self.translate_into(profile, input, &mut result)?;
        Ok(result)
    }

    /// Evaluate a profile from the repository
    pub fn translate_named(&self, name: &str, input: &TranslationInput) -> Result<TranslationResult> {
        let profile = self
            .repository
            .get(name)
            .ok_or_else(|| EngineError::profile_config(name, "translation profile does not exist"))?;
        self.translate(&profile, input)
    }

    /// Evaluate a profile on top of a caller-supplied partial result
    pub fn translate_into(
        &self,
        profile: &TranslationProfile,
        input: &TranslationInput,
        result: &mut TranslationResult,
    ) -> Result<()> {
        let context = self.build_context(input)?;
        let mut stack = Vec::new();
        self.evaluate(profile, input, &context, &mut stack, result)
    }

    fn evaluate(
        &self,
        profile: &TranslationProfile,
        input: &TranslationInput,
        context: &EvalContext,
        stack: &mut Vec<String>,
        result: &mut TranslationResult,
    ) -> Result<()> {
        profile.ensure_supported()?;

        if let Some(pos) = stack.iter().position(|name| name == &profile.name) {
            let mut cycle = stack[pos..].to_vec();
            cycle.push(profile.name.clone());
            return Err(EngineError::InclusionCycle(cycle));
        }

        if stack.len() >= self.config.max_inclusion_depth {
            return Err(EngineError::profile_config(
                &profile.name,
                format!(
                    "profile inclusion is nested deeper than {} levels",
                    self.config.max_inclusion_depth
                ),
            ));
        }

        let span = debug_span!("profile", name = %profile.name);
        let _enter = span.enter();
        stack.push(profile.name.clone());

        for (i, rule) in profile.rules.iter().enumerate() {
            let index = i + 1;
            let rule_span = debug_span!("rule", index);
            let _rule_enter = rule_span.enter();

            let action_ctx = ActionContext {
                profile: &profile.name,
                rule: index,
                input,
                context,
                evaluator: self.evaluator.as_ref(),
                converter: self.converter.as_ref(),
                patterns: &self.patterns,
            };

            match rule.invoke(&action_ctx, result)? {
                RuleSignal::Continue => {}
                RuleSignal::Break => {
                    debug!("Execution break, skipping the remaining rules of {}", profile.name);
                    break;
                }
                RuleSignal::Include(included) => {
                    let target = self.repository.get(&included).ok_or_else(|| {
                        EngineError::ProfileNotFound {
                            profile: profile.name.clone(),
                            rule: index,
                            included: included.clone(),
                        }
                    })?;
                    debug!("Including profile {}", included);
                    self.evaluate(&target, input, context, stack, result)?;
                }
            }
        }

        stack.pop();
        Ok(())
    }
}

/// Builder for [`TranslationEngine`]
#[derive(Default)]
pub struct TranslationEngineBuilder {
    evaluator: Option<Arc<dyn ExpressionEvaluator>>,
    repository: Option<Arc<dyn ProfileRepository>>,
    converter: Option<Arc<dyn AttributeValueConverter>>,
    config: EngineConfig,
}

impl TranslationEngineBuilder {
    /// Use a custom expression evaluator instead of CEL
    pub fn evaluator(mut self, evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn repository(mut self, repository: Arc<dyn ProfileRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn converter(mut self, converter: Arc<dyn AttributeValueConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> TranslationEngine {
        let config = self.config;
        let evaluator = self
            .evaluator
            .unwrap_or_else(|| Arc::new(CelEngine::with_caching(config.cache_compiled_expressions)));
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemoryProfileRepository::new()));
        let converter = self
            .converter
            .unwrap_or_else(|| Arc::new(SyntaxValueConverter::new()));

        info!(
            "TranslationEngine initialized with seed_result={}, max_inclusion_depth={}",
            config.seed_result_with_input, config.max_inclusion_depth
        );

        TranslationEngine {
            evaluator,
            repository,
            context_builder: ContextBuilder::new(converter.clone()),
            converter,
            patterns: PatternCache::new(),
            config,
        }
    }
}
