//! Translation actions
//!
//! Actions are a closed set. Each one either mutates the result accumulator
//! or signals the profile evaluator (inclusion, break).

use fedpolicy_core::{Attribute, GroupPath, Identity};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

use super::pattern::{compile_full_match, PatternCache};
use super::result::{DynamicAttribute, TranslationResult};
use crate::cel::{EvalContext, ExpressionEvaluator};
use crate::context::{AttributeValueConverter, TranslationInput};
use crate::error::{EngineError, Result};

/// What the profile evaluator does after a rule ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSignal {
    /// Go on with the next rule
    Continue,
    /// Stop the current profile
    Break,
    /// Evaluate the named profile against the same result, then go on
    Include(String),
}

/// Everything an action may read while it runs
pub struct ActionContext<'a> {
    /// Name of the profile being evaluated
    pub profile: &'a str,
    /// 1-based index of the rule within the profile
    pub rule: usize,
    pub input: &'a TranslationInput,
    pub context: &'a EvalContext,
    pub evaluator: &'a dyn ExpressionEvaluator,
    pub converter: &'a dyn AttributeValueConverter,
    pub patterns: &'a PatternCache,
}

impl ActionContext<'_> {
    fn config_error(&self, message: impl Into<String>) -> EngineError {
        EngineError::rule_config(self.profile, self.rule, message)
    }

    fn pattern(&self, pattern: &str) -> Result<std::sync::Arc<regex::Regex>> {
        self.patterns
            .get(pattern)
            .map_err(|e| self.config_error(format!("invalid pattern '{}': {}", pattern, e)))
    }

    fn evaluate(&self, expression: &str) -> Result<Value> {
        Ok(self.evaluator.evaluate_value(expression, self.context)?)
    }
}

/// Translation action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ActionKind {
    /// Expose an attribute computed by an expression
    #[serde(rename_all = "camelCase")]
    CreateAttribute {
        name: String,
        expression: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    /// Expose an attribute in a group and mark it for persistence
    #[serde(rename_all = "camelCase")]
    CreatePersistentAttribute {
        name: String,
        expression: String,
        group: GroupPath,
    },

    /// Remove attributes whose name matches
    #[serde(rename_all = "camelCase")]
    FilterAttribute { pattern: String },

    /// Remove matching values of one attribute
    #[serde(rename_all = "camelCase")]
    FilterAttributeValues { attribute: String, pattern: String },

    /// Expose identities computed by an expression
    #[serde(rename_all = "camelCase")]
    CreateIdentity {
        identity_type: String,
        expression: String,
    },

    /// Expose identities and mark them for persistence
    #[serde(rename_all = "camelCase")]
    CreatePersistentIdentity {
        identity_type: String,
        expression: String,
    },

    /// Remove identities whose value matches, optionally of one type only
    #[serde(rename_all = "camelCase")]
    FilterIdentity {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        identity_type: Option<String>,
        pattern: String,
    },

    /// Evaluate another profile
    #[serde(rename_all = "camelCase")]
    IncludeProfile { profile: String },

    /// Stop evaluating the current profile
    ExecutionBreak,
}

impl ActionKind {
    pub fn create_attribute(name: impl Into<String>, expression: impl Into<String>) -> Self {
        ActionKind::CreateAttribute {
            name: name.into(),
            expression: expression.into(),
            display_name: None,
            description: None,
        }
    }

    pub fn create_persistent_attribute(
        name: impl Into<String>,
        expression: impl Into<String>,
        group: GroupPath,
    ) -> Self {
        ActionKind::CreatePersistentAttribute {
            name: name.into(),
            expression: expression.into(),
            group,
        }
    }

    pub fn filter_attribute(pattern: impl Into<String>) -> Self {
        ActionKind::FilterAttribute {
            pattern: pattern.into(),
        }
    }

    pub fn filter_attribute_values(attribute: impl Into<String>, pattern: impl Into<String>) -> Self {
        ActionKind::FilterAttributeValues {
            attribute: attribute.into(),
            pattern: pattern.into(),
        }
    }

    pub fn create_identity(identity_type: impl Into<String>, expression: impl Into<String>) -> Self {
        ActionKind::CreateIdentity {
            identity_type: identity_type.into(),
            expression: expression.into(),
        }
    }

    pub fn create_persistent_identity(
        identity_type: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        ActionKind::CreatePersistentIdentity {
            identity_type: identity_type.into(),
            expression: expression.into(),
        }
    }

    pub fn filter_identity(identity_type: Option<&str>, pattern: impl Into<String>) -> Self {
        ActionKind::FilterIdentity {
            identity_type: identity_type.map(str::to_string),
            pattern: pattern.into(),
        }
    }

    pub fn include_profile(profile: impl Into<String>) -> Self {
        ActionKind::IncludeProfile {
            profile: profile.into(),
        }
    }

    /// Action name as used in profile definitions
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::CreateAttribute { .. } => "createAttribute",
            ActionKind::CreatePersistentAttribute { .. } => "createPersistentAttribute",
            ActionKind::FilterAttribute { .. } => "filterAttribute",
            ActionKind::FilterAttributeValues { .. } => "filterAttributeValues",
            ActionKind::CreateIdentity { .. } => "createIdentity",
            ActionKind::CreatePersistentIdentity { .. } => "createPersistentIdentity",
            ActionKind::FilterIdentity { .. } => "filterIdentity",
            ActionKind::IncludeProfile { .. } => "includeProfile",
            ActionKind::ExecutionBreak => "executionBreak",
        }
    }

    /// Check the action's parameters
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.check_fields()?;
        match self {
            ActionKind::FilterAttribute { pattern }
            | ActionKind::FilterAttributeValues { pattern, .. }
            | ActionKind::FilterIdentity { pattern, .. } => check_pattern(pattern),
            _ => Ok(()),
        }
    }

    /// Required names and expressions, patterns excluded
    fn check_fields(&self) -> std::result::Result<(), String> {
        match self {
            ActionKind::CreateAttribute { name, expression, .. }
            | ActionKind::CreatePersistentAttribute { name, expression, .. } => {
                require("attribute name", name)?;
                require("expression", expression)
            }
            ActionKind::FilterAttribute { .. } => Ok(()),
            ActionKind::FilterAttributeValues { attribute, .. } => {
                require("attribute name", attribute)
            }
            ActionKind::CreateIdentity {
                identity_type,
                expression,
            }
            | ActionKind::CreatePersistentIdentity {
                identity_type,
                expression,
            } => {
                require("identity type", identity_type)?;
                require("expression", expression)
            }
            ActionKind::FilterIdentity { identity_type, .. } => match identity_type {
                Some(identity_type) => require("identity type", identity_type),
                None => Ok(()),
            },
            ActionKind::IncludeProfile { profile } => require("profile name", profile),
            ActionKind::ExecutionBreak => Ok(()),
        }
    }

    /// Run the action against the result accumulator
    pub fn invoke(&self, ctx: &ActionContext<'_>, result: &mut TranslationResult) -> Result<RuleSignal> {
        // Patterns are checked when they are compiled
        self.check_fields().map_err(|message| ctx.config_error(message))?;

        match self {
            ActionKind::CreateAttribute {
                name,
                expression,
                display_name,
                description,
            } => {
                if let Some(values) = expression_values(ctx.evaluate(expression)?) {
                    let attribute = Attribute::string(name.as_str(), GroupPath::root(), values);
                    debug!("Creating attribute {}", attribute);
                    let dynamic = DynamicAttribute::new(attribute)
                        .with_display_name(display_name.clone())
                        .with_description(description.clone());
                    result.put_attribute(dynamic, false);
                } else {
                    debug!("Expression of attribute {} produced no value, skipping", name);
                }
            }

            ActionKind::CreatePersistentAttribute {
                name,
                expression,
                group,
            } => {
                if let Some(values) = expression_values(ctx.evaluate(expression)?) {
                    let attribute = Attribute::string(name.as_str(), group.clone(), values);
                    debug!("Creating persistent attribute {}", attribute);
                    result.put_attribute(DynamicAttribute::new(attribute), true);
                } else {
                    debug!("Expression of attribute {} produced no value, skipping", name);
                }
            }

            ActionKind::FilterAttribute { pattern } => {
                let regex = ctx.pattern(pattern)?;
                let removed = result.remove_attributes(|name| regex.is_match(name));
                debug!("Filtered {} attributes matching '{}'", removed, pattern);
            }

            ActionKind::FilterAttributeValues { attribute, pattern } => {
                let regex = ctx.pattern(pattern)?;
                let external = match result.attribute(attribute) {
                    Some(existing) => ctx.converter.to_external(&existing.attribute)?,
                    None => return Ok(RuleSignal::Continue),
                };
                let removed = result.retain_attribute_values(attribute, |index, _| {
                    external.get(index).map_or(true, |v| !regex.is_match(v))
                });
                debug!("Filtered {} values of {} matching '{}'", removed, attribute, pattern);
            }

            ActionKind::CreateIdentity {
                identity_type,
                expression,
            } => create_identities(ctx, result, identity_type, expression, false)?,

            ActionKind::CreatePersistentIdentity {
                identity_type,
                expression,
            } => create_identities(ctx, result, identity_type, expression, true)?,

            ActionKind::FilterIdentity {
                identity_type,
                pattern,
            } => {
                let regex = ctx.pattern(pattern)?;
                let removed = result.remove_identities(|identity| {
                    identity_type
                        .as_deref()
                        .map_or(true, |t| t == identity.type_id)
                        && regex.is_match(&identity.value)
                });
                debug!("Filtered {} identities matching '{}'", removed, pattern);
            }

            ActionKind::IncludeProfile { profile } => {
                return Ok(RuleSignal::Include(profile.clone()));
            }

            ActionKind::ExecutionBreak => return Ok(RuleSignal::Break),
        }

        Ok(RuleSignal::Continue)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn create_identities(
    ctx: &ActionContext<'_>,
    result: &mut TranslationResult,
    identity_type: &str,
    expression: &str,
    persist: bool,
) -> Result<()> {
    let Some(values) = expression_values(ctx.evaluate(expression)?) else {
        debug!("Expression of {} identity produced no value, skipping", identity_type);
        return Ok(());
    };

    for value in values {
        let identity = Identity::new(identity_type, value);
        debug!("Creating identity {} (persist={})", identity, persist);
        result.add_identity(identity, persist);
    }
    Ok(())
}

/// String values of an expression result, `None` when the result is null
fn expression_values(value: Value) -> Option<Vec<String>> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter(|item| !item.is_null())
                .map(scalar_to_string)
                .collect(),
        ),
        other => Some(vec![scalar_to_string(other)]),
    }
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn require(what: &str, value: &str) -> std::result::Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", what))
    } else {
        Ok(())
    }
}

fn check_pattern(pattern: &str) -> std::result::Result<(), String> {
    compile_full_match(pattern)
        .map(|_| ())
        .map_err(|e| format!("invalid pattern '{}': {}", pattern, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serde_tagging() {
        let action: ActionKind = serde_json::from_value(json!({
            "action": "createAttribute",
            "name": "org",
            "expression": "'ACME'",
            "displayName": "Organization"
        }))
        .unwrap();

        assert_eq!(
            action,
            ActionKind::CreateAttribute {
                name: "org".into(),
                expression: "'ACME'".into(),
                display_name: Some("Organization".into()),
                description: None,
            }
        );

        let action: ActionKind = serde_json::from_value(json!({"action": "executionBreak"})).unwrap();
        assert_eq!(action, ActionKind::ExecutionBreak);

        let action: ActionKind = serde_json::from_value(json!({
            "action": "filterIdentity",
            "pattern": ".*"
        }))
        .unwrap();
        assert_eq!(action, ActionKind::filter_identity(None, ".*"));

        let json = serde_json::to_value(ActionKind::include_profile("common")).unwrap();
        assert_eq!(json, json!({"action": "includeProfile", "profile": "common"}));
    }

    #[test]
    fn test_validate() {
        assert!(ActionKind::create_attribute("a", "'x'").validate().is_ok());
        assert!(ActionKind::create_attribute("", "'x'").validate().is_err());
        assert!(ActionKind::create_identity("email", " ").validate().is_err());
        assert!(ActionKind::filter_attribute("(").validate().is_err());
        assert!(ActionKind::filter_attribute_values("a", "[").validate().is_err());
        assert!(ActionKind::filter_identity(Some(""), ".*").validate().is_err());
        assert!(ActionKind::include_profile("").validate().is_err());
        assert!(ActionKind::ExecutionBreak.validate().is_ok());
    }

    #[test]
    fn test_expression_values() {
        assert_eq!(expression_values(Value::Null), None);
        assert_eq!(expression_values(json!("a")), Some(vec!["a".to_string()]));
        assert_eq!(expression_values(json!(7)), Some(vec!["7".to_string()]));
        assert_eq!(expression_values(json!(true)), Some(vec!["true".to_string()]));
        assert_eq!(
            expression_values(json!(["a", null, 2])),
            Some(vec!["a".to_string(), "2".to_string()])
        );
        assert_eq!(expression_values(json!([])), Some(vec![]));
    }
}
