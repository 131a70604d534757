//! Attribute value conversion
//!
//! Attribute values travel in their internal string encoding. Expressions
//! see two other forms: the external string form (`attr`, `attrs`) and the
//! object form (`attrObj`).

use fedpolicy_core::{Attribute, CoreError, Result, ValueSyntax, VerifiableEmail};
use serde_json::{json, Value};

/// Converts internal attribute values to the forms exposed to expressions
pub trait AttributeValueConverter: Send + Sync {
    /// External string representation of every value
    fn to_external(&self, attribute: &Attribute) -> Result<Vec<String>>;

    /// Object representation of every value
    fn to_objects(&self, attribute: &Attribute) -> Result<Vec<Value>>;
}

/// Converter driven by the attribute's value syntax
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxValueConverter;

impl SyntaxValueConverter {
    pub fn new() -> Self {
        Self
    }
}

impl AttributeValueConverter for SyntaxValueConverter {
    fn to_external(&self, attribute: &Attribute) -> Result<Vec<String>> {
        attribute
            .values
            .iter()
            .map(|raw| match attribute.value_syntax {
                ValueSyntax::String => Ok(raw.clone()),
                ValueSyntax::VerifiableEmail => Ok(decode_email(attribute, raw)?.value),
                ValueSyntax::Integer => Ok(parse_integer(attribute, raw)?.to_string()),
                ValueSyntax::FloatingPoint => Ok(parse_float(attribute, raw)?.to_string()),
            })
            .collect()
    }

    fn to_objects(&self, attribute: &Attribute) -> Result<Vec<Value>> {
        attribute
            .values
            .iter()
            .map(|raw| match attribute.value_syntax {
                ValueSyntax::String => Ok(Value::String(raw.clone())),
                ValueSyntax::VerifiableEmail => {
                    let email = decode_email(attribute, raw)?;
                    Ok(json!({ "value": email.value, "confirmed": email.confirmed }))
                }
                ValueSyntax::Integer => Ok(json!(parse_integer(attribute, raw)?)),
                ValueSyntax::FloatingPoint => {
                    let f = parse_float(attribute, raw)?;
                    serde_json::Number::from_f64(f)
                        .map(Value::Number)
                        .ok_or_else(|| CoreError::value_conversion(&attribute.name, "non-finite number"))
                }
            })
            .collect()
    }
}

fn decode_email(attribute: &Attribute, raw: &str) -> Result<VerifiableEmail> {
    VerifiableEmail::decode(raw).map_err(|e| CoreError::value_conversion(&attribute.name, e.to_string()))
}

fn parse_integer(attribute: &Attribute, raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| CoreError::value_conversion(&attribute.name, format!("'{}' is not an integer", raw)))
}

fn parse_float(attribute: &Attribute, raw: &str) -> Result<f64> {
    raw.trim()
        .parse()
        .map_err(|_| CoreError::value_conversion(&attribute.name, format!("'{}' is not a number", raw)))
}
