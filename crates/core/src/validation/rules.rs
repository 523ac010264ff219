//! Validation rule types.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Whether a rule violation fails the entity or is informational.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    #[default]
    Error,
    Warning,
}

/// JSON value kinds a `type` constraint can require.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

/// What a rule checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Field must be present, non-null and not an empty string.
    Required,
    /// Field, when present, must be of the given JSON type.
    Type { expected: JsonType },
    /// String (in chars) or array length bounds.
    Length {
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
    },
    /// Numeric bounds, inclusive.
    Range {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    OneOf { values: Vec<serde_json::Value> },
    /// String must match the regular expression.
    Pattern { pattern: String },
}

impl Constraint {
    /// Stable code reported on violations.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Type { .. } => "type",
            Self::Length { .. } => "length",
            Self::Range { .. } => "range",
            Self::OneOf { .. } => "one_of",
            Self::Pattern { .. } => "pattern",
        }
    }
}

/// A validation rule as configured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationRule {
    /// Entity type (request model) the rule applies to.
    pub entity_type: String,
    pub field: String,
    pub constraint: Constraint,
    pub message: String,
    #[serde(default)]
    pub severity: ValidationSeverity,
}

/// A rule with its pattern, if any, compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: ValidationRule,
    pub(crate) pattern: Option<Regex>,
}

/// The full set of configured rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compile `rules`, rejecting invalid regular expressions.
    pub fn new(rules: Vec<ValidationRule>) -> Result<Self, CoreError> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            let pattern = match &rule.constraint {
                Constraint::Pattern { pattern } => Some(Regex::new(pattern).map_err(|e| {
                    CoreError::Validation(format!(
                        "Invalid pattern for {}.{}: {e}",
                        rule.entity_type, rule.field
                    ))
                })?),
                _ => None,
            };
            compiled.push(CompiledRule { rule, pattern });
        }
        Ok(Self { rules: compiled })
    }

    /// Parse and compile a JSON array of rules.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let rules: Vec<ValidationRule> = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid rule set: {e}")))?;
        Self::new(rules)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules that apply to `entity_type`, in configuration order.
    pub fn for_entity_type<'a>(
        &'a self,
        entity_type: &'a str,
    ) -> impl Iterator<Item = &'a CompiledRule> + 'a {
        self.rules
            .iter()
            .filter(move |compiled| compiled.rule.entity_type == entity_type)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_tagged_constraints() {
        let set = RuleSet::from_json(
            r#"[
                {"entity_type": "product", "field": "name",
                 "constraint": {"kind": "required"}, "message": "name is required"},
                {"entity_type": "product", "field": "name",
                 "constraint": {"kind": "length", "max": 20}, "message": "too long",
                 "severity": "warning"},
                {"entity_type": "order", "field": "sku",
                 "constraint": {"kind": "pattern", "pattern": "^[A-Z]{3}-\\d+$"},
                 "message": "bad sku"}
            ]"#,
        )
        .unwrap();

        assert_eq!(set.len(), 3);
        let product: Vec<&CompiledRule> = set.for_entity_type("product").collect();
        assert_eq!(product.len(), 2);
        assert_eq!(product[0].rule.severity, ValidationSeverity::Error);
        assert_eq!(product[1].rule.severity, ValidationSeverity::Warning);
        assert_eq!(
            product[1].rule.constraint,
            Constraint::Length {
                min: None,
                max: Some(20)
            }
        );
        assert!(set.for_entity_type("order").next().unwrap().pattern.is_some());
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let rule = ValidationRule {
            entity_type: "product".to_string(),
            field: "sku".to_string(),
            constraint: Constraint::Pattern {
                pattern: "([".to_string(),
            },
            message: "bad".to_string(),
            severity: ValidationSeverity::Error,
        };
        assert_matches!(RuleSet::new(vec![rule]), Err(CoreError::Validation(msg)) if msg.contains("product.sku"));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert_matches!(RuleSet::from_json("{}"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn constraint_codes_are_stable() {
        assert_eq!(Constraint::Required.code(), "required");
        assert_eq!(Constraint::OneOf { values: vec![] }.code(), "one_of");
    }
}
