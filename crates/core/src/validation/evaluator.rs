//! Rule evaluator -- pure logic, no I/O.

use serde_json::{Map, Value};

use super::rules::{CompiledRule, Constraint, JsonType, RuleSet, ValidationSeverity};
use crate::violation::Violation;

/// Result of checking one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordCheck {
    pub errors: Vec<Violation>,
    pub warnings: Vec<Violation>,
}

impl RecordCheck {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Evaluate the rules for `entity_type` against one record identified by `key`.
pub fn evaluate_record(
    rules: &RuleSet,
    entity_type: &str,
    key: &str,
    record: &Map<String, Value>,
) -> RecordCheck {
    let mut check = RecordCheck::default();

    for compiled in rules.for_entity_type(entity_type) {
        let value = record.get(&compiled.rule.field);
        if passes(compiled, value) {
            continue;
        }
        let mut violation =
            Violation::for_entity(key, compiled.rule.field.clone(), compiled.rule.message.clone())
                .with_code(compiled.rule.constraint.code());
        if let Some(value) = value {
            violation = violation.with_invalid_value(value.clone());
        }
        match compiled.rule.severity {
            ValidationSeverity::Error => check.errors.push(violation),
            ValidationSeverity::Warning => check.warnings.push(violation),
        }
    }

    check
}

fn passes(compiled: &CompiledRule, value: Option<&Value>) -> bool {
    match &compiled.rule.constraint {
        Constraint::Required => match value {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        },
        // Everything below only constrains values that are present.
        Constraint::Type { expected } => present(value).map_or(true, |v| is_type(v, *expected)),
        Constraint::Length { min, max } => {
            let len = match present(value) {
                Some(Value::String(s)) => s.chars().count(),
                Some(Value::Array(items)) => items.len(),
                _ => return true,
            };
            min.map_or(true, |min| len >= min) && max.map_or(true, |max| len <= max)
        }
        Constraint::Range { min, max } => match present(value).and_then(Value::as_f64) {
            Some(n) => min.map_or(true, |min| n >= min) && max.map_or(true, |max| n <= max),
            None => true,
        },
        Constraint::OneOf { values } => present(value).map_or(true, |v| values.contains(v)),
        Constraint::Pattern { .. } => match (present(value).and_then(Value::as_str), &compiled.pattern) {
            (Some(s), Some(re)) => re.is_match(s),
            _ => true,
        },
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn is_type(value: &Value, expected: JsonType) -> bool {
    match expected {
        JsonType::String => value.is_string(),
        JsonType::Number => value.is_number(),
        JsonType::Integer => value.is_i64() || value.is_u64(),
        JsonType::Boolean => value.is_boolean(),
        JsonType::Array => value.is_array(),
        JsonType::Object => value.is_object(),
    }
}
