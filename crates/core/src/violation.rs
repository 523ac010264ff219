//! Raw validation violations, as produced by the validation engine.

use serde::{Deserialize, Serialize};

use crate::transaction::Message;
use crate::types::EntityKey;

/// A single violation.
///
/// `entity` is the primary key of the entity the violation belongs to, or
/// `None` for violations that concern the submission as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub entity: Option<EntityKey>,
    pub property_path: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_value: Option<serde_json::Value>,
}

impl Violation {
    /// A violation attributed to one entity.
    pub fn for_entity(
        entity: impl Into<EntityKey>,
        property_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            entity: Some(entity.into()),
            property_path: property_path.into(),
            message: message.into(),
            code: None,
            invalid_value: None,
        }
    }

    /// A violation of the submission as a whole.
    pub fn global(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entity: None,
            property_path: property_path.into(),
            message: message.into(),
            code: None,
            invalid_value: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_invalid_value(mut self, value: serde_json::Value) -> Self {
        self.invalid_value = Some(value);
        self
    }

    /// Render the violation as a transaction error message.
    pub fn to_message(&self) -> Message {
        let mut message = Message::new(self.message.clone());
        if !self.property_path.is_empty() {
            message = message.with_property_path(self.property_path.clone());
        }
        if let Some(code) = &self.code {
            message = message.with_code(code.clone());
        }
        if let Some(value) = &self.invalid_value {
            message = message.with_context(serde_json::json!({ "invalid_value": value }));
        }
        message
    }
}

/// Ordered list of violations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViolationList(Vec<Violation>);

impl ViolationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.0.extend(violations);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }
}

impl From<Vec<Violation>> for ViolationList {
    fn from(violations: Vec<Violation>) -> Self {
        Self(violations)
    }
}

impl FromIterator<Violation> for ViolationList {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ViolationList {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
