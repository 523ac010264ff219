use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Category a transaction message is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKey {
    Errors,
    Notices,
    Info,
}

/// A single message attached to a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            property_path: None,
            context: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_property_path(mut self, path: impl Into<String>) -> Self {
        self.property_path = Some(path.into());
        self
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }
}

/// Messages grouped by category.
pub type Messages = BTreeMap<MessageKey, Vec<Message>>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn messages_serialize_with_lowercase_keys() {
        let mut messages = Messages::new();
        messages.insert(
            MessageKey::Errors,
            vec![Message::new("too long")
                .with_code("length")
                .with_property_path("name")],
        );
        let value = serde_json::to_value(&messages).unwrap();
        assert_eq!(
            value,
            json!({"errors": [{"message": "too long", "code": "length", "property_path": "name"}]})
        );
    }
}
