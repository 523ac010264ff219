//! JSON-backed entity submitted to the create endpoint.

use restx_core::{CrudEntity, Transaction};
use serde_json::{Map, Value};

/// Field under which an item's own transaction is rendered.
const TRANSACTION_FIELD: &str = "transaction";

/// One submitted item.
///
/// Objects carry a primary key and take part in reconciliation. Any other
/// JSON value found inside a collection is kept as-is and skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    key: Option<String>,
    body: Value,
    transaction: Option<Transaction>,
}

/// How a record's primary key was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Read from the submitted primary-key field.
    Submitted,
    /// Missing from the submission; generated and written into the body.
    Generated,
    /// Present but an empty string; a key was generated for error
    /// attribution only.
    Empty,
    /// Present but not a string or number; a key was generated for error
    /// attribution only.
    Invalid,
}

impl Record {
    /// Build a record from a submitted object, reading its key from
    /// `key_field` or generating one with `generate`.
    pub fn from_object(
        mut fields: Map<String, Value>,
        key_field: &str,
        generate: impl FnOnce() -> String,
    ) -> (Self, KeySource) {
        let (key, source) = match fields.get(key_field) {
            Some(Value::String(s)) if s.is_empty() => (generate(), KeySource::Empty),
            Some(Value::String(s)) => (s.clone(), KeySource::Submitted),
            Some(Value::Number(n)) => (n.to_string(), KeySource::Submitted),
            None | Some(Value::Null) => {
                let key = generate();
                fields.insert(key_field.to_string(), Value::String(key.clone()));
                (key, KeySource::Generated)
            }
            Some(_) => (generate(), KeySource::Invalid),
        };
        let record = Self {
            key: Some(key),
            body: Value::Object(fields),
            transaction: None,
        };
        (record, source)
    }

    /// A non-object collection item.
    pub fn opaque(body: Value) -> Self {
        Self {
            key: None,
            body,
            transaction: None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Render the record, with its transaction when associations are shown.
    pub fn render(&self, show_associations: bool) -> Result<Value, serde_json::Error> {
        match (&self.body, &self.transaction) {
            (Value::Object(fields), Some(transaction)) if show_associations => {
                let mut fields = fields.clone();
                fields.insert(
                    TRANSACTION_FIELD.to_string(),
                    serde_json::to_value(transaction)?,
                );
                Ok(Value::Object(fields))
            }
            _ => Ok(self.body.clone()),
        }
    }
}

impl CrudEntity for Record {
    fn primary_key(&self) -> &str {
        self.key.as_deref().unwrap_or_default()
    }

    fn ids(&self) -> Vec<String> {
        self.key.iter().cloned().collect()
    }

    fn transaction(&self) -> Option<&Transaction> {
        self.transaction.as_ref()
    }

    fn set_transaction(&mut self, transaction: Transaction) {
        self.transaction = Some(transaction);
    }

    fn supports_transactions(&self) -> bool {
        self.key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use restx_core::RequestMethod;
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn submitted_key_is_used() {
        let (record, source) =
            Record::from_object(object(json!({"id": "p-1", "name": "Lamp"})), "id", || {
                unreachable!()
            });
        assert_eq!(source, KeySource::Submitted);
        assert_eq!(record.key(), Some("p-1"));
        assert_eq!(record.ids(), vec!["p-1".to_string()]);
        assert!(record.supports_transactions());
    }

    #[test]
    fn numeric_key_is_stringified() {
        let (record, _) = Record::from_object(object(json!({"id": 42})), "id", || unreachable!());
        assert_eq!(record.primary_key(), "42");
    }

    #[test]
    fn missing_key_is_generated_into_the_body() {
        let (record, source) =
            Record::from_object(object(json!({"name": "Lamp"})), "id", || "gen-1".to_string());
        assert_eq!(source, KeySource::Generated);
        assert_eq!(record.body()["id"], "gen-1");
    }

    #[test]
    fn invalid_key_keeps_the_body() {
        let (record, source) =
            Record::from_object(object(json!({"id": [1]})), "id", || "gen-1".to_string());
        assert_eq!(source, KeySource::Invalid);
        assert_eq!(record.primary_key(), "gen-1");
        assert_eq!(record.body()["id"], json!([1]));
    }

    #[test]
    fn empty_string_key_is_reported_separately() {
        let (record, source) =
            Record::from_object(object(json!({"id": ""})), "id", || "gen-1".to_string());
        assert_eq!(source, KeySource::Empty);
        assert_eq!(record.primary_key(), "gen-1");
        assert_eq!(record.body()["id"], "");
    }

    #[test]
    fn opaque_items_skip_transactions() {
        let record = Record::opaque(json!(7));
        assert!(!record.supports_transactions());
        assert!(record.ids().is_empty());
    }

    #[test]
    fn render_includes_transaction_only_when_shown() {
        let (mut record, _) =
            Record::from_object(object(json!({"id": "p-1"})), "id", || unreachable!());
        record.set_transaction(Transaction::new("tx-1", "product", RequestMethod::Post, "r"));

        let hidden = record.render(false).unwrap();
        assert!(hidden.get("transaction").is_none());

        let shown = record.render(true).unwrap();
        assert_eq!(shown["transaction"]["id"], "tx-1");
        assert_eq!(shown["id"], "p-1");
    }
}
