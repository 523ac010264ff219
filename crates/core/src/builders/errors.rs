use std::collections::HashMap;

use crate::transaction::{Message, MessageKey, Transaction};
use crate::types::EntityKey;
use crate::violation::ViolationList;

/// Splits violations into global errors and errors keyed by entity.
#[derive(Debug, Default)]
pub struct ErrorBuilder {
    global: Vec<Message>,
    by_entity: HashMap<EntityKey, Vec<Message>>,
}

impl ErrorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a raw violation list. `None` is treated as no violations.
    pub fn process_violations(&mut self, violations: Option<&ViolationList>) {
        let Some(violations) = violations else {
            return;
        };
        for violation in violations {
            let message = violation.to_message();
            match &violation.entity {
                Some(key) => self.add_entity_error(key.clone(), message),
                None => self.add_global_error(message),
            }
        }
    }

    pub fn add_global_error(&mut self, message: Message) {
        self.global.push(message);
    }

    pub fn add_entity_error(&mut self, key: impl Into<EntityKey>, message: Message) {
        self.by_entity.entry(key.into()).or_default().push(message);
    }

    /// Whether any global error was recorded. Entity errors do not count.
    pub fn has_errors(&self) -> bool {
        !self.global.is_empty()
    }

    /// Errors recorded for one entity; empty when there are none.
    pub fn entity_errors(&self, key: &str) -> Vec<Message> {
        self.by_entity.get(key).cloned().unwrap_or_default()
    }

    /// Write the global errors onto the transaction's messages.
    pub fn set_transaction_errors(&self, transaction: &mut Transaction) {
        if self.global.is_empty() {
            return;
        }
        transaction
            .messages
            .entry(MessageKey::Errors)
            .or_default()
            .extend(self.global.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::RequestMethod;
    use crate::violation::Violation;

    fn violations() -> ViolationList {
        vec![
            Violation::global("", "batch too large"),
            Violation::for_entity("a", "name", "name is required"),
            Violation::for_entity("a", "price", "price must be positive"),
            Violation::for_entity("b", "name", "name is too long"),
        ]
        .into()
    }

    #[test]
    fn none_means_no_errors() {
        let mut errors = ErrorBuilder::new();
        errors.process_violations(None);
        assert!(!errors.has_errors());
        assert!(errors.entity_errors("a").is_empty());
    }

    #[test]
    fn splits_global_and_entity_errors() {
        let mut errors = ErrorBuilder::new();
        errors.process_violations(Some(&violations()));

        assert!(errors.has_errors());
        assert_eq!(errors.entity_errors("a").len(), 2);
        assert_eq!(errors.entity_errors("b").len(), 1);
        assert!(errors.entity_errors("c").is_empty());
    }

    #[test]
    fn entity_errors_alone_are_not_global() {
        let mut errors = ErrorBuilder::new();
        errors.add_entity_error("a", Message::new("bad"));
        assert!(!errors.has_errors());
    }

    #[test]
    fn set_transaction_errors_writes_only_global_errors() {
        let mut errors = ErrorBuilder::new();
        errors.process_violations(Some(&violations()));
        let mut tx = Transaction::new("t", "product", RequestMethod::Post, "r");
        errors.set_transaction_errors(&mut tx);

        let written = &tx.messages[&MessageKey::Errors];
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].message, "batch too large");
    }

    #[test]
    fn set_transaction_errors_without_errors_leaves_messages_alone() {
        let errors = ErrorBuilder::new();
        let mut tx = Transaction::new("t", "product", RequestMethod::Post, "r");
        errors.set_transaction_errors(&mut tx);
        assert!(tx.messages.is_empty());
    }
}
