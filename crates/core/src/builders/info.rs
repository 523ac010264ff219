use crate::transaction::{Message, MessageKey, Transaction};

/// Queue of informational messages for the batch transaction.
#[derive(Debug, Default)]
pub struct InfoBuilder {
    messages: Vec<Message>,
}

impl InfoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Attach the queued messages under `info`, if there are any.
    pub fn set_transaction_messages(&self, transaction: &mut Transaction) {
        if self.is_empty() {
            return;
        }
        transaction
            .messages
            .entry(MessageKey::Info)
            .or_default()
            .extend(self.messages.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::RequestMethod;

    #[test]
    fn flushes_queued_messages() {
        let mut info = InfoBuilder::new();
        info.add(Message::new("generated 2 primary keys"));
        let mut tx = Transaction::new("t", "product", RequestMethod::Post, "r");
        info.set_transaction_messages(&mut tx);
        assert_eq!(tx.messages[&MessageKey::Info].len(), 1);
    }

    #[test]
    fn empty_queue_leaves_messages_alone() {
        let mut tx = Transaction::new("t", "product", RequestMethod::Post, "r");
        InfoBuilder::new().set_transaction_messages(&mut tx);
        assert!(tx.messages.is_empty());
    }
}
