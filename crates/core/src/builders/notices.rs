use serde_json::json;

use crate::transaction::{Message, MessageKey, Transaction};

/// Success/failure counts accumulated over one batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub success: usize,
    pub fail: usize,
}

impl Tally {
    pub fn total(self) -> usize {
        self.success + self.fail
    }
}

/// Counts per-entity outcomes and flushes them as notices.
#[derive(Debug, Default)]
pub struct NoticeBuilder {
    tally: Tally,
}

impl NoticeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_success(&mut self) {
        self.tally.success += 1;
    }

    pub fn add_fail(&mut self) {
        self.tally.fail += 1;
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Write one notice per non-zero count onto the transaction.
    pub fn set_transaction_notices(&self, transaction: &mut Transaction) {
        let Tally { success, fail } = self.tally;
        let mut notices = Vec::new();
        if success > 0 {
            notices.push(
                Message::new(format!("{success} of {} entities created", self.tally.total()))
                    .with_code("success")
                    .with_context(json!({ "count": success })),
            );
        }
        if fail > 0 {
            notices.push(
                Message::new(format!("{fail} of {} entities failed", self.tally.total()))
                    .with_code("fail")
                    .with_context(json!({ "count": fail })),
            );
        }
        if !notices.is_empty() {
            transaction
                .messages
                .entry(MessageKey::Notices)
                .or_default()
                .extend(notices);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::RequestMethod;

    fn tx() -> Transaction {
        Transaction::new("t", "product", RequestMethod::Post, "r")
    }

    #[test]
    fn counts_accumulate() {
        let mut notices = NoticeBuilder::new();
        notices.add_success();
        notices.add_success();
        notices.add_fail();
        assert_eq!(notices.tally(), Tally { success: 2, fail: 1 });
        assert_eq!(notices.tally().total(), 3);
    }

    #[test]
    fn writes_one_notice_per_nonzero_count() {
        let mut notices = NoticeBuilder::new();
        notices.add_success();
        notices.add_fail();
        notices.add_fail();
        let mut transaction = tx();
        notices.set_transaction_notices(&mut transaction);

        let written = &transaction.messages[&MessageKey::Notices];
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].code.as_deref(), Some("success"));
        assert_eq!(written[0].message, "1 of 3 entities created");
        assert_eq!(written[1].code.as_deref(), Some("fail"));
        assert_eq!(written[1].context, Some(json!({"count": 2})));
    }

    #[test]
    fn zero_tally_writes_nothing() {
        let mut transaction = tx();
        NoticeBuilder::new().set_transaction_notices(&mut transaction);
        assert!(transaction.messages.is_empty());
    }
}
