//! Transaction persistence seam.
//!
//! [`TransactionStore::persist`] records one snapshot of a transaction. The
//! core never reads back what it persisted; [`UnitOfWork`] stages snapshots
//! in memory until the enclosing layer flushes them to durable storage.

use crate::transaction::Transaction;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Transaction store is unavailable: {0}")]
    Unavailable(String),

    #[error("Transaction {id} was rejected by the store: {reason}")]
    Rejected { id: String, reason: String },
}

/// Storage collaborator for transaction snapshots.
pub trait TransactionStore {
    /// Record a snapshot of `transaction` as it is right now.
    ///
    /// A later read must reflect exactly the fields set at this call; no
    /// merging with previously persisted state for the same id.
    fn persist(&mut self, transaction: &Transaction) -> Result<(), StoreError>;
}

/// In-memory staging area for persisted transactions.
///
/// Snapshots keep their first-persisted order. Persisting an id that is
/// already pending replaces the pending snapshot in place.
#[derive(Debug, Default)]
pub struct UnitOfWork {
    pending: Vec<Transaction>,
}

impl UnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.pending.iter().find(|tx| tx.id == id)
    }

    /// Hand every pending snapshot over for flushing, leaving the unit empty.
    pub fn take_pending(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.pending)
    }
}

impl TransactionStore for UnitOfWork {
    fn persist(&mut self, transaction: &Transaction) -> Result<(), StoreError> {
        if transaction.id.is_empty() {
            return Err(StoreError::Rejected {
                id: String::new(),
                reason: "transaction id is empty".to_string(),
            });
        }
        match self.pending.iter_mut().find(|tx| tx.id == transaction.id) {
            Some(existing) => *existing = transaction.clone(),
            None => self.pending.push(transaction.clone()),
        }
        Ok(())
    }
}
