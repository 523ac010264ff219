//! Durable destination of flushed transaction snapshots.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use restx_core::Transaction;
use restx_db::repositories::TransactionRepo;
use restx_db::DbPool;

use crate::error::{AppError, AppResult};

/// Where a request's unit of work is flushed to.
#[derive(Clone)]
pub enum TransactionSink {
    Postgres(DbPool),
    /// Process-local journal keyed by transaction id, used when no
    /// database is configured.
    Memory(Arc<Mutex<HashMap<String, Transaction>>>),
}

impl TransactionSink {
    pub fn memory() -> Self {
        Self::Memory(Arc::default())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    /// Write every snapshot; an existing id is replaced.
    pub async fn flush(&self, transactions: Vec<Transaction>) -> AppResult<()> {
        if transactions.is_empty() {
            return Ok(());
        }
        match self {
            Self::Postgres(pool) => {
                TransactionRepo::insert_many(pool, &transactions).await?;
            }
            Self::Memory(journal) => {
                let mut journal = journal.lock().map_err(|_| poisoned())?;
                for transaction in transactions {
                    journal.insert(transaction.id.clone(), transaction);
                }
            }
        }
        Ok(())
    }

    pub async fn find(&self, id: &str) -> AppResult<Option<Transaction>> {
        match self {
            Self::Postgres(pool) => Ok(TransactionRepo::find_by_id(pool, id).await?),
            Self::Memory(journal) => {
                let journal = journal.lock().map_err(|_| poisoned())?;
                Ok(journal.get(id).cloned())
            }
        }
    }

    pub async fn is_healthy(&self) -> bool {
        match self {
            Self::Postgres(pool) => restx_db::health_check(pool).await.is_ok(),
            Self::Memory(journal) => !journal.is_poisoned(),
        }
    }
}

fn poisoned() -> AppError {
    AppError::InternalError("transaction journal lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use restx_core::{Outcome, RequestMethod};

    use super::*;

    fn tx(id: &str) -> Transaction {
        Transaction::new(id, "product", RequestMethod::Post, "req")
    }

    #[tokio::test]
    async fn memory_flush_replaces_by_id() {
        let sink = TransactionSink::memory();
        sink.flush(vec![tx("a"), tx("b")]).await.unwrap();

        let mut failed = tx("a");
        failed.apply(Outcome::conflict());
        sink.flush(vec![failed.clone()]).await.unwrap();

        assert_eq!(sink.find("a").await.unwrap(), Some(failed));
        assert_eq!(sink.find("b").await.unwrap().map(|t| t.id), Some("b".to_string()));
        assert_eq!(sink.find("c").await.unwrap(), None);
        assert!(sink.is_healthy().await);
    }
}
