//! Repository for the `transactions` table.

use restx_core::Transaction;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::transaction::TransactionRow;
use crate::DbError;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, model, request_method, request_source, request_id, \
    related_route, related_ids, status, success, messages, created_at, updated_at";

/// Provides persistence for transaction snapshots.
pub struct TransactionRepo;

impl TransactionRepo {
    /// Write a batch of snapshots inside one database transaction.
    ///
    /// A snapshot whose id already exists replaces the stored row entirely.
    /// Returns the number of rows written.
    pub async fn insert_many(
        pool: &PgPool,
        transactions: &[Transaction],
    ) -> Result<u64, sqlx::Error> {
        if transactions.is_empty() {
            return Ok(0);
        }

        let query = format!(
            "INSERT INTO transactions ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             ON CONFLICT (id) DO UPDATE SET \
                model = EXCLUDED.model, \
                request_method = EXCLUDED.request_method, \
                request_source = EXCLUDED.request_source, \
                request_id = EXCLUDED.request_id, \
                related_route = EXCLUDED.related_route, \
                related_ids = EXCLUDED.related_ids, \
                status = EXCLUDED.status, \
                success = EXCLUDED.success, \
                messages = EXCLUDED.messages, \
                created_at = EXCLUDED.created_at, \
                updated_at = EXCLUDED.updated_at"
        );

        let mut db_tx = pool.begin().await?;
        let mut written = 0;
        for transaction in transactions {
            written += sqlx::query(&query)
                .bind(&transaction.id)
                .bind(&transaction.model)
                .bind(transaction.request_method.as_str())
                .bind(transaction.request_source.as_str())
                .bind(&transaction.request_id)
                .bind(&transaction.related_route)
                .bind(&transaction.related_ids)
                .bind(transaction.status().code() as i16)
                .bind(transaction.success())
                .bind(Json(&transaction.messages))
                .bind(transaction.created_at)
                .bind(transaction.updated_at)
                .execute(&mut *db_tx)
                .await?
                .rows_affected();
        }
        db_tx.commit().await?;

        tracing::debug!(count = transactions.len(), written, "Transactions flushed");
        Ok(written)
    }

    /// Find a single transaction by id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Transaction>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM transactions WHERE id = $1");
        let row = sqlx::query_as::<_, TransactionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.map(Transaction::try_from).transpose()
    }
}
