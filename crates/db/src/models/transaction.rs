//! Row mapping for the `transactions` table.

use restx_core::transaction::Messages;
use restx_core::types::Timestamp;
use restx_core::{Outcome, RequestMethod, RequestSource, Transaction, TransactionStatus};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::DbError;

/// A row from the `transactions` table.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionRow {
    pub id: String,
    pub model: String,
    pub request_method: String,
    pub request_source: String,
    pub request_id: String,
    pub related_route: Option<String>,
    pub related_ids: Option<Vec<String>>,
    pub status: i16,
    pub success: bool,
    pub messages: Json<Messages>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = DbError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let invalid = |reason: String| DbError::InvalidRow {
            id: row.id.clone(),
            reason,
        };

        let status = u16::try_from(row.status)
            .ok()
            .and_then(TransactionStatus::from_code)
            .ok_or_else(|| invalid(format!("unknown status {}", row.status)))?;
        let outcome = Outcome::from_status(status);
        if outcome.success() != row.success {
            return Err(invalid(format!(
                "success flag {} contradicts status {}",
                row.success,
                status.code()
            )));
        }
        let request_method = RequestMethod::parse(&row.request_method)
            .ok_or_else(|| invalid(format!("unknown request method {}", row.request_method)))?;
        let request_source = RequestSource::parse(&row.request_source)
            .ok_or_else(|| invalid(format!("unknown request source {}", row.request_source)))?;

        let mut transaction =
            Transaction::new(row.id.clone(), row.model, request_method, row.request_id);
        transaction.apply(outcome);
        transaction.request_source = request_source;
        transaction.related_route = row.related_route;
        transaction.related_ids = row.related_ids;
        transaction.messages = row.messages.0;
        transaction.created_at = row.created_at;
        transaction.updated_at = row.updated_at;
        Ok(transaction)
    }
}
