use crate::transaction::Transaction;
use crate::types::EntityKey;

/// An entity that can be created through a transaction.
///
/// The entity does not own its transaction: the transaction is persisted on
/// its own and the entity keeps a snapshot for traceability.
pub trait CrudEntity {
    /// Key used to look up the entity's validation errors.
    fn primary_key(&self) -> &str;

    /// Identifying values recorded as the transaction's related ids.
    fn ids(&self) -> Vec<EntityKey>;

    fn transaction(&self) -> Option<&Transaction>;

    fn set_transaction(&mut self, transaction: Transaction);

    /// Whether this item takes part in transaction reconciliation.
    ///
    /// Collection items answering `false` are skipped but still returned.
    fn supports_transactions(&self) -> bool {
        true
    }
}
