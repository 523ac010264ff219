use crate::store::StoreError;
use crate::transaction::RequestMethod;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The submission is neither a collection nor a single entity.
    #[error(
        "{type_name} is not supported by transactions (POST). \
         A collection or a single entity is required."
    )]
    UnsupportedData { type_name: String },

    #[error("No transaction handler registered for {0}")]
    UnsupportedMethod(RequestMethod),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
