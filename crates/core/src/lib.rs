//! Transactional CRUD core.
//!
//! Turns a submitted batch (or single entity) plus a set of validation
//! violations into per-entity transaction records, an aggregated batch
//! transaction and a response payload. Contains no I/O: persistence,
//! identifier generation and validation are reached through the
//! collaborators in [`builders`], [`ids`], [`store`] and [`validation`].

pub mod builders;
pub mod entity;
pub mod error;
pub mod handler;
pub mod ids;
pub mod store;
pub mod submission;
pub mod transaction;
pub mod types;
pub mod validation;
pub mod violation;

pub use entity::CrudEntity;
pub use error::CoreError;
pub use handler::{HandlerContext, HandlerRegistry, TransactionHandler, TransactionPostHandler};
pub use submission::{CollectionResponse, HandlerResponse, Submission};
pub use transaction::{Outcome, RequestMethod, RequestSource, Transaction, TransactionStatus};
pub use violation::{Violation, ViolationList};
