//! Transaction handlers and their dispatch by request method.

mod post;

use crate::builders::{ErrorBuilder, InfoBuilder, NoticeBuilder};
use crate::entity::CrudEntity;
use crate::error::CoreError;
use crate::store::TransactionStore;
use crate::submission::{HandlerResponse, Submission};
use crate::transaction::{RequestMethod, Transaction};
use crate::violation::ViolationList;

pub use post::TransactionPostHandler;

/// Per-request collaborators handed to a handler.
///
/// Builders start empty; the store is borrowed for the duration of the
/// request so the caller can flush it afterwards.
pub struct HandlerContext<'a> {
    pub errors: ErrorBuilder,
    pub notices: NoticeBuilder,
    pub info: InfoBuilder,
    pub store: &'a mut dyn TransactionStore,
}

impl<'a> HandlerContext<'a> {
    pub fn new(store: &'a mut dyn TransactionStore) -> Self {
        Self {
            errors: ErrorBuilder::new(),
            notices: NoticeBuilder::new(),
            info: InfoBuilder::new(),
            store,
        }
    }

    /// Replace the info builder, for callers that queued messages up front.
    pub fn with_info(mut self, info: InfoBuilder) -> Self {
        self.info = info;
        self
    }
}

/// A handler for one request method of the transactional pipeline.
pub trait TransactionHandler<E: CrudEntity>: Send + Sync {
    /// The request method this handler serves.
    fn supports(&self) -> RequestMethod;

    /// Reconcile `data` against `violations`, finalizing `transaction`.
    fn handle(
        &self,
        ctx: &mut HandlerContext<'_>,
        transaction: &mut Transaction,
        data: Submission<E>,
        violations: Option<&ViolationList>,
    ) -> Result<HandlerResponse<E>, CoreError>;
}

/// Routes requests to the handler registered for their method.
pub struct HandlerRegistry<E: CrudEntity> {
    handlers: Vec<Box<dyn TransactionHandler<E>>>,
}

impl<E: CrudEntity> Default for HandlerRegistry<E> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<E: CrudEntity> HandlerRegistry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; a later registration for the same method wins.
    pub fn register(mut self, handler: impl TransactionHandler<E> + 'static) -> Self {
        let method = handler.supports();
        self.handlers.retain(|existing| existing.supports() != method);
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn handler_for(
        &self,
        method: RequestMethod,
    ) -> Result<&dyn TransactionHandler<E>, CoreError> {
        for handler in &self.handlers {
            if handler.supports() == method {
                return Ok(handler.as_ref());
            }
        }
        Err(CoreError::UnsupportedMethod(method))
    }
}
