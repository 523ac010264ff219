//! The create (POST) branch of the transactional pipeline.
//!
//! The batch transaction is classified from global errors only. Each entity
//! is then reconciled on its own: a collection item gets a structural copy
//! of the batch transaction, while a single entity reuses the batch
//! transaction itself. If the batch transaction ends up failed, the
//! response is emptied.

use std::sync::Arc;

use crate::entity::CrudEntity;
use crate::error::CoreError;
use crate::ids::IdGenerator;
use crate::submission::{CollectionResponse, HandlerResponse, Submission};
use crate::transaction::{
    classify, MessageKey, Messages, Outcome, RequestIdClock, RequestMethod, RequestSource,
    Transaction,
};
use crate::violation::ViolationList;

use super::{HandlerContext, TransactionHandler};

/// Handles creation requests.
pub struct TransactionPostHandler {
    ids: Arc<dyn IdGenerator>,
    clock: RequestIdClock,
}

impl TransactionPostHandler {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            ids,
            clock: RequestIdClock::new(),
        }
    }

    fn handle_empty_collection<E>(
        &self,
        ctx: &mut HandlerContext<'_>,
        base: &mut Transaction,
        items: Vec<E>,
    ) -> CollectionResponse<E> {
        ctx.notices.set_transaction_notices(base);
        base.apply(Outcome::conflict());
        tracing::debug!(transaction_id = %base.id, "Empty collection submitted");
        CollectionResponse::new(items).with_show_associations(true)
    }

    fn handle_collection<E: CrudEntity>(
        &self,
        ctx: &mut HandlerContext<'_>,
        base: &mut Transaction,
        mut items: Vec<E>,
    ) -> Result<CollectionResponse<E>, CoreError> {
        for entity in items.iter_mut().filter(|e| e.supports_transactions()) {
            let mut transaction = base.derive();
            self.handle_entity(ctx, &mut transaction, entity)?;
        }

        ctx.notices.set_transaction_notices(base);
        ctx.info.set_transaction_messages(base);

        let tally = ctx.notices.tally();
        tracing::info!(
            transaction_id = %base.id,
            model = %base.model,
            items = items.len(),
            succeeded = tally.success,
            failed = tally.fail,
            "Collection reconciled",
        );

        Ok(CollectionResponse::new(items).with_show_associations(true))
    }

    /// Stamp `transaction` for `entity`, classify it from the entity's own
    /// errors, persist it and link it to the entity.
    fn handle_entity<E: CrudEntity>(
        &self,
        ctx: &mut HandlerContext<'_>,
        transaction: &mut Transaction,
        entity: &mut E,
    ) -> Result<(), CoreError> {
        transaction.request_source = RequestSource::Service;
        transaction.id = self.ids.generate();
        transaction.request_id = self.clock.next();
        transaction.related_ids = Some(entity.ids());

        let errors = ctx.errors.entity_errors(entity.primary_key());
        let outcome = classify(!errors.is_empty());
        transaction.apply(outcome);

        let mut messages = Messages::new();
        if outcome.success() {
            ctx.notices.add_success();
        } else {
            messages.insert(MessageKey::Errors, errors);
            ctx.notices.add_fail();
        }
        transaction.messages = messages;

        ctx.store.persist(transaction)?;
        tracing::debug!(
            transaction_id = %transaction.id,
            entity = %entity.primary_key(),
            status = transaction.status().code(),
            "Entity reconciled",
        );

        entity.set_transaction(transaction.clone());
        Ok(())
    }
}

impl<E: CrudEntity> TransactionHandler<E> for TransactionPostHandler {
    fn supports(&self) -> RequestMethod {
        RequestMethod::Post
    }

    fn handle(
        &self,
        ctx: &mut HandlerContext<'_>,
        transaction: &mut Transaction,
        data: Submission<E>,
        violations: Option<&ViolationList>,
    ) -> Result<HandlerResponse<E>, CoreError> {
        ctx.errors.process_violations(violations);
        ctx.errors.set_transaction_errors(transaction);
        transaction.apply(classify(ctx.errors.has_errors()));

        let response = match data {
            Submission::Collection(items) if items.is_empty() => {
                HandlerResponse::Collection(self.handle_empty_collection(ctx, transaction, items))
            }
            Submission::Collection(items) => {
                HandlerResponse::Collection(self.handle_collection(ctx, transaction, items)?)
            }
            Submission::Single(mut entity) => {
                self.handle_entity(ctx, transaction, &mut entity)?;
                HandlerResponse::Entity(entity)
            }
            Submission::Unsupported { type_name } => {
                tracing::warn!(%type_name, "Unsupported submission for POST");
                return Err(CoreError::UnsupportedData { type_name });
            }
        };

        if transaction.success() {
            return Ok(response);
        }

        tracing::debug!(transaction_id = %transaction.id, "Batch failed, discarding payload");
        Ok(match response {
            HandlerResponse::Collection(mut collection) => {
                collection.clear_items();
                HandlerResponse::Collection(collection)
            }
            HandlerResponse::Entity(_) => {
                transaction.related_ids = None;
                HandlerResponse::Collection(CollectionResponse::empty().with_show_associations(true))
            }
        })
    }
}
