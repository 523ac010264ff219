use std::sync::Arc;

use restx_core::ids::{IdGenerator, UuidGenerator};
use restx_core::transaction::RequestIdClock;
use restx_core::validation::RuleSet;
use restx_core::{HandlerRegistry, TransactionPostHandler};

use crate::config::ServerConfig;
use crate::record::Record;
use crate::sink::TransactionSink;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Validation rules applied to submitted records.
    pub rules: Arc<RuleSet>,
    /// Transaction handlers keyed by request method.
    pub handlers: Arc<HandlerRegistry<Record>>,
    pub sink: TransactionSink,
    pub ids: Arc<dyn IdGenerator>,
    /// Correlation tokens for batch transactions.
    pub request_ids: Arc<RequestIdClock>,
}

impl AppState {
    pub fn new(config: ServerConfig, rules: RuleSet, sink: TransactionSink) -> Self {
        let ids: Arc<dyn IdGenerator> = Arc::new(UuidGenerator);
        let handlers: HandlerRegistry<Record> =
            HandlerRegistry::new().register(TransactionPostHandler::new(Arc::clone(&ids)));
        Self {
            config: Arc::new(config),
            rules: Arc::new(rules),
            handlers: Arc::new(handlers),
            sink,
            ids,
            request_ids: Arc::new(RequestIdClock::new()),
        }
    }
}
