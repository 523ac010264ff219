pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /entities/{model}                                create one entity or a collection (POST)
/// /transactions/{id}                               read back a transaction record (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/entities/{model}",
            post(handlers::entities::create_entities),
        )
        .route(
            "/transactions/{id}",
            get(handlers::transactions::get_transaction),
        )
}
