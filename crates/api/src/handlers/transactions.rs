use axum::extract::{Path, State};
use axum::Json;
use restx_core::{CoreError, Transaction};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/transactions/{id} -- read a persisted transaction back.
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Transaction>>> {
    let found = state.sink.find(&id).await?;
    let transaction = found.ok_or(CoreError::NotFound {
        entity: "transaction",
        id,
    })?;
    Ok(Json(DataResponse { data: transaction }))
}
