use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::Json;
use axum::Router;

use crate::error::AppError;
use crate::models::order::{OrderPatch, OrderRecord};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/orders/:id",
        get(get_order).put(put_order).patch(patch_order),
    )
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderRecord>, AppError> {
    let order = state
        .store
        .order(&id)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    Ok(Json(order))
}

async fn put_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<OrderRecord>,
) -> Result<Json<OrderRecord>, AppError> {
    validate_id(&id)?;

    state.store.put_order(&id, payload.clone());
    Ok(Json(payload))
}

async fn patch_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<OrderPatch>,
) -> Result<Json<OrderRecord>, AppError> {
    state.store.patch_order(&id, payload)?;

    let order = state
        .store
        .order(&id)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    Ok(Json(order))
}

pub(crate) fn validate_id(id: &str) -> Result<(), AppError> {
    if id.trim().is_empty() || id.contains('/') {
        return Err(AppError::BadRequest(format!("invalid document id: {id:?}")));
    }
    Ok(())
}
