use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::Json;
use axum::Router;

use crate::api::rest::orders::validate_id;
use crate::error::AppError;
use crate::models::user::UserRecord;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/users/:id", get(get_user).put(put_user))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserRecord>, AppError> {
    let user = state
        .store
        .user(&id)
        .ok_or_else(|| AppError::NotFound(format!("user {id} not found")))?;

    Ok(Json(user))
}

async fn put_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UserRecord>,
) -> Result<Json<UserRecord>, AppError> {
    validate_id(&id)?;

    state.store.put_user(&id, payload.clone());
    Ok(Json(payload))
}
