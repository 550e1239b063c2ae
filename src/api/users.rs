//! `/users` handlers

use super::{path_id, ApiJson};
use crate::error::StoreError;
use crate::state::AppState;
use crate::users::{NewUser, User, UserPatch};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn find_all(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.users.find_all().await)
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<User>, StoreError> {
    let id = path_id(&raw_id, "user")?;
    Ok(Json(state.users.get_user_by_id(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewUser>,
) -> Result<(StatusCode, Json<User>), StoreError> {
    let user = state.users.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update(
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<UserPatch>,
) -> Result<Json<User>, StoreError> {
    Ok(Json(state.users.update(patch).await?))
}
