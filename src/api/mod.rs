//! HTTP API
//!
//! TigerStyle: Thin axum adapter over the stores. Handlers parse the wire
//! input, call exactly one store operation and map the outcome to a response.
//!
//! Status mapping:
//! - `NotFound` -> 404
//! - `Validation`, `Duplicate` -> 400
//! - create -> 201, everything else -> 200
//!
//! Malformed bodies and query strings are reported as `Validation` errors so
//! every failure has the same JSON shape.

pub mod posts;
pub mod users;

use crate::error::StoreError;
use crate::ids::stored_id;
use crate::state::AppState;
use axum::async_trait;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;

/// Build the full router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/users",
            get(users::find_all).post(users::create).put(users::update),
        )
        .route("/users/:id", get(users::get_by_id))
        .route(
            "/posts",
            get(posts::find_all).post(posts::create).put(posts::update),
        )
        .route("/posts/:id", get(posts::get_by_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "users": state.users.count().await,
        "posts": state.posts.count().await,
    }))
}

// =============================================================================
// Extractors
// =============================================================================

/// JSON body whose rejection is a `Validation` error on `body`
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = StoreError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(body_rejected(rejection)),
        }
    }
}

/// Query string whose rejection is a `Validation` error on `query`
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = StoreError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(query_rejected(rejection)),
        }
    }
}

fn body_rejected(rejection: JsonRejection) -> StoreError {
    tracing::warn!(status = rejection.status().as_u16(), "Rejected request body");
    StoreError::validation("body", rejection.body_text())
}

fn query_rejected(rejection: QueryRejection) -> StoreError {
    tracing::warn!(status = rejection.status().as_u16(), "Rejected query string");
    StoreError::validation("query", rejection.body_text())
}

/// Parse a path id. Non-numeric is invalid; numeric but impossible is not found.
pub(crate) fn path_id(raw: &str, entity: &str) -> Result<u64, StoreError> {
    let parsed = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| StoreError::validation("id", format!("'{}' is not a valid id", raw)))?;

    stored_id(parsed)
        .ok_or_else(|| StoreError::not_found(format!("{} with id {} not found", entity, parsed)))
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Validation { .. } | StoreError::Duplicate(_) => StatusCode::BAD_REQUEST,
        };

        let mut body = serde_json::json!({
            "error": self.kind(),
            "description": self.message(),
        });
        if let StoreError::Validation { field, .. } = &self {
            body["field"] = serde_json::Value::String(field.clone());
        }

        tracing::debug!(status = status.as_u16(), error = %self, "Request failed");
        (status, Json(body)).into_response()
    }
}
