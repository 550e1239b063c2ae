//! `/posts` handlers

use super::{path_id, ApiJson, ApiQuery};
use crate::error::StoreError;
use crate::paging::{PageRequest, SortOrder, PAGE_FROM_DEFAULT, PAGE_SIZE_DEFAULT};
use crate::posts::{NewPost, Post, PostPatch};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

/// Raw `?sort=&size=&from=` parameters, validated before reaching the store
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub sort: Option<String>,
    pub size: Option<String>,
    pub from: Option<String>,
}

impl ListParams {
    /// Apply defaults (desc, 10, 0) and validate
    pub fn resolve(&self) -> Result<(SortOrder, PageRequest), StoreError> {
        let order = self
            .sort
            .as_deref()
            .map(SortOrder::from)
            .unwrap_or_default();
        let size = parse_number(self.size.as_deref(), "size", PAGE_SIZE_DEFAULT)?;
        let from = parse_number(self.from.as_deref(), "from", PAGE_FROM_DEFAULT)?;
        Ok((order, PageRequest::new(size, from)?))
    }
}

fn parse_number(raw: Option<&str>, field: &str, default: usize) -> Result<i64, StoreError> {
    match raw {
        None => Ok(default as i64),
        Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
            StoreError::validation(field, format!("'{}' is not a whole number", raw))
        }),
    }
}

pub async fn find_all(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<Post>>, StoreError> {
    let (order, page) = params.resolve()?;
    Ok(Json(state.posts.find_all(order, page).await))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Post>, StoreError> {
    let id = path_id(&raw_id, "post")?;
    Ok(Json(state.posts.get_post_by_id(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewPost>,
) -> Result<(StatusCode, Json<Post>), StoreError> {
    let post = state.posts.create(input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update(
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<PostPatch>,
) -> Result<Json<Post>, StoreError> {
    Ok(Json(state.posts.update(patch).await?))
}
