use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::instrument;

use crate::dtos::category::{CategoryInput, TreeQuery};
use crate::error::AppError;
use crate::models::category::Category;
use crate::models::DbId;
use crate::services::taxonomy::assemble_tree;
use crate::services::CrudService;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.taxonomy().get_all().await?))
}

/// Flat list by default; `?nested=true` returns the assembled hierarchy.
#[instrument(skip(state))]
pub async fn get_category_tree(
    State(state): State<AppState>,
    query: Result<Query<TreeQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let categories = state.taxonomy().get_tree().await?;
    if query.nested {
        Ok(Json(assemble_tree(categories)).into_response())
    } else {
        Ok(Json(categories).into_response())
    }
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> Result<Json<Category>, AppError> {
    let category = state
        .taxonomy()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))?;
    Ok(Json(category))
}

#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = state.taxonomy().create(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[instrument(skip(state, payload))]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(payload): Json<CategoryInput>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(state.taxonomy().update(id, payload).await?))
}

#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> Result<StatusCode, AppError> {
    if !state.taxonomy().delete(id).await? {
        return Err(AppError::not_found("Category not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
