// src/handlers/product.rs
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, instrument};

use crate::auth::guard::RequestContext;
use crate::dtos::pagination::{Page, PageRequest};
use crate::dtos::product::{PriceQuery, PriceResponse, ProductInput, ProductListQuery};
use crate::dtos::sort::Sort;
use crate::error::AppError;
use crate::models::product::{Product, ProductWithCategories};
use crate::models::DbId;
use crate::services::CrudService;
use crate::state::AppState;

// GET /products - Filtered, sorted, paginated list with categories
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductListQuery>, QueryRejection>,
) -> Result<Json<Page<ProductWithCategories>>, AppError> {
    let Query(query) = query?;
    let page = PageRequest::from_query(query.page, query.page_size);
    let sort = Sort::from_query(query.sort.clone(), query.direction);
    let products = state
        .products()
        .get_all_with_categories(&query.filters(), page, &sort)
        .await?;
    Ok(Json(products))
}

// GET /products/{id} - Single product with categories
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> Result<Json<ProductWithCategories>, AppError> {
    let product = state
        .products()
        .get_by_id_with_categories(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    Ok(Json(product))
}

// POST /products - Create product (and its category assignments)
#[instrument(skip(state, ctx, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.products().create(payload).await?;
    info!(actor = ctx.actor(), product_id = product.id, "Product created via API");
    Ok((StatusCode::CREATED, Json(product)))
}

// PUT /products/{id} - Update product, replacing categories when given
#[instrument(skip(state, ctx, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<DbId>,
    Json(payload): Json<ProductInput>,
) -> Result<Json<Product>, AppError> {
    let product = state.products().update(id, payload).await?;
    info!(actor = ctx.actor(), product_id = id, "Product updated");
    Ok(Json(product))
}

// DELETE /products/{id} - Soft delete
#[instrument(skip(state, ctx))]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<DbId>,
) -> Result<StatusCode, AppError> {
    if !state.products().delete(id).await? {
        return Err(AppError::not_found("Product not found"));
    }
    info!(actor = ctx.actor(), product_id = id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

// GET /products/{id}/price?date=YYYY-MM-DD - Effective price on a date
#[instrument(skip(state))]
pub async fn get_product_price(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> Result<Json<PriceResponse>, AppError> {
    let Query(query) = query?;
    let price = state
        .products()
        .price_at(id, query.date)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    Ok(Json(PriceResponse {
        product_id: id,
        date: query.date,
        price,
    }))
}
