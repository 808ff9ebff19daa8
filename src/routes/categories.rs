use axum::{
    routing::get,
    Router,
};
use crate::handlers::category::{
    create_category, delete_category, get_category, get_category_tree, list_categories,
    update_category,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/tree", get(get_category_tree))
        .route("/categories/{id}", get(get_category).put(update_category).delete(delete_category))
}
