pub mod appointments;
pub mod categories;
pub mod products;

use axum::{middleware, routing::get, Router};
use crate::middleware::auth::require_session;
use crate::state::AppState;

/// Every entity route sits behind the session guard; `/health` does not.
pub fn create_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(products::routes())
        .merge(categories::routes())
        .merge(appointments::routes())
        .route_layer(middleware::from_fn_with_state(state, require_session));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected)
}

async fn health_check() -> &'static str {
    "OK"
}
