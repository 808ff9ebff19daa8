use axum::{
    routing::get,
    Router,
};
use crate::handlers::appointment::{
    create_appointment, delete_appointment, get_appointment, get_month, get_upcoming,
    list_appointments, update_appointment,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(list_appointments).post(create_appointment))
        .route("/appointments/month", get(get_month))
        .route("/appointments/upcoming", get(get_upcoming))
        .route(
            "/appointments/{id}",
            get(get_appointment).put(update_appointment).delete(delete_appointment),
        )
}
