use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use crate::dtos::appointment::{AppointmentInput, AppointmentListQuery, MonthQuery, UpcomingQuery};
use crate::dtos::pagination::{Page, PageRequest, DEFAULT_PAGE_SIZE};
use crate::error::AppError;
use crate::models::appointment::{Appointment, AppointmentWithProduct};
use crate::models::DbId;
use crate::services::CrudService;
use crate::state::AppState;

// GET /appointments?dataset=future|past&page=&page_size=
#[instrument(skip(state))]
pub async fn list_appointments(
    State(state): State<AppState>,
    query: Result<Query<AppointmentListQuery>, QueryRejection>,
) -> Result<Json<Page<AppointmentWithProduct>>, AppError> {
    let Query(query) = query?;
    let page = PageRequest::from_query(query.page, query.page_size);
    Ok(Json(
        state.appointments().get_paginated(query.dataset, page).await?,
    ))
}

// GET /appointments/month?month=&year=
#[instrument(skip(state))]
pub async fn get_month(
    State(state): State<AppState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<Vec<AppointmentWithProduct>>, AppError> {
    let Query(query) = query?;
    Ok(Json(
        state
            .appointments()
            .get_by_month(query.month, query.year)
            .await?,
    ))
}

// GET /appointments/upcoming?limit=
#[instrument(skip(state))]
pub async fn get_upcoming(
    State(state): State<AppState>,
    query: Result<Query<UpcomingQuery>, QueryRejection>,
) -> Result<Json<Vec<AppointmentWithProduct>>, AppError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    Ok(Json(state.appointments().get_future(limit).await?))
}

#[instrument(skip(state))]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state
        .appointments()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Appointment not found"))?;
    Ok(Json(appointment))
}

#[instrument(skip(state, payload))]
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(payload): Json<AppointmentInput>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = state.appointments().create(payload).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[instrument(skip(state, payload))]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(payload): Json<AppointmentInput>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(state.appointments().update(id, payload).await?))
}

#[instrument(skip(state))]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> Result<StatusCode, AppError> {
    if !state.appointments().delete(id).await? {
        return Err(AppError::not_found("Appointment not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
