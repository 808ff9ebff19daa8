use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use crate::dtos::appointment::{AppointmentInput, Dataset};
use crate::dtos::pagination::{Page, PageRequest};
use crate::error::AppError;
use crate::models::appointment::{Appointment, AppointmentProductRow, AppointmentWithProduct};
use crate::models::product::Product;
use crate::models::DbId;
use crate::services::base::{BaseService, CrudService, Entity};
use crate::validators;

impl Entity for Appointment {
    const TABLE: &'static str = "appointments";
    const COLUMNS: &'static str =
        "id, product_id, date, units, total, status, notes, created_at, updated_at";
}

const SELECT_WITH_PRODUCT: &str = "SELECT a.*, pr.name AS product_name, pr.price AS product_price
    FROM appointments a
    LEFT JOIN products pr ON pr.id = a.product_id";

#[derive(Clone)]
pub struct AppointmentService {
    base: BaseService<Appointment>,
}

impl AppointmentService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            base: BaseService::new(pool),
        }
    }

    /// Bookable product: exists and is not soft-deleted.
    async fn live_product(&self, product_id: DbId) -> Result<Product, AppError> {
        BaseService::<Product>::find_with(self.base.pool(), product_id)
            .await?
            .ok_or_else(|| AppError::invalid("product_id", "Product not found."))
    }

    /// Appointments dated within the given month (1-12), with product info.
    #[instrument(skip(self))]
    pub async fn get_by_month(
        &self,
        month: u32,
        year: i32,
    ) -> Result<Vec<AppointmentWithProduct>, AppError> {
        if !(1..=12).contains(&month) {
            return Err(AppError::invalid("month", "Month must be between 1 and 12."));
        }
        let (first, last) = month_bounds(month, year)
            .ok_or_else(|| AppError::invalid("year", "Year is out of range."))?;

        let query = format!(
            "{SELECT_WITH_PRODUCT} WHERE a.date >= $1 AND a.date <= $2 ORDER BY a.date ASC, a.id ASC"
        );
        let rows = sqlx::query_as::<_, AppointmentProductRow>(&query)
            .bind(first)
            .bind(last)
            .fetch_all(self.base.pool())
            .await?;

        Ok(rows.into_iter().map(AppointmentWithProduct::from).collect())
    }

    /// Next pending or confirmed appointments from today on, soonest first.
    #[instrument(skip(self))]
    pub async fn get_future(&self, limit: i64) -> Result<Vec<AppointmentWithProduct>, AppError> {
        let query = format!(
            "{SELECT_WITH_PRODUCT}
             WHERE a.date >= CURRENT_DATE AND a.status IN ('pending', 'confirmed')
             ORDER BY a.date ASC, a.id ASC
             LIMIT $1"
        );
        let rows = sqlx::query_as::<_, AppointmentProductRow>(&query)
            .bind(limit.max(0))
            .fetch_all(self.base.pool())
            .await?;

        Ok(rows.into_iter().map(AppointmentWithProduct::from).collect())
    }

    /// Future rows ascend from today; past rows descend from yesterday.
    #[instrument(skip(self))]
    pub async fn get_paginated(
        &self,
        dataset: Dataset,
        page: PageRequest,
    ) -> Result<Page<AppointmentWithProduct>, AppError> {
        let (filter, order) = match dataset {
            Dataset::Future => ("a.date >= CURRENT_DATE", "a.date ASC, a.id ASC"),
            Dataset::Past => ("a.date < CURRENT_DATE", "a.date DESC, a.id DESC"),
        };

        let count_query = format!("SELECT COUNT(*) FROM appointments a WHERE {filter}");
        let count: i64 = sqlx::query_scalar(&count_query)
            .fetch_one(self.base.pool())
            .await?;

        let query =
            format!("{SELECT_WITH_PRODUCT} WHERE {filter} ORDER BY {order} LIMIT $1 OFFSET $2");
        let rows = sqlx::query_as::<_, AppointmentProductRow>(&query)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.base.pool())
            .await?;

        Ok(Page {
            data: rows.into_iter().map(AppointmentWithProduct::from).collect(),
            count,
        })
    }
}

#[async_trait]
impl CrudService for AppointmentService {
    type Row = Appointment;
    type Input = AppointmentInput;

    async fn get_all(&self) -> Result<Vec<Appointment>, AppError> {
        Ok(self.base.get_all().await?)
    }

    async fn get_by_id(&self, id: DbId) -> Result<Option<Appointment>, AppError> {
        Ok(self.base.get_by_id(id).await?)
    }

    /// Without an explicit total the appointment is priced at the product's
    /// effective price on its date, times its units.
    async fn create(&self, mut input: AppointmentInput) -> Result<Appointment, AppError> {
        AppError::check(validators::appointment::validate(&input, false))?;

        if let Some(product_id) = input.product_id {
            let product = self.live_product(product_id).await?;
            if let (None, Some(date)) = (input.total, input.date) {
                let units = input.units.unwrap_or(1);
                input.total = Some(f64::from(units) * product.price_at(date));
            }
        }

        self.base.create(&input).await.map_err(map_write_error)
    }

    async fn update(&self, id: DbId, input: AppointmentInput) -> Result<Appointment, AppError> {
        AppError::check(validators::appointment::validate(&input, true))?;
        if let Some(product_id) = input.product_id {
            self.live_product(product_id).await?;
        }

        self.base
            .update(id, &input)
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| AppError::not_found("Appointment not found"))
    }

    async fn delete(&self, id: DbId) -> Result<bool, AppError> {
        Ok(self.base.delete(id).await?)
    }
}

/// First and last calendar day of `month` in `year`.
pub fn month_bounds(month: u32, year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

fn map_write_error(err: sqlx::Error) -> AppError {
    let foreign_key_violation =
        err.as_database_error().and_then(|e| e.code()).as_deref() == Some("23503");
    if foreign_key_violation {
        AppError::invalid("product_id", "Product not found.")
    } else {
        err.into()
    }
}
