use chrono::NaiveDate;
use serde::Deserialize;

use crate::dtos::double_option;
use crate::models::appointment::AppointmentStatus;
use crate::models::DbId;
use crate::services::base::{Changeset, SqlValue};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct AppointmentInput {
    pub product_id: Option<DbId>,
    pub date: Option<NaiveDate>,
    pub units: Option<i32>,
    pub total: Option<f64>,
    pub status: Option<AppointmentStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl Changeset for AppointmentInput {
    fn fields(&self) -> Vec<(&'static str, SqlValue)> {
        let mut fields = Vec::new();
        if let Some(product_id) = self.product_id {
            fields.push(("product_id", SqlValue::BigInt(Some(product_id))));
        }
        if let Some(date) = self.date {
            fields.push(("date", SqlValue::Date(date)));
        }
        if let Some(units) = self.units {
            fields.push(("units", SqlValue::Int(units)));
        }
        if let Some(total) = self.total {
            fields.push(("total", SqlValue::Float(total)));
        }
        if let Some(status) = self.status {
            fields.push(("status", SqlValue::Text(Some(status.as_str().to_string()))));
        }
        if let Some(notes) = &self.notes {
            fields.push(("notes", SqlValue::Text(notes.clone())));
        }
        fields
    }
}

/// Which side of today a paginated listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    #[default]
    Future,
    Past,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentListQuery {
    #[serde(default)]
    pub dataset: Dataset,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub limit: Option<i64>,
}
