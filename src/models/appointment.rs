use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{DbId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown appointment status: {0}")]
pub struct UnknownStatus(String);

impl FromStr for AppointmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for AppointmentStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Appointment {
    pub id: DbId,
    pub product_id: DbId,
    pub date: NaiveDate,
    pub units: i32,
    pub total: f64,
    #[sqlx(try_from = "String")]
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

/// Appointment row joined with the minimal product columns.
#[derive(Debug, FromRow)]
pub struct AppointmentProductRow {
    #[sqlx(flatten)]
    pub appointment: Appointment,
    pub product_name: Option<String>,
    pub product_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentWithProduct {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub product: Option<ProductSummary>,
}

impl From<AppointmentProductRow> for AppointmentWithProduct {
    fn from(row: AppointmentProductRow) -> Self {
        let product = match (row.product_name, row.product_price) {
            (Some(name), Some(price)) => Some(ProductSummary { name, price }),
            _ => None,
        };
        Self {
            appointment: row.appointment,
            product,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_lowercase_only() {
        assert_eq!(
            "confirmed".parse::<AppointmentStatus>().unwrap(),
            AppointmentStatus::Confirmed
        );
        assert!("Confirmed".parse::<AppointmentStatus>().is_err());
        assert!("done".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn summary_requires_joined_product() {
        let row = AppointmentProductRow {
            appointment: Appointment {
                id: 1,
                product_id: 2,
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                units: 1,
                total: 10.0,
                status: AppointmentStatus::Pending,
                notes: None,
                created_at: chrono::Utc::now(),
                updated_at: None,
            },
            product_name: None,
            product_price: None,
        };
        assert!(AppointmentWithProduct::from(row).product.is_none());
    }
}
