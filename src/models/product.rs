use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use super::tariff::{self, Tariff};
use super::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub status: String,
    pub slug: String,
    pub code: String,
    pub price: f64,
    pub images: Vec<String>,
    pub tariffs: Json<Vec<Tariff>>,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

impl Product {
    pub fn price_at(&self, date: NaiveDate) -> f64 {
        tariff::price_at(self.price, &self.tariffs, date)
    }
}

/// Category as it appears inside a product read model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: DbId,
    pub name: String,
}

/// Product joined with its categories through `product_categories`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductWithCategories {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    pub categories: Json<Vec<CategoryRef>>,
}
