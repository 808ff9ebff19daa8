// src/dtos/product.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dtos::sort::SortDirection;
use crate::models::tariff::Tariff;
use crate::models::DbId;
use crate::services::base::{Changeset, SqlValue};

/// Create/update payload. `categories` is virtual: it is written to the
/// pivot table, never to the `products` row.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductInput {
    pub name: Option<String>,
    pub status: Option<String>,
    pub slug: Option<String>,
    pub code: Option<String>,
    pub price: Option<f64>,
    pub images: Option<Vec<String>>,
    pub tariffs: Option<Vec<Tariff>>,
    pub categories: Option<Vec<DbId>>,
}

impl Changeset for ProductInput {
    fn fields(&self) -> Vec<(&'static str, SqlValue)> {
        let mut fields = Vec::new();
        if let Some(name) = &self.name {
            fields.push(("name", SqlValue::Text(Some(name.trim().to_string()))));
        }
        if let Some(status) = &self.status {
            fields.push(("status", SqlValue::Text(Some(status.clone()))));
        }
        if let Some(slug) = &self.slug {
            fields.push(("slug", SqlValue::Text(Some(slug.clone()))));
        }
        if let Some(code) = &self.code {
            fields.push(("code", SqlValue::Text(Some(code.clone()))));
        }
        if let Some(price) = self.price {
            fields.push(("price", SqlValue::Float(price)));
        }
        if let Some(images) = &self.images {
            fields.push(("images", SqlValue::TextArray(images.clone())));
        }
        if let Some(tariffs) = &self.tariffs {
            fields.push(("tariffs", SqlValue::Tariffs(tariffs.clone())));
        }
        fields
    }
}

#[derive(Debug, Default, Clone)]
pub struct ProductFilters {
    /// Case-insensitive substring of name or code.
    pub search: Option<String>,
    pub status: Option<String>,
    pub category_id: Option<DbId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub category_id: Option<DbId>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort: Option<String>,
    pub direction: Option<SortDirection>,
}

impl ProductListQuery {
    pub fn filters(&self) -> ProductFilters {
        ProductFilters {
            search: self.search.clone(),
            status: self.status.clone(),
            category_id: self.category_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub product_id: DbId,
    pub date: NaiveDate,
    pub price: f64,
}
