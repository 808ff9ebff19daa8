use serde::Serialize;
use sqlx::FromRow;

use super::{DbId, Timestamp};

/// Taxonomy kind for product categories.
pub const PRODUCT_TAXONOMY: &str = "product";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub entity_type: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryWithCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub category: Category,
    pub product_count: i64,
}

/// Category with its children, rebuilt from parent references.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: CategoryWithCount,
    pub children: Vec<CategoryNode>,
}
