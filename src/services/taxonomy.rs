//! Product taxonomy (categories).

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use crate::dtos::category::CategoryInput;
use crate::error::AppError;
use crate::models::category::{Category, CategoryNode, CategoryWithCount, PRODUCT_TAXONOMY};
use crate::models::DbId;
use crate::services::base::{BaseService, CrudService, Entity};
use crate::validators;

impl Entity for Category {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static str =
        "id, entity_type, name, slug, description, parent_id, created_at, updated_at";
}

#[derive(Clone)]
pub struct TaxonomyService {
    base: BaseService<Category>,
}

impl TaxonomyService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            base: BaseService::new(pool),
        }
    }

    /// Flat list of product categories, roots first, each with the number of
    /// live products assigned to it.
    #[instrument(skip(self))]
    pub async fn get_tree(&self) -> Result<Vec<CategoryWithCount>, AppError> {
        let categories = sqlx::query_as::<_, CategoryWithCount>(
            "SELECT c.*, (
                SELECT COUNT(*)
                FROM product_categories pc
                JOIN products p ON p.id = pc.product_id
                WHERE pc.category_id = c.id AND p.deleted_at IS NULL
             ) AS product_count
             FROM categories c
             WHERE c.entity_type = $1
             ORDER BY c.parent_id ASC NULLS FIRST, c.name ASC",
        )
        .bind(PRODUCT_TAXONOMY)
        .fetch_all(self.base.pool())
        .await?;
        Ok(categories)
    }
}

#[async_trait]
impl CrudService for TaxonomyService {
    type Row = Category;
    type Input = CategoryInput;

    async fn get_all(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.base.get_all().await?)
    }

    async fn get_by_id(&self, id: DbId) -> Result<Option<Category>, AppError> {
        Ok(self.base.get_by_id(id).await?)
    }

    async fn create(&self, mut input: CategoryInput) -> Result<Category, AppError> {
        AppError::check(validators::category::validate(&input))?;
        input.entity_type = Some(PRODUCT_TAXONOMY.to_string());

        self.base.create(&input).await.map_err(map_write_error)
    }

    async fn update(&self, id: DbId, input: CategoryInput) -> Result<Category, AppError> {
        AppError::check(validators::category::validate(&input))?;

        self.base
            .update(id, &input)
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| AppError::not_found("Category not found"))
    }

    async fn delete(&self, id: DbId) -> Result<bool, AppError> {
        Ok(self.base.delete(id).await?)
    }
}

/// Rebuilds the hierarchy from parent references, keeping input order among
/// siblings. Rows whose parent is absent (or themselves) become roots; rows
/// only reachable through a cycle are left out.
pub fn assemble_tree(categories: Vec<CategoryWithCount>) -> Vec<CategoryNode> {
    let ids: HashSet<DbId> = categories.iter().map(|c| c.category.id).collect();
    let mut children: HashMap<DbId, Vec<CategoryWithCount>> = HashMap::new();
    let mut roots = Vec::new();

    for category in categories {
        match category.category.parent_id {
            Some(parent) if parent != category.category.id && ids.contains(&parent) => {
                children.entry(parent).or_default().push(category)
            }
            _ => roots.push(category),
        }
    }

    roots
        .into_iter()
        .map(|root| attach_children(root, &mut children))
        .collect()
}

fn attach_children(
    category: CategoryWithCount,
    children: &mut HashMap<DbId, Vec<CategoryWithCount>>,
) -> CategoryNode {
    let own = children.remove(&category.category.id).unwrap_or_default();
    CategoryNode {
        children: own
            .into_iter()
            .map(|child| attach_children(child, children))
            .collect(),
        category,
    }
}

fn map_write_error(err: sqlx::Error) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.code().as_deref() == Some("23503") {
            return AppError::invalid("parent_id", "Parent category not found.");
        }
    }
    AppError::from_unique_violation(err, "Category slug already exists")
}
