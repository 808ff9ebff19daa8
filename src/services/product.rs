//! Products: validated writes, soft deletion, category pivot management and
//! the filtered/paginated listing.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};

use crate::dtos::pagination::{Page, PageRequest};
use crate::dtos::product::{ProductFilters, ProductInput};
use crate::dtos::sort::Sort;
use crate::error::AppError;
use crate::models::product::{Product, ProductWithCategories};
use crate::models::DbId;
use crate::services::base::{BaseService, CrudService, Entity};
use crate::validators;

impl Entity for Product {
    const TABLE: &'static str = "products";
    const COLUMNS: &'static str =
        "id, name, status, slug, code, price, images, tariffs, created_at, updated_at, deleted_at";
    const SOFT_DELETE: bool = true;
}

/// Columns a product listing may be sorted by.
pub const SORTABLE_COLUMNS: &[&str] = &[
    "id", "name", "code", "slug", "status", "price", "created_at", "updated_at",
];

/// Product row plus its categories flattened to `[{id, name}]`.
const SELECT_WITH_CATEGORIES: &str = "SELECT p.*, COALESCE((
        SELECT json_agg(json_build_object('id', c.id, 'name', c.name) ORDER BY c.name)
        FROM product_categories pc
        JOIN categories c ON c.id = pc.category_id
        WHERE pc.product_id = p.id
    ), '[]'::json) AS categories
    FROM products p";

#[derive(Clone)]
pub struct ProductService {
    base: BaseService<Product>,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            base: BaseService::new(pool),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_by_id_with_categories(
        &self,
        id: DbId,
    ) -> Result<Option<ProductWithCategories>, AppError> {
        let query = format!("{SELECT_WITH_CATEGORIES} WHERE p.id = $1 AND p.deleted_at IS NULL");
        let product = sqlx::query_as::<_, ProductWithCategories>(&query)
            .bind(id)
            .fetch_optional(self.base.pool())
            .await?;
        Ok(product)
    }

    /// Filtered, sorted page of live products with their categories. `count`
    /// is the number of matching rows before windowing.
    #[instrument(skip(self))]
    pub async fn get_all_with_categories(
        &self,
        filters: &ProductFilters,
        page: PageRequest,
        sort: &Sort,
    ) -> Result<Page<ProductWithCategories>, AppError> {
        let order_by = sort.order_by(SORTABLE_COLUMNS, "p")?;

        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        push_filters(&mut count_query, filters);
        let count: i64 = count_query
            .build_query_scalar()
            .fetch_one(self.base.pool())
            .await?;

        let mut query = QueryBuilder::<Postgres>::new(SELECT_WITH_CATEGORIES);
        push_filters(&mut query, filters);
        query.push(format!(" ORDER BY {order_by}, p.id"));
        query.push(" LIMIT ").push_bind(page.limit());
        query.push(" OFFSET ").push_bind(page.offset());
        let data = query
            .build_query_as::<ProductWithCategories>()
            .fetch_all(self.base.pool())
            .await?;

        Ok(Page { data, count })
    }

    /// Effective price of a live product on `date`; `None` if the product
    /// does not exist.
    pub async fn price_at(&self, id: DbId, date: NaiveDate) -> Result<Option<f64>, AppError> {
        let product = self.base.get_by_id(id).await?;
        Ok(product.map(|p| p.price_at(date)))
    }
}

#[async_trait]
impl CrudService for ProductService {
    type Row = Product;
    type Input = ProductInput;

    async fn get_all(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.base.get_all().await?)
    }

    async fn get_by_id(&self, id: DbId) -> Result<Option<Product>, AppError> {
        Ok(self.base.get_by_id(id).await?)
    }

    /// Row insert and category assignment share one transaction.
    async fn create(&self, input: ProductInput) -> Result<Product, AppError> {
        AppError::check(validators::product::validate(&input))?;

        let mut tx = self.base.pool().begin().await?;
        let product = BaseService::<Product>::insert_with(&mut *tx, &input)
            .await
            .map_err(map_write_error)?;
        if let Some(category_ids) = input.categories.as_deref() {
            assign_categories(&mut tx, product.id, category_ids)
                .await
                .map_err(map_write_error)?;
        }
        tx.commit().await?;

        info!(product_id = product.id, code = %product.code, "Product created");
        Ok(product)
    }

    /// Supplied `categories` (even empty) replace the existing set.
    async fn update(&self, id: DbId, input: ProductInput) -> Result<Product, AppError> {
        AppError::check(validators::product::validate(&input))?;

        let mut tx = self.base.pool().begin().await?;
        let product = BaseService::<Product>::update_with(&mut *tx, id, &input)
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| AppError::not_found("Product not found"))?;
        if let Some(category_ids) = input.categories.as_deref() {
            replace_categories(&mut tx, id, category_ids)
                .await
                .map_err(map_write_error)?;
        }
        tx.commit().await?;

        Ok(product)
    }

    /// Soft delete: the row is kept with `deleted_at` set.
    async fn delete(&self, id: DbId) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(self.base.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filters: &ProductFilters) {
    query.push(" WHERE p.deleted_at IS NULL");

    if let Some(term) = filters
        .search
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        let pattern = format!("%{}%", escape_like(term));
        query
            .push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.code ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(status) = filters.status.as_deref().filter(|s| !s.is_empty()) {
        query.push(" AND p.status = ").push_bind(status.to_string());
    }

    if let Some(category_id) = filters.category_id {
        query
            .push(" AND EXISTS (SELECT 1 FROM product_categories f WHERE f.product_id = p.id AND f.category_id = ")
            .push_bind(category_id)
            .push(")");
    }
}

/// Makes `%`, `_` and `\` match literally inside an ILIKE pattern.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

async fn assign_categories(
    conn: &mut PgConnection,
    product_id: DbId,
    category_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    let mut ids = category_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(());
    }

    let mut query =
        QueryBuilder::<Postgres>::new("INSERT INTO product_categories (product_id, category_id) ");
    query.push_values(ids, |mut row, category_id| {
        row.push_bind(product_id).push_bind(category_id);
    });
    query.build().execute(conn).await?;
    Ok(())
}

async fn replace_categories(
    conn: &mut PgConnection,
    product_id: DbId,
    category_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut *conn)
        .await?;
    assign_categories(conn, product_id, category_ids).await
}

fn map_write_error(err: sqlx::Error) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.code().as_deref() == Some("23503") {
            return AppError::invalid("categories", "One or more categories do not exist.");
        }
    }
    AppError::from_unique_violation(err, "Product code or slug already exists")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("milk"), "milk");
    }

    #[test]
    fn filters_compose_in_order() {
        let filters = ProductFilters {
            search: Some("  yog ".into()),
            status: Some("active".into()),
            category_id: Some(4),
        };
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        push_filters(&mut query, &filters);
        assert_eq!(
            query.sql(),
            "SELECT COUNT(*) FROM products p WHERE p.deleted_at IS NULL \
             AND (p.name ILIKE $1 OR p.code ILIKE $2) AND p.status = $3 \
             AND EXISTS (SELECT 1 FROM product_categories f WHERE f.product_id = p.id AND f.category_id = $4)"
        );
    }

    #[test]
    fn blank_filters_only_hide_deleted_rows() {
        let filters = ProductFilters {
            search: Some("   ".into()),
            status: Some(String::new()),
            category_id: None,
        };
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        push_filters(&mut query, &filters);
        assert_eq!(query.sql(), "SELECT COUNT(*) FROM products p WHERE p.deleted_at IS NULL");
    }
}
