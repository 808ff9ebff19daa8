//! Generic CRUD over a single table.
//!
//! Each entity names its table and column list through [`Entity`]; write
//! payloads expose the fields they carry through [`Changeset`], so inserts and
//! partial updates are composed here once instead of per entity.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgExecutor, PgPool, Postgres, QueryBuilder};

use crate::error::AppError;
use crate::models::tariff::Tariff;
use crate::models::DbId;

/// A row type backed by one table.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    const TABLE: &'static str;
    const COLUMNS: &'static str;
    /// Soft-deletable tables hide rows with `deleted_at` set.
    const SOFT_DELETE: bool = false;
}

/// Value bound for one column of a write.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(Option<String>),
    BigInt(Option<i64>),
    Int(i32),
    Float(f64),
    Date(NaiveDate),
    TextArray(Vec<String>),
    Tariffs(Vec<Tariff>),
}

/// Write payload. Only the fields a caller supplied are returned, which is
/// what makes updates partial.
pub trait Changeset: Send + Sync {
    fn fields(&self) -> Vec<(&'static str, SqlValue)>;
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: SqlValue) {
    match value {
        SqlValue::Text(v) => qb.push_bind(v),
        SqlValue::BigInt(v) => qb.push_bind(v),
        SqlValue::Int(v) => qb.push_bind(v),
        SqlValue::Float(v) => qb.push_bind(v),
        SqlValue::Date(v) => qb.push_bind(v),
        SqlValue::TextArray(v) => qb.push_bind(v),
        SqlValue::Tariffs(v) => qb.push_bind(sqlx::types::Json(v)),
    };
}

fn live_filter<E: Entity>() -> &'static str {
    if E::SOFT_DELETE {
        " AND deleted_at IS NULL"
    } else {
        ""
    }
}

/// Uniform operations every entity service offers.
#[async_trait]
pub trait CrudService {
    type Row: Send;
    type Input: Send;

    async fn get_all(&self) -> Result<Vec<Self::Row>, AppError>;
    async fn get_by_id(&self, id: DbId) -> Result<Option<Self::Row>, AppError>;
    async fn create(&self, input: Self::Input) -> Result<Self::Row, AppError>;
    async fn update(&self, id: DbId, input: Self::Input) -> Result<Self::Row, AppError>;
    /// Returns `false` when no row matched.
    async fn delete(&self, id: DbId) -> Result<bool, AppError>;
}

pub struct BaseService<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for BaseService<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> BaseService<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// All rows, newest first.
    pub async fn get_all(&self) -> Result<Vec<E>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE TRUE{} ORDER BY created_at DESC",
            E::COLUMNS,
            E::TABLE,
            live_filter::<E>()
        );
        sqlx::query_as::<_, E>(&query).fetch_all(&self.pool).await
    }

    pub async fn get_by_id(&self, id: DbId) -> Result<Option<E>, sqlx::Error> {
        Self::find_with(&self.pool, id).await
    }

    pub async fn create(&self, input: &dyn Changeset) -> Result<E, sqlx::Error> {
        Self::insert_with(&self.pool, input).await
    }

    pub async fn update(&self, id: DbId, input: &dyn Changeset) -> Result<Option<E>, sqlx::Error> {
        Self::update_with(&self.pool, id, input).await
    }

    /// Physically removes the row.
    pub async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_with<'c>(
        executor: impl PgExecutor<'c>,
        id: DbId,
    ) -> Result<Option<E>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1{}",
            E::COLUMNS,
            E::TABLE,
            live_filter::<E>()
        );
        sqlx::query_as::<_, E>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Inserts the supplied fields and returns the stored row.
    pub async fn insert_with<'c>(
        executor: impl PgExecutor<'c>,
        input: &dyn Changeset,
    ) -> Result<E, sqlx::Error> {
        let (columns, values): (Vec<_>, Vec<_>) = input.fields().into_iter().unzip();

        let mut qb = QueryBuilder::<Postgres>::new(format!("INSERT INTO {} ", E::TABLE));
        if columns.is_empty() {
            qb.push("DEFAULT VALUES");
        } else {
            qb.push("(").push(columns.join(", ")).push(") VALUES (");
            for (i, value) in values.into_iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                push_value(&mut qb, value);
            }
            qb.push(")");
        }
        qb.push(" RETURNING ").push(E::COLUMNS);

        qb.build_query_as::<E>().fetch_one(executor).await
    }

    /// Applies the supplied fields to row `id`. `None` when the row does not
    /// exist (or is soft-deleted). An empty changeset just reads the row.
    pub async fn update_with<'c>(
        executor: impl PgExecutor<'c>,
        id: DbId,
        input: &dyn Changeset,
    ) -> Result<Option<E>, sqlx::Error> {
        let fields = input.fields();
        if fields.is_empty() {
            return Self::find_with(executor, id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET ", E::TABLE));
        for (column, value) in fields {
            qb.push(column).push(" = ");
            push_value(&mut qb, value);
            qb.push(", ");
        }
        qb.push("updated_at = NOW() WHERE id = ").push_bind(id);
        qb.push(live_filter::<E>());
        qb.push(" RETURNING ").push(E::COLUMNS);

        qb.build_query_as::<E>().fetch_optional(executor).await
    }
}
