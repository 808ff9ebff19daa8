pub mod appointment;
pub mod category;
pub mod product;
pub mod tariff;

/// All primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
