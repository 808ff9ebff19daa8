use std::str::FromStr;

use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("invalid sort direction: {other}")),
        }
    }
}

impl TryFrom<String> for SortDirection {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Column + direction for list queries. Defaults to newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub column: String,
    pub direction: SortDirection,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            column: "created_at".to_string(),
            direction: SortDirection::Desc,
        }
    }
}

impl Sort {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// Builds from optional query parameters, keeping defaults for what is missing.
    pub fn from_query(column: Option<String>, direction: Option<SortDirection>) -> Self {
        match column.filter(|c| !c.trim().is_empty()) {
            Some(column) => Self::new(column, direction.unwrap_or_default()),
            None => Self::default(),
        }
    }

    /// `ORDER BY` body for `alias.column`. The column must be one of `allowed`
    /// since it is interpolated into SQL.
    pub fn order_by(&self, allowed: &[&str], alias: &str) -> Result<String, AppError> {
        if !allowed.contains(&self.column.as_str()) {
            return Err(AppError::invalid(
                "sort",
                format!("Cannot sort by '{}'.", self.column),
            ));
        }
        Ok(format!("{alias}.{} {}", self.column, self.direction.as_sql()))
    }
}
