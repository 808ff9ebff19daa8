use serde::Deserialize;

use crate::dtos::double_option;
use crate::models::DbId;
use crate::services::base::{Changeset, SqlValue};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    /// `null` detaches the category from its parent.
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<DbId>>,
    /// Set by the service on create.
    #[serde(skip)]
    pub entity_type: Option<String>,
}

impl Changeset for CategoryInput {
    fn fields(&self) -> Vec<(&'static str, SqlValue)> {
        let mut fields = Vec::new();
        if let Some(entity_type) = &self.entity_type {
            fields.push(("entity_type", SqlValue::Text(Some(entity_type.clone()))));
        }
        if let Some(name) = &self.name {
            fields.push(("name", SqlValue::Text(Some(name.trim().to_string()))));
        }
        if let Some(slug) = &self.slug {
            fields.push(("slug", SqlValue::Text(Some(slug.clone()))));
        }
        if let Some(description) = &self.description {
            fields.push(("description", SqlValue::Text(description.clone())));
        }
        if let Some(parent_id) = self.parent_id {
            fields.push(("parent_id", SqlValue::BigInt(parent_id)));
        }
        fields
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TreeQuery {
    #[serde(default)]
    pub nested: bool,
}
