use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;
use crate::dtos::category::CategoryInput;

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("slug pattern compiles"));

pub fn validate(input: &CategoryInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if input.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
        errors.push(ValidationError::new("name", "Name is required."));
    }

    match input.slug.as_deref() {
        None => errors.push(ValidationError::new("slug", "Slug is required.")),
        Some(slug) if slug.trim().is_empty() => {
            errors.push(ValidationError::new("slug", "Slug is required."))
        }
        Some(slug) if !SLUG_PATTERN.is_match(slug) => errors.push(ValidationError::new(
            "slug",
            "Slug may only contain lowercase letters, digits and hyphens.",
        )),
        Some(_) => {}
    }

    errors
}
