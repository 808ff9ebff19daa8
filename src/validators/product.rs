use super::ValidationError;
use crate::dtos::product::ProductInput;
use crate::models::tariff::Tariff;

const MIN_NAME_LEN: usize = 3;

pub fn validate(input: &ProductInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if input
        .name
        .as_deref()
        .map(str::trim)
        .map_or(true, |n| n.chars().count() < MIN_NAME_LEN)
    {
        errors.push(ValidationError::new(
            "name",
            "Name is required and must be at least 3 characters long.",
        ));
    }

    if input.slug.as_deref().map_or(true, str::is_empty) {
        errors.push(ValidationError::new("slug", "Slug is required."));
    }

    if input.code.as_deref().map_or(true, str::is_empty) {
        errors.push(ValidationError::new("code", "Code (SKU) is required."));
    }

    if input.price.map_or(true, |p| p.is_nan() || p < 0.0) {
        errors.push(ValidationError::new(
            "price",
            "Price is required and must be greater than or equal to 0.",
        ));
    }

    if let Some(tariffs) = &input.tariffs {
        errors.extend(validate_tariffs(tariffs));
    }

    errors
}

/// One message per violated rule, tariffs numbered from 1.
pub fn validate_tariffs(tariffs: &[Tariff]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (index, tariff) in tariffs.iter().enumerate() {
        let n = index + 1;
        if tariff.price.is_nan() || tariff.price < 0.0 {
            errors.push(ValidationError::new(
                "tariffs",
                format!("Tariff #{n} has an invalid price."),
            ));
        }
        match (tariff.start_date, tariff.end_date) {
            (Some(start), Some(end)) if start > end => errors.push(ValidationError::new(
                "tariffs",
                format!("Tariff #{n} starts after it ends."),
            )),
            (Some(_), Some(_)) => {}
            _ => errors.push(ValidationError::new(
                "tariffs",
                format!("Tariff #{n} must have a start and an end date."),
            )),
        }
    }
    errors
}
