use super::ValidationError;
use crate::dtos::appointment::AppointmentInput;

/// On update (`is_update`) product and date may be omitted; whatever is
/// supplied still has to make sense.
pub fn validate(input: &AppointmentInput, is_update: bool) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !is_update && input.product_id.map_or(true, |id| id == 0) {
        errors.push(ValidationError::new("product_id", "Product is required."));
    }

    if !is_update && input.date.is_none() {
        errors.push(ValidationError::new("date", "Date is required."));
    }

    if input.units.is_some_and(|u| u <= 0) {
        errors.push(ValidationError::new(
            "units",
            "Units must be greater than 0.",
        ));
    }

    if input.total.is_some_and(|t| t.is_nan() || t < 0.0) {
        errors.push(ValidationError::new(
            "total",
            "Total must be greater than or equal to 0.",
        ));
    }

    errors
}
