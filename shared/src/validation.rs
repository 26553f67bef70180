//! Validation helpers shared by the backend services

use crate::reference::parse_reference;

/// Maximum points a single checklist item may carry
pub const MAX_ITEM_POINTS: i32 = 100;

/// Certificate validity bounds in months
pub const MIN_VALIDITY_MONTHS: u32 = 1;
pub const MAX_VALIDITY_MONTHS: u32 = 60;

/// Required free-text fields must contain something beyond whitespace
pub fn validate_required_text(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("Value cannot be empty");
    }
    Ok(())
}

/// Checklist item weight must be positive and bounded
pub fn validate_points_possible(points: i32) -> Result<(), &'static str> {
    if points <= 0 {
        return Err("Points must be positive");
    }
    if points > MAX_ITEM_POINTS {
        return Err("Points exceed the per-item maximum");
    }
    Ok(())
}

/// Certificate validity must fall within the accepted window
pub fn validate_validity_months(months: u32) -> Result<(), &'static str> {
    if !(MIN_VALIDITY_MONTHS..=MAX_VALIDITY_MONTHS).contains(&months) {
        return Err("Validity months out of accepted range");
    }
    Ok(())
}

/// Reference numbers must match one of the known period-scoped formats
pub fn validate_reference_number(reference: &str) -> Result<(), &'static str> {
    if parse_reference(reference).is_none() {
        return Err("Malformed reference number");
    }
    Ok(())
}
