//! # Validation Module
//!
//! Business-rule validation helpers shared by the workflows.
//!
//! The request layer (out of scope here) is responsible for structural
//! checks like field presence and JSON shape; these validators enforce the
//! rules that survive past decoding: name lengths, positive quantities and
//! amounts, and the fixed `YYYY-MM-DD` calendar-date format.

use chrono::NaiveDate;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Fixed calendar-date format for pickup and due dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// String Validators
// =============================================================================

/// Validates a client or product display name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at least 2 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() < 2 {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: 2,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity in grams. Must be strictly positive.
pub fn validate_quantity_grams(grams: i64) -> ValidationResult<()> {
    if grams <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a per-kilogram price in cents. Must be strictly positive.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price per kg".to_string(),
        });
    }

    Ok(())
}

/// Validates a payment amount in cents. Must be strictly positive.
pub fn validate_payment_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Date Parsing
// =============================================================================

/// Parses a calendar date under the fixed `YYYY-MM-DD` format.
///
/// ## Example
/// ```rust
/// use boucherie_core::validation::parse_calendar_date;
///
/// assert!(parse_calendar_date("2026-03-15").is_ok());
/// assert!(parse_calendar_date("15/03/2026").is_err());
/// assert!(parse_calendar_date("2026-02-30").is_err());
/// ```
pub fn parse_calendar_date(value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidFormat {
            field: "pickup date".to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Mme Dupont").is_ok());
        assert!(validate_name("Al").is_ok());

        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("A").is_err());
    }

    #[test]
    fn test_validate_quantity_grams() {
        assert!(validate_quantity_grams(1).is_ok());
        assert!(validate_quantity_grams(2500).is_ok());

        assert!(validate_quantity_grams(0).is_err());
        assert!(validate_quantity_grams(-100).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(1299).is_ok());

        assert!(validate_price_cents(0).is_err());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(500).is_ok());
        assert!(validate_payment_amount(0).is_err());
        assert!(validate_payment_amount(-500).is_err());
    }

    #[test]
    fn test_parse_calendar_date() {
        assert_eq!(
            parse_calendar_date("2026-03-15").unwrap(),
            chrono::NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
        );
        assert!(parse_calendar_date(" 2026-03-15 ").is_ok());

        assert!(parse_calendar_date("").is_err());
        assert!(parse_calendar_date("15/03/2026").is_err());
        assert!(parse_calendar_date("2026-13-01").is_err());
        assert!(parse_calendar_date("2026-02-30").is_err());
        assert!(parse_calendar_date("2026-03-15T10:00:00Z").is_err());
    }
}
