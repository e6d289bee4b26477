//! # Validation Module
//!
//! Input validation rules for Kirana POS.
//!
//! Validation runs in the repository layer before any row is written;
//! the database constraints (NOT NULL, UNIQUE, FK) remain the final
//! backstop. Each rule is a small free function so callers can compose
//! exactly the checks an operation needs.

use crate::error::{ValidationError, ValidationResult};
use crate::MAX_BATCH_LEN;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (user, store or product).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use kirana_core::validation::validate_name;
///
/// assert!(validate_name("name", "Dolo 650").is_ok());
/// assert!(validate_name("name", "   ").is_err());
/// ```
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a product batch code.
///
/// ## Rules
/// - At most 12 characters
/// - Empty is allowed (batch is optional; store `None` instead)
pub fn validate_batch(batch: &str) -> ValidationResult<()> {
    if batch.chars().count() > MAX_BATCH_LEN {
        return Err(ValidationError::TooLong {
            field: "batch".to_string(),
            max: MAX_BATCH_LEN,
        });
    }

    Ok(())
}

/// Validates a login phone number.
///
/// ## Rules
/// - 9 to 20 characters after trimming
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if phone.len() < 9 {
        return Err(ValidationError::TooShort {
            field: "phone".to_string(),
            min: 9,
        });
    }

    if phone.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: 20,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (both search paths treat that as "no matches")
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a bill line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level. Unlike a bill line quantity, zero is fine.
pub fn validate_stock(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a percentage rate (discount or GST).
///
/// ## Rules
/// - Must be finite and within [0, 100]
///
/// ## Example
/// ```rust
/// use kirana_core::validation::validate_percent;
///
/// assert!(validate_percent("gst_percent", 18.0).is_ok());
/// assert!(validate_percent("discount_percent", 101.0).is_err());
/// assert!(validate_percent("discount_percent", -5.0).is_err());
/// ```
pub fn validate_percent(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a product MRP.
///
/// ## Rules
/// - Must be finite and non-negative (zero allowed for free samples)
pub fn validate_mrp(mrp: f64) -> ValidationResult<()> {
    if !mrp.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "mrp".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if mrp < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "mrp".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use kirana_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Crocin Advance").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_batch() {
        assert!(validate_batch("B1204-X").is_ok());
        assert!(validate_batch("ABCDEFGHIJKL").is_ok()); // exactly 12
        assert!(validate_batch("ABCDEFGHIJKLM").is_err()); // 13
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("+91 98765 43210").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(500).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_stock_allows_zero() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_percent() {
        assert!(validate_percent("gst_percent", 0.0).is_ok());
        assert!(validate_percent("gst_percent", 100.0).is_ok());
        assert!(validate_percent("gst_percent", 100.1).is_err());
        assert!(validate_percent("gst_percent", -0.1).is_err());
        assert!(validate_percent("gst_percent", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_mrp() {
        assert!(validate_mrp(0.0).is_ok());
        assert!(validate_mrp(149.50).is_ok());
        assert!(validate_mrp(-1.0).is_err());
        assert!(validate_mrp(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  dolo  ").unwrap(), "dolo");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(200)).is_err());
    }
}
