//! # Validation Module
//!
//! Input validation for ledger operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Deserialization (serde)                                  │
//! │  ├── Action payload shape, enum strings, number types              │
//! │  └── Unknown action names rejected before anything runs            │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE (business rules)                             │
//! │  ├── Required fields, positive amounts                             │
//! │  └── Runs BEFORE any write — a ValidationError guarantees the      │
//! │      store was not touched                                         │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                        │
//! │  └── NOT NULL, foreign keys, CHECK constraints                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN};

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required name field (customer, product, supplier, staff).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a required description (sale / adjustment / expense text).
pub fn validate_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

/// Loosely validates an optional email address.
///
/// Just a sanity check; deliverability is not our problem.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        });
    }
    Ok(())
}

/// Validates a required entity id.
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Amount Validators
// =============================================================================

/// Validates an amount that must be strictly positive.
///
/// Used for sale totals, payment inputs (the sign flip happens inside the
/// coordinator, the caller always submits a positive number), and expense
/// amounts.
pub fn validate_positive_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a counted drawer amount. Zero is fine; negative cash is not.
pub fn validate_counted_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a stock adjustment quantity.
///
/// Signed quantities are the point (negative decreases stock), but a zero
/// quantity is a no-op booking and rejected.
pub fn validate_adjustment_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity == 0 {
        return Err(ValidationError::Required {
            field: "quantity".to_string(),
        });
    }
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
        assert!(validate_name("Ahmet Yılmaz").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"a".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("kuzu pirzola, kıyma").is_ok());
        assert!(validate_description("").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ahmet@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ahmet@").is_err());
    }

    #[test]
    fn test_validate_positive_amount() {
        assert!(validate_positive_amount("total", Money::from_kurus(12550)).is_ok());
        assert!(validate_positive_amount("total", Money::zero()).is_err());
        assert!(validate_positive_amount("total", Money::from_kurus(-100)).is_err());
    }

    #[test]
    fn test_validate_counted_amount() {
        assert!(validate_counted_amount("countedCash", Money::zero()).is_ok());
        assert!(validate_counted_amount("countedCash", Money::from_kurus(240000)).is_ok());
        assert!(validate_counted_amount("countedCash", Money::from_kurus(-1)).is_err());
    }

    #[test]
    fn test_validate_adjustment_quantity() {
        assert!(validate_adjustment_quantity(-9).is_ok());
        assert!(validate_adjustment_quantity(25).is_ok());
        assert!(validate_adjustment_quantity(0).is_err());
    }
}
