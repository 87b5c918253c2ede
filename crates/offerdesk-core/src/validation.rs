//! # Validation Module
//!
//! Input validation utilities shared by the catalog admin operations, the
//! selection state, and the offer record builder.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (Rust)                                           │
//! │  ├── Field-level checks reused by catalog writes and offer finalize    │
//! │  └── The same rules the price resolver assumes: malformed nodes are    │
//! │      rejected before they can ever reach pricing                       │
//! │                                                                         │
//! │  Defense in depth: the engine never trusts the form layer              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::{Money, Rate};
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a catalog node id.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 64 characters
/// - Should contain only alphanumeric characters, hyphens, underscores
///   (ids like `website-basic` or `extra-pages` are slugs, not labels)
///
/// ## Example
/// ```rust
/// use offerdesk_core::validation::validate_node_id;
///
/// assert!(validate_node_id("website-basic").is_ok());
/// assert!(validate_node_id("").is_err());
/// assert!(validate_node_id("has space").is_err());
/// ```
pub fn validate_node_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: 64,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a catalog node label.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_label(label: &str) -> ValidationResult<()> {
    let label = label.trim();

    if label.is_empty() {
        return Err(ValidationError::Required {
            field: "label".to_string(),
        });
    }

    if label.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "label".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a category name.
///
/// Categories are free-form display names ("Website Development"), so only
/// emptiness and length are checked.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if category.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a catalog price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed: it is the custom-price sentinel, meaning the operator
///   supplies a price per offer
///
/// ## Example
/// ```rust
/// use offerdesk_core::money::Money;
/// use offerdesk_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(50000)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());      // sentinel
/// assert!(validate_price(Money::from_cents(-1)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a tax rate.
///
/// ## Rules
/// - Must be between 0 and 10000 bps (0% to 100%)
pub fn validate_tax_rate(rate: Rate) -> ValidationResult<()> {
    if rate.bps() > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "taxPercent".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates an offer validity period in days.
///
/// ## Rules
/// - Must be at least 1 day
/// - Capped at 365 days (an "offer" valid for years is a contract)
pub fn validate_validity_days(days: i64) -> ValidationResult<()> {
    if days < 1 || days > 365 {
        return Err(ValidationError::OutOfRange {
            field: "validityDays".to_string(),
            min: 1,
            max: 365,
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
    fn test_validate_node_id() {
        assert!(validate_node_id("website-basic").is_ok());
        assert!(validate_node_id("extra_pages").is_ok());
        assert!(validate_node_id("SEO1").is_ok());

        assert!(validate_node_id("").is_err());
        assert!(validate_node_id("   ").is_err());
        assert!(validate_node_id("has space").is_err());
        assert!(validate_node_id(&"a".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_label() {
        assert!(validate_label("Basic Website Package").is_ok());
        assert!(validate_label("").is_err());
        assert!(validate_label(&"a".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category("Website Development").is_ok());
        assert!(validate_category("  ").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::from_cents(50000)).is_ok());
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_tax_rate() {
        assert!(validate_tax_rate(Rate::from_bps(0)).is_ok());
        assert!(validate_tax_rate(Rate::from_bps(2400)).is_ok());
        assert!(validate_tax_rate(Rate::from_bps(10000)).is_ok());
        assert!(validate_tax_rate(Rate::from_bps(10001)).is_err());
    }

    #[test]
    fn test_validate_validity_days() {
        assert!(validate_validity_days(14).is_ok());
        assert!(validate_validity_days(1).is_ok());
        assert!(validate_validity_days(0).is_err());
        assert!(validate_validity_days(400).is_err());
    }
}
