//! # Error Types
//!
//! Domain-specific error types for offerdesk-core.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  offerdesk-core errors (this file)                                      │
//! │  ├── CoreError                                                          │
//! │  │   ├── NotFound         - catalog lookup miss                         │
//! │  │   ├── InvalidSelection - ancestor-selected invariant violated        │
//! │  │   ├── Computation      - negative quantity / negative price input    │
//! │  │   └── Validation       - wraps ValidationError                       │
//! │  └── ValidationError      - field-level input failures                  │
//! │                                                                         │
//! │  offerdesk-store errors (separate crate)                                │
//! │  └── StoreError           - document store failures                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Propagation Policy
//! - `NotFound` on a previously valid selection is recovered locally by the
//!   price resolver: the stale line is dropped and pricing continues.
//! - Everything else aborts the specific operation (toggle, finalize) and
//!   surfaces the kind plus the offending key or field. A rejected toggle
//!   leaves the selection state untouched; finalize never partially applies.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing engine errors.
///
/// These errors represent violations of the selection/pricing invariants.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A selection key does not resolve to a catalog node.
    ///
    /// ## When This Occurs
    /// - The node was removed from the catalog after it was selected
    /// - A stored offer references a product that no longer exists
    /// - A toggle was attempted against an id that was never in the catalog
    #[error("Catalog node not found: {key}")]
    NotFound { key: String },

    /// A selection violates the ancestor-selected invariant.
    ///
    /// ## When This Occurs
    /// - Selecting a sub-product whose parent product is not selected
    /// - Selecting a nested sub-product whose parent sub-product is not
    ///   selected
    /// - Setting a custom price for an unselected product
    ///
    /// The engine never auto-selects ancestors; the caller must select the
    /// parent first.
    #[error("Invalid selection for {key}: {reason}")]
    InvalidSelection { key: String, reason: String },

    /// A numeric input is outside the computable range.
    ///
    /// ## When This Occurs
    /// - Negative or zero quantity on a line item edit
    /// - Negative price fed into the resolver
    /// - Non-positive custom price override
    #[error("Computation error: {reason}")]
    Computation { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for the given selection key.
    pub fn not_found(key: impl Into<String>) -> Self {
        CoreError::NotFound { key: key.into() }
    }

    /// Creates an InvalidSelection error.
    pub fn invalid_selection(key: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidSelection {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates a Computation error.
    pub fn computation(reason: impl Into<String>) -> Self {
        CoreError::Computation {
            reason: reason.into(),
        }
    }

    /// True if this error may be recovered by dropping the affected line.
    ///
    /// Only `NotFound` qualifies: a selection referencing a since-removed
    /// catalog node must not sink the whole offer computation.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level validation errors.
///
/// Used for required-field checks on offer finalize and for recursive
/// catalog node validation on admin writes.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format or structure.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate child id under one product).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Catalog nodes may only nest product → sub-product → nested
    /// sub-product; anything deeper is rejected before it reaches pricing.
    #[error("catalog node '{id}' exceeds the maximum nesting depth of {max_depth}")]
    TooDeep { id: String, max_depth: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
