//! # Totals Aggregator
//!
//! Folds a line-item list and the offer-level discount and tax settings
//! into one `Totals` summary.
//!
//! ## The Money Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal        = Σ line_total                                         │
//! │  discount_amount = clamp(requested discount, 0, subtotal)               │
//! │  taxable         = subtotal − discount_amount        (never negative)   │
//! │  tax_amount      = taxable × tax rate                (half-up rounding) │
//! │  total           = taxable + tax_amount                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tax applies to the discounted base, not the raw subtotal. The clamp
//! means an over-generous discount produces a zero-total offer instead of
//! a negative one.

use crate::money::{Money, Rate};
use crate::types::{Discount, LineItem, Totals};

/// Computes the offer totals from priced line items.
///
/// Pure arithmetic over already-validated inputs, so it cannot fail; every
/// invariant on `Totals` holds by construction.
pub fn calculate_totals(items: &[LineItem], discount: &Discount, tax: Rate) -> Totals {
    let subtotal: Money = items.iter().map(|item| item.line_total).sum();

    let requested = match discount {
        Discount::Absolute(amount) => *amount,
        Discount::Percent(rate) => rate.apply(subtotal),
    };
    let discount_amount = requested.clamp(Money::zero(), subtotal);

    let taxable = subtotal - discount_amount;
    let tax_amount = tax.apply(taxable);

    Totals {
        subtotal,
        discount_amount,
        taxable,
        tax_amount,
        total: taxable + tax_amount,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
