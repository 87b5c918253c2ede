//! # Shared Domain Types
//!
//! The JSON-facing types exchanged between the engine, the document store,
//! and the TypeScript frontend: line items, metered extras, discounts,
//! totals, and authorship metadata.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog + SelectionState                                               │
//! │        │                                                                │
//! │        ▼  PriceResolver::resolve_all()                                  │
//! │  Vec<LineItem>  ──── calculate_totals() ────▶  Totals                   │
//! │        │                                          │                     │
//! │        └────────────── OfferDraft::finalize ──────┘                     │
//! │                               │                                         │
//! │                               ▼                                         │
//! │                         OfferRecord  (frozen, persisted)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every type here derives `TS` so the frontend bindings stay in lockstep
//! with the Rust contract.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Rate};
use crate::validation::validate_quantity;

// =============================================================================
// Metered Extras
// =============================================================================

/// Quantity-driven add-ons not tied to any catalog node.
///
/// An extra belongs to a category ("3 extra videos for Social Media"), has a
/// fixed unit price, and produces one synthetic line item per
/// `(category, kind)` pair with positive quantity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum ExtraKind {
    /// An additional website page.
    ExtraPage,
    /// An additional produced video.
    ExtraVideo,
    /// An additional social media post.
    ExtraPost,
    /// An additional revision round.
    ExtraRevision,
}

impl ExtraKind {
    /// All extra kinds, in display order.
    pub const ALL: [ExtraKind; 4] = [
        ExtraKind::ExtraPage,
        ExtraKind::ExtraVideo,
        ExtraKind::ExtraPost,
        ExtraKind::ExtraRevision,
    ];

    /// The single price table for extras.
    ///
    /// Selection and resolution both read this table, so a price change in
    /// one place is a price change everywhere.
    pub const fn unit_price(&self) -> Money {
        match self {
            ExtraKind::ExtraPage => Money::from_cents(10000),    // €100.00
            ExtraKind::ExtraVideo => Money::from_cents(5000),    // €50.00
            ExtraKind::ExtraPost => Money::from_cents(2500),     // €25.00
            ExtraKind::ExtraRevision => Money::from_cents(4000), // €40.00
        }
    }

    /// Display label for offer lines and documents.
    pub const fn label(&self) -> &'static str {
        match self {
            ExtraKind::ExtraPage => "Extra Page",
            ExtraKind::ExtraVideo => "Extra Video",
            ExtraKind::ExtraPost => "Extra Post",
            ExtraKind::ExtraRevision => "Extra Revision",
        }
    }

    /// Stable identifier used as the line item id.
    pub const fn id(&self) -> &'static str {
        match self {
            ExtraKind::ExtraPage => "extra-page",
            ExtraKind::ExtraVideo => "extra-video",
            ExtraKind::ExtraPost => "extra-post",
            ExtraKind::ExtraRevision => "extra-revision",
        }
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// The sub-products folded into a priced product line, by id.
///
/// Carried so a stored offer can be reopened for editing: the flat line
/// list is enough to rebuild the selection that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SubProductRef {
    /// Sub-product id under the parent product.
    pub id: String,
    /// Selected nested sub-product ids under this sub-product.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<String>,
}

/// What a line item represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export)]
pub enum LineItemKind {
    /// A catalog product, with the sub-product selections folded into its
    /// `sub_total`.
    #[serde(rename_all = "camelCase")]
    Product {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        sub_products: Vec<SubProductRef>,
    },
    /// A synthetic metered-extra line.
    #[serde(rename_all = "camelCase")]
    Extra { kind: ExtraKind },
}

/// One priced row of an offer.
///
/// ## Pricing Formula
/// `line_total = unit_price × quantity + sub_total`
///
/// `sub_total` is the one-time sum of the selected sub-products (and their
/// nested selections). It is deliberately NOT multiplied by the quantity:
/// buying three websites with an SEO setup means three websites and one SEO
/// setup. Extras always carry a zero `sub_total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Catalog category (or the extra's category).
    pub category: String,
    /// Product id, or the extra kind's stable id.
    pub item_id: String,
    /// Display label.
    pub label: String,
    /// Short description carried from the catalog node.
    #[serde(default)]
    pub description: String,
    /// Effective unit price (catalog price, or custom override, or the
    /// extra's table price).
    pub unit_price: Money,
    /// Units of the base item. Always >= 1.
    pub quantity: i64,
    /// One-time sub-product sum. Zero for extras.
    pub sub_total: Money,
    /// `unit_price × quantity + sub_total`.
    pub line_total: Money,
    /// Product or extra discriminant, carrying round-trip data.
    pub kind: LineItemKind,
}

impl LineItem {
    /// Changes the quantity and recomputes the line total with the full
    /// formula. Never multiplies the sub-product sum.
    ///
    /// ## Errors
    /// `CoreError::Computation` when the quantity is below 1 or above
    /// `MAX_LINE_QUANTITY`.
    pub fn set_quantity(&mut self, qty: i64) -> CoreResult<()> {
        validate_quantity(qty).map_err(|_| {
            CoreError::computation(format!(
                "quantity {} is out of range for line '{}'",
                qty, self.item_id
            ))
        })?;

        self.quantity = qty;
        self.line_total = self.unit_price.multiply_quantity(qty) + self.sub_total;
        Ok(())
    }

    /// True for synthetic metered-extra lines.
    pub fn is_extra(&self) -> bool {
        matches!(self.kind, LineItemKind::Extra { .. })
    }
}

// =============================================================================
// Discounts & Totals
// =============================================================================

/// Offer-level discount configuration.
///
/// Both modes are clamped to `[0, subtotal]` by the totals aggregator, so a
/// discount can never push the taxable base negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "mode", content = "value", rename_all = "camelCase")]
#[ts(export)]
pub enum Discount {
    /// A fixed amount off the subtotal.
    Absolute(Money),
    /// A percentage of the subtotal, in basis points.
    Percent(Rate),
}

impl Default for Discount {
    fn default() -> Self {
        Discount::Absolute(Money::zero())
    }
}

/// The aggregated money summary of an offer.
///
/// Invariants (enforced by `calculate_totals`, checked again nowhere):
/// - `0 <= discount_amount <= subtotal`
/// - `taxable = subtotal - discount_amount >= 0`
/// - `total = taxable + tax_amount`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Totals {
    /// Sum of all line totals.
    pub subtotal: Money,
    /// The clamped discount actually applied.
    pub discount_amount: Money,
    /// Base the tax is computed on.
    pub taxable: Money,
    /// Tax portion, rounded half up.
    pub tax_amount: Money,
    /// Final amount due.
    pub total: Money,
}

// =============================================================================
// Authorship
// =============================================================================

/// Who created an offer record. Identity comes from the surrounding
/// application; the engine just records it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreatedBy {
    /// Opaque user id from the auth layer.
    pub uid: String,
    /// Email for display on the offer document, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CreatedBy {
    pub fn new(uid: impl Into<String>, email: Option<String>) -> Self {
        CreatedBy {
            uid: uid.into(),
            email,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_LINE_QUANTITY;

    fn product_line() -> LineItem {
        LineItem {
            category: "Website Development".to_string(),
            item_id: "website-basic".to_string(),
            label: "Basic Website".to_string(),
            description: String::new(),
            unit_price: Money::from_cents(50000),
            quantity: 1,
            sub_total: Money::from_cents(15000),
            line_total: Money::from_cents(65000),
            kind: LineItemKind::Product {
                sub_products: vec![SubProductRef {
                    id: "extra-pages".to_string(),
                    nested: vec!["translation".to_string()],
                }],
            },
        }
    }

    #[test]
    fn test_extra_price_table() {
        assert_eq!(ExtraKind::ExtraVideo.unit_price().cents(), 5000);
        assert_eq!(ExtraKind::ExtraPage.unit_price().cents(), 10000);

        // Every kind has a positive table price and a stable id.
        for kind in ExtraKind::ALL {
            assert!(kind.unit_price().is_positive());
            assert!(!kind.id().is_empty());
        }
    }

    #[test]
    fn test_set_quantity_uses_full_formula() {
        let mut line = product_line();

        // 2 × 500.00 + 150.00 = 1150.00, not 2 × 650.00.
        line.set_quantity(2).unwrap();
        assert_eq!(line.line_total.cents(), 115000);

        // Back to 1 restores the original total.
        line.set_quantity(1).unwrap();
        assert_eq!(line.line_total.cents(), 65000);
    }

    #[test]
    fn test_set_quantity_rejects_out_of_range() {
        let mut line = product_line();

        assert!(matches!(
            line.set_quantity(0).unwrap_err(),
            CoreError::Computation { .. }
        ));
        assert!(line.set_quantity(-3).is_err());
        assert!(line.set_quantity(MAX_LINE_QUANTITY + 1).is_err());

        // A rejected edit leaves the line untouched.
        assert_eq!(line.quantity, 1);
        assert_eq!(line.line_total.cents(), 65000);
    }

    #[test]
    fn test_line_item_json_contract() {
        let line = product_line();
        let json = serde_json::to_value(&line).unwrap();

        assert_eq!(json["itemId"], "website-basic");
        assert_eq!(json["unitPrice"], 50000);
        assert_eq!(json["lineTotal"], 65000);
        assert_eq!(json["kind"]["type"], "product");
        assert_eq!(json["kind"]["subProducts"][0]["id"], "extra-pages");

        let back: LineItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, line);
    }

    #[test]
    fn test_discount_serde_shape() {
        let json = serde_json::to_value(Discount::Percent(Rate::from_bps(1000))).unwrap();
        assert_eq!(json["mode"], "percent");

        let json = serde_json::to_value(Discount::Absolute(Money::from_cents(5000))).unwrap();
        assert_eq!(json["mode"], "absolute");
        assert_eq!(json["value"], 5000);
    }
}
