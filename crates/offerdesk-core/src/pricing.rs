//! # Price Resolver
//!
//! Turns a catalog plus a selection into priced line items.
//!
//! ## Resolution Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      PriceResolver                                      │
//! │                                                                         │
//! │  for each selected product:                                             │
//! │    1. effective unit price                                              │
//! │         catalog price ──▶ non-zero? use it                              │
//! │                      └──▶ zero sentinel? use custom price, else 0       │
//! │    2. sub_total = Σ (sub price + Σ selected nested prices)              │
//! │    3. line_total = unit_price × qty + sub_total                         │
//! │         (sub_total is one-time: NEVER multiplied by qty)                │
//! │                                                                         │
//! │  then one synthetic line per (category, extra kind) with qty > 0        │
//! │                                                                         │
//! │  A selected node that vanished from the catalog drops its line;         │
//! │  any other failure aborts the whole resolution.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nested sub-products never consult the custom-price override; the
//! sentinel is a product-level contract only.

use crate::catalog::{Catalog, ProductKey};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::selection::SelectionState;
use crate::types::{LineItem, LineItemKind, SubProductRef};

// =============================================================================
// Price Resolver
// =============================================================================

/// Borrows a catalog and a selection; owns nothing, mutates nothing.
pub struct PriceResolver<'a> {
    catalog: &'a Catalog,
    selection: &'a SelectionState,
}

impl<'a> PriceResolver<'a> {
    pub fn new(catalog: &'a Catalog, selection: &'a SelectionState) -> Self {
        PriceResolver { catalog, selection }
    }

    /// Prices one selected product, quantity 1.
    ///
    /// Strict: the product and every selected sub-product and nested
    /// sub-product under it must still resolve in the catalog.
    ///
    /// ## Errors
    /// - `NotFound` when any addressed node is missing
    /// - `Computation` when a catalog or custom price is negative
    pub fn resolve_product(&self, key: &ProductKey) -> CoreResult<LineItem> {
        let node = self
            .catalog
            .find_product(key)
            .ok_or_else(|| CoreError::not_found(key.to_string()))?;

        let unit_price = self.effective_unit_price(key, node.price)?;

        let mut sub_total = Money::zero();
        let mut sub_refs = Vec::new();

        for sub_id in self.selection.selected_sub_products(key) {
            let sub_path = format!("{}/{}", key, sub_id);
            let sub_node = node
                .child(sub_id)
                .ok_or_else(|| CoreError::not_found(sub_path.clone()))?;
            check_price(sub_node.price, &sub_path)?;
            sub_total += sub_node.price;

            let mut nested_ids = Vec::new();
            for nested_id in self.selection.selected_nested(key, sub_id) {
                let nested_path = format!("{}/{}", sub_path, nested_id);
                let nested_node = sub_node
                    .child(nested_id)
                    .ok_or_else(|| CoreError::not_found(nested_path.clone()))?;
                check_price(nested_node.price, &nested_path)?;
                sub_total += nested_node.price;
                nested_ids.push(nested_id.to_string());
            }

            sub_refs.push(SubProductRef {
                id: sub_id.to_string(),
                nested: nested_ids,
            });
        }

        Ok(LineItem {
            category: key.category.clone(),
            item_id: key.product_id.clone(),
            label: node.label.clone(),
            description: node.description.clone(),
            unit_price,
            quantity: 1,
            sub_total,
            line_total: unit_price + sub_total,
            kind: LineItemKind::Product {
                sub_products: sub_refs,
            },
        })
    }

    /// Prices the whole selection: every selected product, then one
    /// synthetic line per metered extra.
    ///
    /// Best-effort over stale selections: a product whose catalog node has
    /// vanished is dropped rather than failing the computation. Every other
    /// error aborts.
    pub fn resolve_all(&self) -> CoreResult<Vec<LineItem>> {
        let mut items = Vec::new();

        for key in self.selection.selected_products() {
            match self.resolve_product(key) {
                Ok(item) => items.push(item),
                Err(err) if err.is_recoverable() => continue,
                Err(err) => return Err(err),
            }
        }

        for (category, kind, qty) in self.selection.extras() {
            let unit_price = kind.unit_price();
            items.push(LineItem {
                category: category.to_string(),
                item_id: kind.id().to_string(),
                label: kind.label().to_string(),
                description: String::new(),
                unit_price,
                quantity: qty,
                sub_total: Money::zero(),
                line_total: unit_price.multiply_quantity(qty),
                kind: LineItemKind::Extra { kind },
            });
        }

        Ok(items)
    }

    /// Catalog price when non-zero; otherwise the custom override when
    /// present; otherwise zero (an unpriced sentinel line, visible in the
    /// draft so the operator notices).
    fn effective_unit_price(&self, key: &ProductKey, catalog_price: Money) -> CoreResult<Money> {
        if catalog_price.is_negative() {
            return Err(CoreError::computation(format!(
                "catalog price for {} is negative",
                key
            )));
        }

        if !catalog_price.is_zero() {
            return Ok(catalog_price);
        }

        match self.selection.custom_price(key) {
            Some(custom) if custom.is_negative() => Err(CoreError::computation(format!(
                "custom price for {} is negative",
                key
            ))),
            Some(custom) => Ok(custom),
            None => Ok(Money::zero()),
        }
    }
}

fn check_price(price: Money, path: &str) -> CoreResult<()> {
    if price.is_negative() {
        return Err(CoreError::computation(format!(
            "catalog price for {} is negative",
            path
        )));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
