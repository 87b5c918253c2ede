//! # Selection State
//!
//! The per-offer record of what the operator has picked. The shared catalog
//! is never flagged or mutated; all choice lives here, keyed by full paths.
//!
//! ## Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       SelectionState                                    │
//! │                                                                         │
//! │  products       {Web/website-basic, Web/website-custom}                 │
//! │  sub_products   Web/website-basic → {extra-pages, seo-setup}            │
//! │  nested         (Web/website-basic, extra-pages) → {translation}        │
//! │  custom_prices  Web/website-custom → €1200.00                           │
//! │  extras         ("Social Media", ExtraVideo) → 3                        │
//! │                                                                         │
//! │  Invariant: every sub-product entry has its product selected, and       │
//! │  every nested entry has its sub-product selected. Toggles enforce       │
//! │  this on the way in; deselection cascades keep it true on the way out.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation validates fully before touching the state, so a rejected
//! call is guaranteed to leave the selection exactly as it was.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{Catalog, ProductKey, SelectionKey};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{ExtraKind, LineItem, LineItemKind};
use crate::MAX_LINE_QUANTITY;

// =============================================================================
// Selection State
// =============================================================================

/// Normalized selection for one offer in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Selected top-level products.
    products: BTreeSet<ProductKey>,

    /// Selected sub-product ids per product.
    sub_products: BTreeMap<ProductKey, BTreeSet<String>>,

    /// Selected nested sub-product ids per (product, sub-product).
    nested: BTreeMap<(ProductKey, String), BTreeSet<String>>,

    /// Operator-supplied prices for zero-sentinel products. Consulted by
    /// the resolver only while the catalog price is zero; the catalog wins
    /// the moment it carries a real price.
    custom_prices: BTreeMap<ProductKey, Money>,

    /// Metered extras: (category, kind) → quantity. Entries are always
    /// positive; setting zero removes.
    extras: BTreeMap<(String, ExtraKind), i64>,
}

impl SelectionState {
    /// Creates an empty selection.
    pub fn new() -> Self {
        SelectionState::default()
    }

    /// True when nothing at all is selected.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.extras.is_empty()
    }

    /// Drops every selection, custom price, and extra.
    pub fn clear(&mut self) {
        *self = SelectionState::default();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_product_selected(&self, key: &ProductKey) -> bool {
        self.products.contains(key)
    }

    pub fn is_sub_product_selected(&self, key: &ProductKey, sub_id: &str) -> bool {
        self.sub_products
            .get(key)
            .is_some_and(|subs| subs.contains(sub_id))
    }

    pub fn is_nested_selected(&self, key: &ProductKey, sub_id: &str, nested_id: &str) -> bool {
        self.nested
            .get(&(key.clone(), sub_id.to_string()))
            .is_some_and(|ids| ids.contains(nested_id))
    }

    /// The custom price set for a product, if any.
    pub fn custom_price(&self, key: &ProductKey) -> Option<Money> {
        self.custom_prices.get(key).copied()
    }

    /// The quantity of a metered extra (zero when unset).
    pub fn extra_quantity(&self, category: &str, kind: ExtraKind) -> i64 {
        self.extras
            .get(&(category.to_string(), kind))
            .copied()
            .unwrap_or(0)
    }

    /// Selected products in deterministic order.
    pub fn selected_products(&self) -> impl Iterator<Item = &ProductKey> {
        self.products.iter()
    }

    /// Selected sub-product ids of a product, in deterministic order.
    pub fn selected_sub_products(&self, key: &ProductKey) -> impl Iterator<Item = &str> {
        self.sub_products
            .get(key)
            .into_iter()
            .flat_map(|subs| subs.iter().map(String::as_str))
    }

    /// Selected nested ids under a sub-product, in deterministic order.
    pub fn selected_nested(&self, key: &ProductKey, sub_id: &str) -> impl Iterator<Item = &str> {
        self.nested
            .get(&(key.clone(), sub_id.to_string()))
            .into_iter()
            .flat_map(|ids| ids.iter().map(String::as_str))
    }

    /// All metered extras with positive quantity, in deterministic order.
    pub fn extras(&self) -> impl Iterator<Item = (&str, ExtraKind, i64)> {
        self.extras
            .iter()
            .map(|((category, kind), qty)| (category.as_str(), *kind, *qty))
    }

    // =========================================================================
    // Toggles
    // =========================================================================

    /// Toggles a top-level product. Returns the new state (true = selected).
    ///
    /// Deselecting cascades: the product's sub-products, their nested
    /// selections, and its custom price are all removed in the same call.
    /// Selecting never auto-selects anything else.
    ///
    /// ## Errors
    /// `CoreError::NotFound` when the key does not resolve in the catalog.
    pub fn toggle_product(&mut self, catalog: &Catalog, key: &ProductKey) -> CoreResult<bool> {
        catalog.lookup(&SelectionKey::product(key))?;

        if self.products.remove(key) {
            self.sub_products.remove(key);
            self.nested.retain(|(product, _), _| product != key);
            self.custom_prices.remove(key);
            Ok(false)
        } else {
            self.products.insert(key.clone());
            Ok(true)
        }
    }

    /// Toggles a sub-product under a selected product.
    ///
    /// ## Errors
    /// - `NotFound` when the path does not resolve in the catalog
    /// - `InvalidSelection` when the parent product is not selected (the
    ///   engine never auto-selects ancestors)
    pub fn toggle_sub_product(
        &mut self,
        catalog: &Catalog,
        key: &ProductKey,
        sub_id: &str,
    ) -> CoreResult<bool> {
        let path = SelectionKey::sub_product(key, sub_id);
        catalog.lookup(&path)?;

        if !self.is_product_selected(key) {
            return Err(CoreError::invalid_selection(
                path.to_string(),
                "parent product is not selected",
            ));
        }

        let subs = self.sub_products.entry(key.clone()).or_default();
        if subs.remove(sub_id) {
            if subs.is_empty() {
                self.sub_products.remove(key);
            }
            // Deselection cascades to the nested selections under it.
            self.nested.remove(&(key.clone(), sub_id.to_string()));
            Ok(false)
        } else {
            subs.insert(sub_id.to_string());
            Ok(true)
        }
    }

    /// Toggles a nested sub-product under a selected sub-product.
    ///
    /// ## Errors
    /// - `NotFound` when the path does not resolve in the catalog
    /// - `InvalidSelection` when the parent sub-product is not selected
    pub fn toggle_nested_sub_product(
        &mut self,
        catalog: &Catalog,
        key: &ProductKey,
        sub_id: &str,
        nested_id: &str,
    ) -> CoreResult<bool> {
        let path = SelectionKey::nested(key, sub_id, nested_id);
        catalog.lookup(&path)?;

        if !self.is_sub_product_selected(key, sub_id) {
            return Err(CoreError::invalid_selection(
                path.to_string(),
                "parent sub-product is not selected",
            ));
        }

        let entry = self
            .nested
            .entry((key.clone(), sub_id.to_string()))
            .or_default();
        if entry.remove(nested_id) {
            if entry.is_empty() {
                self.nested.remove(&(key.clone(), sub_id.to_string()));
            }
            Ok(false)
        } else {
            entry.insert(nested_id.to_string());
            Ok(true)
        }
    }

    // =========================================================================
    // Custom Prices
    // =========================================================================

    /// Sets the operator-supplied price for a product.
    ///
    /// ## Errors
    /// - `InvalidSelection` when the product is not currently selected
    /// - `Computation` when the price is not positive (a custom price of
    ///   zero would re-arm the sentinel and make the line free by accident)
    pub fn set_custom_price(&mut self, key: &ProductKey, price: Money) -> CoreResult<()> {
        if !self.is_product_selected(key) {
            return Err(CoreError::invalid_selection(
                key.to_string(),
                "cannot set a custom price on an unselected product",
            ));
        }
        if !price.is_positive() {
            return Err(CoreError::computation(format!(
                "custom price for {} must be positive, got {}",
                key, price
            )));
        }

        self.custom_prices.insert(key.clone(), price);
        Ok(())
    }

    /// Removes the custom price for a product, if one was set.
    pub fn clear_custom_price(&mut self, key: &ProductKey) {
        self.custom_prices.remove(key);
    }

    // =========================================================================
    // Metered Extras
    // =========================================================================

    /// Sets the quantity of a metered extra. Zero removes the entry.
    ///
    /// ## Errors
    /// `Computation` when the quantity is negative or above
    /// `MAX_LINE_QUANTITY`.
    pub fn set_extra_quantity(
        &mut self,
        category: &str,
        kind: ExtraKind,
        qty: i64,
    ) -> CoreResult<()> {
        if qty < 0 || qty > MAX_LINE_QUANTITY {
            return Err(CoreError::computation(format!(
                "extra quantity {} for {}/{} is out of range",
                qty,
                category,
                kind.id()
            )));
        }

        let entry = (category.to_string(), kind);
        if qty == 0 {
            self.extras.remove(&entry);
        } else {
            self.extras.insert(entry, qty);
        }
        Ok(())
    }

    // =========================================================================
    // Round-Trip Reconstruction
    // =========================================================================

    /// Rebuilds a selection from a previously priced line-item list, so a
    /// stored offer can be reopened for editing.
    ///
    /// Lines (or sub-selections) whose catalog nodes have since vanished
    /// are skipped silently, mirroring the resolver's best-effort policy.
    /// A custom price is inferred whenever the catalog price is the zero
    /// sentinel and the line carries a positive unit price.
    pub fn from_line_items(catalog: &Catalog, items: &[LineItem]) -> Self {
        let mut state = SelectionState::new();

        for item in items {
            match &item.kind {
                LineItemKind::Extra { kind } => {
                    if item.quantity > 0 && item.quantity <= MAX_LINE_QUANTITY {
                        state
                            .extras
                            .insert((item.category.clone(), *kind), item.quantity);
                    }
                }
                LineItemKind::Product { sub_products } => {
                    let key = ProductKey::new(item.category.clone(), item.item_id.clone());
                    let Some(node) = catalog.find_product(&key) else {
                        continue;
                    };

                    state.products.insert(key.clone());
                    if node.price.is_zero() && item.unit_price.is_positive() {
                        state.custom_prices.insert(key.clone(), item.unit_price);
                    }

                    for sub in sub_products {
                        let Some(sub_node) = node.child(&sub.id) else {
                            continue;
                        };
                        state
                            .sub_products
                            .entry(key.clone())
                            .or_default()
                            .insert(sub.id.clone());

                        for nested_id in &sub.nested {
                            if sub_node.child(nested_id).is_none() {
                                continue;
                            }
                            state
                                .nested
                                .entry((key.clone(), sub.id.clone()))
                                .or_default()
                                .insert(nested_id.clone());
                        }
                    }
                }
            }
        }

        state
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogNode;
    use crate::types::SubProductRef;

    fn test_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .upsert_product(
                "Website Development",
                CatalogNode::new("website-basic", "Basic Website", "", Money::from_cents(50000))
                    .with_child(
                        CatalogNode::new("extra-pages", "Extra Pages", "", Money::from_cents(10000))
                            .with_child(CatalogNode::new(
                                "translation",
                                "Translation",
                                "",
                                Money::from_cents(5000),
                            )),
                    )
                    .with_child(CatalogNode::new(
                        "seo-setup",
                        "SEO Setup",
                        "",
                        Money::from_cents(20000),
                    )),
            )
            .unwrap();
        catalog
            .upsert_product(
                "Website Development",
                CatalogNode::new("website-custom", "Custom Build", "", Money::zero()),
            )
            .unwrap();
        catalog
    }

    fn basic() -> ProductKey {
        ProductKey::new("Website Development", "website-basic")
    }

    fn custom() -> ProductKey {
        ProductKey::new("Website Development", "website-custom")
    }

    #[test]
    fn test_toggle_product() {
        let catalog = test_catalog();
        let mut state = SelectionState::new();

        assert!(state.toggle_product(&catalog, &basic()).unwrap());
        assert!(state.is_product_selected(&basic()));

        assert!(!state.toggle_product(&catalog, &basic()).unwrap());
        assert!(!state.is_product_selected(&basic()));
        assert!(state.is_empty());
    }

    #[test]
    fn test_toggle_unknown_product_leaves_state_untouched() {
        let catalog = test_catalog();
        let mut state = SelectionState::new();
        state.toggle_product(&catalog, &basic()).unwrap();
        let before = state.clone();

        let missing = ProductKey::new("Website Development", "no-such");
        let err = state.toggle_product(&catalog, &missing).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_sub_product_requires_selected_parent() {
        let catalog = test_catalog();
        let mut state = SelectionState::new();

        // Parent not selected: rejected, nothing auto-selected.
        let err = state
            .toggle_sub_product(&catalog, &basic(), "extra-pages")
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidSelection { .. }));
        assert!(state.is_empty());

        state.toggle_product(&catalog, &basic()).unwrap();
        assert!(state
            .toggle_sub_product(&catalog, &basic(), "extra-pages")
            .unwrap());
        assert!(state.is_sub_product_selected(&basic(), "extra-pages"));
    }

    #[test]
    fn test_nested_requires_selected_sub_product() {
        let catalog = test_catalog();
        let mut state = SelectionState::new();
        state.toggle_product(&catalog, &basic()).unwrap();

        let err = state
            .toggle_nested_sub_product(&catalog, &basic(), "extra-pages", "translation")
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidSelection { .. }));

        state
            .toggle_sub_product(&catalog, &basic(), "extra-pages")
            .unwrap();
        assert!(state
            .toggle_nested_sub_product(&catalog, &basic(), "extra-pages", "translation")
            .unwrap());
        assert!(state.is_nested_selected(&basic(), "extra-pages", "translation"));
    }

    #[test]
    fn test_deselect_product_cascades() {
        let catalog = test_catalog();
        let mut state = SelectionState::new();
        state.toggle_product(&catalog, &basic()).unwrap();
        state
            .toggle_sub_product(&catalog, &basic(), "extra-pages")
            .unwrap();
        state
            .toggle_nested_sub_product(&catalog, &basic(), "extra-pages", "translation")
            .unwrap();

        state.toggle_product(&catalog, &basic()).unwrap();
        assert!(state.is_empty());
        assert!(!state.is_sub_product_selected(&basic(), "extra-pages"));
        assert!(!state.is_nested_selected(&basic(), "extra-pages", "translation"));
    }

    #[test]
    fn test_deselect_sub_product_cascades_nested_only() {
        let catalog = test_catalog();
        let mut state = SelectionState::new();
        state.toggle_product(&catalog, &basic()).unwrap();
        state
            .toggle_sub_product(&catalog, &basic(), "extra-pages")
            .unwrap();
        state
            .toggle_sub_product(&catalog, &basic(), "seo-setup")
            .unwrap();
        state
            .toggle_nested_sub_product(&catalog, &basic(), "extra-pages", "translation")
            .unwrap();

        state
            .toggle_sub_product(&catalog, &basic(), "extra-pages")
            .unwrap();
        assert!(!state.is_nested_selected(&basic(), "extra-pages", "translation"));
        // Siblings and the product itself are untouched.
        assert!(state.is_sub_product_selected(&basic(), "seo-setup"));
        assert!(state.is_product_selected(&basic()));
    }

    #[test]
    fn test_toggle_idempotence() {
        let catalog = test_catalog();
        let mut state = SelectionState::new();
        state.toggle_product(&catalog, &basic()).unwrap();
        state
            .toggle_sub_product(&catalog, &basic(), "seo-setup")
            .unwrap();
        let before = state.clone();

        state
            .toggle_sub_product(&catalog, &basic(), "extra-pages")
            .unwrap();
        state
            .toggle_sub_product(&catalog, &basic(), "extra-pages")
            .unwrap();
        assert_eq!(state, before);
    }

    #[test]
    fn test_custom_price_rules() {
        let catalog = test_catalog();
        let mut state = SelectionState::new();

        // Unselected product: rejected.
        let err = state
            .set_custom_price(&custom(), Money::from_cents(120000))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidSelection { .. }));

        state.toggle_product(&catalog, &custom()).unwrap();

        // Non-positive prices: rejected.
        assert!(state.set_custom_price(&custom(), Money::zero()).is_err());
        assert!(state
            .set_custom_price(&custom(), Money::from_cents(-100))
            .is_err());

        state
            .set_custom_price(&custom(), Money::from_cents(120000))
            .unwrap();
        assert_eq!(state.custom_price(&custom()).unwrap().cents(), 120000);

        // Deselecting the product drops its custom price.
        state.toggle_product(&catalog, &custom()).unwrap();
        assert!(state.custom_price(&custom()).is_none());
    }

    #[test]
    fn test_extra_quantities() {
        let mut state = SelectionState::new();

        state
            .set_extra_quantity("Social Media", ExtraKind::ExtraVideo, 3)
            .unwrap();
        assert_eq!(state.extra_quantity("Social Media", ExtraKind::ExtraVideo), 3);

        // Negative is rejected, zero removes.
        assert!(state
            .set_extra_quantity("Social Media", ExtraKind::ExtraVideo, -1)
            .is_err());
        assert_eq!(state.extra_quantity("Social Media", ExtraKind::ExtraVideo), 3);

        state
            .set_extra_quantity("Social Media", ExtraKind::ExtraVideo, 0)
            .unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn test_from_line_items_round_trip() {
        let catalog = test_catalog();
        let items = vec![
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
            },
            LineItem {
                category: "Website Development".to_string(),
                item_id: "website-custom".to_string(),
                label: "Custom Build".to_string(),
                description: String::new(),
                unit_price: Money::from_cents(120000),
                quantity: 1,
                sub_total: Money::zero(),
                line_total: Money::from_cents(120000),
                kind: LineItemKind::Product {
                    sub_products: vec![],
                },
            },
            LineItem {
                category: "Social Media".to_string(),
                item_id: "extra-video".to_string(),
                label: "Extra Video".to_string(),
                description: String::new(),
                unit_price: Money::from_cents(5000),
                quantity: 3,
                sub_total: Money::zero(),
                line_total: Money::from_cents(15000),
                kind: LineItemKind::Extra {
                    kind: ExtraKind::ExtraVideo,
                },
            },
        ];

        let state = SelectionState::from_line_items(&catalog, &items);

        assert!(state.is_product_selected(&basic()));
        assert!(state.is_sub_product_selected(&basic(), "extra-pages"));
        assert!(state.is_nested_selected(&basic(), "extra-pages", "translation"));
        // Zero-sentinel product with a positive unit price: custom price inferred.
        assert_eq!(state.custom_price(&custom()).unwrap().cents(), 120000);
        // Non-sentinel product: no custom price inferred.
        assert!(state.custom_price(&basic()).is_none());
        assert_eq!(state.extra_quantity("Social Media", ExtraKind::ExtraVideo), 3);
    }

    #[test]
    fn test_from_line_items_skips_vanished_nodes() {
        let catalog = test_catalog();
        let items = vec![LineItem {
            category: "Website Development".to_string(),
            item_id: "retired-product".to_string(),
            label: "Retired".to_string(),
            description: String::new(),
            unit_price: Money::from_cents(9900),
            quantity: 1,
            sub_total: Money::zero(),
            line_total: Money::from_cents(9900),
            kind: LineItemKind::Product {
                sub_products: vec![],
            },
        }];

        let state = SelectionState::from_line_items(&catalog, &items);
        assert!(state.is_empty());
    }
}
