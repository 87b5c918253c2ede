//! # Catalog Tree
//!
//! The hierarchical product catalog: categories → products → sub-products →
//! nested sub-products. Immutable per request from the engine's point of
//! view; admin mutation happens through the validated operations below and
//! is persisted by the store crate.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog                                         │
//! │                                                                         │
//! │  "Website Development" ──┬── website-basic   (€500)                    │
//! │                          │     ├── extra-pages      (€100)             │
//! │                          │     │     └── translation (€50)             │
//! │                          │     └── seo-setup        (€200)             │
//! │                          └── website-custom  (€0 ← custom-price        │
//! │                                                    sentinel)           │
//! │  "Social Media" ─────────┬── social-starter  (€300)                   │
//! │                          └── ...                                       │
//! │                                                                         │
//! │  Depth is bounded: product → sub-product → nested sub-product.         │
//! │  Validation rejects anything deeper before it can reach pricing.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Category membership is part of a node's identity: the same product id in
//! two categories is a distinct entity. That is why every selection key
//! carries the full path and never just a leaf id.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_category, validate_label, validate_node_id, validate_price};
use crate::MAX_NODE_DEPTH;

// =============================================================================
// Catalog Node
// =============================================================================

/// One node of the catalog tree: a product, sub-product, or nested
/// sub-product depending on its depth.
///
/// A `price` of exactly zero is a sentinel meaning "the operator must supply
/// a custom price at selection time", not a free item. Only
/// top-level products honor the sentinel; see the pricing module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogNode {
    /// Identifier, unique among siblings (a slug like `website-basic`).
    pub id: String,

    /// Display label shown to the operator and on the offer document.
    pub label: String,

    /// Short description carried onto the offer line.
    #[serde(default)]
    pub description: String,

    /// Price in cents. Zero is the custom-price sentinel.
    pub price: Money,

    /// Optional child nodes (sub-products, then nested sub-products).
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "subProducts")]
    pub children: Vec<CatalogNode>,
}

impl CatalogNode {
    /// Creates a leaf node with no children.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        price: Money,
    ) -> Self {
        CatalogNode {
            id: id.into(),
            label: label.into(),
            description: description.into(),
            price,
            children: Vec::new(),
        }
    }

    /// Builder-style helper to attach a child node.
    pub fn with_child(mut self, child: CatalogNode) -> Self {
        self.children.push(child);
        self
    }

    /// True when the price is the custom-price sentinel.
    #[inline]
    pub fn requires_custom_price(&self) -> bool {
        self.price.is_zero()
    }

    /// Finds a direct child by id.
    pub fn child(&self, id: &str) -> Option<&CatalogNode> {
        self.children.iter().find(|c| c.id == id)
    }
}

// =============================================================================
// Selection Keys
// =============================================================================

/// Addresses a top-level product: `(category, product_id)`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductKey {
    pub category: String,
    pub product_id: String,
}

impl ProductKey {
    pub fn new(category: impl Into<String>, product_id: impl Into<String>) -> Self {
        ProductKey {
            category: category.into(),
            product_id: product_id.into(),
        }
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.product_id)
    }
}

/// Addresses any node in the tree by its full path.
///
/// Two different products may reuse a sub-product id, so a key must always
/// carry the whole path, never just the leaf id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SelectionKey {
    pub category: String,
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested_id: Option<String>,
}

impl SelectionKey {
    /// Key for a top-level product.
    pub fn product(key: &ProductKey) -> Self {
        SelectionKey {
            category: key.category.clone(),
            product_id: key.product_id.clone(),
            sub_product_id: None,
            nested_id: None,
        }
    }

    /// Key for a sub-product under a product.
    pub fn sub_product(key: &ProductKey, sub_id: impl Into<String>) -> Self {
        SelectionKey {
            category: key.category.clone(),
            product_id: key.product_id.clone(),
            sub_product_id: Some(sub_id.into()),
            nested_id: None,
        }
    }

    /// Key for a nested sub-product under a sub-product.
    pub fn nested(
        key: &ProductKey,
        sub_id: impl Into<String>,
        nested_id: impl Into<String>,
    ) -> Self {
        SelectionKey {
            category: key.category.clone(),
            product_id: key.product_id.clone(),
            sub_product_id: Some(sub_id.into()),
            nested_id: Some(nested_id.into()),
        }
    }

    /// The product portion of this key.
    pub fn product_key(&self) -> ProductKey {
        ProductKey::new(self.category.clone(), self.product_id.clone())
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.product_id)?;
        if let Some(sub) = &self.sub_product_id {
            write!(f, "/{}", sub)?;
        }
        if let Some(nested) = &self.nested_id {
            write!(f, "/{}", nested)?;
        }
        Ok(())
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The full catalog: category name → ordered products.
///
/// Serializes to the same plain `{ "Category": [ ...products ] }` JSON
/// object the frontend and the document store exchange. An empty or partial
/// catalog is always legal; lookups simply miss.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: BTreeMap<String, Vec<CatalogNode>>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog::default()
    }

    /// True when no category holds any product.
    pub fn is_empty(&self) -> bool {
        self.categories.values().all(|p| p.is_empty())
    }

    /// Iterates category names in deterministic order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// The ordered products of one category (empty slice if unknown).
    pub fn products(&self, category: &str) -> &[CatalogNode] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates `(ProductKey, node)` over every product in the catalog.
    pub fn iter_products(&self) -> impl Iterator<Item = (ProductKey, &CatalogNode)> {
        self.categories.iter().flat_map(|(category, products)| {
            products
                .iter()
                .map(move |p| (ProductKey::new(category.clone(), p.id.clone()), p))
        })
    }

    /// Finds a top-level product by key.
    pub fn find_product(&self, key: &ProductKey) -> Option<&CatalogNode> {
        self.categories
            .get(&key.category)?
            .iter()
            .find(|p| p.id == key.product_id)
    }

    /// Resolves a full-path selection key to its catalog node.
    ///
    /// ## Errors
    /// `CoreError::NotFound` carrying the printed key when any path segment
    /// is missing. Callers pricing a previously valid selection treat this
    /// as "node was removed since" and drop the line rather than fail the
    /// whole computation.
    pub fn lookup(&self, key: &SelectionKey) -> CoreResult<&CatalogNode> {
        let missing = || CoreError::not_found(key.to_string());

        let product = self
            .find_product(&key.product_key())
            .ok_or_else(missing)?;

        let Some(sub_id) = &key.sub_product_id else {
            return Ok(product);
        };
        let sub = product.child(sub_id).ok_or_else(missing)?;

        let Some(nested_id) = &key.nested_id else {
            return Ok(sub);
        };
        sub.child(nested_id).ok_or_else(missing)
    }

    // =========================================================================
    // Admin Operations
    // =========================================================================
    // Each operation validates fully before mutating, so a rejected write
    // leaves the catalog unchanged. Persistence is the store crate's job.

    /// Replaces the entire catalog, validating every node first.
    pub fn replace(&mut self, other: Catalog) -> CoreResult<()> {
        for (category, products) in &other.categories {
            validate_category(category)?;
            validate_sibling_ids(products, "product")?;
            for product in products {
                validate_node(product, 1)?;
            }
        }
        self.categories = other.categories;
        Ok(())
    }

    /// Adds a product to a category, or replaces the product with the same
    /// id. Creates the category on first use.
    pub fn upsert_product(&mut self, category: &str, product: CatalogNode) -> CoreResult<()> {
        validate_category(category)?;
        validate_node(&product, 1)?;

        // The raw caller string is the stored key. Category membership is
        // identity, so every entry point must agree on the exact key; no
        // normalization happens here or anywhere else.
        let products = self.categories.entry(category.to_string()).or_default();
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => products.push(product),
        }
        Ok(())
    }

    /// Removes a product; drops the category once it holds no products.
    pub fn remove_product(&mut self, key: &ProductKey) -> CoreResult<()> {
        let products = self
            .categories
            .get_mut(&key.category)
            .ok_or_else(|| CoreError::not_found(key.to_string()))?;

        let before = products.len();
        products.retain(|p| p.id != key.product_id);
        if products.len() == before {
            return Err(CoreError::not_found(key.to_string()));
        }

        if products.is_empty() {
            self.categories.remove(&key.category);
        }
        Ok(())
    }

    /// Removes a whole category and everything in it.
    pub fn remove_category(&mut self, category: &str) -> CoreResult<()> {
        self.categories
            .remove(category)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found(category))
    }

    /// Attaches a sub-product (possibly carrying nested children) to a
    /// product. Rejects duplicate sibling ids and over-deep subtrees.
    pub fn add_sub_product(&mut self, key: &ProductKey, sub: CatalogNode) -> CoreResult<()> {
        validate_node(&sub, 2)?;

        let product = self
            .categories
            .get_mut(&key.category)
            .and_then(|products| products.iter_mut().find(|p| p.id == key.product_id))
            .ok_or_else(|| CoreError::not_found(key.to_string()))?;

        if product.child(&sub.id).is_some() {
            return Err(ValidationError::Duplicate {
                field: "subProduct".to_string(),
                value: sub.id,
            }
            .into());
        }

        product.children.push(sub);
        Ok(())
    }

    /// Detaches a sub-product (and its nested children) from a product.
    pub fn remove_sub_product(&mut self, key: &ProductKey, sub_id: &str) -> CoreResult<()> {
        let product = self
            .categories
            .get_mut(&key.category)
            .and_then(|products| products.iter_mut().find(|p| p.id == key.product_id))
            .ok_or_else(|| CoreError::not_found(key.to_string()))?;

        let before = product.children.len();
        product.children.retain(|c| c.id != sub_id);
        if product.children.len() == before {
            return Err(CoreError::not_found(
                SelectionKey::sub_product(key, sub_id).to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Recursive Node Validation
// =============================================================================

/// Recursively validates a node and its descendants.
///
/// `depth` is the node's level under the category: 1 = product,
/// 2 = sub-product, 3 = nested sub-product. The price resolver only
/// understands three levels, so deeper trees are rejected here at the
/// admin boundary rather than silently mispriced later.
pub fn validate_node(node: &CatalogNode, depth: usize) -> CoreResult<()> {
    if depth > MAX_NODE_DEPTH {
        return Err(ValidationError::TooDeep {
            id: node.id.clone(),
            max_depth: MAX_NODE_DEPTH,
        }
        .into());
    }

    validate_node_id(&node.id)?;
    validate_label(&node.label)?;
    validate_price(node.price)?;
    validate_sibling_ids(&node.children, "child")?;

    for child in &node.children {
        validate_node(child, depth + 1)?;
    }
    Ok(())
}

/// Sibling ids must be unique; everything downstream (selection keys, the
/// resolver, round-tripping) assumes a path addresses exactly one node.
fn validate_sibling_ids(nodes: &[CatalogNode], field: &str) -> CoreResult<()> {
    let mut seen = BTreeSet::new();
    for node in nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: field.to_string(),
                value: node.id.clone(),
            }
            .into());
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
