//! # Offerdesk Core
//!
//! The pure offer composition and pricing engine.
//!
//! ## What Lives Here
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        offerdesk-core                                   │
//! │                                                                         │
//! │  money       Money (integer cents) and Rate (basis points)              │
//! │  catalog     Catalog tree, path keys, admin operations                  │
//! │  selection   SelectionState: toggles, cascades, custom prices, extras   │
//! │  pricing     PriceResolver: selection + catalog → line items            │
//! │  totals      calculate_totals: discount clamp + tax                     │
//! │  offer       OfferDraft → finalize → OfferRecord → document data        │
//! │  types       LineItem, ExtraKind, Discount, Totals, CreatedBy           │
//! │  validation  Field-level validators                                     │
//! │  error       CoreError / ValidationError / CoreResult                   │
//! │                                                                         │
//! │  No I/O anywhere. Persistence lives in offerdesk-store; rendering       │
//! │  and auth live outside the workspace entirely.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Typical Flow
//! ```rust
//! use offerdesk_core::catalog::{Catalog, CatalogNode, ProductKey};
//! use offerdesk_core::money::{Money, Rate};
//! use offerdesk_core::pricing::PriceResolver;
//! use offerdesk_core::selection::SelectionState;
//! use offerdesk_core::totals::calculate_totals;
//! use offerdesk_core::types::Discount;
//!
//! let mut catalog = Catalog::new();
//! catalog.upsert_product(
//!     "Website Development",
//!     CatalogNode::new("website-basic", "Basic Website", "", Money::from_cents(50000)),
//! ).unwrap();
//!
//! let mut selection = SelectionState::new();
//! let key = ProductKey::new("Website Development", "website-basic");
//! selection.toggle_product(&catalog, &key).unwrap();
//!
//! let items = PriceResolver::new(&catalog, &selection).resolve_all().unwrap();
//! let totals = calculate_totals(&items, &Discount::default(), Rate::from_bps(2400));
//! assert_eq!(totals.total.cents(), 62000);
//! ```

pub mod catalog;
pub mod error;
pub mod money;
pub mod offer;
pub mod pricing;
pub mod selection;
pub mod totals;
pub mod types;
pub mod validation;

// Re-export the types callers touch constantly.
pub use catalog::{Catalog, CatalogNode, ProductKey, SelectionKey};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Rate};
pub use offer::{DocumentData, OfferDraft, OfferRecord};
pub use pricing::PriceResolver;
pub use selection::SelectionState;
pub use totals::calculate_totals;
pub use types::{CreatedBy, Discount, ExtraKind, LineItem, LineItemKind, SubProductRef, Totals};

// =============================================================================
// Engine Constants
// =============================================================================

/// Maximum units on a single line. Offers are hand-written quotes, not
/// bulk orders; anything above this is a typo.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Catalog nesting bound: product, sub-product, nested sub-product.
pub const MAX_NODE_DEPTH: usize = 3;

/// Display currency used when a draft does not set one.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// How long an offer stands when the operator does not choose.
pub const DEFAULT_VALIDITY_DAYS: i64 = 14;
