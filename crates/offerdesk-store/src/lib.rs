//! # offerdesk-store: Document Persistence for Offerdesk
//!
//! This crate persists catalogs and offer records as JSON documents, one
//! file per document under a root directory.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Offerdesk Data Flow                               │
//! │                                                                         │
//! │  Application command (create_offer, upsert_product)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  offerdesk-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐        ┌──────────────────────────────┐    │   │
//! │  │   │ DocumentStore │        │ Repositories                 │    │   │
//! │  │   │ (document.rs) │◄───────│ CatalogRepository            │    │   │
//! │  │   │               │        │ OfferRepository              │    │   │
//! │  │   │ atomic JSON   │        │ (validate via core, persist) │    │   │
//! │  │   │ file per doc  │        └──────────────────────────────┘    │   │
//! │  │   └───────────────┘                                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <root>/config/catalog.json, <root>/offers/<uuid>.json                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`document`] - The atomic one-file-per-document JSON store
//! - [`error`] - Store error types
//! - [`repository`] - Catalog and offer repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use offerdesk_store::{CatalogRepository, DocumentStore, OfferRepository};
//!
//! let store = DocumentStore::new("./data");
//! let catalogs = CatalogRepository::new(store.clone());
//! let offers = OfferRepository::new(store);
//!
//! let catalog = catalogs.load().await?;       // empty on fresh install
//! let id = offers.create(record).await?;      // uuid assigned here
//! let page = offers.list(20, 0).await?;       // newest first
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod document;
pub mod error;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use document::DocumentStore;
pub use error::{StoreError, StoreResult};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::offer::{OfferPage, OfferRepository, OfferStats, OfferSummary, StoredOffer};
