//! # Catalog Repository
//!
//! Persistence for the single shared catalog document.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  admin operation (e.g. upsert_product)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load catalog document (absent → empty catalog)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  mutate via the engine's validated admin op                             │
//! │       │            └── rejected? nothing is written                     │
//! │       ▼                                                                 │
//! │  atomic write of the whole document                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog is one document, read-modify-written whole. At this
//! system's scale (one agency's service list) that is simpler and safer
//! than partial updates.

use tracing::{debug, info};

use offerdesk_core::{Catalog, CatalogNode, ProductKey};

use crate::document::DocumentStore;
use crate::error::StoreResult;

const COLLECTION: &str = "config";
const DOC_ID: &str = "catalog";

/// Repository for the singleton catalog document.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    store: DocumentStore,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(store: DocumentStore) -> Self {
        CatalogRepository { store }
    }

    /// Loads the catalog. An absent document is an empty catalog, never an
    /// error: the engine is specified to tolerate an empty catalog and a
    /// fresh install has no document yet.
    pub async fn load(&self) -> StoreResult<Catalog> {
        match self.store.read::<Catalog>(COLLECTION, DOC_ID).await? {
            Some(catalog) => Ok(catalog),
            None => {
                debug!("No catalog document yet, starting empty");
                Ok(Catalog::new())
            }
        }
    }

    /// Replaces the stored catalog wholesale, validating every node first.
    pub async fn save(&self, catalog: Catalog) -> StoreResult<()> {
        let mut validated = Catalog::new();
        validated.replace(catalog)?;

        self.store.write(COLLECTION, DOC_ID, &validated).await?;
        info!("Catalog document replaced");
        Ok(())
    }

    /// Adds or replaces a product in a category.
    pub async fn upsert_product(&self, category: &str, product: CatalogNode) -> StoreResult<()> {
        let id = product.id.clone();
        let mut catalog = self.load().await?;
        catalog.upsert_product(category, product)?;
        self.store.write(COLLECTION, DOC_ID, &catalog).await?;

        info!(category = %category, product = %id, "Product upserted");
        Ok(())
    }

    /// Removes a product; its category disappears with its last product.
    pub async fn remove_product(&self, key: &ProductKey) -> StoreResult<()> {
        let mut catalog = self.load().await?;
        catalog.remove_product(key)?;
        self.store.write(COLLECTION, DOC_ID, &catalog).await?;

        info!(key = %key, "Product removed");
        Ok(())
    }

    /// Removes a whole category.
    pub async fn remove_category(&self, category: &str) -> StoreResult<()> {
        let mut catalog = self.load().await?;
        catalog.remove_category(category)?;
        self.store.write(COLLECTION, DOC_ID, &catalog).await?;

        info!(category = %category, "Category removed");
        Ok(())
    }

    /// Attaches a sub-product to a product.
    pub async fn add_sub_product(&self, key: &ProductKey, sub: CatalogNode) -> StoreResult<()> {
        let id = sub.id.clone();
        let mut catalog = self.load().await?;
        catalog.add_sub_product(key, sub)?;
        self.store.write(COLLECTION, DOC_ID, &catalog).await?;

        info!(key = %key, sub_product = %id, "Sub-product added");
        Ok(())
    }

    /// Detaches a sub-product from a product.
    pub async fn remove_sub_product(&self, key: &ProductKey, sub_id: &str) -> StoreResult<()> {
        let mut catalog = self.load().await?;
        catalog.remove_sub_product(key, sub_id)?;
        self.store.write(COLLECTION, DOC_ID, &catalog).await?;

        info!(key = %key, sub_product = %sub_id, "Sub-product removed");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use offerdesk_core::{CoreError, Money};
    use tokio::fs;
    use uuid::Uuid;

    fn temp_repo() -> CatalogRepository {
        let root = std::env::temp_dir().join(format!("offerdesk-catalog-test-{}", Uuid::new_v4()));
        CatalogRepository::new(DocumentStore::new(root))
    }

    async fn cleanup(repo: &CatalogRepository) {
        let _ = fs::remove_dir_all(repo.store.root()).await;
    }

    #[tokio::test]
    async fn test_fresh_install_loads_empty() {
        let repo = temp_repo();
        let catalog = repo.load().await.unwrap();
        assert!(catalog.is_empty());
        cleanup(&repo).await;
    }

    #[tokio::test]
    async fn test_upsert_and_reload() {
        let repo = temp_repo();
        repo.upsert_product(
            "Website Development",
            CatalogNode::new("website-basic", "Basic Website", "", Money::from_cents(50000)),
        )
        .await
        .unwrap();

        let catalog = repo.load().await.unwrap();
        let key = ProductKey::new("Website Development", "website-basic");
        assert_eq!(catalog.find_product(&key).unwrap().price.cents(), 50000);

        cleanup(&repo).await;
    }

    #[tokio::test]
    async fn test_rejected_write_persists_nothing() {
        let repo = temp_repo();
        let negative = CatalogNode::new("p", "P", "", Money::from_cents(-1));

        let err = repo.upsert_product("Web", negative).await.unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::Validation(_))));
        assert!(repo.load().await.unwrap().is_empty());

        cleanup(&repo).await;
    }

    #[tokio::test]
    async fn test_sub_product_lifecycle() {
        let repo = temp_repo();
        let key = ProductKey::new("Web", "site");
        repo.upsert_product("Web", CatalogNode::new("site", "Site", "", Money::from_cents(100)))
            .await
            .unwrap();

        repo.add_sub_product(&key, CatalogNode::new("seo", "SEO", "", Money::from_cents(50)))
            .await
            .unwrap();
        let catalog = repo.load().await.unwrap();
        assert!(catalog.find_product(&key).unwrap().child("seo").is_some());

        repo.remove_sub_product(&key, "seo").await.unwrap();
        let catalog = repo.load().await.unwrap();
        assert!(catalog.find_product(&key).unwrap().child("seo").is_none());

        cleanup(&repo).await;
    }

    #[tokio::test]
    async fn test_remove_last_product_drops_category() {
        let repo = temp_repo();
        let key = ProductKey::new("Web", "site");
        repo.upsert_product("Web", CatalogNode::new("site", "Site", "", Money::from_cents(100)))
            .await
            .unwrap();

        repo.remove_product(&key).await.unwrap();
        let catalog = repo.load().await.unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.categories().next().is_none());

        cleanup(&repo).await;
    }
}
