//! # Offer Repository
//!
//! Persistence for finalized offer records: one document per offer,
//! ids minted here as UUID v4 at create time (the engine never assigns
//! identity).
//!
//! ## Listing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list(limit, offset)                                                    │
//! │                                                                         │
//! │  load all offer documents                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sort by created_at DESCENDING (newest offer first)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  window [offset .. offset+limit]                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OfferPage { offers, total, limit, offset, has_more }                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Listing reads every document. At this system's scale (hundreds of
//! offers, not millions) that is fine; an index document would be the
//! next step if it ever isn't.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use offerdesk_core::{CreatedBy, Money, OfferRecord};

use crate::document::DocumentStore;
use crate::error::{StoreError, StoreResult};

const COLLECTION: &str = "offers";
const ENTITY: &str = "Offer";

/// How many offers the stats summary lists.
const RECENT_LIMIT: usize = 10;

/// Months of history covered by the by-month breakdown and recent list.
const STATS_WINDOW_MONTHS: i32 = 6;

/// An offer record together with its store-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredOffer {
    pub id: String,
    #[serde(flatten)]
    pub record: OfferRecord,
}

/// One page of the offer listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPage {
    pub offers: Vec<StoredOffer>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

/// One row of the stats recent-offers list: just enough to render a
/// dashboard table without loading whole records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSummary {
    pub id: String,
    pub client_name: String,
    pub total: Money,
    pub created_at: DateTime<Utc>,
    pub created_by: CreatedBy,
}

/// Aggregate numbers for the admin dashboard.
///
/// Revenue and the total count cover the whole collection; the by-month
/// breakdown and the recent list cover the trailing
/// `STATS_WINDOW_MONTHS` months only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferStats {
    pub total_offers: usize,
    /// Offers inside the trailing window.
    pub recent_offers: usize,
    /// `"YYYY-MM"` → count, window only. BTreeMap keeps months ordered.
    pub offers_by_month: BTreeMap<String, usize>,
    /// Sum of grand totals over every offer ever created.
    pub total_revenue: Money,
    /// Newest offers inside the window, capped at `RECENT_LIMIT`.
    pub recent: Vec<OfferSummary>,
}

/// Repository for offer documents.
#[derive(Debug, Clone)]
pub struct OfferRepository {
    store: DocumentStore,
}

impl OfferRepository {
    /// Creates a new OfferRepository.
    pub fn new(store: DocumentStore) -> Self {
        OfferRepository { store }
    }

    /// Persists a finalized record under a fresh UUID v4 and returns the id.
    pub async fn create(&self, record: OfferRecord) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        let stored = StoredOffer {
            id: id.clone(),
            record,
        };
        self.store.write(COLLECTION, &id, &stored).await?;

        info!(id = %id, client = %stored.record.client_name, "Offer created");
        Ok(id)
    }

    /// Fetches one offer by id.
    ///
    /// ## Errors
    /// - `NotFound` when no such document exists
    /// - `Corrupt` when the document exists but does not decode
    pub async fn get(&self, id: &str) -> StoreResult<StoredOffer> {
        self.store
            .read::<StoredOffer>(COLLECTION, id)
            .await?
            .ok_or_else(|| StoreError::not_found(ENTITY, id))
    }

    /// Lists offers newest-first with offset pagination.
    ///
    /// A corrupt document fails the listing rather than being skipped; a
    /// silently shrinking history would be worse than a loud error.
    pub async fn list(&self, limit: usize, offset: usize) -> StoreResult<OfferPage> {
        let offers = self.load_all_sorted().await?;
        let total = offers.len();
        let offers: Vec<StoredOffer> = offers.into_iter().skip(offset).take(limit).collect();
        let has_more = offset + limit < total;

        debug!(total = total, limit = limit, offset = offset, "Offers listed");
        Ok(OfferPage {
            offers,
            total,
            limit,
            offset,
            has_more,
        })
    }

    /// Computes the dashboard statistics as of `now`.
    ///
    /// Total count and revenue span the whole collection; the by-month
    /// breakdown and the capped recent list cover offers created from the
    /// first day of the month `STATS_WINDOW_MONTHS` months back.
    pub async fn stats(&self, now: DateTime<Utc>) -> StoreResult<OfferStats> {
        let offers = self.load_all_sorted().await?;

        let total_offers = offers.len();
        let total_revenue: Money = offers.iter().map(|o| o.record.totals.total).sum();

        let cutoff = month_index(now) - STATS_WINDOW_MONTHS;
        let mut offers_by_month = BTreeMap::new();
        let mut recent = Vec::new();
        let mut recent_offers = 0;

        for offer in &offers {
            if month_index(offer.record.created_at) < cutoff {
                continue;
            }
            recent_offers += 1;

            let month = format!(
                "{}-{:02}",
                offer.record.created_at.year(),
                offer.record.created_at.month()
            );
            *offers_by_month.entry(month).or_insert(0) += 1;

            // `offers` is already newest-first, so the cap keeps the
            // newest ones.
            if recent.len() < RECENT_LIMIT {
                recent.push(OfferSummary {
                    id: offer.id.clone(),
                    client_name: offer.record.client_name.clone(),
                    total: offer.record.totals.total,
                    created_at: offer.record.created_at,
                    created_by: offer.record.created_by.clone(),
                });
            }
        }

        debug!(
            total = total_offers,
            recent = recent_offers,
            "Offer stats computed"
        );
        Ok(OfferStats {
            total_offers,
            recent_offers,
            offers_by_month,
            total_revenue,
            recent,
        })
    }

    /// Loads every offer document, newest first; id as tie-breaker keeps
    /// the order deterministic.
    async fn load_all_sorted(&self) -> StoreResult<Vec<StoredOffer>> {
        let ids = self.store.list_ids(COLLECTION).await?;

        let mut offers = Vec::with_capacity(ids.len());
        for id in &ids {
            offers.push(self.get(id).await?);
        }

        offers.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(offers)
    }

    /// Deletes one offer by id.
    ///
    /// ## Errors
    /// `NotFound` when no such document exists.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        if !self.store.delete(COLLECTION, id).await? {
            return Err(StoreError::not_found(ENTITY, id));
        }
        info!(id = %id, "Offer deleted");
        Ok(())
    }
}

/// Months since year zero, so the window cutoff can compare calendar
/// months without constructing dates.
fn month_index(dt: DateTime<Utc>) -> i32 {
    dt.year() * 12 + dt.month0() as i32
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use offerdesk_core::{
        CreatedBy, Discount, LineItem, LineItemKind, Money, OfferDraft, Rate,
    };
    use tokio::fs;

    fn temp_repo() -> OfferRepository {
        let root = std::env::temp_dir().join(format!("offerdesk-offer-test-{}", Uuid::new_v4()));
        OfferRepository::new(DocumentStore::new(root))
    }

    async fn cleanup(repo: &OfferRepository) {
        let _ = fs::remove_dir_all(repo.store.root()).await;
    }

    fn record(client: &str, created_at: DateTime<Utc>) -> OfferRecord {
        let draft = OfferDraft {
            client_name: client.to_string(),
            tracking_id: "TASK-1".to_string(),
            discount: Discount::Absolute(Money::zero()),
            tax_rate: Rate::from_bps(2400),
            items: vec![LineItem {
                category: "Web".to_string(),
                item_id: "site".to_string(),
                label: "Site".to_string(),
                description: String::new(),
                unit_price: Money::from_cents(50000),
                quantity: 1,
                sub_total: Money::zero(),
                line_total: Money::from_cents(50000),
                kind: LineItemKind::Product {
                    sub_products: vec![],
                },
            }],
            ..OfferDraft::default()
        };
        draft
            .finalize(CreatedBy::new("user-1", None), created_at)
            .unwrap()
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_get_round_trip() {
        let repo = temp_repo();
        let id = repo.create(record("Acme", at(1))).await.unwrap();

        let stored = repo.get(&id).await.unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.record.client_name, "Acme");
        assert_eq!(stored.record.totals.total.cents(), 62000);

        cleanup(&repo).await;
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = temp_repo();
        let err = repo.get("no-such-id").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        cleanup(&repo).await;
    }

    #[tokio::test]
    async fn test_list_newest_first_with_pagination() {
        let repo = temp_repo();
        repo.create(record("Oldest", at(1))).await.unwrap();
        repo.create(record("Middle", at(5))).await.unwrap();
        repo.create(record("Newest", at(9))).await.unwrap();

        let page = repo.list(2, 0).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.offers.len(), 2);
        assert_eq!(page.offers[0].record.client_name, "Newest");
        assert_eq!(page.offers[1].record.client_name, "Middle");
        assert!(page.has_more);

        let page = repo.list(2, 2).await.unwrap();
        assert_eq!(page.offers.len(), 1);
        assert_eq!(page.offers[0].record.client_name, "Oldest");
        assert!(!page.has_more);

        cleanup(&repo).await;
    }

    #[tokio::test]
    async fn test_stats_windows_and_totals() {
        let repo = temp_repo();
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();

        // Two inside the six-month window, one long before it.
        repo.create(record("March Client", at(10))).await.unwrap();
        repo.create(record(
            "February Client",
            Utc.with_ymd_and_hms(2025, 2, 20, 9, 0, 0).unwrap(),
        ))
        .await
        .unwrap();
        repo.create(record(
            "Ancient Client",
            Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap(),
        ))
        .await
        .unwrap();

        let stats = repo.stats(now).await.unwrap();

        // Count and revenue cover everything, window stats do not.
        assert_eq!(stats.total_offers, 3);
        assert_eq!(stats.total_revenue.cents(), 3 * 62000);
        assert_eq!(stats.recent_offers, 2);

        assert_eq!(stats.offers_by_month.get("2025-03"), Some(&1));
        assert_eq!(stats.offers_by_month.get("2025-02"), Some(&1));
        assert!(stats.offers_by_month.get("2024-01").is_none());

        // Recent list is newest first and excludes the ancient offer.
        assert_eq!(stats.recent.len(), 2);
        assert_eq!(stats.recent[0].client_name, "March Client");
        assert_eq!(stats.recent[1].client_name, "February Client");
        assert_eq!(stats.recent[0].total.cents(), 62000);

        cleanup(&repo).await;
    }

    #[tokio::test]
    async fn test_stats_empty_collection() {
        let repo = temp_repo();
        let stats = repo
            .stats(Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap())
            .await
            .unwrap();

        assert_eq!(stats.total_offers, 0);
        assert!(stats.total_revenue.is_zero());
        assert!(stats.offers_by_month.is_empty());
        assert!(stats.recent.is_empty());

        cleanup(&repo).await;
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = temp_repo();
        let id = repo.create(record("Acme", at(1))).await.unwrap();

        repo.delete(&id).await.unwrap();
        assert!(matches!(
            repo.delete(&id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
        assert_eq!(repo.list(10, 0).await.unwrap().total, 0);

        cleanup(&repo).await;
    }

    #[tokio::test]
    async fn test_corrupt_offer_fails_listing() {
        let repo = temp_repo();
        let id = repo.create(record("Acme", at(1))).await.unwrap();

        let path = repo.store.root().join("offers").join(format!("{}.json", id));
        fs::write(&path, b"garbage").await.unwrap();

        assert!(matches!(
            repo.list(10, 0).await.unwrap_err(),
            StoreError::Corrupt { .. }
        ));

        cleanup(&repo).await;
    }
}
