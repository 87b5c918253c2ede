//! # Offer Record Builder
//!
//! Turns a working draft into a frozen, persistable offer record.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OfferDraft (mutable, operator edits)                                   │
//! │    client_name, tracking_id, company?, email?, currency,                │
//! │    discount, tax_rate, validity_days, notes?, items                     │
//! │        │                                                                │
//! │        ▼  finalize(created_by, now)                                     │
//! │    1. required fields present and non-blank                             │
//! │    2. at least one meaningful line item                                 │
//! │    3. tax rate and validity in range                                    │
//! │    4. totals RECOMPUTED from the items (never trusted from caller)      │
//! │        │                                                                │
//! │        ▼  all-or-nothing: any failure means no record                   │
//! │  OfferRecord (immutable snapshot + created_at / created_by)             │
//! │        │                                                                │
//! │        ├── valid_until()            expiry date for the document        │
//! │        └── document_data(sender)    the full render contract            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The record is a snapshot: later catalog edits never change what was
//! offered. Rendering itself (HTML/PDF) happens outside this crate; we only
//! hand over the data.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Rate;
use crate::totals::calculate_totals;
use crate::types::{CreatedBy, Discount, LineItem, Totals};
use crate::validation::{validate_tax_rate, validate_validity_days};
use crate::{DEFAULT_CURRENCY, DEFAULT_VALIDITY_DAYS};

// =============================================================================
// Offer Draft
// =============================================================================

/// The in-progress offer the operator is editing.
///
/// Optional metadata stays `None` rather than defaulting to empty strings,
/// so the record (and the rendered document) can omit absent fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OfferDraft {
    /// Client display name. Required at finalize.
    pub client_name: String,
    /// External task/project tracking reference. Required at finalize.
    pub tracking_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display currency tag; arithmetic never looks at it.
    pub currency: String,
    pub discount: Discount,
    /// Tax rate in basis points.
    pub tax_rate: Rate,
    /// How long the offer stands, in days.
    pub validity_days: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Priced lines from the resolver, possibly quantity-edited since.
    pub items: Vec<LineItem>,
}

impl Default for OfferDraft {
    fn default() -> Self {
        OfferDraft {
            client_name: String::new(),
            tracking_id: String::new(),
            company_name: None,
            email: None,
            currency: DEFAULT_CURRENCY.to_string(),
            discount: Discount::default(),
            tax_rate: Rate::zero(),
            validity_days: DEFAULT_VALIDITY_DAYS,
            notes: None,
            items: Vec::new(),
        }
    }
}

impl OfferDraft {
    /// Current totals of the draft, for live display while editing.
    pub fn totals(&self) -> Totals {
        calculate_totals(&self.items, &self.discount, self.tax_rate)
    }

    /// Validates the draft and freezes it into an immutable record.
    ///
    /// All-or-nothing: the first failure aborts with no record produced.
    /// Totals are recomputed from the items here; whatever the caller
    /// displayed during editing is never trusted.
    ///
    /// ## Errors
    /// - `Validation(Required)` for a blank client name or tracking id
    /// - `Validation(Required)` when there are no line items at all
    /// - `Validation(InvalidFormat)` when no line carries a positive total
    ///   or quantity
    /// - `Validation(OutOfRange)` for a tax rate above 100% or a validity
    ///   period outside 1..=365 days
    pub fn finalize(self, created_by: CreatedBy, now: DateTime<Utc>) -> CoreResult<OfferRecord> {
        let client_name = require_trimmed(&self.client_name, "clientName")?;
        let tracking_id = require_trimmed(&self.tracking_id, "trackingId")?;

        if self.items.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            }
            .into());
        }
        let meaningful = self
            .items
            .iter()
            .any(|item| item.line_total.is_positive() || item.quantity > 0);
        if !meaningful {
            return Err(ValidationError::InvalidFormat {
                field: "items".to_string(),
                reason: "at least one line must have a positive total or quantity".to_string(),
            }
            .into());
        }

        validate_tax_rate(self.tax_rate)?;
        validate_validity_days(self.validity_days)?;

        let totals = calculate_totals(&self.items, &self.discount, self.tax_rate);

        Ok(OfferRecord {
            client_name,
            tracking_id,
            company_name: trim_optional(self.company_name),
            email: trim_optional(self.email),
            currency: self.currency,
            discount: self.discount,
            tax_rate: self.tax_rate,
            validity_days: self.validity_days,
            notes: trim_optional(self.notes),
            items: self.items,
            totals,
            created_at: now,
            created_by,
        })
    }
}

fn require_trimmed(value: &str, field: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Offer Record
// =============================================================================

/// A finalized offer as persisted and rendered. Immutable by convention:
/// nothing in this crate mutates a record after `finalize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OfferRecord {
    pub client_name: String,
    pub tracking_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub currency: String,
    pub discount: Discount,
    pub tax_rate: Rate,
    pub validity_days: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<LineItem>,
    pub totals: Totals,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub created_by: CreatedBy,
}

impl OfferRecord {
    /// The date this offer stops standing.
    pub fn valid_until(&self) -> DateTime<Utc> {
        self.created_at + Duration::days(self.validity_days)
    }

    /// Everything an external renderer needs to lay out the offer
    /// document. No formatting happens here beyond what `Money` carries.
    pub fn document_data(&self, sender_name: impl Into<String>) -> DocumentData<'_> {
        DocumentData {
            sender_name: sender_name.into(),
            client_name: &self.client_name,
            company_name: self.company_name.as_deref(),
            email: self.email.as_deref(),
            tracking_id: &self.tracking_id,
            currency: &self.currency,
            notes: self.notes.as_deref(),
            items: &self.items,
            totals: self.totals,
            created_at: self.created_at,
            valid_until: self.valid_until(),
        }
    }
}

/// The render contract handed to the external HTML/PDF layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentData<'a> {
    /// Resolved display name of whoever issues the offer.
    pub sender_name: String,
    pub client_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    pub tracking_id: &'a str,
    pub currency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
    pub items: &'a [LineItem],
    pub totals: Totals,
    pub created_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
