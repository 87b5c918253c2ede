//! # Store Error Types
//!
//! Error types for document store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← adds entity/path context                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Application error layer ← serialized for the frontend                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A file that exists but fails to decode is `Corrupt`, never `NotFound`:
//! the two need different operator responses (restore from backup vs.
//! nothing to do).

use thiserror::Error;

use offerdesk_core::CoreError;

/// Document store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Document not found in its collection.
    ///
    /// ## When This Occurs
    /// - `get` / `delete` on an id that was never created
    /// - The document file was removed out of band
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A document file exists but does not decode as its expected type.
    ///
    /// ## When This Occurs
    /// - Manual edits broke the JSON
    /// - A schema change without migrating stored documents
    #[error("Corrupt document at {path}: {reason}")]
    Corrupt { path: String, reason: String },

    /// Domain validation or semantics rejected the write.
    ///
    /// Admin catalog operations run the engine's validation before
    /// persisting; failures pass through unchanged.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Filesystem failure (permissions, disk full, missing root).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure encoding a document for writing. Should not happen for the
    /// domain types; surfaced rather than panicking.
    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Corrupt error for a document path.
    pub fn corrupt(path: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::not_found("Offer", "abc-123");
        assert_eq!(err.to_string(), "Offer not found: abc-123");

        let err = StoreError::corrupt("offers/abc.json", "expected value at line 1");
        assert!(err.to_string().contains("offers/abc.json"));
    }

    #[test]
    fn test_core_error_passes_through() {
        let core = CoreError::not_found("Web/website-basic");
        let err: StoreError = core.into();
        assert_eq!(err.to_string(), "Catalog node not found: Web/website-basic");
    }
}
