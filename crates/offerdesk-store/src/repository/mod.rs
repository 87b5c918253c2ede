//! Repository implementations over the document store.
//!
//! One repository per aggregate: the singleton catalog document and the
//! offers collection. Repositories run the engine's validation before any
//! write; the store itself never inspects document contents.

pub mod catalog;
pub mod offer;
