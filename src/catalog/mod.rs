//! Level catalog.
//!
//! `TierIndex` holds the loaded levels keyed by tier; `CatalogManager` owns it
//! and drives seeding, loading, selection, and match recording.

pub mod index;
pub mod manager;

pub use index::{TierIndex, build_tier};
pub use manager::{CatalogManager, CatalogState};
