//! Tiered puzzle-level catalog.
//!
//! Levels live as one JSON file each under `<store_root>/<Tier>/`. On first run
//! the store is seeded from a read-only bundle; afterwards it is the source of
//! truth, and match results are appended to a level's `history` and written
//! back in place.

pub mod catalog;
pub mod config;
pub mod error;
pub mod level;
pub mod scene;
pub mod seed;
pub mod tier;

pub use catalog::{CatalogManager, CatalogState, TierIndex, build_tier};
pub use config::{CatalogConfig, find_bundle_dir};
pub use error::{CatalogError, ErrorKind};
pub use level::{LevelRecord, MatchEntry, Outcome};
pub use scene::{NoopLauncher, SceneLauncher};
pub use seed::{Blob, BundledSource, DirectoryBundle, MemoryBundle, SeedReport, seed_store};
pub use tier::{Tier, UnknownTier};
