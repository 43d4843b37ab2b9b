//! Tier index built from the level store.
//!
//! Loading is strict: one unreadable or malformed level fails its whole tier,
//! and one failed tier fails the whole index. Dropping a corrupt level would
//! shift the indices players select by.

use crate::error::{CatalogError, Result};
use crate::level::LevelRecord;
use crate::seed::LEVEL_EXTENSION;
use crate::tier::Tier;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Default)]
pub struct TierIndex {
    tiers: BTreeMap<Tier, Vec<LevelRecord>>,
}

impl TierIndex {
    /// Load every tier under `store_root`.
    pub fn build_all(store_root: &Path) -> Result<Self> {
        let mut tiers = BTreeMap::new();
        for tier in Tier::ALL {
            tiers.insert(tier, build_tier(store_root, tier)?);
        }
        Ok(Self { tiers })
    }

    /// Levels of `tier`, in discovery order.
    pub fn levels(&self, tier: Tier) -> &[LevelRecord] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn level_mut(&mut self, tier: Tier, index: usize) -> Option<&mut LevelRecord> {
        self.tiers.get_mut(&tier)?.get_mut(index)
    }

    /// Level count per tier, in tier order.
    pub fn counts(&self) -> Vec<(Tier, usize)> {
        Tier::ALL
            .into_iter()
            .map(|tier| (tier, self.levels(tier).len()))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.tiers.values().map(Vec::len).sum()
    }
}

/// Load the levels stored directly under `<store_root>/<tier>`.
///
/// Only files with a `.json` suffix are considered. Order follows directory
/// enumeration and is not sorted.
pub fn build_tier(store_root: &Path, tier: Tier) -> Result<Vec<LevelRecord>> {
    let dir = store_root.join(tier.as_str());
    debug!(%tier, dir = %dir.display(), "loading tier");

    let entries = fs::read_dir(&dir).map_err(|err| CatalogError::io("listing tier", &dir, err))?;
    let mut levels = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|err| CatalogError::io("listing tier", &dir, err))?
            .path();
        let is_level = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(LEVEL_EXTENSION));
        if !is_level {
            continue;
        }
        debug!(file = %path.display(), "loading level");
        levels.push(LevelRecord::load(&path)?);
    }
    Ok(levels)
}
