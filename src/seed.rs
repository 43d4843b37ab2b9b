//! One-shot seeding of the writable store from the bundled level set.
//!
//! Seeding is not a sync: it writes every bundled blob without checking what is
//! already on disk. `seed_store` therefore refuses to run when the store root
//! exists; callers that want a fresh copy remove the root first.

use crate::error::{CatalogError, Result};
use crate::tier::Tier;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Suffix given to every seeded level file.
pub const LEVEL_EXTENSION: &str = "json";

/// A named text resource from the bundled level set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub name: String,
    pub text: String,
}

impl Blob {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Read-only provider of the initial levels, queried once per tier.
pub trait BundledSource {
    fn blobs(&self, tier: Tier) -> Result<Vec<Blob>>;

    /// Confirm the source can be read before anything is deleted or seeded.
    fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// Bundle laid out as `<root>/<Tier>/<name>.<ext>`; the blob name is the file
/// stem. A missing tier directory yields no blobs; a missing root is an error.
#[derive(Clone, Debug)]
pub struct DirectoryBundle {
    root: PathBuf,
}

impl DirectoryBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BundledSource for DirectoryBundle {
    fn check(&self) -> Result<()> {
        if self.root.is_dir() {
            return Ok(());
        }
        Err(CatalogError::io(
            "opening bundle",
            &self.root,
            io::Error::new(io::ErrorKind::NotFound, "bundle directory not found"),
        ))
    }

    fn blobs(&self, tier: Tier) -> Result<Vec<Blob>> {
        self.check()?;
        let dir = self.root.join(tier.as_str());
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(&dir).map_err(|err| CatalogError::io("listing bundle", &dir, err))?;
        let mut blobs = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|err| CatalogError::io("listing bundle", &dir, err))?
                .path();
            if !path.is_file() {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = fs::read_to_string(&path)
                .map_err(|err| CatalogError::io("reading bundled level", &path, err))?;
            blobs.push(Blob::new(stem, text));
        }
        blobs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(blobs)
    }
}

/// Bundle held in memory, for hosts that compile their levels in.
#[derive(Clone, Debug, Default)]
pub struct MemoryBundle {
    tiers: BTreeMap<Tier, Vec<Blob>>,
}

impl MemoryBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tier: Tier, blob: Blob) {
        self.tiers.entry(tier).or_default().push(blob);
    }

    pub fn with_blob(mut self, tier: Tier, name: &str, text: &str) -> Self {
        self.insert(tier, Blob::new(name, text));
        self
    }
}

impl BundledSource for MemoryBundle {
    fn blobs(&self, tier: Tier) -> Result<Vec<Blob>> {
        Ok(self.tiers.get(&tier).cloned().unwrap_or_default())
    }
}

/// Files written per tier by a seeding pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub written: BTreeMap<Tier, usize>,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.written.values().sum()
    }
}

/// Create `store_root` and copy every bundled tier into it.
///
/// Fails with a state error if `store_root` already exists.
pub fn seed_store(store_root: &Path, bundle: &dyn BundledSource) -> Result<SeedReport> {
    if store_root.exists() {
        return Err(CatalogError::State(format!(
            "refusing to seed {}: store already exists",
            store_root.display()
        )));
    }

    bundle.check()?;
    info!(store = %store_root.display(), "seeding level store from bundle");
    fs::create_dir_all(store_root)
        .map_err(|err| CatalogError::io("creating store", store_root, err))?;

    let mut report = SeedReport::default();
    for tier in Tier::ALL {
        let written = seed_tier(store_root, tier, bundle)?;
        report.written.insert(tier, written);
    }
    info!(levels = report.total(), "seeding finished");
    Ok(report)
}

fn seed_tier(store_root: &Path, tier: Tier, bundle: &dyn BundledSource) -> Result<usize> {
    let tier_dir = store_root.join(tier.as_str());
    fs::create_dir_all(&tier_dir)
        .map_err(|err| CatalogError::io("creating tier directory", &tier_dir, err))?;

    let blobs = bundle.blobs(tier)?;
    if blobs.is_empty() {
        warn!(%tier, "bundle has no levels for tier");
    }

    for blob in &blobs {
        let path = tier_dir.join(format!("{}.{LEVEL_EXTENSION}", blob.name));
        debug!(%tier, file = %path.display(), "writing seeded level");
        fs::write(&path, &blob.text)
            .map_err(|err| CatalogError::io("writing seeded level", &path, err))?;
    }
    Ok(blobs.len())
}
