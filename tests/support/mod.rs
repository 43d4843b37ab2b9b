#![allow(dead_code)]

use anyhow::{Context, Result};
use level_catalog::{CatalogConfig, MemoryBundle, Tier};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Scratch data directory whose store root does not exist until seeded.
pub struct TempStore {
    dir: TempDir,
    pub root: PathBuf,
}

impl TempStore {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("creating temp data dir")?;
        let root = dir.path().join("Levels");
        Ok(Self { dir, root })
    }

    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> CatalogConfig {
        CatalogConfig::new(&self.root)
    }

    pub fn tier_dir(&self, tier: Tier) -> PathBuf {
        self.root.join(tier.as_str())
    }
}

pub fn level_text(id: usize) -> String {
    json!({"id": id, "grid": [[id, 0], [0, id]], "par": id + 3}).to_string()
}

// Bundle with `count` levels in `tier` and nothing anywhere else.
pub fn bundle_with(tier: Tier, count: usize) -> MemoryBundle {
    (0..count).fold(MemoryBundle::new(), |bundle, id| {
        bundle.with_blob(tier, &format!("level_{id:02}"), &level_text(id))
    })
}

pub fn read_document(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

pub fn history_len(path: &Path) -> Result<usize> {
    Ok(read_document(path)?
        .get("history")
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0))
}

// Contents of every file under `root`, for asserting that nothing was written.
pub fn snapshot(root: &Path) -> Result<BTreeMap<PathBuf, Vec<u8>>> {
    let mut files = BTreeMap::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.insert(path.clone(), fs::read(&path)?);
            }
        }
    }
    Ok(files)
}
