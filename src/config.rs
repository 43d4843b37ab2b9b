//! Catalog configuration and environment resolution.
//!
//! Hosts usually build a `CatalogConfig` directly. The CLI resolves one from
//! the environment: `LEVEL_STORE_ROOT` names the store root outright, otherwise
//! `LEVEL_DATA_DIR` names the persistent data directory that holds `Levels/`.

use anyhow::{Result, bail};
use std::env;
use std::path::{Path, PathBuf};

/// Directory under the data dir that holds the tier directories.
pub const STORE_DIR_NAME: &str = "Levels";
/// Scene requested from the launcher when a level starts.
pub const DEFAULT_GAME_SCENE: &str = "Game";

pub const ENV_STORE_ROOT: &str = "LEVEL_STORE_ROOT";
pub const ENV_DATA_DIR: &str = "LEVEL_DATA_DIR";
pub const ENV_BUNDLE_DIR: &str = "LEVEL_BUNDLE_DIR";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Writable root containing one directory per tier.
    pub store_root: PathBuf,
    /// Delete the store before initializing so the bundle is seeded again.
    /// Discards all recorded history.
    pub reset_on_start: bool,
    pub game_scene: String,
}

impl CatalogConfig {
    pub fn new(store_root: impl Into<PathBuf>) -> Self {
        Self {
            store_root: store_root.into(),
            reset_on_start: false,
            game_scene: DEFAULT_GAME_SCENE.to_string(),
        }
    }

    /// Store at `<data_dir>/Levels`.
    pub fn for_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STORE_DIR_NAME))
    }

    pub fn with_reset_on_start(mut self, reset: bool) -> Self {
        self.reset_on_start = reset;
        self
    }

    pub fn with_game_scene(mut self, scene: impl Into<String>) -> Self {
        self.game_scene = scene.into();
        self
    }

    /// Resolve from `LEVEL_STORE_ROOT`, then `LEVEL_DATA_DIR`.
    pub fn from_env() -> Result<Self> {
        if let Some(root) = env_non_empty(ENV_STORE_ROOT) {
            return Ok(Self::new(root));
        }
        if let Some(data_dir) = env_non_empty(ENV_DATA_DIR) {
            return Ok(Self::for_data_dir(Path::new(&data_dir)));
        }
        bail!("Unable to locate the level store. Set {ENV_STORE_ROOT} or {ENV_DATA_DIR}.")
    }
}

/// Locate the bundled level directory.
///
/// Checks `LEVEL_BUNDLE_DIR`, then a `LEVEL_BUNDLE_HINT` set in the environment
/// of the compiler, then a `levels/` directory next to the current executable.
pub fn find_bundle_dir() -> Result<PathBuf> {
    if let Some(dir) = env_non_empty(ENV_BUNDLE_DIR) {
        let path = PathBuf::from(dir);
        if path.is_dir() {
            return Ok(path);
        }
        bail!("{ENV_BUNDLE_DIR} points at {}, which is not a directory", path.display());
    }

    if let Some(hint) = option_env!("LEVEL_BUNDLE_HINT") {
        let path = PathBuf::from(hint);
        if path.is_dir() {
            return Ok(path);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(candidate) = exe_path.parent().map(|dir| dir.join("levels")) {
            if candidate.is_dir() {
                return Ok(candidate);
            }
        }
    }

    bail!("Unable to locate bundled levels. Set {ENV_BUNDLE_DIR} to the bundle directory.")
}

fn env_non_empty(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}
