//! Catalog lifecycle, selection, and match recording.
//!
//! The manager is an ordinary value: the host builds one at startup and hands
//! out references. Initialization runs once; any failure while seeding or
//! loading leaves the manager in `Failed` for the rest of the session, since a
//! partial catalog could attribute history to the wrong level.

use crate::catalog::TierIndex;
use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::level::{LevelRecord, MatchEntry, Outcome};
use crate::scene::SceneLauncher;
use crate::seed::{BundledSource, seed_store};
use crate::tier::Tier;
use chrono::Utc;
use std::fs;
use std::io;
use tracing::{debug, error, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogState {
    Uninitialized,
    Seeding,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug)]
pub struct CatalogManager {
    config: CatalogConfig,
    state: CatalogState,
    index: TierIndex,
    current_tier: Tier,
    selected: Option<(Tier, usize)>,
}

impl CatalogManager {
    /// Create an uninitialized manager. Performs no I/O.
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            state: CatalogState::Uninitialized,
            index: TierIndex::default(),
            current_tier: Tier::default(),
            selected: None,
        }
    }

    /// Create and initialize in one step.
    pub fn open(config: CatalogConfig, bundle: &dyn BundledSource) -> Result<Self> {
        let mut manager = Self::new(config);
        manager.initialize(bundle)?;
        Ok(manager)
    }

    /// Seed the store if it is absent, then load every tier.
    ///
    /// Only valid from `Uninitialized`. On error the manager moves to `Failed`
    /// and stays there.
    pub fn initialize(&mut self, bundle: &dyn BundledSource) -> Result<()> {
        if self.state != CatalogState::Uninitialized {
            return Err(CatalogError::State(format!(
                "catalog cannot be initialized from state {:?}",
                self.state
            )));
        }

        match self.seed_and_load(bundle) {
            Ok(index) => {
                self.index = index;
                self.state = CatalogState::Ready;
                let summary = self
                    .index
                    .counts()
                    .into_iter()
                    .map(|(tier, count)| format!("{tier}: {count}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                info!(total = self.index.total(), "catalog ready ({summary})");
                Ok(())
            }
            Err(err) => {
                self.state = CatalogState::Failed;
                error!("catalog initialization failed: {err}");
                Err(err)
            }
        }
    }

    fn seed_and_load(&mut self, bundle: &dyn BundledSource) -> Result<TierIndex> {
        let root = self.config.store_root.clone();

        if self.config.reset_on_start || !root.exists() {
            bundle.check()?;
        }

        if self.config.reset_on_start {
            warn!(store = %root.display(), "reset requested; deleting level store");
            match fs::remove_dir_all(&root) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(CatalogError::io("removing store", &root, err)),
            }
        }

        if !root.exists() {
            info!(store = %root.display(), "level store not found");
            self.state = CatalogState::Seeding;
            seed_store(&root, bundle)?;
        }

        self.state = CatalogState::Loading;
        info!(store = %root.display(), "loading levels");
        TierIndex::build_all(&root)
    }

    pub fn state(&self) -> CatalogState {
        self.state
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn index(&self) -> &TierIndex {
        &self.index
    }

    pub fn current_tier(&self) -> Tier {
        self.current_tier
    }

    /// Tier and position of the selected level, if any.
    pub fn selection(&self) -> Option<(Tier, usize)> {
        self.selected
    }

    pub fn selected_level(&self) -> Option<&LevelRecord> {
        let (tier, index) = self.selected?;
        self.index.levels(tier).get(index)
    }

    /// Levels of the current tier.
    pub fn levels(&self) -> Result<&[LevelRecord]> {
        self.ensure_ready("list levels")?;
        Ok(self.index.levels(self.current_tier))
    }

    pub fn select_tier(&mut self, tier: Tier) -> Result<()> {
        self.ensure_ready("select a tier")?;
        debug!(%tier, "tier selected");
        self.current_tier = tier;
        Ok(())
    }

    /// Select a level of the current tier by position.
    pub fn select_level(&mut self, index: usize) -> Result<&LevelRecord> {
        self.ensure_ready("select a level")?;
        let tier = self.current_tier;
        let len = self.index.levels(tier).len();
        if index >= len {
            return Err(CatalogError::Index { tier, index, len });
        }
        self.selected = Some((tier, index));
        debug!(%tier, index, "level selected");
        Ok(&self.index.levels(tier)[index])
    }

    /// Select a level and ask the presentation layer to switch to the game
    /// scene. Does not wait for the transition.
    pub fn start_level(&mut self, index: usize, launcher: &dyn SceneLauncher) -> Result<()> {
        self.select_level(index)?;
        info!(tier = %self.current_tier, index, "starting level");
        launcher.launch(&self.config.game_scene);
        Ok(())
    }

    /// Append a match to the selected level and persist it.
    ///
    /// If persisting fails the entry stays in memory and the error is
    /// returned; `persist_selected` retries the write.
    pub fn record_match(
        &mut self,
        outcome: Outcome,
        moves: u32,
        elapsed_seconds: u64,
    ) -> Result<MatchEntry> {
        self.ensure_ready("record a match")?;
        let record = self.selected_level_mut()?;
        let entry = record
            .append_match(outcome, moves, Utc::now(), elapsed_seconds)
            .clone();
        record.persist()?;
        info!(
            level = %record.path().display(),
            won = outcome.is_win(),
            moves,
            elapsed_seconds,
            "match recorded"
        );
        Ok(entry)
    }

    /// Write the selected level to disk again.
    pub fn persist_selected(&mut self) -> Result<()> {
        self.ensure_ready("persist a level")?;
        self.selected_level_mut()?.persist()
    }

    fn selected_level_mut(&mut self) -> Result<&mut LevelRecord> {
        let (tier, index) = self
            .selected
            .ok_or_else(|| CatalogError::State("no level selected".to_string()))?;
        self.index
            .level_mut(tier, index)
            .ok_or_else(|| CatalogError::State("selected level is no longer indexed".to_string()))
    }

    fn ensure_ready(&self, action: &str) -> Result<()> {
        if self.state == CatalogState::Ready {
            return Ok(());
        }
        Err(CatalogError::State(format!(
            "cannot {action}: catalog is {:?}, not Ready",
            self.state
        )))
    }
}
