// Catalog lifecycle, selection, and match-history guard rails.
mod support;

use anyhow::Result;
use level_catalog::{
    CatalogManager, CatalogState, DirectoryBundle, ErrorKind, MemoryBundle, NoopLauncher,
    Outcome, Tier,
};
use serde_json::json;
use std::cell::RefCell;
use std::fs;

use support::{TempStore, bundle_with, history_len, read_document, snapshot};

#[test]
fn absent_store_is_seeded_then_indexed() -> Result<()> {
    let store = TempStore::new()?;
    let catalog = CatalogManager::open(store.config(), &bundle_with(Tier::A, 3))?;

    assert_eq!(catalog.state(), CatalogState::Ready);
    assert_eq!(catalog.index().levels(Tier::A).len(), 3);
    for tier in Tier::ALL.into_iter().filter(|tier| *tier != Tier::A) {
        assert!(catalog.index().levels(tier).is_empty(), "{tier} should be empty");
        assert!(store.tier_dir(tier).is_dir());
    }
    assert_eq!(catalog.current_tier(), Tier::A);
    assert!(catalog.selected_level().is_none());
    Ok(())
}

#[test]
fn existing_store_is_loaded_without_seeding() -> Result<()> {
    let store = TempStore::new()?;
    for tier in Tier::ALL {
        fs::create_dir_all(store.tier_dir(tier))?;
    }
    fs::write(store.tier_dir(Tier::B).join("custom.json"), r#"{"grid": []}"#)?;

    let catalog = CatalogManager::open(store.config(), &bundle_with(Tier::A, 3))?;
    assert!(catalog.index().levels(Tier::A).is_empty());
    assert_eq!(catalog.index().levels(Tier::B).len(), 1);
    assert_eq!(catalog.index().total(), 1);
    Ok(())
}

#[test]
fn recording_a_match_appends_to_the_level_file() -> Result<()> {
    let store = TempStore::new()?;
    let mut catalog = CatalogManager::open(store.config(), &bundle_with(Tier::A, 2))?;
    catalog.select_tier(Tier::A)?;
    let path = catalog.select_level(0)?.path().to_path_buf();
    let before = history_len(&path)?;
    let original = read_document(&path)?;

    let entry = catalog.record_match(Outcome::Won, 10, 30)?;
    assert_eq!(entry.moves(), 10);

    let document = read_document(&path)?;
    let history = document["history"].as_array().expect("history array");
    assert_eq!(history.len(), before + 1);
    assert_eq!(history[before]["won"], json!(true));
    assert_eq!(history[before]["moves"], json!(10));
    assert_eq!(history[before]["elapsedSeconds"], json!(30));
    assert_eq!(document["par"], original["par"], "puzzle fields pass through");
    assert_eq!(document["grid"], original["grid"]);
    Ok(())
}

#[test]
fn repeated_records_persist_in_call_order() -> Result<()> {
    let store = TempStore::new()?;
    let mut catalog = CatalogManager::open(store.config(), &bundle_with(Tier::C, 1))?;
    catalog.select_tier(Tier::C)?;
    let path = catalog.select_level(0)?.path().to_path_buf();

    let moves = [5_u32, 8, 13, 21];
    for (i, m) in moves.iter().enumerate() {
        catalog.record_match(Outcome::from(i % 2 == 0), *m, u64::from(*m) * 2)?;
    }

    let document = read_document(&path)?;
    let recorded: Vec<u64> = document["history"]
        .as_array()
        .expect("history array")
        .iter()
        .map(|entry| entry["moves"].as_u64().expect("moves"))
        .collect();
    assert_eq!(recorded, vec![5, 8, 13, 21]);

    let reopened = CatalogManager::open(store.config(), &MemoryBundle::new())?;
    assert_eq!(reopened.index().levels(Tier::C)[0].history().len(), moves.len());
    Ok(())
}

#[test]
fn out_of_range_selection_keeps_previous_selection() -> Result<()> {
    let store = TempStore::new()?;
    let mut catalog = CatalogManager::open(store.config(), &bundle_with(Tier::A, 2))?;
    catalog.select_level(1)?;

    let err = catalog.select_level(2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Index);
    assert_eq!(catalog.selection(), Some((Tier::A, 1)));

    catalog.select_tier(Tier::H)?;
    let err = catalog.select_level(0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Index);
    assert_eq!(catalog.selection(), Some((Tier::A, 1)));
    Ok(())
}

#[test]
fn recording_without_selection_writes_nothing() -> Result<()> {
    let store = TempStore::new()?;
    let mut catalog = CatalogManager::open(store.config(), &bundle_with(Tier::A, 2))?;
    let before = snapshot(&store.root)?;

    let err = catalog.record_match(Outcome::Lost, 3, 4).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::State);
    assert_eq!(snapshot(&store.root)?, before);
    Ok(())
}

#[test]
fn operations_require_ready_state() -> Result<()> {
    let store = TempStore::new()?;
    let mut catalog = CatalogManager::new(store.config());
    assert_eq!(catalog.state(), CatalogState::Uninitialized);

    assert_eq!(catalog.select_tier(Tier::B).unwrap_err().kind(), ErrorKind::State);
    assert_eq!(catalog.select_level(0).unwrap_err().kind(), ErrorKind::State);
    assert_eq!(
        catalog.record_match(Outcome::Won, 1, 1).unwrap_err().kind(),
        ErrorKind::State
    );
    assert!(!store.root.exists(), "new() must not touch the filesystem");

    catalog.initialize(&MemoryBundle::new())?;
    let again = catalog.initialize(&MemoryBundle::new()).unwrap_err();
    assert_eq!(again.kind(), ErrorKind::State);
    assert_eq!(catalog.state(), CatalogState::Ready);
    Ok(())
}

#[test]
fn corrupt_level_leaves_catalog_failed() -> Result<()> {
    let store = TempStore::new()?;
    let bundle = bundle_with(Tier::A, 2).with_blob(Tier::E, "broken", "{\"grid\": [");

    let mut catalog = CatalogManager::new(store.config());
    let err = catalog.initialize(&bundle).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(catalog.state(), CatalogState::Failed);
    assert!(catalog.index().levels(Tier::A).is_empty());

    // No automatic re-seed: the broken file is still there.
    assert!(store.tier_dir(Tier::E).join("broken.json").is_file());
    let retry = catalog.initialize(&bundle).unwrap_err();
    assert_eq!(retry.kind(), ErrorKind::State);
    assert_eq!(catalog.select_level(0).unwrap_err().kind(), ErrorKind::State);
    Ok(())
}

#[test]
fn failed_persist_keeps_entry_for_retry() -> Result<()> {
    let store = TempStore::new()?;
    let mut catalog = CatalogManager::open(store.config(), &bundle_with(Tier::G, 1))?;
    catalog.select_tier(Tier::G)?;
    catalog.select_level(0)?;

    let tier_dir = store.tier_dir(Tier::G);
    let saved = fs::read(tier_dir.join("level_00.json"))?;
    fs::remove_dir_all(&tier_dir)?;

    let err = catalog.record_match(Outcome::Won, 7, 12).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    let selected = catalog.selected_level().expect("selection survives");
    assert_eq!(selected.history().len(), 1);

    fs::create_dir_all(&tier_dir)?;
    fs::write(tier_dir.join("level_00.json"), saved)?;
    catalog.persist_selected()?;
    assert_eq!(history_len(&tier_dir.join("level_00.json"))?, 1);
    Ok(())
}

#[test]
fn reset_on_start_discards_history_and_reseeds() -> Result<()> {
    let store = TempStore::new()?;
    let bundle = bundle_with(Tier::A, 1);
    {
        let mut catalog = CatalogManager::open(store.config(), &bundle)?;
        catalog.select_level(0)?;
        catalog.record_match(Outcome::Won, 4, 9)?;
    }
    fs::write(store.tier_dir(Tier::J).join("stray.json"), "{}")?;

    let catalog = CatalogManager::open(store.config().with_reset_on_start(true), &bundle)?;
    assert!(catalog.index().levels(Tier::A)[0].history().is_empty());
    assert!(catalog.index().levels(Tier::J).is_empty());
    Ok(())
}

#[test]
fn reset_without_readable_bundle_keeps_store() -> Result<()> {
    let store = TempStore::new()?;
    {
        let mut catalog = CatalogManager::open(store.config(), &bundle_with(Tier::A, 2))?;
        catalog.select_level(1)?;
        catalog.record_match(Outcome::Lost, 7, 12)?;
    }
    let before = snapshot(&store.root)?;

    let missing = DirectoryBundle::new(store.data_dir().join("missing_bundle"));
    let mut catalog = CatalogManager::new(store.config().with_reset_on_start(true));
    let err = catalog.initialize(&missing).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(catalog.state(), CatalogState::Failed);
    assert_eq!(snapshot(&store.root)?, before);
    Ok(())
}

#[test]
fn start_level_hands_game_scene_to_launcher() -> Result<()> {
    let store = TempStore::new()?;
    let config = store.config().with_game_scene("Board");
    let mut catalog = CatalogManager::open(config, &bundle_with(Tier::T, 2))?;
    catalog.select_tier(Tier::T)?;

    let launched = RefCell::new(Vec::new());
    let launcher = |scene: &str| launched.borrow_mut().push(scene.to_string());
    catalog.start_level(1, &launcher)?;
    assert_eq!(launched.borrow().as_slice(), ["Board".to_string()]);
    assert_eq!(catalog.selection(), Some((Tier::T, 1)));

    assert_eq!(
        catalog.start_level(5, &NoopLauncher).unwrap_err().kind(),
        ErrorKind::Index
    );
    assert_eq!(launched.borrow().len(), 1);
    Ok(())
}
