//! Command-line front end for the level store.
//!
//! Opens (and on first run seeds) the store, then lists tiers, prints a level
//! document, records a match result, or resets the store back to the bundled
//! set. Results go to stdout as JSON; logs go to stderr (`RUST_LOG` controls
//! verbosity).

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use level_catalog::{
    CatalogConfig, CatalogManager, DirectoryBundle, MemoryBundle, Outcome, Tier,
    find_bundle_dir,
};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "level-catalog")]
#[command(about = "Inspect the level store and record match results")]
struct Cli {
    /// Store root; defaults to LEVEL_STORE_ROOT or LEVEL_DATA_DIR/Levels.
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Bundled level directory used when the store must be seeded.
    #[arg(long, global = true)]
    bundle: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print level counts per tier, or the levels of one tier.
    List {
        #[arg(long)]
        tier: Option<Tier>,
    },
    /// Print the full document of one level.
    Show {
        #[arg(long)]
        tier: Tier,
        #[arg(long)]
        index: usize,
    },
    /// Append a match result to a level and persist it.
    Record {
        #[arg(long)]
        tier: Tier,
        #[arg(long)]
        index: usize,
        /// Record a win; omit to record a loss.
        #[arg(long)]
        won: bool,
        #[arg(long)]
        moves: u32,
        #[arg(long)]
        elapsed: u64,
    },
    /// Delete the store and seed it again from the bundle.
    Reset,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.store {
        Some(path) => CatalogConfig::new(path),
        None => CatalogConfig::from_env()?,
    };
    if matches!(cli.command, Command::Reset) {
        config = config.with_reset_on_start(true);
    }

    let mut catalog = open_catalog(config, cli.bundle.as_ref())?;

    match cli.command {
        Command::List { tier: None } => {
            for (tier, count) in catalog.index().counts() {
                println!("{}", json!({"tier": tier.as_str(), "levels": count}));
            }
        }
        Command::List { tier: Some(tier) } => {
            catalog.select_tier(tier)?;
            for (index, level) in catalog.levels()?.iter().enumerate() {
                println!(
                    "{}",
                    json!({
                        "tier": tier.as_str(),
                        "index": index,
                        "name": level.name(),
                        "matches": level.history().len(),
                    })
                );
            }
        }
        Command::Show { tier, index } => {
            catalog.select_tier(tier)?;
            let level = catalog.select_level(index)?;
            println!("{}", serde_json::to_string_pretty(&level.to_document()?)?);
        }
        Command::Record {
            tier,
            index,
            won,
            moves,
            elapsed,
        } => {
            catalog.select_tier(tier)?;
            catalog.select_level(index)?;
            let entry = catalog
                .record_match(Outcome::from(won), moves, elapsed)
                .with_context(|| format!("recording match for tier {tier} level {index}"))?;
            println!("{}", serde_json::to_string(&entry)?);
        }
        Command::Reset => {
            println!(
                "{}",
                json!({
                    "store": catalog.config().store_root.display().to_string(),
                    "levels": catalog.index().total(),
                })
            );
        }
    }
    Ok(())
}

/// Open the catalog, only requiring a bundle when the store must be seeded.
fn open_catalog(config: CatalogConfig, bundle: Option<&PathBuf>) -> Result<CatalogManager> {
    let needs_seed = config.reset_on_start || !config.store_root.exists();
    let store = config.store_root.display().to_string();

    let catalog = if needs_seed {
        let bundle_dir = match bundle {
            Some(dir) if dir.is_dir() => dir.clone(),
            Some(dir) => bail!("bundle directory {} does not exist", dir.display()),
            None => find_bundle_dir()?,
        };
        CatalogManager::open(config, &DirectoryBundle::new(bundle_dir))
    } else {
        CatalogManager::open(config, &MemoryBundle::new())
    };
    catalog.with_context(|| format!("opening level store {store}"))
}
