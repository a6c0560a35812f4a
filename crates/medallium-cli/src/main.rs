//! `medallium`: inspect and drive one player's collection progress.
//!
//! A save directory holds the catalog (`catalog.json`), an optional
//! `medallium.yaml`, optional puzzle statistics (`game_stats.json`), and
//! the progress and reward files the engine writes.
//!
//! # Startup Sequence
//!
//! 1. Parse arguments and load configuration
//! 2. Initialize structured logging (tracing)
//! 3. Read the catalog
//! 4. Build the engine over a directory store and load progress
//! 5. Open the wallet and cosmetic stores, feed their stats to the engine
//! 6. Run the command and print the result

mod error;
mod file_store;
mod profile;
mod report;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use medallium_core::{CollectionEngine, MedalliumConfig, SystemClock};
use medallium_progress::Catalog;
use medallium_types::{CollectibleItem, GameStats};

use crate::error::CliError;
use crate::file_store::DirStore;
use crate::profile::Profile;

#[derive(Parser)]
#[command(name = "medallium")]
#[command(about = "Collection progress, achievements and rewards for a Yo-kai guessing game")]
#[command(version)]
struct Cli {
    /// Save directory (defaults to the current directory)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// Config file (defaults to medallium.yaml in the save directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Catalog file (defaults to catalog.json in the save directory)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show aggregate collection statistics
    Stats,

    /// Unlock one or more items by id
    Unlock {
        /// Catalog item ids
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Recompute every circle and re-evaluate achievements
    Recompute,

    /// Claim a completed circle's or unlocked achievement's reward
    Claim {
        #[command(subcommand)]
        target: ClaimTarget,
    },

    /// List rewards ready to claim
    Claimable,

    /// List achievements (hidden ones stay masked until unlocked)
    Achievements,

    /// Show points and owned cosmetics
    Wallet,
}

#[derive(Subcommand)]
enum ClaimTarget {
    /// Claim a circle reward
    Circle {
        /// Circle id
        id: String,
    },
    /// Claim an achievement reward
    Achievement {
        /// Achievement id
        id: String,
    },
}

fn load_config(cli: &Cli, dir: &Path) -> Result<MedalliumConfig, CliError> {
    if let Some(path) = &cli.config {
        return Ok(MedalliumConfig::from_file(path)?);
    }
    let default_path = dir.join("medallium.yaml");
    if default_path.exists() {
        Ok(MedalliumConfig::from_file(&default_path)?)
    } else {
        Ok(MedalliumConfig::parse("")?)
    }
}

fn init_tracing(config: &MedalliumConfig, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_catalog(path: &Path) -> Result<Vec<CollectibleItem>, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::CatalogIo {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::CatalogJson {
        path: path.to_owned(),
        source,
    })
}

fn read_game_stats(dir: &Path) -> GameStats {
    let path = dir.join("game_stats.json");
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return GameStats::default();
    };
    serde_json::from_str(&contents).unwrap_or_else(|err| {
        warn!(path = %path.display(), error = %err, "ignoring unreadable game stats");
        GameStats::default()
    })
}

fn emit<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    human: impl FnOnce(&T) -> String,
) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", human(value));
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let dir = cli.dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let config = load_config(&cli, &dir)?;
    init_tracing(&config, cli.verbose);
    info!(dir = %dir.display(), "medallium starting");

    let catalog_path = cli
        .catalog
        .clone()
        .unwrap_or_else(|| dir.join("catalog.json"));
    let items = read_catalog(&catalog_path)?;

    let mut engine = CollectionEngine::from_config(
        &config,
        Catalog::from_provider(&items),
        Box::new(DirStore::new(&dir)),
        Box::new(SystemClock),
    )?;
    let loaded = engine.load();
    if !loaded.achievements_unlocked.is_empty() {
        info!(count = loaded.achievements_unlocked.len(), "achievements unlocked on load");
    }

    let mut profile = Profile::open(&dir)?;
    engine.record_game_stats(read_game_stats(&dir));
    engine.record_economy_stats(profile.economy_stats());

    match cli.command.unwrap_or(Commands::Stats) {
        Commands::Stats => emit(cli.json, &engine.get_stats(), report::stats)?,
        Commands::Unlock { items } => {
            for id in items {
                match engine.try_unlock_item(&id) {
                    Ok(outcome) => emit(cli.json, &outcome, report::unlock)?,
                    Err(err) => warn!(item_id = %id, error = %err, "unlock skipped"),
                }
            }
        }
        Commands::Recompute => {
            let circles = engine.recompute_circles();
            let achievements = engine.recompute_achievements();
            info!(
                circles_completed = circles.len(),
                achievements_unlocked = achievements.len(),
                "recompute finished"
            );
            emit(cli.json, &engine.get_stats(), report::stats)?;
        }
        Commands::Claim { target } => {
            let result = match &target {
                ClaimTarget::Circle { id } => {
                    engine.try_claim_circle_reward(id, &mut profile.sinks())
                }
                ClaimTarget::Achievement { id } => {
                    engine.try_claim_achievement_reward(id, &mut profile.sinks())
                }
            };
            match result {
                Ok(receipt) => emit(cli.json, &receipt, report::receipt)?,
                Err(err) => {
                    warn!(error = %err, kind = ?err.kind(), "claim rejected");
                    println!("Not claimed: {err}");
                }
            }
        }
        Commands::Claimable => {
            emit(cli.json, engine.claimable_rewards().as_slice(), report::claimable)?;
        }
        Commands::Achievements => {
            emit(cli.json, engine.achievement_views().as_slice(), report::achievements)?;
        }
        Commands::Wallet => emit(cli.json, &profile.summary(), report::wallet)?,
    }
    Ok(())
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the catalog, authored data, or a
/// save file cannot be loaded.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli)?;
    Ok(())
}
