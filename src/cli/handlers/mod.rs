mod init;
pub use init::{cmd_config, cmd_init};

use std::path::Path;

use chrono::{DateTime, Local};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::persist::PersistentStore;
use crate::io::recovery;
use crate::model::config::AppConfig;
use crate::model::snapshot::{ScheduleSnapshot, parse_date_key};
use crate::model::tool::{Category, Inventory};
use crate::ops::board::Board;
use crate::ops::validate::{NewTool, parse_quantity, validate_new_tool};
use crate::ops::{report, schedule};

/// Error type for CLI commands
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid date {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("no saved schedule for {0}")]
    NoHistory(String),
    #[error("unknown category {0:?} (one of: hammers, saws, drills, drivers, measuring, levels, ladders, safety)")]
    UnknownCategory(String),
    #[error("{}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error("storage in {0} is not writable")]
    StorageUnavailable(String),
    #[error("could not save the board")]
    SaveFailed,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(
    command: Commands,
    data_dir: &Path,
    ephemeral: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        // Config file setup needs no store
        Commands::Init(args) => cmd_init(args, data_dir),
        Commands::Config(cmd) => cmd_config(cmd, data_dir),
        Commands::Recovery(args) => cmd_recovery(args, data_dir, json),

        Commands::History => cmd_history(data_dir, ephemeral, json),
        Commands::Show(args) => cmd_show(args, data_dir, ephemeral, json),
        Commands::Report(args) => cmd_report(args, data_dir, ephemeral),
        Commands::Add(args) => cmd_add(args, data_dir, ephemeral, json),
        Commands::ReturnAll => cmd_return_all(data_dir, ephemeral),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Config and store for a command that reads or writes the board.
fn open(data_dir: &Path, ephemeral: bool) -> Result<(AppConfig, PersistentStore), Box<dyn std::error::Error>> {
    let config = config_io::read_config(data_dir)?;
    let store = PersistentStore::open(data_dir, &config, ephemeral);
    Ok((config, store))
}

/// Today's saved board, or a fresh one over the saved inventory.
fn today_snapshot(store: &mut PersistentStore, config: &AppConfig, now: DateTime<Local>) -> ScheduleSnapshot {
    if let Some(snapshot) = store.load_snapshot(now.date_naive()) {
        return snapshot;
    }
    let inventory = store
        .load_inventory()
        .filter(|inv| !inv.is_empty())
        .unwrap_or_else(|| config.default_inventory());
    let mut snapshot = schedule::capture(&inventory, &Board::new(), config, now);
    snapshot.last_update_timestamp.clear();
    snapshot
}

/// The snapshot for `date` (today when `None`) from the today slot or history.
fn snapshot_for(
    date: Option<&str>,
    store: &mut PersistentStore,
    config: &AppConfig,
    now: DateTime<Local>,
) -> Result<ScheduleSnapshot, CliError> {
    let Some(raw) = date else {
        return Ok(today_snapshot(store, config, now));
    };
    let day = parse_date_key(raw).ok_or_else(|| CliError::InvalidDate(raw.to_string()))?;
    if day == now.date_naive() {
        return Ok(today_snapshot(store, config, now));
    }
    store
        .load_from_history(raw)
        .map(|record| record.snapshot)
        .ok_or_else(|| CliError::NoHistory(raw.to_string()))
}

/// Save the way the board does: today slot, inventory, then the history log.
fn save_board(
    store: &mut PersistentStore,
    inventory: &Inventory,
    board: &Board,
    config: &AppConfig,
    now: DateTime<Local>,
) -> Result<(), CliError> {
    let snapshot = schedule::capture(inventory, board, config, now);
    let ok = store.save_snapshot(&snapshot)
        && store.save_inventory(inventory)
        && store.save_to_history(&snapshot, None);
    if ok {
        tracing::info!(date = %snapshot.date, checkouts = snapshot.tool_count(), "saved from cli");
        Ok(())
    } else {
        Err(CliError::SaveFailed)
    }
}

fn require_storage(store: &mut PersistentStore, data_dir: &Path) -> Result<(), CliError> {
    if store.probe() {
        Ok(())
    } else {
        Err(CliError::StorageUnavailable(data_dir.display().to_string()))
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_history(data_dir: &Path, ephemeral: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (config, mut store) = open(data_dir, ephemeral)?;
    let entries = store.history_summary();

    if json {
        let out: Vec<HistoryEntryJson> = entries.iter().map(history_entry_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No saved history.");
    }
    for entry in &entries {
        println!("{}", format_history_entry(entry, &config));
    }
    Ok(())
}

fn cmd_show(args: DayArgs, data_dir: &Path, ephemeral: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (config, mut store) = open(data_dir, ephemeral)?;
    let snapshot = snapshot_for(args.date.as_deref(), &mut store, &config, Local::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&board_to_json(&snapshot, &config))?);
    } else {
        print!("{}", format_board(&snapshot, &config));
    }
    Ok(())
}

fn cmd_report(args: ReportArgs, data_dir: &Path, ephemeral: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (config, mut store) = open(data_dir, ephemeral)?;
    let snapshot = snapshot_for(args.date.as_deref(), &mut store, &config, Local::now())?;
    let text = report::render_report(&snapshot, &config);
    print!("{}", text);

    if args.save {
        let path = report::write_report(data_dir, snapshot.date, &text)?;
        eprintln!("Saved {}", path.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, data_dir: &Path, ephemeral: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (config, mut store) = open(data_dir, ephemeral)?;
    require_storage(&mut store, data_dir)?;

    let category = Category::parse_category(&args.category)
        .ok_or_else(|| CliError::UnknownCategory(args.category.clone()))?;
    let now = Local::now();
    let snapshot = today_snapshot(&mut store, &config, now);
    let (mut inventory, board) = schedule::restore(&snapshot, &config);

    let input = NewTool {
        name: args.name,
        quantity: parse_quantity(&args.quantity),
        category,
    };
    let def = validate_new_tool(&input, &inventory, &config.validation).map_err(CliError::Invalid)?;
    inventory.push(def.clone());
    save_board(&mut store, &inventory, &board, &config, now)?;

    if json {
        let out = ToolJson {
            name: def.name,
            quantity: def.quantity,
            category: def.category.to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "Added {} ({}) to {}",
            def.name,
            def.quantity,
            def.category.label()
        );
    }
    Ok(())
}

fn cmd_return_all(data_dir: &Path, ephemeral: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (config, mut store) = open(data_dir, ephemeral)?;
    require_storage(&mut store, data_dir)?;

    let now = Local::now();
    let snapshot = today_snapshot(&mut store, &config, now);
    let (inventory, mut board) = schedule::restore(&snapshot, &config);
    let count = board.return_all();
    if count == 0 {
        println!("No tools to return.");
        return Ok(());
    }
    save_board(&mut store, &inventory, &board, &config, now)?;
    println!(
        "Returned {} tool{} to the crib",
        count,
        if count == 1 { "" } else { "s" }
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

fn cmd_recovery(args: RecoveryArgs, data_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if args.prune {
        let before = args.all.then(|| chrono::Utc::now() + chrono::Duration::seconds(1));
        let removed = recovery::prune_recovery(data_dir, before)?;
        println!(
            "Pruned {} entr{}",
            removed,
            if removed == 1 { "y" } else { "ies" }
        );
        return Ok(());
    }

    let entries = recovery::read_recovery_entries(data_dir, Some(args.limit));
    if json {
        let out: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("Recovery log is empty.");
        return Ok(());
    }
    for entry in &entries {
        println!(
            "{}  {}: {}",
            entry
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M"),
            entry.category,
            entry.description
        );
        for (key, value) in &entry.fields {
            println!("    {}: {}", key, value);
        }
    }
    Ok(())
}
