use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};

use crate::io::recovery::atomic_write;
use crate::model::config::AppConfig;
use crate::model::snapshot::{SNAPSHOT_TIME_FORMAT, ScheduleSnapshot, date_key};
use crate::ops::schedule;

pub fn report_path(data_dir: &Path, date: NaiveDate) -> PathBuf {
    data_dir
        .join("reports")
        .join(format!("{}.txt", date_key(date)))
}

/// Write a rendered report to `<data_dir>/reports/<date>.txt`, replacing
/// any earlier report for that day.
pub fn write_report(data_dir: &Path, date: NaiveDate, text: &str) -> std::io::Result<PathBuf> {
    let path = report_path(data_dir, date);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    atomic_write(&path, text.as_bytes())?;
    tracing::info!(path = %path.display(), "report written");
    Ok(path)
}

/// Plain-text daily sheet for printing.
pub fn render_report(snapshot: &ScheduleSnapshot, config: &AppConfig) -> String {
    let (inventory, board) = schedule::restore(snapshot, config);
    let mut out = String::new();

    out.push_str("TOOL CHECKOUT SHEET\n");
    out.push_str(&format!("{}\n", snapshot.date.format(&config.format.date)));
    if !snapshot.last_update_timestamp.is_empty() {
        out.push_str(&format!("Last updated: {}\n", snapshot.last_update_timestamp));
    }

    for group in board.checkout_groups(config.crews.count) {
        out.push('\n');
        out.push_str(&format!(
            "{} ({})\n",
            config.crew_label(group.crew_id),
            group.tools.len()
        ));
        if group.tools.is_empty() {
            out.push_str("  -\n");
        }
        for entry in &group.tools {
            let time = NaiveTime::parse_from_str(&entry.time, SNAPSHOT_TIME_FORMAT)
                .map(|t| t.format(&config.format.time).to_string())
                .unwrap_or_else(|_| entry.time.clone());
            out.push_str(&format!("  {} #{}  {}\n", entry.tool, entry.number, time));
        }
    }

    out.push_str(&format!("\nBroken ({})\n", board.broken().len()));
    if board.broken().is_empty() {
        out.push_str("  -\n");
    }
    for b in board.broken() {
        out.push_str(&format!("  {}\n", b));
    }

    out.push_str("\nAvailable\n");
    for (category, tools) in inventory.categories() {
        if tools.is_empty() {
            continue;
        }
        let items: Vec<String> = tools
            .iter()
            .map(|d| format!("{} {}/{}", d.name, board.available_count(d), d.quantity))
            .collect();
        out.push_str(&format!("  {}: {}\n", category.label(), items.join(", ")));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::checkout::CrewId;
    use crate::model::snapshot::{BrokenEntry, CheckoutEntry, CrewCheckouts};
    use crate::model::tool::{Category, Inventory, ToolDefinition};
    use chrono::NaiveDate;

    #[test]
    fn report_layout() {
        let mut config = AppConfig::default();
        config.crews.count = 2;
        let mut inventory = Inventory::new();
        inventory.push(ToolDefinition::new("Claw Hammer", 3, Category::Hammers));
        let snapshot = ScheduleSnapshot {
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            last_update_timestamp: "Saturday, October 17, 2026 9:00 AM".into(),
            inventory,
            checkouts: vec![CrewCheckouts {
                crew_id: CrewId(2),
                tools: vec![CheckoutEntry {
                    tool: "Claw Hammer".into(),
                    number: 3,
                    time: "07:05".into(),
                }],
            }],
            broken: vec![BrokenEntry {
                name: "Claw Hammer".into(),
                number: 1,
            }],
        };

        insta::assert_snapshot!(render_report(&snapshot, &config), @r"
        TOOL CHECKOUT SHEET
        Saturday, October 17, 2026
        Last updated: Saturday, October 17, 2026 9:00 AM

        Crew 1 (0)
          -

        Crew 2 (1)
          Claw Hammer #3  7:05 AM

        Broken (1)
          Claw Hammer #1

        Available
          Hammers: Claw Hammer 1/3
        ");
    }
}
