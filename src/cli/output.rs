use chrono::{Local, NaiveTime};
use serde::Serialize;

use crate::model::config::AppConfig;
use crate::model::snapshot::{HistorySummary, SNAPSHOT_TIME_FORMAT, ScheduleSnapshot};
use crate::ops::schedule;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct HistoryEntryJson {
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
    pub tools_out: usize,
    pub crews: usize,
    pub broken: usize,
}

#[derive(Serialize)]
pub struct BoardJson {
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    pub crews: Vec<CrewJson>,
    pub broken: Vec<InstanceJson>,
    pub available: Vec<StockJson>,
}

#[derive(Serialize)]
pub struct CrewJson {
    pub crew: u8,
    pub label: String,
    pub tools: Vec<CheckoutJson>,
}

#[derive(Serialize)]
pub struct CheckoutJson {
    pub tool: String,
    pub number: u32,
    pub time: String,
}

#[derive(Serialize)]
pub struct InstanceJson {
    pub tool: String,
    pub number: u32,
}

#[derive(Serialize)]
pub struct StockJson {
    pub name: String,
    pub category: String,
    pub available: u32,
    pub quantity: u32,
}

#[derive(Serialize)]
pub struct ToolJson {
    pub name: String,
    pub quantity: u32,
    pub category: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn history_entry_to_json(entry: &HistorySummary) -> HistoryEntryJson {
    HistoryEntryJson {
        date: entry.date_key.clone(),
        saved_at: entry
            .saved_at
            .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
        tools_out: entry.tool_count,
        crews: entry.crew_count,
        broken: entry.broken_count,
    }
}

pub fn board_to_json(snapshot: &ScheduleSnapshot, config: &AppConfig) -> BoardJson {
    let (inventory, board) = schedule::restore(snapshot, config);
    BoardJson {
        date: crate::model::snapshot::date_key(snapshot.date),
        last_update: (!snapshot.last_update_timestamp.is_empty())
            .then(|| snapshot.last_update_timestamp.clone()),
        crews: board
            .checkout_groups(config.crews.count)
            .into_iter()
            .map(|group| CrewJson {
                crew: group.crew_id.0,
                label: config.crew_label(group.crew_id),
                tools: group
                    .tools
                    .into_iter()
                    .map(|t| CheckoutJson {
                        tool: t.tool,
                        number: t.number,
                        time: t.time,
                    })
                    .collect(),
            })
            .collect(),
        broken: board
            .broken()
            .iter()
            .map(|i| InstanceJson {
                tool: i.tool.clone(),
                number: i.number,
            })
            .collect(),
        available: inventory
            .definitions()
            .map(|d| StockJson {
                name: d.name.clone(),
                category: d.category.to_string(),
                available: board.available_count(d),
                quantity: d.quantity,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// One line per saved day
pub fn format_history_entry(entry: &HistorySummary, config: &AppConfig) -> String {
    let saved = entry
        .saved_at
        .map(|t| {
            t.with_timezone(&Local)
                .format(&format!("%Y-%m-%d {}", config.format.time))
                .to_string()
        })
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}  saved {}  {} out, {} crews, {} broken",
        entry.date_key, saved, entry.tool_count, entry.crew_count, entry.broken_count
    )
}

/// Who has what, crew by crew. Crews holding nothing are left out.
pub fn format_board(snapshot: &ScheduleSnapshot, config: &AppConfig) -> String {
    let (_, board) = schedule::restore(snapshot, config);
    let mut out = format!("{}\n", snapshot.date.format(&config.format.date));

    let groups: Vec<_> = board
        .checkout_groups(config.crews.count)
        .into_iter()
        .filter(|g| !g.tools.is_empty())
        .collect();
    if groups.is_empty() {
        out.push_str("\nNo tools checked out.\n");
    }
    for group in groups {
        out.push_str(&format!(
            "\n{} ({})\n",
            config.crew_label(group.crew_id),
            group.tools.len()
        ));
        for t in &group.tools {
            let time = NaiveTime::parse_from_str(&t.time, SNAPSHOT_TIME_FORMAT)
                .map(|at| at.format(&config.format.time).to_string())
                .unwrap_or_else(|_| t.time.clone());
            out.push_str(&format!("  {} #{}  {}\n", t.tool, t.number, time));
        }
    }

    if !board.broken().is_empty() {
        out.push_str(&format!("\nBroken ({})\n", board.broken().len()));
        for b in board.broken() {
            out.push_str(&format!("  {}\n", b));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::checkout::CrewId;
    use crate::model::snapshot::{CheckoutEntry, CrewCheckouts};
    use crate::model::tool::Inventory;
    use chrono::NaiveDate;

    fn snapshot() -> ScheduleSnapshot {
        ScheduleSnapshot {
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            last_update_timestamp: String::new(),
            inventory: Inventory::builtin(),
            checkouts: vec![CrewCheckouts {
                crew_id: CrewId(3),
                tools: vec![CheckoutEntry {
                    tool: "Tape Measure".into(),
                    number: 2,
                    time: "13:40".into(),
                }],
            }],
            broken: vec![],
        }
    }

    #[test]
    fn board_text_skips_idle_crews() {
        insta::assert_snapshot!(format_board(&snapshot(), &AppConfig::default()), @r"
        Saturday, October 17, 2026

        Crew 3 (1)
          Tape Measure #2  1:40 PM
        ");
    }

    #[test]
    fn board_json_counts_stock() {
        let json = board_to_json(&snapshot(), &AppConfig::default());
        assert_eq!(json.date, "2026-10-17");
        assert!(json.last_update.is_none());
        assert_eq!(json.crews.len(), 8);
        assert_eq!(json.crews[2].tools[0].tool, "Tape Measure");
        let tape = json
            .available
            .iter()
            .find(|s| s.name == "Tape Measure")
            .unwrap();
        assert_eq!((tape.available, tape.quantity), (9, 10));
        assert_eq!(tape.category, "measuring");
    }
}
