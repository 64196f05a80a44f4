use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::checkout::CrewId;
use super::tool::Inventory;

/// Format used for history date keys and the staleness marker
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format used for checkout times inside a snapshot
pub const SNAPSHOT_TIME_FORMAT: &str = "%H:%M";

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

/// Serializable capture of one day's board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSnapshot {
    pub date: NaiveDate,
    #[serde(default)]
    pub last_update_timestamp: String,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub checkouts: Vec<CrewCheckouts>,
    #[serde(default)]
    pub broken: Vec<BrokenEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewCheckouts {
    pub crew_id: CrewId,
    #[serde(default)]
    pub tools: Vec<CheckoutEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutEntry {
    pub tool: String,
    pub number: u32,
    #[serde(default)]
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenEntry {
    pub name: String,
    pub number: u32,
}

impl ScheduleSnapshot {
    /// Number of checked-out instances across all crews
    pub fn tool_count(&self) -> usize {
        self.checkouts.iter().map(|c| c.tools.len()).sum()
    }

    /// Number of crews holding at least one instance
    pub fn crew_count(&self) -> usize {
        self.checkouts.iter().filter(|c| !c.tools.is_empty()).count()
    }

    pub fn broken_count(&self) -> usize {
        self.broken.len()
    }
}

/// One archived day in the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    #[serde(flatten)]
    pub snapshot: ScheduleSnapshot,
    pub saved_at: DateTime<Utc>,
    pub date_key: String,
}

/// Per-entry counts shown when browsing history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub date_key: String,
    pub saved_at: Option<DateTime<Utc>>,
    pub tool_count: usize,
    pub crew_count: usize,
    pub broken_count: usize,
}

impl HistorySummary {
    pub fn from_record(record: &HistoryRecord) -> Self {
        HistorySummary {
            date_key: record.date_key.clone(),
            saved_at: Some(record.saved_at),
            tool_count: record.snapshot.tool_count(),
            crew_count: record.snapshot.crew_count(),
            broken_count: record.snapshot.broken_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tool::{Category, ToolDefinition};

    fn sample() -> ScheduleSnapshot {
        let mut inventory = Inventory::new();
        inventory.push(ToolDefinition::new("Claw Hammer", 2, Category::Hammers));
        ScheduleSnapshot {
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            last_update_timestamp: "Saturday, October 17, 2026 7:05 AM".into(),
            inventory,
            checkouts: vec![
                CrewCheckouts {
                    crew_id: CrewId(2),
                    tools: vec![CheckoutEntry {
                        tool: "Claw Hammer".into(),
                        number: 1,
                        time: "07:05".into(),
                    }],
                },
                CrewCheckouts {
                    crew_id: CrewId(3),
                    tools: vec![],
                },
            ],
            broken: vec![BrokenEntry {
                name: "Claw Hammer".into(),
                number: 2,
            }],
        }
    }

    #[test]
    fn snapshot_json_uses_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["date"], "2026-10-17");
        assert!(json.get("lastUpdateTimestamp").is_some());
        assert_eq!(json["checkouts"][0]["crewId"], 2);
        assert_eq!(json["checkouts"][0]["tools"][0]["time"], "07:05");
        assert_eq!(json["broken"][0]["name"], "Claw Hammer");
    }

    #[test]
    fn counts() {
        let snap = sample();
        assert_eq!(snap.tool_count(), 1);
        assert_eq!(snap.crew_count(), 1);
        assert_eq!(snap.broken_count(), 1);
    }

    #[test]
    fn history_record_flattens_snapshot() {
        let record = HistoryRecord {
            snapshot: sample(),
            saved_at: Utc::now(),
            date_key: "2026-10-17".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["dateKey"], "2026-10-17");
        assert_eq!(json["date"], "2026-10-17");
        let back: HistoryRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn minimal_snapshot_defaults() {
        let snap: ScheduleSnapshot = serde_json::from_str(r#"{"date":"2026-10-17"}"#).unwrap();
        assert!(snap.inventory.is_empty());
        assert!(snap.checkouts.is_empty());
        assert!(snap.broken.is_empty());
    }

    #[test]
    fn date_keys() {
        let d = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(date_key(d), "2026-01-05");
        assert_eq!(parse_date_key("2026-01-05"), Some(d));
        assert_eq!(parse_date_key("Jan 5"), None);
    }
}
