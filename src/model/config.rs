use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::checkout::CrewId;
use super::tool::Inventory;

/// Storage key names in the durable store
pub mod keys {
    pub const SCHEDULE: &str = "toolCheckoutSchedule";
    pub const SCHEDULE_DATE: &str = "toolCheckoutDate";
    pub const LAST_UPDATE: &str = "toolLastUpdateTime";
    pub const INVENTORY: &str = "toolInventory";
    pub const HISTORY_PREFIX: &str = "toolHistory_";
    pub const HISTORY_INDEX: &str = "toolHistoryIndex";
    pub const PROBE: &str = "__toolcrib_probe__";

    pub fn history(date_key: &str) -> String {
        format!("{}{}", HISTORY_PREFIX, date_key)
    }
}

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub crews: CrewConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub format: FormatConfig,
    #[serde(default)]
    pub ui: UiConfig,
    /// Replaces the built-in default inventory when present
    #[serde(default)]
    pub inventory: Option<Inventory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewConfig {
    /// Default: see src/templates/config.toml
    #[serde(default = "default_crew_count")]
    pub count: u8,
    /// Optional display names, index 0 is crew 1
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Default for CrewConfig {
    fn default() -> Self {
        CrewConfig {
            count: default_crew_count(),
            labels: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_name_min")]
    pub name_min: usize,
    #[serde(default = "default_name_max")]
    pub name_max: usize,
    #[serde(default = "default_quantity_min")]
    pub quantity_min: u32,
    #[serde(default = "default_quantity_max")]
    pub quantity_max: u32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig {
            name_min: default_name_min(),
            name_max: default_name_max(),
            quantity_min: default_quantity_min(),
            quantity_max: default_quantity_max(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_autosave_secs")]
    pub autosave_secs: u64,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Byte budget for all stored values
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            autosave_secs: default_autosave_secs(),
            history_limit: default_history_limit(),
            quota_bytes: default_quota_bytes(),
        }
    }
}

/// chrono format strings for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    #[serde(default = "default_date_format")]
    pub date: String,
    #[serde(default = "default_time_format")]
    pub time: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            date: default_date_format(),
            time: default_time_format(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Per-pool colors, keyed by pool name ("hand", "power", ...)
    #[serde(default)]
    pub pool_colors: HashMap<String, String>,
    /// Start with every stack expanded
    #[serde(default)]
    pub expand_stacks: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
            pool_colors: HashMap::new(),
            expand_stacks: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_crew_count() -> u8 {
    8
}

fn default_name_min() -> usize {
    1
}

fn default_name_max() -> usize {
    50
}

fn default_quantity_min() -> u32 {
    1
}

fn default_quantity_max() -> u32 {
    999
}

fn default_autosave_secs() -> u64 {
    30
}

fn default_history_limit() -> usize {
    90
}

fn default_quota_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_date_format() -> String {
    "%A, %B %-d, %Y".into()
}

fn default_time_format() -> String {
    "%-I:%M %p".into()
}

impl AppConfig {
    /// Display label for a crew
    pub fn crew_label(&self, crew: CrewId) -> String {
        self.crews
            .labels
            .get(usize::from(crew.0).saturating_sub(1))
            .filter(|l| !l.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| format!("Crew {}", crew.0))
    }

    /// Inventory that Clear resets to
    pub fn default_inventory(&self) -> Inventory {
        self.inventory.clone().unwrap_or_else(Inventory::builtin)
    }
}
