use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::io::recovery::{self, RecoveryCategory};
use crate::io::store::{FileStore, KeyValueStore, MemoryStore, StoreError};
use crate::model::config::{AppConfig, keys};
use crate::model::snapshot::{HistoryRecord, HistorySummary, ScheduleSnapshot, date_key};
use crate::model::tool::Inventory;

/// Best-effort JSON persistence over a [`KeyValueStore`].
///
/// Every operation fails soft: reads fall back to a default, writes report
/// `false`, and the reason goes to the tracing log (plus the recovery log for
/// writes that dropped data). Nothing here returns an error to the caller.
pub struct PersistentStore {
    backend: Box<dyn KeyValueStore>,
    available: Option<bool>,
    history_limit: usize,
    /// Where dropped payloads are recorded; `None` keeps them in the tracing log only
    recovery_dir: Option<PathBuf>,
}

impl PersistentStore {
    pub fn new(backend: Box<dyn KeyValueStore>, history_limit: usize) -> Self {
        PersistentStore {
            backend,
            available: None,
            history_limit,
            recovery_dir: None,
        }
    }

    /// The store the board and CLI share: files in `data_dir`, or memory
    /// only when `ephemeral`. Dropped writes go to the data dir's recovery
    /// log, except in ephemeral runs, which touch nothing on disk.
    pub fn open(data_dir: &Path, config: &AppConfig, ephemeral: bool) -> Self {
        if ephemeral {
            let backend = MemoryStore::with_quota(config.storage.quota_bytes);
            return PersistentStore::new(Box::new(backend), config.storage.history_limit);
        }
        let backend = FileStore::new(data_dir, config.storage.quota_bytes);
        PersistentStore::new(Box::new(backend), config.storage.history_limit)
            .with_recovery_dir(data_dir)
    }

    pub fn with_recovery_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.recovery_dir = Some(dir.into());
        self
    }

    /// Check that the backend accepts a write and a delete. Cached after the first call.
    pub fn probe(&mut self) -> bool {
        if let Some(available) = self.available {
            return available;
        }
        let result = self
            .backend
            .set(keys::PROBE, "1")
            .and_then(|()| self.backend.remove(keys::PROBE));
        let available = match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(store = %self.backend.describe(), error = %e, "storage unavailable, running in memory only");
                false
            }
        };
        self.available = Some(available);
        available
    }

    pub fn is_available(&mut self) -> bool {
        self.probe()
    }

    /// Decoded value for `key`, or `default` when missing, corrupt, or unavailable.
    pub fn read<T: DeserializeOwned>(&mut self, key: &str, default: T) -> T {
        if !self.probe() {
            return default;
        }
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed");
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring malformed stored value");
                if let Some(dir) = &self.recovery_dir {
                    recovery::log_dropped_write(dir, RecoveryCategory::Parse, key, &e.to_string(), &raw);
                }
                default
            }
        }
    }

    fn read_opt<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        self.read::<Option<T>>(key, None)
    }

    /// Encode and store. Returns whether the write landed.
    pub fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> bool {
        if !self.probe() {
            return false;
        }
        let payload = match serde_json::to_string(value) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(key, error = %e, "could not encode value");
                return false;
            }
        };
        match self.backend.set(key, &payload) {
            Ok(()) => true,
            Err(e) => {
                let category = match &e {
                    StoreError::QuotaExceeded { .. } => RecoveryCategory::Quota,
                    _ => RecoveryCategory::Unavailable,
                };
                tracing::warn!(key, error = %e, "storage write dropped");
                if let Some(dir) = &self.recovery_dir {
                    recovery::log_dropped_write(dir, category, key, &e.to_string(), &payload);
                }
                false
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        if !self.probe() {
            return false;
        }
        match self.backend.remove(key) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage delete failed");
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Today's quick-save slot
    // -----------------------------------------------------------------------

    /// Write the "today" slot plus its date marker and last-update text.
    pub fn save_snapshot(&mut self, snapshot: &ScheduleSnapshot) -> bool {
        let ok = self.write(keys::SCHEDULE, snapshot);
        if !ok {
            return false;
        }
        let marker_ok = self.write(keys::SCHEDULE_DATE, &date_key(snapshot.date));
        self.write(keys::LAST_UPDATE, &snapshot.last_update_timestamp);
        marker_ok
    }

    /// Today's snapshot, or `None` when the stored one belongs to another day.
    pub fn load_snapshot(&mut self, today: NaiveDate) -> Option<ScheduleSnapshot> {
        let marker: Option<String> = self.read_opt(keys::SCHEDULE_DATE);
        if marker.as_deref() != Some(date_key(today).as_str()) {
            if marker.is_some() {
                tracing::info!(marker = ?marker, "stored schedule is from another day, starting fresh");
            }
            return None;
        }
        let snapshot: ScheduleSnapshot = self.read_opt(keys::SCHEDULE)?;
        if snapshot.date != today {
            tracing::warn!(date = %snapshot.date, "schedule date disagrees with its marker, ignoring");
            return None;
        }
        Some(snapshot)
    }

    pub fn last_update_time(&mut self) -> Option<String> {
        self.read_opt(keys::LAST_UPDATE)
    }

    pub fn save_inventory(&mut self, inventory: &Inventory) -> bool {
        self.write(keys::INVENTORY, inventory)
    }

    pub fn load_inventory(&mut self) -> Option<Inventory> {
        self.read_opt(keys::INVENTORY)
    }

    // -----------------------------------------------------------------------
    // History log
    // -----------------------------------------------------------------------

    /// Date keys, most recent first
    pub fn history_index(&mut self) -> Vec<String> {
        self.read(keys::HISTORY_INDEX, Vec::new())
    }

    /// Archive `snapshot` under `key` (default: the snapshot's own date),
    /// moving it to the front of the index and evicting past the cap.
    pub fn save_to_history(&mut self, snapshot: &ScheduleSnapshot, key: Option<&str>) -> bool {
        let entry_key = key
            .map(str::to_string)
            .unwrap_or_else(|| date_key(snapshot.date));
        let record = HistoryRecord {
            snapshot: snapshot.clone(),
            saved_at: Utc::now(),
            date_key: entry_key.clone(),
        };
        if !self.write(&keys::history(&entry_key), &record) {
            return false;
        }

        let mut index = self.history_index();
        index.retain(|k| k != &entry_key);
        index.insert(0, entry_key);
        let evicted: Vec<String> = if index.len() > self.history_limit {
            index.split_off(self.history_limit)
        } else {
            Vec::new()
        };
        for old in &evicted {
            tracing::debug!(date_key = %old, "evicting history entry");
            self.remove(&keys::history(old));
        }
        self.write(keys::HISTORY_INDEX, &index)
    }

    pub fn load_from_history(&mut self, date_key: &str) -> Option<HistoryRecord> {
        self.read_opt(&keys::history(date_key))
    }

    /// The archived record for the calendar day before `today`
    pub fn load_yesterday(&mut self, today: NaiveDate) -> Option<HistoryRecord> {
        let yesterday = today.checked_sub_days(Days::new(1))?;
        self.load_from_history(&date_key(yesterday))
    }

    /// Counts for each indexed entry, most recent first. Entries whose
    /// record is missing still appear, with zero counts.
    pub fn history_summary(&mut self) -> Vec<HistorySummary> {
        self.history_index()
            .into_iter()
            .map(|key| match self.load_from_history(&key) {
                Some(record) => HistorySummary::from_record(&record),
                None => HistorySummary {
                    date_key: key,
                    saved_at: None,
                    tool_count: 0,
                    crew_count: 0,
                    broken_count: 0,
                },
            })
            .collect()
    }

    pub fn delete_history_entry(&mut self, date_key: &str) -> bool {
        let mut index = self.history_index();
        let before = index.len();
        index.retain(|k| k != date_key);
        let removed = self.remove(&keys::history(date_key));
        if index.len() != before {
            return self.write(keys::HISTORY_INDEX, &index) && removed;
        }
        removed
    }
}
