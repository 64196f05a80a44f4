use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Maximum size of the recovery log before old entries are trimmed (1 MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Default number of days before entries are prunable.
pub const PRUNE_AGE_DAYS: i64 = 30;

/// Self-documenting header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- toolcrib recovery log: data that could not be saved normally.
     If a day's checkouts went missing, check here.
     View with: crib recovery
     Prune old entries: crib recovery --prune
     Safe to delete if empty or stale. -->

---
";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Category of a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// A write was dropped because the storage budget is exhausted
    Quota,
    /// A write was dropped because the store could not be used
    Unavailable,
    /// A stored payload could not be decoded and was ignored
    Parse,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Quota => write!(f, "quota"),
            RecoveryCategory::Unavailable => write!(f, "unavailable"),
            RecoveryCategory::Parse => write!(f, "parse"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "quota" => Some(RecoveryCategory::Quota),
            "unavailable" => Some(RecoveryCategory::Unavailable),
            "parse" => Some(RecoveryCategory::Parse),
            _ => None,
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

/// Return the path to the recovery log file.
pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".recovery.log")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry formatting
// ---------------------------------------------------------------------------

impl RecoveryEntry {
    /// Format this entry as a markdown block for the recovery log.
    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} | {}: {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        );

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            out.push_str("\n```json\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push_str("\n---\n");
        out
    }

    /// Serialize to JSON value for `crib recovery --json`.
    pub fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            "category": self.category.to_string(),
            "description": self.description,
            "fields": fields,
            "body": self.body,
        })
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append a recovery entry to the log. Failures only reach the tracing log.
pub fn log_recovery(data_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(data_dir, entry) {
        tracing::warn!(error = %e, "could not write to recovery log");
    }
}

fn log_recovery_inner(data_dir: &Path, entry: RecoveryEntry) -> io::Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let path = recovery_log_path(data_dir);

    if let Ok(meta) = std::fs::metadata(&path)
        && meta.len() > MAX_LOG_SIZE
    {
        let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
        let content = std::fs::read_to_string(&path)?;
        atomic_write(&path, prune_entries_before(&content, &cutoff).as_bytes())?;
    }

    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

/// Record a write the store refused, keeping the payload so it can be restored by hand.
pub fn log_dropped_write(data_dir: &Path, category: RecoveryCategory, key: &str, reason: &str, payload: &str) {
    log_recovery(
        data_dir,
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: match category {
                RecoveryCategory::Parse => format!("unreadable value in {} ignored", key),
                _ => format!("write to {} dropped", key),
            },
            fields: vec![
                ("Key".to_string(), key.to_string()),
                ("Reason".to_string(), reason.to_string()),
            ],
            body: payload.to_string(),
        },
    );
}

// ---------------------------------------------------------------------------
// Reading entries
// ---------------------------------------------------------------------------

/// Read recovery entries, most recent first.
pub fn read_recovery_entries(data_dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let content = match std::fs::read_to_string(recovery_log_path(data_dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let mut entries = parse_entries(&content);
    if let Some(n) = limit {
        let skip = entries.len().saturating_sub(n);
        entries = entries.into_iter().skip(skip).collect();
    }
    entries.reverse();
    entries
}

fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some((timestamp, category, description)) =
            line.strip_prefix("## ").and_then(parse_entry_header)
        else {
            continue;
        };

        let mut fields = Vec::new();
        let mut body = String::new();
        let mut in_code_block = false;

        for line in lines.by_ref() {
            if line == "---" && !in_code_block {
                break;
            }
            if in_code_block {
                if line == "```" {
                    in_code_block = false;
                } else {
                    if !body.is_empty() {
                        body.push('\n');
                    }
                    body.push_str(line);
                }
                continue;
            }
            if line.starts_with("```") {
                in_code_block = true;
                continue;
            }
            if let Some((key, value)) = line.trim().split_once(": ") {
                fields.push((key.to_string(), value.to_string()));
            }
        }

        entries.push(RecoveryEntry {
            timestamp,
            category,
            description,
            fields,
            body,
        });
    }

    entries
}

/// Parse an entry header: `<timestamp> | <category>: <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (timestamp_str, rest) = header.split_once(" | ")?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .ok()?
        .with_timezone(&Utc);
    let (category_str, description) = rest.split_once(": ")?;
    let category = RecoveryCategory::parse_category(category_str)?;
    Some((timestamp, category, description.to_string()))
}

// ---------------------------------------------------------------------------
// Pruning
// ---------------------------------------------------------------------------

/// Prune entries older than `before` (default: 30 days). Returns the number removed.
pub fn prune_recovery(data_dir: &Path, before: Option<DateTime<Utc>>) -> io::Result<usize> {
    let path = recovery_log_path(data_dir);
    if !path.exists() {
        return Ok(0);
    }
    let content = std::fs::read_to_string(&path)?;
    let cutoff = before.unwrap_or_else(|| Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS));
    let original_count = parse_entries(&content).len();
    let trimmed = prune_entries_before(&content, &cutoff);
    let new_count = parse_entries(&trimmed).len();
    atomic_write(&path, trimmed.as_bytes())?;
    Ok(original_count - new_count)
}

/// Remove entries with timestamps before `cutoff`, keeping the file header.
fn prune_entries_before(content: &str, cutoff: &DateTime<Utc>) -> String {
    let mut result = String::new();
    let mut current_entry = String::new();
    let mut current_timestamp: Option<DateTime<Utc>> = None;
    let mut in_header = true;

    for line in content.lines() {
        if in_header {
            result.push_str(line);
            result.push('\n');
            if line == "---" {
                in_header = false;
            }
            continue;
        }

        if let Some(stripped) = line.strip_prefix("## ") {
            if let Some(ts) = current_timestamp
                && ts >= *cutoff
            {
                result.push_str(&current_entry);
            }
            current_entry.clear();
            current_timestamp = parse_entry_header(stripped).map(|(ts, _, _)| ts);
        }
        current_entry.push_str(line);
        current_entry.push('\n');
    }

    if let Some(ts) = current_timestamp
        && ts >= *cutoff
    {
        result.push_str(&current_entry);
    }

    result
}
