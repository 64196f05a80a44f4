use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::tool::InstanceRef;

/// Crew slot identifier, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrewId(pub u8);

impl CrewId {
    /// Crew ids `1..=count`
    pub fn all(count: u8) -> impl Iterator<Item = CrewId> {
        (1..=count).map(CrewId)
    }

    pub fn in_range(&self, count: u8) -> bool {
        self.0 >= 1 && self.0 <= count
    }
}

impl fmt::Display for CrewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An instance currently assigned to a crew.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRecord {
    pub instance: InstanceRef,
    pub crew: CrewId,
    pub checked_out_at: DateTime<Local>,
}

/// Where a tool instance currently is. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    Available,
    CheckedOut(CrewId),
    Broken,
}
