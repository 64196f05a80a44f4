use chrono::{DateTime, Local};

use crate::model::config::AppConfig;
use crate::model::snapshot::ScheduleSnapshot;
use crate::model::tool::Inventory;
use crate::ops::board::Board;

/// Capture the live board as a snapshot for `now`'s calendar day.
pub fn capture(
    inventory: &Inventory,
    board: &Board,
    config: &AppConfig,
    now: DateTime<Local>,
) -> ScheduleSnapshot {
    ScheduleSnapshot {
        date: now.date_naive(),
        last_update_timestamp: format_timestamp(config, now),
        inventory: inventory.clone(),
        checkouts: board.checkout_groups(config.crews.count),
        broken: board.broken_entries(),
    }
}

/// Inventory and board to install from a stored snapshot.
///
/// A snapshot with an empty inventory (hand-edited or very old) keeps
/// the configured defaults so the board is never left without tools.
pub fn restore(snapshot: &ScheduleSnapshot, config: &AppConfig) -> (Inventory, Board) {
    let inventory = if snapshot.inventory.is_empty() {
        config.default_inventory()
    } else {
        snapshot.inventory.clone()
    };
    let mut fixed = snapshot.clone();
    fixed.inventory = inventory.clone();
    let board = Board::from_snapshot(&fixed, config.crews.count);
    (inventory, board)
}

/// "Saturday, October 17, 2026 7:05 AM" with the configured formats
pub fn format_timestamp(config: &AppConfig, at: DateTime<Local>) -> String {
    format!(
        "{} {}",
        at.format(&config.format.date),
        at.format(&config.format.time)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::checkout::{CrewId, InstanceState};
    use crate::model::tool::InstanceRef;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 17, h, m, 0).unwrap()
    }

    #[test]
    fn capture_then_restore_is_equivalent() {
        let config = AppConfig::default();
        let inventory = Inventory::builtin();
        let mut board = Board::new();
        board.check_out(&InstanceRef::new("Claw Hammer", 3), CrewId(2), at(7, 5));
        board.check_out(&InstanceRef::new("Tape Measure", 1), CrewId(8), at(7, 30));
        board.mark_broken(&InstanceRef::new("Hand Saw", 4));

        let snap = capture(&inventory, &board, &config, at(9, 0));
        let json = serde_json::to_string(&snap).unwrap();
        let loaded: ScheduleSnapshot = serde_json::from_str(&json).unwrap();
        let (inv2, board2) = restore(&loaded, &config);

        assert_eq!(inv2, inventory);
        assert_eq!(board2.checkouts(), board.checkouts());
        assert_eq!(board2.broken(), board.broken());
        assert_eq!(
            board2.state_of(&InstanceRef::new("Claw Hammer", 3)),
            InstanceState::CheckedOut(CrewId(2))
        );
        // A second capture of the restored board is identical
        assert_eq!(capture(&inv2, &board2, &config, at(9, 0)), snap);
    }

    #[test]
    fn capture_stamps_date_and_time() {
        let config = AppConfig::default();
        let snap = capture(&Inventory::builtin(), &Board::new(), &config, at(7, 5));
        assert_eq!(snap.date.to_string(), "2026-10-17");
        assert_eq!(snap.last_update_timestamp, "Saturday, October 17, 2026 7:05 AM");
        assert_eq!(snap.checkouts.len(), 8);
    }

    #[test]
    fn restore_empty_inventory_uses_defaults() {
        let config = AppConfig::default();
        let snap: ScheduleSnapshot = serde_json::from_str(r#"{"date":"2026-10-17"}"#).unwrap();
        let (inv, board) = restore(&snap, &config);
        assert_eq!(inv, Inventory::builtin());
        assert!(board.checkouts().is_empty());
    }
}
