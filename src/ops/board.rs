use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};

use crate::model::checkout::{CheckoutRecord, CrewId, InstanceState};
use crate::model::snapshot::{
    BrokenEntry, CheckoutEntry, CrewCheckouts, SNAPSHOT_TIME_FORMAT, ScheduleSnapshot,
};
use crate::model::tool::{InstanceRef, Inventory, ToolDefinition};

/// Canonical checkout records and broken set.
///
/// An instance absent from both lists is available. Every mutation keeps the
/// two lists disjoint, so an instance is always in exactly one state.
#[derive(Debug, Clone, Default)]
pub struct Board {
    checkouts: Vec<CheckoutRecord>,
    broken: Vec<InstanceRef>,
}

impl Board {
    pub fn new() -> Self {
        Board::default()
    }

    pub fn state_of(&self, instance: &InstanceRef) -> InstanceState {
        if let Some(rec) = self.checkouts.iter().find(|r| &r.instance == instance) {
            InstanceState::CheckedOut(rec.crew)
        } else if self.broken.contains(instance) {
            InstanceState::Broken
        } else {
            InstanceState::Available
        }
    }

    pub fn checkouts(&self) -> &[CheckoutRecord] {
        &self.checkouts
    }

    pub fn checkouts_for(&self, crew: CrewId) -> impl Iterator<Item = &CheckoutRecord> {
        self.checkouts.iter().filter(move |r| r.crew == crew)
    }

    pub fn broken(&self) -> &[InstanceRef] {
        &self.broken
    }

    pub fn checked_out_count(&self) -> usize {
        self.checkouts.len()
    }

    /// Instance numbers of `def` that are neither checked out nor broken
    pub fn available_numbers(&self, def: &ToolDefinition) -> Vec<u32> {
        def.instances()
            .filter(|i| self.state_of(i) == InstanceState::Available)
            .map(|i| i.number)
            .collect()
    }

    pub fn available_count(&self, def: &ToolDefinition) -> u32 {
        self.available_numbers(def).len() as u32
    }

    fn detach(&mut self, instance: &InstanceRef) -> InstanceState {
        let prior = self.state_of(instance);
        self.checkouts.retain(|r| &r.instance != instance);
        self.broken.retain(|b| b != instance);
        prior
    }

    /// Assign to `crew`, replacing any previous state. Returns the prior state.
    pub fn check_out(
        &mut self,
        instance: &InstanceRef,
        crew: CrewId,
        at: DateTime<Local>,
    ) -> InstanceState {
        let prior = self.detach(instance);
        self.checkouts.push(CheckoutRecord {
            instance: instance.clone(),
            crew,
            checked_out_at: at,
        });
        prior
    }

    pub fn mark_broken(&mut self, instance: &InstanceRef) -> InstanceState {
        let prior = self.detach(instance);
        self.broken.push(instance.clone());
        prior
    }

    /// Back to the available pool from whatever state it was in.
    pub fn make_available(&mut self, instance: &InstanceRef) -> InstanceState {
        self.detach(instance)
    }

    /// Return one checked-out instance. `None` if it was not checked out.
    pub fn return_instance(&mut self, instance: &InstanceRef) -> Option<CheckoutRecord> {
        let pos = self.checkouts.iter().position(|r| &r.instance == instance)?;
        Some(self.checkouts.remove(pos))
    }

    /// Restore every checked-out instance; returns how many there were.
    pub fn return_all(&mut self) -> usize {
        let count = self.checkouts.len();
        self.checkouts.clear();
        count
    }

    pub fn clear(&mut self) {
        self.checkouts.clear();
        self.broken.clear();
    }

    /// Drop records that no longer refer to an instance of `inventory`
    /// or to a crew in `1..=crew_count`.
    pub fn retain_valid(&mut self, inventory: &Inventory, crew_count: u8) {
        self.checkouts
            .retain(|r| inventory.contains_instance(&r.instance) && r.crew.in_range(crew_count));
        self.broken.retain(|b| inventory.contains_instance(b));
    }

    // -----------------------------------------------------------------------
    // Snapshot conversion
    // -----------------------------------------------------------------------

    /// Checkouts grouped by crew in crew order, one group per crew `1..=crew_count`.
    pub fn checkout_groups(&self, crew_count: u8) -> Vec<CrewCheckouts> {
        CrewId::all(crew_count)
            .map(|crew| CrewCheckouts {
                crew_id: crew,
                tools: self
                    .checkouts_for(crew)
                    .map(|r| CheckoutEntry {
                        tool: r.instance.tool.clone(),
                        number: r.instance.number,
                        time: r.checked_out_at.format(SNAPSHOT_TIME_FORMAT).to_string(),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn broken_entries(&self) -> Vec<BrokenEntry> {
        self.broken
            .iter()
            .map(|b| BrokenEntry {
                name: b.tool.clone(),
                number: b.number,
            })
            .collect()
    }

    /// Rebuild a board from a snapshot, dropping anything that would break
    /// an invariant: unknown tools, out-of-range numbers or crews, and
    /// duplicates (the first state seen for an instance wins, checkouts first).
    pub fn from_snapshot(snapshot: &ScheduleSnapshot, crew_count: u8) -> Board {
        let mut board = Board::new();
        let inventory = &snapshot.inventory;
        for group in &snapshot.checkouts {
            if !group.crew_id.in_range(crew_count) {
                tracing::warn!(crew = group.crew_id.0, "dropping checkouts for unknown crew");
                continue;
            }
            for entry in &group.tools {
                let instance = InstanceRef::new(entry.tool.clone(), entry.number);
                if !inventory.contains_instance(&instance) {
                    tracing::warn!(%instance, "dropping checkout of unknown instance");
                    continue;
                }
                if board.state_of(&instance) != InstanceState::Available {
                    continue;
                }
                let at = parse_checkout_time(snapshot.date, &entry.time).unwrap_or_else(Local::now);
                board.checkouts.push(CheckoutRecord {
                    instance,
                    crew: group.crew_id,
                    checked_out_at: at,
                });
            }
        }
        for entry in &snapshot.broken {
            let instance = InstanceRef::new(entry.name.clone(), entry.number);
            if inventory.contains_instance(&instance)
                && board.state_of(&instance) == InstanceState::Available
            {
                board.broken.push(instance);
            }
        }
        board
    }
}

/// Combine a snapshot date with its `HH:MM` checkout time
fn parse_checkout_time(date: NaiveDate, time: &str) -> Option<DateTime<Local>> {
    let t = NaiveTime::parse_from_str(time, SNAPSHOT_TIME_FORMAT).ok()?;
    Local.from_local_datetime(&date.and_time(t)).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::snapshot::ScheduleSnapshot;

    fn hammer(n: u32) -> InstanceRef {
        InstanceRef::new("Claw Hammer", n)
    }

    #[test]
    fn states_are_exclusive() {
        let mut board = Board::new();
        let h = hammer(3);
        assert_eq!(board.state_of(&h), InstanceState::Available);

        board.check_out(&h, CrewId(2), Local::now());
        assert_eq!(board.state_of(&h), InstanceState::CheckedOut(CrewId(2)));

        let prior = board.mark_broken(&h);
        assert_eq!(prior, InstanceState::CheckedOut(CrewId(2)));
        assert_eq!(board.state_of(&h), InstanceState::Broken);
        assert_eq!(board.checked_out_count(), 0);

        board.check_out(&h, CrewId(5), Local::now());
        assert!(board.broken().is_empty());
        assert_eq!(board.checkouts().len(), 1);

        board.check_out(&h, CrewId(6), Local::now());
        assert_eq!(board.checkouts().len(), 1);
        assert_eq!(board.state_of(&h), InstanceState::CheckedOut(CrewId(6)));
    }

    #[test]
    fn available_count_tracks_checkouts() {
        let inv = Inventory::builtin();
        let def = inv.find("Claw Hammer").unwrap();
        let mut board = Board::new();
        assert_eq!(board.available_count(def), 8);
        for n in 1..=3 {
            board.check_out(&hammer(n), CrewId(1), Local::now());
        }
        assert_eq!(board.available_count(def), 5);
        assert_eq!(board.available_numbers(def), vec![4, 5, 6, 7, 8]);
        board.mark_broken(&hammer(8));
        assert_eq!(board.available_count(def), 4);
    }

    #[test]
    fn return_instance_and_all() {
        let mut board = Board::new();
        board.check_out(&hammer(1), CrewId(1), Local::now());
        board.check_out(&hammer(2), CrewId(2), Local::now());
        board.mark_broken(&hammer(3));

        let rec = board.return_instance(&hammer(1)).unwrap();
        assert_eq!(rec.crew, CrewId(1));
        assert!(board.return_instance(&hammer(1)).is_none());
        assert!(board.return_instance(&hammer(3)).is_none());

        assert_eq!(board.return_all(), 1);
        assert_eq!(board.state_of(&hammer(2)), InstanceState::Available);
        // Broken stays broken
        assert_eq!(board.state_of(&hammer(3)), InstanceState::Broken);
    }

    #[test]
    fn snapshot_groups_cover_every_crew() {
        let mut board = Board::new();
        board.check_out(&hammer(1), CrewId(3), Local::now());
        let groups = board.checkout_groups(4);
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[2].crew_id, CrewId(3));
        assert_eq!(groups[2].tools.len(), 1);
        assert!(groups[0].tools.is_empty());
    }

    #[test]
    fn from_snapshot_sanitizes() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let snapshot = ScheduleSnapshot {
            date,
            last_update_timestamp: String::new(),
            inventory: Inventory::builtin(),
            checkouts: vec![
                CrewCheckouts {
                    crew_id: CrewId(2),
                    tools: vec![
                        CheckoutEntry {
                            tool: "Claw Hammer".into(),
                            number: 3,
                            time: "07:05".into(),
                        },
                        CheckoutEntry {
                            tool: "Claw Hammer".into(),
                            number: 9,
                            time: "07:05".into(),
                        },
                        CheckoutEntry {
                            tool: "Nail Gun".into(),
                            number: 1,
                            time: "07:05".into(),
                        },
                    ],
                },
                CrewCheckouts {
                    crew_id: CrewId(12),
                    tools: vec![CheckoutEntry {
                        tool: "Claw Hammer".into(),
                        number: 4,
                        time: "07:05".into(),
                    }],
                },
                CrewCheckouts {
                    crew_id: CrewId(4),
                    tools: vec![CheckoutEntry {
                        tool: "Claw Hammer".into(),
                        number: 3,
                        time: "bad".into(),
                    }],
                },
            ],
            broken: vec![
                BrokenEntry {
                    name: "Claw Hammer".into(),
                    number: 3,
                },
                BrokenEntry {
                    name: "Hand Saw".into(),
                    number: 2,
                },
            ],
        };

        let board = Board::from_snapshot(&snapshot, 8);
        assert_eq!(board.checkouts().len(), 1);
        let rec = &board.checkouts()[0];
        assert_eq!(rec.crew, CrewId(2));
        assert_eq!(rec.checked_out_at.format("%H:%M").to_string(), "07:05");
        assert_eq!(board.broken(), &[InstanceRef::new("Hand Saw", 2)]);
        assert_eq!(board.state_of(&hammer(3)), InstanceState::CheckedOut(CrewId(2)));
    }

    #[test]
    fn retain_valid_drops_orphans() {
        let mut board = Board::new();
        board.check_out(&hammer(1), CrewId(8), Local::now());
        board.check_out(&hammer(2), CrewId(2), Local::now());
        board.mark_broken(&InstanceRef::new("Gone", 1));
        board.retain_valid(&Inventory::builtin(), 4);
        assert_eq!(board.checkouts().len(), 1);
        assert!(board.broken().is_empty());
    }
}
