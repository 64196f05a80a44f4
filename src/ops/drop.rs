use chrono::{DateTime, Local};

use crate::model::checkout::{CrewId, InstanceState};
use crate::model::config::AppConfig;
use crate::model::tool::{InstanceRef, Inventory, Pool};
use crate::ops::board::Board;

/// What kind of place an instance was dropped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    Crew(CrewId),
    BrokenPool,
    /// Any available pool. Instances always return to their own category.
    AvailablePool(Pool),
}

/// Result of resolving a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    CheckedOut {
        instance: InstanceRef,
        crew: CrewId,
        from: InstanceState,
    },
    MarkedBroken {
        instance: InstanceRef,
        from: InstanceState,
    },
    Restored {
        instance: InstanceRef,
        from: InstanceState,
    },
    /// Nothing happened: no zone, unknown instance, or a drop onto the state it already has
    Ignored,
}

impl DropOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, DropOutcome::Ignored)
    }

    /// Announcement text for the status row
    pub fn announcement(&self, config: &AppConfig) -> Option<String> {
        match self {
            DropOutcome::CheckedOut { instance, crew, from } => Some(match from {
                InstanceState::CheckedOut(prev) => format!(
                    "{} moved from {} to {}",
                    instance,
                    config.crew_label(*prev),
                    config.crew_label(*crew)
                ),
                _ => format!("{} checked out to {}", instance, config.crew_label(*crew)),
            }),
            DropOutcome::MarkedBroken { instance, .. } => {
                Some(format!("{} marked broken", instance))
            }
            DropOutcome::Restored { instance, from } => Some(match from {
                InstanceState::Broken => format!("{} repaired and returned to the pool", instance),
                _ => format!("{} returned to the pool", instance),
            }),
            DropOutcome::Ignored => None,
        }
    }
}

/// Apply "move `instance` into `zone`" to the board.
///
/// Every input path (mouse release, ghost drag release, keyboard move)
/// funnels through here.
pub fn resolve_drop(
    board: &mut Board,
    inventory: &Inventory,
    crew_count: u8,
    instance: &InstanceRef,
    zone: Option<DropZone>,
    now: DateTime<Local>,
) -> DropOutcome {
    let Some(zone) = zone else {
        return DropOutcome::Ignored;
    };
    if !inventory.contains_instance(instance) {
        tracing::debug!(%instance, "drop of unknown instance ignored");
        return DropOutcome::Ignored;
    }
    let current = board.state_of(instance);

    match zone {
        DropZone::Crew(crew) => {
            if !crew.in_range(crew_count) || current == InstanceState::CheckedOut(crew) {
                return DropOutcome::Ignored;
            }
            let from = board.check_out(instance, crew, now);
            DropOutcome::CheckedOut {
                instance: instance.clone(),
                crew,
                from,
            }
        }
        DropZone::BrokenPool => {
            if current == InstanceState::Broken {
                return DropOutcome::Ignored;
            }
            let from = board.mark_broken(instance);
            DropOutcome::MarkedBroken {
                instance: instance.clone(),
                from,
            }
        }
        DropZone::AvailablePool(_) => {
            if current == InstanceState::Available {
                return DropOutcome::Ignored;
            }
            let from = board.make_available(instance);
            DropOutcome::Restored {
                instance: instance.clone(),
                from,
            }
        }
    }
}
