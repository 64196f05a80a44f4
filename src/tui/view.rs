use std::collections::BTreeSet;

use crate::model::checkout::CrewId;
use crate::model::config::AppConfig;
use crate::model::tool::{Category, InstanceRef, Inventory, Pool};
use crate::ops::board::Board;

/// Everything the board screen shows, derived from state alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub pools: Vec<PoolView>,
    pub broken: Vec<InstanceRef>,
    pub crews: Vec<CrewView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolView {
    pub pool: Pool,
    pub categories: Vec<CategoryView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub category: Category,
    pub stacks: Vec<StackView>,
}

/// One tool definition's available instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackView {
    pub name: String,
    pub quantity: u32,
    /// Instance numbers neither checked out nor broken, ascending
    pub available: Vec<u32>,
    pub expanded: bool,
}

impl StackView {
    pub fn badge(&self) -> u32 {
        self.available.len() as u32
    }

    /// Quantity 1 draws as a plain unit with no toggle
    pub fn is_single(&self) -> bool {
        self.quantity == 1
    }

    /// What a pick-up on the collapsed stack grabs
    pub fn first_available(&self) -> Option<InstanceRef> {
        self.available
            .first()
            .map(|n| InstanceRef::new(self.name.clone(), *n))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewView {
    pub crew: CrewId,
    pub label: String,
    pub rows: Vec<CheckoutRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRow {
    pub instance: InstanceRef,
    pub time: String,
}

/// A keyboard focus stop, in screen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    Stack(String),
    Instance(InstanceRef),
    Broken(InstanceRef),
    Checkout(InstanceRef),
}

impl Focus {
    /// The instance a move would pick up from here
    pub fn instance(&self, view: &BoardView) -> Option<InstanceRef> {
        match self {
            Focus::Stack(name) => view.stack(name).and_then(StackView::first_available),
            Focus::Instance(i) | Focus::Broken(i) | Focus::Checkout(i) => Some(i.clone()),
        }
    }
}

/// Project state into a [`BoardView`].
///
/// Stacks with nothing available are left out; their instances still
/// exist on crew cards or in the broken pool.
pub fn project(
    inventory: &Inventory,
    expanded: &BTreeSet<String>,
    board: &Board,
    config: &AppConfig,
) -> BoardView {
    let pools = Pool::ALL
        .iter()
        .map(|pool| PoolView {
            pool: *pool,
            categories: pool
                .categories()
                .filter_map(|category| {
                    let stacks: Vec<StackView> = inventory
                        .tools_in(category)
                        .iter()
                        .map(|def| StackView {
                            name: def.name.clone(),
                            quantity: def.quantity,
                            available: board.available_numbers(def),
                            expanded: def.quantity > 1 && expanded.contains(&def.name),
                        })
                        .filter(|s| !s.available.is_empty())
                        .collect();
                    (!stacks.is_empty()).then_some(CategoryView { category, stacks })
                })
                .collect(),
        })
        .collect();

    let crews = CrewId::all(config.crews.count)
        .map(|crew| CrewView {
            crew,
            label: config.crew_label(crew),
            rows: board
                .checkouts_for(crew)
                .map(|rec| CheckoutRow {
                    instance: rec.instance.clone(),
                    time: rec.checked_out_at.format(&config.format.time).to_string(),
                })
                .collect(),
        })
        .collect();

    BoardView {
        pools,
        broken: board.broken().to_vec(),
        crews,
    }
}

impl BoardView {
    pub fn stack(&self, name: &str) -> Option<&StackView> {
        self.stacks().find(|s| s.name == name)
    }

    pub fn stacks(&self) -> impl Iterator<Item = &StackView> {
        self.pools
            .iter()
            .flat_map(|p| p.categories.iter())
            .flat_map(|c| c.stacks.iter())
    }

    /// Focus stops top to bottom: pools, broken pool, then crew cards.
    pub fn focus_list(&self) -> Vec<Focus> {
        let mut out = Vec::new();
        for stack in self.stacks() {
            if stack.is_single() {
                if let Some(inst) = stack.first_available() {
                    out.push(Focus::Instance(inst));
                }
                continue;
            }
            out.push(Focus::Stack(stack.name.clone()));
            if stack.expanded {
                out.extend(
                    stack
                        .available
                        .iter()
                        .map(|n| Focus::Instance(InstanceRef::new(stack.name.clone(), *n))),
                );
            }
        }
        out.extend(self.broken.iter().cloned().map(Focus::Broken));
        for crew in &self.crews {
            out.extend(crew.rows.iter().map(|r| Focus::Checkout(r.instance.clone())));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use pretty_assertions::assert_eq;

    fn view_of(board: &Board, expanded: &[&str]) -> BoardView {
        let expanded: BTreeSet<String> = expanded.iter().map(|s| s.to_string()).collect();
        project(&Inventory::builtin(), &expanded, board, &AppConfig::default())
    }

    #[test]
    fn badge_counts_available_instances() {
        let mut board = Board::new();
        let v = view_of(&board, &[]);
        assert_eq!(v.stack("Claw Hammer").unwrap().badge(), 8);

        board.check_out(&InstanceRef::new("Claw Hammer", 3), CrewId(2), Local::now());
        board.mark_broken(&InstanceRef::new("Claw Hammer", 5));
        let v = view_of(&board, &[]);
        let stack = v.stack("Claw Hammer").unwrap();
        assert_eq!(stack.badge(), 6);
        assert_eq!(stack.available, vec![1, 2, 4, 6, 7, 8]);

        board.return_all();
        board.clear();
        assert_eq!(view_of(&board, &[]).stack("Claw Hammer").unwrap().badge(), 8);
    }

    #[test]
    fn empty_stack_is_hidden() {
        let mut board = Board::new();
        board.check_out(&InstanceRef::new("Miter Saw", 1), CrewId(1), Local::now());
        let v = view_of(&board, &[]);
        assert!(v.stack("Miter Saw").is_none());
        assert_eq!(v.crews[0].rows[0].instance, InstanceRef::new("Miter Saw", 1));
    }

    #[test]
    fn every_pool_is_present_even_when_empty() {
        let mut board = Board::new();
        board.mark_broken(&InstanceRef::new("6ft Step Ladder", 1));
        board.mark_broken(&InstanceRef::new("6ft Step Ladder", 2));
        board.mark_broken(&InstanceRef::new("6ft Step Ladder", 3));
        board.mark_broken(&InstanceRef::new("24ft Extension Ladder", 1));
        board.mark_broken(&InstanceRef::new("24ft Extension Ladder", 2));
        let v = view_of(&board, &[]);
        assert_eq!(v.pools.len(), 5);
        let access = v.pools.iter().find(|p| p.pool == Pool::Access).unwrap();
        assert!(access.categories.is_empty());
        assert_eq!(v.broken.len(), 5);
    }

    #[test]
    fn crew_cards_for_every_crew() {
        let v = view_of(&Board::new(), &[]);
        assert_eq!(v.crews.len(), 8);
        assert_eq!(v.crews[7].label, "Crew 8");
        assert!(v.crews.iter().all(|c| c.rows.is_empty()));
    }

    #[test]
    fn focus_list_follows_expansion() {
        let board = Board::new();
        let collapsed = view_of(&board, &[]);
        assert_eq!(collapsed.focus_list()[0], Focus::Stack("Claw Hammer".into()));
        assert_eq!(collapsed.focus_list()[1], Focus::Stack("Framing Hammer".into()));
        assert!(
            collapsed
                .focus_list()
                .contains(&Focus::Instance(InstanceRef::new("Miter Saw", 1)))
        );

        let expanded = view_of(&board, &["Claw Hammer"]);
        let list = expanded.focus_list();
        assert_eq!(list[1], Focus::Instance(InstanceRef::new("Claw Hammer", 1)));
        assert_eq!(list[8], Focus::Instance(InstanceRef::new("Claw Hammer", 8)));
        assert_eq!(list.len(), collapsed.focus_list().len() + 8);
    }

    #[test]
    fn stack_focus_picks_lowest_available() {
        let mut board = Board::new();
        board.check_out(&InstanceRef::new("Claw Hammer", 1), CrewId(1), Local::now());
        let v = view_of(&board, &[]);
        assert_eq!(
            Focus::Stack("Claw Hammer".into()).instance(&v),
            Some(InstanceRef::new("Claw Hammer", 2))
        );
        assert!(v.focus_list().contains(&Focus::Checkout(InstanceRef::new("Claw Hammer", 1))));
    }
}
