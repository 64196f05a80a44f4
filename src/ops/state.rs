use std::collections::BTreeSet;

use crate::model::tool::{Inventory, InstanceRef, ToolDefinition};

/// What a state write touched, passed to every observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    Inventory,
    ToolAdded { name: String },
    Expanded,
    Dragged,
    Reset,
}

pub type SubscriberId = usize;

/// Observer callback. An `Err` is logged and does not stop later observers.
pub type Observer = Box<dyn FnMut(&StateChange) -> Result<(), String>>;

/// Authoritative inventory, expanded-stack set, and drag cursor.
///
/// Reads hand out owned copies; writes replace the relevant part wholesale
/// and then notify observers synchronously, in registration order.
pub struct AppState {
    inventory: Inventory,
    expanded: BTreeSet<String>,
    dragged: Option<InstanceRef>,
    observers: Vec<(SubscriberId, Observer)>,
    next_id: SubscriberId,
}

impl AppState {
    pub fn new(inventory: Inventory) -> Self {
        AppState {
            inventory,
            expanded: BTreeSet::new(),
            dragged: None,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn subscribe(&mut self, observer: Observer) -> SubscriberId {
        let id = self.next_id;
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn notify(&mut self, change: StateChange) {
        for (id, observer) in self.observers.iter_mut() {
            if let Err(e) = observer(&change) {
                tracing::warn!(subscriber = *id, change = ?change, error = %e, "state observer failed");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Inventory
    // -----------------------------------------------------------------------

    pub fn inventory(&self) -> Inventory {
        self.inventory.clone()
    }

    /// Borrowing view for renderers that only read
    pub fn inventory_ref(&self) -> &Inventory {
        &self.inventory
    }

    pub fn set_inventory(&mut self, inventory: Inventory) {
        self.inventory = inventory;
        self.expanded.retain(|name| self.inventory.find(name).is_some());
        self.notify(StateChange::Inventory);
    }

    /// Append one definition to its category. Callers validate first.
    pub fn add_tool(&mut self, def: ToolDefinition) {
        let name = def.name.clone();
        let mut next = self.inventory.clone();
        next.push(def);
        self.inventory = next;
        self.notify(StateChange::ToolAdded { name });
    }

    /// Replace everything with `default_inventory` and clear view state.
    pub fn reset(&mut self, default_inventory: Inventory) {
        self.inventory = default_inventory;
        self.expanded.clear();
        self.dragged = None;
        self.notify(StateChange::Reset);
    }

    // -----------------------------------------------------------------------
    // Expanded stacks
    // -----------------------------------------------------------------------

    /// Flip one stack; returns whether it is now expanded.
    pub fn toggle_expanded(&mut self, name: &str) -> bool {
        let mut next = self.expanded.clone();
        let now_expanded = if next.remove(name) {
            false
        } else {
            next.insert(name.to_string());
            true
        };
        self.expanded = next;
        self.notify(StateChange::Expanded);
        now_expanded
    }

    /// Expand every stack with more than one instance
    pub fn expand_all(&mut self) {
        self.expanded = self
            .inventory
            .definitions()
            .filter(|d| d.quantity > 1)
            .map(|d| d.name.clone())
            .collect();
        self.notify(StateChange::Expanded);
    }

    pub fn collapse_all(&mut self) {
        self.expanded = BTreeSet::new();
        self.notify(StateChange::Expanded);
    }

    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded.contains(name)
    }

    pub fn expanded(&self) -> BTreeSet<String> {
        self.expanded.clone()
    }

    // -----------------------------------------------------------------------
    // Drag cursor
    // -----------------------------------------------------------------------

    pub fn set_dragged(&mut self, instance: InstanceRef) {
        self.dragged = Some(instance);
        self.notify(StateChange::Dragged);
    }

    pub fn dragged(&self) -> Option<InstanceRef> {
        self.dragged.clone()
    }

    pub fn clear_dragged(&mut self) {
        if self.dragged.take().is_some() {
            self.notify(StateChange::Dragged);
        }
    }
}
