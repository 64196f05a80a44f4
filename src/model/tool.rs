use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Category tag carried by every tool definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hammers,
    Saws,
    Drills,
    Drivers,
    Measuring,
    Levels,
    Ladders,
    Safety,
}

/// Display pool a category renders under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pool {
    Hand,
    Power,
    Layout,
    Access,
    Safety,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Hammers,
        Category::Saws,
        Category::Drills,
        Category::Drivers,
        Category::Measuring,
        Category::Levels,
        Category::Ladders,
        Category::Safety,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hammers => "hammers",
            Category::Saws => "saws",
            Category::Drills => "drills",
            Category::Drivers => "drivers",
            Category::Measuring => "measuring",
            Category::Levels => "levels",
            Category::Ladders => "ladders",
            Category::Safety => "safety",
        }
    }

    pub fn parse_category(s: &str) -> Option<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Category::ALL.into_iter().find(|c| c.as_str() == lower)
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Hammers => "Hammers",
            Category::Saws => "Saws",
            Category::Drills => "Drills",
            Category::Drivers => "Drivers & Wrenches",
            Category::Measuring => "Measuring",
            Category::Levels => "Levels",
            Category::Ladders => "Ladders",
            Category::Safety => "Safety",
        }
    }

    pub fn pool(&self) -> Pool {
        match self {
            Category::Hammers | Category::Drivers => Pool::Hand,
            Category::Saws | Category::Drills => Pool::Power,
            Category::Measuring | Category::Levels => Pool::Layout,
            Category::Ladders => Pool::Access,
            Category::Safety => Pool::Safety,
        }
    }

    /// Next category in display order, wrapping around
    pub fn next(&self) -> Category {
        let idx = Category::ALL.iter().position(|c| c == self).unwrap_or(0);
        Category::ALL[(idx + 1) % Category::ALL.len()]
    }

    pub fn prev(&self) -> Category {
        let idx = Category::ALL.iter().position(|c| c == self).unwrap_or(0);
        Category::ALL[(idx + Category::ALL.len() - 1) % Category::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Pool {
    pub const ALL: [Pool; 5] = [Pool::Hand, Pool::Power, Pool::Layout, Pool::Access, Pool::Safety];

    pub fn label(&self) -> &'static str {
        match self {
            Pool::Hand => "Hand Tools",
            Pool::Power => "Power Tools",
            Pool::Layout => "Layout",
            Pool::Access => "Access",
            Pool::Safety => "Safety",
        }
    }

    /// Categories rendered in this pool, in display order
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(move |c| c.pool() == *self)
    }
}

/// A named kind of tool with a quantity and a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub quantity: u32,
    pub category: Category,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, quantity: u32, category: Category) -> Self {
        ToolDefinition {
            name: name.into(),
            quantity,
            category,
        }
    }

    /// All instances of this definition, numbered from 1
    pub fn instances(&self) -> impl Iterator<Item = InstanceRef> + '_ {
        (1..=self.quantity).map(|n| InstanceRef::new(self.name.clone(), n))
    }
}

/// One physical, numbered unit of a tool definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceRef {
    pub tool: String,
    pub number: u32,
}

impl InstanceRef {
    pub fn new(tool: impl Into<String>, number: u32) -> Self {
        InstanceRef {
            tool: tool.into(),
            number,
        }
    }
}

impl fmt::Display for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.tool, self.number)
    }
}

/// Tool definitions grouped by category, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    categories: IndexMap<Category, Vec<ToolDefinition>>,
}

impl Inventory {
    pub fn new() -> Self {
        Inventory::default()
    }

    /// The built-in inventory a fresh board starts from.
    pub fn builtin() -> Self {
        let mut inv = Inventory::new();
        let entries: [(&str, u32, Category); 22] = [
            ("Claw Hammer", 8, Category::Hammers),
            ("Framing Hammer", 4, Category::Hammers),
            ("Sledgehammer", 2, Category::Hammers),
            ("Rubber Mallet", 3, Category::Hammers),
            ("Circular Saw", 3, Category::Saws),
            ("Reciprocating Saw", 2, Category::Saws),
            ("Miter Saw", 1, Category::Saws),
            ("Hand Saw", 4, Category::Saws),
            ("Cordless Drill", 6, Category::Drills),
            ("Hammer Drill", 2, Category::Drills),
            ("Impact Driver", 4, Category::Drills),
            ("Screwdriver Set", 5, Category::Drivers),
            ("Adjustable Wrench", 4, Category::Drivers),
            ("Tape Measure", 10, Category::Measuring),
            ("Laser Measure", 2, Category::Measuring),
            ("Speed Square", 4, Category::Measuring),
            ("4ft Level", 3, Category::Levels),
            ("Laser Level", 1, Category::Levels),
            ("6ft Step Ladder", 3, Category::Ladders),
            ("24ft Extension Ladder", 2, Category::Ladders),
            ("Fall Harness", 4, Category::Safety),
            ("Respirator", 6, Category::Safety),
        ];
        for (name, quantity, category) in entries {
            inv.push(ToolDefinition::new(name, quantity, category));
        }
        inv
    }

    /// Append a definition to its category (no uniqueness check; see ops::validate).
    pub fn push(&mut self, def: ToolDefinition) {
        self.categories.entry(def.category).or_default().push(def);
    }

    pub fn tools_in(&self, category: Category) -> &[ToolDefinition] {
        self.categories
            .get(&category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Categories that have at least one definition, in insertion order
    pub fn categories(&self) -> impl Iterator<Item = (Category, &[ToolDefinition])> {
        self.categories.iter().map(|(c, tools)| (*c, tools.as_slice()))
    }

    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.categories.values().flatten()
    }

    pub fn find(&self, name: &str) -> Option<&ToolDefinition> {
        self.definitions().find(|d| d.name == name)
    }

    /// Case-insensitive name lookup, used for duplicate detection
    pub fn find_ignore_case(&self, name: &str) -> Option<&ToolDefinition> {
        let lower = name.to_lowercase();
        self.definitions().find(|d| d.name.to_lowercase() == lower)
    }

    pub fn contains_instance(&self, instance: &InstanceRef) -> bool {
        self.find(&instance.tool)
            .is_some_and(|d| instance.number >= 1 && instance.number <= d.quantity)
    }

    pub fn instances(&self) -> impl Iterator<Item = InstanceRef> + '_ {
        self.definitions().flat_map(|d| d.instances())
    }

    pub fn total_instances(&self) -> u32 {
        self.definitions().map(|d| d.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.values().all(|v| v.is_empty())
    }
}
