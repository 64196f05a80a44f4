use ratatui::layout::Rect;

use crate::model::tool::InstanceRef;
use crate::ops::drop::DropZone;

/// What a registered screen rectangle stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Zone(DropZone),
    /// A draggable instance (available or broken)
    Instance(InstanceRef),
    /// The expand/collapse marker of a stack
    StackToggle(String),
    /// The `[x]` control on a checkout row
    Return(InstanceRef),
}

/// Rectangles registered while drawing one frame, in draw order.
///
/// Containers register before their contents, so a later entry that
/// contains a point is nested inside an earlier one.
#[derive(Debug, Default)]
pub struct HitMap {
    entries: Vec<(Rect, HitTarget)>,
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

impl HitMap {
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn push(&mut self, rect: Rect, target: HitTarget) {
        if rect.width > 0 && rect.height > 0 {
            self.entries.push((rect, target));
        }
    }

    /// Topmost target under the point
    pub fn target_at(&self, column: u16, row: u16) -> Option<&HitTarget> {
        self.entries
            .iter()
            .rev()
            .find(|(rect, _)| rect_contains(*rect, column, row))
            .map(|(_, t)| t)
    }

    /// Innermost drop zone under the point, skipping non-zone targets.
    pub fn drop_zone_at(&self, column: u16, row: u16) -> Option<DropZone> {
        self.entries
            .iter()
            .rev()
            .filter(|(rect, _)| rect_contains(*rect, column, row))
            .find_map(|(_, t)| match t {
                HitTarget::Zone(z) => Some(*z),
                _ => None,
            })
    }

    /// Screen area registered for a zone, for highlighting
    pub fn zone_rect(&self, zone: DropZone) -> Option<Rect> {
        self.entries.iter().find_map(|(rect, t)| match t {
            HitTarget::Zone(z) if *z == zone => Some(*rect),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
