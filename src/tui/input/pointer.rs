use chrono::Local;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::tui::app::App;
use crate::tui::hit_map::HitTarget;

/// Left button down/drag/up against the hit map of the last frame.
///
/// A press on an instance picks it up; dragging moves the ghost; the
/// release drops on the innermost zone under the pointer. Releasing
/// anywhere, on a zone or not, clears the dragged instance.
pub(super) fn handle_pointer(app: &mut App, mouse: MouseEvent) {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            match app.hit_map.target_at(column, row).cloned() {
                Some(HitTarget::Instance(instance)) => app.begin_drag(instance, column, row),
                other => {
                    // A press with a drag still held means its release was lost
                    app.abandon_drag();
                    match other {
                        Some(HitTarget::StackToggle(name)) => app.toggle_stack(&name),
                        Some(HitTarget::Return(instance)) => {
                            app.return_checkout(&instance);
                        }
                        _ => {}
                    }
                }
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => app.drag_to(column, row),
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag(column, row, Local::now());
        }
        MouseEventKind::ScrollDown => {
            let len = app.focus_list().len();
            app.cursor = (app.cursor + 3).min(len.saturating_sub(1));
        }
        MouseEventKind::ScrollUp => app.cursor = app.cursor.saturating_sub(3),
        _ => {}
    }
}
