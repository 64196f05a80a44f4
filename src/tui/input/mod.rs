mod add_tool;
mod confirm;
mod history;
mod move_mode;
mod navigate;
mod pointer;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent};

use super::app::{App, Mode};

use add_tool::handle_add_tool;
use confirm::handle_confirm;
use history::handle_history;
use move_mode::handle_move;
use navigate::handle_navigate;
use pointer::handle_pointer;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Move => handle_move(app, key),
        Mode::Confirm => handle_confirm(app, key),
        Mode::AddTool => handle_add_tool(app, key),
        Mode::History => handle_history(app, key),
    }
}

/// Mouse input only drives the board; any popup or move in progress owns input.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.mode != Mode::Navigate {
        return;
    }
    handle_pointer(app, mouse);
}
