use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};

use crate::model::checkout::CrewId;
use crate::ops::drop::DropZone;
use crate::tui::app::App;

/// Keys while an instance is picked up: choose a target, then drop or cancel.
pub(super) fn handle_move(app: &mut App, key: KeyEvent) {
    let Some(instance) = app.move_state.as_ref().map(|m| m.instance.clone()) else {
        app.cancel_move();
        return;
    };

    match key.code {
        KeyCode::Enter | KeyCode::Char('m') => {
            app.drop_move(Local::now());
        }
        KeyCode::Esc => app.cancel_move(),
        KeyCode::Char(c @ '1'..='9') => {
            let crew = CrewId(c as u8 - b'0');
            if crew.in_range(app.config.crews.count) {
                app.set_move_target(DropZone::Crew(crew));
            } else {
                app.announcer.announce(format!(
                    "There is no crew {}; crews run 1 to {}",
                    crew.0, app.config.crews.count
                ));
            }
        }
        KeyCode::Char('b') => app.set_move_target(DropZone::BrokenPool),
        KeyCode::Char('a') => {
            if let Some(pool) = app
                .move_targets(&instance)
                .into_iter()
                .find(|t| matches!(t, DropZone::AvailablePool(_)))
            {
                app.set_move_target(pool);
            }
        }
        KeyCode::Tab | KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') => {
            app.cycle_move_target(true)
        }
        KeyCode::BackTab | KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => {
            app.cycle_move_target(false)
        }
        _ => {}
    }
}
