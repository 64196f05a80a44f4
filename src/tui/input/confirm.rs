use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

/// Modal y/n: nothing else runs until it is answered.
pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_confirm(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::model::checkout::CrewId;
    use crate::model::tool::InstanceRef;
    use crate::tui::app::Mode;
    use crate::tui::input::handle_key;
    use crate::tui::render::test_helpers::app_with_defaults;

    fn press(app: &mut crate::tui::app::App, c: char) {
        handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }

    #[test]
    fn other_keys_are_swallowed_while_pending() {
        let mut app = app_with_defaults();
        app.board
            .check_out(&InstanceRef::new("Claw Hammer", 1), CrewId(1), chrono::Local::now());
        press(&mut app, 'C');
        assert_eq!(app.mode, Mode::Confirm);

        press(&mut app, 'R');
        press(&mut app, 'q');
        assert!(!app.should_quit);
        assert_eq!(app.board.checked_out_count(), 1);

        press(&mut app, 'n');
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.board.checked_out_count(), 1);

        press(&mut app, 'C');
        press(&mut app, 'y');
        assert_eq!(app.board.checked_out_count(), 0);
    }
}
