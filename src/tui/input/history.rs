use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

/// History overlay: browse saved days, load or delete one.
pub(super) fn handle_history(app: &mut App, key: KeyEvent) {
    let Some(browser) = &mut app.history else {
        app.close_history();
        return;
    };
    let len = browser.entries.len();
    let selected = browser.entries.get(browser.cursor).map(|e| e.date_key.clone());

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') => app.close_history(),
        KeyCode::Char('j') | KeyCode::Down => {
            if len > 0 {
                browser.cursor = (browser.cursor + 1).min(len - 1);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => browser.cursor = browser.cursor.saturating_sub(1),
        KeyCode::Char('g') | KeyCode::Home => browser.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => browser.cursor = len.saturating_sub(1),
        KeyCode::Enter => {
            if let Some(key) = selected {
                app.request_load_history(&key);
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(key) = selected {
                app.request_delete_history(&key);
            }
        }
        _ => {}
    }
}
