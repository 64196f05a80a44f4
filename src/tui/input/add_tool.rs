use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, FormField};
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

pub(super) fn handle_add_tool(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.cancel_add_tool();
            return;
        }
        KeyCode::Enter => {
            app.submit_add_tool();
            return;
        }
        _ => {}
    }

    let Some(form) = &mut app.add_tool else {
        return;
    };

    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            form.field = match form.field {
                FormField::Name => FormField::Quantity,
                FormField::Quantity => FormField::Category,
                FormField::Category => FormField::Name,
            };
            return;
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.field = match form.field {
                FormField::Name => FormField::Category,
                FormField::Quantity => FormField::Name,
                FormField::Category => FormField::Quantity,
            };
            return;
        }
        _ => {}
    }

    match form.field {
        FormField::Name => match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.name.insert(form.name_cursor, c);
                form.name_cursor += c.len_utf8();
            }
            KeyCode::Backspace => {
                if let Some(prev) = prev_grapheme_boundary(&form.name, form.name_cursor) {
                    form.name.replace_range(prev..form.name_cursor, "");
                    form.name_cursor = prev;
                }
            }
            KeyCode::Delete => {
                if let Some(next) = next_grapheme_boundary(&form.name, form.name_cursor) {
                    form.name.replace_range(form.name_cursor..next, "");
                }
            }
            KeyCode::Left => {
                if let Some(prev) = prev_grapheme_boundary(&form.name, form.name_cursor) {
                    form.name_cursor = prev;
                }
            }
            KeyCode::Right => {
                if let Some(next) = next_grapheme_boundary(&form.name, form.name_cursor) {
                    form.name_cursor = next;
                }
            }
            KeyCode::Home => form.name_cursor = 0,
            KeyCode::End => form.name_cursor = form.name.len(),
            _ => {}
        },
        FormField::Quantity => match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() && form.quantity.len() < 6 => {
                form.quantity.push(c);
            }
            KeyCode::Backspace => {
                form.quantity.pop();
            }
            _ => {}
        },
        FormField::Category => match key.code {
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                form.category = form.category.next();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                form.category = form.category.prev();
            }
            _ => {}
        },
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::model::tool::Category;
    use crate::tui::app::{App, Mode};
    use crate::tui::input::handle_key;
    use crate::tui::render::test_helpers::app_with_defaults;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn typed_tool_is_added() {
        let mut app = app_with_defaults();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::AddTool);

        type_str(&mut app, "Pry Bat");
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "r");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "4x");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Navigate);
        let def = app.state.inventory_ref().find("Pry Bar").unwrap().clone();
        assert_eq!(def.quantity, 4);
        assert_eq!(def.category, Category::Saws);
        assert_eq!(app.announcer.current(), Some("Added Pry Bar (4) to Saws"));
    }

    #[test]
    fn invalid_form_stays_open_with_errors() {
        let mut app = app_with_defaults();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::AddTool);
        let form = app.add_tool.as_ref().unwrap();
        assert_eq!(form.errors, vec!["Tool name is required".to_string()]);
        assert!(app.announcer.is_error);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.add_tool.is_none());
    }

    #[test]
    fn cursor_edits_in_the_middle() {
        let mut app = app_with_defaults();
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "Sw");
        press(&mut app, KeyCode::Left);
        type_str(&mut app, "a");
        press(&mut app, KeyCode::End);
        type_str(&mut app, "!");
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.add_tool.as_ref().unwrap().name, "aw!");
    }
}
