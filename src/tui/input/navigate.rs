use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;
use crate::tui::view::Focus;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    let len = app.focus_list().len();

    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
        }
        (_, KeyCode::Esc) => app.announcer.dismiss(),

        // Focus movement
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => {
            if len > 0 {
                app.cursor = (app.cursor + 1).min(len - 1);
            }
        }
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        (_, KeyCode::Char('g')) | (_, KeyCode::Home) => app.cursor = 0,
        (_, KeyCode::Char('G')) | (_, KeyCode::End) => app.cursor = len.saturating_sub(1),
        (_, KeyCode::Tab) => jump_section(app, true),
        (_, KeyCode::BackTab) => jump_section(app, false),

        // Stacks
        (_, KeyCode::Char(' ')) => {
            if let Some(name) = focused_stack_name(app) {
                app.toggle_stack(&name);
            }
        }
        (_, KeyCode::Char('+')) | (_, KeyCode::Char('e')) => app.expand_all(),
        (_, KeyCode::Char('-')) | (_, KeyCode::Char('c')) => app.collapse_all(),

        // Pick up
        (_, KeyCode::Enter) => match app.focused() {
            Some(Focus::Stack(name)) => app.toggle_stack(&name),
            Some(Focus::Instance(i)) | Some(Focus::Broken(i)) => app.start_move(i),
            Some(Focus::Checkout(_)) => {
                app.announcer
                    .announce("Checked-out tools can only be returned: press r");
            }
            None => {}
        },
        (_, KeyCode::Char('m')) => pick_up(app),

        // Return
        (_, KeyCode::Char('r')) => {
            if let Some(Focus::Checkout(i)) = app.focused() {
                app.return_checkout(&i);
            }
        }
        (_, KeyCode::Char('R')) => {
            app.return_all();
        }

        // Orchestrator flows
        (_, KeyCode::Char('s')) => app.save_with_feedback(Local::now()),
        (_, KeyCode::Char('S')) => {
            app.save_to_history(Local::now());
        }
        (_, KeyCode::Char('C')) => app.request_clear(),
        (_, KeyCode::Char('y')) => app.request_load_yesterday(Local::now().date_naive()),
        (_, KeyCode::Char('h')) => app.open_history(),
        (_, KeyCode::Char('a')) => app.open_add_tool(),
        (_, KeyCode::Char('p')) => {
            app.print_report(Local::now());
        }
        _ => {}
    }
}

/// The stack the focus belongs to, if it is on one
fn focused_stack_name(app: &App) -> Option<String> {
    match app.focused()? {
        Focus::Stack(name) => Some(name),
        Focus::Instance(i) => {
            let view = app.view();
            view.stack(&i.tool)
                .filter(|s| !s.is_single())
                .map(|s| s.name.clone())
        }
        _ => None,
    }
}

fn pick_up(app: &mut App) {
    let Some(focus) = app.focused() else {
        return;
    };
    if let Focus::Checkout(_) = focus {
        app.announcer
            .announce("Checked-out tools can only be returned: press r");
        return;
    }
    let view = app.view();
    match focus.instance(&view) {
        Some(instance) => app.start_move(instance),
        None => app.announcer.announce("Nothing available to move"),
    }
}

/// Jump to the first focus stop of the next (or previous) section:
/// pools, broken pool, crew cards.
fn jump_section(app: &mut App, forward: bool) {
    let list = app.focus_list();
    if list.is_empty() {
        return;
    }
    let section = |f: &Focus| match f {
        Focus::Stack(_) | Focus::Instance(_) => 0,
        Focus::Broken(_) => 1,
        Focus::Checkout(_) => 2,
    };
    let current = list.get(app.cursor).map(section).unwrap_or(0);
    let found = if forward {
        list.iter().position(|f| section(f) > current)
    } else {
        let start = list.iter().position(|f| section(f) == current).unwrap_or(0);
        list[..start]
            .iter()
            .rposition(|f| section(f) < current)
            .and_then(|last| {
                let prev = section(&list[last]);
                list.iter().position(|f| section(f) == prev)
            })
    };
    app.cursor = found.unwrap_or(if forward { 0 } else { list.len() - 1 });
}
