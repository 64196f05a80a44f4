pub mod crews_view;
pub mod history_overlay;
pub mod popups;
pub mod pools_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::ops::drop::DropZone;
use crate::util::unicode;

use super::app::App;

/// Smallest terminal the board is drawn in
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 16;

/// Main render function — dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Hit zones are rebuilt every frame
    app.hit_map.clear();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        if !app.too_small_logged {
            tracing::warn!(
                width = area.width,
                height = area.height,
                "terminal too small to draw the board"
            );
            app.too_small_logged = true;
        }
        popups::render_too_small(frame, app, area);
        return;
    }
    app.too_small_logged = false;

    // Layout: header (1 row) | board | status row (1 row)
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(rows[1]);

    let view = app.view();
    let focus = app.focused();

    render_header(frame, app, rows[0]);
    pools_view::render_pools(frame, app, &view, focus.as_ref(), columns[0]);
    crews_view::render_crews(frame, app, &view, focus.as_ref(), columns[1]);

    if let Some(ghost) = app.drag.clone() {
        render_ghost(frame, app, &ghost.instance.to_string(), ghost.column, ghost.row, area);
    }

    if app.history.is_some() {
        history_overlay::render_history_overlay(frame, app, area);
    }
    if app.add_tool.is_some() {
        popups::render_add_tool(frame, app, area);
    }
    if app.confirm.is_some() {
        popups::render_confirm(frame, app, area);
    }

    status_row::render_status_row(frame, app, rows[2]);
}

/// Zone currently being aimed at by a keyboard move or a pointer drag
pub(super) fn active_target(app: &App) -> Option<DropZone> {
    app.move_state
        .as_ref()
        .map(|m| m.target)
        .or_else(|| app.drag.as_ref().and_then(|g| g.hover))
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let left = vec![
        Span::styled(
            " TOOL CRIB ",
            Style::default()
                .fg(app.theme.background)
                .bg(app.theme.highlight)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}", Local::now().format(&app.config.format.date)),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
    ];

    let right_text = match (&app.last_saved, app.storage_available) {
        (_, false) => "memory only ".to_string(),
        (Some(at), true) => format!("last saved {} ", at),
        (None, true) => "not saved yet ".to_string(),
    };
    let right_style = if app.storage_available {
        Style::default().fg(app.theme.dim).bg(bg)
    } else {
        Style::default().fg(app.theme.red).bg(bg)
    };

    let used: usize = left.iter().map(|s| unicode::display_width(&s.content)).sum();
    let right_w = unicode::display_width(&right_text);
    let mut spans = left;
    if used + right_w < width {
        spans.push(Span::styled(
            " ".repeat(width - used - right_w),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(right_text, right_style));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

/// Floating label that follows the pointer during a drag
fn render_ghost(frame: &mut Frame, app: &App, label: &str, column: u16, row: u16, area: Rect) {
    let text = format!(" \u{2807} {} ", unicode::display_safe(label));
    let w = (unicode::display_width(&text) as u16).min(area.width);
    let x = column
        .saturating_add(1)
        .min(area.x + area.width.saturating_sub(w));
    let y = row.min(area.y + area.height.saturating_sub(1));
    let rect = Rect::new(x, y, w, 1);
    frame.render_widget(
        Paragraph::new(Span::styled(
            text,
            Style::default()
                .fg(app.theme.background)
                .bg(app.theme.drop_target)
                .add_modifier(Modifier::BOLD),
        )),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::checkout::CrewId;
    use crate::model::tool::{InstanceRef, Pool};
    use test_helpers::*;

    #[test]
    fn too_small_terminal_draws_notice() {
        let mut app = app_with_defaults();
        let out = render_app(&mut app, 40, 10);
        assert!(out.contains("Terminal too small"));
        assert!(app.too_small_logged);
        assert!(app.hit_map.is_empty());
    }

    #[test]
    fn full_board_draws_pools_and_crews() {
        let mut app = app_with_defaults();
        let out = render_app(&mut app, TERM_W, TERM_H);
        assert!(out.contains("TOOL CRIB"));
        assert!(out.contains("Hand Tools"));
        assert!(out.contains("Claw Hammer"));
        assert!(out.contains("Crew 1"));
        assert!(out.contains("Broken"));
        assert!(!app.too_small_logged);
    }

    #[test]
    fn frame_registers_drop_zones() {
        let mut app = app_with_defaults();
        render_app(&mut app, TERM_W, TERM_H);

        let crew = app.hit_map.zone_rect(DropZone::Crew(CrewId(1))).unwrap();
        assert_eq!(
            app.hit_map.drop_zone_at(crew.x + 2, crew.y + 1),
            Some(DropZone::Crew(CrewId(1)))
        );
        let hand = app
            .hit_map
            .zone_rect(DropZone::AvailablePool(Pool::Hand))
            .unwrap();
        assert_eq!(
            app.hit_map.drop_zone_at(hand.x, hand.y),
            Some(DropZone::AvailablePool(Pool::Hand))
        );
        assert!(app.hit_map.zone_rect(DropZone::BrokenPool).is_some());
    }

    #[test]
    fn drag_ghost_is_drawn() {
        let mut app = app_with_defaults();
        render_app(&mut app, TERM_W, TERM_H);
        app.begin_drag(InstanceRef::new("Claw Hammer", 2), 10, 5);
        let out = render_app(&mut app, TERM_W, TERM_H);
        assert!(out.contains("\u{2807} Claw Hammer #2"));
    }
}
