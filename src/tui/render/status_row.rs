use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::drop::DropZone;
use crate::tui::app::{App, Mode};
use crate::util::unicode;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans: Vec<Span> = Vec::new();
    let mut hint = "";

    if let (Mode::Move, Some(mv)) = (app.mode, &app.move_state) {
        spans.push(Span::styled(
            " MOVE ",
            Style::default()
                .fg(bg)
                .bg(app.theme.drop_target)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(
                " {} \u{2192} {}",
                unicode::display_safe(&mv.instance.to_string()),
                zone_label(app, mv.target)
            ),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
        hint = "1-9 crew  b broken  a pool  Tab cycle  Enter drop  Esc cancel";
    } else if let Some(msg) = app.announcer.current() {
        let fg = if app.announcer.is_error {
            app.theme.red
        } else {
            app.theme.green
        };
        spans.push(Span::styled(
            format!(" {}", unicode::display_safe(msg)),
            Style::default().fg(fg).bg(bg),
        ));
    } else if app.config.ui.show_key_hints {
        hint = match app.mode {
            Mode::Navigate => "m move  r return  R return all  a add  s save  h history  q quit",
            Mode::History => "Enter load  d delete  Esc close",
            Mode::AddTool => "Tab next  Enter add  Esc cancel",
            Mode::Confirm => "y confirm  n cancel",
            Mode::Move => "",
        };
    }

    let right = if app.mode == Mode::Move {
        hint.to_string()
    } else {
        if !hint.is_empty() {
            spans.push(Span::styled(
                format!(" {}", hint),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
        format!(
            "{} out \u{00B7} {} broken ",
            app.board.checked_out_count(),
            app.board.broken().len()
        )
    };

    let used: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
    let right_w = unicode::display_width(&right);
    if used + right_w + 1 <= width {
        spans.push(Span::styled(
            " ".repeat(width - used - right_w),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(right, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn zone_label(app: &App, zone: DropZone) -> String {
    match zone {
        DropZone::Crew(crew) => unicode::display_safe(&app.config.crew_label(crew)),
        DropZone::BrokenPool => "Broken".to_string(),
        DropZone::AvailablePool(pool) => pool.label().to_string(),
    }
}
