use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::snapshot::HistorySummary;
use crate::tui::app::App;
use crate::util::unicode;

use super::popups::centered_rect_fixed;

/// Saved days, most recent first
pub fn render_history_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let Some(browser) = &app.history else {
        return;
    };
    let bg = app.theme.background;
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let popup_w: u16 = 64.min(area.width.saturating_sub(4));
    let popup_h: u16 = 20.min(area.height.saturating_sub(2));
    let popup = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(
            " History ",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    // Last inner row is the key hint line
    let list_h = inner.height.saturating_sub(1) as usize;
    let width = inner.width as usize;
    let mut lines: Vec<Line> = Vec::new();

    if browser.entries.is_empty() {
        lines.push(Line::from(Span::styled(" No saved history.", dim_style)));
    } else {
        let cursor = browser.cursor.min(browser.entries.len() - 1);
        let start = if cursor >= list_h {
            cursor + 1 - list_h
        } else {
            0
        };
        for (i, entry) in browser.entries.iter().enumerate().skip(start).take(list_h) {
            let style = if i == cursor {
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(app.theme.selection_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text).bg(bg)
            };
            lines.push(Line::from(Span::styled(
                unicode::pad_to_width(&entry_text(app, entry), width),
                style,
            )));
        }
    }
    while lines.len() < list_h {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        unicode::truncate_to_width(" Enter load  d delete  Esc close", width),
        dim_style,
    )));

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

fn entry_text(app: &App, entry: &HistorySummary) -> String {
    let saved = entry
        .saved_at
        .map(|t| {
            t.with_timezone(&Local)
                .format(&app.config.format.time)
                .to_string()
        })
        .unwrap_or_else(|| "?".to_string());
    format!(
        " {}  saved {}  {} out \u{00B7} {} crews \u{00B7} {} broken",
        entry.date_key, saved, entry.tool_count, entry.crew_count, entry.broken_count
    )
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use crate::model::checkout::CrewId;
    use crate::model::tool::InstanceRef;
    use crate::ops::drop::DropZone;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn empty_history_says_so() {
        let mut app = app_with_defaults();
        app.open_history();
        let out = render_app(&mut app, TERM_W, TERM_H);
        assert!(out.contains("History"));
        assert!(out.contains("No saved history."));
        assert!(out.contains("Esc close"));
    }

    #[test]
    fn entries_show_counts() {
        let mut app = app_with_defaults();
        let at = Local.with_ymd_and_hms(2026, 10, 16, 16, 30, 0).unwrap();
        app.apply_drop(
            &InstanceRef::new("Claw Hammer", 1),
            Some(DropZone::Crew(CrewId(3))),
            at,
        );
        app.save(at);
        app.open_history();
        let out = render_app(&mut app, TERM_W, TERM_H);
        let line = out.lines().find(|l| l.contains("2026-10-16")).unwrap();
        assert!(line.contains("  saved "));
        assert!(line.contains("1 out \u{00B7} 1 crews \u{00B7} 0 broken"));
    }
}
