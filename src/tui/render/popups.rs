use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::app::{App, FormField};
use crate::util::unicode;

use super::{MIN_HEIGHT, MIN_WIDTH};

/// Shown instead of the board when the terminal cannot fit it
pub fn render_too_small(frame: &mut Frame, app: &App, area: Rect) {
    let style = Style::default().fg(app.theme.yellow).bg(app.theme.background);
    let lines = vec![
        Line::from(Span::styled("Terminal too small", style.add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            format!("need {}\u{00D7}{}", MIN_WIDTH, MIN_HEIGHT),
            style,
        )),
    ];
    let h = (lines.len() as u16).min(area.height);
    let y = area.y + area.height.saturating_sub(h) / 2;
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(ratatui::layout::Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(app.theme.background)),
        Rect::new(area.x, y, area.width, h),
    );
}

/// y/n confirmation for destructive actions
pub fn render_confirm(frame: &mut Frame, app: &App, area: Rect) {
    let Some(pending) = &app.confirm else {
        return;
    };
    let bg = app.theme.background;
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let key_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let popup_w: u16 = 54.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(4) as usize;

    let mut lines: Vec<Line> = vec![Line::from("")];
    for chunk in wrap_words(&pending.action.prompt(), inner_w) {
        lines.push(Line::from(Span::styled(format!("  {}", chunk), text_style)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  y", key_style),
        Span::styled(" confirm   ", dim_style),
        Span::styled("n", key_style),
        Span::styled(" cancel", dim_style),
    ]));

    let popup_h = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .title(Span::styled(
            " Confirm ",
            Style::default()
                .fg(app.theme.yellow)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.yellow).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Add-tool form: name, quantity, category, then any validation errors
pub fn render_add_tool(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = &app.add_tool else {
        return;
    };
    let bg = app.theme.background;
    let label_style = Style::default().fg(app.theme.dim).bg(bg);
    let value_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let active_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(app.theme.selection_bg)
        .add_modifier(Modifier::BOLD);
    let cursor_style = Style::default().fg(app.theme.highlight).bg(bg);

    let popup_w: u16 = 50.min(area.width.saturating_sub(2));
    let value_w = popup_w.saturating_sub(16) as usize;

    let field_line = |label: &str, field: FormField, value: String| {
        let style = if form.field == field {
            active_style
        } else {
            value_style
        };
        let mut spans = vec![
            Span::styled(format!("  {:<10}", label), label_style),
            Span::styled(unicode::truncate_to_width(&value, value_w), style),
        ];
        if form.field == field && field != FormField::Category {
            spans.push(Span::styled("\u{258C}", cursor_style));
        }
        Line::from(spans)
    };

    let name = unicode::display_safe(&form.name);
    let mut lines = vec![
        Line::from(""),
        field_line("Name", FormField::Name, name),
        field_line("Quantity", FormField::Quantity, form.quantity.clone()),
        field_line(
            "Category",
            FormField::Category,
            format!("\u{2039} {} \u{203A}", form.category.label()),
        ),
    ];
    if !form.errors.is_empty() {
        lines.push(Line::from(""));
        for err in &form.errors {
            lines.push(Line::from(Span::styled(
                format!("  {}", unicode::truncate_to_width(err, value_w + 12)),
                Style::default().fg(app.theme.red).bg(bg),
            )));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Tab next field  \u{2190}\u{2192} category  Enter add  Esc cancel",
        label_style,
    )));

    let popup_h = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .title(Span::styled(
            " Add Tool ",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// Greedy word wrap by display width
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let extra = if current.is_empty() { 0 } else { 1 };
        if !current.is_empty()
            && unicode::display_width(&current) + extra + unicode::display_width(word) > width
        {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
