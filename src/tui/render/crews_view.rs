use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ops::drop::DropZone;
use crate::tui::app::App;
use crate::tui::hit_map::HitTarget;
use crate::tui::view::{BoardView, CrewView, Focus};
use crate::util::unicode;

/// Narrowest card before the grid drops a column
const MIN_CARD_WIDTH: u16 = 28;
const MAX_COLUMNS: u16 = 3;
const RETURN_LABEL: &str = "[x]";

/// Render crew cards in a grid, one drop zone per card.
pub fn render_crews(
    frame: &mut Frame,
    app: &mut App,
    view: &BoardView,
    focus: Option<&Focus>,
    area: Rect,
) {
    if view.crews.is_empty() || area.width == 0 || area.height == 0 {
        return;
    }
    let cols = (area.width / MIN_CARD_WIDTH).clamp(1, MAX_COLUMNS) as usize;
    let card_w = area.width / cols as u16;

    // Height of each grid row: tallest card in it
    let grid: Vec<&[CrewView]> = view.crews.chunks(cols).collect();
    let heights: Vec<u16> = grid
        .iter()
        .map(|cards| {
            cards
                .iter()
                .map(|c| c.rows.len().max(1) as u16 + 2)
                .max()
                .unwrap_or(3)
        })
        .collect();

    let scroll = scroll_for(app, view, focus, &heights, cols, area.height);
    app.crew_scroll = scroll;
    let target = super::active_target(app);

    let mut y = area.y;
    for (cards, height) in grid.iter().zip(&heights).skip(scroll) {
        let bottom = area.y + area.height;
        if y >= bottom {
            break;
        }
        let h = (*height).min(bottom - y);
        for (i, card) in cards.iter().enumerate() {
            let x = area.x + card_w * i as u16;
            // Last column absorbs the rounding remainder
            let w = if i + 1 == cols {
                area.x + area.width - x
            } else {
                card_w
            };
            let is_target = target == Some(DropZone::Crew(card.crew));
            render_card(frame, app, card, focus, is_target, Rect::new(x, y, w, h));
        }
        y += h;
    }
}

/// First grid row to draw so the crew being aimed at (or holding the
/// focused checkout) is on screen.
fn scroll_for(
    app: &App,
    view: &BoardView,
    focus: Option<&Focus>,
    heights: &[u16],
    cols: usize,
    avail: u16,
) -> usize {
    let wanted = match super::active_target(app) {
        Some(DropZone::Crew(crew)) => Some(crew),
        _ => match focus {
            Some(Focus::Checkout(inst)) => view
                .crews
                .iter()
                .find(|c| c.rows.iter().any(|r| &r.instance == inst))
                .map(|c| c.crew),
            _ => None,
        },
    };
    let mut scroll = app.crew_scroll.min(heights.len().saturating_sub(1));
    let Some(crew) = wanted else {
        return scroll;
    };
    let Some(idx) = view.crews.iter().position(|c| c.crew == crew) else {
        return scroll;
    };
    let grid_row = idx / cols;
    if grid_row < scroll {
        return grid_row;
    }
    // Scroll down until the wanted row fits
    while scroll < grid_row && heights[scroll..=grid_row].iter().sum::<u16>() > avail {
        scroll += 1;
    }
    scroll
}

fn render_card(
    frame: &mut Frame,
    app: &mut App,
    card: &CrewView,
    focus: Option<&Focus>,
    is_target: bool,
    rect: Rect,
) {
    let bg = app.theme.background;
    let zone = DropZone::Crew(card.crew);
    app.hit_map.push(rect, HitTarget::Zone(zone));

    let border = if is_target {
        Style::default()
            .fg(app.theme.drop_target)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };
    let title = format!(
        " {} ({}) ",
        unicode::display_safe(&card.label),
        card.rows.len()
    );
    let block = Block::default()
        .title(Span::styled(
            unicode::truncate_to_width(&title, rect.width.saturating_sub(2) as usize),
            Style::default()
                .fg(if is_target {
                    app.theme.drop_target
                } else {
                    app.theme.text_bright
                })
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(border)
        .style(Style::default().bg(bg));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if card.rows.is_empty() {
        let hint = if is_target {
            "release to check out"
        } else {
            "drop tools here"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                unicode::truncate_to_width(hint, inner.width as usize),
                Style::default().fg(app.theme.dim).bg(bg),
            )),
            inner,
        );
        return;
    }

    let width = inner.width as usize;
    let mut lines = Vec::new();
    for (i, row) in card.rows.iter().take(inner.height as usize).enumerate() {
        let y = inner.y + i as u16;
        let focused = focus == Some(&Focus::Checkout(row.instance.clone()));

        let tail = format!(" {} {}", row.time, RETURN_LABEL);
        let tail_w = unicode::display_width(&tail);
        let name = unicode::pad_to_width(
            &format!(
                "{} #{}",
                unicode::display_safe(&row.instance.tool),
                row.instance.number
            ),
            width.saturating_sub(tail_w),
        );

        let base = if focused {
            Style::default()
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(bg)
        };
        lines.push(Line::from(vec![
            Span::styled(name, base.fg(app.theme.text)),
            Span::styled(format!(" {} ", row.time), base.fg(app.theme.dim)),
            Span::styled(RETURN_LABEL, base.fg(app.theme.red)),
        ]));

        // Checkout rows only offer Return; they are not draggable
        if width >= tail_w {
            let ret_w = RETURN_LABEL.len() as u16;
            app.hit_map.push(
                Rect::new(inner.x + inner.width - ret_w, y, ret_w, 1),
                HitTarget::Return(row.instance.clone()),
            );
        }
    }
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;
    use crate::model::checkout::CrewId;
    use crate::model::tool::InstanceRef;
    use crate::tui::app::MoveState;
    use crate::tui::render::test_helpers::*;

    fn crew_zone(app: &App, crew: CrewId) -> Option<Rect> {
        app.hit_map.zone_rect(DropZone::Crew(crew))
    }

    #[test]
    fn cards_show_counts_and_rows() {
        let mut app = app_with_defaults();
        let at = Local.with_ymd_and_hms(2026, 10, 17, 7, 5, 0).unwrap();
        app.board
            .check_out(&InstanceRef::new("Claw Hammer", 3), CrewId(2), at);
        app.board
            .check_out(&InstanceRef::new("Tape Measure", 1), CrewId(2), at);
        let out = render_app(&mut app, TERM_W, TERM_H);

        assert!(out.contains("Crew 2 (2)"));
        assert!(out.contains("Crew 1 (0)"));
        assert!(out.contains("drop tools here"));
        let line = out.lines().find(|l| l.contains("Claw Hammer #3")).unwrap();
        assert!(line.contains("7:05 AM [x]"));
    }

    #[test]
    fn checkout_rows_only_offer_return() {
        let mut app = app_with_defaults();
        let hammer = InstanceRef::new("Claw Hammer", 3);
        app.board.check_out(&hammer, CrewId(1), Local::now());
        let out = render_app(&mut app, TERM_W, TERM_H);

        let row = out
            .lines()
            .position(|l| l.contains("Claw Hammer #3"))
            .unwrap() as u16;
        let card = crew_zone(&app, CrewId(1)).unwrap();
        let x_col = card.x + card.width - 3;
        assert_eq!(
            app.hit_map.target_at(x_col, row),
            Some(&HitTarget::Return(hammer.clone()))
        );
        assert_eq!(
            app.hit_map.target_at(card.x + 2, row),
            Some(&HitTarget::Zone(DropZone::Crew(CrewId(1))))
        );
        assert_eq!(
            app.hit_map.drop_zone_at(card.x + 2, row),
            Some(DropZone::Crew(CrewId(1)))
        );
    }

    #[test]
    fn grid_scrolls_to_move_target() {
        let mut config = crate::model::config::AppConfig::default();
        config.crews.count = 30;
        let mut app = app_with_config(config);
        app.move_state = Some(MoveState {
            instance: InstanceRef::new("Claw Hammer", 1),
            target: DropZone::Crew(CrewId(29)),
        });
        let out = render_app(&mut app, TERM_W, 24);
        assert!(out.contains("Crew 29"));
        assert!(app.crew_scroll > 0);
        assert!(crew_zone(&app, CrewId(29)).is_some());
        assert!(crew_zone(&app, CrewId(1)).is_none());
    }

    #[test]
    fn narrow_area_uses_one_column() {
        let mut app = app_with_defaults();
        render_app(&mut app, 64, 40);
        let one = crew_zone(&app, CrewId(1)).unwrap();
        let two = crew_zone(&app, CrewId(2)).unwrap();
        assert_eq!(one.x, two.x);
        assert!(two.y > one.y);
    }
}
