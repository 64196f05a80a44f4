use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::tool::InstanceRef;
use crate::ops::drop::DropZone;
use crate::tui::app::App;
use crate::tui::hit_map::HitTarget;
use crate::tui::view::{BoardView, Focus, StackView};
use crate::util::unicode;

/// One line of the pools panel and what it can be clicked as.
struct PanelRow {
    line: Line<'static>,
    /// Row-wide target (instance pick-up)
    target: Option<HitTarget>,
    /// Narrow target over the stack marker, drawn above `target`
    toggle: Option<String>,
    focused: bool,
}

/// Rows `start..end` of the panel belong to this zone
struct ZoneSpan {
    zone: DropZone,
    start: usize,
    end: usize,
}

const MARKER_X: u16 = 2;
const MARKER_W: u16 = 2;

/// Render the available pools as a scrolling list with the broken pool
/// pinned underneath, so both kinds of drop zone stay reachable.
pub fn render_pools(
    frame: &mut Frame,
    app: &mut App,
    view: &BoardView,
    focus: Option<&Focus>,
    area: Rect,
) {
    let bg = app.theme.background;
    let target = super::active_target(app);

    let block = Block::default()
        .title(Span::styled(
            " Tool Crib ",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let mut rows: Vec<PanelRow> = Vec::new();
    let mut zones: Vec<ZoneSpan> = Vec::new();

    for pool in &view.pools {
        let zone = DropZone::AvailablePool(pool.pool);
        let start = rows.len();
        let accent = app.theme.pool_color(pool.pool);
        rows.push(header_row(app, pool.pool.label(), accent, target == Some(zone), width));

        if pool.categories.is_empty() {
            rows.push(plain_row(
                "  (nothing available)",
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
        for category in &pool.categories {
            rows.push(plain_row(
                &format!(" {}", category.category.label()),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
            for stack in &category.stacks {
                push_stack_rows(app, &mut rows, stack, accent, focus, width);
            }
        }
        rows.push(plain_row("", Style::default().bg(bg)));
        zones.push(ZoneSpan {
            zone,
            start,
            end: rows.len(),
        });
    }

    let mut broken_rows = vec![header_row(
        app,
        &format!("Broken ({})", view.broken.len()),
        app.theme.red,
        target == Some(DropZone::BrokenPool),
        width,
    )];
    if view.broken.is_empty() {
        broken_rows.push(plain_row(
            "  (none)",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }
    for instance in &view.broken {
        let focused = focus == Some(&Focus::Broken(instance.clone()));
        broken_rows.push(instance_row(app, instance, "\u{2716} ", app.theme.red, focused, width));
    }
    let broken_zone = ZoneSpan {
        zone: DropZone::BrokenPool,
        start: 0,
        end: broken_rows.len(),
    };

    let broken_h = (broken_rows.len() as u16)
        .min((inner.height / 3).max(2))
        .min(inner.height);
    let pools_area = Rect::new(inner.x, inner.y, inner.width, inner.height - broken_h);
    let broken_area = Rect::new(
        inner.x,
        inner.y + pools_area.height,
        inner.width,
        broken_h,
    );

    let scroll = app.pool_scroll;
    app.pool_scroll = paint_rows(frame, app, rows, &zones, pools_area, scroll);
    paint_rows(frame, app, broken_rows, &[broken_zone], broken_area, 0);
}

/// Draw the visible window of `rows` and register its hit targets.
/// Returns the scroll offset actually used.
fn paint_rows(
    frame: &mut Frame,
    app: &mut App,
    rows: Vec<PanelRow>,
    zones: &[ZoneSpan],
    area: Rect,
    scroll: usize,
) -> usize {
    let height = area.height as usize;
    let mut scroll = scroll;
    // Keep the focused row on screen
    if let Some(idx) = rows.iter().position(|r| r.focused) {
        if idx < scroll {
            scroll = idx;
        } else if idx >= scroll + height {
            scroll = idx + 1 - height;
        }
    }
    scroll = scroll.min(rows.len().saturating_sub(height));
    let visible = scroll..(scroll + height).min(rows.len());

    // Zones first so rows nested inside them win hit tests
    for span in zones {
        let top = span.start.max(visible.start);
        let bottom = span.end.min(visible.end);
        if top < bottom {
            app.hit_map.push(
                Rect::new(
                    area.x,
                    area.y + (top - scroll) as u16,
                    area.width,
                    (bottom - top) as u16,
                ),
                HitTarget::Zone(span.zone),
            );
        }
    }

    let mut lines = Vec::with_capacity(height);
    for (i, row) in rows
        .into_iter()
        .enumerate()
        .skip(visible.start)
        .take(visible.len())
    {
        let y = area.y + (i - scroll) as u16;
        if let Some(t) = row.target {
            app.hit_map.push(Rect::new(area.x, y, area.width, 1), t);
        }
        if let Some(name) = row.toggle {
            app.hit_map.push(
                Rect::new(area.x + MARKER_X, y, MARKER_W, 1),
                HitTarget::StackToggle(name),
            );
        }
        let mut line = row.line;
        if row.focused {
            line = line.style(
                Style::default()
                    .bg(app.theme.selection_bg)
                    .add_modifier(Modifier::BOLD),
            );
        }
        lines.push(line);
    }

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(app.theme.background)),
        area,
    );
    scroll
}

fn plain_row(text: &str, style: Style) -> PanelRow {
    PanelRow {
        line: Line::from(Span::styled(text.to_string(), style)),
        target: None,
        toggle: None,
        focused: false,
    }
}

fn header_row(app: &App, label: &str, accent: Color, is_target: bool, width: usize) -> PanelRow {
    let bg = app.theme.background;
    let (text, style) = if is_target {
        (
            unicode::pad_to_width(&format!("\u{258C}{}  \u{2190} drop here", label), width),
            Style::default()
                .fg(app.theme.background)
                .bg(app.theme.drop_target)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            format!("\u{258C}{}", label),
            Style::default().fg(accent).bg(bg).add_modifier(Modifier::BOLD),
        )
    };
    PanelRow {
        line: Line::from(Span::styled(text, style)),
        target: None,
        toggle: None,
        focused: false,
    }
}

fn push_stack_rows(
    app: &App,
    rows: &mut Vec<PanelRow>,
    stack: &StackView,
    accent: Color,
    focus: Option<&Focus>,
    width: usize,
) {
    let bg = app.theme.background;
    let name = unicode::display_safe(&stack.name);

    if stack.is_single() {
        if let Some(instance) = stack.first_available() {
            let focused = focus == Some(&Focus::Instance(instance.clone()));
            rows.push(instance_row(app, &instance, "\u{2022} ", app.theme.text, focused, width));
        }
        return;
    }

    let marker = if stack.expanded { "\u{25BE} " } else { "\u{25B8} " };
    let badge = format!("\u{00D7}{}", stack.badge());
    let name_w = width.saturating_sub(MARKER_X as usize + MARKER_W as usize + badge.len() + 1);
    let line = Line::from(vec![
        Span::styled("  ", Style::default().bg(bg)),
        Span::styled(marker, Style::default().fg(accent).bg(bg)),
        Span::styled(
            unicode::pad_to_width(&name, name_w),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
        Span::styled(
            format!(" {}", badge),
            Style::default().fg(accent).bg(bg).add_modifier(Modifier::BOLD),
        ),
    ]);
    rows.push(PanelRow {
        line,
        target: stack.first_available().map(HitTarget::Instance),
        toggle: Some(stack.name.clone()),
        focused: focus == Some(&Focus::Stack(stack.name.clone())),
    });

    if stack.expanded {
        for n in &stack.available {
            let instance = InstanceRef::new(stack.name.clone(), *n);
            let focused = focus == Some(&Focus::Instance(instance.clone()));
            rows.push(instance_row(app, &instance, "    ", app.theme.text, focused, width));
        }
    }
}

fn instance_row(
    app: &App,
    instance: &InstanceRef,
    prefix: &str,
    fg: Color,
    focused: bool,
    width: usize,
) -> PanelRow {
    let text = format!(
        "  {}{} #{}",
        prefix,
        unicode::display_safe(&instance.tool),
        instance.number
    );
    PanelRow {
        line: Line::from(Span::styled(
            unicode::truncate_to_width(&text, width),
            Style::default().fg(fg).bg(app.theme.background),
        )),
        target: Some(HitTarget::Instance(instance.clone())),
        toggle: None,
        focused,
    }
}
