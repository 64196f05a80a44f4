use std::path::PathBuf;

use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::persist::PersistentStore;
use crate::io::store::MemoryStore;
use crate::model::config::AppConfig;
use crate::tui::app::App;

pub const TERM_W: u16 = 100;
pub const TERM_H: u16 = 40;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Draw the whole app at the given size.
pub fn render_app(app: &mut App, w: u16, h: u16) -> String {
    render_to_string(w, h, |frame, _| super::render(frame, app))
}

pub fn test_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

/// Built-in inventory, eight crews, in-memory storage.
pub fn app_with_defaults() -> App {
    app_with_config(AppConfig::default())
}

pub fn app_with_config(config: AppConfig) -> App {
    let store = PersistentStore::new(Box::new(MemoryStore::new()), config.storage.history_limit);
    App::new(config, store, PathBuf::from("/tmp/toolcrib-test"), test_day())
}
