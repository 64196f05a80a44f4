use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::config::UiConfig;
use crate::model::tool::Pool;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub selection_bg: Color,
    pub drop_target: Color,
    /// Per-pool accent colors
    pub pool_colors: HashMap<Pool, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut pool_colors = HashMap::new();
        pool_colors.insert(Pool::Hand, Color::Rgb(0xE8, 0x9B, 0x3C));
        pool_colors.insert(Pool::Power, Color::Rgb(0x44, 0x88, 0xFF));
        pool_colors.insert(Pool::Layout, Color::Rgb(0x44, 0xDD, 0xAA));
        pool_colors.insert(Pool::Access, Color::Rgb(0xCC, 0x66, 0xFF));
        pool_colors.insert(Pool::Safety, Color::Rgb(0xFF, 0xD7, 0x00));

        Theme {
            background: Color::Rgb(0x12, 0x14, 0x18),
            text: Color::Rgb(0xC8, 0xCC, 0xD4),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFF, 0x8C, 0x1A),
            dim: Color::Rgb(0x6B, 0x72, 0x80),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            selection_bg: Color::Rgb(0x2A, 0x2F, 0x3A),
            drop_target: Color::Rgb(0x44, 0xFF, 0x88),
            pool_colors,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

fn parse_pool(name: &str) -> Option<Pool> {
    match name {
        "hand" => Some(Pool::Hand),
        "power" => Some(Pool::Power),
        "layout" => Some(Pool::Layout),
        "access" => Some(Pool::Access),
        "safety" => Some(Pool::Safety),
        _ => None,
    }
}

impl Theme {
    /// Create a theme from [ui] config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring unparsable color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "selection_bg" => theme.selection_bg = color,
                "drop_target" => theme.drop_target = color,
                _ => {}
            }
        }

        for (name, value) in &ui.pool_colors {
            if let (Some(pool), Some(color)) = (parse_pool(name), parse_hex_color(value)) {
                theme.pool_colors.insert(pool, color);
            }
        }

        theme
    }

    /// Accent for a pool, falling back to text color
    pub fn pool_color(&self, pool: Pool) -> Color {
        self.pool_colors.get(&pool).copied().unwrap_or(self.text)
    }
}
