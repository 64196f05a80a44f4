use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate to at most `max_cells` terminal cells, ending in `…` when cut.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 1 {
        return "\u{2026}".to_string();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let gw = UnicodeWidthStr::width(g);
        if width + gw > budget {
            break;
        }
        width += gw;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Right-pad with spaces to exactly `cells` wide (truncating if longer).
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let mut out = truncate_to_width(s, cells);
    let w = display_width(&out);
    out.extend(std::iter::repeat_n(' ', cells.saturating_sub(w)));
    out
}

/// Replace control characters so user text cannot drive the terminal.
pub fn display_safe(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { '\u{fffd}' } else { c })
        .collect()
}

/// Byte offset of the grapheme boundary after `offset`, if any.
pub fn next_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset >= s.len() {
        return None;
    }
    s[offset..]
        .grapheme_indices(true)
        .nth(1)
        .map(|(i, _)| offset + i)
        .or(Some(s.len()))
}

/// Byte offset of the grapheme boundary before `offset`, if any.
pub fn prev_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return None;
    }
    s[..offset].grapheme_indices(true).last().map(|(i, _)| i)
}

/// Number of grapheme clusters, which is what users count as characters
pub fn grapheme_count(s: &str) -> usize {
    s.graphemes(true).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_wide_chars() {
        assert_eq!(truncate_to_width("Claw Hammer", 20), "Claw Hammer");
        assert_eq!(truncate_to_width("Claw Hammer", 6), "Claw \u{2026}");
        assert_eq!(truncate_to_width("日本語ツール", 5), "日本\u{2026}");
        assert_eq!(truncate_to_width("abc", 1), "\u{2026}");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn padding() {
        assert_eq!(pad_to_width("Saw", 5), "Saw  ");
        assert_eq!(pad_to_width("Sledgehammer", 5), "Sled\u{2026}");
    }

    #[test]
    fn control_chars_are_neutralized() {
        assert_eq!(display_safe("a\u{1b}[2Jb"), "a\u{fffd}[2Jb");
        assert_eq!(display_safe("Laser Level"), "Laser Level");
    }

    #[test]
    fn grapheme_boundaries() {
        let s = "e\u{301}x";
        assert_eq!(next_grapheme_boundary(s, 0), Some(3));
        assert_eq!(next_grapheme_boundary(s, 3), Some(4));
        assert_eq!(next_grapheme_boundary(s, 4), None);
        assert_eq!(prev_grapheme_boundary(s, 4), Some(3));
        assert_eq!(prev_grapheme_boundary(s, 3), Some(0));
        assert_eq!(prev_grapheme_boundary(s, 0), None);
        assert_eq!(grapheme_count(s), 2);
    }
}
