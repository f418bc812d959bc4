use ratatui::text::Span;

use crate::model::task::Task;
use crate::util::text;

pub(super) const CURSOR_GLYPH: &str = "\u{258C}";

/// Checkbox for a task row
pub(super) fn checkbox(task: &Task) -> &'static str {
    if task.is_archived() { "[x]" } else { "[ ]" }
}

/// Total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans.iter().map(|s| text::display_width(&s.content)).sum()
}

/// First row to draw so that `cursor` stays inside a window of `height` rows
pub(super) fn scroll_offset(cursor: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    cursor.saturating_sub(height - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_keeps_cursor_visible() {
        assert_eq!(scroll_offset(0, 5), 0);
        assert_eq!(scroll_offset(4, 5), 0);
        assert_eq!(scroll_offset(7, 5), 3);
        assert_eq!(scroll_offset(3, 0), 0);
    }
}
