use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::io::store::DurableStore;
use crate::tui::app::{App, Mode};

use super::helpers::CURSOR_GLYPH;

const PLACEHOLDER: &str = "what needs doing?";

/// Render the new-task input box
pub fn render_input_line<S: DurableStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let theme = &app.theme;
    let focused = app.mode == Mode::Add;
    let border = if focused { theme.accent } else { theme.dim };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(theme.background))
        .title(Span::styled(" new task ", Style::default().fg(border)))
        .style(theme.panel_style());

    let input = app.add_input.as_str();
    let mut spans = vec![Span::styled("> ", theme.accent_style())];
    if focused {
        let (before, after) = input.split_at(app.add_input.cursor());
        spans.push(Span::styled(before.to_string(), theme.panel_style()));
        spans.push(Span::styled(CURSOR_GLYPH, theme.accent_style()));
        spans.push(Span::styled(after.to_string(), theme.panel_style()));
    } else if input.is_empty() {
        spans.push(Span::styled(PLACEHOLDER, theme.dim_style()));
    } else {
        spans.push(Span::styled(input.to_string(), theme.dim_style()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
