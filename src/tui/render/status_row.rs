use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::store::DurableStore;
use crate::tui::app::{App, MessageKind, Mode};
use crate::util::text::truncate_to_width;

fn key_hints(mode: Mode) -> &'static [(&'static str, &'static str)] {
    match mode {
        Mode::Navigate => &[
            ("a", "add"),
            ("e", "edit"),
            ("space", "done"),
            ("d", "delete"),
            ("tab", "archive"),
            ("z", "fold"),
            ("t", "theme"),
            ("q", "quit"),
        ],
        Mode::Add => &[("enter", "add"), ("esc", "back")],
        Mode::Edit => &[("enter", "save"), ("esc", "cancel")],
    }
}

/// Bottom row: the current status message, or key hints for the mode
pub fn render_status_row<S: DurableStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let theme = &app.theme;
    let bg = Style::default().bg(theme.background);
    let width = (area.width as usize).saturating_sub(1);

    let line = if let Some(status) = &app.status {
        let color = match status.kind {
            MessageKind::Info => theme.text,
            MessageKind::Error => theme.error,
        };
        Line::from(Span::styled(
            format!(" {}", truncate_to_width(&status.text, width)),
            bg.fg(color),
        ))
    } else if app.show_key_hints {
        let mut spans = vec![Span::styled(" ", bg)];
        for (i, (key, label)) in key_hints(app.mode).iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", bg));
            }
            spans.push(Span::styled(*key, bg.fg(theme.accent)));
            spans.push(Span::styled(format!(" {}", label), bg.fg(theme.dim)));
        }
        Line::from(spans)
    } else {
        Line::default()
    };

    frame.render_widget(Paragraph::new(line).style(bg), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn status(app: &App<crate::io::store::MemoryStore>) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn hints_follow_mode() {
        let mut app = app_with(&["a"]);
        assert!(status(&app).contains("space done"));
        app.mode = Mode::Add;
        assert_eq!(status(&app), " enter add  esc back");
    }

    #[test]
    fn message_replaces_hints() {
        let mut app = app_with(&["a"]);
        app.notify_error("Please enter a task");
        assert_eq!(status(&app), " Please enter a task");
    }

    #[test]
    fn hints_can_be_hidden() {
        let mut app = app_with(&["a"]);
        app.show_key_hints = false;
        assert_eq!(status(&app), "");
    }
}
