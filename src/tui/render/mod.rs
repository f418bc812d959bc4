pub mod input_line;
pub mod status_row;
pub mod task_list;

mod helpers;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::io::store::DurableStore;

use super::app::App;

/// Lay out the screen and draw each region
pub fn render<S: DurableStore>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let archive = if app.archive_open {
        Constraint::Percentage(40)
    } else {
        Constraint::Length(1)
    };

    // Layout: header | input box | active list | archive | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(3),
            archive,
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    input_line::render_input_line(frame, app, chunks[1]);
    task_list::render_active_list(frame, app, chunks[2]);
    task_list::render_archive(frame, app, chunks[3]);
    status_row::render_status_row(frame, app, chunks[4]);
}

fn render_header<S: DurableStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let title = Span::styled(
        " tuck",
        Style::default()
            .fg(app.theme.accent)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    );
    let theme_label = format!("theme: {} ", app.theme_pref.name());
    let used = helpers::spans_width(std::slice::from_ref(&title)) + theme_label.len();
    let mut spans = vec![title];
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
        spans.push(Span::styled(
            theme_label,
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;
    use crate::model::theme::{Preset, ThemePreference};
    use crate::ops::dispatch::Action;

    #[test]
    fn header_shows_theme_name() {
        let mut app = app_with(&[]);
        app.theme_pref = ThemePreference::Preset(Preset::Stone);
        let out = render_app(&app);
        let first = out.lines().next().unwrap();
        assert!(first.starts_with(" tuck"));
        assert!(first.ends_with("theme: stone"));
    }

    #[test]
    fn full_screen_layout() {
        let mut app = app_with(&["buy milk", "call mom"]);
        let id = app.selected_id().unwrap();
        app.apply(Action::Complete(id));
        let out = render_app(&app);
        assert!(out.contains("Tasks (1)"));
        assert!(out.contains("[ ] call mom"));
        assert!(out.contains("Archive (1)"));
        // Archive starts collapsed
        assert!(!out.contains("[x] buy milk"));
    }
}
