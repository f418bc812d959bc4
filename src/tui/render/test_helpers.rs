use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::store::MemoryStore;
use crate::model::config::UiConfig;
use crate::ops::dispatch::{Action, Controller};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

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

/// An App over an in-memory store whose active list reads `titles` top to bottom.
pub fn app_with(titles: &[&str]) -> App<MemoryStore> {
    let mut controller = Controller::open(MemoryStore::new());
    for title in titles.iter().rev() {
        controller.dispatch(Action::Add(title.to_string())).unwrap();
    }
    App::new(controller, &UiConfig::default())
}

/// Render the whole screen at the default terminal size.
pub fn render_app(app: &App<MemoryStore>) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _| super::render(frame, app))
}
