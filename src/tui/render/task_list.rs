use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::io::store::DurableStore;
use crate::model::task::Task;
use crate::tui::app::{App, Mode, Pane};
use crate::tui::theme::Theme;
use crate::util::text::{LineBuffer, display_width, tail_to_width, truncate_to_width};

use super::helpers::{CURSOR_GLYPH, checkbox, scroll_offset};

const EMPTY_ACTIVE: &str = "it's very quiet around... let's #lockin";
const EMPTY_ARCHIVE: &str = "nothing tucked away yet...";

/// Render the active task list
pub fn render_active_list<S: DurableStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let tasks = app.controller.snapshot().active;
    let title = format!(" Tasks ({}) ", tasks.len());
    let focused = app.pane == Pane::Active && app.mode != Mode::Add;
    let block = list_block(&app.theme, title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if tasks.is_empty() {
        render_empty(frame, &app.theme, EMPTY_ACTIVE, inner);
        return;
    }

    let selected = (app.pane == Pane::Active && app.mode == Mode::Navigate)
        .then_some(app.active_cursor);
    let edit = app.controller.edit();
    let editing = edit.editing_id().zip(edit.draft());
    let lines = visible_rows(tasks, app.active_cursor, inner, |i, task| {
        match editing {
            Some((id, draft)) if id == &task.id => {
                edit_row(&app.theme, task, draft, inner.width as usize)
            }
            _ => task_row(&app.theme, task, selected == Some(i), inner.width as usize),
        }
    });
    frame.render_widget(Paragraph::new(lines).style(app.theme.panel_style()), inner);
}

/// Render the archive: a one-line header when collapsed, a list when open
pub fn render_archive<S: DurableStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let tasks = app.controller.snapshot().archived;
    let theme = &app.theme;

    if !app.archive_open {
        let line = Line::from(vec![
            Span::styled(" \u{25B8} ", Style::default().fg(theme.accent).bg(theme.background)),
            Span::styled(
                format!("Archive ({})", tasks.len()),
                Style::default().fg(theme.dim).bg(theme.background),
            ),
            Span::styled(
                "  z to open",
                Style::default().fg(theme.dim).bg(theme.background),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(theme.background)),
            area,
        );
        return;
    }

    let title = format!(" \u{25BE} Archive ({}) ", tasks.len());
    let block = list_block(theme, title, app.pane == Pane::Archive);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if tasks.is_empty() {
        render_empty(frame, theme, EMPTY_ARCHIVE, inner);
        return;
    }

    let selected =
        (app.pane == Pane::Archive && app.mode == Mode::Navigate).then_some(app.archive_cursor);
    let lines = visible_rows(tasks, app.archive_cursor, inner, |i, task| {
        task_row(theme, task, selected == Some(i), inner.width as usize)
    });
    frame.render_widget(Paragraph::new(lines).style(theme.panel_style()), inner);
}

fn list_block(theme: &Theme, title: String, focused: bool) -> Block<'static> {
    let border = if focused { theme.accent } else { theme.dim };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(theme.background))
        .title(Span::styled(
            title,
            Style::default().fg(border).add_modifier(Modifier::BOLD),
        ))
        .style(theme.panel_style())
}

fn render_empty(frame: &mut Frame, theme: &Theme, text: &str, area: Rect) {
    let line = Line::from(Span::styled(
        format!(" {}", text),
        theme.dim_style().add_modifier(Modifier::ITALIC),
    ));
    frame.render_widget(Paragraph::new(line).style(theme.panel_style()), area);
}

/// Rows that fit in `area`, scrolled so `cursor` is visible
fn visible_rows<'a>(
    tasks: &'a [Task],
    cursor: usize,
    area: Rect,
    mut row: impl FnMut(usize, &'a Task) -> Line<'a>,
) -> Vec<Line<'a>> {
    let height = area.height as usize;
    let offset = scroll_offset(cursor, height);
    tasks
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, task)| row(i, task))
        .collect()
}

fn task_row<'a>(theme: &Theme, task: &'a Task, selected: bool, width: usize) -> Line<'a> {
    let prefix = format!(" {} ", checkbox(task));
    let title = truncate_to_width(&task.title, width.saturating_sub(prefix.len() + 1));

    let (prefix_style, title_style) = if selected {
        (theme.selected_style(), theme.selected_style())
    } else if task.is_archived() {
        (
            theme.dim_style(),
            theme.dim_style().add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        (theme.accent_style(), theme.panel_style())
    };

    Line::from(vec![
        Span::styled(prefix, prefix_style),
        Span::styled(title, title_style),
    ])
}

/// The row being edited shows the draft with a cursor instead of the title.
/// Long drafts are clipped around the cursor so it stays on screen.
fn edit_row<'a>(theme: &Theme, task: &'a Task, draft: &LineBuffer, width: usize) -> Line<'a> {
    let prefix = format!(" {} ", checkbox(task));
    let room = width.saturating_sub(display_width(&prefix) + display_width(CURSOR_GLYPH));
    let (before, after) = draft.as_str().split_at(draft.cursor());
    let (before, after) = if draft.cursor_col() <= room {
        let left = room - draft.cursor_col();
        (before.to_string(), truncate_to_width(after, left))
    } else {
        (tail_to_width(before, room), String::new())
    };
    let edit_style = Style::default()
        .fg(theme.text)
        .bg(theme.background)
        .add_modifier(Modifier::UNDERLINED);
    Line::from(vec![
        Span::styled(prefix, theme.accent_style()),
        Span::styled(before, edit_style),
        Span::styled(CURSOR_GLYPH, theme.accent_style()),
        Span::styled(after, edit_style),
    ])
}
