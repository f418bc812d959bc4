use crossterm::event::{KeyCode, KeyEvent};

use crate::io::store::DurableStore;
use crate::ops::dispatch::Action;
use crate::tui::app::{App, Mode, Pane};

pub(super) fn handle_navigate<S: DurableStore>(app: &mut App<S>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Char('n') => app.mode = Mode::Add,

        // Movement
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.move_cursor(isize::MIN),
        KeyCode::Char('G') | KeyCode::End => app.move_cursor(isize::MAX),
        KeyCode::Tab | KeyCode::BackTab => app.switch_pane(),
        KeyCode::Char('z') => app.toggle_archive(),

        // Task actions
        KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => toggle_done(app),
        KeyCode::Char('r') if app.pane == Pane::Archive => toggle_done(app),
        KeyCode::Char('e') if app.pane == Pane::Active => {
            if let Some(id) = app.selected_id() {
                app.apply(Action::BeginEdit(id));
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = app.selected_id() {
                let collection = app.pane.collection();
                app.apply(Action::Delete(id, collection));
            }
        }

        // Cosmetic
        KeyCode::Char('t') => app.cycle_theme(),
        KeyCode::Char('?') => app.show_key_hints = !app.show_key_hints,
        _ => {}
    }
}

/// Complete the selected active task, or restore the selected archived one
fn toggle_done<S: DurableStore>(app: &mut App<S>) {
    let Some(id) = app.selected_id() else {
        return;
    };
    let action = match app.pane {
        Pane::Active => Action::Complete(id),
        Pane::Archive => Action::Restore(id),
    };
    app.apply(action);
}
