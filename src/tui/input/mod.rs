mod line;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::store::DurableStore;
use crate::ops::dispatch::Action;

use super::app::{App, Mode};

use line::apply_line_key;
use navigate::handle_navigate;

/// Handle a key event in the current mode
pub fn handle_key<S: DurableStore>(app: &mut App<S>, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Add => handle_add(app, key),
        Mode::Edit => handle_edit(app, key),
    }
}

/// Handle a bracketed paste. Only the input line and the edit draft take
/// text; newlines become spaces.
pub fn handle_paste<S: DurableStore>(app: &mut App<S>, text: &str) {
    let clean = text.replace(['\n', '\r'], " ");
    match app.mode {
        Mode::Add => app.add_input.insert_str(&clean),
        Mode::Edit => {
            if let Some(draft) = app.controller.edit_mut().draft_mut() {
                draft.insert_str(&clean);
            }
        }
        Mode::Navigate => {}
    }
}

fn handle_add<S: DurableStore>(app: &mut App<S>, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_add(),
        KeyCode::Esc | KeyCode::Tab | KeyCode::Down => app.mode = Mode::Navigate,
        _ => {
            apply_line_key(&mut app.add_input, key);
        }
    }
}

fn handle_edit<S: DurableStore>(app: &mut App<S>, key: KeyEvent) {
    let Some(id) = app.controller.edit().editing_id().cloned() else {
        app.mode = Mode::Navigate;
        return;
    };
    match key.code {
        KeyCode::Enter => {
            app.apply(Action::SaveEdit(id));
        }
        KeyCode::Esc => {
            app.apply(Action::CancelEdit(id));
        }
        _ => {
            if let Some(draft) = app.controller.edit_mut().draft_mut() {
                apply_line_key(draft, key);
            }
        }
    }
}
