use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::util::text::LineBuffer;

/// Apply a text-editing key to a single-line buffer. Returns false when the
/// key is not an editing key.
pub(super) fn apply_line_key(buf: &mut LineBuffer, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('a') if ctrl => buf.move_home(),
        KeyCode::Char('e') if ctrl => buf.move_end(),
        KeyCode::Char('u') if ctrl => buf.clear(),
        KeyCode::Char('w') if ctrl => buf.delete_word_back(),
        KeyCode::Char('b') if alt => buf.move_word_left(),
        KeyCode::Backspace if alt || ctrl => buf.delete_word_back(),
        KeyCode::Char(c) if !ctrl && !alt => buf.insert_char(c),
        KeyCode::Backspace => buf.backspace(),
        KeyCode::Delete => buf.delete(),
        KeyCode::Left => buf.move_left(),
        KeyCode::Right => buf.move_right(),
        KeyCode::Home => buf.move_home(),
        KeyCode::End => buf.move_end(),
        _ => return false,
    }
    true
}
