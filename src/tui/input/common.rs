use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::util::unicode::prev_grapheme_boundary;

/// Shifted ASCII symbols for terminals that report Shift+key unshifted.
pub(super) fn shift_symbol(c: char) -> Option<char> {
    match c {
        '1' => Some('!'),
        '2' => Some('@'),
        '3' => Some('#'),
        '-' => Some('_'),
        '=' => Some('+'),
        ';' => Some(':'),
        '/' => Some('?'),
        _ => None,
    }
}

pub(super) fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code {
        if key.modifiers.contains(KeyModifiers::SHIFT) {
            if c.is_ascii_lowercase() {
                // Shift+r → Char('R') with SHIFT preserved
                key.code = KeyCode::Char(c.to_ascii_uppercase());
            } else if let Some(shifted) = shift_symbol(c) {
                // Shift+= → Char('+') with SHIFT removed
                key.code = KeyCode::Char(shifted);
                key.modifiers.remove(KeyModifiers::SHIFT);
            }
        }
    }
    key
}

pub(super) fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Outcome of feeding a key to a single-line text buffer
#[derive(Debug, PartialEq, Eq)]
pub(super) enum LineEdit {
    Changed,
    Submit,
    Cancel,
    Ignored,
}

/// Append-only line editing: typing, backspace by grapheme, Ctrl+U to clear.
pub(super) fn edit_line(buffer: &mut String, key: KeyEvent) -> LineEdit {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => LineEdit::Cancel,
        (_, KeyCode::Enter) => LineEdit::Submit,
        (_, KeyCode::Backspace) => {
            match prev_grapheme_boundary(buffer, buffer.len()) {
                Some(at) => buffer.truncate(at),
                None => return LineEdit::Ignored,
            }
            LineEdit::Changed
        }
        (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => {
            buffer.clear();
            LineEdit::Changed
        }
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            buffer.push(c);
            LineEdit::Changed
        }
        _ => LineEdit::Ignored,
    }
}

/// Move a list cursor by `delta`, clamped to `len`.
pub(super) fn step_cursor(cursor: &mut usize, delta: isize, len: usize) {
    if len == 0 {
        *cursor = 0;
        return;
    }
    let next = (*cursor as isize + delta).clamp(0, len as isize - 1);
    *cursor = next as usize;
}
