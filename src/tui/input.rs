use crate::session::Key;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Translate a crossterm key press into a session key; releases and unsupported keys map to None.
pub fn map_key(k: KeyEvent) -> Option<Key> {
    if k.kind != KeyEventKind::Press {
        return None;
    }
    let key = match (k.modifiers, k.code) {
        (m, KeyCode::Char('c')) if m.contains(KeyModifiers::CONTROL) => Key::Interrupt,
        (m, KeyCode::Char(_)) if m.contains(KeyModifiers::CONTROL) => return None,
        (_, KeyCode::Char(c)) => Key::Char(c),
        (_, KeyCode::Enter) => Key::Enter,
        (_, KeyCode::Esc) => Key::Esc,
        (_, KeyCode::Tab) => Key::Tab,
        (_, KeyCode::Backspace) => Key::Backspace,
        (_, KeyCode::Up) => Key::Up,
        (_, KeyCode::Down) => Key::Down,
        (_, KeyCode::PageUp) => Key::PageUp,
        (_, KeyCode::PageDown) => Key::PageDown,
        (_, KeyCode::Home) => Key::Home,
        (_, KeyCode::End) => Key::End,
        _ => return None,
    };
    Some(key)
}
