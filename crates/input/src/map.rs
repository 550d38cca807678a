//! Key mapping from terminal events to game actions.
//!
//! Two layers of keys exist. Game verbs become a [`GameAction`] and go through
//! the command bindings like any other input. Session keys ([`SessionKey`])
//! act on the game task itself (quit, restart, pause) and never reach the
//! controller as actions.
//!
//! Letter keys are case-insensitive so Caps Lock or Shift do not change play.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Keys that drive the session rather than the falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKey {
    Quit,
    NewGame,
    TogglePause,
}

fn folded(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Map a key to the game verb it triggers
///
/// Arrows, vi keys (`hjkl`) and `wasd` all work. Rotation has a single
/// direction, so Up, `k` and `w` are the only rotate keys. Space and Enter
/// both drop the piece, which keeps the drop reachable with the right hand
/// on the arrow keys.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    let action = match folded(key.code) {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => GameAction::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => GameAction::MoveRight,
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => GameAction::MoveDown,
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => GameAction::Rotate,
        KeyCode::Char(' ') | KeyCode::Enter => GameAction::InstantDrop,
        _ => return None,
    };
    Some(action)
}

/// Map a key to a session command
///
/// Ctrl-C quits even in raw mode, where the terminal no longer turns it into
/// a signal.
pub fn session_key(key: KeyEvent) -> Option<SessionKey> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.code == KeyCode::Char('c')).then_some(SessionKey::Quit);
    }
    match folded(key.code) {
        KeyCode::Char('q') | KeyCode::Esc => Some(SessionKey::Quit),
        KeyCode::Char('n') => Some(SessionKey::NewGame),
        KeyCode::Char('p') => Some(SessionKey::TogglePause),
        _ => None,
    }
}
