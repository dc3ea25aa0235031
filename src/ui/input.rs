/// Terminal input: drains crossterm events and decodes them into key actions.
///
/// Events are read without blocking once per frame. Only presses (and
/// auto-repeats, which is how held letters type) are kept; release events
/// are dropped.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::input::KeyAction;

pub struct InputState {
    /// Key presses collected during the most recent drain, in arrival order.
    pub presses: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            presses: Vec::with_capacity(16),
        }
    }

    /// Drain all pending terminal events.
    /// Call this once per frame, before the session frame.
    pub fn drain_events(&mut self) {
        self.presses.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    self.presses.push(key);
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("terminal read failed: {e}");
                    break;
                }
            }
        }
    }

    /// Was this key pressed this frame?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.presses.iter().any(|k| k.code == code && !is_ctrl(k))
    }

    /// Convenience: was any of these keys pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Check if any event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.presses.iter().any(|k| {
            is_ctrl(k) && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

fn is_ctrl(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Decode one key press for the game.
///
///   →              pause / resume
///   Backspace, Del delete last letter
///   Enter          commit (check, then clear)
///   A–Z, a–z       type a letter
pub fn key_action(key: &KeyEvent) -> KeyAction {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return KeyAction::Ignored;
    }
    match key.code {
        KeyCode::Right => KeyAction::TogglePause,
        KeyCode::Backspace | KeyCode::Delete => KeyAction::DeleteLast,
        KeyCode::Enter => KeyAction::Commit,
        KeyCode::Char(c) if c.is_ascii_alphabetic() => KeyAction::Letter(c),
        _ => KeyAction::Ignored,
    }
}
