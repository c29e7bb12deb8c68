//! Keyboard and mouse state sampled once per frame.
//!
//! Instead of acting on each key event individually, a `key_frame` map
//! records the frame number of the last press/repeat event for every key.
//! Each frame we check which keys are still "fresh" (within `HOLD_WINDOW`
//! frames) and apply all their effects simultaneously, so Space and a
//! direction can be held together.
//!
//! Works on two classes of terminal:
//! * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
//!   `Press` / `Repeat` / `Release` events, so keys are removed on release.
//! * **Classic terminals**: only `Press` events (OS key-repeat shows as
//!   repeated `Press`). Keys expire after `HOLD_WINDOW` frames of silence,
//!   which is shorter than the OS repeat interval.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};

use crate::compute::FrameInput;

/// A key counts as held if seen within this many frames.
/// 8 frames @ 60 FPS ≈ 133 ms, refreshed by any OS key-repeat of 15 Hz or more.
pub const HOLD_WINDOW: u64 = 8;

const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const FIRE_KEYS: [KeyCode; 1] = [KeyCode::Char(' ')];

#[derive(Debug, Default)]
pub struct KeyTracker {
    /// Each held key → the frame it was last seen (press or repeat).
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    /// Record a key event. Returns the key on a fresh press so callers can
    /// handle one-shot actions (menu navigation, quit).
    pub fn observe(&mut self, event: &KeyEvent) -> Option<KeyCode> {
        match event.kind {
            KeyEventKind::Press => {
                self.key_frame.insert(event.code, self.frame);
                Some(event.code)
            }
            // Refresh the timestamp so the key stays "held".
            KeyEventKind::Repeat => {
                self.key_frame.insert(event.code, self.frame);
                None
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&event.code);
                None
            }
        }
    }

    /// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
    pub fn is_held(&self, key: &KeyCode) -> bool {
        self.key_frame
            .get(key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn any_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.is_held(k))
    }

    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            left: self.any_held(&LEFT_KEYS),
            right: self.any_held(&RIGHT_KEYS),
            fire: self.any_held(&FIRE_KEYS),
        }
    }

    /// Forget every held key, e.g. when switching screens.
    pub fn clear(&mut self) {
        self.key_frame.clear();
    }
}

/// Pointer position in logical pixels plus this frame's left click.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    /// A left button press arrived during the current frame.
    pub clicked: bool,
}

impl MouseState {
    pub fn begin_frame(&mut self) {
        self.clicked = false;
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Fold a terminal mouse event in; `to_logical` maps a cell to logical pixels.
    pub fn observe(&mut self, event: &MouseEvent, to_logical: impl Fn(u16, u16) -> (f32, f32)) {
        let (x, y) = to_logical(event.column, event.row);
        self.x = x;
        self.y = y;
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.left_down = true;
                self.clicked = true;
            }
            MouseEventKind::Up(MouseButton::Left) => self.left_down = false,
            _ => {}
        }
    }
}
