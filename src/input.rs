/// Input latch: the last known state of the movement and fire keys.
///
/// Key events write to the latch as they arrive; the stepper only reads it,
/// once per frame. Several keys drive each action, so `HeldKeys` tracks them
/// individually and a flag stays set while any of its keys is down.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// A key is considered released if no press/repeat event refreshed it within
/// this many frames. Only used on terminals that never report releases; the
/// OS key-repeat rate keeps a held key fresher than this.
pub const HOLD_WINDOW: u64 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Fire,
}

/// Map a key to the action it drives, if any.
pub fn action_for(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Action::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::Right),
        KeyCode::Char('z') | KeyCode::Char('Z') | KeyCode::Char(' ') => Some(Action::Fire),
        _ => None,
    }
}

/// Shift may change between press and release; `a` and `A` are one key.
fn physical(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputLatch {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl InputLatch {
    pub fn set(&mut self, action: Action, held: bool) {
        match action {
            Action::Left => self.left = held,
            Action::Right => self.right = held,
            Action::Fire => self.fire = held,
        }
    }
}

/// Bound keys currently down, with the frame each was last pressed or
/// repeated on.
///
/// On terminals that only report presses, `expire` synthesises the release of
/// keys that stopped repeating.
#[derive(Clone, Debug, Default)]
pub struct HeldKeys {
    last_seen: HashMap<KeyCode, u64>,
}

impl HeldKeys {
    /// Apply a key event and refresh the latch flag it drives. Returns the
    /// action it touched, if any.
    pub fn handle_key(
        &mut self,
        event: &KeyEvent,
        frame: u64,
        latch: &mut InputLatch,
    ) -> Option<Action> {
        let action = action_for(event.code)?;
        let key = physical(event.code);
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.last_seen.insert(key, frame);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&key);
            }
        }
        latch.set(action, self.any_held(action));
        Some(action)
    }

    pub fn any_held(&self, action: Action) -> bool {
        self.last_seen
            .keys()
            .any(|&key| action_for(key) == Some(action))
    }

    /// Drop keys not refreshed within `HOLD_WINDOW` frames of `frame`.
    pub fn expire(&mut self, latch: &mut InputLatch, frame: u64) {
        let mut released = Vec::new();
        self.last_seen.retain(|&key, &mut last| {
            let fresh = frame.saturating_sub(last) <= HOLD_WINDOW;
            if !fresh {
                released.extend(action_for(key));
            }
            fresh
        });
        for action in released {
            latch.set(action, self.any_held(action));
        }
    }
}
