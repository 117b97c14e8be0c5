//! Platform-agnostic input state
//!
//! Defines key types and a state container that do not depend on any windowing
//! library or OS hook. Whatever owns the event loop translates its events into
//! [`Input::inject_key`] calls and hands the state to the avatar each tick.

use rustc_hash::FxHashSet;

/// Keys the avatar reacts to
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    // Number keys
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,

    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Control keys
    Space,
    Escape,
}

impl Key {
    /// Number keys in ascending order.
    pub const DIGITS: [Key; 10] = [
        Key::Key0,
        Key::Key1,
        Key::Key2,
        Key::Key3,
        Key::Key4,
        Key::Key5,
        Key::Key6,
        Key::Key7,
        Key::Key8,
        Key::Key9,
    ];

    /// The digit of a number key.
    #[must_use]
    pub fn digit(self) -> Option<usize> {
        Self::DIGITS.iter().position(|&k| k == self)
    }
}

/// Button state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Keyboard state container
#[derive(Debug, Clone, Default)]
pub struct Input {
    pressed_keys: FxHashSet<Key>,
    just_pressed_keys: FxHashSet<Key>,
    just_released_keys: FxHashSet<Key>,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== System API (called by the event loop) ==========

    /// Clears transient state at the start of each tick (JustPressed/JustReleased)
    pub fn start_frame(&mut self) {
        self.just_pressed_keys.clear();
        self.just_released_keys.clear();
    }

    /// Injects a keyboard event
    pub fn inject_key(&mut self, key: Key, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                if self.pressed_keys.insert(key) {
                    self.just_pressed_keys.insert(key);
                }
            }
            ButtonState::Released => {
                if self.pressed_keys.remove(&key) {
                    self.just_released_keys.insert(key);
                }
            }
        }
    }

    // ========== User API ==========

    /// Checks whether a key is currently held down
    #[must_use]
    pub fn get_key(&self, key: Key) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Checks whether a key was just pressed this tick
    #[must_use]
    pub fn get_key_down(&self, key: Key) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    /// Checks whether a key was just released this tick
    #[must_use]
    pub fn get_key_up(&self, key: Key) -> bool {
        self.just_released_keys.contains(&key)
    }

    /// The lowest number key pressed this tick, as a digit.
    #[must_use]
    pub fn digit_down(&self) -> Option<usize> {
        Key::DIGITS
            .iter()
            .find(|&&k| self.get_key_down(k))
            .and_then(|k| k.digit())
    }
}
