use std::fmt;

/// Keyboard key identifier.
///
/// Backends map platform key codes into these variants where possible;
/// anything else arrives as `Key::Unknown` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Mouse wheel delta: `Line` for notched wheels, `Pixel` for touchpads.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

/// Pointer button event with the pointer position at the time of the click,
/// in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    pub x: f32,
    pub y: f32,
    pub modifiers: Modifiers,
}

/// Input event delivered to `Scene::handle_input`.
///
/// Window close requests are not represented: the backend reports them as
/// `Polled::Quit` and the application handles them itself.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        /// Platform scancode/keycode, when available.
        code: u32,
        repeat: bool,
    },

    /// Pointer moved, logical pixels.
    PointerMoved { x: f32, y: f32 },
    PointerButton(PointerButtonEvent),
    /// Pointer left the window surface.
    PointerLeft,

    MouseWheel {
        delta: MouseWheelDelta,
        modifiers: Modifiers,
    },

    /// Committed text (IME or keyboard).
    Text(String),

    ModifiersChanged(Modifiers),
    Focused(bool),

    /// Drawable area changed, logical pixels.
    Resized { width: f32, height: f32 },
}

impl InputEvent {
    /// True for a fresh (non-repeat) press of `key`.
    pub fn is_key_press(&self, key: Key) -> bool {
        matches!(
            self,
            InputEvent::Key { key: k, state: KeyState::Pressed, repeat: false, .. } if *k == key
        )
    }

    /// True for a release of `button`.
    pub fn is_click(&self, button: MouseButton) -> bool {
        matches!(
            self,
            InputEvent::PointerButton(PointerButtonEvent { button: b, state: MouseButtonState::Released, .. })
                if *b == button
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), code: 0, repeat }
    }

    #[test]
    fn key_press_ignores_repeats_and_releases() {
        assert!(key(Key::Enter, KeyState::Pressed, false).is_key_press(Key::Enter));
        assert!(!key(Key::Enter, KeyState::Pressed, true).is_key_press(Key::Enter));
        assert!(!key(Key::Enter, KeyState::Released, false).is_key_press(Key::Enter));
        assert!(!key(Key::Space, KeyState::Pressed, false).is_key_press(Key::Enter));
    }

    #[test]
    fn click_is_release() {
        let ev = |state| {
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state,
                x: 0.0,
                y: 0.0,
                modifiers: Modifiers::default(),
            })
        };
        assert!(ev(MouseButtonState::Released).is_click(MouseButton::Left));
        assert!(!ev(MouseButtonState::Pressed).is_click(MouseButton::Left));
        assert!(!ev(MouseButtonState::Released).is_click(MouseButton::Right));
    }
}
