use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState};

/// Held keys/buttons, modifiers and pointer position for the open window.
///
/// Maintained by the window backend from the events it forwards; also used
/// to fill in fields winit does not report per event (pointer position on
/// clicks, modifiers on wheel events).
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Folds a translated event into the state.
    pub fn apply(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are not delivered while unfocused.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some((*x, *y)),
            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = *modifiers;
                match state {
                    KeyState::Pressed => {
                        self.keys_down.insert(*key);
                    }
                    KeyState::Released => {
                        self.keys_down.remove(key);
                    }
                }
            }

            InputEvent::PointerButton(b) => {
                self.pointer_pos = Some((b.x, b.y));
                match b.state {
                    MouseButtonState::Pressed => {
                        self.buttons_down.insert(b.button);
                    }
                    MouseButtonState::Released => {
                        self.buttons_down.remove(&b.button);
                    }
                }
            }

            InputEvent::MouseWheel { .. } | InputEvent::Text(_) | InputEvent::Resized { .. } => {}
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }

    /// Forgets everything; used when the window is closed.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), code: 0, repeat: false }
    }

    #[test]
    fn tracks_held_keys() {
        let mut s = InputState::default();
        s.apply(&key(Key::W, KeyState::Pressed));
        assert!(s.key_down(Key::W));
        s.apply(&key(Key::W, KeyState::Released));
        assert!(!s.key_down(Key::W));
    }

    #[test]
    fn focus_loss_clears_held_input() {
        let mut s = InputState::default();
        s.apply(&InputEvent::Focused(true));
        s.apply(&key(Key::A, KeyState::Pressed));
        s.apply(&InputEvent::Focused(false));
        assert!(!s.focused);
        assert!(s.keys_down.is_empty());
    }

    #[test]
    fn pointer_position_follows_moves() {
        let mut s = InputState::default();
        s.apply(&InputEvent::PointerMoved { x: 3.0, y: 4.0 });
        assert_eq!(s.pointer_pos, Some((3.0, 4.0)));
        s.apply(&InputEvent::PointerLeft);
        assert_eq!(s.pointer_pos, None);
    }
}
