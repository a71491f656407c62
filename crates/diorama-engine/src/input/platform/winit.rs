use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, Ime, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::input::{
    InputEvent, InputState, Key, KeyState, Modifiers, MouseButton, MouseButtonState,
    MouseWheelDelta, PointerButtonEvent,
};

/// Translates a winit `WindowEvent` into an `InputEvent`.
///
/// `scale` is the window's scale factor; positions are reported in logical
/// pixels. Returns `None` for events the input subsystem does not represent,
/// including resize and close, which the window backend handles itself.
pub(crate) fn translate_window_event(
    scale: f64,
    state: &InputState,
    event: &WindowEvent,
) -> Option<InputEvent> {
    match event {
        WindowEvent::ModifiersChanged(m) => Some(InputEvent::ModifiersChanged(map_modifiers(m.state()))),

        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical_f32(scale, *position);
            Some(InputEvent::PointerMoved { x, y })
        }

        WindowEvent::MouseInput { state: st, button, .. } => {
            // winit 0.30 reports neither cursor position nor modifiers here.
            let (x, y) = state.pointer_pos.unwrap_or((0.0, 0.0));

            Some(InputEvent::PointerButton(PointerButtonEvent {
                button: map_mouse_button(*button),
                state: match st {
                    ElementState::Pressed => MouseButtonState::Pressed,
                    ElementState::Released => MouseButtonState::Released,
                },
                x,
                y,
                modifiers: state.modifiers,
            }))
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x: *x, y: *y },
                MouseScrollDelta::PixelDelta(p) => {
                    let (x, y) = to_logical_f32(scale, *p);
                    MouseWheelDelta::Pixel { x, y }
                }
            };
            Some(InputEvent::MouseWheel { delta, modifiers: state.modifiers })
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let (key, code) = map_key(event.physical_key);
            Some(InputEvent::Key {
                key,
                state: match event.state {
                    ElementState::Pressed => KeyState::Pressed,
                    ElementState::Released => KeyState::Released,
                },
                modifiers: state.modifiers,
                code,
                repeat: event.repeat,
            })
        }

        WindowEvent::Ime(Ime::Commit(text)) if !text.is_empty() => Some(InputEvent::Text(text.clone())),

        _ => None,
    }
}

fn to_logical_f32(scale: f64, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(scale);
    (logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

macro_rules! key_table {
    ($code:expr; $($from:ident => $to:ident),* $(,)?) => {
        match $code {
            $(KeyCode::$from => Key::$to,)*
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
            KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
            KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
            KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,
            other => Key::Unknown(other as u32),
        }
    };
}

fn map_key(pk: PhysicalKey) -> (Key, u32) {
    let code = match pk {
        PhysicalKey::Code(code) => code,
        // No stable numeric for native codes.
        PhysicalKey::Unidentified(_) => return (Key::Unknown(0), 0),
    };

    let key = key_table!(code;
        Escape => Escape, Enter => Enter, Tab => Tab, Backspace => Backspace, Space => Space,
        Insert => Insert, Delete => Delete, Home => Home, End => End,
        PageUp => PageUp, PageDown => PageDown,
        ArrowUp => ArrowUp, ArrowDown => ArrowDown, ArrowLeft => ArrowLeft, ArrowRight => ArrowRight,

        KeyA => A, KeyB => B, KeyC => C, KeyD => D, KeyE => E, KeyF => F, KeyG => G,
        KeyH => H, KeyI => I, KeyJ => J, KeyK => K, KeyL => L, KeyM => M, KeyN => N,
        KeyO => O, KeyP => P, KeyQ => Q, KeyR => R, KeyS => S, KeyT => T, KeyU => U,
        KeyV => V, KeyW => W, KeyX => X, KeyY => Y, KeyZ => Z,

        Digit0 => Digit0, Digit1 => Digit1, Digit2 => Digit2, Digit3 => Digit3, Digit4 => Digit4,
        Digit5 => Digit5, Digit6 => Digit6, Digit7 => Digit7, Digit8 => Digit8, Digit9 => Digit9,

        F1 => F1, F2 => F2, F3 => F3, F4 => F4, F5 => F5, F6 => F6,
        F7 => F7, F8 => F8, F9 => F9, F10 => F10, F11 => F11, F12 => F12,
    );

    (key, code as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_by_physical_code() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyQ)).0, Key::Q);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Escape)).0, Key::Escape);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ShiftRight)).0, Key::Shift);
        assert!(matches!(map_key(PhysicalKey::Code(KeyCode::NumLock)).0, Key::Unknown(_)));
    }

    #[test]
    fn modifiers_map_all_flags() {
        let m = map_modifiers(ModifiersState::SHIFT | ModifiersState::SUPER);
        assert_eq!(m, Modifiers { shift: true, ctrl: false, alt: false, meta: true });
    }

    #[test]
    fn positions_are_logical() {
        assert_eq!(to_logical_f32(2.0, PhysicalPosition::new(100.0, 50.0)), (50.0, 25.0));
    }

    #[test]
    fn clicks_use_tracked_pointer() {
        let mut state = InputState::default();
        state.apply(&InputEvent::PointerMoved { x: 7.0, y: 9.0 });

        let ev = WindowEvent::MouseInput {
            device_id: winit::event::DeviceId::dummy(),
            state: ElementState::Released,
            button: WinitMouseButton::Left,
        };

        match translate_window_event(1.0, &state, &ev) {
            Some(InputEvent::PointerButton(b)) => {
                assert_eq!((b.x, b.y), (7.0, 9.0));
                assert_eq!(b.state, MouseButtonState::Released);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
