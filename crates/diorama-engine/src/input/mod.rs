//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Backends translate platform events into `InputEvent`s; scenes receive them
//! one by one through `Scene::handle_input`.

pub(crate) mod platform;
mod state;
mod types;

pub use state::InputState;
pub use types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PointerButtonEvent,
};
