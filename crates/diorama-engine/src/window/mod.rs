//! winit/wgpu backend.
//!
//! Owns the `winit` EventLoop and at most one Window with its GPU context.
//! The event loop is pumped once per application iteration instead of
//! being handed control, so the application keeps its own loop.

mod backend;
mod options;

pub use backend::WindowBackend;
pub use options::WindowOption;
pub use winit::window::CursorIcon;
