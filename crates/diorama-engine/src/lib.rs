//! Diorama engine crate.
//!
//! Scene-based application lifecycle on top of winit + wgpu: an
//! [`Application`](core::Application) runs exactly one active
//! [`Scene`](core::Scene) at a time, drives its hooks once per loop
//! iteration and applies scene switches, settings changes and quit requests
//! between iterations.

pub mod config;
pub mod coords;
pub mod core;
pub mod device;
pub mod headless;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod time;
pub mod window;

pub use crate::config::{Settings, SettingsPatch};
pub use crate::core::{AppLink, Application, Backend, BoxedScene, Polled, Scene, SceneError};
pub use crate::headless::HeadlessBackend;
pub use crate::window::WindowBackend;
