//! Core application/scene contracts.
//!
//! This module defines the scene lifecycle and the loop that drives it.
//! It knows nothing about windows or GPUs: those arrive through the
//! [`Backend`] trait, so the same scenes run against the winit/wgpu window
//! backend or the headless one.

mod app;
mod backend;
mod error;
mod scene;

pub use app::Application;
pub use backend::{Backend, Polled};
pub use error::SceneError;
pub use scene::{AppLink, BoxedScene, Scene};
