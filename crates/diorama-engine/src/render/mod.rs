//! Frame-level drawing surface of the window backend.
//!
//! A [`Canvas`] is what `Scene::draw` receives from `WindowBackend`: the
//! device/queue and surface format to build pipelines against, plus the
//! frame's encoder and color view to record into.
//!
//! Convention: positions are logical pixels (top-left origin, +Y down).

mod canvas;
mod ctx;

pub use canvas::Canvas;
pub(crate) use canvas::clear_pass;
pub use ctx::{RenderCtx, RenderTarget};
