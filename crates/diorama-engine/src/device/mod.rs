//! GPU device + surface management for the window backend.
//!
//! Creates the wgpu Instance/Adapter/Device/Queue for one window, keeps the
//! surface configured across resizes and vsync changes, and hands out
//! per-frame encoders/views.

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
