//! Coordinate types.
//!
//! Canonical CPU space: logical pixels (DPI-aware), origin top-left,
//! +X right, +Y down.

mod viewport;

pub use viewport::Viewport;
