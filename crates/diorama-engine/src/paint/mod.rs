//! Paint model shared between backends and scenes.
//!
//! Colors are linear premultiplied alpha. Geometry types live in `coords`.

pub mod color;

pub use color::Color;
