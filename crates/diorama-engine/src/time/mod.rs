//! Time subsystem.
//!
//! Provides the loop clock without coupling to the runtime.
//! Intended usage:
//! - one `Clock` per application loop
//! - call `tick()` once per iteration to obtain `FrameTime`

mod frame_clock;

pub use frame_clock::{Clock, FrameClock, FrameTime};
