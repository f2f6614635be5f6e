//! Timing helpers shared by the engine and the headless runner.

/// Frame timing for the engine loop.
pub mod frame_clock;

pub use frame_clock::{FrameClock, FrameTick};
