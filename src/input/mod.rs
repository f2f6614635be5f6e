//! Input events consumed by the engine.

/// Platform-agnostic input events.
pub mod event;

pub use event::InputEvent;
