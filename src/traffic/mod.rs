//! Scripted vehicles looping along fixed two-leg roads.

/// Path families and their leg thresholds.
pub mod path;
/// Per-vehicle phase state machine.
pub mod vehicle;

pub use path::{LateralLeg, PathFamily, PathThresholds};
pub use vehicle::{Direction, Phase, Step, Vehicle, VehicleSpec};
