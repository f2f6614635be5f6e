//! Camera system for site viewing.
//!
//! Provides the perspective camera, scene bounds, one-shot autofit framing,
//! orbit controls seeded by that fit, and frustum tests.

/// One-shot framing of a newly loaded scene.
pub mod autofit;
/// Axis-aligned bounding boxes.
pub mod bounds;
/// Orbit controls seeded by autofit and driven by user input.
pub mod controller;
/// Core camera struct and picking rays.
pub mod core;
/// View frustum extraction and containment tests.
pub mod frustum;

pub use autofit::{fit_distance, AutoFit, CameraFit, FitEvent, FitPhase};
pub use bounds::Aabb;
pub use controller::OrbitController;
pub use core::{Camera, Ray};
