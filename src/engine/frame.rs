//! Per-frame snapshot handed to renderers.

use serde::Serialize;

use crate::camera::Camera;
use crate::marker::{Marker, MarkerId};
use crate::scene::Transform;
use crate::traffic::{Phase, Vehicle};

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameOutput {
    /// Frame counter of the tick that produced this output.
    pub frame: u64,
    /// Seconds since start.
    pub elapsed: f32,
    /// True until the loaded scene has been fitted and settled.
    pub loading: bool,
    /// Camera pose and projection.
    pub camera: Camera,
    /// One entry per vehicle, in layout order.
    pub vehicles: Vec<VehicleFrame>,
    /// One entry per marker, in layout order.
    pub markers: Vec<MarkerFrame>,
}

/// Render state of one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleFrame {
    /// Path family id.
    pub path: String,
    /// Current phase.
    pub phase: Phase,
    /// World transform.
    pub transform: Transform,
}

impl From<&Vehicle> for VehicleFrame {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            path: vehicle.family().id.clone(),
            phase: vehicle.phase(),
            transform: vehicle.transform(),
        }
    }
}

/// Render state of one marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerFrame {
    /// Marker id.
    pub id: MarkerId,
    /// Whether the image panel is shown.
    pub revealed: bool,
    /// Image to show while revealed.
    pub image: Option<String>,
    /// Inner shell transform.
    pub inner: Transform,
    /// Aura shell transform.
    pub aura: Transform,
}

impl From<&Marker> for MarkerFrame {
    fn from(marker: &Marker) -> Self {
        Self {
            id: marker.id(),
            revealed: marker.is_revealed(),
            image: marker.image().map(str::to_owned),
            inner: marker.inner_transform(),
            aura: marker.aura_transform(),
        }
    }
}
