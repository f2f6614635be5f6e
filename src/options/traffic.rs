use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::traffic::path::{builtin_families, PathFamily};

/// Vehicle speeds, snap headings, and the configured path families.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Traffic", inline)]
#[serde(default)]
pub struct TrafficOptions {
    /// Speed along the diagonal approach leg (units per second).
    #[schemars(title = "Approach Speed", range(min = 1.0, max = 100.0), extend("step" = 1.0))]
    pub approach_speed: f32,
    /// Speed along the lateral road (units per second).
    #[schemars(title = "Lateral Speed", range(min = 1.0, max = 100.0), extend("step" = 1.0))]
    pub lateral_speed: f32,
    /// Signed tilt of the approach leg away from the depth axis, in degrees.
    /// Velocity is `speed * (sin(tilt), 0, -cos(tilt))`; -5° heads the same
    /// way as a +5° yaw.
    #[schemars(skip)]
    pub tilt_deg: f32,
    /// Yaw applied on every reset, in degrees.
    #[schemars(skip)]
    pub reset_yaw_deg: f32,
    /// Yaw snapped to when forward traffic turns lateral, in degrees.
    #[schemars(skip)]
    pub turn_yaw_deg: f32,
    /// Yaw held by backward traffic on a lateral leg, in degrees.
    #[schemars(skip)]
    pub return_yaw_deg: f32,
    /// Yaw snapped to when backward traffic leaves the lateral leg, in
    /// degrees.
    #[schemars(skip)]
    pub rejoin_yaw_deg: f32,
    /// Uniform model scale applied to every vehicle transform.
    #[schemars(title = "Vehicle Scale", range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    pub vehicle_scale: f32,
    /// Named road shapes referenced by vehicle specs.
    #[schemars(skip)]
    pub families: Vec<PathFamily>,
}

impl Default for TrafficOptions {
    fn default() -> Self {
        Self {
            approach_speed: 20.0,
            lateral_speed: 10.0,
            tilt_deg: -5.0,
            reset_yaw_deg: 5.0,
            turn_yaw_deg: -90.0,
            return_yaw_deg: 90.0,
            rejoin_yaw_deg: 185.0,
            vehicle_scale: 2.0,
            families: builtin_families(),
        }
    }
}

impl TrafficOptions {
    /// Look up a path family by id.
    #[must_use]
    pub fn family(&self, id: &str) -> Option<&PathFamily> {
        self.families.iter().find(|f| f.id == id)
    }
}
