use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection, scene autofit, and orbit control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Multiplier on the exact fit distance, leaving headroom around the
    /// scene.
    #[schemars(title = "Fit Margin", range(min = 1.0, max = 4.0), extend("step" = 0.1))]
    pub fit_margin: f32,
    /// Fraction of the scene height the fitted eye is raised by.
    #[schemars(title = "Lift", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub lift_fraction: f32,
    /// Smallest distance autofit will place the eye from the scene center.
    #[schemars(skip)]
    pub min_fit_distance: f32,
    /// Frames rendered after a fit before the scene reports ready.
    #[schemars(skip)]
    pub settle_frames: u32,
    /// Closest the orbit controls may zoom.
    #[schemars(skip)]
    pub min_distance: f32,
    /// Farthest the orbit controls may zoom.
    #[schemars(skip)]
    pub max_distance: f32,
    /// Smallest polar angle (from straight down the up axis), in degrees.
    #[schemars(skip)]
    pub min_polar_deg: f32,
    /// Largest polar angle, in degrees. 90 keeps the eye above the ground.
    #[schemars(skip)]
    pub max_polar_deg: f32,
    /// Orbit radians per pixel of drag.
    #[schemars(title = "Rotate Speed", range(min = 0.001, max = 0.02), extend("step" = 0.001))]
    pub rotate_speed: f32,
    /// Pan world units per pixel of drag.
    #[schemars(title = "Pan Speed", range(min = 0.01, max = 2.0), extend("step" = 0.01))]
    pub pan_speed: f32,
    /// Fractional distance change per scroll step.
    #[schemars(title = "Zoom Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_speed: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 60.0,
            znear: 0.1,
            zfar: 5000.0,
            fit_margin: 2.0,
            lift_fraction: 0.1,
            min_fit_distance: 5.0,
            settle_frames: 2,
            min_distance: 1.0,
            max_distance: 200.0,
            min_polar_deg: 45.0,
            max_polar_deg: 90.0,
            rotate_speed: 0.005,
            pan_speed: 0.1,
            zoom_speed: 0.05,
        }
    }
}
