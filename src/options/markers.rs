use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pulse animation and shell geometry shared by all markers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Markers", inline)]
#[serde(default)]
pub struct MarkerOptions {
    /// Peak deviation of the pulse from the base scale.
    #[schemars(title = "Pulse Amplitude", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub amplitude: f32,
    /// Angular frequency of the pulse (radians per second).
    #[schemars(title = "Pulse Frequency", range(min = 0.0, max = 20.0), extend("step" = 0.5))]
    pub frequency: f32,
    /// Scale the pulse oscillates around.
    #[schemars(skip)]
    pub base_scale: f32,
    /// Aura shell scale relative to the inner shell's current scale.
    #[schemars(title = "Aura Ratio", range(min = 1.0, max = 3.0), extend("step" = 0.05))]
    pub aura_ratio: f32,
    /// Unscaled radius of the clickable inner shell.
    #[schemars(skip)]
    pub inner_radius: f32,
    /// Unscaled radius of the aura shell.
    #[schemars(skip)]
    pub aura_radius: f32,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            amplitude: 0.3,
            frequency: 4.0,
            base_scale: 1.0,
            aura_ratio: 1.2,
            inner_radius: 2.0,
            aura_radius: 3.2,
        }
    }
}
