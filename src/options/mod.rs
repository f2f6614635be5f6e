//! Centralized runtime options with TOML preset support.
//!
//! All tweakable settings (camera framing and orbit limits, traffic speeds
//! and path families, marker pulse) are consolidated here. Options
//! serialize to/from TOML so site presets can live next to the layout file.

mod camera;
mod markers;
mod traffic;

use std::path::Path;

pub use camera::CameraOptions;
pub use markers::MarkerOptions;
use rustc_hash::FxHashSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use traffic::TrafficOptions;

use crate::error::SitewalkError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[camera]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection, autofit and orbit parameters.
    pub camera: CameraOptions,
    /// Vehicle motion parameters and path families.
    pub traffic: TrafficOptions,
    /// Marker pulse parameters.
    pub markers: MarkerOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, SitewalkError> {
        let content =
            std::fs::read_to_string(path).map_err(SitewalkError::Io)?;
        let options: Self = toml::from_str(&content)?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), SitewalkError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SitewalkError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SitewalkError::Io)?;
        }
        std::fs::write(path, content).map_err(SitewalkError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }

    /// Reject values that would freeze traffic or produce a NaN camera.
    pub fn validate(&self) -> Result<(), SitewalkError> {
        self.validate_camera()?;
        self.validate_traffic()?;
        self.validate_markers()
    }

    fn validate_camera(&self) -> Result<(), SitewalkError> {
        let cam = &self.camera;
        if !(cam.fovy > 0.0 && cam.fovy < 180.0) {
            return Err(SitewalkError::InvalidOptions(format!(
                "camera.fovy must lie in (0, 180), got {}",
                cam.fovy
            )));
        }
        if !(cam.znear > 0.0 && cam.zfar > cam.znear && cam.zfar.is_finite())
        {
            return Err(SitewalkError::InvalidOptions(format!(
                "camera clip planes need 0 < znear < zfar, got {} / {}",
                cam.znear, cam.zfar
            )));
        }
        if !(positive(cam.min_fit_distance) && positive(cam.fit_margin)) {
            return Err(SitewalkError::InvalidOptions(
                "camera.min_fit_distance and camera.fit_margin must be \
                 positive"
                    .into(),
            ));
        }
        if !cam.lift_fraction.is_finite() {
            return Err(SitewalkError::InvalidOptions(
                "camera.lift_fraction must be finite".into(),
            ));
        }
        if cam.settle_frames == 0 {
            return Err(SitewalkError::InvalidOptions(
                "camera.settle_frames must be at least 1".into(),
            ));
        }
        if cam.min_distance > cam.max_distance
            || cam.min_polar_deg > cam.max_polar_deg
        {
            return Err(SitewalkError::InvalidOptions(
                "camera orbit limits are inverted".into(),
            ));
        }
        Ok(())
    }

    fn validate_traffic(&self) -> Result<(), SitewalkError> {
        let traffic = &self.traffic;
        if !(positive(traffic.approach_speed)
            && positive(traffic.lateral_speed))
        {
            return Err(SitewalkError::InvalidOptions(
                "traffic speeds must be positive".into(),
            ));
        }
        let angles = [
            ("tilt_deg", traffic.tilt_deg),
            ("reset_yaw_deg", traffic.reset_yaw_deg),
            ("turn_yaw_deg", traffic.turn_yaw_deg),
            ("return_yaw_deg", traffic.return_yaw_deg),
            ("rejoin_yaw_deg", traffic.rejoin_yaw_deg),
        ];
        if let Some((name, value)) =
            angles.iter().find(|(_, value)| !value.is_finite())
        {
            return Err(SitewalkError::InvalidOptions(format!(
                "traffic.{name} must be finite, got {value}"
            )));
        }
        if !positive(traffic.vehicle_scale) {
            return Err(SitewalkError::InvalidOptions(format!(
                "traffic.vehicle_scale must be positive, got {}",
                traffic.vehicle_scale
            )));
        }
        let mut seen = FxHashSet::default();
        for family in &traffic.families {
            family.validate()?;
            if !seen.insert(family.id.as_str()) {
                return Err(SitewalkError::InvalidOptions(format!(
                    "path family '{}' is defined twice",
                    family.id
                )));
            }
        }
        Ok(())
    }

    fn validate_markers(&self) -> Result<(), SitewalkError> {
        let markers = &self.markers;
        let pulse = [
            ("amplitude", markers.amplitude),
            ("frequency", markers.frequency),
            ("base_scale", markers.base_scale),
            ("aura_ratio", markers.aura_ratio),
        ];
        if let Some((name, value)) =
            pulse.iter().find(|(_, value)| !value.is_finite())
        {
            return Err(SitewalkError::InvalidOptions(format!(
                "markers.{name} must be finite, got {value}"
            )));
        }
        if !(positive(markers.inner_radius) && positive(markers.aura_radius)) {
            return Err(SitewalkError::InvalidOptions(
                "marker shell radii must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Finite and strictly greater than zero.
fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
