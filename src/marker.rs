//! Points of interest: pulsing two-shell markers that reveal an image when
//! activated.
//!
//! The pulse is a pure function of elapsed time and the reveal flag only
//! changes on explicit activation, so the two never influence each other.

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, Ray};
use crate::error::SitewalkError;
use crate::options::MarkerOptions;
use crate::scene::Transform;

/// Identifier of a marker within a [`MarkerSet`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct MarkerId(pub u32);

/// Static configuration of one marker, as written in a site layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MarkerSpec {
    /// Unique id.
    pub id: u32,
    /// World position of the marker group.
    pub anchor: [f32; 3],
    /// Image shown while revealed. Rendering it is the renderer's concern.
    #[serde(default)]
    pub image: Option<String>,
    /// Turn the shells toward the camera every frame.
    #[serde(default)]
    pub face_camera: bool,
}

/// Sinusoidal scale oscillation shared by all markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    amplitude: f32,
    frequency: f32,
    base_scale: f32,
    aura_ratio: f32,
}

impl Pulse {
    /// Pulse from marker options.
    #[must_use]
    pub fn from_options(options: &MarkerOptions) -> Self {
        Self {
            amplitude: options.amplitude,
            frequency: options.frequency,
            base_scale: options.base_scale,
            aura_ratio: options.aura_ratio,
        }
    }

    /// Inner shell scale at `elapsed` seconds.
    #[must_use]
    pub fn scale(&self, elapsed: f32) -> f32 {
        self.base_scale + self.amplitude * (self.frequency * elapsed).sin()
    }

    /// Aura shell scale at `elapsed` seconds.
    #[must_use]
    pub fn aura_scale(&self, elapsed: f32) -> f32 {
        self.aura_ratio * self.scale(elapsed)
    }
}

/// One marker: identity plus its pulse, facing and reveal state.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    id: MarkerId,
    anchor: Vec3,
    image: Option<String>,
    face_camera: bool,

    revealed: bool,
    inner_scale: f32,
    aura_scale: f32,
    yaw: f32,
}

impl Marker {
    fn from_spec(spec: &MarkerSpec, pulse: &Pulse) -> Result<Self, SitewalkError> {
        let anchor = Vec3::from_array(spec.anchor);
        if !anchor.is_finite() {
            return Err(SitewalkError::InvalidMarker(format!(
                "marker {} anchor {anchor} is not finite",
                spec.id
            )));
        }
        Ok(Self {
            id: MarkerId(spec.id),
            anchor,
            image: spec.image.clone(),
            face_camera: spec.face_camera,
            revealed: false,
            inner_scale: pulse.scale(0.0),
            aura_scale: pulse.aura_scale(0.0),
            yaw: 0.0,
        })
    }

    /// Marker id.
    #[must_use]
    pub fn id(&self) -> MarkerId {
        self.id
    }

    /// Group position.
    #[must_use]
    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    /// Attached image reference, if any.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Whether the image panel is shown.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Whether the shells track the camera.
    #[must_use]
    pub fn faces_camera(&self) -> bool {
        self.face_camera
    }

    /// Current inner shell scale.
    #[must_use]
    pub fn inner_scale(&self) -> f32 {
        self.inner_scale
    }

    /// Current aura shell scale.
    #[must_use]
    pub fn aura_scale(&self) -> f32 {
        self.aura_scale
    }

    /// Current shell yaw in radians.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Flip the reveal flag and return its new value.
    pub fn activate(&mut self) -> bool {
        self.revealed = !self.revealed;
        self.revealed
    }

    /// Advance the pulse to `elapsed` and, for camera-facing markers, turn
    /// to `camera_yaw`.
    pub fn update(&mut self, pulse: &Pulse, elapsed: f32, camera_yaw: f32) {
        self.inner_scale = pulse.scale(elapsed);
        self.aura_scale = pulse.aura_scale(elapsed);
        if self.face_camera {
            self.yaw = camera_yaw;
        }
    }

    /// Inner shell transform.
    #[must_use]
    pub fn inner_transform(&self) -> Transform {
        self.shell_transform(self.inner_scale)
    }

    /// Aura shell transform.
    #[must_use]
    pub fn aura_transform(&self) -> Transform {
        self.shell_transform(self.aura_scale)
    }

    fn shell_transform(&self, scale: f32) -> Transform {
        Transform::new()
            .with_position(self.anchor)
            .with_rotation(Quat::from_rotation_y(self.yaw))
            .with_scale(Vec3::splat(scale))
    }
}

/// All markers of a site, addressable by id in insertion order.
#[derive(Debug, Clone)]
pub struct MarkerSet {
    pulse: Pulse,
    inner_radius: f32,
    aura_radius: f32,
    markers: Vec<Marker>,
    index: FxHashMap<MarkerId, usize>,
}

impl MarkerSet {
    /// Empty set using `options` for pulse and shell size.
    #[must_use]
    pub fn new(options: &MarkerOptions) -> Self {
        Self {
            pulse: Pulse::from_options(options),
            inner_radius: options.inner_radius,
            aura_radius: options.aura_radius,
            markers: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Set built from layout specs; fails on the first invalid spec.
    pub fn from_specs(
        options: &MarkerOptions,
        specs: &[MarkerSpec],
    ) -> Result<Self, SitewalkError> {
        let mut set = Self::new(options);
        for spec in specs {
            let _ = set.insert(spec)?;
        }
        Ok(set)
    }

    /// Add a marker. Ids must be unique.
    pub fn insert(&mut self, spec: &MarkerSpec) -> Result<MarkerId, SitewalkError> {
        let id = MarkerId(spec.id);
        if self.index.contains_key(&id) {
            return Err(SitewalkError::InvalidMarker(format!(
                "marker id {} is used twice",
                spec.id
            )));
        }
        let marker = Marker::from_spec(spec, &self.pulse)?;
        let _ = self.index.insert(id, self.markers.len());
        self.markers.push(marker);
        Ok(id)
    }

    /// Pulse shared by every marker.
    #[must_use]
    pub fn pulse(&self) -> &Pulse {
        &self.pulse
    }

    /// Unscaled radii of the inner and aura shells.
    #[must_use]
    pub fn shell_radii(&self) -> (f32, f32) {
        (self.inner_radius, self.aura_radius)
    }

    /// Marker by id.
    #[must_use]
    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.index.get(&id).map(|&i| &self.markers[i])
    }

    /// Markers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    /// Number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// True when no markers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Per-frame step. The camera yaw is read from the live camera on
    /// every call.
    pub fn update(&mut self, elapsed: f32, camera: &Camera) {
        let yaw = camera.yaw();
        for marker in &mut self.markers {
            marker.update(&self.pulse, elapsed, yaw);
        }
    }

    /// Toggle the reveal flag of `id`; returns the new value.
    pub fn activate(&mut self, id: MarkerId) -> Result<bool, SitewalkError> {
        let &i = self
            .index
            .get(&id)
            .ok_or(SitewalkError::UnknownMarker(id.0))?;
        let marker = &mut self.markers[i];
        let revealed = marker.activate();
        log::info!(
            "marker {} {} (image: {})",
            id.0,
            if revealed { "revealed" } else { "hidden" },
            marker.image().unwrap_or("none")
        );
        Ok(revealed)
    }

    /// Nearest marker whose inner shell the ray hits.
    #[must_use]
    pub fn pick(&self, ray: &Ray) -> Option<MarkerId> {
        self.markers
            .iter()
            .filter_map(|m| {
                ray.intersect_sphere(m.anchor, self.inner_radius * m.inner_scale)
                    .map(|t| (t, m.id))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }
}
