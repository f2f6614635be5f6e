//! One-shot camera framing on scene load.
//!
//! [`AutoFit::update`] is cheap to call every frame: it only does work on
//! the frame a new scene appears, then counts down a fixed number of settle
//! frames before reporting the scene ready.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::controller::OrbitController;
use super::core::Camera;
use crate::options::CameraOptions;
use crate::scene::{SceneGraph, SceneId};

/// Where the fit is in its load/settle cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitPhase {
    /// No scene present yet.
    Waiting,
    /// Fit applied; ready fires when `remaining` reaches zero.
    Settling {
        /// Frames still to render before ready.
        remaining: u32,
    },
    /// Fit applied and settled.
    Ready,
}

/// The framing computed for one scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFit {
    /// Bounds center; becomes the orbit target.
    pub center: Vec3,
    /// Bounds extent per axis.
    pub size: Vec3,
    /// Eye distance from the center along +Z.
    pub distance: f32,
    /// Final eye position (distance plus lift).
    pub eye: Vec3,
    /// True when the distance was raised to the configured minimum.
    pub clamped: bool,
}

/// What an [`AutoFit::update`] call did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitEvent {
    /// A new scene was framed this frame.
    Fitted(CameraFit),
    /// The settle countdown finished; loading indicators can go.
    Ready,
}

/// Eye distance at which an object of `max_extent` fills the vertical
/// field of view, times `margin`, never below `min_distance`.
#[must_use]
pub fn fit_distance(
    max_extent: f32,
    fovy_deg: f32,
    margin: f32,
    min_distance: f32,
) -> f32 {
    let half_fov_tan = (fovy_deg.to_radians() * 0.5).tan();
    let distance = (max_extent * 0.5 / half_fov_tan).abs() * margin;
    if distance.is_finite() && distance >= min_distance {
        distance
    } else {
        min_distance
    }
}

/// Camera autofit engine with an explicit settle countdown.
#[derive(Debug, Clone)]
pub struct AutoFit {
    phase: FitPhase,
    fitted: Option<SceneId>,
    last_fit: Option<CameraFit>,

    margin: f32,
    lift_fraction: f32,
    min_distance: f32,
    settle_frames: u32,
}

impl AutoFit {
    /// Idle autofit configured from camera options.
    #[must_use]
    pub fn new(options: &CameraOptions) -> Self {
        Self {
            phase: FitPhase::Waiting,
            fitted: None,
            last_fit: None,
            margin: options.fit_margin,
            lift_fraction: options.lift_fraction,
            min_distance: options.min_fit_distance,
            settle_frames: options.settle_frames.max(1),
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> FitPhase {
        self.phase
    }

    /// True once the settle countdown has finished for the current scene.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.phase == FitPhase::Ready
    }

    /// Most recent fit, if any scene has been framed.
    #[must_use]
    pub fn last_fit(&self) -> Option<&CameraFit> {
        self.last_fit.as_ref()
    }

    /// Forget the fitted scene. The next update with a scene present
    /// frames it again, even if it carries the same [`SceneId`].
    pub fn reset(&mut self) {
        self.fitted = None;
        self.phase = FitPhase::Waiting;
    }

    /// Framing for `bounds` with a vertical field of view of `fovy`
    /// degrees.
    #[must_use]
    pub fn compute(&self, bounds: &Aabb, fovy: f32) -> CameraFit {
        let center = bounds.center();
        let size = bounds.size();
        let distance = fit_distance(
            bounds.max_extent(),
            fovy,
            self.margin,
            self.min_distance,
        );
        let clamped = bounds.is_degenerate()
            || distance == self.min_distance;
        let eye = center
            + Vec3::Y * (size.y * self.lift_fraction)
            + Vec3::Z * distance;
        CameraFit {
            center,
            size,
            distance,
            eye,
            clamped,
        }
    }

    /// Per-frame step. Frames the scene on the transition to a new
    /// [`SceneId`], then counts down settle frames.
    pub fn update(
        &mut self,
        scene: Option<&SceneGraph>,
        camera: &mut Camera,
        orbit: &mut OrbitController,
    ) -> Option<FitEvent> {
        let Some(scene) = scene else {
            if self.fitted.take().is_some() {
                log::info!("scene unloaded; autofit waiting");
            }
            self.phase = FitPhase::Waiting;
            return None;
        };

        if self.fitted != Some(scene.id()) {
            let fit = self.compute(&scene.world_bounds(), camera.fovy);
            if fit.clamped {
                log::warn!(
                    "scene {:?} has degenerate bounds (size {}); camera \
                     distance clamped to {}",
                    scene.id(),
                    fit.size,
                    fit.distance
                );
            }
            orbit.seed(fit.eye, fit.center);
            orbit.apply(camera);
            log::info!(
                "autofit scene {:?}: center {} size {} distance {:.1}",
                scene.id(),
                fit.center,
                fit.size,
                fit.distance
            );

            self.fitted = Some(scene.id());
            self.last_fit = Some(fit);
            self.phase = FitPhase::Settling {
                remaining: self.settle_frames,
            };
            return Some(FitEvent::Fitted(fit));
        }

        match self.phase {
            FitPhase::Settling { remaining } if remaining <= 1 => {
                self.phase = FitPhase::Ready;
                log::info!("scene {:?} settled; ready", scene.id());
                Some(FitEvent::Ready)
            }
            FitPhase::Settling { remaining } => {
                self.phase = FitPhase::Settling {
                    remaining: remaining - 1,
                };
                None
            }
            FitPhase::Waiting | FitPhase::Ready => None,
        }
    }
}
