//! Frame-driven composition of camera autofit, traffic and markers.
//!
//! The [`Engine`] owns every per-frame controller and runs them once per
//! [`tick`](Engine::tick) in a fixed order: autofit, vehicles, markers.
//! Markers run last so camera-facing shells see the camera pose of the
//! same frame.

mod frame;
mod input;

pub use frame::{FrameOutput, MarkerFrame, VehicleFrame};

use crate::camera::{AutoFit, Camera, FitEvent, OrbitController};
use crate::error::SitewalkError;
use crate::marker::MarkerSet;
use crate::options::Options;
use crate::scene::layout::SiteLayout;
use crate::scene::SceneGraph;
use crate::traffic::{Step, Vehicle};
use crate::util::FrameTick;

const DEFAULT_ASPECT: f32 = 16.0 / 9.0;

/// The site walkthrough core.
///
/// Construction validates all configuration; nothing after that fails
/// except activation of an unknown marker.
#[derive(Debug)]
pub struct Engine {
    options: Options,
    camera: Camera,
    orbit: OrbitController,
    autofit: AutoFit,
    scene: Option<SceneGraph>,
    vehicles: Vec<Vehicle>,
    markers: MarkerSet,
    loading: bool,
}

impl Engine {
    /// Build the engine for `layout`. The model is not loaded yet; call
    /// [`load_scene`](Self::load_scene) once geometry is available.
    pub fn new(
        options: Options,
        layout: &SiteLayout,
    ) -> Result<Self, SitewalkError> {
        Self::build(options, layout).inspect_err(|e| {
            log::warn!("rejected site '{}': {e}", layout.name);
        })
    }

    fn build(
        options: Options,
        layout: &SiteLayout,
    ) -> Result<Self, SitewalkError> {
        options.validate()?;
        let vehicles = layout
            .vehicles
            .iter()
            .map(|spec| Vehicle::new(spec, &options.traffic))
            .collect::<Result<Vec<_>, _>>()?;
        let markers = MarkerSet::from_specs(&options.markers, &layout.markers)?;

        let camera = Camera::from_options(&options.camera, DEFAULT_ASPECT);
        let mut orbit = OrbitController::new(&options.camera);
        orbit.seed(camera.eye, camera.target);
        log::info!(
            "site '{}': {} vehicles, {} markers",
            layout.name,
            vehicles.len(),
            markers.len()
        );

        Ok(Self {
            autofit: AutoFit::new(&options.camera),
            options,
            camera,
            orbit,
            scene: None,
            vehicles,
            markers,
            loading: true,
        })
    }

    /// Hand over a freshly loaded model. It is framed on the next tick.
    pub fn load_scene(&mut self, scene: SceneGraph) {
        log::debug!(
            "scene {:?} loaded with {} meshes",
            scene.id(),
            scene.root().mesh_count()
        );
        self.scene = Some(scene);
        self.autofit.reset();
        self.loading = true;
    }

    /// Drop the current model, returning it.
    pub fn unload_scene(&mut self) -> Option<SceneGraph> {
        self.autofit.reset();
        self.loading = true;
        self.scene.take()
    }

    /// True until the loaded scene has been fitted and settled.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Update the viewport aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            #[allow(clippy::cast_precision_loss)]
            let aspect = width as f32 / height as f32;
            self.camera.aspect = aspect;
        }
    }

    /// Advance every controller by one frame.
    pub fn tick(&mut self, tick: FrameTick) -> FrameOutput {
        if let Some(FitEvent::Ready) = self.autofit.update(
            self.scene.as_ref(),
            &mut self.camera,
            &mut self.orbit,
        ) {
            self.loading = false;
        }

        for (index, vehicle) in self.vehicles.iter_mut().enumerate() {
            if vehicle.update(tick.delta) == Step::Reset {
                log::trace!("vehicle {index} looped at frame {}", tick.frame);
            }
        }

        self.markers.update(tick.elapsed, &self.camera);

        FrameOutput {
            frame: tick.frame,
            elapsed: tick.elapsed,
            loading: self.loading,
            camera: self.camera,
            vehicles: self.vehicles.iter().map(VehicleFrame::from).collect(),
            markers: self.markers.iter().map(MarkerFrame::from).collect(),
        }
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Current camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Camera autofit state.
    #[must_use]
    pub fn autofit(&self) -> &AutoFit {
        &self.autofit
    }

    /// Loaded scene, if any.
    #[must_use]
    pub fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    /// Vehicles in layout order.
    #[must_use]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// All markers.
    #[must_use]
    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::input::InputEvent;
    use crate::marker::MarkerId;
    use crate::traffic::{Phase, VehicleSpec};
    use crate::util::FrameClock;

    const DT: f32 = 1.0 / 60.0;

    fn demo() -> (Engine, SiteLayout) {
        let layout = SiteLayout::default();
        let engine = Engine::new(Options::default(), &layout).unwrap();
        (engine, layout)
    }

    fn run(engine: &mut Engine, frames: std::ops::Range<u64>) -> FrameOutput {
        frames
            .map(|frame| engine.tick(FrameTick::fixed(frame, DT)))
            .last()
            .expect("at least one frame")
    }

    #[test]
    fn loading_clears_two_frames_after_fit() {
        let (mut engine, layout) = demo();
        assert!(run(&mut engine, 0..5).loading);

        engine.load_scene(layout.to_scene_graph());
        let fitted = engine.tick(FrameTick::fixed(5, DT));
        assert!(fitted.loading);
        assert_eq!(fitted.camera.target, layout.to_scene_graph().world_bounds().center());
        assert!(engine.tick(FrameTick::fixed(6, DT)).loading);
        assert!(!engine.tick(FrameTick::fixed(7, DT)).loading);
        assert!(!engine.is_loading());

        let _ = engine.unload_scene();
        assert!(engine.is_loading());
        assert!(engine.scene().is_none());
    }

    #[test]
    fn reloading_the_same_scene_clears_loading_again() {
        let (mut engine, layout) = demo();
        engine.load_scene(layout.to_scene_graph());
        let _ = run(&mut engine, 0..5);
        assert!(!engine.is_loading());

        // Unload and hand the same graph straight back, no tick between.
        let scene = engine.unload_scene().unwrap();
        engine.load_scene(scene);
        assert!(engine.is_loading());
        let _ = run(&mut engine, 5..8);
        assert!(!engine.is_loading());

        // Loading a clone of the current scene refits too.
        let current = engine.scene().unwrap().clone();
        engine.load_scene(current);
        assert!(engine.is_loading());
        let fitted = engine.tick(FrameTick::fixed(8, DT));
        assert!(fitted.loading);
        let _ = run(&mut engine, 9..11);
        assert!(!engine.is_loading());
    }

    #[test]
    fn wall_clock_ticks_drive_the_engine() {
        let (mut engine, layout) = demo();
        engine.load_scene(layout.to_scene_graph());
        let mut clock = FrameClock::new(std::time::Duration::from_millis(50));
        let out = (0..3)
            .map(|_| {
                std::thread::sleep(std::time::Duration::from_millis(2));
                engine.tick(clock.tick())
            })
            .last()
            .unwrap();
        assert_eq!(out.frame, 2);
        assert!(out.elapsed > 0.0);
        assert!(!out.loading);
    }

    #[test]
    fn fitted_camera_sees_whole_site() {
        let (mut engine, layout) = demo();
        engine.load_scene(layout.to_scene_graph());
        let out = run(&mut engine, 0..3);
        let bounds = engine.scene().unwrap().world_bounds();
        assert!(out.camera.frustum().contains_aabb(&bounds));
    }

    #[test]
    fn vehicles_and_markers_advance_each_tick() {
        let (mut engine, _) = demo();
        let start = engine.vehicles()[0].position();
        let out = run(&mut engine, 0..60);

        assert_eq!(out.vehicles.len(), 1);
        assert_eq!(out.vehicles[0].path, "a");
        assert_eq!(out.vehicles[0].phase, Phase::Approach);
        assert!(out.vehicles[0].transform.position.z < start.z);
        assert_eq!(out.vehicles[0].transform.scale, Vec3::splat(2.0));

        assert_eq!(out.markers.len(), 13);
        let pulse = engine.markers().pulse().scale(out.elapsed);
        assert!((out.markers[0].inner.scale.x - pulse).abs() < 1e-6);
        assert!((out.markers[0].aura.scale.x - pulse * 1.2).abs() < 1e-6);
    }

    #[test]
    fn pointer_activation_toggles_marker_under_cursor() {
        let (mut engine, layout) = demo();
        engine.load_scene(layout.to_scene_graph());
        let _ = run(&mut engine, 0..3);

        let anchor = engine.markers().get(MarkerId(1)).unwrap().anchor();
        let ndc = engine.camera().build_matrix().project_point3(anchor);
        assert!(engine
            .handle_input(InputEvent::Activate { x: ndc.x, y: ndc.y })
            .unwrap());
        let out = engine.tick(FrameTick::fixed(3, DT));
        assert!(out.markers[0].revealed);

        // Empty sky hits nothing.
        assert!(!engine
            .handle_input(InputEvent::Activate { x: 0.0, y: 0.99 })
            .unwrap());
    }

    #[test]
    fn marker_reveal_round_trips_and_unknown_ids_fail() {
        let (mut engine, _) = demo();
        let id = MarkerId(13);
        assert!(engine.activate_marker(id).unwrap());
        assert!(engine.handle_input(InputEvent::ActivateMarker { id }).unwrap());
        assert!(!engine.markers().get(id).unwrap().is_revealed());
        assert!(matches!(
            engine.activate_marker(MarkerId(99)),
            Err(SitewalkError::UnknownMarker(99))
        ));
    }

    #[test]
    fn drag_and_scroll_move_the_camera() {
        let (mut engine, layout) = demo();
        engine.load_scene(layout.to_scene_graph());
        let _ = run(&mut engine, 0..3);
        let fitted = engine.camera().eye;

        let _ = engine
            .handle_input(InputEvent::Drag { dx: 40.0, dy: 0.0, pan: false })
            .unwrap();
        assert_ne!(engine.camera().eye, fitted);

        let _ = engine.handle_input(InputEvent::Scroll { delta: 1.0 }).unwrap();
        let distance = (engine.camera().eye - engine.camera().target).length();
        assert!(distance <= 200.0 + 1e-3);

        // Later ticks do not refit.
        let moved = engine.camera().eye;
        let _ = run(&mut engine, 3..10);
        assert_eq!(engine.camera().eye, moved);
    }

    #[test]
    fn construction_rejects_bad_configuration() {
        let mut layout = SiteLayout::default();
        layout.vehicles.push(VehicleSpec {
            path: "a".to_owned(),
            direction: crate::traffic::Direction::Forward,
            initial_position: [0.0; 3],
            initial_yaw_deg: None,
            start_phase: Phase::LateralAlt,
        });
        assert!(matches!(
            Engine::new(Options::default(), &layout),
            Err(SitewalkError::InvalidVehicle(_))
        ));

        let mut layout = SiteLayout::default();
        layout.markers[1].id = 1;
        assert!(matches!(
            Engine::new(Options::default(), &layout),
            Err(SitewalkError::InvalidMarker(_))
        ));

        let mut options = Options::default();
        options.camera.settle_frames = 0;
        assert!(Engine::new(options, &SiteLayout::default()).is_err());
    }

    #[test]
    fn resize_updates_aspect_and_ignores_zero() {
        let (mut engine, _) = demo();
        engine.resize(800, 400);
        assert_eq!(engine.camera().aspect, 2.0);
        engine.resize(0, 400);
        assert_eq!(engine.camera().aspect, 2.0);
    }

    #[test]
    fn frame_output_serializes_to_json() {
        let (mut engine, _) = demo();
        let out = engine.tick(FrameTick::fixed(0, DT));
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["loading"], true);
        assert_eq!(json["vehicles"][0]["phase"], "approach");
        assert_eq!(json["markers"].as_array().unwrap().len(), 13);
    }
}
