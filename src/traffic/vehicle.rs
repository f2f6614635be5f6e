//! Per-vehicle motion state machine.
//!
//! A vehicle loops forever around its path family: a diagonal approach leg
//! and a straight lateral leg. Each phase has its own update function;
//! transitions are triggered by position thresholds, never by time.

use glam::{Quat, Vec3};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::path::PathFamily;
use crate::error::SitewalkError;
use crate::options::TrafficOptions;
use crate::scene::Transform;

/// Motion mode a vehicle occupies.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Diagonal motion along the tilted entry ramp.
    #[default]
    Approach,
    /// Straight lateral motion; backward traffic rejoins the ramp.
    Lateral,
    /// Straight lateral motion on families with an extra turn; both
    /// directions reset at the end.
    LateralAlt,
}

/// Which way round the loop a vehicle drives.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Down the ramp, then along the road towards +x.
    #[default]
    Forward,
    /// Along the road towards -x, then up the ramp.
    Backward,
}

impl Direction {
    /// +1 for forward traffic, -1 for backward.
    #[must_use]
    pub fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

/// Static configuration of one vehicle, as written in a site layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VehicleSpec {
    /// Id of the [`PathFamily`] this vehicle drives.
    pub path: String,
    /// Travel direction.
    #[serde(default)]
    pub direction: Direction,
    /// Position restored on every reset.
    pub initial_position: [f32; 3],
    /// Yaw before the first reset, in degrees. Defaults to the reset yaw.
    #[serde(default)]
    pub initial_yaw_deg: Option<f32>,
    /// Phase entered at construction and on every reset.
    #[serde(default)]
    pub start_phase: Phase,
}

/// What a single update did to the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Stayed in the current phase.
    Continue,
    /// Crossed a threshold and entered the given phase.
    Enter(Phase),
    /// Reached the end of the loop and returned to the start.
    Reset,
}

/// Speeds and snap headings shared by every vehicle, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Kinematics {
    approach_velocity: Vec3,
    lateral_speed: f32,
    reset_yaw: f32,
    turn_yaw: f32,
    return_yaw: f32,
    rejoin_yaw: f32,
    scale: f32,
}

impl Kinematics {
    fn from_options(traffic: &TrafficOptions) -> Self {
        let tilt = traffic.tilt_deg.to_radians();
        Self {
            approach_velocity: Vec3::new(tilt.sin(), 0.0, -tilt.cos())
                * traffic.approach_speed,
            lateral_speed: traffic.lateral_speed,
            reset_yaw: traffic.reset_yaw_deg.to_radians(),
            turn_yaw: traffic.turn_yaw_deg.to_radians(),
            return_yaw: traffic.return_yaw_deg.to_radians(),
            rejoin_yaw: traffic.rejoin_yaw_deg.to_radians(),
            scale: traffic.vehicle_scale,
        }
    }
}

/// A vehicle's identity plus its run-time position, yaw and phase.
///
/// The vehicle owns its transform; renderers read it through
/// [`Vehicle::transform`] after each update.
#[derive(Debug, Clone)]
pub struct Vehicle {
    family: PathFamily,
    direction: Direction,
    initial_position: Vec3,
    start_phase: Phase,
    kinematics: Kinematics,

    position: Vec3,
    yaw: f32,
    phase: Phase,
}

impl Vehicle {
    /// Build a vehicle, resolving its path family from `traffic`.
    ///
    /// Fails if the family is unknown, the start phase is not one the
    /// family implements, or the initial position is not finite.
    pub fn new(
        spec: &VehicleSpec,
        traffic: &TrafficOptions,
    ) -> Result<Self, SitewalkError> {
        let family = traffic.family(&spec.path).ok_or_else(|| {
            SitewalkError::InvalidVehicle(format!(
                "unknown path family '{}'",
                spec.path
            ))
        })?;
        Self::with_family(spec, family, traffic)
    }

    /// Build a vehicle on an explicit family.
    pub fn with_family(
        spec: &VehicleSpec,
        family: &PathFamily,
        traffic: &TrafficOptions,
    ) -> Result<Self, SitewalkError> {
        if !family.supports(spec.start_phase) {
            return Err(SitewalkError::InvalidVehicle(format!(
                "path family '{}' has no {:?} phase",
                family.id, spec.start_phase
            )));
        }
        let initial_position = Vec3::from_array(spec.initial_position);
        if !initial_position.is_finite() {
            return Err(SitewalkError::InvalidVehicle(format!(
                "initial position {initial_position} is not finite"
            )));
        }

        let kinematics = Kinematics::from_options(traffic);
        let yaw = spec
            .initial_yaw_deg
            .map_or(kinematics.reset_yaw, f32::to_radians);

        let vehicle = Self {
            family: family.clone(),
            direction: spec.direction,
            initial_position,
            start_phase: spec.start_phase,
            kinematics,
            position: initial_position,
            yaw,
            phase: spec.start_phase,
        };
        // Such a vehicle would reset on every update and never move.
        if vehicle.past_loop_end() {
            return Err(SitewalkError::InvalidVehicle(format!(
                "{:?} {:?} vehicle on '{}' starts at {initial_position}, \
                 already past the end of its loop",
                spec.direction, spec.start_phase, family.id
            )));
        }
        Ok(vehicle)
    }

    /// Current world position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current yaw in radians.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Travel direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Path family being driven.
    #[must_use]
    pub fn family(&self) -> &PathFamily {
        &self.family
    }

    /// Renderer-facing transform (yaw about +Y, uniform scale).
    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform::new()
            .with_position(self.position)
            .with_rotation(Quat::from_rotation_y(self.yaw))
            .with_scale(Vec3::splat(self.kinematics.scale))
    }

    /// Return to the start of the loop: initial position, reset yaw, start
    /// phase.
    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.yaw = self.kinematics.reset_yaw;
        self.phase = self.start_phase;
    }

    /// Advance by `dt` seconds.
    ///
    /// Phase transitions happen on the frame their threshold is crossed.
    /// A vehicle past the end of its loop is reset on the following
    /// update, which applies no motion.
    pub fn update(&mut self, dt: f32) -> Step {
        let step = match self.phase {
            Phase::Approach => self.update_approach(dt),
            Phase::Lateral => self.update_lateral(dt),
            Phase::LateralAlt => self.update_lateral_alt(dt),
        };
        match step {
            Step::Continue => {}
            Step::Enter(phase) => {
                log::debug!(
                    "vehicle on '{}' {:?} -> {:?} at {}",
                    self.family.id,
                    self.phase,
                    phase,
                    self.position
                );
                self.phase = phase;
            }
            Step::Reset => {
                log::debug!(
                    "vehicle on '{}' reset from {}",
                    self.family.id,
                    self.position
                );
                self.reset();
            }
        }
        step
    }

    /// True when the next update in the current phase is a reset.
    fn past_loop_end(&self) -> bool {
        let t = self.family.thresholds;
        match (self.phase, self.direction) {
            (Phase::Approach, Direction::Backward) => {
                self.position.z > t.approach_return
            }
            (Phase::Lateral | Phase::LateralAlt, Direction::Forward) => {
                self.position.x > t.lateral_end
            }
            (Phase::LateralAlt, Direction::Backward) => {
                self.position.x < t.lateral_return
            }
            (Phase::Approach, Direction::Forward)
            | (Phase::Lateral, Direction::Backward) => false,
        }
    }

    fn update_approach(&mut self, dt: f32) -> Step {
        let t = self.family.thresholds;
        let velocity = self.kinematics.approach_velocity;
        match self.direction {
            Direction::Forward => {
                self.position += velocity * dt;
                if self.position.z < t.approach_end {
                    self.yaw = self.kinematics.turn_yaw;
                    return Step::Enter(self.family.lateral_phase());
                }
            }
            Direction::Backward => {
                if self.past_loop_end() {
                    return Step::Reset;
                }
                self.position -= velocity * dt;
            }
        }
        Step::Continue
    }

    fn update_lateral(&mut self, dt: f32) -> Step {
        let t = self.family.thresholds;
        if self.past_loop_end() {
            return Step::Reset;
        }
        if self.direction == Direction::Backward {
            self.yaw = self.kinematics.return_yaw;
        }
        self.position.x +=
            self.direction.sign() * self.kinematics.lateral_speed * dt;
        if self.direction == Direction::Backward
            && self.position.x < t.lateral_return
        {
            self.yaw = self.kinematics.rejoin_yaw;
            return Step::Enter(Phase::Approach);
        }
        Step::Continue
    }

    fn update_lateral_alt(&mut self, dt: f32) -> Step {
        self.yaw = match self.direction {
            Direction::Forward => self.kinematics.turn_yaw,
            Direction::Backward => self.kinematics.return_yaw,
        };
        if self.past_loop_end() {
            return Step::Reset;
        }
        self.position.x +=
            self.direction.sign() * self.kinematics.lateral_speed * dt;
        Step::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn spec(
        path: &str,
        direction: Direction,
        initial: [f32; 3],
        start_phase: Phase,
    ) -> VehicleSpec {
        VehicleSpec {
            path: path.into(),
            direction,
            initial_position: initial,
            initial_yaw_deg: None,
            start_phase,
        }
    }

    fn run_until(
        vehicle: &mut Vehicle,
        max_steps: usize,
        mut done: impl FnMut(&Vehicle, Step) -> bool,
    ) -> usize {
        (1..=max_steps)
            .find(|_| {
                let step = vehicle.update(DT);
                done(vehicle, step)
            })
            .expect("condition not reached")
    }

    #[test]
    fn forward_car_runs_the_demo_loop() {
        let traffic = TrafficOptions::default();
        let mut car = Vehicle::new(
            &spec("a", Direction::Forward, [260.0, 0.0, -200.0], Phase::Approach),
            &traffic,
        )
        .unwrap();

        let _ = run_until(&mut car, 2000, |v, _| v.position().z < -400.0);
        assert_eq!(car.phase(), Phase::Lateral);
        assert_eq!(car.yaw(), (-90.0_f32).to_radians());

        let _ = run_until(&mut car, 2000, |v, _| v.position().x > 300.0);
        assert_eq!(car.phase(), Phase::Lateral);

        assert_eq!(car.update(DT), Step::Reset);
        assert_eq!(car.position(), Vec3::new(260.0, 0.0, -200.0));
        assert_eq!(car.yaw(), 5.0_f32.to_radians());
        assert_eq!(car.phase(), Phase::Approach);
    }

    #[test]
    fn approach_moves_along_tilted_axis() {
        let traffic = TrafficOptions::default();
        let mut car = Vehicle::new(
            &spec("a", Direction::Forward, [0.0, 0.0, 0.0], Phase::Approach),
            &traffic,
        )
        .unwrap();
        assert_eq!(car.update(1.0), Step::Continue);

        let tilt = (-5.0_f32).to_radians();
        let expected = Vec3::new(tilt.sin(), 0.0, -tilt.cos()) * 20.0;
        assert!((car.position() - expected).length() < 1e-4);
        // Depth decreases monotonically within the phase.
        let before = car.position().z;
        let _ = car.update(DT);
        assert!(car.position().z < before);
    }

    #[test]
    fn transition_snaps_yaw_on_crossing_frame() {
        let traffic = TrafficOptions::default();
        let mut car = Vehicle::new(
            &spec("a", Direction::Forward, [0.0, 0.0, -399.9], Phase::Approach),
            &traffic,
        )
        .unwrap();
        assert_eq!(car.update(DT), Step::Enter(Phase::Lateral));
        assert_eq!(car.yaw(), (-90.0_f32).to_radians());
        assert!(car.position().z < -400.0);
    }

    #[test]
    fn reset_is_idempotent() {
        let traffic = TrafficOptions::default();
        let mut car = Vehicle::new(
            &spec("a", Direction::Forward, [260.0, 0.0, -200.0], Phase::Approach),
            &traffic,
        )
        .unwrap();
        for _ in 0..100 {
            let _ = car.update(DT);
        }
        car.reset();
        let first = (car.position(), car.yaw(), car.phase());
        car.reset();
        assert_eq!(first, (car.position(), car.yaw(), car.phase()));
    }

    #[test]
    fn backward_lateral_rejoins_approach() {
        let traffic = TrafficOptions::default();
        let mut car = Vehicle::new(
            &spec("a", Direction::Backward, [300.0, 0.0, -400.0], Phase::Lateral),
            &traffic,
        )
        .unwrap();

        assert_eq!(car.update(DT), Step::Continue);
        assert_eq!(car.yaw(), 90.0_f32.to_radians());
        assert!(car.position().x < 300.0);

        let steps = run_until(&mut car, 1000, |_, step| {
            step == Step::Enter(Phase::Approach)
        });
        assert!(steps > 1);
        assert!(car.position().x < 248.0);
        assert_eq!(car.yaw(), 185.0_f32.to_radians());

        // Backward approach climbs in depth until it passes -250, then the
        // loop starts over in the configured start phase.
        let _ = run_until(&mut car, 2000, |_, step| step == Step::Reset);
        assert_eq!(car.phase(), Phase::Lateral);
        assert_eq!(car.position(), Vec3::new(300.0, 0.0, -400.0));
        assert_eq!(car.yaw(), 5.0_f32.to_radians());
    }

    #[test]
    fn backward_approach_resets_without_lateral_leg() {
        let traffic = TrafficOptions::default();
        let mut car = Vehicle::new(
            &spec("a", Direction::Backward, [250.0, 0.0, -260.0], Phase::Approach),
            &traffic,
        )
        .unwrap();
        let mut saw_lateral = false;
        let _ = run_until(&mut car, 2000, |v, step| {
            saw_lateral |= v.phase() != Phase::Approach;
            step == Step::Reset
        });
        assert!(!saw_lateral);
        assert_eq!(car.position(), Vec3::new(250.0, 0.0, -260.0));
    }

    #[test]
    fn alternate_leg_forward_turns_then_resets() {
        let traffic = TrafficOptions::default();
        let mut car = Vehicle::new(
            &spec("b", Direction::Forward, [200.0, 0.0, -390.0], Phase::Approach),
            &traffic,
        )
        .unwrap();
        let _ = run_until(&mut car, 2000, |v, _| v.phase() != Phase::Approach);
        assert_eq!(car.phase(), Phase::LateralAlt);

        let _ = run_until(&mut car, 5000, |v, _| v.position().x > 300.0);
        assert_eq!(car.yaw(), (-90.0_f32).to_radians());
        assert_eq!(car.update(DT), Step::Reset);
        assert_eq!(car.phase(), Phase::Approach);
    }

    #[test]
    fn alternate_leg_backward_runs_full_road() {
        let traffic = TrafficOptions::default();
        let mut car = Vehicle::new(
            &spec("b", Direction::Backward, [100.0, 0.0, -400.0], Phase::LateralAlt),
            &traffic,
        )
        .unwrap();
        let _ = run_until(&mut car, 1000, |v, _| v.position().x < 80.0);
        assert_eq!(car.phase(), Phase::LateralAlt);
        assert_eq!(car.yaw(), 90.0_f32.to_radians());
        assert_eq!(car.update(DT), Step::Reset);
        assert_eq!(car.position(), Vec3::new(100.0, 0.0, -400.0));
        assert_eq!(car.phase(), Phase::LateralAlt);
    }

    #[test]
    fn staggered_start_phase_is_kept_across_resets() {
        let traffic = TrafficOptions::default();
        let mut car = Vehicle::new(
            &spec("a", Direction::Forward, [295.0, 0.0, -405.0], Phase::Lateral),
            &traffic,
        )
        .unwrap();
        let _ = run_until(&mut car, 1000, |_, step| step == Step::Reset);
        assert_eq!(car.phase(), Phase::Lateral);
    }

    #[test]
    fn unsupported_start_phase_fails_at_construction() {
        let traffic = TrafficOptions::default();
        let err = Vehicle::new(
            &spec("a", Direction::Forward, [0.0; 3], Phase::LateralAlt),
            &traffic,
        )
        .unwrap_err();
        assert!(matches!(err, SitewalkError::InvalidVehicle(_)));

        let err = Vehicle::new(
            &spec("b", Direction::Forward, [0.0; 3], Phase::Lateral),
            &traffic,
        )
        .unwrap_err();
        assert!(matches!(err, SitewalkError::InvalidVehicle(_)));
    }

    #[test]
    fn start_past_loop_end_is_rejected() {
        let traffic = TrafficOptions::default();
        for bad in [
            spec("a", Direction::Forward, [350.0, 0.0, -410.0], Phase::Lateral),
            spec("a", Direction::Backward, [250.0, 0.0, -200.0], Phase::Approach),
            spec("b", Direction::Forward, [301.0, 0.0, -400.0], Phase::LateralAlt),
            spec("b", Direction::Backward, [50.0, 0.0, -400.0], Phase::LateralAlt),
        ] {
            assert!(matches!(
                Vehicle::new(&bad, &traffic),
                Err(SitewalkError::InvalidVehicle(_))
            ));
        }

        // Right on a threshold still moves before the loop closes.
        let mut car = Vehicle::new(
            &spec("a", Direction::Forward, [300.0, 0.0, -410.0], Phase::Lateral),
            &traffic,
        )
        .unwrap();
        assert_eq!(car.update(DT), Step::Continue);
        assert!(car.position().x > 300.0);
    }

    #[test]
    fn unknown_family_and_bad_position_are_rejected() {
        let traffic = TrafficOptions::default();
        assert!(Vehicle::new(
            &spec("zz", Direction::Forward, [0.0; 3], Phase::Approach),
            &traffic,
        )
        .is_err());
        assert!(Vehicle::new(
            &spec("a", Direction::Forward, [f32::NAN, 0.0, 0.0], Phase::Approach),
            &traffic,
        )
        .is_err());
    }

    #[test]
    fn transform_carries_yaw_and_scale() {
        let traffic = TrafficOptions::default();
        let car = Vehicle::new(
            &spec("a", Direction::Forward, [1.0, 2.0, 3.0], Phase::Approach),
            &traffic,
        )
        .unwrap();
        let transform = car.transform();
        assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.scale, Vec3::splat(2.0));
        let (axis, angle) = transform.rotation.to_axis_angle();
        assert!((axis - Vec3::Y).length() < 1e-5);
        assert!((angle - 5.0_f32.to_radians()).abs() < 1e-5);
    }
}
