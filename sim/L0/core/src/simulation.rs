//! Frame driver for one toy.
//!
//! [`Simulation`] owns the toy's [`Transform`] and [`ContactState`]. Each
//! call to [`Simulation::update`] splits the frame time into `N` equal
//! sub-steps; every sub-step
//!
//! 1. re-detects the lowest contact feature and applies the hand-off
//!    impulse if it changed,
//! 2. advances the state with the configured integrator over the dynamics,
//! 3. validates the result, resetting the toy if it diverged.
//!
//! Numerical trouble never escapes `update`: singular geometry skips the
//! sub-step, divergence resets, and both are counted in [`Warnings`]. A toy
//! stuck on singular geometry for [`MAX_SKIPPED_SUBSTEPS`] sub-steps in a
//! row is treated as diverged.

use std::f64::consts::PI;

use nalgebra::{Point3, UnitQuaternion, Vector3};
use spintoy_types::convert::RenderTransform;
use spintoy_types::{
    ContactState, Result, SimError, SimulationConfig, SwitchEvent, Transform,
};

use crate::contact::ContactModel;
use crate::dynamics::{self, Ground};
use crate::energy::Energy;
use crate::integrators::integrate_with_method;
use crate::switch;
use crate::telemetry::AngularVelocityTrace;
use crate::toys::{InitialVelocity, Toy};
use crate::validation::check_transform;
use crate::warning::{Warning, Warnings};

/// Consecutive skipped sub-steps after which the toy is reset (or paused).
pub const MAX_SKIPPED_SUBSTEPS: u32 = 1000;

/// Simulation of a single toy on the ground plane.
///
/// # Example
///
/// ```
/// use spintoy_core::{Simulation, Toy};
/// use spintoy_types::SimulationConfig;
///
/// let mut sim = Simulation::new(Toy::tippe_top()?, SimulationConfig::default())?;
/// sim.set_simulating(true);
/// for _ in 0..10 {
///     sim.update(1.0 / 60.0);
/// }
/// assert!((sim.rotation().norm() - 1.0).abs() < 1e-6);
/// assert!(sim.angular_velocity().norm() > 60.0);
/// # Ok::<(), spintoy_types::SimError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    toy: Toy,
    config: SimulationConfig,
    ground: Ground,
    substeps: usize,
    initial: (Transform, ContactState),

    state: Transform,
    contact: ContactState,
    simulating: bool,
    time: f64,
    switches: u64,
    last_switch: Option<SwitchEvent>,
    skipped: u32,
    telemetry: AngularVelocityTrace,
    warnings: Warnings,
}

impl Simulation {
    /// Create a simulation, validating the toy and configuration, and put
    /// the toy in its start pose. The simulation starts paused.
    pub fn new(toy: Toy, config: SimulationConfig) -> Result<Self> {
        toy.validate()?;
        config.validate()?;
        let ground = Ground::from_gravity(&config.gravity)?;
        let substeps = config.substeps.unwrap_or_else(|| toy.substeps());
        let initial = start_state(&toy, &ground)?;
        dynamics::derivative(toy.shape(), toy.params(), &ground, initial.1, &initial.0)?;

        let telemetry = AngularVelocityTrace::new(config.telemetry_capacity);
        Ok(Self {
            toy,
            config,
            ground,
            substeps,
            initial,
            state: initial.0,
            contact: initial.1,
            simulating: false,
            time: 0.0,
            switches: 0,
            last_switch: None,
            skipped: 0,
            telemetry,
            warnings: Warnings::default(),
        })
    }

    /// Advance by one frame of `dt` seconds.
    ///
    /// No-op while paused or for `dt == 0`. Negative or non-finite `dt` is
    /// ignored with a [`Warning::BadTimestep`].
    pub fn update(&mut self, dt: f64) {
        if !self.simulating {
            return;
        }
        if !dt.is_finite() || dt < 0.0 {
            let detail = SimError::InvalidTimestep(dt).to_string();
            self.warnings.record(Warning::BadTimestep, self.time, &detail);
            return;
        }
        if dt == 0.0 {
            return;
        }

        #[allow(clippy::cast_precision_loss)]
        let h = dt / self.substeps as f64;
        for _ in 0..self.substeps {
            if !self.substep(h) {
                break;
            }
        }
        self.telemetry.push(self.time, self.state.angular_velocity);
    }

    /// One sub-step. Returns `false` when the frame must stop.
    fn substep(&mut self, h: f64) -> bool {
        match switch::resolve(
            self.toy.shape(),
            self.toy.params(),
            &self.ground,
            self.contact,
            &self.state,
            self.time,
        ) {
            Ok(Some(hand_off)) => {
                let event = hand_off.event;
                tracing::debug!(
                    toy = %self.toy.kind(),
                    from = %event.from,
                    to = %event.to,
                    impulse = event.impulse,
                    time = event.time,
                    "contact topology switch"
                );
                self.state = hand_off.state;
                self.contact = event.to;
                self.switches += 1;
                self.last_switch = Some(event);
            }
            Ok(None) => {}
            Err(err) => return self.skip(&err),
        }

        let (shape, params, ground, contact) =
            (self.toy.shape(), self.toy.params(), &self.ground, self.contact);
        let next = integrate_with_method(
            self.config.integration,
            |s: &Transform| dynamics::derivative(shape, params, ground, contact, s),
            &self.state,
            h,
        );

        match next {
            Ok(next) => {
                if let Some(bad) = check_transform(&next) {
                    self.abandon(&format!("non-finite {bad}"));
                    return false;
                }
                self.state = next;
                self.time += h;
                self.skipped = 0;
                true
            }
            Err(err) => self.skip(&err),
        }
    }

    /// Record a skipped sub-step. Returns `false` once too many have been
    /// skipped in a row and the toy was abandoned.
    fn skip(&mut self, err: &SimError) -> bool {
        self.record_error(err);
        self.skipped += 1;
        if self.skipped < MAX_SKIPPED_SUBSTEPS {
            return true;
        }
        let detail = format!("stuck after {} skipped sub-steps: {err}", self.skipped);
        self.abandon(&detail);
        false
    }

    fn record_error(&mut self, err: &SimError) {
        let warning = match err {
            SimError::SingularContact { .. } => Warning::SingularContact,
            SimError::SingularMatrix { .. } => Warning::SingularMatrix,
            _ => Warning::BadState,
        };
        self.warnings.record(warning, self.time, &err.to_string());
    }

    /// Reset the toy, or pause it when auto-reset is off.
    fn abandon(&mut self, detail: &str) {
        let time = self.time;
        if self.config.auto_reset {
            self.reset();
        } else {
            self.simulating = false;
            self.skipped = 0;
        }
        // Recorded after the reset, which clears warnings.
        self.warnings.record(Warning::BadState, time, detail);
    }

    /// Put the toy back into its start pose and clear time, switch count,
    /// telemetry and warnings. The simulating flag is kept.
    pub fn reset(&mut self) {
        let (state, contact) = self.initial;
        self.state = state;
        self.contact = contact;
        self.time = 0.0;
        self.switches = 0;
        self.last_switch = None;
        self.skipped = 0;
        self.telemetry.clear();
        self.warnings.clear();
    }

    /// Add `delta` to the angular velocity (e.g. a user flick).
    pub fn apply_angular_acceleration(&mut self, delta: Vector3<f64>) {
        self.state.angular_velocity += delta;
    }

    /// Replace the state and re-detect the contact feature.
    pub fn set_transform(&mut self, state: Transform) -> Result<()> {
        if let Some(bad) = check_transform(&state) {
            return Err(SimError::diverged(format!("non-finite {bad}")));
        }
        self.contact = self.toy.shape().detect(&state.orientation, &self.ground.up);
        self.state = state;
        Ok(())
    }

    /// Pause or resume.
    pub fn set_simulating(&mut self, simulating: bool) {
        self.simulating = simulating;
    }

    /// Flip between paused and running.
    pub fn toggle_simulating(&mut self) {
        self.simulating = !self.simulating;
    }

    /// Whether `update` advances the toy.
    #[must_use]
    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    /// Centre of mass.
    #[must_use]
    pub fn position(&self) -> Point3<f64> {
        self.state.position
    }

    /// Body-to-world rotation.
    #[must_use]
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.state.orientation
    }

    /// Angular velocity (world frame).
    #[must_use]
    pub fn angular_velocity(&self) -> Vector3<f64> {
        self.state.angular_velocity
    }

    /// Linear velocity of the centre of mass.
    #[must_use]
    pub fn velocity(&self) -> Vector3<f64> {
        self.state.velocity
    }

    /// The full state.
    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.state
    }

    /// Single-precision pose for a renderer.
    #[must_use]
    pub fn render_transform(&self) -> RenderTransform {
        RenderTransform::from(&self.state)
    }

    /// Active contact feature.
    #[must_use]
    pub fn contact_state(&self) -> ContactState {
        self.contact
    }

    /// World positions of the current ground contact points.
    pub fn contact_points(&self) -> Result<Vec<Point3<f64>>> {
        let offsets =
            self.toy
                .shape()
                .support_points(self.contact, &self.state.orientation, &self.ground.up)?;
        Ok(offsets.into_iter().map(|r| self.state.position + r).collect())
    }

    /// Number of topology switches since the last reset.
    #[must_use]
    pub fn topology_switches(&self) -> u64 {
        self.switches
    }

    /// The most recent topology switch since the last reset.
    #[must_use]
    pub fn last_switch(&self) -> Option<&SwitchEvent> {
        self.last_switch.as_ref()
    }

    /// Simulated time since the last reset.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Current mechanical energy.
    #[must_use]
    pub fn energy(&self) -> Energy {
        Energy::of(self.toy.params(), &self.config.gravity, &self.state)
    }

    /// Angular-velocity samples, one per frame.
    #[must_use]
    pub fn telemetry(&self) -> &AngularVelocityTrace {
        &self.telemetry
    }

    /// Warning counters.
    #[must_use]
    pub fn warnings(&self) -> &Warnings {
        &self.warnings
    }

    /// Occurrences of one warning since the last reset.
    #[must_use]
    pub fn warning_count(&self, warning: Warning) -> u32 {
        self.warnings.count(warning)
    }

    /// The toy being simulated.
    #[must_use]
    pub fn toy(&self) -> &Toy {
        &self.toy
    }

    /// Sub-steps per frame in effect.
    #[must_use]
    pub fn substeps(&self) -> usize {
        self.substeps
    }

    /// The ground plane.
    #[must_use]
    pub fn ground(&self) -> &Ground {
        &self.ground
    }
}

/// Start pose of `toy` on `ground`: rest pose rotated onto the up axis,
/// contact detected, centre of mass lifted so the contact touches the
/// plane, and the linear velocity set by the toy's rule.
fn start_state(toy: &Toy, ground: &Ground) -> Result<(Transform, ContactState)> {
    let up = ground.up;
    let align = UnitQuaternion::rotation_between(&Vector3::y(), &up)
        .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI));

    let rest = toy.rest_pose();
    let orientation = align * rest.orientation;
    let omega = align * rest.angular_velocity;

    let contact = toy.shape().detect(&orientation, &up);
    let probe = Transform::at_rest(Point3::origin(), orientation).with_angular_velocity(omega);
    let r = toy.shape().contact(contact, &probe, &up)?.r;

    let velocity = match rest.velocity {
        InitialVelocity::Rest => Vector3::zeros(),
        InitialVelocity::NoSlip => -omega.cross(&r),
    };
    let position = Point3::from(-up * r.dot(&up));

    Ok((Transform::new(position, orientation, velocity, omega), contact))
}
