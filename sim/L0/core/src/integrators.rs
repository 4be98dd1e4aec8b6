//! Fixed-step integrators over a state-derivative function.
//!
//! Each integrator advances a [`Transform`] by one step `h` given a
//! derivative function `f(&Transform) -> Result<Derivative, E>`. They are
//! pure: no hidden state, no allocation, identical inputs give bit-identical
//! outputs.
//!
//! # Integration Methods
//!
//! - **Explicit Euler**: first order, reference only
//! - **Heun**: second order, reference only
//! - **RK4**: classical fourth order, the production integrator
//!
//! # Quaternion stages
//!
//! Every intermediate stage state has its orientation renormalised before the
//! derivative function sees it. The orientation rate `½ ω ⊗ q` is linear in
//! `q`, so the stage rate is scaled back by the stage norm; the tableau is
//! then exactly the classical one and the method keeps its full order.
//! Position and velocities are never rescaled.
//!
//! # Example
//!
//! ```
//! use spintoy_core::integrators::{Integrator, RungeKutta4};
//! use spintoy_types::{Derivative, Transform, SimError};
//! use nalgebra::{Point3, UnitQuaternion, Vector3};
//!
//! // Free fall, no rotation.
//! let fall = |s: &Transform| -> Result<Derivative, SimError> {
//!     Ok(Derivative {
//!         position: s.velocity,
//!         velocity: Vector3::new(0.0, -9.81, 0.0),
//!         ..Derivative::zero()
//!     })
//! };
//!
//! let start = Transform::at_rest(Point3::new(0.0, 10.0, 0.0), UnitQuaternion::identity());
//! let next = RungeKutta4::step(fall, &start, 0.1)?;
//! assert!((next.position.y - (10.0 - 0.5 * 9.81 * 0.01)).abs() < 1e-12);
//! # Ok::<(), SimError>(())
//! ```

use nalgebra::UnitQuaternion;
use spintoy_types::{Derivative, IntegrationMethod, Transform};

/// Classical RK4 tableau: stage offsets and combination weights.
const RK4_A: [f64; 3] = [0.5, 0.5, 1.0];
const RK4_B: [f64; 4] = [1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0];

/// Trait for integration methods.
pub trait Integrator {
    /// Order of accuracy of the method.
    const ORDER: usize;

    /// Advance `state` by `h` using the derivative function `f`.
    ///
    /// The returned orientation is unit-norm. Errors from `f` are returned
    /// unchanged and the state is not advanced.
    fn step<F, E>(f: F, state: &Transform, h: f64) -> Result<Transform, E>
    where
        F: FnMut(&Transform) -> Result<Derivative, E>;
}

/// Dispatch to the appropriate integrator based on method enum.
pub fn integrate_with_method<F, E>(
    method: IntegrationMethod,
    f: F,
    state: &Transform,
    h: f64,
) -> Result<Transform, E>
where
    F: FnMut(&Transform) -> Result<Derivative, E>,
{
    match method {
        IntegrationMethod::ExplicitEuler => ExplicitEuler::step(f, state, h),
        IntegrationMethod::Heun => Heun::step(f, state, h),
        IntegrationMethod::RungeKutta4 => RungeKutta4::step(f, state, h),
    }
}

/// Explicit Euler integration (first-order).
///
/// ```text
/// x(t+h) = x(t) + h f(x(t))
/// ```
pub struct ExplicitEuler;

impl Integrator for ExplicitEuler {
    const ORDER: usize = 1;

    fn step<F, E>(mut f: F, state: &Transform, h: f64) -> Result<Transform, E>
    where
        F: FnMut(&Transform) -> Result<Derivative, E>,
    {
        let k1 = f(state)?;
        Ok(advance(state, &k1, h).0)
    }
}

/// Heun's method (explicit trapezoid, second-order).
///
/// ```text
/// k1 = f(x)
/// k2 = f(x + h k1)
/// x(t+h) = x + h/2 (k1 + k2)
/// ```
pub struct Heun;

impl Integrator for Heun {
    const ORDER: usize = 2;

    fn step<F, E>(mut f: F, state: &Transform, h: f64) -> Result<Transform, E>
    where
        F: FnMut(&Transform) -> Result<Derivative, E>,
    {
        let k1 = f(state)?;
        let k2 = evaluate(&mut f, advance(state, &k1, h))?;
        Ok(advance(state, &((k1 + k2) * 0.5), h).0)
    }
}

/// Classical fourth-order Runge-Kutta.
///
/// ```text
/// k1 = f(x)
/// k2 = f(x + h/2 k1)
/// k3 = f(x + h/2 k2)
/// k4 = f(x + h k3)
/// x(t+h) = x + h/6 (k1 + 2 k2 + 2 k3 + k4)
/// ```
pub struct RungeKutta4;

impl Integrator for RungeKutta4 {
    const ORDER: usize = 4;

    fn step<F, E>(mut f: F, state: &Transform, h: f64) -> Result<Transform, E>
    where
        F: FnMut(&Transform) -> Result<Derivative, E>,
    {
        let k1 = f(state)?;
        let k2 = evaluate(&mut f, advance(state, &k1, RK4_A[0] * h))?;
        let k3 = evaluate(&mut f, advance(state, &k2, RK4_A[1] * h))?;
        let k4 = evaluate(&mut f, advance(state, &k3, RK4_A[2] * h))?;

        let slope = k1 * RK4_B[0] + k2 * RK4_B[1] + k3 * RK4_B[2] + k4 * RK4_B[3];
        Ok(advance(state, &slope, h).0)
    }
}

/// Euler-advance `state` along `rate` by `h`, renormalising the orientation.
///
/// Returns the new state and the norm the raw quaternion had before
/// renormalisation.
fn advance(state: &Transform, rate: &Derivative, h: f64) -> (Transform, f64) {
    let raw = state.orientation.quaternion() + rate.orientation * h;
    let (orientation, norm) = UnitQuaternion::new_and_get(raw);
    (
        Transform {
            position: state.position + rate.position * h,
            orientation,
            velocity: state.velocity + rate.velocity * h,
            angular_velocity: state.angular_velocity + rate.angular_velocity * h,
        },
        norm,
    )
}

/// Evaluate `f` at a renormalised stage and rescale its orientation rate to
/// the unnormalised stage quaternion.
fn evaluate<F, E>(f: &mut F, (stage, norm): (Transform, f64)) -> Result<Derivative, E>
where
    F: FnMut(&Transform) -> Result<Derivative, E>,
{
    let mut rate = f(&stage)?;
    rate.orientation *= norm;
    Ok(rate)
}
