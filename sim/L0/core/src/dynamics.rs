//! Newton-Euler dynamics with the normal force eliminated in closed form.
//!
//! The toy is a single rigid body touching the ground at one point. With
//! `F` the ground reaction, `u` the up axis and `g` the gravity magnitude:
//!
//! ```text
//! m v̇            = F - m g u
//! I ω̇ + ω×(Iω)  = r × F + τ_roll
//! ```
//!
//! The reaction is split into a normal part `λu` and a tangential part. The
//! contact may never leave the ground, `uᵀ(v + ω×r) = 0`; differentiating
//! gives `λ` as an affine function of `ω̇`, which is substituted back so that
//! a single 3×3 solve yields `ω̇`. No constraint stabilisation is needed.
//!
//! # Regimes
//!
//! - [`ContactRegime::Sliding`]: tangential force is viscous slip friction
//!   `-µ_s (v + ω×r)`.
//! - [`ContactRegime::Rolling`]: the contact point has zero velocity; the
//!   full reaction is eliminated.
//!
//! Both add a rolling-resistance torque `-µ_r |r| λ ω̂`.
//!
//! # Line contact
//!
//! When the model reports both ends of a line contact, the sliding regime
//! keeps one normal reaction per end so that neither end drifts off the
//! ground; the 3×3 solve becomes a 2×2 solve for the two reactions. If one
//! end would have to be pulled down, it carries no load and the other end
//! is treated as a point contact. The rolling regime always uses the single
//! nominal contact point.

use nalgebra::{Matrix2, Matrix3, Point3, Vector2, Vector3};
use spintoy_types::{
    BodyParameters, ContactRegime, ContactState, Derivative, Gravity, Result, SimError, Transform,
};

use crate::contact::{ContactModel, ContactPoint};
use crate::validation::MIN_VAL;

/// The ground plane: its unit normal and the gravity magnitude along it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ground {
    /// Unit up axis (opposite to gravity).
    pub up: Vector3<f64>,
    /// Gravity magnitude `g`.
    pub gravity: f64,
}

impl Ground {
    /// Ground plane perpendicular to the given gravity.
    pub fn from_gravity(gravity: &Gravity) -> Result<Self> {
        let up = gravity
            .up()
            .ok_or_else(|| SimError::invalid_config("zero gravity defines no ground plane"))?;
        Ok(Self {
            up,
            gravity: gravity.magnitude(),
        })
    }

    /// Height of a point above the ground plane through the origin.
    #[must_use]
    pub fn height(&self, p: &Point3<f64>) -> f64 {
        p.coords.dot(&self.up)
    }
}

/// Full result of one dynamics evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// State derivative.
    pub derivative: Derivative,
    /// Normal reaction `λ` (positive when the ground pushes up).
    pub normal_force: f64,
    /// Contact point used.
    pub contact: ContactPoint,
}

/// State derivative of a toy in the given contact state.
pub fn derivative<M>(
    model: &M,
    params: &BodyParameters,
    ground: &Ground,
    contact: ContactState,
    state: &Transform,
) -> Result<Derivative>
where
    M: ContactModel + ?Sized,
{
    solve(model, params, ground, contact, state).map(|s| s.derivative)
}

/// Evaluate the dynamics, returning the derivative together with the normal
/// reaction.
pub fn solve<M>(
    model: &M,
    params: &BodyParameters,
    ground: &Ground,
    contact: ContactState,
    state: &Transform,
) -> Result<Solution>
where
    M: ContactModel + ?Sized,
{
    let point = model.contact(contact, state, &ground.up)?;
    let inertia = params.world_inertia(&state.orientation);

    let (angular, linear, normal_force) = match params.regime {
        ContactRegime::Sliding => match model.line_ends(contact, state, &ground.up)? {
            Some(ends) => sliding_line(params, ground, &inertia, &point, ends, state)?,
            None => sliding(params, ground, &inertia, &point, state)?,
        },
        ContactRegime::Rolling => rolling(params, ground, &inertia, &point, state)?,
    };

    Ok(Solution {
        derivative: Derivative {
            position: state.velocity,
            orientation: Derivative::orientation_rate(
                &state.angular_velocity,
                state.orientation.quaternion(),
            ),
            velocity: linear,
            angular_velocity: angular,
        },
        normal_force,
        contact: point,
    })
}

/// Unit spin axis, zero when not spinning.
fn spin_axis(omega: &Vector3<f64>) -> Vector3<f64> {
    omega.try_normalize(MIN_VAL).unwrap_or_else(Vector3::zeros)
}

/// Slip friction regime. Returns `(ω̇, v̇, λ)`.
///
/// ```text
/// F  = µ_s (v + ω×r)
/// W  = r×u - µ_r |r| ω̂
/// S  = -ω×(Iω) - r×F
/// (I + m W (r×u)ᵀ) ω̇ = S + m W (g - uᵀ(ω×ṙ))
/// λ  = m (g - uᵀ(ω̇×r) - uᵀ(ω×ṙ))
/// v̇  = (λu - m g u - F) / m
/// ```
fn sliding(
    params: &BodyParameters,
    ground: &Ground,
    inertia: &Matrix3<f64>,
    point: &ContactPoint,
    state: &Transform,
) -> Result<(Vector3<f64>, Vector3<f64>, f64)> {
    let m = params.mass;
    let g = ground.gravity;
    let u = &ground.up;
    let omega = &state.angular_velocity;
    let ContactPoint { r, dr } = point;

    let rxu = r.cross(u);
    let slip = state.point_velocity(r) * params.friction.slide;
    let lever = rxu - spin_axis(omega) * (params.friction.roll * r.norm());
    let gyro = omega.cross(&(inertia * omega));
    let s = -gyro - r.cross(&slip);
    let u_wxdr = u.dot(&omega.cross(dr));

    let system = inertia + lever * rxu.transpose() * m;
    let solver = system
        .try_inverse()
        .ok_or_else(|| SimError::singular_matrix("sliding contact constraint"))?;

    let d_omega = solver * (s + lever * (m * (g - u_wxdr)));
    let normal = m * (g - u.dot(&d_omega.cross(r)) - u_wxdr);
    let d_velocity = (u * (normal - m * g) - slip) / m;

    Ok((d_omega, d_velocity, normal))
}

/// Slip friction regime on a line contact. Returns `(ω̇, v̇, λ₁ + λ₂)`.
///
/// `r` is the nominal contact point, `rᵢ` the ends, `J = I⁻¹`:
///
/// ```text
/// aᵢ = rᵢ×u,   Wᵢ = aᵢ - µ_r |r| ω̂
/// I ω̇ = S + λ₁ W₁ + λ₂ W₂
/// (λ₁ + λ₂)/m + aᵢᵀ J (S + λ₁ W₁ + λ₂ W₂) = g - uᵀ(ω×ṙᵢ)
/// ```
fn sliding_line(
    params: &BodyParameters,
    ground: &Ground,
    inertia: &Matrix3<f64>,
    point: &ContactPoint,
    ends: [ContactPoint; 2],
    state: &Transform,
) -> Result<(Vector3<f64>, Vector3<f64>, f64)> {
    let m = params.mass;
    let g = ground.gravity;
    let u = &ground.up;
    let omega = &state.angular_velocity;
    let r = &point.r;

    let slip = state.point_velocity(r) * params.friction.slide;
    let resistance = spin_axis(omega) * (params.friction.roll * r.norm());
    let s = -omega.cross(&(inertia * omega)) - r.cross(&slip);
    let solver = inertia
        .try_inverse()
        .ok_or_else(|| SimError::singular_matrix("world inertia"))?;

    let arms = ends.map(|e| e.r.cross(u));
    let levers = arms.map(|a| a - resistance);
    let free = solver * s;
    let system = Matrix2::from_fn(|i, j| 1.0 / m + arms[i].dot(&(solver * levers[j])));
    let rhs = Vector2::from_fn(|i, _| {
        g - u.dot(&omega.cross(&ends[i].dr)) - arms[i].dot(&free)
    });
    let lambda = system
        .try_inverse()
        .ok_or_else(|| SimError::singular_matrix("line contact constraint"))?
        * rhs;

    if lambda[0].min(lambda[1]) < 0.0 {
        let loaded = if lambda[0] >= lambda[1] { &ends[0] } else { &ends[1] };
        return sliding(params, ground, inertia, loaded, state);
    }

    let normal = lambda[0] + lambda[1];
    let d_omega = solver * (s + levers[0] * lambda[0] + levers[1] * lambda[1]);
    let d_velocity = (u * (normal - m * g) - slip) / m;

    Ok((d_omega, d_velocity, normal))
}

/// Rolling (no-slip) regime. Returns `(ω̇, v̇, λ)`.
///
/// ```text
/// k  = µ_r |r| ω̂
/// (I + m(|r|²E - r rᵀ) - m k (r×u)ᵀ) ω̇
///     = m g (r×u) - ω×(Iω) - m r×(ω×ṙ) - m k (g - uᵀ(ω×ṙ))
/// v̇  = -ω̇×r - ω×ṙ
/// ```
fn rolling(
    params: &BodyParameters,
    ground: &Ground,
    inertia: &Matrix3<f64>,
    point: &ContactPoint,
    state: &Transform,
) -> Result<(Vector3<f64>, Vector3<f64>, f64)> {
    let m = params.mass;
    let g = ground.gravity;
    let u = &ground.up;
    let omega = &state.angular_velocity;
    let ContactPoint { r, dr } = point;

    let rxu = r.cross(u);
    let resistance = spin_axis(omega) * (params.friction.roll * r.norm());
    let wxdr = omega.cross(dr);
    let u_wxdr = u.dot(&wxdr);

    let arm = Matrix3::identity() * r.norm_squared() - r * r.transpose();
    let system = inertia + arm * m - resistance * rxu.transpose() * m;
    let solver = system
        .try_inverse()
        .ok_or_else(|| SimError::singular_matrix("rolling contact constraint"))?;

    let rhs = rxu * (m * g)
        - omega.cross(&(inertia * omega))
        - r.cross(&wxdr) * m
        - resistance * (m * (g - u_wxdr));
    let d_omega = solver * rhs;
    let d_velocity = -d_omega.cross(r) - wxdr;
    let normal = m * (g + u.dot(&d_velocity));

    Ok((d_omega, d_velocity, normal))
}
