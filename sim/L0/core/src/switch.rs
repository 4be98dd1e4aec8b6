//! Contact-topology switching.
//!
//! When a compound toy tips far enough that a different feature becomes the
//! lowest, the load-bearing contact jumps discontinuously. The new contact
//! point generally has a non-zero normal velocity, which would violate the
//! constraint the dynamics assume. A single frictionless normal impulse at
//! the new contact cancels it:
//!
//! ```text
//! u_rel = v + ω×r
//! p     = uᵀu_rel / (1/m + (r×u)ᵀ J (r×u)),   J = I⁻¹ (world)
//! v    -= p/m · u
//! ω    -= J (r×u) · p
//! ```
//!
//! Landing on a line contact cancels the normal velocity of both ends at
//! once, with one impulse per end from the 2×2 system
//!
//! ```text
//! Kᵢⱼ = 1/m + aᵢᵀ J aⱼ,   aᵢ = rᵢ×u
//! K p = (uᵀ(v + ω×rᵢ))ᵢ
//! ```
//!
//! Switches are detected at sub-step boundaries only, so their timing is
//! resolved to the sub-step size.

use nalgebra::{Matrix2, Vector2, Vector3};
use spintoy_types::{BodyParameters, ContactState, Result, SimError, SwitchEvent, Transform};

use crate::contact::ContactModel;
use crate::dynamics::Ground;

/// Outcome of a topology check that found a new contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Switch {
    /// State after the impulse.
    pub state: Transform,
    /// What happened.
    pub event: SwitchEvent,
}

/// Re-detect the lowest feature and, if it changed, resolve the hand-off.
///
/// Returns `Ok(None)` when `current` is still the lowest feature.
pub fn resolve<M>(
    model: &M,
    params: &BodyParameters,
    ground: &Ground,
    current: ContactState,
    state: &Transform,
    time: f64,
) -> Result<Option<Switch>>
where
    M: ContactModel + ?Sized,
{
    let detected = model.redetect(current, &state.orientation, &ground.up);
    if detected == current {
        return Ok(None);
    }

    let r = model.contact(detected, state, &ground.up)?.r;
    let (after, impulse) = match model.line_ends(detected, state, &ground.up)? {
        Some([a, b]) => line_impulse(params, &ground.up, &[a.r, b.r], state)?,
        None => normal_impulse(params, &ground.up, &r, state)?,
    };

    Ok(Some(Switch {
        state: after,
        event: SwitchEvent {
            time,
            from: current,
            to: detected,
            impulse,
            normal_velocity_before: ground.up.dot(&state.point_velocity(&r)),
            normal_velocity_after: ground.up.dot(&after.point_velocity(&r)),
        },
    }))
}

/// Apply the frictionless impulse that zeroes the normal velocity of the
/// material point at offset `r`. Returns the new state and the impulse `p`.
pub fn normal_impulse(
    params: &BodyParameters,
    up: &Vector3<f64>,
    r: &Vector3<f64>,
    state: &Transform,
) -> Result<(Transform, f64)> {
    let inv_inertia = params
        .world_inertia(&state.orientation)
        .try_inverse()
        .ok_or_else(|| SimError::singular_matrix("world inertia"))?;

    let rxu = r.cross(up);
    let j_rxu = inv_inertia * rxu;
    let effective = 1.0 / params.mass + rxu.dot(&j_rxu);
    let p = up.dot(&state.point_velocity(r)) / effective;

    let mut after = *state;
    after.velocity -= up * (p / params.mass);
    after.angular_velocity -= j_rxu * p;
    Ok((after, p))
}

/// Apply the pair of frictionless impulses that zero the normal velocity of
/// both ends of a line contact. Returns the new state and the total impulse.
pub fn line_impulse(
    params: &BodyParameters,
    up: &Vector3<f64>,
    ends: &[Vector3<f64>; 2],
    state: &Transform,
) -> Result<(Transform, f64)> {
    let inv_inertia = params
        .world_inertia(&state.orientation)
        .try_inverse()
        .ok_or_else(|| SimError::singular_matrix("world inertia"))?;

    let inv_mass = 1.0 / params.mass;
    let arms = [ends[0].cross(up), ends[1].cross(up)];
    let effective = Matrix2::from_fn(|i, j| inv_mass + arms[i].dot(&(inv_inertia * arms[j])));
    let approach = Vector2::from_fn(|i, _| up.dot(&state.point_velocity(&ends[i])));
    let p = effective
        .try_inverse()
        .ok_or_else(|| SimError::singular_matrix("line contact impulse"))?
        * approach;

    let total = p[0] + p[1];
    let mut after = *state;
    after.velocity -= up * (total * inv_mass);
    after.angular_velocity -= inv_inertia * (arms[0] * p[0] + arms[1] * p[1]);
    Ok((after, total))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::contact::{OloidContact, TippeTopContact};
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, Point3, UnitQuaternion};
    use spintoy_types::{Friction, Gravity};

    fn top() -> (TippeTopContact, BodyParameters) {
        (
            TippeTopContact::new(17.0, 4.0, -2.658_396_09).unwrap(),
            BodyParameters::new(
                1.0,
                Matrix3::from_diagonal(&Vector3::new(145.5, 126.9, 145.5)),
                Friction::new(0.5, 0.3),
            ),
        )
    }

    fn ground() -> Ground {
        Ground::from_gravity(&Gravity::earth()).unwrap()
    }

    #[test]
    fn test_no_switch_when_unchanged() {
        let (model, params) = top();
        let out = resolve(
            &model,
            &params,
            &ground(),
            ContactState::LargeSphere,
            &Transform::default(),
            0.0,
        )
        .unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_switch_cancels_normal_velocity() {
        let (model, params) = top();
        let q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), -2.3);
        let state = Transform::at_rest(Point3::origin(), q)
            .with_angular_velocity(Vector3::new(0.2, 30.0, -1.5))
            .with_velocity(Vector3::new(0.4, -0.1, 0.0));

        let out = resolve(&model, &params, &ground(), ContactState::LargeSphere, &state, 1.25)
            .unwrap()
            .unwrap();
        assert_eq!(out.event.from, ContactState::LargeSphere);
        assert_eq!(out.event.to, ContactState::SmallSphere);
        assert_eq!(out.event.time, 1.25);
        assert!(out.event.normal_velocity_before.abs() > 1e-3);
        assert_relative_eq!(out.event.normal_velocity_after, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_landing_on_line_stops_both_ends() {
        let model = OloidContact::new(1.0).unwrap();
        let params = BodyParameters::new(
            1.0,
            Matrix3::from_diagonal(&Vector3::new(0.250_738, 0.476_839, 0.476_839)),
            Friction::new(0.5, 0.02),
        );
        let up = Vector3::y();
        let q = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -std::f64::consts::FRAC_PI_4);
        let state = Transform::at_rest(Point3::origin(), q)
            .with_angular_velocity(Vector3::new(0.4, 0.1, -0.7))
            .with_velocity(Vector3::new(0.0, -0.3, 0.2));

        let out = resolve(&model, &params, &ground(), ContactState::SingleCircle(0), &state, 0.5)
            .unwrap()
            .unwrap();
        assert_eq!(out.event.to, ContactState::DualCircle);
        for end in model.support_points(ContactState::DualCircle, &q, &up).unwrap() {
            assert_relative_eq!(up.dot(&out.state.point_velocity(&end)), 0.0, epsilon = 1e-10);
        }
        assert_relative_eq!(out.event.normal_velocity_after, 0.0, epsilon = 1e-10);
        assert!(out.event.normal_velocity_before < 0.0);
    }

    #[test]
    fn test_line_contact_survives_small_gap() {
        let model = OloidContact::new(1.0).unwrap();
        let (_, params) = top();
        let up = Vector3::y();
        let q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 2.5e-3)
            * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -std::f64::consts::FRAC_PI_4);
        let (_, gap) = model.lowest_gap(&q, &up);
        assert!(gap > 1e-3 && gap < model.release_tolerance(), "gap {gap}");

        let state = Transform::at_rest(Point3::origin(), q);
        let out = resolve(&model, &params, &ground(), ContactState::DualCircle, &state, 0.0).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_impulse_is_frictionless() {
        // A normal impulse changes neither tangential momentum nor the
        // angular momentum about the contact point's normal line.
        let (_, params) = top();
        let up = Vector3::y();
        let r = Vector3::new(3.0, -18.0, 1.0);
        let state = Transform::default()
            .with_velocity(Vector3::new(1.0, -2.0, 0.5))
            .with_angular_velocity(Vector3::new(0.3, 5.0, -0.2));
        let (after, p) = normal_impulse(&params, &up, &r, &state).unwrap();

        assert!(p < 0.0);
        assert_relative_eq!(after.velocity.x, state.velocity.x);
        assert_relative_eq!(after.velocity.z, state.velocity.z);

        let inertia = params.world_inertia(&state.orientation);
        let momentum = |s: &Transform| inertia * s.angular_velocity - r.cross(&(s.velocity * params.mass));
        assert_relative_eq!(momentum(&after), momentum(&state), epsilon = 1e-9);
    }
}
