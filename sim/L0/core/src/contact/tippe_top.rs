//! Two-sphere tippe-top contact.
//!
//! The top is modelled as a large sphere (the body) and a small sphere (the
//! end of the stem), both centred on the body symmetry axis `e`. With `c` the
//! signed offset of the centre of mass from the body:
//!
//! ```text
//! large sphere centre  -c · e
//! small sphere centre  (R_L + R_s - c) · e
//! ```
//!
//! The lowest point of a sphere is its centre minus its radius along `u`, so
//! each candidate offset is affine in `e` and `ṙ = k · (ω×e)` for its axis
//! coefficient `k`.

use nalgebra::{UnitQuaternion, Vector3};
use spintoy_types::{ContactState, Result, SimError, Transform};

use super::{ContactModel, ContactPoint};

/// Contact model for a two-sphere tippe-top.
#[derive(Debug, Clone, PartialEq)]
pub struct TippeTopContact {
    radius_large: f64,
    radius_small: f64,
    com_offset: f64,
}

impl TippeTopContact {
    /// Create a tippe-top from its sphere radii and centre-of-mass offset.
    pub fn new(radius_large: f64, radius_small: f64, com_offset: f64) -> Result<Self> {
        if !(radius_large.is_finite() && radius_small.is_finite() && com_offset.is_finite()) {
            return Err(SimError::invalid_config("tippe-top geometry must be finite"));
        }
        if radius_large <= 0.0 || radius_small <= 0.0 {
            return Err(SimError::invalid_config("sphere radii must be positive"));
        }
        Ok(Self {
            radius_large,
            radius_small,
            com_offset,
        })
    }

    /// `(radius, axis coefficient)` of the sphere carrying `state`.
    fn sphere(&self, state: ContactState) -> Result<(f64, f64)> {
        match state {
            ContactState::LargeSphere => Ok((self.radius_large, -self.com_offset)),
            ContactState::SmallSphere => Ok((
                self.radius_small,
                self.radius_large + self.radius_small - self.com_offset,
            )),
            other => Err(SimError::invalid_config(format!(
                "tippe-top has no {other} contact"
            ))),
        }
    }

    /// Cosine of the tilt (angle between body axis and up) at which both
    /// spheres touch the ground.
    #[must_use]
    pub fn crossing_cosine(&self) -> f64 {
        (self.radius_small - self.radius_large) / (self.radius_large + self.radius_small)
    }

    fn height(&self, state: ContactState, axis_height: f64) -> f64 {
        self.sphere(state)
            .map_or(f64::INFINITY, |(radius, k)| -radius + k * axis_height)
    }
}

impl ContactModel for TippeTopContact {
    fn detect(&self, orientation: &UnitQuaternion<f64>, up: &Vector3<f64>) -> ContactState {
        let axis_height = (orientation * Vector3::y()).dot(up);
        let large = self.height(ContactState::LargeSphere, axis_height);
        let small = self.height(ContactState::SmallSphere, axis_height);
        if small < large {
            ContactState::SmallSphere
        } else {
            ContactState::LargeSphere
        }
    }

    fn contact(
        &self,
        state: ContactState,
        transform: &Transform,
        up: &Vector3<f64>,
    ) -> Result<ContactPoint> {
        let (radius, k) = self.sphere(state)?;
        let axis = transform.body_axis();
        Ok(ContactPoint {
            r: -up * radius + axis * k,
            dr: transform.angular_velocity.cross(&axis) * k,
        })
    }
}
