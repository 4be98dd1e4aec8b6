//! Quadric (ellipsoid) support-function contact.
//!
//! For a body bounded by the quadric `xᵀ B x = 1` with `B = R B0 Rᵀ`, the
//! point furthest along `-u` is
//!
//! ```text
//! r_q = -B⁻¹u / √(uᵀB⁻¹u)
//! ```
//!
//! and differentiating under `Ḃ⁻¹ = [ω]ₓB⁻¹ - B⁻¹[ω]ₓ` gives, with
//! `s = -uᵀr_q`,
//!
//! ```text
//! ṙ_q = ω×r_q + B⁻¹(ω×u)/s + r_q (uᵀ(ω×r_q))/s
//! ```
//!
//! A centre of mass offset `h` below the quadric centre along the body axis
//! `e` adds `h·e` to `r` and `h·(ω×e)` to `ṙ`.

use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use spintoy_types::{ContactState, Result, SimError, Transform};

use super::{ContactModel, ContactPoint};

/// Smallest admissible `uᵀB⁻¹u`.
const MIN_SUPPORT: f64 = 1e-12;

/// Contact model for a toy whose underside is an ellipsoid.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadricContact {
    /// `B0⁻¹`, body frame.
    form_inverse: Matrix3<f64>,
    /// Distance from the centre of mass up to the quadric centre.
    com_offset: f64,
}

impl QuadricContact {
    /// Ellipsoid with the given semi-axes (body x, y, z), i.e.
    /// `B0 = diag(1/a², 1/b², 1/c²)`.
    pub fn ellipsoid(semi_axes: Vector3<f64>, com_offset: f64) -> Result<Self> {
        if semi_axes.iter().any(|&a| !a.is_finite() || a <= 0.0) {
            return Err(SimError::invalid_config(
                "ellipsoid semi-axes must be positive and finite",
            ));
        }
        if !com_offset.is_finite() {
            return Err(SimError::invalid_config("centre of mass offset must be finite"));
        }
        Ok(Self {
            form_inverse: Matrix3::from_diagonal(&semi_axes.component_mul(&semi_axes)),
            com_offset,
        })
    }

    /// General quadric from its symmetric positive definite form `B0`.
    pub fn from_form(form: Matrix3<f64>, com_offset: f64) -> Result<Self> {
        if form.symmetric_eigenvalues().iter().any(|&e| e <= 0.0) {
            return Err(SimError::invalid_config(
                "quadric form must be positive definite",
            ));
        }
        let form_inverse = form
            .try_inverse()
            .ok_or_else(|| SimError::singular_matrix("quadric form"))?;
        if !com_offset.is_finite() {
            return Err(SimError::invalid_config("centre of mass offset must be finite"));
        }
        Ok(Self {
            form_inverse,
            com_offset,
        })
    }

    /// Distance from the centre of mass up to the quadric centre.
    #[must_use]
    pub fn com_offset(&self) -> f64 {
        self.com_offset
    }

    /// `B⁻¹ = R B0⁻¹ Rᵀ` in the world frame.
    #[must_use]
    pub fn world_form_inverse(&self, orientation: &UnitQuaternion<f64>) -> Matrix3<f64> {
        let rot = orientation.to_rotation_matrix();
        rot.matrix() * self.form_inverse * rot.matrix().transpose()
    }
}

impl ContactModel for QuadricContact {
    fn detect(&self, _orientation: &UnitQuaternion<f64>, _up: &Vector3<f64>) -> ContactState {
        ContactState::Surface
    }

    fn contact(
        &self,
        _state: ContactState,
        transform: &Transform,
        up: &Vector3<f64>,
    ) -> Result<ContactPoint> {
        let b_inv = self.world_form_inverse(&transform.orientation);
        let b_inv_u = b_inv * up;
        let s_sq = up.dot(&b_inv_u);
        if s_sq.is_nan() || s_sq <= MIN_SUPPORT {
            return Err(SimError::singular_contact(format!(
                "support denominator uᵀB⁻¹u = {s_sq:e}"
            )));
        }
        let s = s_sq.sqrt();

        let omega = transform.angular_velocity;
        let r_q = -b_inv_u / s;
        let wxr = omega.cross(&r_q);
        let dr_q = wxr + b_inv * omega.cross(up) / s + r_q * (up.dot(&wxr) / s);

        let axis = transform.body_axis();
        Ok(ContactPoint {
            r: r_q + axis * self.com_offset,
            dr: dr_q + omega.cross(&axis) * self.com_offset,
        })
    }
}
