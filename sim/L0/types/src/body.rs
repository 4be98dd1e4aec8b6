//! Rigid body state and parameter types.
//!
//! [`Transform`] is the per-step snapshot of a toy (pose plus velocities),
//! [`Derivative`] is its time rate, and [`BodyParameters`] holds the
//! immutable mass properties and friction coefficients of a toy.
//!
//! # Frames
//!
//! Every vector here is expressed in the **world** frame, angular velocity
//! included. The orientation maps body coordinates to world coordinates, so
//! the world inertia is `R · I_body · Rᵀ` and the orientation rate is
//! `½ ω ⊗ q`.

use std::ops::{Add, Mul};

use nalgebra::{Matrix3, Point3, Quaternion, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::contact::ContactRegime;

/// Pose and velocities of a rigid body at one instant.
///
/// # Example
///
/// ```
/// use spintoy_types::Transform;
/// use nalgebra::{Point3, UnitQuaternion, Vector3};
///
/// let state = Transform::at_rest(Point3::new(0.0, 1.0, 0.0), UnitQuaternion::identity())
///     .with_angular_velocity(Vector3::new(0.0, 10.0, 0.0));
///
/// // A point one unit below the centre of mass does not move for a pure spin
/// // about the vertical axis.
/// let v = state.point_velocity(&Vector3::new(0.0, -1.0, 0.0));
/// assert!(v.norm() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform {
    /// Centre of mass in world coordinates.
    pub position: Point3<f64>,
    /// Body-to-world rotation.
    pub orientation: UnitQuaternion<f64>,
    /// Linear velocity of the centre of mass.
    pub velocity: Vector3<f64>,
    /// Angular velocity (world frame).
    pub angular_velocity: Vector3<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::at_rest(Point3::origin(), UnitQuaternion::identity())
    }
}

impl Transform {
    /// Create a transform from all four components.
    #[must_use]
    pub fn new(
        position: Point3<f64>,
        orientation: UnitQuaternion<f64>,
        velocity: Vector3<f64>,
        angular_velocity: Vector3<f64>,
    ) -> Self {
        Self {
            position,
            orientation,
            velocity,
            angular_velocity,
        }
    }

    /// Create a motionless transform.
    #[must_use]
    pub fn at_rest(position: Point3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Self::new(position, orientation, Vector3::zeros(), Vector3::zeros())
    }

    /// Replace the linear velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.velocity = velocity;
        self
    }

    /// Replace the angular velocity.
    #[must_use]
    pub fn with_angular_velocity(mut self, angular_velocity: Vector3<f64>) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Velocity of a material point at world offset `r` from the centre of mass.
    #[must_use]
    pub fn point_velocity(&self, r: &Vector3<f64>) -> Vector3<f64> {
        self.velocity + self.angular_velocity.cross(r)
    }

    /// Rotate a body-frame vector into the world frame.
    #[must_use]
    pub fn to_world(&self, body: &Vector3<f64>) -> Vector3<f64> {
        self.orientation * body
    }

    /// The body symmetry axis (`+Y` in body coordinates) in world coordinates.
    #[must_use]
    pub fn body_axis(&self) -> Vector3<f64> {
        self.orientation * Vector3::y()
    }

    /// Rotation matrix of the orientation.
    #[must_use]
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.orientation.to_rotation_matrix().into_inner()
    }

    /// All thirteen scalar components, in a fixed order.
    ///
    /// Position, quaternion `(w, i, j, k)`, velocity, angular velocity.
    #[must_use]
    pub fn components(&self) -> [f64; 13] {
        let q = self.orientation.quaternion();
        [
            self.position.x,
            self.position.y,
            self.position.z,
            q.w,
            q.i,
            q.j,
            q.k,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
            self.angular_velocity.x,
            self.angular_velocity.y,
            self.angular_velocity.z,
        ]
    }
}

/// Time derivative of a [`Transform`].
///
/// The orientation rate is a general (non-unit) quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Derivative {
    /// Rate of the centre of mass (the linear velocity).
    pub position: Vector3<f64>,
    /// Quaternion rate `½ ω ⊗ q`.
    pub orientation: Quaternion<f64>,
    /// Linear acceleration.
    pub velocity: Vector3<f64>,
    /// Angular acceleration (world frame).
    pub angular_velocity: Vector3<f64>,
}

impl Default for Derivative {
    fn default() -> Self {
        Self::zero()
    }
}

impl Derivative {
    /// The zero rate.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            position: Vector3::zeros(),
            orientation: Quaternion::new(0.0, 0.0, 0.0, 0.0),
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
        }
    }

    /// Orientation rate `½ ω ⊗ q` for a world-frame angular velocity.
    #[must_use]
    pub fn orientation_rate(
        angular_velocity: &Vector3<f64>,
        orientation: &Quaternion<f64>,
    ) -> Quaternion<f64> {
        Quaternion::from_imag(*angular_velocity) * orientation * 0.5
    }
}

impl Add for Derivative {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            position: self.position + rhs.position,
            orientation: self.orientation + rhs.orientation,
            velocity: self.velocity + rhs.velocity,
            angular_velocity: self.angular_velocity + rhs.angular_velocity,
        }
    }
}

impl Mul<f64> for Derivative {
    type Output = Self;

    fn mul(self, s: f64) -> Self {
        Self {
            position: self.position * s,
            orientation: self.orientation * s,
            velocity: self.velocity * s,
            angular_velocity: self.angular_velocity * s,
        }
    }
}

/// Coulomb-style friction coefficients at the ground contact.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Friction {
    /// Slip friction: force per unit contact slip velocity.
    pub slide: f64,
    /// Rolling/spin friction: torque per unit normal force and lever arm.
    pub roll: f64,
}

impl Default for Friction {
    fn default() -> Self {
        Self::new(0.5, 0.1)
    }
}

impl Friction {
    /// Create friction coefficients.
    #[must_use]
    pub const fn new(slide: f64, roll: f64) -> Self {
        Self { slide, roll }
    }

    /// No friction at all (energy-conserving contact).
    #[must_use]
    pub const fn frictionless() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Whether both coefficients are zero.
    #[must_use]
    pub fn is_frictionless(&self) -> bool {
        self.slide == 0.0 && self.roll == 0.0
    }
}

/// Immutable mass properties and contact coefficients of a toy.
///
/// # Example
///
/// ```
/// use spintoy_types::{BodyParameters, ContactRegime, Friction};
/// use nalgebra::Matrix3;
///
/// let params = BodyParameters::new(1.0, Matrix3::identity() * 0.4, Friction::new(0.5, 0.1))
///     .with_regime(ContactRegime::Rolling);
/// assert!(params.validate().is_ok());
///
/// let broken = BodyParameters::new(0.0, Matrix3::identity(), Friction::default());
/// assert!(broken.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyParameters {
    /// Total mass.
    pub mass: f64,
    /// Inertia tensor about the centre of mass, body frame.
    pub inertia: Matrix3<f64>,
    /// Friction at the ground contact.
    pub friction: Friction,
    /// How the contact constraint is eliminated.
    pub regime: ContactRegime,
}

impl BodyParameters {
    /// Create sliding-contact parameters.
    #[must_use]
    pub fn new(mass: f64, inertia: Matrix3<f64>, friction: Friction) -> Self {
        Self {
            mass,
            inertia,
            friction,
            regime: ContactRegime::Sliding,
        }
    }

    /// Set the contact regime.
    #[must_use]
    pub fn with_regime(mut self, regime: ContactRegime) -> Self {
        self.regime = regime;
        self
    }

    /// Replace the friction coefficients.
    #[must_use]
    pub fn with_friction(mut self, friction: Friction) -> Self {
        self.friction = friction;
        self
    }

    /// Inertia tensor in the world frame for the given orientation.
    #[must_use]
    pub fn world_inertia(&self, orientation: &UnitQuaternion<f64>) -> Matrix3<f64> {
        let rot = orientation.to_rotation_matrix();
        rot.matrix() * self.inertia * rot.matrix().transpose()
    }

    /// Validate the parameters.
    ///
    /// Mass must be positive and finite, the inertia tensor symmetric and
    /// positive definite, friction coefficients non-negative.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(crate::SimError::invalid_mass(format!(
                "mass must be positive and finite, got {}",
                self.mass
            )));
        }

        if !self.inertia.iter().all(|x| x.is_finite()) {
            return Err(crate::SimError::invalid_mass(
                "inertia tensor must be finite",
            ));
        }

        let asymmetry = (self.inertia - self.inertia.transpose()).amax();
        if asymmetry > 1e-9 * self.inertia.amax().max(1.0) {
            return Err(crate::SimError::invalid_mass(
                "inertia tensor must be symmetric",
            ));
        }

        let eigenvalues = self.inertia.symmetric_eigenvalues();
        if eigenvalues.iter().any(|&e| e <= 1e-12) {
            return Err(crate::SimError::invalid_mass(
                "inertia tensor must be positive definite",
            ));
        }

        let Friction { slide, roll } = self.friction;
        if !slide.is_finite() || !roll.is_finite() || slide < 0.0 || roll < 0.0 {
            return Err(crate::SimError::invalid_config(
                "friction coefficients must be finite and non-negative",
            ));
        }

        Ok(())
    }
}
