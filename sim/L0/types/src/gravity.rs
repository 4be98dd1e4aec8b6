//! Gravity and the world up axis.
//!
//! The ground plane is perpendicular to gravity; the up axis used by every
//! contact model is the unit vector opposite to the gravitational
//! acceleration.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gravity configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gravity {
    /// Acceleration due to gravity (m/s²).
    pub acceleration: Vector3<f64>,
}

impl Default for Gravity {
    fn default() -> Self {
        Self::earth()
    }
}

impl Gravity {
    /// Standard Earth gravity (9.81 m/s² in -Y direction).
    #[must_use]
    pub fn earth() -> Self {
        Self {
            acceleration: Vector3::new(0.0, -9.81, 0.0),
        }
    }

    /// Moon gravity (1.62 m/s² in -Y direction).
    #[must_use]
    pub fn moon() -> Self {
        Self {
            acceleration: Vector3::new(0.0, -1.62, 0.0),
        }
    }

    /// Custom gravity vector.
    #[must_use]
    pub fn custom(acceleration: Vector3<f64>) -> Self {
        Self { acceleration }
    }

    /// Magnitude `g` of the acceleration.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.acceleration.norm()
    }

    /// Unit up axis, or `None` for zero gravity (no ground plane orientation).
    #[must_use]
    pub fn up(&self) -> Option<Vector3<f64>> {
        (-self.acceleration).try_normalize(1e-12)
    }

    /// Gravitational force on a mass.
    #[must_use]
    pub fn force_on_mass(&self, mass: f64) -> Vector3<f64> {
        self.acceleration * mass
    }
}
