//! Ground contact geometry.
//!
//! Each toy has a hand-derived, closed-form model of where it touches the
//! ground. A model answers two questions for a given orientation:
//!
//! 1. **Topology**: which geometric feature is lowest ([`ContactModel::detect`],
//!    or [`ContactModel::redetect`] while a feature is already loaded).
//! 2. **Kinematics**: the world offset `r` from the centre of mass to the
//!    load-bearing point and its time derivative `dr`
//!    ([`ContactModel::contact`]).
//!
//! `dr` is the rate of the *geometric* contact offset, not the velocity of
//! the material point currently touching the ground; the dynamics need both.
//!
//! | Model | Toys | States |
//! |---|---|---|
//! | [`QuadricContact`] | phi-top, rattleback | `Surface` |
//! | [`TippeTopContact`] | tippe-top | `LargeSphere`, `SmallSphere` |
//! | [`OloidContact`] | oloid | `SingleCircle(i)`, `DualCircle` |

mod oloid;
mod quadric;
mod tippe_top;

pub use oloid::OloidContact;
pub use quadric::QuadricContact;
pub use tippe_top::TippeTopContact;

use nalgebra::{UnitQuaternion, Vector3};
use spintoy_types::{ContactState, Result, Transform};

/// Load-bearing contact offset and its time derivative, world frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    /// Offset from the centre of mass to the contact point.
    pub r: Vector3<f64>,
    /// Time derivative of `r`.
    pub dr: Vector3<f64>,
}

impl ContactPoint {
    /// Height of the contact point relative to the centre of mass.
    #[must_use]
    pub fn height(&self, up: &Vector3<f64>) -> f64 {
        self.r.dot(up)
    }
}

/// Shape-specific contact geometry.
pub trait ContactModel {
    /// The contact state whose feature is lowest along `up`.
    fn detect(&self, orientation: &UnitQuaternion<f64>, up: &Vector3<f64>) -> ContactState;

    /// The contact state to carry on with, given the one currently loaded.
    ///
    /// Models with a line contact keep it until one end has clearly lifted;
    /// everything else answers as [`ContactModel::detect`].
    fn redetect(
        &self,
        _current: ContactState,
        orientation: &UnitQuaternion<f64>,
        up: &Vector3<f64>,
    ) -> ContactState {
        self.detect(orientation, up)
    }

    /// Contact offset and rate for the given contact state.
    ///
    /// Returns `SimError::SingularContact` when the geometry is degenerate
    /// (e.g. the support function denominator vanishes).
    fn contact(
        &self,
        state: ContactState,
        transform: &Transform,
        up: &Vector3<f64>,
    ) -> Result<ContactPoint>;

    /// World offsets of every ground contact point the state represents.
    ///
    /// One point for everything except a line contact, which reports both ends.
    fn support_points(
        &self,
        state: ContactState,
        orientation: &UnitQuaternion<f64>,
        up: &Vector3<f64>,
    ) -> Result<Vec<Vector3<f64>>> {
        let at_rest = Transform::at_rest(nalgebra::Point3::origin(), *orientation);
        Ok(vec![self.contact(state, &at_rest, up)?.r])
    }

    /// Offsets and rates of both ends when `state` is a line contact, so
    /// that each end can carry its own normal reaction. `None` for a point
    /// contact.
    fn line_ends(
        &self,
        _state: ContactState,
        _transform: &Transform,
        _up: &Vector3<f64>,
    ) -> Result<Option<[ContactPoint; 2]>> {
        Ok(None)
    }
}
