//! Static dispatch over the contact models.

use nalgebra::{UnitQuaternion, Vector3};
use spintoy_types::{ContactState, Result, Transform};

use crate::contact::{ContactModel, ContactPoint, OloidContact, QuadricContact, TippeTopContact};

/// Contact geometry of a toy, selected at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Smooth ellipsoidal underside (phi-top, rattleback).
    Quadric(QuadricContact),
    /// Two spheres on a common axis (tippe-top).
    TippeTop(TippeTopContact),
    /// Two perpendicular circles (oloid).
    Oloid(OloidContact),
}

impl Shape {
    fn model(&self) -> &dyn ContactModel {
        match self {
            Self::Quadric(m) => m,
            Self::TippeTop(m) => m,
            Self::Oloid(m) => m,
        }
    }
}

impl ContactModel for Shape {
    fn detect(&self, orientation: &UnitQuaternion<f64>, up: &Vector3<f64>) -> ContactState {
        self.model().detect(orientation, up)
    }

    fn redetect(
        &self,
        current: ContactState,
        orientation: &UnitQuaternion<f64>,
        up: &Vector3<f64>,
    ) -> ContactState {
        self.model().redetect(current, orientation, up)
    }

    fn contact(
        &self,
        state: ContactState,
        transform: &Transform,
        up: &Vector3<f64>,
    ) -> Result<ContactPoint> {
        self.model().contact(state, transform, up)
    }

    fn support_points(
        &self,
        state: ContactState,
        orientation: &UnitQuaternion<f64>,
        up: &Vector3<f64>,
    ) -> Result<Vec<Vector3<f64>>> {
        self.model().support_points(state, orientation, up)
    }

    fn line_ends(
        &self,
        state: ContactState,
        transform: &Transform,
        up: &Vector3<f64>,
    ) -> Result<Option<[ContactPoint; 2]>> {
        self.model().line_ends(state, transform, up)
    }
}

impl From<QuadricContact> for Shape {
    fn from(model: QuadricContact) -> Self {
        Self::Quadric(model)
    }
}

impl From<TippeTopContact> for Shape {
    fn from(model: TippeTopContact) -> Self {
        Self::TippeTop(model)
    }
}

impl From<OloidContact> for Shape {
    fn from(model: OloidContact) -> Self {
        Self::Oloid(model)
    }
}
