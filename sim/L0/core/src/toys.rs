//! The toy catalogue: geometry, mass properties and canonical start poses.
//!
//! Each preset bundles a [`Shape`], its [`BodyParameters`], the pose the
//! toy is reset to, and how many sub-steps a frame is split into.
//!
//! | Toy | Contact | Regime | Sub-steps |
//! |---|---|---|---|
//! | oloid | two circles | sliding | 20 |
//! | phi-top | ellipsoid `(1, φ, 1)` | sliding | 10 |
//! | rattleback | half-ellipsoid `(φ, 1, 1)` + point masses | rolling | 50 |
//! | tippe-top | two spheres | sliding | 10 |
//!
//! Start poses are expressed with `+Y` up and rotated onto the configured
//! up axis at reset.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::str::FromStr;

use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use spintoy_types::{BodyParameters, ContactRegime, Friction, Result, SimError};

use crate::contact::{OloidContact, QuadricContact, TippeTopContact};
use crate::shape::Shape;

/// The golden ratio.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Which toy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToyKind {
    /// Convex hull of two perpendicular circles; rolls with a wobble.
    Oloid,
    /// Golden-ratio ellipsoid that rises onto its long axis when spun.
    PhiTop,
    /// Asymmetric half-ellipsoid with a preferred spin direction.
    Rattleback,
    /// Top that inverts onto its stem when spun.
    TippeTop,
}

impl ToyKind {
    /// Every toy, in catalogue order.
    pub const ALL: [Self; 4] = [Self::Oloid, Self::PhiTop, Self::Rattleback, Self::TippeTop];

    /// Scene name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Oloid => "oloid",
            Self::PhiTop => "phi-top",
            Self::Rattleback => "rattleback",
            Self::TippeTop => "tippe-top",
        }
    }
}

impl std::fmt::Display for ToyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SimError::invalid_config(format!("unknown toy '{s}'")))
    }
}

/// Linear velocity given to the toy at reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialVelocity {
    /// Centre of mass at rest (the contact slips if the toy spins).
    Rest,
    /// Centre of mass velocity `-ω×r`, so the contact point is at rest.
    NoSlip,
}

/// Canonical start of a toy, `+Y` up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestPose {
    /// Body-to-world rotation.
    pub orientation: UnitQuaternion<f64>,
    /// Angular velocity (world frame).
    pub angular_velocity: Vector3<f64>,
    /// Linear velocity rule.
    pub velocity: InitialVelocity,
}

/// A toy: geometry, mass properties, start pose and sub-stepping.
#[derive(Debug, Clone, PartialEq)]
pub struct Toy {
    kind: ToyKind,
    shape: Shape,
    params: BodyParameters,
    rest: RestPose,
    substeps: usize,
}

impl Toy {
    /// Preset for the given kind.
    pub fn from_kind(kind: ToyKind) -> Result<Self> {
        match kind {
            ToyKind::Oloid => Self::oloid(),
            ToyKind::PhiTop => Self::phi_top(),
            ToyKind::Rattleback => Self::rattleback(),
            ToyKind::TippeTop => Self::tippe_top(),
        }
    }

    /// Unit-radius oloid, resting on both circles and rolling about the
    /// contact line.
    pub fn oloid() -> Result<Self> {
        let mass = 1.0;
        let inertia = Matrix3::from_diagonal(&Vector3::new(0.250_738, 0.476_839, 0.476_839)) * mass;
        // At -π/4 about x both circles touch; the contact line runs along (1, 0, √2).
        let line = Vector3::new(1.0, 0.0, 2.0_f64.sqrt()).normalize();
        Ok(Self {
            kind: ToyKind::Oloid,
            shape: OloidContact::new(1.0)?.into(),
            params: BodyParameters::new(mass, inertia, Friction::new(0.5, 0.02)),
            rest: RestPose {
                orientation: UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_4),
                angular_velocity: line * 2.0,
                velocity: InitialVelocity::NoSlip,
            },
            substeps: 20,
        })
    }

    /// Phi-top: ellipsoid with semi-axes `(1, φ, 1)`, lying almost flat and
    /// spun fast about the vertical.
    pub fn phi_top() -> Result<Self> {
        let mass = 0.5;
        let inertia = Matrix3::from_diagonal(&Vector3::new(
            mass / 5.0 * (PHI * PHI + 1.0),
            2.0 * mass / 5.0,
            mass / 5.0 * (PHI * PHI + 1.0),
        ));
        Ok(Self {
            kind: ToyKind::PhiTop,
            shape: QuadricContact::ellipsoid(Vector3::new(1.0, PHI, 1.0), 0.0)?.into(),
            params: BodyParameters::new(mass, inertia, Friction::new(2.0, 0.3)),
            rest: RestPose {
                orientation: UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2 + 0.1),
                angular_velocity: Vector3::new(0.0, 20.0 * PI, 0.0),
                velocity: InitialVelocity::Rest,
            },
            substeps: 10,
        })
    }

    /// Rattleback: half-ellipsoid `(φ, 1, 1)` with two point masses at
    /// `±(0.5, 0, 0.5)` skewing its inertia, rolling without slip.
    pub fn rattleback() -> Result<Self> {
        let point_mass = 5.0;
        let ellipsoid_mass = 10.0;
        let mass = 2.0 * point_mass + ellipsoid_mass;

        // A solid half-ellipsoid has its centroid 3/8 below the centre.
        let com_offset = ellipsoid_mass / mass * 3.0 / 8.0;
        let com = Vector3::new(0.0, -com_offset, 0.0);
        let p = Vector3::new(0.5, 0.0, 0.5);
        let shift = |v: &Vector3<f64>| Matrix3::identity() * v.norm_squared() - v * v.transpose();

        let inertia = Matrix3::from_diagonal(&Vector3::new(
            2.0 * mass / 5.0,
            mass / 5.0 * (PHI * PHI + 1.0),
            mass / 5.0 * (PHI * PHI + 1.0),
        )) + shift(&p) * (2.0 * point_mass)
            - shift(&com) * mass;

        Ok(Self {
            kind: ToyKind::Rattleback,
            shape: QuadricContact::ellipsoid(Vector3::new(PHI, 1.0, 1.0), com_offset)?.into(),
            params: BodyParameters::new(mass, inertia, Friction::new(2.0, 0.01))
                .with_regime(ContactRegime::Rolling),
            rest: RestPose {
                orientation: UnitQuaternion::identity(),
                angular_velocity: Vector3::new(0.01, 2.0, -0.02),
                velocity: InitialVelocity::NoSlip,
            },
            substeps: 50,
        })
    }

    /// Tippe-top: large body sphere and small stem sphere, spun upright.
    pub fn tippe_top() -> Result<Self> {
        let mass = 1.0;
        let inertia = Matrix3::from_diagonal(&Vector3::new(
            mass * 12.062_612 * 12.062_612,
            mass * 11.265_862 * 11.265_862,
            mass * 12.062_862 * 12.062_612,
        ));
        Ok(Self {
            kind: ToyKind::TippeTop,
            shape: TippeTopContact::new(17.0, 4.0, -2.658_396_09)?.into(),
            params: BodyParameters::new(mass, inertia, Friction::new(0.5, 0.3)),
            rest: RestPose {
                orientation: UnitQuaternion::identity(),
                angular_velocity: Vector3::new(0.02, 70.0, -0.1),
                velocity: InitialVelocity::NoSlip,
            },
            substeps: 10,
        })
    }

    /// Replace the friction coefficients.
    #[must_use]
    pub fn with_friction(mut self, friction: Friction) -> Self {
        self.params.friction = friction;
        self
    }

    /// Replace the start pose.
    #[must_use]
    pub fn with_rest_pose(mut self, rest: RestPose) -> Self {
        self.rest = rest;
        self
    }

    /// Replace the default sub-step count.
    #[must_use]
    pub fn with_substeps(mut self, substeps: usize) -> Self {
        self.substeps = substeps;
        self
    }

    /// Which toy this is.
    #[must_use]
    pub fn kind(&self) -> ToyKind {
        self.kind
    }

    /// Contact geometry.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Mass properties and friction.
    #[must_use]
    pub fn params(&self) -> &BodyParameters {
        &self.params
    }

    /// Start pose.
    #[must_use]
    pub fn rest_pose(&self) -> &RestPose {
        &self.rest
    }

    /// Default sub-steps per frame.
    #[must_use]
    pub fn substeps(&self) -> usize {
        self.substeps
    }

    /// Validate parameters and sub-stepping.
    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        if self.substeps == 0 {
            return Err(SimError::invalid_config(format!(
                "{}: substeps must be at least 1",
                self.kind
            )));
        }
        Ok(())
    }
}
