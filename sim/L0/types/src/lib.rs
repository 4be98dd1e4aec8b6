//! Core types for spinning-toy contact simulation.
//!
//! This crate provides the plain data shared by the solver and its callers:
//!
//! - [`Transform`] - Position, orientation and velocities of a toy
//! - [`Derivative`] - Time rate of a [`Transform`]
//! - [`BodyParameters`] - Mass, inertia and friction
//! - [`ContactState`] - Which feature of the toy touches the ground
//! - [`SimulationConfig`] - Gravity, integrator, sub-stepping
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They carry no contact geometry and no
//! dynamics; those live in `spintoy-core`. A renderer only ever needs this
//! crate (see [`convert`]).
//!
//! # Coordinate System
//!
//! - Y: up (opposite to gravity)
//! - Right-handed
//! - All vectors, angular velocity included, in the world frame
//!
//! # Example
//!
//! ```
//! use spintoy_types::{Transform, Gravity};
//! use nalgebra::{Point3, UnitQuaternion};
//!
//! let state = Transform::at_rest(Point3::new(0.0, 1.0, 0.0), UnitQuaternion::identity());
//! let up = Gravity::earth().up().unwrap_or_default();
//!
//! assert_eq!(state.position.coords.dot(&up), 1.0);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod body;
mod config;
mod contact;
pub mod convert;
mod error;
mod gravity;

pub use body::{BodyParameters, Derivative, Friction, Transform};
pub use config::{IntegrationMethod, SimulationConfig};
pub use contact::{ContactRegime, ContactState, SwitchEvent};
pub use error::SimError;
pub use gravity::Gravity;

// Re-export math types for convenience
pub use glam::{Quat, Vec3};
pub use nalgebra::{Matrix3, Point3, Quaternion, UnitQuaternion, Vector3};

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;
