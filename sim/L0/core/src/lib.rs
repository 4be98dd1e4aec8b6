//! Contact dynamics for spinning toys.
//!
//! This crate simulates a single rigid toy on a flat, frictional ground
//! plane. Contact is not detected by generic collision; every toy carries a
//! closed-form model of the point (or points) it rests on, and the normal
//! force is eliminated analytically so each sub-step reduces to one 3×3
//! solve.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                          Simulation                           │
//! │  update(dt): N sub-steps, telemetry, warnings, auto reset     │
//! └───────────────┬───────────────────────────────┬───────────────┘
//!                 │                               │
//!                 ▼                               ▼
//! ┌───────────────────────────────┐ ┌─────────────────────────────┐
//! │   switch::resolve             │ │  integrators: Euler, Heun,  │
//! │   topology change + impulse   │ │  RK4 over dynamics          │
//! └───────────────┬───────────────┘ └──────────────┬──────────────┘
//!                 │                                │
//!                 ▼                                ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │             contact: quadric, tippe-top, oloid                │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use spintoy_core::{Simulation, Toy, ToyKind};
//! use spintoy_types::SimulationConfig;
//!
//! let toy = Toy::from_kind("rattleback".parse::<ToyKind>()?)?;
//! let mut sim = Simulation::new(toy, SimulationConfig::default())?;
//! sim.set_simulating(true);
//!
//! for _ in 0..30 {
//!     sim.update(1.0 / 60.0);
//! }
//! println!("ω = {:?}", sim.angular_velocity());
//! # Ok::<(), spintoy_types::SimError>(())
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::many_single_char_names,    // r, u, m, g follow the equations
    clippy::missing_errors_doc,        // Error docs added where non-obvious
    clippy::doc_markdown,              // Not all technical terms need backticks
)]

pub mod contact;
pub mod dynamics;
pub mod energy;
pub mod integrators;
pub mod shape;
pub mod simulation;
pub mod switch;
pub mod telemetry;
pub mod toys;
pub mod validation;
pub mod warning;

pub use contact::{ContactModel, ContactPoint, OloidContact, QuadricContact, TippeTopContact};
pub use dynamics::{Ground, Solution};
pub use energy::Energy;
pub use integrators::{ExplicitEuler, Heun, Integrator, RungeKutta4, integrate_with_method};
pub use shape::Shape;
pub use simulation::Simulation;
pub use switch::Switch;
pub use telemetry::AngularVelocityTrace;
pub use toys::{InitialVelocity, RestPose, Toy, ToyKind};
pub use warning::{Warning, Warnings};

pub use spintoy_types::{
    BodyParameters, ContactRegime, ContactState, Derivative, Friction, Gravity, IntegrationMethod,
    Result, SimError, SimulationConfig, SwitchEvent, Transform,
};
