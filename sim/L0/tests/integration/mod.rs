//! Integration tests for the spintoy crates.
//!
//! These tests drive whole toys through the public API:
//! - Energy conservation without friction
//! - Order of convergence of each integrator on each toy
//! - Oloid dual-circle rolling
//! - Tippe-top sphere hand-off and impulse
//! - Simulation lifecycle: pause, reset, perturbation, divergence recovery

pub mod energy_conservation;
pub mod oloid_contact;
pub mod rk4_convergence;
pub mod simulation_lifecycle;
pub mod tippe_top_inversion;
