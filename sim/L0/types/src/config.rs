//! Configuration types for simulation.
//!
//! This module provides configuration types that control how the simulation
//! runs: gravity, integration method, sub-stepping, divergence recovery and
//! the telemetry buffer.

use crate::gravity::Gravity;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Main configuration for a simulation.
///
/// # Example
///
/// ```
/// use spintoy_types::{IntegrationMethod, SimulationConfig};
///
/// let config = SimulationConfig::default()
///     .integration(IntegrationMethod::Heun)
///     .substeps(20);
/// assert!(config.validate().is_ok());
/// assert!(SimulationConfig::default().substeps(0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Gravity configuration. Also defines the ground plane normal.
    pub gravity: Gravity,
    /// Integration method for each sub-step.
    pub integration: IntegrationMethod,
    /// Sub-steps per frame. `None` uses the toy's own default.
    pub substeps: Option<usize>,
    /// Reset the toy when its state diverges (NaN, infinity or overflow).
    pub auto_reset: bool,
    /// Number of angular-velocity samples kept for telemetry.
    pub telemetry_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: Gravity::earth(),
            integration: IntegrationMethod::RungeKutta4,
            substeps: None,
            auto_reset: true,
            telemetry_capacity: 100,
        }
    }
}

impl SimulationConfig {
    /// Configuration used for order-of-accuracy studies: a lower-order
    /// reference integrator with everything else at its default.
    #[must_use]
    pub fn reference(method: IntegrationMethod) -> Self {
        Self {
            integration: method,
            ..Default::default()
        }
    }

    /// Set the gravity.
    #[must_use]
    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the integration method.
    #[must_use]
    pub fn integration(mut self, method: IntegrationMethod) -> Self {
        self.integration = method;
        self
    }

    /// Override the number of sub-steps per frame.
    #[must_use]
    pub fn substeps(mut self, substeps: usize) -> Self {
        self.substeps = Some(substeps);
        self
    }

    /// Keep diverged states instead of resetting.
    #[must_use]
    pub fn without_auto_reset(mut self) -> Self {
        self.auto_reset = false;
        self
    }

    /// Set the telemetry buffer capacity.
    #[must_use]
    pub fn telemetry_capacity(mut self, capacity: usize) -> Self {
        self.telemetry_capacity = capacity;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.gravity.acceleration.iter().all(|x| x.is_finite()) {
            return Err(crate::SimError::invalid_config("gravity must be finite"));
        }

        if self.gravity.up().is_none() {
            return Err(crate::SimError::invalid_config(
                "gravity must be non-zero to define the ground plane",
            ));
        }

        if self.substeps == Some(0) {
            return Err(crate::SimError::invalid_config(
                "substeps must be at least 1",
            ));
        }

        if self.telemetry_capacity == 0 {
            return Err(crate::SimError::invalid_config(
                "telemetry capacity must be at least 1",
            ));
        }

        Ok(())
    }
}

/// Integration method for each sub-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IntegrationMethod {
    /// Explicit Euler (first-order reference).
    ExplicitEuler,
    /// Heun's method (second-order reference).
    Heun,
    /// Classical 4th-order Runge-Kutta.
    #[default]
    RungeKutta4,
}

impl IntegrationMethod {
    /// Get the order of accuracy for this method.
    #[must_use]
    pub const fn order(self) -> usize {
        match self {
            Self::ExplicitEuler => 1,
            Self::Heun => 2,
            Self::RungeKutta4 => 4,
        }
    }

    /// Derivative evaluations per step.
    #[must_use]
    pub const fn stages(self) -> usize {
        match self {
            Self::ExplicitEuler => 1,
            Self::Heun => 2,
            Self::RungeKutta4 => 4,
        }
    }
}

impl std::fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExplicitEuler => write!(f, "Explicit Euler"),
            Self::Heun => write!(f, "Heun"),
            Self::RungeKutta4 => write!(f, "RK4"),
        }
    }
}
