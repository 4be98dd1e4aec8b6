//! Energy queries: kinetic, gravitational potential, total.
//!
//! Used for diagnostics only; the solver never consumes them. Potential
//! energy is measured from the ground plane through the origin.

use spintoy_types::{BodyParameters, Gravity, Transform};

/// Energy of a toy at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Energy {
    /// Translational plus rotational kinetic energy.
    pub kinetic: f64,
    /// Gravitational potential energy.
    pub potential: f64,
}

impl Energy {
    /// Evaluate the energy of `state`.
    #[must_use]
    pub fn of(params: &BodyParameters, gravity: &Gravity, state: &Transform) -> Self {
        Self {
            kinetic: kinetic_energy(params, state),
            potential: potential_energy(params, gravity, state),
        }
    }

    /// Kinetic plus potential.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.kinetic + self.potential
    }
}

/// `½ m |v|² + ½ ωᵀ I ω` with the world-frame inertia.
#[must_use]
pub fn kinetic_energy(params: &BodyParameters, state: &Transform) -> f64 {
    let inertia = params.world_inertia(&state.orientation);
    let omega = &state.angular_velocity;
    0.5 * params.mass * state.velocity.norm_squared() + 0.5 * omega.dot(&(inertia * omega))
}

/// `-m g·p` (with g pointing down this is `m |g| h`).
#[must_use]
pub fn potential_energy(params: &BodyParameters, gravity: &Gravity, state: &Transform) -> f64 {
    -params.mass * gravity.acceleration.dot(&state.position.coords)
}
