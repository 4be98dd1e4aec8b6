//! Numeric validation utilities for simulation state.
//!
//! Detection primitives for NaN, infinity and divergence (values exceeding
//! [`MAX_VAL`]).

use spintoy_types::Transform;

/// Minimum meaningful value; magnitudes below this are treated as zero.
pub const MIN_VAL: f64 = 1e-15;

/// Maximum allowed magnitude of any state component.
pub const MAX_VAL: f64 = 1e10;

/// Returns true if value is NaN, +inf, -inf, or exceeds `MAX_VAL`.
#[inline]
#[must_use]
pub fn is_bad(x: f64) -> bool {
    // NaN fails every range comparison, so the explicit is_nan() is required.
    #[allow(clippy::manual_range_contains)]
    {
        x.is_nan() || x > MAX_VAL || x < -MAX_VAL
    }
}

/// Which part of a [`Transform`] went bad first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadComponent {
    /// Centre-of-mass position.
    Position,
    /// Orientation quaternion.
    Orientation,
    /// Linear velocity.
    Velocity,
    /// Angular velocity.
    AngularVelocity,
}

impl std::fmt::Display for BadComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Position => write!(f, "position"),
            Self::Orientation => write!(f, "orientation"),
            Self::Velocity => write!(f, "velocity"),
            Self::AngularVelocity => write!(f, "angular velocity"),
        }
    }
}

/// Find the first bad component of a state, if any.
#[must_use]
pub fn check_transform(state: &Transform) -> Option<BadComponent> {
    if state.position.iter().any(|&x| is_bad(x)) {
        return Some(BadComponent::Position);
    }
    if state.orientation.coords.iter().any(|&x| is_bad(x)) {
        return Some(BadComponent::Orientation);
    }
    if state.velocity.iter().any(|&x| is_bad(x)) {
        return Some(BadComponent::Velocity);
    }
    if state.angular_velocity.iter().any(|&x| is_bad(x)) {
        return Some(BadComponent::AngularVelocity);
    }
    None
}
