//! Contact topology tags.
//!
//! A toy touches the ground at exactly one load-bearing point, but which
//! geometric feature carries it changes as the toy tips over. The active
//! feature is tracked as a [`ContactState`]; a change of state is recorded
//! as a [`SwitchEvent`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which geometric feature of the toy is currently load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ContactState {
    /// Smooth convex surface; the contact moves continuously and never switches.
    Surface,
    /// Tippe-top resting on its large spherical body.
    LargeSphere,
    /// Tippe-top resting on the small sphere of its stem.
    SmallSphere,
    /// Oloid resting on one of its two circular edges.
    SingleCircle(usize),
    /// Oloid resting on both circles at once (line contact).
    DualCircle,
}

impl ContactState {
    /// Number of ground contact points the state represents.
    #[must_use]
    pub const fn contact_count(self) -> usize {
        match self {
            Self::DualCircle => 2,
            _ => 1,
        }
    }

    /// Whether this state belongs to a compound shape that can switch.
    #[must_use]
    pub const fn is_switchable(self) -> bool {
        !matches!(self, Self::Surface)
    }
}

impl std::fmt::Display for ContactState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Surface => write!(f, "surface"),
            Self::LargeSphere => write!(f, "large sphere"),
            Self::SmallSphere => write!(f, "small sphere"),
            Self::SingleCircle(i) => write!(f, "circle {i}"),
            Self::DualCircle => write!(f, "both circles"),
        }
    }
}

/// How the ground contact constrains the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ContactRegime {
    /// Only the normal velocity of the contact point is constrained; the
    /// contact may slip, opposed by slip friction.
    #[default]
    Sliding,
    /// The contact point has zero velocity (rolling without slipping).
    Rolling,
}

/// Record of one contact-topology switch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SwitchEvent {
    /// Simulation time of the switch.
    pub time: f64,
    /// State before the switch.
    pub from: ContactState,
    /// State after the switch.
    pub to: ContactState,
    /// Magnitude of the normal impulse applied at the new contact.
    pub impulse: f64,
    /// Normal (vertical) velocity of the new contact point before the impulse.
    pub normal_velocity_before: f64,
    /// Normal (vertical) velocity of the new contact point after the impulse.
    pub normal_velocity_after: f64,
}
