//! Rolling buffer of angular-velocity samples for an external chart.

use std::collections::VecDeque;

use nalgebra::Vector3;

/// A bounded, time-ordered buffer of `(time, ω)` samples.
///
/// When full, pushing drops the oldest sample.
///
/// # Example
///
/// ```
/// use spintoy_core::telemetry::AngularVelocityTrace;
/// use nalgebra::Vector3;
///
/// let mut trace = AngularVelocityTrace::new(2);
/// trace.push(0.0, Vector3::new(0.0, 1.0, 0.0));
/// trace.push(0.1, Vector3::new(0.0, 2.0, 0.0));
/// trace.push(0.2, Vector3::new(0.0, 3.0, 0.0));
///
/// assert_eq!(trace.len(), 2);
/// assert_eq!(trace.oldest().map(|s| s.0), Some(0.1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AngularVelocityTrace {
    capacity: usize,
    samples: VecDeque<(f64, Vector3<f64>)>,
}

impl AngularVelocityTrace {
    /// Create an empty buffer holding at most `capacity` samples.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Maximum number of samples kept.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether the buffer is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    /// Drop all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Append a sample, evicting the oldest when full.
    pub fn push(&mut self, time: f64, angular_velocity: Vector3<f64>) {
        if self.capacity == 0 {
            return;
        }
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back((time, angular_velocity));
    }

    /// Oldest sample.
    #[must_use]
    pub fn oldest(&self) -> Option<&(f64, Vector3<f64>)> {
        self.samples.front()
    }

    /// Newest sample.
    #[must_use]
    pub fn latest(&self) -> Option<&(f64, Vector3<f64>)> {
        self.samples.back()
    }

    /// Samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &(f64, Vector3<f64>)> {
        self.samples.iter()
    }

    /// `(time, |ω|)` series, oldest first.
    pub fn magnitudes(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.samples.iter().map(|(t, w)| (*t, w.norm()))
    }

    /// `(time, ω_axis)` series for one component (0 = x, 1 = y, 2 = z).
    pub fn component(&self, axis: usize) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.samples
            .iter()
            .filter_map(move |(t, w)| w.get(axis).map(|v| (*t, *v)))
    }
}
