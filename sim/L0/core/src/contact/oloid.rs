//! Two-circle oloid contact.
//!
//! An oloid is the convex hull of two perpendicular circles of radius `ρ`
//! whose centres are `ρ` apart. Its lowest point always lies on one of the
//! circles. For a circle with world centre `C` and normal `N`, the extremal
//! points along the up axis `u` are
//!
//! ```text
//! C ± ρ ŵ,    w = u - N (N·u)
//! ```
//!
//! giving four candidates. The lowest candidate carries the weight, unless
//! the lowest candidate of the *other* circle is within a tolerance of it: the
//! oloid then rests on the segment between them (line contact).
//!
//! For a line contact both ends carry a normal reaction
//! ([`ContactModel::line_ends`]). The nominal contact point, used for slip
//! friction and reporting, is where the vertical through the centre of mass
//! meets the segment (clamped to it), and its rate is interpolated with the
//! same weight.
//!
//! Line contact is entered when the gap between the circles drops below the
//! tie tolerance and left only once it exceeds [`RELEASE_FACTOR`] times that,
//! so a gap hovering around the tolerance does not toggle the state.

use nalgebra::{UnitQuaternion, Vector3};
use spintoy_types::{ContactState, Result, SimError, Transform};

use super::{ContactModel, ContactPoint};

/// Height difference below which both circles are considered touching.
pub const DEFAULT_TIE_TOLERANCE: f64 = 1e-3;

/// A line contact is kept until the gap exceeds this many tie tolerances.
pub const RELEASE_FACTOR: f64 = 4.0;

/// `|w|` below which a circle lies flat and has no unique lowest point.
const MIN_TILT: f64 = 1e-9;

/// One circle of the oloid, body frame.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Circle {
    centre: Vector3<f64>,
    normal: Vector3<f64>,
}

/// Lowest point of one circle in the world frame.
#[derive(Debug, Clone, Copy)]
struct CirclePoint {
    /// Offset from the centre of mass.
    r: Vector3<f64>,
    /// World centre of the circle (offset from the centre of mass).
    centre: Vector3<f64>,
    /// World normal of the circle.
    normal: Vector3<f64>,
    /// In-plane direction of steepest ascent, `w = u - N(N·u)`.
    ascent: Vector3<f64>,
}

/// Contact model for an oloid.
#[derive(Debug, Clone, PartialEq)]
pub struct OloidContact {
    radius: f64,
    circles: [Circle; 2],
    tie_tolerance: f64,
}

impl OloidContact {
    /// Oloid of circle radius `radius`: circle 0 has normal `+Y` and centre
    /// `-ρ/2 · X`, circle 1 has normal `+Z` and centre `+ρ/2 · X`.
    pub fn new(radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SimError::invalid_config("oloid radius must be positive"));
        }
        Ok(Self {
            radius,
            circles: [
                Circle {
                    centre: Vector3::new(-0.5 * radius, 0.0, 0.0),
                    normal: Vector3::y(),
                },
                Circle {
                    centre: Vector3::new(0.5 * radius, 0.0, 0.0),
                    normal: Vector3::z(),
                },
            ],
            tie_tolerance: DEFAULT_TIE_TOLERANCE,
        })
    }

    /// Set the line-contact tolerance.
    pub fn with_tie_tolerance(mut self, tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(SimError::invalid_config("tie tolerance must be non-negative"));
        }
        self.tie_tolerance = tolerance;
        Ok(self)
    }

    /// Circle radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Gap above which a line contact falls back to a single circle.
    #[must_use]
    pub fn release_tolerance(&self) -> f64 {
        self.tie_tolerance * RELEASE_FACTOR
    }

    /// The circle holding the lowest candidate, and how far above it the
    /// other circle's lowest candidate lies.
    #[must_use]
    pub fn lowest_gap(
        &self,
        orientation: &UnitQuaternion<f64>,
        up: &Vector3<f64>,
    ) -> (usize, f64) {
        let mut candidates = self.candidates(orientation, up);
        candidates.sort_by(|a, b| a.1.dot(up).total_cmp(&b.1.dot(up)));

        let (lowest, low_point) = candidates[0];
        let rival = candidates[1..]
            .iter()
            .find(|(circle, _)| *circle != lowest)
            .map_or(f64::INFINITY, |(_, p)| p.dot(up));
        (lowest, rival - low_point.dot(up))
    }

    /// The four extremal candidates `C ± ρŵ` as `(circle, offset)`.
    ///
    /// A circle lying flat contributes its centre twice.
    #[must_use]
    pub fn candidates(
        &self,
        orientation: &UnitQuaternion<f64>,
        up: &Vector3<f64>,
    ) -> [(usize, Vector3<f64>); 4] {
        let mut out = [(0, Vector3::zeros()); 4];
        for (i, circle) in self.circles.iter().enumerate() {
            let p = self.lowest_on(circle, orientation, up);
            let reach = p.ascent.try_normalize(MIN_TILT).unwrap_or_else(Vector3::zeros) * self.radius;
            out[2 * i] = (i, p.centre - reach);
            out[2 * i + 1] = (i, p.centre + reach);
        }
        out
    }

    fn lowest_on(
        &self,
        circle: &Circle,
        orientation: &UnitQuaternion<f64>,
        up: &Vector3<f64>,
    ) -> CirclePoint {
        let centre = orientation * circle.centre;
        let normal = orientation * circle.normal;
        let ascent = up - normal * normal.dot(up);
        let r = match ascent.try_normalize(MIN_TILT) {
            Some(dir) => centre - dir * self.radius,
            None => centre,
        };
        CirclePoint {
            r,
            centre,
            normal,
            ascent,
        }
    }

    /// Offset and rate of the lowest point of circle `index`.
    fn circle_contact(
        &self,
        index: usize,
        transform: &Transform,
        up: &Vector3<f64>,
    ) -> Result<ContactPoint> {
        let p = self.lowest_on(&self.circles[index], &transform.orientation, up);
        let len = p.ascent.norm();
        if len < MIN_TILT {
            return Err(SimError::singular_contact(format!(
                "circle {index} lies flat on the ground"
            )));
        }
        let dir = p.ascent / len;

        let omega = transform.angular_velocity;
        let d_normal = omega.cross(&p.normal);
        let d_ascent = -(d_normal * p.normal.dot(up) + p.normal * d_normal.dot(up));
        let d_dir = (d_ascent - dir * dir.dot(&d_ascent)) / len;

        Ok(ContactPoint {
            r: p.r,
            dr: omega.cross(&p.centre) - d_dir * self.radius,
        })
    }

    /// Weight of the second end for the point of segment `a`–`b` below the
    /// centre of mass.
    fn segment_weight(a: &Vector3<f64>, b: &Vector3<f64>, up: &Vector3<f64>) -> f64 {
        let horizontal = |v: &Vector3<f64>| v - up * v.dot(up);
        let a_h = horizontal(a);
        let d_h = horizontal(&(b - a));
        let len_sq = d_h.norm_squared();
        if len_sq < MIN_TILT {
            return 0.5;
        }
        (-a_h.dot(&d_h) / len_sq).clamp(0.0, 1.0)
    }
}

impl ContactModel for OloidContact {
    fn detect(&self, orientation: &UnitQuaternion<f64>, up: &Vector3<f64>) -> ContactState {
        let (lowest, gap) = self.lowest_gap(orientation, up);
        if gap < self.tie_tolerance {
            ContactState::DualCircle
        } else {
            ContactState::SingleCircle(lowest)
        }
    }

    fn redetect(
        &self,
        current: ContactState,
        orientation: &UnitQuaternion<f64>,
        up: &Vector3<f64>,
    ) -> ContactState {
        if current != ContactState::DualCircle {
            return self.detect(orientation, up);
        }
        let (lowest, gap) = self.lowest_gap(orientation, up);
        if gap < self.release_tolerance() {
            ContactState::DualCircle
        } else {
            ContactState::SingleCircle(lowest)
        }
    }

    fn contact(
        &self,
        state: ContactState,
        transform: &Transform,
        up: &Vector3<f64>,
    ) -> Result<ContactPoint> {
        match state {
            ContactState::SingleCircle(i) if i < self.circles.len() => {
                self.circle_contact(i, transform, up)
            }
            ContactState::DualCircle => {
                let a = self.circle_contact(0, transform, up)?;
                let b = self.circle_contact(1, transform, up)?;
                let t = Self::segment_weight(&a.r, &b.r, up);
                Ok(ContactPoint {
                    r: a.r.lerp(&b.r, t),
                    dr: a.dr.lerp(&b.dr, t),
                })
            }
            other => Err(SimError::invalid_config(format!(
                "oloid has no {other} contact"
            ))),
        }
    }

    fn support_points(
        &self,
        state: ContactState,
        orientation: &UnitQuaternion<f64>,
        up: &Vector3<f64>,
    ) -> Result<Vec<Vector3<f64>>> {
        match state {
            ContactState::SingleCircle(i) if i < self.circles.len() => {
                Ok(vec![self.lowest_on(&self.circles[i], orientation, up).r])
            }
            ContactState::DualCircle => Ok(self
                .circles
                .iter()
                .map(|c| self.lowest_on(c, orientation, up).r)
                .collect()),
            other => Err(SimError::invalid_config(format!(
                "oloid has no {other} contact"
            ))),
        }
    }

    fn line_ends(
        &self,
        state: ContactState,
        transform: &Transform,
        up: &Vector3<f64>,
    ) -> Result<Option<[ContactPoint; 2]>> {
        if state != ContactState::DualCircle {
            return Ok(None);
        }
        Ok(Some([
            self.circle_contact(0, transform, up)?,
            self.circle_contact(1, transform, up)?,
        ]))
    }
}
