//! Render hand-off: `f64` nalgebra state to `f32` glam types.
//!
//! This module is the only place that knows both nalgebra and glam types.
//! A renderer reads a [`RenderTransform`] once per frame and owns the mapping
//! to its own scene graph.

#![allow(clippy::cast_possible_truncation)] // f64 -> f32 is intentional for rendering

use glam::{Mat4, Quat, Vec3};
use nalgebra::{Point3, UnitQuaternion, Vector3};

use crate::body::Transform;

/// Convert a nalgebra `Point3` to glam `Vec3`.
#[inline]
#[must_use]
pub fn vec3_from_point(p: &Point3<f64>) -> Vec3 {
    Vec3::new(p.x as f32, p.y as f32, p.z as f32)
}

/// Convert a nalgebra `Vector3` to glam `Vec3`.
#[inline]
#[must_use]
pub fn vec3_from_vector(v: &Vector3<f64>) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

/// Convert a nalgebra `UnitQuaternion` to glam `Quat`.
#[inline]
#[must_use]
pub fn quat_from_unit_quaternion(q: &UnitQuaternion<f64>) -> Quat {
    let q = q.quaternion();
    Quat::from_xyzw(q.i as f32, q.j as f32, q.k as f32, q.w as f32)
}

/// Convert a glam `Vec3` back to a nalgebra `Vector3`, e.g. for a user
/// perturbation picked in screen space.
#[inline]
#[must_use]
pub fn vector_from_vec3(v: Vec3) -> Vector3<f64> {
    Vector3::new(f64::from(v.x), f64::from(v.y), f64::from(v.z))
}

/// Single-precision pose of a toy, ready for a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTransform {
    /// Centre of mass.
    pub translation: Vec3,
    /// Body-to-world rotation.
    pub rotation: Quat,
}

impl RenderTransform {
    /// Homogeneous model matrix.
    #[must_use]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }
}

impl From<&Transform> for RenderTransform {
    fn from(state: &Transform) -> Self {
        Self {
            translation: vec3_from_point(&state.position),
            rotation: quat_from_unit_quaternion(&state.orientation),
        }
    }
}
