//! Unit quaternions for smoothly interpolated rotations.
//!
//! Matrices have no well-behaved shortest-path interpolation, so everything
//! that animates (face turns and whole-puzzle view rotation) is stored as a
//! quaternion and only converted to a [`Matrix4`] for rendering.

use std::ops::{Add, Mul, Neg, Sub};

use approx::AbsDiffEq;

use crate::matrix::Matrix4;
use crate::vector::Vector3;

/// Dot product above which [`Quaternion::slerp`] falls back to normalized
/// linear interpolation.
const SLERP_LINEAR_THRESHOLD: f32 = 0.95;

/// Tolerance for the unit-length precondition on rotation quaternions.
const UNIT_TOLERANCE: f32 = 1e-3;

/// Quaternion `w + xi + yj + zk`.
///
/// Multiplication is the Hamilton product: `a * b` applies `b` first, then `a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// The axis does not need to be normalized. A zero axis yields the
    /// identity rotation.
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        let axis = axis.normalized();
        if axis == Vector3::ZERO {
            return Self::IDENTITY;
        }
        let (sin, cos) = (angle / 2.0).sin_cos();
        Self::new(cos, axis.x * sin, axis.y * sin, axis.z * sin)
    }

    pub fn from_rotation_x(angle: f32) -> Self {
        Self::from_axis_angle(Vector3::X, angle)
    }

    pub fn from_rotation_y(angle: f32) -> Self {
        Self::from_axis_angle(Vector3::Y, angle)
    }

    pub fn from_rotation_z(angle: f32) -> Self {
        Self::from_axis_angle(Vector3::Z, angle)
    }

    pub fn magnitude(&self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn dot(&self, rhs: &Self) -> f32 {
        self.w * rhs.w + self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Flips the rotation axis. For a unit quaternion this is the inverse
    /// rotation.
    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    pub fn normalize(&mut self) {
        let magnitude = self.magnitude();
        self.w /= magnitude;
        self.x /= magnitude;
        self.y /= magnitude;
        self.z /= magnitude;
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn is_unit(&self) -> bool {
        self.magnitude().abs_diff_eq(&1.0, UNIT_TOLERANCE)
    }

    /// Componentwise linear blend, not renormalized.
    pub fn lerp(&self, end: &Self, t: f32) -> Self {
        *self + (*end - *self) * t
    }

    /// Spherical linear interpolation between two unit quaternions.
    ///
    /// Always follows the shorter arc: if the endpoints lie in opposite
    /// hemispheres, `end` is negated first (it is the same rotation). Nearly
    /// parallel endpoints use a normalized linear blend, where the spherical
    /// formula would divide by a value close to zero.
    pub fn slerp(start: &Self, end: &Self, t: f32) -> Self {
        debug_assert!(start.is_unit(), "slerp start is not a unit quaternion: {start:?}");
        debug_assert!(end.is_unit(), "slerp end is not a unit quaternion: {end:?}");

        let mut end = *end;
        let mut dot = start.dot(&end);
        if dot < 0.0 {
            dot = -dot;
            end = -end;
        }

        if dot > SLERP_LINEAR_THRESHOLD {
            return start.lerp(&end, t).normalized();
        }

        let final_angle = dot.acos();
        let angle = final_angle * t;
        let sin_final = final_angle.sin();
        let fact0 = angle.cos() - dot * angle.sin() / sin_final;
        let fact1 = angle.sin() / sin_final;
        *start * fact0 + end * fact1
    }

    /// Rotation matrix for this quaternion. The quaternion is normalized
    /// first, so slight drift does not introduce scaling.
    pub fn to_matrix(&self) -> Matrix4 {
        let Self { w, x, y, z } = self.normalized();

        let mut ret = Matrix4::IDENTITY;
        ret.set(0, 0, 1.0 - 2.0 * y * y - 2.0 * z * z);
        ret.set(0, 1, 2.0 * x * y - 2.0 * w * z);
        ret.set(0, 2, 2.0 * x * z + 2.0 * w * y);
        ret.set(1, 0, 2.0 * x * y + 2.0 * w * z);
        ret.set(1, 1, 1.0 - 2.0 * x * x - 2.0 * z * z);
        ret.set(1, 2, 2.0 * y * z - 2.0 * w * x);
        ret.set(2, 0, 2.0 * x * z - 2.0 * w * y);
        ret.set(2, 1, 2.0 * y * z + 2.0 * w * x);
        ret.set(2, 2, 1.0 - 2.0 * x * x - 2.0 * y * y);
        ret
    }

    /// Whether both quaternions describe the same rotation (`q` and `-q` are
    /// equivalent).
    pub fn same_rotation(&self, other: &Self, epsilon: f32) -> bool {
        self.abs_diff_eq(other, epsilon) || self.abs_diff_eq(&-*other, epsilon)
    }
}

impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;

    fn mul(self, scale: f32) -> Self {
        Self::new(self.w * scale, self.x * scale, self.y * scale, self.z * scale)
    }
}

impl Add for Quaternion {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.w + rhs.w, self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Quaternion {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.w - rhs.w, self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self {
        self * -1.0
    }
}

impl AbsDiffEq for Quaternion {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.w.abs_diff_eq(&other.w, epsilon)
            && self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}
