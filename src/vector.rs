//! Three-component points and directions.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use approx::AbsDiffEq;

use crate::matrix::Matrix4;
use crate::quaternion::Quaternion;

/// A point or direction in 3D space.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Returns the vector pointing the other way.
    pub fn opposite(self) -> Self {
        -self
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Scales the vector to unit length in place.
    ///
    /// A zero-length vector is left unchanged instead of turning into NaNs.
    pub fn normalize(&mut self) {
        let length = self.length();
        if length != 0.0 {
            self.x /= length;
            self.y /= length;
            self.z /= length;
        }
    }

    /// Returns a unit-length copy, or the vector itself if it has zero length.
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Transforms the vector as a homogeneous point (`w = 1`), so the
    /// translation column of `m` applies.
    pub fn transform(self, m: &Matrix4) -> Self {
        Self::new(
            self.x * m.get(0, 0) + self.y * m.get(0, 1) + self.z * m.get(0, 2) + m.get(0, 3),
            self.x * m.get(1, 0) + self.y * m.get(1, 1) + self.z * m.get(1, 2) + m.get(1, 3),
            self.x * m.get(2, 0) + self.y * m.get(2, 1) + self.z * m.get(2, 2) + m.get(2, 3),
        )
    }

    /// Rotates the vector by a unit quaternion: `q * v * conj(q)`.
    pub fn rotate(self, q: &Quaternion) -> Self {
        let v = Quaternion::new(0.0, self.x, self.y, self.z);
        let rotated = *q * v * q.conjugate();
        Self::new(rotated.x, rotated.y, rotated.z)
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, scale: f32) -> Self {
        Self::new(self.x * scale, self.y * scale, self.z * scale)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl AbsDiffEq for Vector3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}
