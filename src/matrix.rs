//! 4x4 transformation matrices.
//!
//! Storage is column-major (`element(row, col) = buf[4 * col + row]`) so the
//! buffer can be handed to a renderer as-is. Points are column vectors, so
//! `a * b` applies `b` first.
//!
//! Rotations are only available as pure constructors. To rotate about more
//! than one axis, build each rotation separately and multiply them.

use std::ops::Mul;

use approx::AbsDiffEq;

use crate::vector::Vector3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    buf: [f32; 16],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    #[rustfmt::skip]
    pub const IDENTITY: Self = Self {
        buf: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Builds a matrix from a column-major buffer.
    pub const fn from_cols_array(buf: [f32; 16]) -> Self {
        Self { buf }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.buf[4 * col + row]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.buf[4 * col + row] = value;
    }

    /// Column-major view of the sixteen elements.
    pub fn as_slice(&self) -> &[f32; 16] {
        &self.buf
    }

    pub fn transpose(&self) -> Self {
        let mut ret = Self::IDENTITY;
        for row in 0..4 {
            for col in 0..4 {
                ret.set(row, col, self.get(col, row));
            }
        }
        ret
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let mut ret = Self::IDENTITY;
        ret.set(1, 1, cos);
        ret.set(1, 2, -sin);
        ret.set(2, 1, sin);
        ret.set(2, 2, cos);
        ret
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let mut ret = Self::IDENTITY;
        ret.set(0, 0, cos);
        ret.set(0, 2, sin);
        ret.set(2, 0, -sin);
        ret.set(2, 2, cos);
        ret
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let mut ret = Self::IDENTITY;
        ret.set(0, 0, cos);
        ret.set(0, 1, -sin);
        ret.set(1, 0, sin);
        ret.set(1, 1, cos);
        ret
    }

    pub fn translation(offset: Vector3) -> Self {
        let mut ret = Self::IDENTITY;
        ret.set(0, 3, offset.x);
        ret.set(1, 3, offset.y);
        ret.set(2, 3, offset.z);
        ret
    }

    /// Perspective projection with a vertical field of view in degrees.
    pub fn perspective(fovy_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let q = 1.0 / (0.5 * fovy_degrees.to_radians()).tan();
        let mut ret = Self::IDENTITY;
        ret.set(0, 0, q / aspect);
        ret.set(1, 1, q);
        ret.set(2, 2, (near + far) / (near - far));
        ret.set(2, 3, (2.0 * near * far) / (near - far));
        ret.set(3, 2, -1.0);
        ret.set(3, 3, 0.0);
        ret
    }

    /// View matrix for a camera at `eye` looking at `center`.
    pub fn look_at(eye: Vector3, center: Vector3, up: Vector3) -> Self {
        let f = (center - eye).normalized();
        let s = f.cross(up.normalized());
        let u = s.cross(f);

        let mut rot = Self::IDENTITY;
        rot.set(0, 0, s.x);
        rot.set(0, 1, s.y);
        rot.set(0, 2, s.z);
        rot.set(1, 0, u.x);
        rot.set(1, 1, u.y);
        rot.set(1, 2, u.z);
        rot.set(2, 0, -f.x);
        rot.set(2, 1, -f.y);
        rot.set(2, 2, -f.z);

        rot * Self::translation(-eye)
    }
}

impl Mul for Matrix4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut ret = Self { buf: [0.0; 16] };
        for row in 0..4 {
            for col in 0..4 {
                let sum = (0..4).map(|k| self.get(row, k) * rhs.get(k, col)).sum::<f32>();
                ret.set(row, col, sum);
            }
        }
        ret
    }
}

impl AbsDiffEq for Matrix4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.buf
            .iter()
            .zip(&other.buf)
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}
