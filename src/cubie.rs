//! Triangle mesh of a single cubie.
//!
//! A cubie is 36 vertices: 6 faces of 2 triangles each, with face `k` owning
//! vertices `6k..6k + 6`. The same layout is reused for the per-vertex color
//! and normal arrays, so a color mesh is just a [`CubieGeometry`] whose
//! "positions" are RGB triples.

use std::fmt;

use crate::matrix::Matrix4;
use crate::quaternion::Quaternion;
use crate::vector::Vector3;

/// Number of vertices in one cubie mesh.
pub const VERTICES_PER_CUBIE: usize = 36;

/// Number of vertices spanned by one face (two triangles).
pub const VERTICES_PER_FACE: usize = 6;

/// One of the six faces of a cube, which also names the outer layer that a
/// face turn rotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    Front = 0,
    Right = 1,
    Left = 2,
    Back = 3,
    Bottom = 4,
    Top = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Right,
        Face::Left,
        Face::Back,
        Face::Bottom,
        Face::Top,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Outward unit normal of this face in puzzle space.
    pub const fn normal(self) -> Vector3 {
        match self {
            Face::Front => Vector3::new(0.0, 0.0, 1.0),
            Face::Right => Vector3::new(1.0, 0.0, 0.0),
            Face::Left => Vector3::new(-1.0, 0.0, 0.0),
            Face::Back => Vector3::new(0.0, 0.0, -1.0),
            Face::Bottom => Vector3::new(0.0, -1.0, 0.0),
            Face::Top => Vector3::new(0.0, 1.0, 0.0),
        }
    }

    /// Single-letter name used in move notation.
    pub const fn letter(self) -> char {
        match self {
            Face::Front => 'F',
            Face::Right => 'R',
            Face::Left => 'L',
            Face::Back => 'B',
            Face::Bottom => 'D',
            Face::Top => 'U',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        Self::ALL.into_iter().find(|face| face.letter() == letter)
    }

    /// Picks the face that currently points most nearly along `direction`,
    /// after the whole puzzle has been rotated by `view`.
    ///
    /// Ties go to the face listed first in [`Face::ALL`].
    pub fn facing(direction: Vector3, view: &Quaternion) -> Self {
        let view = view.to_matrix();
        let mut best = Face::Front;
        let mut best_dot = f32::NEG_INFINITY;
        for face in Self::ALL {
            let dot = face.normal().transform(&view).dot(direction);
            if dot > best_dot {
                best = face;
                best_dot = dot;
            }
        }
        best
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Per-vertex data for one cubie, in the fixed face-major vertex order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubieGeometry {
    pub vertices: [Vector3; VERTICES_PER_CUBIE],
}

impl Default for CubieGeometry {
    fn default() -> Self {
        Self::filled(Vector3::ZERO)
    }
}

impl CubieGeometry {
    /// Every vertex set to `value`. Used to start color and normal meshes.
    pub fn filled(value: Vector3) -> Self {
        Self {
            vertices: [value; VERTICES_PER_CUBIE],
        }
    }

    /// Builds an axis-aligned cube centered at `center` with edge length
    /// `edge`.
    ///
    /// Each face is wound counter-clockwise when seen from outside, starting
    /// from a fixed corner, so the layout is the same for every cubie.
    pub fn new(center: Vector3, edge: f32) -> Self {
        let half = edge / 2.0;
        // (first corner relative to center, first edge, second edge)
        let faces: [(Vector3, Vector3, Vector3); 6] = [
            // front
            (
                Vector3::new(-half, -half, half),
                Vector3::new(edge, 0.0, 0.0),
                Vector3::new(0.0, edge, 0.0),
            ),
            // right
            (
                Vector3::new(half, -half, half),
                Vector3::new(0.0, 0.0, -edge),
                Vector3::new(0.0, edge, 0.0),
            ),
            // left
            (
                Vector3::new(-half, -half, -half),
                Vector3::new(0.0, 0.0, edge),
                Vector3::new(0.0, edge, 0.0),
            ),
            // back
            (
                Vector3::new(half, -half, -half),
                Vector3::new(-edge, 0.0, 0.0),
                Vector3::new(0.0, edge, 0.0),
            ),
            // bottom
            (
                Vector3::new(-half, -half, -half),
                Vector3::new(edge, 0.0, 0.0),
                Vector3::new(0.0, 0.0, edge),
            ),
            // top
            (
                Vector3::new(-half, half, half),
                Vector3::new(edge, 0.0, 0.0),
                Vector3::new(0.0, 0.0, -edge),
            ),
        ];

        let mut vertices = [Vector3::ZERO; VERTICES_PER_CUBIE];
        for (face_vertices, &(corner, u, v)) in
            vertices.chunks_exact_mut(VERTICES_PER_FACE).zip(&faces)
        {
            let origin = center + corner;
            face_vertices.copy_from_slice(&[
                origin,
                origin + u,
                origin + u + v,
                origin,
                origin + u + v,
                origin + v,
            ]);
        }

        Self { vertices }
    }

    /// The six vertices belonging to `face`.
    pub fn face(&self, face: Face) -> &[Vector3] {
        let start = face.index() * VERTICES_PER_FACE;
        &self.vertices[start..start + VERTICES_PER_FACE]
    }

    /// Broadcasts one value (a color or a normal) to every vertex of `face`.
    pub fn set_face(&mut self, face: Face, value: Vector3) {
        let start = face.index() * VERTICES_PER_FACE;
        self.vertices[start..start + VERTICES_PER_FACE].fill(value);
    }

    /// Centroid of the quad spanned by `face`.
    pub fn face_center(&self, face: Face) -> Vector3 {
        let quad = self.face(face);
        // vertices 0 and 2 are opposite corners of the quad
        (quad[0] + quad[2]) * 0.5
    }

    /// Centroid of the whole cubie.
    pub fn center(&self) -> Vector3 {
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::ZERO, |acc, &vertex| acc + vertex);
        sum * (1.0 / VERTICES_PER_CUBIE as f32)
    }

    /// Rigidly moves every vertex by `m`.
    ///
    /// This is for one-time layout only. Animation leaves the geometry alone
    /// and hands a transform matrix to the renderer instead.
    pub fn transform(&mut self, m: &Matrix4) {
        for vertex in &mut self.vertices {
            *vertex = vertex.transform(m);
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_face_letters_roundtrip() {
        for face in Face::ALL {
            assert_eq!(Face::from_letter(face.letter()), Some(face));
            assert_eq!(Face::from_index(face.index()), Some(face));
        }
        assert_eq!(Face::from_letter('X'), None);
        assert_eq!(Face::from_index(6), None);
    }

    #[test]
    fn test_faces_lie_on_their_planes() {
        let center = Vector3::new(0.4, -0.4, 0.0);
        let cubie = CubieGeometry::new(center, 0.5);
        for face in Face::ALL {
            let normal = face.normal();
            for &vertex in cubie.face(face) {
                assert_abs_diff_eq!((vertex - center).dot(normal), 0.25, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_faces_wind_outward() {
        let cubie = CubieGeometry::new(Vector3::ZERO, 1.0);
        for face in Face::ALL {
            for triangle in cubie.face(face).chunks_exact(3) {
                let winding = (triangle[1] - triangle[0]).cross(triangle[2] - triangle[0]);
                assert!(
                    winding.dot(face.normal()) > 0.0,
                    "{face:?} triangle winds inward"
                );
            }
        }
    }

    #[test]
    fn test_face_center_and_center() {
        let center = Vector3::new(1.0, 2.0, 3.0);
        let cubie = CubieGeometry::new(center, 2.0);
        assert_abs_diff_eq!(cubie.center(), center, epsilon = 1e-5);
        assert_abs_diff_eq!(
            cubie.face_center(Face::Top),
            Vector3::new(1.0, 3.0, 3.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_set_face_only_touches_that_face() {
        let mut colors = CubieGeometry::filled(Vector3::ZERO);
        colors.set_face(Face::Back, Vector3::X);
        for face in Face::ALL {
            let expected = if face == Face::Back { Vector3::X } else { Vector3::ZERO };
            assert!(colors.face(face).iter().all(|&c| c == expected));
        }
    }

    #[test]
    fn test_transform_moves_cubie() {
        let mut cubie = CubieGeometry::new(Vector3::ZERO, 1.0);
        cubie.transform(&Matrix4::translation(Vector3::new(0.0, 0.0, -0.4)));
        assert_abs_diff_eq!(cubie.center(), Vector3::new(0.0, 0.0, -0.4), epsilon = 1e-6);
    }

    #[test]
    fn test_facing_follows_view_rotation() {
        let identity = Quaternion::IDENTITY;
        assert_eq!(Face::facing(Vector3::Z, &identity), Face::Front);
        assert_eq!(Face::facing(Vector3::Y, &identity), Face::Top);

        // after a quarter turn about Y, the left face points at the viewer
        let view = Quaternion::from_rotation_y(std::f32::consts::FRAC_PI_2);
        assert_eq!(Face::facing(Vector3::Z, &view), Face::Left);
        assert_eq!(Face::facing(Vector3::X, &view), Face::Front);
    }
}
