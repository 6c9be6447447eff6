//! The 27 painted cubies that make up the puzzle.
//!
//! Cubie `i` starts in slot `i`. Slots are numbered layer by layer from the
//! front: `x = i % 3`, `y = (i / 3) % 3`, `layer = i / 9`, where layer 0 is the
//! front (`+Z`) layer and `x`/`y` grow to the right and upwards.

use crate::cubie::{CubieGeometry, Face};
use crate::matrix::Matrix4;
use crate::vector::Vector3;
use crate::NUM_CUBIES;

/// Sticker colors as RGB triples in `0.0..=1.0`.
pub mod palette {
    use crate::vector::Vector3;

    pub const RED: Vector3 = Vector3::new(186.0 / 255.0, 12.0 / 255.0, 47.0 / 255.0);
    pub const GREEN: Vector3 = Vector3::new(0.0, 154.0 / 255.0, 68.0 / 255.0);
    pub const BLUE: Vector3 = Vector3::new(0.0, 61.0 / 255.0, 165.0 / 255.0);
    pub const ORANGE: Vector3 = Vector3::new(254.0 / 255.0, 80.0 / 255.0, 0.0);
    pub const YELLOW: Vector3 = Vector3::new(1.0, 215.0 / 255.0, 0.0);
    pub const WHITE: Vector3 = Vector3::new(1.0, 1.0, 1.0);
    /// Color of the plastic between stickers.
    pub const INSIDE: Vector3 = Vector3::new(45.0 / 255.0, 45.0 / 255.0, 45.0 / 255.0);
}

/// Sticker color of a solved puzzle's face.
pub const fn sticker_color(face: Face) -> Vector3 {
    match face {
        Face::Front => palette::RED,
        Face::Right => palette::GREEN,
        Face::Left => palette::BLUE,
        Face::Back => palette::ORANGE,
        Face::Bottom => palette::WHITE,
        Face::Top => palette::YELLOW,
    }
}

/// Grid coordinates of a slot, each in `-1..=1`.
pub const fn slot_coords(slot: usize) -> (i32, i32, i32) {
    (
        (slot % 3) as i32 - 1,
        ((slot / 3) % 3) as i32 - 1,
        1 - (slot / 9) as i32,
    )
}

/// Whether a cubie at `slot` shows a sticker on `face`.
pub fn is_on_face(slot: usize, face: Face) -> bool {
    let (x, y, z) = slot_coords(slot);
    match face {
        Face::Front => z == 1,
        Face::Back => z == -1,
        Face::Right => x == 1,
        Face::Left => x == -1,
        Face::Top => y == 1,
        Face::Bottom => y == -1,
    }
}

/// Static render data for the whole puzzle, built once and never touched by
/// the animation engine afterwards.
#[derive(Debug, Clone)]
pub struct CubeAssembly {
    /// Distance between neighbouring slot centers.
    pub spacing: f32,
    pub cubies: [CubieGeometry; NUM_CUBIES],
    pub colors: [CubieGeometry; NUM_CUBIES],
    /// Outward normals, the same for every cubie.
    pub normals: CubieGeometry,
}

impl CubeAssembly {
    /// Lays out the puzzle with slot centers `spacing` apart and a visible
    /// `gap` between neighbouring cubies.
    pub fn new(spacing: f32, gap: f32) -> Self {
        let edge = spacing - gap;

        let mut cubies = [CubieGeometry::default(); NUM_CUBIES];
        let mut colors = [CubieGeometry::filled(palette::INSIDE); NUM_CUBIES];

        // build the front layer, then shift copies of it backwards
        for slot in 0..9 {
            let (x, y, _) = slot_coords(slot);
            let center = Vector3::new(x as f32, y as f32, 1.0) * spacing;
            cubies[slot] = CubieGeometry::new(center, edge);
        }
        for layer in 1..3 {
            let shift = Matrix4::translation(Vector3::new(0.0, 0.0, -spacing * layer as f32));
            for slot in 0..9 {
                let mut cubie = cubies[slot];
                cubie.transform(&shift);
                cubies[slot + 9 * layer] = cubie;
            }
        }

        for (slot, cubie_colors) in colors.iter_mut().enumerate() {
            for face in Face::ALL {
                if is_on_face(slot, face) {
                    cubie_colors.set_face(face, sticker_color(face));
                }
            }
        }

        let mut normals = CubieGeometry::default();
        for face in Face::ALL {
            normals.set_face(face, face.normal());
        }

        Self {
            spacing,
            cubies,
            colors,
            normals,
        }
    }

    /// Center of `slot` in puzzle space.
    pub fn slot_center(&self, slot: usize) -> Vector3 {
        let (x, y, z) = slot_coords(slot);
        Vector3::new(x as f32, y as f32, z as f32) * self.spacing
    }

    /// Faces of `cubie` that carry a sticker.
    pub fn stickers(&self, cubie: usize) -> impl Iterator<Item = Face> + '_ {
        Face::ALL
            .into_iter()
            .filter(move |&face| self.colors[cubie].face(face)[0] != palette::INSIDE)
    }
}
