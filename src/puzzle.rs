//! Which cubie sits in which slot, and how every cubie is rotated.
//!
//! The state is a permutation of the 27 slots plus one orientation per
//! cubie. A face turn touches exactly the nine slots of one outer layer:
//! [`PuzzleState::begin_turn`] computes where those cubies will end up,
//! [`PuzzleState::apply_interpolated`] poses them part of the way there, and
//! [`PuzzleState::commit_turn`] snaps them to the target and permutes the
//! slots.

use std::f32::consts::FRAC_PI_2;
use std::fmt;

use crate::cubie::Face;
use crate::matrix::Matrix4;
use crate::quaternion::Quaternion;
use crate::NUM_CUBIES;

/// Number of cubies in one outer layer.
pub const LAYER_SIZE: usize = 9;

/// Slots making up each face layer, indexed by [`Face::index`].
pub const SRC_INDICES: [[usize; LAYER_SIZE]; 6] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8],          // front
    [2, 11, 20, 5, 14, 23, 8, 17, 26],    // right
    [0, 3, 6, 9, 12, 15, 18, 21, 24],     // left
    [18, 19, 20, 21, 22, 23, 24, 25, 26], // back
    [0, 1, 2, 9, 10, 11, 18, 19, 20],     // bottom
    [6, 7, 8, 15, 16, 17, 24, 25, 26],    // top
];

/// Where the cubie in `SRC_INDICES[face][i]` lands after one forward turn of
/// `face`. Each row is a permutation of the matching `SRC_INDICES` row.
pub const DST_INDICES: [[usize; LAYER_SIZE]; 6] = [
    [6, 3, 0, 7, 4, 1, 8, 5, 2],          // front
    [8, 5, 2, 17, 14, 11, 26, 23, 20],    // right
    [18, 9, 0, 21, 12, 3, 24, 15, 6],     // left
    [20, 23, 26, 19, 22, 25, 18, 21, 24], // back
    [2, 11, 20, 1, 10, 19, 0, 9, 18],     // bottom
    [24, 15, 6, 25, 16, 7, 26, 17, 8],    // top
];

/// A quarter turn of one face layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceTurn {
    pub face: Face,
    /// Turn the other way (a "prime" move).
    pub inverse: bool,
}

impl FaceTurn {
    pub const fn new(face: Face, inverse: bool) -> Self {
        Self { face, inverse }
    }

    pub const fn forward(face: Face) -> Self {
        Self::new(face, false)
    }

    pub const fn inverted(self) -> Self {
        Self::new(self.face, !self.inverse)
    }

    /// Rotation applied to every cubie of the layer.
    pub fn rotation(self) -> Quaternion {
        let forward = match self.face {
            Face::Top => Quaternion::from_rotation_y(-FRAC_PI_2),
            Face::Bottom => Quaternion::from_rotation_y(FRAC_PI_2),
            Face::Front => Quaternion::from_rotation_z(-FRAC_PI_2),
            Face::Back => Quaternion::from_rotation_z(FRAC_PI_2),
            Face::Right => Quaternion::from_rotation_x(-FRAC_PI_2),
            Face::Left => Quaternion::from_rotation_x(FRAC_PI_2),
        };
        if self.inverse {
            forward.conjugate()
        } else {
            forward
        }
    }
}

impl fmt::Display for FaceTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.face)?;
        if self.inverse {
            write!(f, "'")?;
        }
        Ok(())
    }
}

/// Start and target orientations for the nine cubies of a turn in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnPlan {
    pub turn: FaceTurn,
    /// Cubies being turned, in `SRC_INDICES` order.
    pub cubies: [usize; LAYER_SIZE],
    pub start: [Quaternion; LAYER_SIZE],
    pub target: [Quaternion; LAYER_SIZE],
}

/// Slot permutation and per-cubie orientation of the whole puzzle.
#[derive(Debug, Clone)]
pub struct PuzzleState {
    /// `occupants[slot]` is the cubie currently sitting in `slot`.
    occupants: [usize; NUM_CUBIES],
    /// Committed orientation of each cubie.
    orientations: [Quaternion; NUM_CUBIES],
    /// Current pose of each cubie, including mid-turn poses.
    poses: [Quaternion; NUM_CUBIES],
    /// Matrix form of `poses`.
    transforms: [Matrix4; NUM_CUBIES],
}

impl Default for PuzzleState {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleState {
    /// Every cubie in its home slot, unrotated.
    pub fn new() -> Self {
        Self {
            occupants: std::array::from_fn(|slot| slot),
            orientations: [Quaternion::IDENTITY; NUM_CUBIES],
            poses: [Quaternion::IDENTITY; NUM_CUBIES],
            transforms: [Matrix4::IDENTITY; NUM_CUBIES],
        }
    }

    pub fn occupants(&self) -> &[usize; NUM_CUBIES] {
        &self.occupants
    }

    pub fn orientation(&self, cubie: usize) -> Quaternion {
        self.orientations[cubie]
    }

    /// Current rotation of each cubie. Equal to its orientation except while
    /// a turn is being interpolated.
    pub fn poses(&self) -> &[Quaternion; NUM_CUBIES] {
        &self.poses
    }

    /// One matrix per cubie, to be applied to that cubie's home geometry.
    pub fn transforms(&self) -> &[Matrix4; NUM_CUBIES] {
        &self.transforms
    }

    /// Computes the target orientations for `turn` without changing any
    /// state.
    pub fn begin_turn(&self, turn: FaceTurn) -> TurnPlan {
        let rotation = turn.rotation();
        let cubies = SRC_INDICES[turn.face.index()].map(|slot| self.occupants[slot]);
        let start = cubies.map(|cubie| self.orientations[cubie]);
        let target = start.map(|orientation| (rotation * orientation).normalized());
        TurnPlan {
            turn,
            cubies,
            start,
            target,
        }
    }

    /// Poses the turning cubies a fraction `t` of the way to their targets.
    ///
    /// Only the cached transforms change. `t` is clamped to `0.0..=1.0`.
    pub fn apply_interpolated(&mut self, plan: &TurnPlan, t: f32) {
        let t = t.clamp(0.0, 1.0);
        for i in 0..LAYER_SIZE {
            let pose = Quaternion::slerp(&plan.start[i], &plan.target[i], t);
            self.set_pose(plan.cubies[i], pose);
        }
    }

    /// Finishes a turn: the turned cubies take their exact target
    /// orientations and the layer's slots are permuted.
    pub fn commit_turn(&mut self, plan: &TurnPlan) {
        for (&cubie, &target) in plan.cubies.iter().zip(&plan.target) {
            self.orientations[cubie] = target;
            self.set_pose(cubie, target);
        }
        self.permute(plan.turn);
    }

    fn set_pose(&mut self, cubie: usize, pose: Quaternion) {
        self.poses[cubie] = pose;
        self.transforms[cubie] = pose.to_matrix();
    }

    /// Performs `turn` instantly, without animation.
    pub fn apply_turn(&mut self, turn: FaceTurn) {
        let plan = self.begin_turn(turn);
        self.commit_turn(&plan);
    }

    /// Moves the occupants of the turned layer to their new slots.
    ///
    /// An inverse turn reads the tables the other way round, which is the
    /// same as three forward turns.
    fn permute(&mut self, turn: FaceTurn) {
        let (from, to) = match turn.inverse {
            false => (&SRC_INDICES[turn.face.index()], &DST_INDICES[turn.face.index()]),
            true => (&DST_INDICES[turn.face.index()], &SRC_INDICES[turn.face.index()]),
        };
        let moving = from.map(|slot| self.occupants[slot]);
        for (&slot, cubie) in to.iter().zip(moving) {
            self.occupants[slot] = cubie;
        }
    }

    /// Whether `occupants` is a bijection on the slots.
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; NUM_CUBIES];
        for &cubie in &self.occupants {
            if cubie >= NUM_CUBIES || seen[cubie] {
                return false;
            }
            seen[cubie] = true;
        }
        true
    }

    /// Formats the occupancy table as three layers side by side, front first,
    /// top row first.
    pub fn format_occupants(&self) -> String {
        let mut output = String::from("front     middle    back\n");
        for y in (0..3).rev() {
            for layer in 0..3 {
                if layer > 0 {
                    output.push_str("  ");
                }
                for x in 0..3 {
                    if x > 0 {
                        output.push(' ');
                    }
                    let cubie = self.occupants[layer * LAYER_SIZE + y * 3 + x];
                    output.push_str(&format!("{cubie:2}"));
                }
            }
            output.push('\n');
        }
        output
    }
}
