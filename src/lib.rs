//! 3x3x3 Twisty Puzzle Rotation Engine
//!
//! Tracks which cubie occupies which slot, animates face turns with
//! quaternion interpolation, and produces one orientation matrix per cubie
//! for a renderer to apply to that cubie's static geometry.

pub mod assembly;
pub mod config;
pub mod controller;
pub mod cubie;
pub mod matrix;
pub mod notation;
pub mod puzzle;
pub mod quaternion;
pub mod vector;

/// Number of cubies (and slots) in the puzzle.
pub const NUM_CUBIES: usize = 27;

pub use assembly::CubeAssembly;
pub use config::{ConfigError, EngineConfig};
pub use controller::{Axis, NudgeDirection, Request, RotationController, TickOutcome, ViewNudge};
pub use cubie::{CubieGeometry, Face};
pub use matrix::Matrix4;
pub use puzzle::{FaceTurn, PuzzleState, TurnPlan};
pub use quaternion::Quaternion;
pub use vector::Vector3;
