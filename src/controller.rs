//! Time-driven sequencing of face turns and view nudges.
//!
//! The controller owns the [`PuzzleState`] and is stepped once per rendered
//! frame with the current time. At most one animation runs at a time, either
//! a face turn or a whole-puzzle view nudge; requests that arrive meanwhile
//! wait in a small FIFO queue, and requests beyond its capacity are dropped.
//! A started animation always runs to completion.

use std::collections::VecDeque;

use log::{debug, trace};

use crate::config::EngineConfig;
use crate::matrix::Matrix4;
use crate::puzzle::{FaceTurn, PuzzleState, TurnPlan};
use crate::quaternion::Quaternion;
use crate::vector::Vector3;
use crate::NUM_CUBIES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const fn vector(self) -> Vector3 {
        match self {
            Axis::X => Vector3::X,
            Axis::Y => Vector3::Y,
            Axis::Z => Vector3::Z,
        }
    }
}

/// Screen direction of an arrow-key style nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Rotation of the whole puzzle about a fixed axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewNudge {
    pub axis: Axis,
    /// Signed angle in radians.
    pub angle: f32,
}

impl ViewNudge {
    /// The nudge for an arrow direction: tilting about X for up/down and
    /// spinning about Y for left/right.
    pub fn standard(direction: NudgeDirection, angle: f32) -> Self {
        let (axis, angle) = match direction {
            NudgeDirection::Up => (Axis::X, -angle),
            NudgeDirection::Down => (Axis::X, angle),
            NudgeDirection::Left => (Axis::Y, -angle),
            NudgeDirection::Right => (Axis::Y, angle),
        };
        Self { axis, angle }
    }

    pub fn rotation(self) -> Quaternion {
        Quaternion::from_axis_angle(self.axis.vector(), self.angle)
    }
}

/// Anything the controller can animate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    Turn(FaceTurn),
    Nudge(ViewNudge),
}

/// What a call to [`RotationController::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing is animating.
    Idle,
    /// An animation advanced by one frame.
    Animating,
    /// A face turn finished and its permutation was committed.
    Committed(FaceTurn),
    /// A view nudge reached its target.
    ViewSettled,
}

#[derive(Debug, Clone)]
enum Animation {
    Idle,
    FaceTurning {
        plan: TurnPlan,
        start_time: f64,
    },
    ViewTurning {
        start: Quaternion,
        target: Quaternion,
        start_time: f64,
    },
}

#[derive(Debug, Clone)]
pub struct RotationController {
    config: EngineConfig,
    puzzle: PuzzleState,
    /// Whole-puzzle orientation, as seen by the camera.
    view: Quaternion,
    animation: Animation,
    queue: VecDeque<Request>,
}

impl RotationController {
    /// Creates a controller for a freshly assembled puzzle.
    ///
    /// `config` must already be validated.
    pub fn new(config: EngineConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid config: {config:?}");
        Self {
            view: Self::initial_view(&config),
            queue: VecDeque::with_capacity(config.queue_capacity),
            config,
            puzzle: PuzzleState::new(),
            animation: Animation::Idle,
        }
    }

    fn initial_view(config: &EngineConfig) -> Quaternion {
        Quaternion::from_rotation_y(config.initial_view_yaw)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn puzzle(&self) -> &PuzzleState {
        &self.puzzle
    }

    /// Per-cubie transforms for the current frame.
    pub fn transforms(&self) -> &[Matrix4; NUM_CUBIES] {
        self.puzzle.transforms()
    }

    /// Per-cubie rotations for the current frame.
    pub fn poses(&self) -> &[Quaternion; NUM_CUBIES] {
        self.puzzle.poses()
    }

    /// Current whole-puzzle orientation, including a nudge in flight.
    pub fn view(&self) -> Quaternion {
        self.view
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.animation, Animation::Idle)
    }

    /// Number of requests waiting behind the running animation.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn request_turn(&mut self, turn: FaceTurn, now: f64) -> bool {
        self.request(Request::Turn(turn), now)
    }

    pub fn request_nudge(&mut self, nudge: ViewNudge, now: f64) -> bool {
        self.request(Request::Nudge(nudge), now)
    }

    /// Starts `request` right away if nothing is animating, otherwise queues
    /// it. Returns `false` if the queue was full and the request was dropped.
    pub fn request(&mut self, request: Request, now: f64) -> bool {
        if self.is_idle() {
            self.start(request, now);
            return true;
        }
        if self.queue.len() >= self.config.queue_capacity {
            debug!("queue full, dropping {request:?}");
            return false;
        }
        self.queue.push_back(request);
        true
    }

    /// Snaps the view back to its initial orientation. Ignored while any
    /// animation is in flight.
    pub fn reset_view(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.view = Self::initial_view(&self.config);
        true
    }

    fn start(&mut self, request: Request, now: f64) {
        self.animation = match request {
            Request::Turn(turn) => {
                debug!("starting turn {turn}");
                Animation::FaceTurning {
                    plan: self.puzzle.begin_turn(turn),
                    start_time: now,
                }
            }
            Request::Nudge(nudge) => {
                debug!("starting view nudge {nudge:?}");
                Animation::ViewTurning {
                    start: self.view,
                    target: (nudge.rotation() * self.view).normalized(),
                    start_time: now,
                }
            }
        };
    }

    /// Starts the oldest queued request, if any.
    fn start_next(&mut self, now: f64) {
        if let Some(request) = self.queue.pop_front() {
            self.start(request, now);
        }
    }

    /// Advances the running animation to time `now` (seconds).
    ///
    /// A turn whose time is up is committed in this call, even if frames
    /// were skipped, and the next queued request starts at `now`.
    pub fn tick(&mut self, now: f64) -> TickOutcome {
        match &self.animation {
            Animation::Idle => TickOutcome::Idle,
            Animation::FaceTurning { plan, start_time } => {
                let t = ((now - start_time) / self.config.turn_duration as f64) as f32;
                if t >= 1.0 {
                    let plan = plan.clone();
                    self.puzzle.commit_turn(&plan);
                    debug!("committed turn {}", plan.turn);
                    self.animation = Animation::Idle;
                    self.start_next(now);
                    TickOutcome::Committed(plan.turn)
                } else {
                    trace!("turn {} at t = {t:.3}", plan.turn);
                    self.puzzle.apply_interpolated(plan, t);
                    TickOutcome::Animating
                }
            }
            &Animation::ViewTurning {
                start,
                target,
                start_time,
            } => {
                let t = ((now - start_time) / self.config.view_duration as f64) as f32;
                if t >= 1.0 {
                    self.view = target;
                    self.animation = Animation::Idle;
                    self.start_next(now);
                    TickOutcome::ViewSettled
                } else {
                    trace!("view nudge at t = {t:.3}");
                    self.view = Quaternion::slerp(&start, &target, t.max(0.0));
                    TickOutcome::Animating
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_8;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::cubie::Face;

    const FRAME: f64 = 1.0 / 60.0;

    fn controller() -> RotationController {
        RotationController::new(EngineConfig::default())
    }

    /// Ticks at 60 fps from `from` until idle, returning every commit and the
    /// time at which the controller went idle.
    fn run_until_idle(controller: &mut RotationController, from: f64) -> (Vec<FaceTurn>, f64) {
        let mut committed = Vec::new();
        let mut now = from;
        while !controller.is_idle() {
            now += FRAME;
            if let TickOutcome::Committed(turn) = controller.tick(now) {
                committed.push(turn);
            }
            assert!(now < from + 60.0, "animation never finished");
        }
        (committed, now)
    }

    #[test]
    fn test_idle_request_starts_immediately() {
        let mut controller = controller();
        assert_eq!(controller.tick(0.0), TickOutcome::Idle);
        assert!(controller.request_turn(FaceTurn::forward(Face::Front), 0.0));
        assert!(!controller.is_idle());
        assert_eq!(controller.pending(), 0);
    }

    #[test]
    fn test_turn_animates_then_commits() {
        let mut controller = controller();
        controller.request_turn(FaceTurn::forward(Face::Top), 1.0);

        assert_eq!(controller.tick(1.2), TickOutcome::Animating);
        // halfway through the turn the slot table is still untouched
        assert_eq!(controller.puzzle().occupants(), PuzzleState::new().occupants());
        let halfway = Quaternion::from_rotation_y(-FRAC_PI_8 * 2.0).to_matrix();
        assert_abs_diff_eq!(controller.transforms()[6], halfway, epsilon = 1e-4);

        let turn = FaceTurn::forward(Face::Top);
        assert_eq!(controller.tick(1.5), TickOutcome::Committed(turn));
        assert!(controller.is_idle());

        let mut expected = PuzzleState::new();
        expected.apply_turn(turn);
        assert_eq!(controller.puzzle().occupants(), expected.occupants());
    }

    #[test]
    fn test_stalled_frame_commits_exact_target() {
        let mut controller = controller();
        let turn = FaceTurn::new(Face::Right, true);
        controller.request_turn(turn, 0.0);
        controller.tick(0.1);
        assert_eq!(controller.tick(25.0), TickOutcome::Committed(turn));

        let mut expected = PuzzleState::new();
        expected.apply_turn(turn);
        assert_eq!(controller.transforms(), expected.transforms());
    }

    #[test]
    fn test_queue_drops_overflow_and_keeps_order() {
        let mut controller = controller();
        let first = FaceTurn::forward(Face::Front);
        let queued = [
            FaceTurn::forward(Face::Right),
            FaceTurn::new(Face::Left, true),
            FaceTurn::forward(Face::Back),
            FaceTurn::new(Face::Bottom, true),
        ];
        let dropped = FaceTurn::forward(Face::Top);

        assert!(controller.request_turn(first, 0.0));
        for turn in queued {
            assert!(controller.request_turn(turn, 0.01));
        }
        assert!(!controller.request_turn(dropped, 0.02));
        assert_eq!(controller.pending(), 4);

        let (committed, _) = run_until_idle(&mut controller, 0.02);
        let mut expected_order = vec![first];
        expected_order.extend(queued);
        assert_eq!(committed, expected_order);

        let mut expected = PuzzleState::new();
        for turn in expected_order {
            expected.apply_turn(turn);
        }
        assert_eq!(controller.puzzle().occupants(), expected.occupants());
        assert_eq!(controller.pending(), 0);
    }

    #[test]
    fn test_view_nudge_rotates_whole_puzzle() {
        let mut controller = controller();
        let initial = controller.view();
        let nudge = ViewNudge::standard(NudgeDirection::Right, FRAC_PI_8);
        controller.request_nudge(nudge, 0.0);

        assert_eq!(controller.tick(0.15), TickOutcome::Animating);
        let expected_mid = Quaternion::from_rotation_y(FRAC_PI_8 / 2.0) * initial;
        assert_abs_diff_eq!(controller.view(), expected_mid, epsilon = 1e-4);

        assert_eq!(controller.tick(0.31), TickOutcome::ViewSettled);
        let expected = Quaternion::from_rotation_y(FRAC_PI_8) * initial;
        assert_abs_diff_eq!(controller.view(), expected, epsilon = 1e-5);
        // the slots never move for a view nudge
        assert_eq!(controller.puzzle().occupants(), PuzzleState::new().occupants());
    }

    #[test]
    fn test_tracks_share_the_queue() {
        let mut controller = controller();
        let turn = FaceTurn::forward(Face::Front);
        let nudge = ViewNudge::standard(NudgeDirection::Up, FRAC_PI_8);

        controller.request_nudge(nudge, 0.0);
        assert!(controller.request_turn(turn, 0.0));
        assert_eq!(controller.pending(), 1);

        // the turn waits for the nudge to settle
        assert_eq!(controller.tick(0.2), TickOutcome::Animating);
        assert_eq!(controller.puzzle().transforms()[0], Matrix4::IDENTITY);
        assert_eq!(controller.tick(0.31), TickOutcome::ViewSettled);
        assert!(!controller.is_idle());
        assert_eq!(controller.pending(), 0);

        assert_eq!(controller.tick(0.75), TickOutcome::Committed(turn));
        assert!(controller.is_idle());
    }

    #[test]
    fn test_nudge_queued_behind_turn() {
        let mut controller = controller();
        controller.request_turn(FaceTurn::forward(Face::Back), 0.0);
        controller.request_nudge(ViewNudge::standard(NudgeDirection::Left, FRAC_PI_8), 0.1);
        let before = controller.view();

        controller.tick(0.2);
        assert_eq!(controller.view(), before);
        let (committed, _) = run_until_idle(&mut controller, 0.2);
        assert_eq!(committed, vec![FaceTurn::forward(Face::Back)]);
        assert_abs_diff_eq!(
            controller.view(),
            Quaternion::from_rotation_y(-FRAC_PI_8) * before,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_reset_view() {
        let mut controller = controller();
        let initial = controller.view();
        controller.request_nudge(ViewNudge::standard(NudgeDirection::Down, FRAC_PI_8), 0.0);
        assert!(!controller.reset_view());
        controller.tick(1.0);
        assert_ne!(controller.view(), initial);
        assert!(controller.reset_view());
        assert_eq!(controller.view(), initial);
    }

    #[test]
    fn test_reset_view_waits_for_face_turn() {
        let mut controller = controller();
        let initial = controller.view();
        controller.request_nudge(ViewNudge::standard(NudgeDirection::Left, FRAC_PI_8), 0.0);
        controller.request_turn(FaceTurn::forward(Face::Front), 0.0);
        assert_eq!(controller.tick(0.31), TickOutcome::ViewSettled);

        assert!(!controller.reset_view());
        assert_ne!(controller.view(), initial);
        assert!(matches!(controller.tick(0.75), TickOutcome::Committed(_)));
        assert!(controller.reset_view());
        assert_eq!(controller.view(), initial);
    }

    #[test]
    fn test_nudge_requested_on_settle_composes() {
        let mut controller = controller();
        let initial = controller.view();
        let nudge = ViewNudge::standard(NudgeDirection::Up, FRAC_PI_8);

        controller.request_nudge(nudge, 0.0);
        assert_eq!(controller.tick(0.31), TickOutcome::ViewSettled);
        assert!(controller.is_idle());
        assert_eq!(controller.pending(), 0);

        // a held key asks again as soon as the previous nudge settles
        assert!(controller.request_nudge(nudge, 0.31));
        assert_eq!(controller.tick(0.62), TickOutcome::ViewSettled);
        let expected = Quaternion::from_rotation_x(-2.0 * FRAC_PI_8) * initial;
        assert_abs_diff_eq!(controller.view(), expected, epsilon = 1e-5);
    }

    #[test]
    fn test_poses_follow_the_turn() {
        let mut controller = controller();
        let turn = FaceTurn::forward(Face::Right);
        controller.request_turn(turn, 0.0);
        controller.tick(0.2);
        for (pose, transform) in controller.poses().iter().zip(controller.transforms()) {
            assert_abs_diff_eq!(pose.to_matrix(), *transform, epsilon = 1e-6);
        }
        assert!(!controller.poses()[2].same_rotation(&Quaternion::IDENTITY, 1e-3));
    }

    #[test]
    fn test_custom_durations() {
        let config = EngineConfig {
            turn_duration: 1.0,
            ..EngineConfig::default()
        };
        let mut controller = RotationController::new(config);
        controller.request_turn(FaceTurn::forward(Face::Front), 0.0);
        assert_eq!(controller.tick(0.5), TickOutcome::Animating);
        assert!(matches!(controller.tick(1.0), TickOutcome::Committed(_)));
    }
}
