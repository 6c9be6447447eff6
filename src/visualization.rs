//! Interactive 3D viewer using kiss3d.
//!
//! kiss3d draws one box per cubie body and one flat box per sticker, all
//! sized from the cubie meshes. Each frame a node is placed at
//! `view * transform[cubie] * local` and rotated by `view * pose[cubie]`.

use std::time::Instant;

use kiss3d::prelude::*;

use rubik::{
    CubeAssembly, CubieGeometry, EngineConfig, Face, FaceTurn, NudgeDirection, Quaternion,
    RotationController, TickOutcome, ViewNudge,
};

/// Key bindings shown in the window title and on stdout.
pub const CONTROLS: &str = "[U F R L D B] turn (+Shift inverse), \
    [Arrows] rotate view (hold to repeat), [Space] reset view";

/// Sticker size relative to the face it sits on.
const STICKER_SCALE: f32 = 0.8;

/// Sticker thickness relative to the cubie edge.
const STICKER_THICKNESS: f32 = 0.05;

/// A kiss3d node attached to one point of one cubie.
struct RenderedPart {
    node: SceneNode3d,
    cubie: usize,
    /// Point in the cubie's home geometry that the node tracks.
    local: rubik::Vector3,
}

fn to_color(rgb: rubik::Vector3) -> Color {
    Color::new(rgb.x, rgb.y, rgb.z, 1.0)
}

fn to_vec3(v: rubik::Vector3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn to_quat(q: Quaternion) -> Quat {
    Quat::from_xyzw(q.x, q.y, q.z, q.w)
}

/// World position and rotation of a node tracking `local` on a cubie.
fn node_pose(
    view: Quaternion,
    pose: Quaternion,
    transform: &rubik::Matrix4,
    local: rubik::Vector3,
) -> (rubik::Vector3, Quaternion) {
    let position = local.transform(&(view.to_matrix() * *transform));
    (position, (view * pose).normalized())
}

/// Extent of a mesh face along each axis.
fn face_extent(geometry: &CubieGeometry, face: Face) -> rubik::Vector3 {
    let quad = geometry.face(face);
    let axis = |get: fn(&rubik::Vector3) -> f32| {
        let (min, max) = quad
            .iter()
            .map(get)
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        max - min
    };
    rubik::Vector3::new(axis(|v| v.x), axis(|v| v.y), axis(|v| v.z))
}

/// Center and box size of the sticker on `face`, lying flat on the face
/// and standing off it along `normal`.
fn sticker_box(
    geometry: &CubieGeometry,
    face: Face,
    normal: rubik::Vector3,
    edge: f32,
) -> (rubik::Vector3, rubik::Vector3) {
    let thickness = edge * STICKER_THICKNESS;
    let across = face_extent(geometry, face) * STICKER_SCALE;
    let through = rubik::Vector3::new(normal.x.abs(), normal.y.abs(), normal.z.abs()) * thickness;
    let center = geometry.face_center(face) + normal * (thickness / 2.0);
    (center, across + through)
}

/// Screen-space direction for a face key, before accounting for the view.
fn key_direction(key: kiss3d::event::Key) -> Option<rubik::Vector3> {
    use kiss3d::event::Key;
    match key {
        Key::U => Some(rubik::Vector3::Y),
        Key::D => Some(-rubik::Vector3::Y),
        Key::R => Some(rubik::Vector3::X),
        Key::L => Some(-rubik::Vector3::X),
        Key::F => Some(rubik::Vector3::Z),
        Key::B => Some(-rubik::Vector3::Z),
        _ => None,
    }
}

fn key_nudge(key: kiss3d::event::Key) -> Option<NudgeDirection> {
    use kiss3d::event::Key;
    match key {
        Key::Up => Some(NudgeDirection::Up),
        Key::Down => Some(NudgeDirection::Down),
        Key::Left => Some(NudgeDirection::Left),
        Key::Right => Some(NudgeDirection::Right),
        _ => None,
    }
}

/// Starts the held arrow's nudge again once the previous one has settled
/// and no queued request took over.
fn repeat_held_nudge(
    controller: &mut RotationController,
    outcome: TickOutcome,
    held: Option<ViewNudge>,
    now: f64,
) -> bool {
    match held {
        Some(nudge) if outcome == TickOutcome::ViewSettled && controller.is_idle() => {
            controller.request_nudge(nudge, now)
        }
        _ => false,
    }
}

/// Adds a body node for every cubie and a node for every sticker.
fn build_scene(scene: &mut SceneNode3d, assembly: &CubeAssembly) -> Vec<RenderedPart> {
    let body = face_extent(&assembly.cubies[0], Face::Front);
    let edge = body.x;

    let mut parts = Vec::new();
    for (cubie, geometry) in assembly.cubies.iter().enumerate() {
        let local = geometry.center();
        let node = scene
            .add_cube(edge, edge, edge)
            .set_color(to_color(rubik::assembly::palette::INSIDE))
            .set_position(to_vec3(local));
        parts.push(RenderedPart { node, cubie, local });

        for face in assembly.stickers(cubie) {
            let normal = assembly.normals.face(face)[0];
            let (local, size) = sticker_box(geometry, face, normal, edge);
            let node = scene
                .add_cube(size.x, size.y, size.z)
                .set_color(to_color(assembly.colors[cubie].face(face)[0]))
                .set_position(to_vec3(local));
            parts.push(RenderedPart { node, cubie, local });
        }
    }
    parts
}

/// Opens the viewer and runs until the window is closed.
pub fn display(config: EngineConfig) {
    pollster::block_on(display_async(config));
}

async fn display_async(config: EngineConfig) {
    let assembly = CubeAssembly::new(config.spacing, config.gap);
    let nudge_angle = config.nudge_angle;
    let mut controller = RotationController::new(config);

    let mut window = Window::new(&format!("rubik - {CONTROLS}")).await;

    let mut camera = OrbitCamera3d::default();
    camera.set_dist(4.0);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(5.0, 5.0, 5.0));

    let mut parts = build_scene(&mut scene, &assembly);
    let clock = Instant::now();
    let mut shift_held = false;
    let mut arrow_held: Option<NudgeDirection> = None;
    let mut turns_done = 0usize;

    loop {
        let now = clock.elapsed().as_secs_f64();

        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, _) = event.value {
                use kiss3d::event::{Action, Key};
                if matches!(key, Key::LShift | Key::RShift) {
                    shift_held = action == Action::Press;
                    continue;
                }
                if let Some(direction) = key_nudge(key) {
                    match action {
                        // key repeat from the OS is ignored, holding is handled on settle
                        Action::Press if arrow_held != Some(direction) => {
                            arrow_held = Some(direction);
                            controller
                                .request_nudge(ViewNudge::standard(direction, nudge_angle), now);
                        }
                        Action::Release if arrow_held == Some(direction) => arrow_held = None,
                        _ => {}
                    }
                    continue;
                }
                if action != Action::Press {
                    continue;
                }
                if key == Key::Space {
                    controller.reset_view();
                } else if let Some(direction) = key_direction(key) {
                    let face = Face::facing(direction, &controller.view());
                    controller.request_turn(FaceTurn::new(face, shift_held), now);
                }
            }
        }

        let outcome = controller.tick(now);
        if let TickOutcome::Committed(turn) = outcome {
            turns_done += 1;
            log::info!("turn {turns_done}: {turn}");
        }
        let held = arrow_held.map(|direction| ViewNudge::standard(direction, nudge_angle));
        repeat_held_nudge(&mut controller, outcome, held, now);

        let view = controller.view();
        for part in &mut parts {
            let (position, rotation) = node_pose(
                view,
                controller.poses()[part.cubie],
                &controller.transforms()[part.cubie],
                part.local,
            );
            part.node.set_position(to_vec3(position));
            part.node.set_rotation(to_quat(rotation));
        }

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn assembly() -> CubeAssembly {
        let config = EngineConfig::default();
        CubeAssembly::new(config.spacing, config.gap)
    }

    /// Offset of `other`'s body center seen from inside `cubie`'s rotated box.
    fn local_offset(
        controller: &RotationController,
        assembly: &CubeAssembly,
        cubie: usize,
        other: usize,
    ) -> rubik::Vector3 {
        let pose_of = |c: usize| {
            node_pose(
                controller.view(),
                controller.poses()[c],
                &controller.transforms()[c],
                assembly.cubies[c].center(),
            )
        };
        let (position, rotation) = pose_of(cubie);
        let (other_position, _) = pose_of(other);
        (other_position - position).rotate(&rotation.conjugate())
    }

    #[test]
    fn test_neighbour_boxes_do_not_overlap_under_view() {
        let assembly = assembly();
        let edge = face_extent(&assembly.cubies[0], Face::Front).x;
        let controller = RotationController::new(EngineConfig::default());

        // the default view is yawed, yet neighbours stay a full spacing apart
        // along the rotated box axis
        let offset = local_offset(&controller, &assembly, 0, 1);
        let expected = rubik::Vector3::new(assembly.spacing, 0.0, 0.0);
        assert_abs_diff_eq!(offset, expected, epsilon = 1e-5);
        assert!(offset.x.abs() > edge);
    }

    #[test]
    fn test_nodes_turn_with_their_cubie() {
        let assembly = assembly();
        let mut controller = RotationController::new(EngineConfig::default());
        controller.request_turn(FaceTurn::forward(Face::Front), 0.0);
        controller.tick(0.13);

        // cubies 0 and 1 turn together, so their relative layout is rigid
        let offset = local_offset(&controller, &assembly, 0, 1);
        let expected = rubik::Vector3::new(assembly.spacing, 0.0, 0.0);
        assert_abs_diff_eq!(offset, expected, epsilon = 1e-4);

        let (_, rotation) = node_pose(
            controller.view(),
            controller.poses()[0],
            &controller.transforms()[0],
            rubik::Vector3::ZERO,
        );
        assert!(!rotation.same_rotation(&controller.view(), 1e-3));
    }

    #[test]
    fn test_sticker_box_lies_flat_on_face() {
        let assembly = assembly();
        let geometry = &assembly.cubies[8];
        let edge = face_extent(geometry, Face::Front).x;
        let normal = assembly.normals.face(Face::Top)[0];
        let (center, size) = sticker_box(geometry, Face::Top, normal, edge);

        assert_abs_diff_eq!(size.x, edge * STICKER_SCALE, epsilon = 1e-6);
        assert_abs_diff_eq!(size.y, edge * STICKER_THICKNESS, epsilon = 1e-6);
        assert_abs_diff_eq!(size.z, edge * STICKER_SCALE, epsilon = 1e-6);
        let top = geometry.face_center(Face::Top);
        assert!(center.y > top.y);
        assert_abs_diff_eq!(center.x, top.x, epsilon = 1e-6);
    }

    #[test]
    fn test_held_arrow_repeats_after_settle() {
        let config = EngineConfig::default();
        let nudge = ViewNudge::standard(NudgeDirection::Right, config.nudge_angle);
        let mut controller = RotationController::new(config);
        let initial = controller.view();

        controller.request_nudge(nudge, 0.0);
        let outcome = controller.tick(0.1);
        assert!(!repeat_held_nudge(&mut controller, outcome, Some(nudge), 0.1));

        let outcome = controller.tick(0.31);
        assert_eq!(outcome, TickOutcome::ViewSettled);
        assert!(repeat_held_nudge(&mut controller, outcome, Some(nudge), 0.31));
        assert_eq!(controller.tick(0.62), TickOutcome::ViewSettled);
        let expected = Quaternion::from_rotation_y(2.0 * nudge.angle) * initial;
        assert_abs_diff_eq!(controller.view(), expected, epsilon = 1e-5);

        // released: the view stays put
        assert!(!repeat_held_nudge(&mut controller, TickOutcome::ViewSettled, None, 0.62));
        assert!(controller.is_idle());
    }

    #[test]
    fn test_held_arrow_waits_behind_queued_requests() {
        let config = EngineConfig::default();
        let nudge = ViewNudge::standard(NudgeDirection::Up, config.nudge_angle);
        let mut controller = RotationController::new(config);

        controller.request_nudge(nudge, 0.0);
        controller.request_turn(FaceTurn::forward(Face::Top), 0.0);
        let outcome = controller.tick(0.31);
        assert_eq!(outcome, TickOutcome::ViewSettled);
        assert!(!repeat_held_nudge(&mut controller, outcome, Some(nudge), 0.31));
        assert_eq!(controller.pending(), 0);
    }
}
