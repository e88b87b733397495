// Shared state, scene composition, camera and mesh helpers.

use app_core::mesh::{cube, cylinder, uv_sphere};
use app_core::*;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn small_scene() -> TreeScene {
    let mut rng = StdRng::seed_from_u64(7);
    TreeScene::with_params(
        FoliageParams {
            count: 100,
            ..FoliageParams::default()
        },
        OrnamentParams {
            count: 30,
            ..OrnamentParams::default()
        },
        &mut rng,
    )
}

#[test]
fn state_starts_formed_and_centered() {
    let state = SharedState::new();
    let snap = state.snapshot();
    assert_eq!(snap.mode, Mode::Formed);
    assert_eq!(snap.pan, PanOffset::ZERO);
    assert_eq!(snap.revision, 0);
}

#[test]
fn state_revision_only_moves_on_change() {
    let state = SharedState::new();
    let update = GestureUpdate {
        mode: Mode::Chaos,
        pan: PanOffset::new(1.0, -0.5),
    };
    assert!(state.apply(update));
    assert_eq!(state.revision(), 1);
    assert!(!state.apply(update), "same update is not a change");
    assert_eq!(state.revision(), 1);
    assert!(state.apply(GestureUpdate {
        mode: Mode::Chaos,
        pan: PanOffset::new(2.0, -0.5),
    }));
    assert_eq!(state.revision(), 2);
    assert_eq!(state.pan(), PanOffset::new(2.0, -0.5));
}

#[test]
fn last_write_wins_between_renders() {
    let state = SharedState::new();
    let reader = state.clone();
    state.apply(GestureUpdate {
        mode: Mode::Chaos,
        pan: PanOffset::new(3.0, 0.0),
    });
    state.apply(GestureUpdate {
        mode: Mode::Formed,
        pan: PanOffset::new(-1.0, 1.0),
    });
    let snap = reader.snapshot();
    assert_eq!(snap.mode, Mode::Formed);
    assert_eq!(snap.pan, PanOffset::new(-1.0, 1.0));
}

#[test]
fn mode_targets_and_auto_rotation() {
    assert_eq!(Mode::Formed.target_progress(), 0.0);
    assert_eq!(Mode::Chaos.target_progress(), 1.0);
    assert!(Mode::Formed.auto_rotates());
    assert!(!Mode::Chaos.auto_rotates());
    assert_eq!(Mode::Chaos.to_string(), "CHAOS");
}

#[test]
fn scene_moves_group_to_pan_offset() {
    let mut scene = small_scene();
    let state = SharedState::new();
    assert!(scene.update(&state.snapshot(), 0.0, 0.0), "first update applies state");
    assert_eq!(scene.group_offset(), Vec3::ZERO);
    assert!(!scene.update(&state.snapshot(), 0.016, 0.016));

    state.apply(GestureUpdate {
        mode: Mode::Chaos,
        pan: PanOffset::new(2.5, -1.0),
    });
    assert!(scene.update(&state.snapshot(), 0.016, 0.032));
    assert_eq!(scene.group_offset(), Vec3::new(2.5, -1.0, 0.0));
    let t = scene.group_transform().transform_point3(Vec3::ZERO);
    assert!((t - Vec3::new(2.5, -1.0, 0.0)).length() < 1e-6);
    assert!(scene.foliage.progress() > 0.0);
    assert!(scene.ornaments.progress() > 0.0);
}

#[test]
fn scene_holds_trunk_and_pedestal() {
    let scene = small_scene();
    let names: Vec<&str> = scene.statics.iter().map(|s| s.name).collect();
    assert_eq!(names, ["trunk", "pedestal"]);
    let trunk = &scene.statics[0];
    assert_eq!(trunk.translation, Vec3::new(0.0, -2.0, 0.0));
    assert!((trunk.instance().translation() - trunk.translation).length() < 1e-6);
    assert_eq!(scene.statics[1].translation, Vec3::new(0.0, -4.5, 0.0));
}

#[test]
fn orbit_camera_starts_at_framing_position() {
    let cam = OrbitCamera::default();
    assert!((cam.eye() - camera_position_vec3()).length() < 1e-4);
    let c = cam.to_camera(16.0 / 9.0);
    let clip = c.view_proj() * Vec3::ZERO.extend(1.0);
    // origin projects to the screen center
    assert!((clip.x / clip.w).abs() < 1e-4);
}

#[test]
fn orbit_camera_auto_rotates_only_when_enabled() {
    let mut cam = OrbitCamera::default();
    let start = cam.azimuth;
    cam.auto_rotate = false;
    cam.update(1.0);
    assert_eq!(cam.azimuth, start);
    cam.auto_rotate = true;
    cam.update(1.0);
    let expected = std::f32::consts::TAU / 60.0 * AUTO_ROTATE_SPEED;
    assert!((cam.azimuth - start - expected).abs() < 1e-5);
    // distance to the target is preserved while orbiting
    assert!((cam.eye().length() - cam.distance).abs() < 1e-3);
}

#[test]
fn orbit_zoom_is_clamped() {
    let mut cam = OrbitCamera::default();
    cam.zoom(500.0);
    assert_eq!(cam.distance, ZOOM_MIN_DISTANCE);
    cam.zoom(-500.0);
    assert_eq!(cam.distance, ZOOM_MAX_DISTANCE);
}

#[test]
fn meshes_have_valid_indices_and_unit_normals() {
    for mesh in [cube(1.0), uv_sphere(1.0, 16, 16), cylinder(0.5, 0.7, 4.0, 32)] {
        assert!(mesh.triangle_count() > 0);
        assert_eq!(mesh.indices.len() % 3, 0);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        for v in &mesh.vertices {
            assert!((Vec3::from(v.normal).length() - 1.0).abs() < 1e-4);
        }
    }
}

#[test]
fn sphere_vertices_lie_on_radius_and_cylinder_spans_height() {
    let sphere = uv_sphere(0.5, 8, 8);
    for v in &sphere.vertices {
        assert!((Vec3::from(v.position).length() - 0.5).abs() < 1e-4);
    }
    let cyl = cylinder(4.0, 5.0, 1.0, 64);
    let (lo, hi) = cyl
        .vertices
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), v| {
            (lo.min(v.position[1]), hi.max(v.position[1]))
        });
    assert_eq!((lo, hi), (-0.5, 0.5));
}

#[test]
fn frame_clock_starts_with_zero_dt() {
    let mut clock = FrameClock::new();
    let first = clock.tick();
    assert_eq!(first.dt, 0.0);
    let second = clock.tick();
    assert!(second.dt >= 0.0);
    assert!(second.elapsed >= first.elapsed);
}
