// Foliage and ornament field behavior: generation bounds, interpolation
// endpoints, smoothing convergence and the ornament partition.

use app_core::*;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

const EPS: f32 = 1e-4;

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn small_foliage(count: usize) -> FoliageField {
    let params = FoliageParams {
        count,
        ..FoliageParams::default()
    };
    FoliageField::generate(params, &mut rng())
}

#[test]
fn progress_converges_without_overshoot() {
    for (rate, target) in [(2.5, 1.0), (2.0, 1.0), (2.5, 0.0)] {
        let mut p = Progress::new(rate);
        if target == 0.0 {
            for _ in 0..600 {
                p.step(1.0, 1.0 / 60.0);
            }
        }
        let mut prev_gap = (target - p.value()).abs();
        for _ in 0..300 {
            let v = p.step(target, 1.0 / 60.0);
            assert!((0.0..=1.0).contains(&v));
            let gap = (target - v).abs();
            assert!(gap <= prev_gap, "moved away from target");
            prev_gap = gap;
        }
        assert!(prev_gap < 0.01);
    }
}

#[test]
fn progress_moves_strictly_toward_target_early_on() {
    let mut p = Progress::new(FOLIAGE_SMOOTHING_RATE);
    let mut prev = p.value();
    for _ in 0..30 {
        let v = p.step(1.0, 1.0 / 60.0);
        assert!(v > prev);
        prev = v;
    }
}

#[test]
fn large_dt_snaps_to_target_but_never_past_it() {
    let mut p = Progress::new(2.5);
    assert_eq!(p.step(1.0, 10.0), 1.0);
    assert_eq!(p.step(0.0, 0.4), 0.0);
}

#[test]
fn negative_dt_does_not_move_progress() {
    let mut p = Progress::new(2.5);
    p.step(1.0, 0.1);
    let before = p.value();
    assert_eq!(p.step(0.0, -1.0), before);
}

#[test]
fn two_seconds_of_chaos_gets_foliage_past_099() {
    let mut foliage = small_foliage(16);
    assert_eq!(foliage.progress(), 0.0);
    let dt = 1.0 / 60.0;
    for i in 0..120 {
        foliage.tick(Mode::Chaos, dt, i as f32 * dt);
    }
    assert!(foliage.progress() > 0.99, "got {}", foliage.progress());
}

#[test]
fn foliage_and_ornaments_desynchronize() {
    let mut foliage = small_foliage(8);
    let mut ornaments = OrnamentField::generate(
        OrnamentParams {
            count: 20,
            ..OrnamentParams::default()
        },
        &mut rng(),
    );
    let dt = 1.0 / 60.0;
    for i in 0..30 {
        foliage.tick(Mode::Chaos, dt, i as f32 * dt);
        ornaments.tick(Mode::Chaos, dt, i as f32 * dt);
    }
    assert!(foliage.progress() > ornaments.progress());
}

#[test]
fn chaos_points_stay_inside_the_sphere() {
    let foliage = small_foliage(5_000);
    for p in foliage.particles() {
        assert!(p.chaos.length() <= CHAOS_RADIUS + EPS);
    }
    let ornaments = OrnamentField::generate(OrnamentParams::default(), &mut rng());
    for o in ornaments.ornaments() {
        assert!(o.chaos.length() <= CHAOS_RADIUS * ORNAMENT_CHAOS_SCALE + EPS);
    }
}

#[test]
fn target_points_fill_the_centered_cone() {
    let foliage = small_foliage(5_000);
    let half = TREE_HEIGHT / 2.0;
    for p in foliage.particles() {
        assert!(p.target.y >= -half && p.target.y < half, "y={}", p.target.y);
        let from_base = p.target.y + half;
        let r = (1.0 - from_base / TREE_HEIGHT) * TREE_RADIUS;
        let max = FOLIAGE_THICKNESS.1;
        assert!(p.target.x.abs() <= r * max + EPS);
        assert!(p.target.z.abs() <= r * max + EPS);
        assert!(p.size >= FOLIAGE_SIZE.0 && p.size < FOLIAGE_SIZE.1);
    }
}

#[test]
fn ornaments_sit_on_the_cone_volume_radius() {
    let ornaments = OrnamentField::generate(OrnamentParams::default(), &mut rng());
    for o in ornaments.ornaments() {
        let from_base = o.target.y + TREE_HEIGHT / 2.0;
        let r = (1.0 - from_base / TREE_HEIGHT) * TREE_RADIUS;
        let radial = (o.target.x * o.target.x + o.target.z * o.target.z).sqrt();
        assert!((radial - r).abs() < 1e-3);
    }
}

#[test]
fn foliage_endpoints_at_zero_and_one() {
    let foliage = small_foliage(200);
    for p in foliage.particles() {
        // below the drift threshold the position is exactly the target
        assert_eq!(foliage_position(&p, 0.0, 12.3), p.target);
        let at_one = foliage_position(&p, 1.0, 0.0);
        let diff = at_one - p.chaos;
        assert!(diff.x.abs() <= FOLIAGE_NOISE_AMPLITUDE + EPS);
        assert!(diff.y.abs() <= FOLIAGE_NOISE_AMPLITUDE + EPS);
        assert!(diff.z.abs() <= FOLIAGE_NOISE_AMPLITUDE + EPS);
    }
}

#[test]
fn foliage_drift_is_off_at_threshold_and_deterministic_above_it() {
    let target = Vec3::new(1.0, 2.0, 3.0);
    let chaos = Vec3::new(-4.0, 5.0, -6.0);
    let at_threshold = displaced_position(target, chaos, 0.1, 3.0, 0.2, 0.1);
    assert!((at_threshold - target.lerp(chaos, 0.1)).length() < 1e-6);

    let a = displaced_position(target, chaos, 0.5, 3.0, 0.2, 0.1);
    let b = displaced_position(target, chaos, 0.5, 3.0, 0.2, 0.1);
    assert_eq!(a, b);
    let drift = a - target.lerp(chaos, 0.5);
    assert!((drift.x - (3.0_f32 + chaos.y).sin() * 0.1).abs() < 1e-5);
    assert!((drift.y - (3.0_f32 + chaos.x).cos() * 0.1).abs() < 1e-5);
    assert!((drift.z - (3.0_f32 + chaos.z).sin() * 0.1).abs() < 1e-5);
}

#[test]
fn foliage_buffer_tracks_progress() {
    let mut foliage = small_foliage(64);
    assert!(foliage.take_dirty(), "fresh field needs an upload");
    foliage.tick(Mode::Formed, 1.0 / 60.0, 0.0);
    assert!(!foliage.take_dirty(), "resting formed tree is unchanged");
    for (pos, p) in foliage.positions().iter().zip(foliage.particles()) {
        assert_eq!(Vec3::from(*pos), p.target);
    }

    foliage.tick(Mode::Chaos, 1.0 / 60.0, 0.016);
    assert!(foliage.take_dirty());
    let progress = foliage.progress();
    for (pos, p) in foliage.positions().iter().zip(foliage.particles()) {
        let expected = foliage_position(&p, progress, 0.016);
        assert!((Vec3::from(*pos) - expected).length() < 1e-5);
    }

    let attrs = foliage.attributes();
    assert_eq!(attrs.position.len(), 64);
    assert_eq!(attrs.chaos_position.len(), 64);
    assert_eq!(attrs.target_position.len(), 64);
    assert_eq!(attrs.size.len(), 64);
}

#[test]
fn foliage_colors_ramp_from_emerald_toward_gold() {
    assert_eq!(foliage_color(0.0), FOLIAGE_COLOR_LOW);
    let big = foliage_color(FOLIAGE_SIZE.1);
    let small = foliage_color(FOLIAGE_SIZE.0);
    assert!(big[0] > small[0]);
    assert!(big[0] < FOLIAGE_COLOR_HIGH[0]);
}

#[test]
fn ornament_partition_counts() {
    let kinds: Vec<OrnamentKind> = (0..ORNAMENT_COUNT).map(OrnamentKind::for_index).collect();
    let count = |k| kinds.iter().filter(|&&x| x == k).count();
    let boxes = count(OrnamentKind::Box);
    let balls = count(OrnamentKind::Ball);
    let lights = count(OrnamentKind::Light);
    assert_eq!(boxes, 30);
    assert_eq!(balls, 90);
    assert_eq!(lights, 180);
    assert_eq!(boxes + balls + lights, ORNAMENT_COUNT);
    for (i, k) in kinds.iter().enumerate() {
        assert_eq!(*k == OrnamentKind::Box, i % 10 == 0);
    }
}

#[test]
fn batches_are_sized_to_population() {
    let field = OrnamentField::generate(OrnamentParams::default(), &mut rng());
    assert_eq!(field.batch(OrnamentKind::Box).capacity(), 30);
    assert_eq!(field.batch(OrnamentKind::Ball).capacity(), 90);
    assert_eq!(field.batch(OrnamentKind::Light).capacity(), 180);
    for batch in field.batches() {
        assert_eq!(batch.instances().len(), batch.capacity());
        for &i in batch.members() {
            assert_eq!(field.ornaments()[i].kind, batch.kind());
        }
    }
}

#[test]
fn ornament_weights_and_scales_follow_kind() {
    assert_eq!(OrnamentKind::Box.weight(), 1.5);
    assert_eq!(OrnamentKind::Ball.weight(), 1.0);
    assert_eq!(OrnamentKind::Light.weight(), 0.5);
    assert_eq!(OrnamentKind::Light.scale(), 0.1);
    assert_eq!(OrnamentKind::Box.scale(), 0.4);
    assert_eq!(OrnamentKind::Ball.scale(), 0.3);
    let field = OrnamentField::generate(OrnamentParams::default(), &mut rng());
    for o in field.ornaments() {
        assert_eq!(o.weight, o.kind.weight());
        assert!(o.weight > 0.0 && o.weight <= 2.0);
    }
}

#[test]
fn individual_progress_is_weighted_and_clamped() {
    for i in 0..=100 {
        let shared = i as f32 / 100.0;
        for kind in OrnamentKind::ALL {
            let w = kind.weight();
            let p = individual_progress(shared, w);
            assert!((0.0..=1.0).contains(&p));
            assert!(p <= shared * (2.0 - w * 0.5) + 1e-6);
        }
    }
    assert!((individual_progress(0.4, 1.5) - 0.5).abs() < 1e-6);
    assert!((individual_progress(0.4, 0.5) - 0.7).abs() < 1e-6);
    assert_eq!(individual_progress(0.8, 0.5), 1.0);
    assert_eq!(individual_progress(0.0, 1.5), 0.0);
}

#[test]
fn lights_always_render_gold() {
    let field = OrnamentField::generate(OrnamentParams::default(), &mut rng());
    let gold = hex_to_linear(GOLD_LUXURY);
    let palette: Vec<[f32; 3]> = ORNAMENT_PALETTE.iter().map(|&h| hex_to_linear(h)).collect();
    for o in field.ornaments() {
        assert!(palette.contains(&o.color));
        if o.kind == OrnamentKind::Light {
            assert_eq!(o.render_color(), gold);
        } else {
            assert_eq!(o.render_color(), o.color);
        }
    }
    for inst in field.batch(OrnamentKind::Light).instances() {
        assert_eq!(&inst.color[..3], &gold[..]);
        assert_eq!(inst.color[3], 1.0);
    }
}

#[test]
fn ornament_instances_interpolate_between_endpoints() {
    let mut field = OrnamentField::generate(
        OrnamentParams {
            count: 40,
            ..OrnamentParams::default()
        },
        &mut rng(),
    );
    for batch in field.batches() {
        for (inst, &i) in batch.instances().iter().zip(batch.members()) {
            let o = field.ornaments()[i];
            assert!((inst.translation() - o.target).length() < EPS);
        }
    }

    for i in 0..600 {
        field.tick(Mode::Chaos, 1.0 / 60.0, i as f32 / 60.0);
    }
    assert!(field.take_dirty());
    let shared = field.progress();
    for batch in field.batches() {
        for (inst, &i) in batch.instances().iter().zip(batch.members()) {
            let o = field.ornaments()[i];
            let p = individual_progress(shared, o.weight);
            let expected = o.target.lerp(o.chaos, p);
            assert!((inst.translation() - expected).length() < 1e-3);
        }
    }
}

#[test]
fn heavy_boxes_trail_light_pieces() {
    let shared = 0.3;
    let box_p = individual_progress(shared, OrnamentKind::Box.weight());
    let ball_p = individual_progress(shared, OrnamentKind::Ball.weight());
    let light_p = individual_progress(shared, OrnamentKind::Light.weight());
    assert!(box_p < ball_p && ball_p < light_p);
}
