//! Weighted ornament instances (boxes, balls and glowing lights).
//!
//! Ornaments share one smoothed progress, but each one scales it by its own
//! weight before interpolating, so light pieces fly out first and heavy boxes
//! trail behind. Instances are partitioned by kind into three fixed-size
//! batches at generation time; membership never changes afterwards.

use crate::constants::*;
use crate::progress::Progress;
use crate::sampling::{sample_chaos_point, sample_cone_point, ConeShape};
use crate::state::Mode;
use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrnamentKind {
    Box,
    Ball,
    Light,
}

impl OrnamentKind {
    pub const ALL: [OrnamentKind; 3] = [OrnamentKind::Box, OrnamentKind::Ball, OrnamentKind::Light];

    /// Every 10th index is a box; of the rest, every index divisible by 3 is a ball.
    #[inline]
    pub fn for_index(index: usize) -> Self {
        if index % 10 == 0 {
            OrnamentKind::Box
        } else if index % 3 == 0 {
            OrnamentKind::Ball
        } else {
            OrnamentKind::Light
        }
    }

    #[inline]
    pub fn weight(self) -> f32 {
        match self {
            OrnamentKind::Box => BOX_WEIGHT,
            OrnamentKind::Ball => BALL_WEIGHT,
            OrnamentKind::Light => LIGHT_WEIGHT,
        }
    }

    #[inline]
    pub fn scale(self) -> f32 {
        match self {
            OrnamentKind::Box => BOX_SCALE,
            OrnamentKind::Ball => BALL_SCALE,
            OrnamentKind::Light => LIGHT_SCALE,
        }
    }

    /// Lights glow instead of being lit.
    #[inline]
    pub fn is_emissive(self) -> bool {
        self == OrnamentKind::Light
    }

    #[inline]
    pub fn batch_index(self) -> usize {
        match self {
            OrnamentKind::Box => 0,
            OrnamentKind::Ball => 1,
            OrnamentKind::Light => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrnamentKind::Box => "box",
            OrnamentKind::Ball => "ball",
            OrnamentKind::Light => "light",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ornament {
    pub chaos: Vec3,
    pub target: Vec3,
    pub kind: OrnamentKind,
    /// Linear RGB picked from the ornament palette.
    pub color: [f32; 3],
    pub weight: f32,
}

impl Ornament {
    /// Lights always render gold whatever color they were assigned.
    pub fn render_color(&self) -> [f32; 3] {
        if self.kind == OrnamentKind::Light {
            hex_to_linear(GOLD_LUXURY)
        } else {
            self.color
        }
    }

    /// Model matrix at the given shared progress and elapsed time.
    pub fn transform(&self, shared_progress: f32, time: f32) -> Mat4 {
        let p = individual_progress(shared_progress, self.weight);
        let position = self.target.lerp(self.chaos, p);
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            time * SPIN_RATE_X * self.weight,
            time * SPIN_RATE_Y * self.weight,
            0.0,
        );
        Mat4::from_scale_rotation_translation(Vec3::splat(self.kind.scale()), rotation, position)
    }
}

/// Weight-adjusted progress: `clamp(progress * (2 - weight * 0.5), 0, 1)`.
#[inline]
pub fn individual_progress(shared: f32, weight: f32) -> f32 {
    (shared * (2.0 - weight * 0.5)).clamp(0.0, 1.0)
}

/// Per-instance upload record: model matrix plus color.
///
/// `color.w` is the emissive amount: 1 renders the color flat, 0 lit.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceRaw {
    pub fn new(model: Mat4, color: [f32; 3], emissive: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [color[0], color[1], color[2], emissive],
        }
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.model[3][0], self.model[3][1], self.model[3][2])
    }
}

/// Fixed-capacity instance batch for one ornament kind.
pub struct InstanceBatch {
    kind: OrnamentKind,
    members: Vec<usize>,
    instances: Vec<InstanceRaw>,
}

impl InstanceBatch {
    #[inline]
    pub fn kind(&self) -> OrnamentKind {
        self.kind
    }

    /// Number of slots; equals the kind's population at generation time.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.members.len()
    }

    /// Indices into the ornament list, in slot order.
    #[inline]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    #[inline]
    pub fn instances(&self) -> &[InstanceRaw] {
        &self.instances
    }
}

#[derive(Clone, Debug)]
pub struct OrnamentParams {
    pub count: usize,
    pub chaos_radius: f32,
    pub cone: ConeShape,
    pub palette: Vec<u32>,
    pub smoothing_rate: f32,
}

impl Default for OrnamentParams {
    fn default() -> Self {
        Self {
            count: ORNAMENT_COUNT,
            chaos_radius: CHAOS_RADIUS * ORNAMENT_CHAOS_SCALE,
            cone: ConeShape {
                height: TREE_HEIGHT,
                radius: TREE_RADIUS,
                thickness: (1.0, 1.0),
            },
            palette: ORNAMENT_PALETTE.to_vec(),
            smoothing_rate: ORNAMENT_SMOOTHING_RATE,
        }
    }
}

pub struct OrnamentField {
    ornaments: Vec<Ornament>,
    batches: [InstanceBatch; 3],
    progress: Progress,
    written: Option<(f32, f32)>,
    dirty: bool,
}

impl OrnamentField {
    pub fn generate<R: Rng + ?Sized>(params: OrnamentParams, rng: &mut R) -> Self {
        let fallback = hex_to_linear(GOLD_LUXURY);
        let ornaments: Vec<Ornament> = (0..params.count)
            .map(|i| {
                let kind = OrnamentKind::for_index(i);
                let chaos = sample_chaos_point(rng, params.chaos_radius);
                let target = sample_cone_point(rng, &params.cone);
                let color = params
                    .palette
                    .choose(rng)
                    .map(|&hex| hex_to_linear(hex))
                    .unwrap_or(fallback);
                Ornament {
                    chaos,
                    target,
                    kind,
                    color,
                    weight: kind.weight(),
                }
            })
            .collect();

        let batches = OrnamentKind::ALL.map(|kind| {
            let members: Vec<usize> = ornaments
                .iter()
                .enumerate()
                .filter(|(_, o)| o.kind == kind)
                .map(|(i, _)| i)
                .collect();
            let instances = members
                .iter()
                .map(|&i| {
                    let o = &ornaments[i];
                    InstanceRaw::new(
                        o.transform(0.0, 0.0),
                        o.render_color(),
                        if kind.is_emissive() { 1.0 } else { 0.0 },
                    )
                })
                .collect();
            InstanceBatch {
                kind,
                members,
                instances,
            }
        });
        log::info!(
            "[scene] ornaments generated: {} boxes, {} balls, {} lights",
            batches[0].capacity(),
            batches[1].capacity(),
            batches[2].capacity()
        );

        Self {
            ornaments,
            batches,
            progress: Progress::new(params.smoothing_rate),
            written: None,
            dirty: true,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ornaments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ornaments.is_empty()
    }

    #[inline]
    pub fn ornaments(&self) -> &[Ornament] {
        &self.ornaments
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    #[inline]
    pub fn batches(&self) -> &[InstanceBatch; 3] {
        &self.batches
    }

    #[inline]
    pub fn batch(&self, kind: OrnamentKind) -> &InstanceBatch {
        &self.batches[kind.batch_index()]
    }

    pub fn tick(&mut self, mode: Mode, dt: f32, elapsed: f32) {
        let progress = self.progress.step(mode.target_progress(), dt);
        if self.written == Some((progress, elapsed)) {
            return;
        }
        for batch in &mut self.batches {
            for (slot, &i) in batch.instances.iter_mut().zip(batch.members.iter()) {
                slot.model = self.ornaments[i]
                    .transform(progress, elapsed)
                    .to_cols_array_2d();
            }
        }
        self.written = Some((progress, elapsed));
        self.dirty = true;
    }

    /// Whether any batch changed since the last call; clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}
