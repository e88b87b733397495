//! Dual-position foliage point cloud.
//!
//! Every particle has two immutable endpoints (chaos sphere, tree cone) and a
//! size. Each tick the field smooths its progress toward the mode's target and
//! rewrites the flat `positions` buffer; the front-end uploads it when
//! [`FoliageField::take_dirty`] says so.

use crate::constants::*;
use crate::progress::Progress;
use crate::sampling::{sample_chaos_point, sample_cone_point, sample_range, ConeShape};
use crate::state::Mode;
use glam::Vec3;
use rand::Rng;

#[derive(Clone, Debug)]
pub struct FoliageParams {
    pub count: usize,
    pub chaos_radius: f32,
    pub cone: ConeShape,
    pub size_range: (f32, f32),
    pub smoothing_rate: f32,
    pub noise_amplitude: f32,
    pub noise_threshold: f32,
}

impl Default for FoliageParams {
    fn default() -> Self {
        Self {
            count: FOLIAGE_COUNT,
            chaos_radius: CHAOS_RADIUS,
            cone: ConeShape {
                height: TREE_HEIGHT,
                radius: TREE_RADIUS,
                thickness: FOLIAGE_THICKNESS,
            },
            size_range: FOLIAGE_SIZE,
            smoothing_rate: FOLIAGE_SMOOTHING_RATE,
            noise_amplitude: FOLIAGE_NOISE_AMPLITUDE,
            noise_threshold: FOLIAGE_NOISE_THRESHOLD,
        }
    }
}

/// Value view of one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoliageParticle {
    pub chaos: Vec3,
    pub target: Vec3,
    pub size: f32,
}

/// Borrowed attribute buffers, one entry per particle.
pub struct FoliageAttributes<'a> {
    pub position: &'a [[f32; 3]],
    pub chaos_position: &'a [[f32; 3]],
    pub target_position: &'a [[f32; 3]],
    pub size: &'a [f32],
}

pub struct FoliageField {
    params: FoliageParams,
    chaos: Vec<[f32; 3]>,
    target: Vec<[f32; 3]>,
    size: Vec<f32>,
    positions: Vec<[f32; 3]>,
    progress: Progress,
    written_progress: f32,
    dirty: bool,
}

impl FoliageField {
    pub fn generate<R: Rng + ?Sized>(params: FoliageParams, rng: &mut R) -> Self {
        let n = params.count;
        let mut chaos = Vec::with_capacity(n);
        let mut target = Vec::with_capacity(n);
        let mut size = Vec::with_capacity(n);
        for _ in 0..n {
            chaos.push(sample_chaos_point(rng, params.chaos_radius).to_array());
            target.push(sample_cone_point(rng, &params.cone).to_array());
            size.push(sample_range(rng, params.size_range));
        }
        // Progress starts at 0, so the first frame shows the formed tree.
        let positions = target.clone();
        let progress = Progress::new(params.smoothing_rate);
        log::info!("[scene] foliage generated: {n} particles");
        Self {
            params,
            chaos,
            target,
            size,
            positions,
            progress,
            written_progress: 0.0,
            dirty: true,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    pub fn params(&self) -> &FoliageParams {
        &self.params
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn particle(&self, index: usize) -> Option<FoliageParticle> {
        Some(FoliageParticle {
            chaos: Vec3::from(*self.chaos.get(index)?),
            target: Vec3::from(*self.target.get(index)?),
            size: *self.size.get(index)?,
        })
    }

    pub fn particles(&self) -> impl Iterator<Item = FoliageParticle> + '_ {
        (0..self.len()).filter_map(move |i| self.particle(i))
    }

    /// Current rendered positions, one per particle.
    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn attributes(&self) -> FoliageAttributes<'_> {
        FoliageAttributes {
            position: &self.positions,
            chaos_position: &self.chaos,
            target_position: &self.target,
            size: &self.size,
        }
    }

    /// Per-particle sprite color, fixed for the particle's lifetime.
    pub fn colors(&self) -> Vec<[f32; 3]> {
        self.size.iter().map(|&s| foliage_color(s)).collect()
    }

    /// Smooth progress toward the mode's target and rewrite positions.
    /// `elapsed` is total seconds since start and drives the drift phase.
    pub fn tick(&mut self, mode: Mode, dt: f32, elapsed: f32) {
        let progress = self.progress.step(mode.target_progress(), dt);
        let drifting = progress > self.params.noise_threshold;
        if !drifting && progress == self.written_progress && !self.dirty {
            return;
        }
        for ((out, chaos), target) in self
            .positions
            .iter_mut()
            .zip(self.chaos.iter())
            .zip(self.target.iter())
        {
            *out = displaced_position(
                Vec3::from(*target),
                Vec3::from(*chaos),
                progress,
                elapsed,
                self.params.noise_amplitude,
                self.params.noise_threshold,
            )
            .to_array();
        }
        self.written_progress = progress;
        self.dirty = true;
    }

    /// Whether positions changed since the last call; clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

/// Rendered position of one particle with the default drift settings.
#[inline]
pub fn foliage_position(particle: &FoliageParticle, progress: f32, time: f32) -> Vec3 {
    displaced_position(
        particle.target,
        particle.chaos,
        progress,
        time,
        FOLIAGE_NOISE_AMPLITUDE,
        FOLIAGE_NOISE_THRESHOLD,
    )
}

/// `lerp(target, chaos, progress)` plus a per-axis sinusoidal drift of
/// amplitude `amplitude * progress`, phased by the chaos coordinates. The
/// drift is off at or below `threshold`.
pub fn displaced_position(
    target: Vec3,
    chaos: Vec3,
    progress: f32,
    time: f32,
    amplitude: f32,
    threshold: f32,
) -> Vec3 {
    let mut pos = target.lerp(chaos, progress);
    if progress > threshold {
        let a = amplitude * progress;
        pos.x += (time + chaos.y).sin() * a;
        pos.y += (time + chaos.x).cos() * a;
        pos.z += (time + chaos.z).sin() * a;
    }
    pos
}

/// Emerald-to-gold ramp by particle size.
#[inline]
pub fn foliage_color(size: f32) -> [f32; 3] {
    let t = size * 0.5;
    let lo = FOLIAGE_COLOR_LOW;
    let hi = FOLIAGE_COLOR_HIGH;
    [
        lo[0] + (hi[0] - lo[0]) * t,
        lo[1] + (hi[1] - lo[1]) * t,
        lo[2] + (hi[2] - lo[2]) * t,
    ]
}
