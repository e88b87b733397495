//! Scene composer: foliage, ornaments and the static trunk/pedestal in one
//! group, translated by the current pan offset.

use crate::constants::*;
use crate::foliage::{FoliageField, FoliageParams};
use crate::mesh::{cylinder, Mesh};
use crate::ornaments::{InstanceRaw, OrnamentField, OrnamentParams};
use crate::state::AppState;
use glam::{Mat4, Vec3};
use rand::Rng;

/// A non-animated mesh placed inside the tree group.
#[derive(Clone, Debug)]
pub struct StaticPiece {
    pub name: &'static str,
    pub mesh: Mesh,
    pub translation: Vec3,
    pub color: [f32; 3],
}

impl StaticPiece {
    pub fn instance(&self) -> InstanceRaw {
        InstanceRaw::new(Mat4::from_translation(self.translation), self.color, 0.0)
    }
}

pub fn trunk() -> StaticPiece {
    StaticPiece {
        name: "trunk",
        mesh: cylinder(0.5, 0.7, 4.0, 32),
        translation: Vec3::new(0.0, -2.0, 0.0),
        color: hex_to_linear(TRUNK_BROWN),
    }
}

pub fn pedestal() -> StaticPiece {
    StaticPiece {
        name: "pedestal",
        mesh: cylinder(4.0, 5.0, 1.0, 64),
        translation: Vec3::new(0.0, -4.5, 0.0),
        color: hex_to_linear(GOLD_LUXURY),
    }
}

/// World-space light rig. Lights do not follow the pan offset.
#[derive(Clone, Debug)]
pub struct Lighting {
    pub ambient: f32,
    pub spot_position: Vec3,
    pub spot_color: [f32; 3],
    pub spot_intensity: f32,
    pub point_position: Vec3,
    pub point_color: [f32; 3],
    pub point_intensity: f32,
    pub background: [f32; 3],
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: 0.4,
            spot_position: Vec3::new(10.0, 20.0, 10.0),
            spot_color: hex_to_linear(GOLD_LUXURY),
            spot_intensity: 2.0,
            point_position: Vec3::new(-10.0, -10.0, -10.0),
            point_color: hex_to_linear(EMERALD_BRIGHT),
            point_intensity: 1.0,
            background: hex_to_linear(BACKGROUND),
        }
    }
}

pub struct TreeScene {
    pub foliage: FoliageField,
    pub ornaments: OrnamentField,
    pub statics: Vec<StaticPiece>,
    pub lighting: Lighting,
    group_offset: Vec3,
    revision: Option<u64>,
}

impl TreeScene {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_params(FoliageParams::default(), OrnamentParams::default(), rng)
    }

    pub fn with_params<R: Rng + ?Sized>(
        foliage: FoliageParams,
        ornaments: OrnamentParams,
        rng: &mut R,
    ) -> Self {
        Self {
            foliage: FoliageField::generate(foliage, rng),
            ornaments: OrnamentField::generate(ornaments, rng),
            statics: vec![trunk(), pedestal()],
            lighting: Lighting::default(),
            group_offset: Vec3::ZERO,
            revision: None,
        }
    }

    /// Advance both fields one tick. Returns `true` when the shared state
    /// changed since the previous update (the group was moved).
    pub fn update(&mut self, state: &AppState, dt: f32, elapsed: f32) -> bool {
        let changed = self.revision != Some(state.revision);
        if changed {
            self.group_offset = state.pan.translation();
            self.revision = Some(state.revision);
        }
        self.foliage.tick(state.mode, dt, elapsed);
        self.ornaments.tick(state.mode, dt, elapsed);
        changed
    }

    #[inline]
    pub fn group_offset(&self) -> Vec3 {
        self.group_offset
    }

    #[inline]
    pub fn group_transform(&self) -> Mat4 {
        Mat4::from_translation(self.group_offset)
    }
}
