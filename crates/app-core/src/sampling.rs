//! Endpoint samplers shared by the foliage and ornament fields.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Random point inside a sphere of `radius`.
///
/// The radius is `sqrt(u) * radius`, which puts noticeably more points near
/// the center than a uniform-volume draw would. The two fields rely on this
/// density, so keep the square root.
pub fn sample_chaos_point<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = rng.gen::<f32>() * TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    let r = rng.gen::<f32>().sqrt() * radius;
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Right cone with its apex up, centered vertically on the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConeShape {
    pub height: f32,
    pub radius: f32,
    /// Per-axis radial jitter range `[min, max)` applied independently to x and z.
    pub thickness: (f32, f32),
}

impl ConeShape {
    /// Radius of the cone volume at height `y` measured from the base.
    #[inline]
    pub fn radius_at(&self, y: f32) -> f32 {
        (1.0 - y / self.height) * self.radius
    }
}

/// Random point on/within the cone. `y` lands in `[-height/2, height/2)`.
pub fn sample_cone_point<R: Rng + ?Sized>(rng: &mut R, cone: &ConeShape) -> Vec3 {
    let y = rng.gen::<f32>() * cone.height;
    let r = cone.radius_at(y);
    let angle = rng.gen::<f32>() * TAU;
    let (lo, hi) = cone.thickness;
    let jitter_x = lo + rng.gen::<f32>() * (hi - lo);
    let jitter_z = lo + rng.gen::<f32>() * (hi - lo);
    Vec3::new(
        angle.cos() * r * jitter_x,
        y - cone.height / 2.0,
        angle.sin() * r * jitter_z,
    )
}

/// Uniform draw from `[min, max)`.
#[inline]
pub fn sample_range<R: Rng + ?Sized>(rng: &mut R, (min, max): (f32, f32)) -> f32 {
    min + rng.gen::<f32>() * (max - min)
}
