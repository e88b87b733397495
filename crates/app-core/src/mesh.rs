//! Indexed triangle meshes for the instanced and static pieces.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    fn push(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(MeshVertex {
            position: position.to_array(),
            normal: normal.to_array(),
        });
        index
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Axis-aligned cube with edge length `size`, centered on the origin.
pub fn cube(size: f32) -> Mesh {
    let h = size * 0.5;
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Y, Vec3::NEG_Z),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::NEG_Z, Vec3::X),
        (Vec3::Z, Vec3::Y, Vec3::NEG_X),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];
    let mut mesh = Mesh::default();
    for (normal, up, right) in faces {
        let center = normal * h;
        let corners = [
            center - right * h - up * h,
            center + right * h - up * h,
            center + right * h + up * h,
            center - right * h + up * h,
        ];
        let base = mesh.vertices.len() as u32;
        for c in corners {
            mesh.push(c, normal);
        }
        // wind counter-clockwise when seen from outside
        if right.cross(up).dot(normal) > 0.0 {
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        } else {
            mesh.indices
                .extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
        }
    }
    mesh
}

/// Latitude/longitude sphere.
pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> Mesh {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut mesh = Mesh::default();
    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let phi = v * PI;
        for seg in 0..=segments {
            let u = seg as f32 / segments as f32;
            let theta = u * TAU;
            let n = Vec3::new(
                -theta.cos() * phi.sin(),
                phi.cos(),
                theta.sin() * phi.sin(),
            );
            mesh.push(n * radius, n);
        }
    }
    let stride = segments + 1;
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * stride + seg;
            let b = a + stride;
            if ring != 0 {
                mesh.indices.extend_from_slice(&[a, b, a + 1]);
            }
            if ring != rings - 1 {
                mesh.indices.extend_from_slice(&[a + 1, b, b + 1]);
            }
        }
    }
    mesh
}

/// Capped cylinder (or frustum) along y, centered on the origin.
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);
    let mut mesh = Mesh::default();

    // side
    for seg in 0..=segments {
        let theta = seg as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        let normal = Vec3::new(sin, slope, cos).normalize();
        mesh.push(Vec3::new(radius_top * sin, half, radius_top * cos), normal);
        mesh.push(
            Vec3::new(radius_bottom * sin, -half, radius_bottom * cos),
            normal,
        );
    }
    for seg in 0..segments {
        let top = seg * 2;
        let bottom = top + 1;
        let next_top = top + 2;
        let next_bottom = top + 3;
        mesh.indices
            .extend_from_slice(&[top, bottom, next_top, bottom, next_bottom, next_top]);
    }

    // caps
    for (y, radius, normal) in [(half, radius_top, Vec3::Y), (-half, radius_bottom, Vec3::NEG_Y)] {
        let center = mesh.push(Vec3::new(0.0, y, 0.0), normal);
        let first = mesh.vertices.len() as u32;
        for seg in 0..=segments {
            let theta = seg as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            mesh.push(Vec3::new(radius * sin, y, radius * cos), normal);
        }
        for seg in 0..segments {
            let a = first + seg;
            if normal.y > 0.0 {
                mesh.indices.extend_from_slice(&[center, a, a + 1]);
            } else {
                mesh.indices.extend_from_slice(&[center, a + 1, a]);
            }
        }
    }
    mesh
}
