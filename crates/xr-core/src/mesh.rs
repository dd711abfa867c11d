//! Procedural geometry shared by the web and native renderers.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Indexed triangle (or line) mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u16>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Index of the next vertex; u16 indices cap a mesh at 65536 vertices.
    fn next_index(&self, extra: usize) -> u16 {
        let count = self.positions.len() + extra;
        assert!(
            count <= u16::MAX as usize + 1,
            "mesh exceeds u16 index range ({} vertices)",
            count
        );
        self.positions.len() as u16
    }

    fn push(&mut self, p: Vec3, n: Vec3, uv: [f32; 2]) -> u16 {
        let i = self.next_index(1);
        self.positions.push(p.to_array());
        self.normals.push(n.to_array());
        self.uvs.push(uv);
        i
    }

    /// Axis-aligned box centered at the origin.
    pub fn cuboid(size: Vec3) -> Self {
        let h = size * 0.5;
        // (normal, u, v) with u x v == normal so quads wind counter-clockwise
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        let mut mesh = Self::default();
        for (n, u, v) in faces {
            let c = n * h;
            let hu = u * h;
            let hv = v * h;
            let a = mesh.push(c - hu - hv, n, [0.0, 0.0]);
            let b = mesh.push(c + hu - hv, n, [1.0, 0.0]);
            let d = mesh.push(c + hu + hv, n, [1.0, 1.0]);
            let e = mesh.push(c - hu + hv, n, [0.0, 1.0]);
            mesh.indices.extend_from_slice(&[a, b, d, a, d, e]);
        }
        mesh
    }

    /// Capped cylinder along the Y axis, centered at the origin.
    pub fn cylinder(radius: f32, height: f32, segments: u16) -> Self {
        let segments = segments.max(3);
        let hy = height * 0.5;
        let mut mesh = Self::default();
        let step = std::f32::consts::TAU / segments as f32;

        let side_start = mesh.next_index(0);
        for i in 0..=segments {
            let (s, c) = (i as f32 * step).sin_cos();
            let n = Vec3::new(s, 0.0, c);
            let u = i as f32 / segments as f32;
            mesh.push(Vec3::new(radius * s, -hy, radius * c), n, [u, 0.0]);
            mesh.push(Vec3::new(radius * s, hy, radius * c), n, [u, 1.0]);
        }
        for i in 0..segments {
            let b0 = side_start + i * 2;
            let t0 = b0 + 1;
            let b1 = b0 + 2;
            let t1 = b0 + 3;
            mesh.indices.extend_from_slice(&[b0, b1, t1, b0, t1, t0]);
        }

        for (y, n) in [(hy, Vec3::Y), (-hy, Vec3::NEG_Y)] {
            let center = mesh.push(Vec3::new(0.0, y, 0.0), n, [0.5, 0.5]);
            let ring = mesh.next_index(0);
            for i in 0..segments {
                let (s, c) = (i as f32 * step).sin_cos();
                mesh.push(Vec3::new(radius * s, y, radius * c), n, [0.5 + 0.5 * s, 0.5 + 0.5 * c]);
            }
            for i in 0..segments {
                let a = ring + i;
                let b = ring + (i + 1) % segments;
                if n.y > 0.0 {
                    mesh.indices.extend_from_slice(&[center, a, b]);
                } else {
                    mesh.indices.extend_from_slice(&[center, b, a]);
                }
            }
        }
        mesh
    }

    /// Rectangle in the XY plane facing +Z; uv (0,0) is the bottom-left corner.
    pub fn quad(width: f32, height: f32) -> Self {
        let hw = width * 0.5;
        let hh = height * 0.5;
        let mut mesh = Self::default();
        let a = mesh.push(Vec3::new(-hw, -hh, 0.0), Vec3::Z, [0.0, 0.0]);
        let b = mesh.push(Vec3::new(hw, -hh, 0.0), Vec3::Z, [1.0, 0.0]);
        let c = mesh.push(Vec3::new(hw, hh, 0.0), Vec3::Z, [1.0, 1.0]);
        let d = mesh.push(Vec3::new(-hw, hh, 0.0), Vec3::Z, [0.0, 1.0]);
        mesh.indices.extend_from_slice(&[a, b, c, a, c, d]);
        mesh
    }

    /// Two-point line segment, drawn with a line topology.
    pub fn line(start: Vec3, end: Vec3) -> Self {
        let mut mesh = Self::default();
        let a = mesh.push(start, Vec3::ZERO, [0.0, 0.0]);
        let b = mesh.push(end, Vec3::ZERO, [1.0, 0.0]);
        mesh.indices.extend_from_slice(&[a, b]);
        mesh
    }

    pub fn transformed(mut self, m: Mat4) -> Self {
        let normal_m = Mat3::from_mat4(m).inverse().transpose();
        for p in &mut self.positions {
            *p = m.transform_point3(Vec3::from(*p)).to_array();
        }
        for n in &mut self.normals {
            *n = (normal_m * Vec3::from(*n)).normalize_or_zero().to_array();
        }
        self
    }

    /// Append `other`, rebasing its indices.
    pub fn merge(mut self, other: MeshData) -> Self {
        let base = self.next_index(other.positions.len());
        self.positions.extend(other.positions);
        self.normals.extend(other.normals);
        self.uvs.extend(other.uvs);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
        self
    }

    pub fn interleaved(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| Vertex {
                position: *p,
                normal: *n,
                uv: *uv,
            })
            .collect()
    }
}
