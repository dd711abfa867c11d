// Procedural meshes and controller model fallback.

use xr_core::mesh::MeshData;
use xr_core::model::{load_controller_model, placeholder_model, ModelLoader, ProceduralModels};
use xr_core::*;

fn indices_valid(mesh: &MeshData) -> bool {
    mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count())
}

#[test]
fn cuboid_has_six_faces() {
    let m = MeshData::cuboid(glam::Vec3::splat(0.1));
    assert_eq!(m.vertex_count(), 24);
    assert_eq!(m.indices.len(), 36);
    assert!(indices_valid(&m));
    for p in &m.positions {
        assert!(p.iter().all(|c| (c.abs() - 0.05).abs() < 1e-6));
    }
}

#[test]
fn cuboid_triangles_face_outward() {
    let m = MeshData::cuboid(glam::Vec3::ONE);
    for tri in m.indices.chunks_exact(3) {
        let a = glam::Vec3::from(m.positions[tri[0] as usize]);
        let b = glam::Vec3::from(m.positions[tri[1] as usize]);
        let c = glam::Vec3::from(m.positions[tri[2] as usize]);
        let n = glam::Vec3::from(m.normals[tri[0] as usize]);
        assert!((b - a).cross(c - a).dot(n) > 0.0);
    }
}

#[test]
fn cylinder_counts() {
    let m = MeshData::cylinder(0.02, 0.1, 8);
    assert_eq!(m.vertex_count(), 18 + 2 * 9);
    assert_eq!(m.indices.len(), 8 * 6 + 2 * 8 * 3);
    assert!(indices_valid(&m));
}

#[test]
fn quad_uvs_start_bottom_left() {
    let m = MeshData::quad(1.6, 0.9);
    assert_eq!(m.vertex_count(), 4);
    assert_eq!(m.positions[0], [-0.8, -0.45, 0.0]);
    assert_eq!(m.uvs[0], [0.0, 0.0]);
    assert_eq!(m.uvs[2], [1.0, 1.0]);
}

#[test]
fn line_has_two_points() {
    let m = MeshData::line(glam::Vec3::ZERO, glam::Vec3::new(0.0, 0.0, -5.0));
    assert_eq!(m.indices, vec![0, 1]);
    assert_eq!(m.positions[1], [0.0, 0.0, -5.0]);
}

#[test]
fn merge_rebases_indices() {
    let a = MeshData::quad(1.0, 1.0);
    let b = MeshData::quad(1.0, 1.0);
    let m = a.merge(b);
    assert_eq!(m.vertex_count(), 8);
    assert_eq!(&m.indices[6..], &[4, 5, 6, 4, 6, 7]);
    assert_eq!(m.interleaved().len(), 8);
}

#[test]
fn placeholder_has_box_and_grip() {
    let m = placeholder_model();
    assert_eq!(m.vertex_count(), 24 + 36);
    assert!(indices_valid(&m));
    let min_y = m.positions.iter().map(|p| p[1]).fold(f32::MAX, f32::min);
    let max_z = m.positions.iter().map(|p| p[2]).fold(f32::MIN, f32::max);
    // grip hangs 0.05 below the body and is rotated to lie along z
    assert!((min_y - (-0.07)).abs() < 1e-4);
    assert!((max_z - 0.05).abs() < 1e-4);
}

#[test]
fn generic_profiles_load() {
    let loader = ProceduralModels;
    assert!(loader.load("generic-trigger").is_ok());
    let with_stick = loader.load("generic-trigger-squeeze-thumbstick").unwrap();
    let plain = loader.load("generic-trigger").unwrap();
    assert!(with_stick.vertex_count() > plain.vertex_count());
    assert!(matches!(loader.load("oculus-touch-v3"), Err(XrError::UnknownProfile(_))));
}

#[test]
fn first_loadable_profile_is_used() {
    let profiles = vec!["oculus-touch-v3".to_string(), "generic-trigger-squeeze".to_string()];
    let model = load_controller_model(&ProceduralModels, &profiles, ControllerId(0));
    assert!(!model.fallback);
}

#[test]
fn no_profiles_falls_back() {
    let model = load_controller_model(&ProceduralModels, &[], ControllerId(1));
    assert!(model.fallback);
    assert_eq!(model.mesh, placeholder_model());
}

struct Broken;

impl ModelLoader for Broken {
    fn load(&self, _profile: &str) -> XrResult<MeshData> {
        Err(XrError::ModelUnavailable(0))
    }
}

#[test]
fn failing_loader_falls_back() {
    let profiles = vec!["generic-trigger".to_string()];
    let model = load_controller_model(&Broken, &profiles, ControllerId(0));
    assert!(model.fallback);
    assert!(model.mesh.vertex_count() > 0);
}

#[test]
fn merge_fills_u16_index_range_exactly() {
    let n = u16::MAX as usize - 1;
    let big = MeshData {
        positions: vec![[0.0; 3]; n],
        normals: vec![[0.0; 3]; n],
        uvs: vec![[0.0; 2]; n],
        indices: Vec::new(),
    };
    let m = big.merge(MeshData::line(glam::Vec3::ZERO, glam::Vec3::X));
    assert_eq!(m.vertex_count(), u16::MAX as usize + 1);
    assert_eq!(m.indices, vec![u16::MAX - 1, u16::MAX]);
}

#[test]
#[should_panic(expected = "u16 index range")]
fn merge_past_u16_index_range_panics() {
    let big = MeshData {
        positions: vec![[0.0; 3]; u16::MAX as usize + 1],
        normals: vec![[0.0; 3]; u16::MAX as usize + 1],
        uvs: vec![[0.0; 2]; u16::MAX as usize + 1],
        indices: Vec::new(),
    };
    let _ = big.merge(MeshData::quad(1.0, 1.0));
}
