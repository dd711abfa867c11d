//! Controller grip models, with a procedural placeholder when loading fails.

use glam::{Mat4, Vec3};
use log::{info, warn};

use crate::constants::*;
use crate::error::{XrError, XrResult};
use crate::mesh::MeshData;
use crate::pose::ControllerId;

/// Source of controller meshes keyed by WebXR input profile id.
pub trait ModelLoader {
    fn load(&self, profile: &str) -> XrResult<MeshData>;
}

/// Built-in meshes for the generic WebXR input profiles.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProceduralModels;

impl ModelLoader for ProceduralModels {
    fn load(&self, profile: &str) -> XrResult<MeshData> {
        if !profile.starts_with("generic-trigger") {
            return Err(XrError::UnknownProfile(profile.to_string()));
        }
        let body = MeshData::cuboid(Vec3::new(0.035, 0.03, 0.12));
        let trigger = MeshData::cuboid(Vec3::new(0.015, 0.025, 0.02))
            .transformed(Mat4::from_translation(Vec3::new(0.0, -0.025, -0.035)));
        let mut mesh = body.merge(trigger);
        if profile.contains("thumbstick") || profile.contains("touchpad") {
            let pad = MeshData::cylinder(0.012, 0.006, 12)
                .transformed(Mat4::from_translation(Vec3::new(0.0, 0.018, -0.02)));
            mesh = mesh.merge(pad);
        }
        Ok(mesh)
    }
}

/// Box body with a short grip cylinder hanging below it.
pub fn placeholder_model() -> MeshData {
    let body = MeshData::cuboid(Vec3::splat(PLACEHOLDER_BODY_SIZE));
    let grip = MeshData::cylinder(
        PLACEHOLDER_GRIP_RADIUS,
        PLACEHOLDER_GRIP_LENGTH,
        PLACEHOLDER_GRIP_SEGMENTS,
    )
    .transformed(
        Mat4::from_translation(Vec3::new(0.0, -0.05, 0.0))
            * Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2),
    );
    body.merge(grip)
}

#[derive(Clone, Debug)]
pub struct ControllerModel {
    pub mesh: MeshData,
    pub color: Vec3,
    pub fallback: bool,
}

/// Resolve the grip model for a controller, trying `profiles` in order.
///
/// Never fails: any loader error degrades to [`placeholder_model`] with a warning.
pub fn load_controller_model<L: ModelLoader + ?Sized>(
    loader: &L,
    profiles: &[String],
    slot: ControllerId,
) -> ControllerModel {
    let mut last_err = XrError::ModelUnavailable(slot.0);
    for profile in profiles {
        match loader.load(profile) {
            Ok(mesh) => {
                info!("[model] controller {} using profile {}", slot.0, profile);
                return ControllerModel {
                    mesh,
                    color: rgb(PLACEHOLDER_COLOR),
                    fallback: false,
                };
            }
            Err(e) => last_err = e,
        }
    }
    warn!(
        "Falling back to basic controller model for controller {}: {}",
        slot.0 + 1,
        last_err
    );
    ControllerModel {
        mesh: placeholder_model(),
        color: rgb(PLACEHOLDER_COLOR),
        fallback: true,
    }
}
