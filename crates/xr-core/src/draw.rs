//! Translate interaction state into a flat draw list shared by both hosts.

use glam::{Mat4, Vec3, Vec4};

use crate::constants::{rgb, PLACEHOLDER_COLOR, RAY_ACTIVE_COLOR, RAY_OVERLAY_BIAS};
use crate::context::InteractionContext;
use crate::pose::{ControllerId, ControllerPose};

/// Transforms sampled for one controller this frame.
#[derive(Clone, Debug)]
pub struct ControllerFrame {
    pub id: ControllerId,
    pub ray_pose: Option<ControllerPose>,
    pub grip: Option<Mat4>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshKey {
    Panel,
    /// Unit quad, scaled per target.
    Quad,
    /// Unit cube, scaled per draw.
    Cube,
    /// Unit segment from the origin along -Z.
    Line,
    ControllerModel(ControllerId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    Panel,
    Solid,
    Line,
}

#[derive(Clone, Debug)]
pub struct DrawItem {
    pub pass: Pass,
    pub mesh: MeshKey,
    pub model: Mat4,
    pub color: Vec4,
    pub emissive: Vec3,
    pub lit: bool,
}

/// Build everything that should be drawn this frame, opaque first, then
/// translucent cubes, then lines.
pub fn build_draw_list(ctx: &InteractionContext, controllers: &[ControllerFrame]) -> Vec<DrawItem> {
    let mut items = Vec::new();

    for target in ctx.scene().iter().filter(|t| t.visible) {
        let color = target.material.base_color().extend(1.0);
        let emissive = target.material.emissive();
        if target.id == ctx.panel().target {
            items.push(DrawItem {
                pass: Pass::Panel,
                mesh: MeshKey::Panel,
                model: target.quad.model_matrix(),
                color,
                emissive,
                lit: false,
            });
        } else {
            let scale = Vec3::new(target.quad.width, target.quad.height, 1.0);
            items.push(DrawItem {
                pass: Pass::Solid,
                mesh: MeshKey::Quad,
                model: target.quad.model_matrix() * Mat4::from_scale(scale),
                color,
                emissive,
                lit: true,
            });
        }
    }

    for frame in controllers {
        if let Some(grip) = frame.grip {
            items.push(DrawItem {
                pass: Pass::Solid,
                mesh: MeshKey::ControllerModel(frame.id),
                model: grip,
                color: rgb(PLACEHOLDER_COLOR).extend(1.0),
                emissive: Vec3::ZERO,
                lit: true,
            });
        }
    }

    // Controller decorations only exist while their controller is tracked.
    let mut lines = Vec::new();
    for frame in controllers {
        let (Some(pose), Some(controller)) = (frame.ray_pose, ctx.controller(frame.id)) else {
            continue;
        };
        let base = pose.matrix();
        let cube = &controller.cube;
        items.push(DrawItem {
            pass: Pass::Solid,
            mesh: MeshKey::Cube,
            model: base * cube.local_matrix() * Mat4::from_scale(Vec3::splat(cube.size)),
            color: cube.color.extend(cube.opacity),
            emissive: Vec3::ZERO,
            lit: true,
        });

        let ray = &controller.ray;
        let length = Mat4::from_scale(Vec3::new(1.0, 1.0, ray.length));
        lines.push(DrawItem {
            pass: Pass::Line,
            mesh: MeshKey::Line,
            model: base * length,
            color: ray.color().extend(1.0),
            emissive: Vec3::ZERO,
            lit: false,
        });
        if ray.overlay_visible() {
            let bias = Mat4::from_translation(Vec3::new(0.0, RAY_OVERLAY_BIAS, 0.0));
            lines.push(DrawItem {
                pass: Pass::Line,
                mesh: MeshKey::Line,
                model: base * bias * length,
                color: rgb(RAY_ACTIVE_COLOR).extend(1.0),
                emissive: Vec3::ZERO,
                lit: false,
            });
        }
    }
    items.extend(lines);
    items
}
