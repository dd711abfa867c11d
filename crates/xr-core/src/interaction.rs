//! Per-controller trigger state and the visual decorations attached to it.

use glam::{Mat4, Vec3};
use log::debug;

use crate::constants::*;
use crate::pose::{ControllerId, ControllerRole, Handedness};

/// Whether the controller's trigger is held. Independent of hover.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionState {
    #[default]
    Inactive,
    Active,
}

/// The ray line drawn from a controller.
///
/// Only a designated ray changes appearance when activated: its color
/// switches and an overlay segment becomes visible.
#[derive(Clone, Debug)]
pub struct RayVisual {
    role: ControllerRole,
    active: bool,
    pub length: f32,
}

impl RayVisual {
    pub fn new(role: ControllerRole, length: f32) -> Self {
        Self {
            role,
            active: false,
            length,
        }
    }

    pub fn set_active(&mut self, active: bool) {
        if self.role == ControllerRole::Designated {
            self.active = active;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn color(&self) -> Vec3 {
        if self.active {
            rgb(RAY_ACTIVE_COLOR)
        } else {
            rgb(RAY_COLOR)
        }
    }

    pub fn overlay_visible(&self) -> bool {
        self.active
    }

    /// Line endpoints in the controller's local frame.
    pub fn local_segment(&self) -> [Vec3; 2] {
        [Vec3::ZERO, FORWARD * self.length]
    }
}

/// Small cube riding on the controller.
#[derive(Clone, Debug)]
pub struct CubeVisual {
    pub size: f32,
    pub color: Vec3,
    pub opacity: f32,
    pub offset: Vec3,
}

impl Default for CubeVisual {
    fn default() -> Self {
        Self {
            size: CUBE_SIZE,
            color: rgb(CUBE_COLOR),
            opacity: CUBE_OPACITY,
            offset: Vec3::new(0.0, CUBE_OFFSET_Y, 0.0),
        }
    }
}

impl CubeVisual {
    /// Model matrix relative to the controller transform.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.offset)
    }
}

#[derive(Clone, Debug)]
pub struct Controller {
    pub id: ControllerId,
    pub handedness: Handedness,
    pub role: ControllerRole,
    pub state: InteractionState,
    pub ray: RayVisual,
    pub cube: CubeVisual,
}

impl Controller {
    pub fn new(id: ControllerId, handedness: Handedness, ray_length: f32) -> Self {
        let role = ControllerRole::for_handedness(handedness);
        Self {
            id,
            handedness,
            role,
            state: InteractionState::Inactive,
            ray: RayVisual::new(role, ray_length),
            cube: CubeVisual::default(),
        }
    }

    pub fn is_designated(&self) -> bool {
        self.role == ControllerRole::Designated
    }

    pub fn select_start(&mut self) {
        self.state = InteractionState::Active;
        self.ray.set_active(true);
        debug!("[controller {}] select start ({:?})", self.id.0, self.role);
    }

    pub fn select_end(&mut self) {
        self.state = InteractionState::Inactive;
        self.ray.set_active(false);
        debug!("[controller {}] select end ({:?})", self.id.0, self.role);
    }

    pub fn reset(&mut self) {
        self.state = InteractionState::Inactive;
        self.ray.set_active(false);
    }
}
