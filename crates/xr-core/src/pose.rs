//! Controller identity and per-frame pose.

use glam::{Mat4, Quat, Vec3};

use crate::constants::FORWARD;

/// Stable slot index for a controller within an [`InteractionContext`](crate::InteractionContext).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(pub u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
    None,
}

/// Whether a controller's press/release drives the visible ray toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerRole {
    Designated,
    Secondary,
}

impl ControllerRole {
    /// The left hand carries the designated ray.
    pub fn for_handedness(handedness: Handedness) -> Self {
        match handedness {
            Handedness::Left => ControllerRole::Designated,
            Handedness::Right | Handedness::None => ControllerRole::Secondary,
        }
    }
}

impl Handedness {
    /// Preferred slot for a handed source; `None` when the source is unhanded.
    pub fn preferred_slot(self) -> Option<ControllerId> {
        match self {
            Handedness::Left => Some(ControllerId(0)),
            Handedness::Right => Some(ControllerId(1)),
            Handedness::None => None,
        }
    }
}

/// A ray in world space. `direction` is always unit length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// World transform of a controller's target-ray space for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerPose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for ControllerPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl ControllerPose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation: orientation.normalize(),
        }
    }

    /// Decompose a column-major world matrix (as delivered by WebXR).
    pub fn from_matrix(m: &Mat4) -> Self {
        let (_scale, orientation, position) = m.to_scale_rotation_translation();
        Self::new(position, orientation)
    }

    /// Pose at `position` aimed at `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let dir = (target - position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return Self::new(position, Quat::IDENTITY);
        }
        Self::new(position, Quat::from_rotation_arc(FORWARD, dir))
    }

    /// Origin at the controller, direction = rotation applied to local -Z.
    pub fn ray(&self) -> Ray {
        Ray::new(self.position, self.orientation * FORWARD)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }
}
