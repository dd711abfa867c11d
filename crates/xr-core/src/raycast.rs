//! Ray casting from a controller pose against bounded planar targets.

use glam::{Quat, Vec2, Vec3};

use crate::pose::{ControllerPose, Ray};

/// Identifies an intersectable object in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetId(pub u32);

/// Double-sided rectangle centered at its local origin, spanning
/// `[-w/2, w/2] x [-h/2, h/2]` in the local XY plane (normal along +Z).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub position: Vec3,
    pub rotation: Quat,
    pub width: f32,
    pub height: f32,
}

/// Raw hit against a single quad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadHit {
    pub t: f32,
    pub point: Vec3,
    pub local: Vec2,
}

impl Quad {
    pub fn new(position: Vec3, width: f32, height: f32) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            width,
            height,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation.normalize();
        self
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn world_to_local(&self, p: Vec3) -> Vec3 {
        self.rotation.inverse() * (p - self.position)
    }

    pub fn model_matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// Ray/plane test followed by a bounds check in quad-local space.
    pub fn intersect(&self, ray: &Ray) -> Option<QuadHit> {
        let inv = self.rotation.inverse();
        let local_origin = inv * (ray.origin - self.position);
        let local_dir = inv * ray.direction;

        // a degenerate pose yields a NaN direction; treat it as no hit
        if !local_dir.is_finite() || local_dir.z.abs() < 1e-8 {
            return None; // parallel to the plane
        }
        let t = -local_origin.z / local_dir.z;
        if !t.is_finite() || t < 0.0 {
            return None; // plane is behind the ray
        }

        let hit = local_origin + local_dir * t;
        let half = self.half_extents();
        if !hit.is_finite() || hit.x.abs() > half.x || hit.y.abs() > half.y {
            return None;
        }

        Some(QuadHit {
            t,
            point: ray.at(t),
            local: Vec2::new(hit.x, hit.y),
        })
    }
}

/// Anything a controller ray can hit.
pub trait Intersectable {
    fn target_id(&self) -> TargetId;
    fn intersect_ray(&self, ray: &Ray) -> Option<QuadHit>;
}

/// Nearest hit of one controller ray. Lives for one frame or one event call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub target: TargetId,
    pub distance: f32,
    pub point: Vec3,
    /// Hit point in the target's local plane coordinates.
    pub local: Vec2,
}

/// Cast the controller ray against `targets` and return the nearest hit.
///
/// Interaction is disabled outside an immersive session, so this returns
/// `None` whenever `session_active` is false.
pub fn intersect<'a, T, I>(session_active: bool, pose: &ControllerPose, targets: I) -> Option<Intersection>
where
    T: Intersectable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    if !session_active {
        return None;
    }
    let ray = pose.ray();
    let mut best: Option<Intersection> = None;
    for target in targets {
        if let Some(hit) = target.intersect_ray(&ray) {
            match best {
                Some(b) if hit.t >= b.distance => {}
                _ => {
                    best = Some(Intersection {
                        target: target.target_id(),
                        distance: hit.t,
                        point: hit.point,
                        local: hit.local,
                    })
                }
            }
        }
    }
    best
}
