//! Emulated immersive session: two controllers aimed with mouse and keyboard.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use xr_core::draw::ControllerFrame;
use xr_core::{
    ControllerId, ControllerPose, FrameInput, InteractionContext, PressOutcome, SceneConfig,
    XrResult,
};

pub const DESIGNATED: ControllerId = ControllerId(0);
pub const SECONDARY: ControllerId = ControllerId(1);

// Controllers held a little below and in front of the preview eye.
const DESIGNATED_OFFSET: Vec3 = Vec3::new(-0.25, -0.3, -0.5);
const SECONDARY_OFFSET: Vec3 = Vec3::new(0.25, -0.3, -0.5);
const AIM_STEP_RAD: f32 = 0.04;
const PITCH_LIMIT_RAD: f32 = 1.4;

pub struct Simulator {
    pub ctx: InteractionContext,
    /// Cursor in normalized device coordinates, if inside the window.
    cursor: Option<Vec2>,
    aspect: f32,
    yaw: f32,
    pitch: f32,
}

impl Simulator {
    pub fn new(config: SceneConfig) -> XrResult<Self> {
        Ok(Self {
            ctx: InteractionContext::new(config)?,
            cursor: None,
            aspect: 1.0,
            yaw: 0.0,
            pitch: 0.0,
        })
    }

    pub fn toggle_session(&mut self) {
        if self.ctx.is_session_active() {
            self.ctx.end_session();
        } else {
            self.ctx.start_session();
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect.max(1e-3);
    }

    /// Track the cursor from window pixel coordinates.
    pub fn set_cursor(&mut self, x: f64, y: f64, width: u32, height: u32) {
        if width == 0 || height == 0 {
            self.cursor = None;
            return;
        }
        let nx = (x / width as f64) * 2.0 - 1.0;
        let ny = 1.0 - (y / height as f64) * 2.0;
        self.cursor = Some(Vec2::new(nx as f32, ny as f32));
    }

    pub fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    /// Turn the secondary controller by whole steps.
    pub fn nudge_secondary(&mut self, yaw_steps: i32, pitch_steps: i32) {
        self.yaw -= yaw_steps as f32 * AIM_STEP_RAD;
        self.pitch = (self.pitch + pitch_steps as f32 * AIM_STEP_RAD)
            .clamp(-PITCH_LIMIT_RAD, PITCH_LIMIT_RAD);
    }

    pub fn view(&self) -> Mat4 {
        self.ctx.config().preview_view()
    }

    /// Projection with a 0..1 depth range.
    pub fn projection(&self) -> Mat4 {
        let config = self.ctx.config();
        Mat4::perspective_rh(
            config.preview_fov_deg.to_radians(),
            self.aspect,
            config.znear,
            config.zfar,
        )
    }

    fn designated_pose(&self) -> ControllerPose {
        let config = self.ctx.config();
        let eye = config.preview_eye;
        let position = eye + DESIGNATED_OFFSET;
        let Some(ndc) = self.cursor else {
            return ControllerPose::looking_at(position, config.panel_position);
        };
        let inv = (self.projection() * self.view()).inverse();
        let near = inv.project_point3(ndc.extend(0.0));
        let far = inv.project_point3(ndc.extend(1.0));
        let dir = (far - near).normalize_or_zero();
        // aim at whatever the cursor covers on the panel plane
        let target = if dir.z < -1e-6 {
            let t = (config.panel_position.z - eye.z) / dir.z;
            eye + dir * t
        } else {
            eye + dir * config.ray_length
        };
        ControllerPose::looking_at(position, target)
    }

    fn secondary_pose(&self) -> ControllerPose {
        let position = self.ctx.config().preview_eye + SECONDARY_OFFSET;
        let base = ControllerPose::looking_at(position, self.ctx.config().panel_position);
        let turn = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
        ControllerPose::new(position, turn * base.orientation)
    }

    /// Poses of both controllers while the session runs; empty otherwise.
    pub fn input(&self) -> FrameInput {
        if !self.ctx.is_session_active() {
            return FrameInput::new();
        }
        FrameInput::new()
            .with(DESIGNATED, self.designated_pose())
            .with(SECONDARY, self.secondary_pose())
    }

    /// Advance one frame and return what to draw for the controllers.
    pub fn frame(&mut self) -> Vec<ControllerFrame> {
        let input = self.input();
        self.ctx.on_frame(&input);
        [DESIGNATED, SECONDARY]
            .into_iter()
            .filter_map(|id| {
                let pose = *input.pose(id)?;
                Some(ControllerFrame {
                    id,
                    ray_pose: Some(pose),
                    grip: Some(pose.matrix()),
                })
            })
            .collect()
    }

    pub fn press(&mut self, id: ControllerId) -> PressOutcome {
        let input = self.input();
        self.ctx.on_press(id, &input)
    }

    pub fn release(&mut self, id: ControllerId) -> bool {
        self.ctx.on_release(id)
    }
}
