//! Scene and interaction tuning.
//!
//! Hosts build a [`SceneConfig`] once at startup (usually via `Default`) and
//! hand it to [`InteractionContext::new`](crate::InteractionContext::new).

use glam::Vec3;

use crate::constants::*;
use crate::error::{XrError, XrResult};

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub panel_position: Vec3,
    pub panel_width: f32,
    pub panel_height: f32,
    pub buffer_width: u32,
    pub buffer_height: u32,
    pub marker_radius: f32,
    pub marker_color: [u8; 4],
    pub highlight_emissive: Vec3,
    pub highlight_darken: f32,
    pub ray_length: f32,
    pub preview_eye: Vec3,
    pub preview_fov_deg: f32,
    pub znear: f32,
    pub zfar: f32,
    pub background: Vec3,
    pub light_direction: Vec3,
    pub ambient: Vec3,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            panel_position: Vec3::from(PANEL_POSITION),
            panel_width: PANEL_WIDTH,
            panel_height: PANEL_HEIGHT,
            buffer_width: PANEL_BUFFER_WIDTH,
            buffer_height: PANEL_BUFFER_HEIGHT,
            marker_radius: MARKER_RADIUS_PX,
            marker_color: MARKER_COLOR,
            highlight_emissive: rgb(HIGHLIGHT_EMISSIVE),
            highlight_darken: HIGHLIGHT_DARKEN,
            ray_length: RAY_LENGTH,
            preview_eye: Vec3::from(PREVIEW_EYE),
            preview_fov_deg: PREVIEW_FOV_DEG,
            znear: PREVIEW_ZNEAR,
            zfar: PREVIEW_ZFAR,
            background: rgb(BACKGROUND_COLOR),
            light_direction: Vec3::from(LIGHT_DIRECTION).normalize(),
            ambient: rgb(AMBIENT_COLOR),
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> XrResult<()> {
        if !(self.panel_width > 0.0 && self.panel_height > 0.0) {
            return Err(XrError::InvalidConfig("panel size must be positive"));
        }
        if self.buffer_width == 0 || self.buffer_height == 0 {
            return Err(XrError::InvalidConfig("panel buffer must be non-empty"));
        }
        if !(self.highlight_darken > 0.0 && self.highlight_darken <= 1.0) {
            return Err(XrError::InvalidConfig("darken factor must be in (0, 1]"));
        }
        if self.marker_radius < 0.0 || self.ray_length <= 0.0 {
            return Err(XrError::InvalidConfig("marker radius and ray length"));
        }
        if !(self.znear > 0.0 && self.zfar > self.znear) {
            return Err(XrError::InvalidConfig("clip planes"));
        }
        Ok(())
    }

    /// Preview (non-immersive) view matrix: camera at `preview_eye` looking down -Z.
    pub fn preview_view(&self) -> glam::Mat4 {
        let target = self.preview_eye + FORWARD;
        glam::Mat4::look_at_rh(self.preview_eye, target, Vec3::Y)
    }

    pub fn preview_projection(&self, aspect: f32) -> glam::Mat4 {
        glam::Mat4::perspective_rh_gl(
            self.preview_fov_deg.to_radians(),
            aspect.max(1e-3),
            self.znear,
            self.zfar,
        )
    }
}
