use glam::Vec3;

// Shared scene/interaction constants used by both web and native frontends.

// Panel layout
pub const PANEL_POSITION: [f32; 3] = [0.0, 1.6, -2.0]; // 2 m in front at eye level
pub const PANEL_WIDTH: f32 = 1.6;
pub const PANEL_HEIGHT: f32 = 0.9;
pub const PANEL_BUFFER_WIDTH: u32 = 320;
pub const PANEL_BUFFER_HEIGHT: u32 = 180;

// Hit painting
pub const MARKER_RADIUS_PX: f32 = 5.0;
pub const MARKER_COLOR: [u8; 4] = [0xff, 0x00, 0x00, 0xff];

// Highlight appearance
pub const HIGHLIGHT_EMISSIVE: u32 = 0x666666;
pub const HIGHLIGHT_DARKEN: f32 = 0.8;

// Controller decorations
pub const RAY_LENGTH: f32 = 5.0;
pub const RAY_COLOR: u32 = 0xffffff;
pub const RAY_ACTIVE_COLOR: u32 = 0xff0000;
// Lines are 1px wide; the active overlay is nudged up so it wins the depth test.
pub const RAY_OVERLAY_BIAS: f32 = 0.001;
pub const CUBE_SIZE: f32 = 0.1;
pub const CUBE_COLOR: u32 = 0x00ff00;
pub const CUBE_OPACITY: f32 = 0.8;
pub const CUBE_OFFSET_Y: f32 = 0.05;

// Placeholder controller model
pub const PLACEHOLDER_BODY_SIZE: f32 = 0.08;
pub const PLACEHOLDER_GRIP_RADIUS: f32 = 0.02;
pub const PLACEHOLDER_GRIP_LENGTH: f32 = 0.1;
pub const PLACEHOLDER_GRIP_SEGMENTS: u16 = 8;
pub const PLACEHOLDER_COLOR: u32 = 0x888888;

// Preview camera and lighting
pub const PREVIEW_EYE: [f32; 3] = [0.0, 1.6, 3.0];
pub const PREVIEW_FOV_DEG: f32 = 50.0;
pub const PREVIEW_ZNEAR: f32 = 0.1;
pub const PREVIEW_ZFAR: f32 = 10.0;
pub const BACKGROUND_COLOR: u32 = 0x505050;
pub const LIGHT_DIRECTION: [f32; 3] = [1.0, 1.0, 1.0];
pub const AMBIENT_COLOR: u32 = 0x666666;

// Local forward axis of a controller's target-ray space
pub const FORWARD: Vec3 = Vec3::NEG_Z;

/// Convert a packed `0xRRGGBB` color to linear-ish `[0, 1]` components.
#[inline]
pub fn rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}
