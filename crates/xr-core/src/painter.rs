use glam::Vec2;
use log::info;

use crate::panel::{Panel, Rgba};

/// Stamps a fixed-size marker on the panel buffer where a press landed.
#[derive(Clone, Debug)]
pub struct HitPainter {
    pub radius: f32,
    pub color: Rgba,
}

impl HitPainter {
    pub fn new(radius: f32, color: Rgba) -> Self {
        Self { radius, color }
    }

    /// Map a panel-local point to buffer pixel coordinates.
    ///
    /// `px = (x + W/2) * (bw / W)`, `py = (y + H/2) * (bh / H)`. No clamping:
    /// points outside the panel map outside the buffer.
    pub fn panel_to_pixel(panel: &Panel, local: Vec2) -> Vec2 {
        let w = panel.width;
        let h = panel.height;
        let bw = panel.buffer.width() as f32;
        let bh = panel.buffer.height() as f32;
        Vec2::new((local.x + w / 2.0) * (bw / w), (local.y + h / 2.0) * (bh / h))
    }

    /// Draw a marker at `local` and mark the buffer for re-upload.
    pub fn paint(&self, panel: &mut Panel, local: Vec2) -> Vec2 {
        let px = Self::panel_to_pixel(panel, local);
        let written = panel.buffer.fill_circle(px.x, px.y, self.radius, self.color);
        info!(
            "[paint] panel local=({:.3},{:.3}) px=({:.1},{:.1}) pixels={}",
            local.x, local.y, px.x, px.y, written
        );
        px
    }
}
