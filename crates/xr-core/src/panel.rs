//! The paintable panel: a fixed-resolution RGBA buffer mapped onto a quad.

use crate::error::{XrError, XrResult};
use crate::raycast::TargetId;

pub type Rgba = [u8; 4];

pub const WHITE: Rgba = [0xff, 0xff, 0xff, 0xff];

/// RGBA8 pixel buffer uploaded as the panel texture.
///
/// Row 0 is the bottom row, so texture coordinate v = 0 samples row 0 and
/// panel-local +y maps to increasing rows.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    dirty: bool,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, fill: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; (width as usize) * (height as usize)],
            dirty: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
        self.dirty = true;
    }

    /// Fill a disc centered at `(cx, cy)` in pixel units. Pixels whose centers
    /// fall inside the radius are written; anything outside the buffer is
    /// clipped without error. Returns the number of pixels written.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) -> usize {
        self.dirty = true;
        if !(cx.is_finite() && cy.is_finite()) || radius <= 0.0 {
            return 0;
        }
        let r2 = radius * radius;
        let x0 = ((cx - radius).floor() as i64).max(0);
        let x1 = ((cx + radius).ceil() as i64).min(self.width as i64 - 1);
        let y0 = ((cy - radius).floor() as i64).max(0);
        let y1 = ((cy + radius).ceil() as i64).min(self.height as i64 - 1);
        let mut written = 0;
        for y in y0..=y1 {
            let dy = y as f32 + 0.5 - cy;
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                if dx * dx + dy * dy <= r2 {
                    if let Some(i) = self.index(x, y) {
                        self.pixels[i] = color;
                        written += 1;
                    }
                }
            }
        }
        written
    }

    /// Replace the contents with a top-down RGBA image (as read back from a
    /// 2D canvas), flipping rows into bottom-up order.
    pub fn load_rgba_flipped(&mut self, top_down: &[u8]) -> XrResult<()> {
        let row = self.width as usize * 4;
        let expected = row * self.height as usize;
        if top_down.len() != expected {
            return Err(XrError::BufferSize {
                expected,
                got: top_down.len(),
            });
        }
        let dst: &mut [u8] = bytemuck::cast_slice_mut(&mut self.pixels);
        for (y, src_row) in top_down.chunks_exact(row).enumerate() {
            let flipped = self.height as usize - 1 - y;
            dst[flipped * row..(flipped + 1) * row].copy_from_slice(src_row);
        }
        self.dirty = true;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether the buffer needs re-upload and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

/// The interactive panel: its scene target plus the paintable buffer.
#[derive(Clone, Debug)]
pub struct Panel {
    pub target: TargetId,
    pub width: f32,
    pub height: f32,
    pub buffer: PixelBuffer,
}

impl Panel {
    pub fn new(target: TargetId, width: f32, height: f32, buffer: PixelBuffer) -> Self {
        Self {
            target,
            width,
            height,
            buffer,
        }
    }
}
