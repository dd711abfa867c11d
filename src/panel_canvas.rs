//! Seed the panel texture from an offscreen 2D canvas.

use wasm_bindgen::JsCast;
use web_sys as web;
use xr_core::PixelBuffer;

use crate::constants::*;
use crate::dom::js_err;

/// Draw the welcome text into a 2D canvas and copy it into `buffer`.
pub fn seed_panel(document: &web::Document, buffer: &mut PixelBuffer) -> anyhow::Result<()> {
    let (w, h) = (buffer.width(), buffer.height());
    let canvas = document
        .create_element("canvas")
        .map_err(js_err)?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    canvas.set_width(w);
    canvas.set_height(h);
    let ctx = canvas
        .get_context("2d")
        .map_err(js_err)?
        .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    ctx.set_fill_style_str(PANEL_BACKGROUND);
    ctx.fill_rect(0.0, 0.0, w as f64, h as f64);
    ctx.set_fill_style_str(PANEL_TEXT_COLOR);
    ctx.set_font(PANEL_FONT);
    for (text, x, y) in [PANEL_TITLE, PANEL_SUBTITLE] {
        ctx.fill_text(text, x, y).map_err(js_err)?;
    }

    let image = ctx
        .get_image_data(0.0, 0.0, w as f64, h as f64)
        .map_err(js_err)?;
    // 2D canvas rows run top-down; the buffer's row 0 is the bottom edge.
    buffer.load_rgba_flipped(&image.data())?;
    log::info!("[panel] seeded {}x{} texture", w, h);
    Ok(())
}
