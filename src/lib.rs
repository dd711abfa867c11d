#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;
use xr_core::model::ProceduralModels;
use xr_core::{InteractionContext, SceneConfig};

mod constants;
mod dom;
mod frame;
mod overlay;
mod panel_canvas;
mod render;
mod xr;

use constants::CANVAS_ID;
use overlay::ButtonState;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("xr-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

fn webgl2_context(canvas: &web::HtmlCanvasElement) -> anyhow::Result<web::WebGl2RenderingContext> {
    let attrs = dom::js_object(&[
        ("xrCompatible", JsValue::TRUE),
        ("antialias", JsValue::TRUE),
    ]);
    canvas
        .get_context_with_context_options("webgl2", &attrs)
        .map_err(dom::js_err)?
        .ok_or_else(|| anyhow::anyhow!("webgl2 unavailable"))?
        .dyn_into::<web::WebGl2RenderingContext>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    dom::wire_canvas_resize(&canvas);

    let mut ctx = InteractionContext::new(SceneConfig::default())?;
    if let Err(e) = panel_canvas::seed_panel(&document, &mut ctx.panel_mut().buffer) {
        log::warn!("[panel] seeding failed, using blank panel: {:?}", e);
    }

    let gl = webgl2_context(&canvas)?;
    let renderer = render::GlRenderer::new(gl, ctx.config())?;

    let button = overlay::vr_button(&document)?;
    let support = xr::probe_support().await;
    overlay::set_state(&button, support);
    log::info!("[xr] {}", support.label());

    let shared = Rc::new(RefCell::new(frame::FrameContext {
        ctx,
        renderer,
        canvas,
        button: button.clone(),
        xr: None,
        models: ProceduralModels,
    }));

    if support == ButtonState::Enter {
        let shared_click = shared.clone();
        dom::add_click_listener(&button, move || xr::toggle_session(&shared_click));
    }

    frame::start_loop(shared);
    Ok(())
}
