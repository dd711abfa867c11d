use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;
use xr_core::draw::{build_draw_list, ControllerFrame};
use xr_core::model::{load_controller_model, ProceduralModels};
use xr_core::{FrameInput, InteractionContext};

use crate::render::{GlRenderer, ViewTarget};
use crate::xr::{self, ActiveSession};

pub struct FrameContext {
    pub ctx: InteractionContext,
    pub renderer: GlRenderer,
    pub canvas: web::HtmlCanvasElement,
    pub button: web::HtmlElement,
    pub xr: Option<ActiveSession>,
    pub models: ProceduralModels,
}

impl FrameContext {
    /// Flat-screen view of the scene while no session is running.
    pub fn preview_frame(&mut self) {
        if self.xr.is_some() {
            return;
        }
        self.renderer.sync_panel(&mut self.ctx.panel_mut().buffer);
        let (w, h) = (self.canvas.width() as i32, self.canvas.height() as i32);
        self.renderer.begin_frame(None, w, h);
        let config = self.ctx.config();
        let aspect = w as f32 / h.max(1) as f32;
        let view = ViewTarget {
            x: 0,
            y: 0,
            width: w,
            height: h,
            view_proj: config.preview_projection(aspect) * config.preview_view(),
        };
        let items = build_draw_list(&self.ctx, &[]);
        self.renderer.draw(&view, &items);
    }

    pub fn xr_frame(&mut self, frame: &web::XrFrame) {
        let Some(active) = self.xr.as_ref() else {
            return;
        };
        let session = active.session.clone();
        let ref_space = active.ref_space.clone();
        let Some(viewer) = frame.get_viewer_pose(&ref_space) else {
            return;
        };

        let sources = session.input_sources();
        let mut input = FrameInput::new();
        let mut controllers = Vec::with_capacity(sources.length() as usize);
        for i in 0..sources.length() {
            let Some(source) = sources.get(i) else {
                continue;
            };
            let id = self.ctx.assign_slot(xr::handedness(&source), i as usize);
            let ray_pose = xr::ray_pose(frame, &source, &ref_space);
            let grip = source
                .grip_space()
                .and_then(|space| xr::space_pose(frame, &space, &ref_space));
            if let Some(pose) = ray_pose {
                input.push(id, pose);
            }
            if grip.is_some() && !self.renderer.has_controller_model(id) {
                let model = load_controller_model(&self.models, &xr::profiles(&source), id);
                if let Err(e) = self.renderer.set_controller_model(id, &model) {
                    log::error!("[gl] controller {} model upload failed: {:?}", id.0, e);
                }
            }
            controllers.push(ControllerFrame { id, ray_pose, grip });
        }

        self.ctx.on_frame(&input);
        self.renderer.sync_panel(&mut self.ctx.panel_mut().buffer);

        let Some(layer) = session.render_state().base_layer() else {
            return;
        };
        self.renderer.begin_frame(
            layer.framebuffer().as_ref(),
            layer.framebuffer_width() as i32,
            layer.framebuffer_height() as i32,
        );
        let items = build_draw_list(&self.ctx, &controllers);
        for view in viewer.views().iter() {
            let view: web::XrView = view.unchecked_into();
            let Some(viewport) = layer.get_viewport(&view) else {
                continue;
            };
            let (Some(projection), Some(view_matrix)) = (
                xr::mat4(&view.projection_matrix()),
                xr::mat4(&view.transform().inverse().matrix()),
            ) else {
                continue;
            };
            let target = ViewTarget {
                x: viewport.x(),
                y: viewport.y(),
                width: viewport.width(),
                height: viewport.height(),
                view_proj: projection * view_matrix,
            };
            self.renderer.draw(&target, &items);
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().preview_frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

/// Drive `session.requestAnimationFrame` until the session ends.
pub fn start_xr_loop(frame_ctx: Rc<RefCell<FrameContext>>, session: &web::XrSession) {
    type XrTick = Closure<dyn FnMut(f64, web::XrFrame)>;
    let tick: Rc<RefCell<Option<XrTick>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |_time: f64, frame: web::XrFrame| {
        let active = {
            let mut app = frame_ctx.borrow_mut();
            app.xr_frame(&frame);
            app.xr.is_some()
        };
        if !active {
            // release the loop; wasm-bindgen defers the free until this call returns
            tick_clone.borrow_mut().take();
            return;
        }
        if let Some(cb) = tick_clone.borrow().as_ref() {
            frame.session().request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64, web::XrFrame)>));
    if let Some(cb) = tick.borrow().as_ref() {
        session.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
