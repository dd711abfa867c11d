//! WebXR session plumbing: support probing, session setup and select events.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Mat4;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;
use xr_core::{ControllerPose, FrameInput, Handedness, PressOutcome};

use crate::dom::{js_err, js_object};
use crate::frame::{self, FrameContext};
use crate::overlay::{self, ButtonState};

type SelectClosure = Closure<dyn FnMut(web::XrInputSourceEvent)>;

/// A running immersive session and the listeners bound to it.
pub struct ActiveSession {
    pub session: web::XrSession,
    pub ref_space: web::XrReferenceSpace,
    _on_select_start: SelectClosure,
    _on_select_end: SelectClosure,
}

/// Probe for `navigator.xr` and immersive-vr support.
pub async fn probe_support() -> ButtonState {
    let Some(window) = web::window() else {
        return ButtonState::Unsupported;
    };
    let navigator = window.navigator();
    let has_xr = js_sys::Reflect::has(&navigator, &JsValue::from_str("xr")).unwrap_or(false);
    if !has_xr {
        return if window.is_secure_context() {
            ButtonState::Unsupported
        } else {
            ButtonState::Insecure
        };
    }
    let promise = navigator.xr().is_session_supported(web::XrSessionMode::ImmersiveVr);
    match JsFuture::from(promise).await {
        Ok(v) if v.as_bool().unwrap_or(false) => ButtonState::Enter,
        Ok(_) => ButtonState::Unsupported,
        Err(e) => {
            log::warn!("[xr] isSessionSupported failed: {:?}", e);
            ButtonState::Unsupported
        }
    }
}

pub fn handedness(source: &web::XrInputSource) -> Handedness {
    match source.handedness() {
        web::XrHandedness::Left => Handedness::Left,
        web::XrHandedness::Right => Handedness::Right,
        _ => Handedness::None,
    }
}

/// Column-major matrix from a WebXR `Float32Array`, if well formed.
pub fn mat4(values: &[f32]) -> Option<Mat4> {
    (values.len() >= 16).then(|| Mat4::from_cols_slice(&values[..16]))
}

pub fn space_pose(
    frame: &web::XrFrame,
    space: &web::XrSpace,
    base: &web::XrReferenceSpace,
) -> Option<Mat4> {
    let pose = frame.get_pose(space, base)?;
    mat4(&pose.transform().matrix())
}

pub fn ray_pose(
    frame: &web::XrFrame,
    source: &web::XrInputSource,
    base: &web::XrReferenceSpace,
) -> Option<ControllerPose> {
    space_pose(frame, &source.target_ray_space(), base).map(|m| ControllerPose::from_matrix(&m))
}

pub fn profiles(source: &web::XrInputSource) -> Vec<String> {
    source
        .profiles()
        .iter()
        .filter_map(|v| v.as_string())
        .collect()
}

/// Index of `source` in the session's input source list.
fn source_index(session: &web::XrSession, source: &web::XrInputSource) -> usize {
    let sources = session.input_sources();
    let target: &JsValue = source.as_ref();
    (0..sources.length())
        .find(|&i| {
            sources
                .get(i)
                .map(|s| AsRef::<JsValue>::as_ref(&s) == target)
                .unwrap_or(false)
        })
        .unwrap_or(0) as usize
}

fn select_listener(shared: &Rc<RefCell<FrameContext>>, pressed: bool) -> SelectClosure {
    let shared = shared.clone();
    Closure::wrap(Box::new(move |event: web::XrInputSourceEvent| {
        let Ok(mut app) = shared.try_borrow_mut() else {
            log::warn!("[xr] select event dropped, frame in progress");
            return;
        };
        let Some(active) = app.xr.as_ref() else {
            return;
        };
        let source = event.input_source();
        let index = source_index(&active.session, &source);
        let pose = ray_pose(&event.frame(), &source, &active.ref_space);
        let id = app.ctx.assign_slot(handedness(&source), index);
        if pressed {
            let mut input = FrameInput::new();
            if let Some(pose) = pose {
                input.push(id, pose);
            }
            if let PressOutcome::Painted { pixel, .. } = app.ctx.on_press(id, &input) {
                log::debug!("[xr] controller {} painted at {:?}", id.0, pixel);
            }
        } else {
            app.ctx.on_release(id);
        }
    }) as Box<dyn FnMut(web::XrInputSourceEvent)>)
}

async fn request_reference_space(session: &web::XrSession) -> anyhow::Result<web::XrReferenceSpace> {
    let floor = JsFuture::from(session.request_reference_space(web::XrReferenceSpaceType::LocalFloor)).await;
    let space = match floor {
        Ok(space) => space,
        Err(e) => {
            log::warn!("[xr] local-floor unavailable ({:?}), using local", e);
            JsFuture::from(session.request_reference_space(web::XrReferenceSpaceType::Local))
                .await
                .map_err(js_err)?
        }
    };
    Ok(space.unchecked_into())
}

/// Request an immersive-vr session and bind it to the renderer.
pub async fn start_session(shared: Rc<RefCell<FrameContext>>) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let features = js_sys::Array::of1(&JsValue::from_str("local-floor"));
    let init: web::XrSessionInit = js_object(&[("optionalFeatures", features.into())]).unchecked_into();
    let session: web::XrSession = JsFuture::from(
        window
            .navigator()
            .xr()
            .request_session_with_options(web::XrSessionMode::ImmersiveVr, &init),
    )
    .await
    .map_err(js_err)?
    .unchecked_into();

    let gl = shared.borrow().renderer.gl().clone();
    let layer = web::XrWebGlLayer::new_with_web_gl2_rendering_context(&session, &gl).map_err(js_err)?;
    let render_state: web::XrRenderStateInit =
        js_object(&[("baseLayer", layer.into())]).unchecked_into();
    session.update_render_state_with_state(&render_state);

    let ref_space = request_reference_space(&session).await?;

    let on_select_start = select_listener(&shared, true);
    let on_select_end = select_listener(&shared, false);
    session
        .add_event_listener_with_callback("selectstart", on_select_start.as_ref().unchecked_ref())
        .map_err(js_err)?;
    session
        .add_event_listener_with_callback("selectend", on_select_end.as_ref().unchecked_ref())
        .map_err(js_err)?;

    let shared_end = shared.clone();
    let on_end = Closure::once_into_js(move || end_session(&shared_end));
    session
        .add_event_listener_with_callback("end", on_end.unchecked_ref())
        .map_err(js_err)?;

    {
        let mut app = shared.borrow_mut();
        app.ctx.start_session();
        overlay::set_state(&app.button, ButtonState::Exit);
        app.xr = Some(ActiveSession {
            session: session.clone(),
            ref_space,
            _on_select_start: on_select_start,
            _on_select_end: on_select_end,
        });
    }
    frame::start_xr_loop(shared, &session);
    Ok(())
}

fn end_session(shared: &Rc<RefCell<FrameContext>>) {
    let mut app = shared.borrow_mut();
    app.xr = None;
    app.ctx.end_session();
    overlay::set_state(&app.button, ButtonState::Enter);
}

/// Enter VR when idle, otherwise ask the running session to end.
pub fn toggle_session(shared: &Rc<RefCell<FrameContext>>) {
    let running = shared.borrow().xr.as_ref().map(|a| a.session.clone());
    match running {
        Some(session) => {
            // cleanup happens in the `end` listener
            _ = session.end();
        }
        None => {
            let shared = shared.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = start_session(shared).await {
                    log::error!("[xr] failed to start session: {:?}", e);
                }
            });
        }
    }
}
