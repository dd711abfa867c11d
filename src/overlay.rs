//! The floating VR button.

use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Enter,
    Exit,
    Unsupported,
    Insecure,
}

impl ButtonState {
    pub fn label(self) -> &'static str {
        match self {
            ButtonState::Enter => LABEL_ENTER,
            ButtonState::Exit => LABEL_EXIT,
            ButtonState::Unsupported => LABEL_UNSUPPORTED,
            ButtonState::Insecure => LABEL_INSECURE,
        }
    }

    fn clickable(self) -> bool {
        matches!(self, ButtonState::Enter | ButtonState::Exit)
    }
}

/// Find `#vr-button`, or create and append it to `<body>`.
pub fn vr_button(document: &web::Document) -> anyhow::Result<web::HtmlElement> {
    if let Some(el) = document.get_element_by_id(VR_BUTTON_ID) {
        return el
            .dyn_into::<web::HtmlElement>()
            .map_err(|e| anyhow::anyhow!("{:?}", e));
    }
    let el = document
        .create_element("button")
        .map_err(crate::dom::js_err)?
        .dyn_into::<web::HtmlElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    el.set_id(VR_BUTTON_ID);
    _ = el.set_attribute("style", VR_BUTTON_STYLE);
    let body = document.body().ok_or_else(|| anyhow::anyhow!("no body"))?;
    body.append_child(&el).map_err(crate::dom::js_err)?;
    Ok(el)
}

pub fn set_state(button: &web::HtmlElement, state: ButtonState) {
    button.set_inner_text(state.label());
    let cursor = if state.clickable() { "pointer" } else { "auto" };
    _ = button.style().set_property("cursor", cursor);
    if state.clickable() {
        _ = button.remove_attribute("disabled");
    } else {
        _ = button.set_attribute("disabled", "");
    }
}
