//! Access to the Mendix client global and the frame chain.

use js_sys::{Function, Reflect};
use mxlens_core::LensError;
use mxlens_core::preview::FrameLocation;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;

fn get(target: &JsValue, key: &str) -> Result<JsValue, LensError> {
    let value = Reflect::get(target, &JsValue::from_str(key))
        .map_err(|err| LensError::HostNotReady(format!("reading {key}: {err:?}")))?;
    if value.is_undefined() || value.is_null() {
        return Err(LensError::HostNotReady(format!("{key} is not defined")));
    }
    Ok(value)
}

/// `window.mx` is defined.
pub fn is_ready(window: &Window) -> bool {
    get(window, "mx").is_ok()
}

/// `mx.ui.getContentForm().path`.
pub fn content_form_path(window: &Window) -> Result<String, LensError> {
    let mx = get(window, "mx")?;
    let ui = get(&mx, "ui")?;
    let accessor = get(&ui, "getContentForm")?
        .dyn_into::<Function>()
        .map_err(|_| LensError::HostNotReady("getContentForm is not a function".into()))?;
    let form = accessor
        .call0(&ui)
        .map_err(|err| LensError::HostNotReady(format!("getContentForm threw: {err:?}")))?;
    if form.is_undefined() || form.is_null() {
        return Err(LensError::HostNotReady("no content form".into()));
    }
    get(&form, "path")?
        .as_string()
        .ok_or_else(|| LensError::HostNotReady("content form path is not a string".into()))
}

fn location_of(window: &Window) -> Option<FrameLocation> {
    let location = window.location();
    Some(FrameLocation {
        embedded: window.frame_element().ok().flatten().is_some(),
        pathname: location.pathname().ok()?,
        search: location.search().ok()?,
    })
}

/// Location facts from the current window up to the top-level one. Stops
/// early at a cross-origin boundary.
pub fn frame_chain(window: &Window) -> Vec<FrameLocation> {
    let mut chain = Vec::new();
    let mut current = window.clone();
    loop {
        let Some(location) = location_of(&current) else {
            break;
        };
        chain.push(location);
        let Ok(Some(parent)) = current.parent() else {
            break;
        };
        if JsValue::from(parent.clone()) == JsValue::from(current.clone()) {
            break;
        }
        current = parent;
    }
    chain
}
