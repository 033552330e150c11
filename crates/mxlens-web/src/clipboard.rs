//! Clipboard write with a synchronous fallback.

use js_sys::{Function, Promise, Reflect};
use mxlens_core::LensError;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlDocument, HtmlTextAreaElement, Window};

/// `navigator.clipboard.writeText`, falling back to a hidden textarea and
/// `execCommand("copy")` when the async API is missing or rejects.
pub async fn copy_text(window: &Window, text: &str) -> Result<(), LensError> {
    match write_text(window, text).await {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::debug!(error = ?err, "clipboard API unavailable; using fallback");
            let document = window
                .document()
                .ok_or_else(|| LensError::Clipboard("no document".into()))?;
            exec_copy(&document, text)
        }
    }
}

async fn write_text(window: &Window, text: &str) -> Result<(), JsValue> {
    let navigator = window.navigator();
    let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))?;
    if clipboard.is_undefined() || clipboard.is_null() {
        return Err(JsValue::from_str("navigator.clipboard is not available"));
    }
    let write = Reflect::get(&clipboard, &JsValue::from_str("writeText"))?
        .dyn_into::<Function>()?;
    let promise = write
        .call1(&clipboard, &JsValue::from_str(text))?
        .dyn_into::<Promise>()?;
    JsFuture::from(promise).await?;
    Ok(())
}

fn exec_copy(document: &Document, text: &str) -> Result<(), LensError> {
    let fail = |err: JsValue| LensError::Clipboard(format!("{err:?}"));
    let body = document
        .body()
        .ok_or_else(|| LensError::Clipboard("no body".into()))?;
    let area = document
        .create_element("textarea")
        .map_err(fail)?
        .dyn_into::<HtmlTextAreaElement>()
        .map_err(|_| LensError::Clipboard("textarea cast failed".into()))?;
    area.set_value(text);
    let style = area.style();
    for (name, value) in [
        ("position", "fixed"),
        ("top", "0"),
        ("left", "0"),
        ("opacity", "0"),
        ("pointer-events", "none"),
    ] {
        style.set_property(name, value).map_err(fail)?;
    }
    body.append_child(&area).map_err(fail)?;
    area.select();
    let copied = document
        .dyn_ref::<HtmlDocument>()
        .ok_or_else(|| LensError::Clipboard("not an HTML document".into()))
        .and_then(|html| html.exec_command("copy").map_err(fail));
    area.remove();
    if copied? {
        Ok(())
    } else {
        Err(LensError::Clipboard("execCommand(copy) refused".into()))
    }
}
