//! [`DomNode`] over live `web_sys` nodes.

use js_sys::Reflect;
use mxlens_core::DomNode;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Node};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebNode(pub Node);

impl WebNode {
    fn element(&self) -> Option<&Element> {
        self.0.dyn_ref::<Element>()
    }
}

impl DomNode for WebNode {
    fn parent(&self) -> Option<Self> {
        self.0
            .parent_element()
            .map(|parent| Self(parent.unchecked_into()))
    }

    fn class_names(&self) -> Vec<String> {
        let Some(element) = self.element() else {
            return Vec::new();
        };
        let list = element.class_list();
        (0..list.length()).filter_map(|i| list.item(i)).collect()
    }

    fn tag_name(&self) -> Option<String> {
        self.element().map(|e| e.tag_name().to_ascii_lowercase())
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element()?.get_attribute(name)
    }

    fn attributes(&self) -> Vec<(String, String)> {
        let Some(element) = self.element() else {
            return Vec::new();
        };
        let map = element.attributes();
        (0..map.length())
            .filter_map(|i| map.item(i))
            .map(|attr| (attr.name(), attr.value()))
            .collect()
    }

    fn disabled_property(&self) -> bool {
        self.element()
            .and_then(|e| Reflect::get(e, &JsValue::from_str("disabled")).ok())
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}
