//! Applies [`PanelView`]s to the live panel node and owns the marker.

use mxlens_core::highlight::PULSE_KEYFRAMES;
use mxlens_core::render::{Declaration, MetadataSpan, PanelButton, glyph_style};
use js_sys::Reflect;
use mxlens_core::{ChildRole, Display, MarkerGeometry, PanelView, Rect, ids};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CssStyleDeclaration, Document, Element, HtmlElement, Node};

use crate::handles::Listener;

fn set_styles(element: &HtmlElement, declarations: &[Declaration]) -> Result<(), JsValue> {
    let style = element.style();
    for (name, value) in declarations {
        if value.is_empty() {
            style.remove_property(name)?;
        } else {
            style.set_property(name, value)?;
        }
    }
    Ok(())
}

/// Inline style of any element kind: HTML, SVG or MathML.
fn inline_style(element: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        return Some(html.style());
    }
    Reflect::get(element, &JsValue::from_str("style"))
        .ok()?
        .dyn_into::<CssStyleDeclaration>()
        .ok()
}

fn create(document: &Document, tag: &str, id: Option<&str>) -> Result<HtmlElement, JsValue> {
    let element = document.create_element(tag)?.dyn_into::<HtmlElement>()?;
    if let Some(id) = id {
        element.set_id(id);
    }
    Ok(element)
}

fn create_button(document: &Document, button: PanelButton) -> Result<HtmlElement, JsValue> {
    let element = create(document, "button", Some(button.dom_id()))?;
    element.set_attribute("type", "button")?;
    element.set_attribute("aria-label", button.aria_label())?;
    element.set_text_content(Some(button.caption()));
    Ok(element)
}

/// Handles to the panel and its fixed children.
pub struct PanelDom {
    document: Document,
    root: HtmlElement,
    glyph: HtmlElement,
    page_line: HtmlElement,
    close: HtmlElement,
    collapse: HtmlElement,
    spans: Vec<HtmlElement>,
    spans_generation: Option<u64>,
    listeners: Vec<Listener>,
}

impl PanelDom {
    /// Build the panel and append it to the body.
    pub fn create(document: &Document) -> Result<Self, JsValue> {
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        let root = create(document, "div", Some(ids::PANEL))?;
        root.set_attribute("aria-label", "Mendix Lens")?;
        let glyph = create(document, "span", Some(ids::INFO_ICON))?;
        glyph.set_text_content(Some("i"));
        let page_line = create(document, "span", Some(ids::PAGE_NAME))?;
        let close = create_button(document, PanelButton::Close)?;
        let collapse = create_button(document, PanelButton::Collapse)?;
        for child in [&glyph, &page_line, &close, &collapse] {
            root.append_child(child)?;
        }
        body.append_child(&root)?;
        Ok(Self {
            document: document.clone(),
            root,
            glyph,
            page_line,
            close,
            collapse,
            spans: Vec::new(),
            spans_generation: None,
            listeners: Vec::new(),
        })
    }

    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    pub fn button(&self, button: PanelButton) -> &HtmlElement {
        match button {
            PanelButton::Close => &self.close,
            PanelButton::Collapse => &self.collapse,
        }
    }

    /// Keep a listener attached to a panel node alive as long as the panel.
    pub fn own(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.root.contains(Some(node))
    }

    pub fn rect(&self) -> Rect {
        let rect = self.root.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    /// Bring the node tree in line with `view`, updating nodes in place.
    pub fn apply(&mut self, view: &PanelView) -> Result<(), JsValue> {
        set_styles(&self.root, &view.panel_style())?;
        set_styles(&self.glyph, &glyph_style(view.display_for(ChildRole::Glyph)))?;
        let buttons = view.display_for(ChildRole::Button);
        set_styles(&self.close, &PanelButton::Close.style(buttons))?;
        set_styles(&self.collapse, &PanelButton::Collapse.style(buttons))?;

        let page_text = view.page_line.as_deref().unwrap_or_default();
        if self.page_line.text_content().as_deref() != Some(page_text) {
            self.page_line.set_text_content(Some(page_text));
        }

        if self.spans_generation != Some(view.spans_generation) {
            self.rebuild_spans(&view.spans)?;
            self.spans_generation = Some(view.spans_generation);
        }
        let content = view.content_style();
        set_styles(&self.page_line, &content)?;
        for span in &self.spans {
            set_styles(span, &content)?;
        }
        Ok(())
    }

    fn rebuild_spans(&mut self, spans: &[MetadataSpan]) -> Result<(), JsValue> {
        for span in self.spans.drain(..) {
            span.remove();
        }
        for span in spans {
            let element = create(&self.document, "span", Some(span.kind.dom_id()))?;
            element.append_child(&self.document.create_element("br")?)?;
            element.append_child(
                &self
                    .document
                    .create_text_node(&format!("{}: ", span.kind.label())),
            )?;
            for segment in &span.segments {
                let part = create(&self.document, "span", None)?;
                part.set_text_content(Some(&segment.text));
                if let Some(style) = segment.style() {
                    part.set_attribute("style", &style)?;
                }
                element.append_child(&part)?;
            }
            let anchor: &Node = &self.close;
            self.root.insert_before(&element, Some(anchor))?;
            self.spans.push(element);
        }
        Ok(())
    }

    /// Re-assert `display` on every element child, including nodes the host
    /// added. `display` maps a child's role to what it must show right now.
    pub fn resync<F>(&self, display: F) -> Result<(), JsValue>
    where
        F: Fn(ChildRole) -> Option<Display>,
    {
        let children = self.root.children();
        for i in 0..children.length() {
            let Some(child) = children.item(i) else {
                continue;
            };
            let Some(display) = display(ChildRole::from_id(&child.id())) else {
                continue;
            };
            let Some(style) = inline_style(&child) else {
                tracing::trace!(tag = %child.tag_name(), "child has no inline style");
                continue;
            };
            if style.get_property_value("display")? != display.as_css() {
                style.set_property("display", display.as_css())?;
            }
        }
        Ok(())
    }

    pub fn remove(self) {
        self.root.remove();
    }
}

fn ensure_pulse_style(document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id(ids::PULSE_STYLE).is_some() {
        return Ok(());
    }
    let style = document.create_element("style")?;
    style.set_id(ids::PULSE_STYLE);
    style.set_text_content(Some(PULSE_KEYFRAMES));
    let parent: Element = match document.head() {
        Some(head) => head.into(),
        None => document
            .document_element()
            .ok_or_else(|| JsValue::from_str("document has no root element"))?,
    };
    parent.append_child(&style)?;
    Ok(())
}

pub fn place_marker(document: &Document, marker: &MarkerGeometry) -> Result<(), JsValue> {
    remove_marker(document);
    ensure_pulse_style(document)?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    let element = create(document, "div", Some(ids::HIGHLIGHT))?;
    set_styles(&element, &marker.style())?;
    body.append_child(&element)?;
    Ok(())
}

pub fn remove_marker(document: &Document) {
    if let Some(marker) = document.get_element_by_id(ids::HIGHLIGHT) {
        marker.remove();
    }
}
