//! Widget metadata resolution.
//!
//! Mendix marks the top node of every named widget with an `mx-name-<name>`
//! class, repeated list items with `mx-name-index-<n>`, and structural roles
//! with fixed `mx-*` classes. Everything here is a pure function of the
//! hovered node and its ancestors.

use serde::Serialize;

use crate::dom::{DomNode, nearest_ancestor};

/// Prefix of logical-name marker classes.
pub const NAME_PREFIX: &str = "mx-name-";
/// Prefix of row/item index marker classes.
pub const INDEX_PREFIX: &str = "mx-name-index-";
/// Attribute carrying the Mendix data identifier.
pub const DATA_ID_ATTR: &str = "data-mendix-id";
/// Class Mendix puts on disabled widgets.
pub const DISABLED_CLASS: &str = "mx-disabled";

/// Structural class → label shown as the widget type.
pub const WIDGET_TYPE_LABELS: &[(&str, &str)] = &[
    ("mx-datagrid", "Data grid"),
    ("mx-templategrid", "Template grid"),
    ("mx-listview", "List view"),
    ("mx-dataview", "Data view"),
    ("mx-button", "Button"),
    ("mx-link", "Link"),
    ("mx-image", "Image"),
    ("mx-input", "Input"),
    ("mx-dropdown", "Dropdown"),
    ("mx-checkbox", "Checkbox"),
    ("mx-radiobuttons", "Radio buttons"),
    ("mx-textarea", "Text area"),
    ("mx-label", "Label"),
    ("mx-container", "Container"),
    ("mx-divider", "Divider"),
    ("mx-tabpage", "Tab page"),
    ("mx-navigationlist", "Navigation list"),
    ("mx-menubar", "Menu bar"),
    ("mx-searchinput", "Search input"),
    ("mx-referencesetselector", "Reference set selector"),
    ("mx-sortablelist", "Sortable list"),
];

/// Everything the panel shows about a hovered element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetMetadata {
    pub logical_name: String,
    pub data_id: Option<String>,
    pub element_id: Option<String>,
    pub row_index: Option<u32>,
    pub widget_type: Option<&'static str>,
    pub custom_classes: Vec<String>,
    pub tag: Option<String>,
    pub disabled: bool,
}

/// Parse the digits of an `mx-name-index-<n>` class.
fn parse_index_class(class: &str) -> Option<u32> {
    let digits = class.strip_prefix(INDEX_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// True for `mx-name-*` classes that denote a logical widget name.
///
/// Row markers (`mx-name-index-<digits>`) share the prefix but name a list
/// position, not a widget.
#[must_use]
pub fn is_name_marker(class: &str) -> bool {
    class.starts_with(NAME_PREFIX) && parse_index_class(class).is_none()
}

fn name_marker_of<N: DomNode>(node: &N) -> Option<String> {
    node.class_names().into_iter().find(|c| is_name_marker(c))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Nearest ancestor-or-self carrying a logical-name marker class.
pub fn widget_root<N: DomNode>(target: &N) -> Option<N> {
    nearest_ancestor(target, |node| name_marker_of(node).map(|_| node.clone()))
}

/// The marker class of `root` with the prefix stripped.
pub fn logical_name<N: DomNode>(root: &N) -> Option<String> {
    name_marker_of(root).map(|class| class[NAME_PREFIX.len()..].to_owned())
}

/// `data-mendix-id` on the root, else on the nearest ancestor `div` with it.
pub fn data_identifier<N: DomNode>(root: &N) -> Option<String> {
    if let Some(id) = non_empty(root.attribute(DATA_ID_ATTR)) {
        return Some(id);
    }
    let parent = root.parent()?;
    nearest_ancestor(&parent, |node| {
        if node.tag_name().as_deref() != Some("div") {
            return None;
        }
        non_empty(node.attribute(DATA_ID_ATTR))
    })
}

/// The target's `id`, else the value of its first attribute whose name
/// contains "id" in any case.
pub fn element_identifier<N: DomNode>(target: &N) -> Option<String> {
    if let Some(id) = non_empty(target.attribute("id")) {
        return Some(id);
    }
    let (_, value) = target
        .attributes()
        .into_iter()
        .find(|(name, _)| name.to_ascii_lowercase().contains("id"))?;
    non_empty(Some(value))
}

/// Row/item index from the nearest valid `mx-name-index-<n>` class.
pub fn row_index<N: DomNode>(target: &N) -> Option<u32> {
    nearest_ancestor(target, |node| {
        node.class_names()
            .iter()
            .find_map(|c| parse_index_class(c))
    })
}

/// Label for a known structural class.
#[must_use]
pub fn widget_type_for_class(class: &str) -> Option<&'static str> {
    WIDGET_TYPE_LABELS
        .iter()
        .find(|(name, _)| *name == class)
        .map(|(_, label)| *label)
}

/// First known structural class, nearest node first and each node's classes in
/// list order.
pub fn widget_type_label<N: DomNode>(target: &N) -> Option<&'static str> {
    nearest_ancestor(target, |node| {
        node.class_names()
            .iter()
            .find_map(|c| widget_type_for_class(c))
    })
}

/// Non-marker classes of the nearest node carrying any `mx-name-*` class.
///
/// Inside list views the row item carries both the index marker and the
/// developer's classes, so that node is read before the widget root. Without
/// a widget root there are no custom classes.
pub fn custom_classes<N: DomNode>(target: &N) -> Vec<String> {
    if widget_root(target).is_none() {
        return Vec::new();
    }
    nearest_ancestor(target, |node| {
        let classes = node.class_names();
        classes
            .iter()
            .any(|c| c.starts_with(NAME_PREFIX))
            .then(|| {
                classes
                    .into_iter()
                    .filter(|c| !c.starts_with(NAME_PREFIX))
                    .collect()
            })
    })
    .unwrap_or_default()
}

/// True if the target or any ancestor is disabled.
pub fn is_disabled<N: DomNode>(target: &N) -> bool {
    nearest_ancestor(target, |node| {
        let disabled = node.disabled_property()
            || node.attribute("disabled").is_some()
            || node.attribute("aria-disabled").as_deref() == Some("true")
            || node.has_class(DISABLED_CLASS);
        disabled.then_some(())
    })
    .is_some()
}

/// Resolve the full metadata bundle, or `None` when the target is not inside
/// a named widget.
pub fn resolve<N: DomNode>(target: &N) -> Option<WidgetMetadata> {
    let root = widget_root(target)?;
    Some(WidgetMetadata {
        logical_name: logical_name(&root)?,
        data_id: data_identifier(&root),
        element_id: element_identifier(target),
        row_index: row_index(target),
        widget_type: widget_type_label(target),
        custom_classes: custom_classes(target),
        tag: target.tag_name().filter(|t| !t.is_empty()),
        disabled: is_disabled(target),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_dom::MemoryDocument;
    use pretty_assertions::assert_eq;

    #[test]
    fn index_marker_inside_named_widget() {
        let doc = MemoryDocument::new();
        let body = doc.element("body");
        let widget = doc.child(&body, "div");
        widget.with_classes(&["mx-name-MyWidget1"]);
        let row = doc.child(&widget, "div");
        row.with_classes(&["mx-name-index-3", "custom-foo"]);

        assert_eq!(widget_root(&row), Some(widget.clone()));
        assert_eq!(logical_name(&widget).as_deref(), Some("MyWidget1"));
        assert_eq!(row_index(&row), Some(3));
        assert_eq!(custom_classes(&row), vec!["custom-foo".to_owned()]);
    }

    #[test]
    fn nearest_root_wins() {
        let doc = MemoryDocument::new();
        let outer = doc.element("div");
        outer.with_classes(&["mx-name-outer"]);
        let inner = doc.child(&outer, "div");
        inner.with_classes(&["btn", "mx-name-inner", "mx-button"]);
        let leaf = doc.child(&inner, "span");

        let meta = resolve(&leaf).expect("inside a widget");
        assert_eq!(meta.logical_name, "inner");
        assert_eq!(meta.custom_classes, vec!["btn".to_owned(), "mx-button".to_owned()]);
        assert_eq!(meta.widget_type, Some("Button"));
        assert_eq!(meta.tag.as_deref(), Some("span"));
    }

    #[test]
    fn non_digit_index_is_absent_not_zero() {
        let doc = MemoryDocument::new();
        let root = doc.element("div");
        root.with_classes(&["mx-name-list"]);
        let item = doc.child(&root, "div");
        item.with_classes(&["mx-name-index-abc"]);
        assert_eq!(row_index(&item), None);

        let under_invalid = doc.child(&item, "div");
        let outer_item = doc.element("div");
        outer_item.with_classes(&["mx-name-index-7"]);
        let nested = doc.child(&outer_item, "div");
        nested.with_classes(&["mx-name-index-x1"]);
        assert_eq!(row_index(&nested), Some(7));
        assert_eq!(row_index(&under_invalid), None);
    }

    #[test]
    fn data_identifier_falls_back_to_ancestor_div() {
        let doc = MemoryDocument::new();
        let section = doc.element("section");
        section.set_attr(DATA_ID_ATTR, "section.skip");
        let holder = doc.child(&section, "div");
        holder.set_attr(DATA_ID_ATTR, "1.2.3");
        let span = doc.child(&holder, "span");
        let root = doc.child(&span, "div");
        root.with_classes(&["mx-name-field"]);

        assert_eq!(data_identifier(&root).as_deref(), Some("1.2.3"));
        root.set_attr(DATA_ID_ATTR, "9.9");
        assert_eq!(data_identifier(&root).as_deref(), Some("9.9"));
    }

    #[test]
    fn data_identifier_ignores_non_div_ancestors() {
        let doc = MemoryDocument::new();
        let section = doc.element("section");
        section.set_attr(DATA_ID_ATTR, "5.5");
        let root = doc.child(&section, "div");
        root.with_classes(&["mx-name-field"]);
        assert_eq!(data_identifier(&root), None);
    }

    #[test]
    fn element_identifier_falls_back_to_id_like_attribute() {
        let doc = MemoryDocument::new();
        let input = doc.element("input");
        input.set_attr("type", "text");
        input.set_attr("data-widgetID", "mxui_widget_TextInput_4");
        assert_eq!(
            element_identifier(&input).as_deref(),
            Some("mxui_widget_TextInput_4")
        );
        input.set_attr("id", "mxui.widget.7");
        assert_eq!(element_identifier(&input).as_deref(), Some("mxui.widget.7"));
    }

    #[test]
    fn disabled_sources() {
        let doc = MemoryDocument::new();
        let root = doc.element("div");
        let leaf = doc.child(&root, "button");
        assert!(!is_disabled(&leaf));

        root.set_attr("aria-disabled", "false");
        assert!(!is_disabled(&leaf));
        root.set_attr("aria-disabled", "true");
        assert!(is_disabled(&leaf));

        let other = doc.element("div");
        other.with_classes(&["mx-disabled"]);
        assert!(is_disabled(&doc.child(&other, "span")));

        let button = doc.element("button");
        button.set_disabled_property(true);
        assert!(is_disabled(&button));

        let attr = doc.element("input");
        attr.set_attr("disabled", "");
        assert!(is_disabled(&attr));
    }

    #[test]
    fn text_node_target_resolves_through_parent() {
        let doc = MemoryDocument::new();
        let root = doc.element("div");
        root.with_classes(&["mx-name-text1", "mx-label"]);
        let text = doc.text(&root);

        let meta = resolve(&text).expect("parent is a widget");
        assert_eq!(meta.logical_name, "text1");
        assert_eq!(meta.widget_type, Some("Label"));
        assert_eq!(meta.tag, None);
        assert_eq!(meta.element_id, None);
    }

    #[test]
    fn no_widget_root_means_no_metadata() {
        let doc = MemoryDocument::new();
        let plain = doc.element("div");
        plain.with_classes(&["mx-name-index-2", "row"]);
        assert_eq!(resolve(&plain), None);
        assert!(custom_classes(&plain).is_empty());
    }
}
