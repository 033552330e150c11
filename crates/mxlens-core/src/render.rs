//! Declarative panel description.
//!
//! The controller never touches the document. It produces a [`PanelView`]
//! (what to show) plus CSS declaration lists (how it looks); the adapter owns
//! the node handles and applies both in place.

use serde::Serialize;

use crate::geometry::Point;
use crate::interaction::PanelMode;
use crate::resolver::WidgetMetadata;
use crate::resync::{ChildRole, Display, display_for};

/// Colours cycled over the dot-separated segments of a data identifier.
pub const DATA_ID_PALETTE: &[&str] = &[
    "red", "blue", "green", "orange", "purple", "pink", "brown", "cyan",
];

/// Colours cycled over the dot-separated segments of an element identifier.
pub const ELEMENT_ID_PALETTE: &[&str] = &[
    "black",
    "darkblue",
    "darkgreen",
    "darkred",
    "darkorange",
    "darkviolet",
    "darkslategray",
    "brown",
];

pub const Z_INDEX_PANEL: u32 = 2_147_483_645;
pub const Z_INDEX_BUTTONS: u32 = 2_147_483_647;

pub const ACCENT: &str = "#007bff";
pub const PANEL_BACKGROUND: &str = "#efeded";
pub const PANEL_BORDER: &str = "rgb(12,15,36)";
pub const PANEL_TEXT: &str = "#000000";
pub const CLOSE_BACKGROUND: &str = "#ff4d4d";
pub const COLLAPSE_BACKGROUND: &str = "rgb(1 166 220)";
pub const COPY_FLASH: &str = "#90EE90";

/// Where a mobile preview panel sits once expanded.
pub const MOBILE_EXPANDED_POSITION: Point = Point::new(6.0, 24.0);

/// A CSS property/value pair.
pub type Declaration = (&'static str, String);

fn decl(name: &'static str, value: impl Into<String>) -> Declaration {
    (name, value.into())
}

/// Kinds of metadata line, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FactKind {
    Name,
    DataId,
    ElementId,
    RowIndex,
    WidgetType,
    CustomClasses,
    Tag,
    Disabled,
}

impl FactKind {
    pub const ALL: [Self; 8] = [
        Self::Name,
        Self::DataId,
        Self::ElementId,
        Self::RowIndex,
        Self::WidgetType,
        Self::CustomClasses,
        Self::Tag,
        Self::Disabled,
    ];

    /// Fixed element id of the span holding this fact.
    #[must_use]
    pub const fn dom_id(self) -> &'static str {
        match self {
            Self::Name => "mxNameClass",
            Self::DataId => "mendixIdSpan",
            Self::ElementId => "elementIdSpan",
            Self::RowIndex => "mxRowIndexSpan",
            Self::WidgetType => "mxWidgetTypeSpan",
            Self::CustomClasses => "mxCustomClassesSpan",
            Self::Tag => "mxTagSpan",
            Self::Disabled => "mxDisabledSpan",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::DataId => "Data Mendix ID",
            Self::ElementId => "Element ID",
            Self::RowIndex => "Row/Item index",
            Self::WidgetType => "Widget type",
            Self::CustomClasses => "Extra classes",
            Self::Tag => "Tag",
            Self::Disabled => "Disabled",
        }
    }
}

/// A run of value text with optional colour and weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub color: Option<&'static str>,
    pub bold: bool,
}

impl Segment {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: false,
        }
    }

    #[must_use]
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: true,
        }
    }

    /// Inline style for the segment's own span, if it needs one.
    #[must_use]
    pub fn style(&self) -> Option<String> {
        match (self.color, self.bold) {
            (Some(color), _) => Some(format!("color:{color};font-weight:bold")),
            (None, true) => Some("font-weight:bold".to_owned()),
            (None, false) => None,
        }
    }
}

/// Split a dotted value and colour each segment from `palette`, starting at
/// `offset` and wrapping. Values without a dot stay a single plain segment.
#[must_use]
pub fn colorize(value: &str, palette: &[&'static str], offset: usize) -> Vec<Segment> {
    if palette.is_empty() || !value.contains('.') {
        return vec![Segment::plain(value)];
    }
    let mut segments = Vec::new();
    for (i, part) in value.split('.').enumerate() {
        if i > 0 {
            segments.push(Segment::plain("."));
        }
        segments.push(Segment {
            text: part.to_owned(),
            color: Some(palette[(offset + i) % palette.len()]),
            bold: true,
        });
    }
    segments
}

/// One labeled fact inside the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataSpan {
    pub kind: FactKind,
    pub segments: Vec<Segment>,
}

impl MetadataSpan {
    #[must_use]
    pub fn value_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// `label: value`, the text a reader (or the clipboard) sees.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{}: {}", self.kind.label(), self.value_text())
    }
}

/// Metadata lines for a resolved widget, one per present fact, in
/// [`FactKind`] order.
#[must_use]
pub fn spans_for(meta: &WidgetMetadata) -> Vec<MetadataSpan> {
    let mut spans = vec![MetadataSpan {
        kind: FactKind::Name,
        segments: vec![Segment::plain(meta.logical_name.clone())],
    }];
    let mut push = |kind, segments| spans.push(MetadataSpan { kind, segments });
    if let Some(id) = &meta.data_id {
        push(FactKind::DataId, colorize(id, DATA_ID_PALETTE, 0));
    }
    if let Some(id) = &meta.element_id {
        push(FactKind::ElementId, colorize(id, ELEMENT_ID_PALETTE, 0));
    }
    if let Some(index) = meta.row_index {
        push(FactKind::RowIndex, vec![Segment::bold(index.to_string())]);
    }
    if let Some(label) = meta.widget_type {
        push(FactKind::WidgetType, vec![Segment::bold(label)]);
    }
    if !meta.custom_classes.is_empty() {
        push(
            FactKind::CustomClasses,
            vec![Segment::bold(meta.custom_classes.join(" "))],
        );
    }
    if let Some(tag) = &meta.tag {
        push(FactKind::Tag, vec![Segment::bold(tag.clone())]);
    }
    if meta.disabled {
        push(FactKind::Disabled, vec![Segment::bold("yes")]);
    }
    spans
}

/// Page line text for a display path.
#[must_use]
pub fn page_line(path: &str) -> String {
    format!("Page name: {path}")
}

/// Visual size regime of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SizeMode {
    Dot,
    Expanded,
    MobileExpanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Cursor {
    #[default]
    Pointer,
    Default,
    Crosshair,
    Move,
}

impl Cursor {
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Pointer => "pointer",
            Self::Default => "default",
            Self::Crosshair => "crosshair",
            Self::Move => "move",
        }
    }
}

/// Everything needed to draw the panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub mode: PanelMode,
    pub mobile: bool,
    pub position: Point,
    pub cursor: Cursor,
    pub flashing: bool,
    pub page_line: Option<String>,
    pub spans: Vec<MetadataSpan>,
    /// Bumped whenever `spans` is replaced, so adapters rebuild span nodes
    /// only when needed.
    pub spans_generation: u64,
}

impl PanelView {
    #[must_use]
    pub const fn size_mode(&self) -> SizeMode {
        match (self.mode, self.mobile) {
            (PanelMode::Collapsed, _) => SizeMode::Dot,
            (PanelMode::Expanded, false) => SizeMode::Expanded,
            (PanelMode::Expanded, true) => SizeMode::MobileExpanded,
        }
    }

    #[must_use]
    pub const fn display_for(&self, role: ChildRole) -> Display {
        display_for(role, self.mode, self.mobile)
    }

    #[must_use]
    pub const fn buttons_visible(&self) -> bool {
        self.display_for(ChildRole::Button).is_visible()
    }

    /// Declarations for the panel node itself.
    #[must_use]
    pub fn panel_style(&self) -> Vec<Declaration> {
        let mut style = vec![
            decl("position", "fixed"),
            decl("z-index", Z_INDEX_PANEL.to_string()),
            decl("display", "block"),
            decl("left", format!("{}px", self.position.x)),
            decl("top", format!("{}px", self.position.y)),
            decl("cursor", self.cursor.as_css()),
            decl("box-sizing", "content-box"),
        ];
        let background = match self.size_mode() {
            SizeMode::Dot => {
                style.extend([
                    decl("width", "30px"),
                    decl("height", "30px"),
                    decl("min-width", "initial"),
                    decl("max-width", "none"),
                    decl("min-height", if self.mobile { "" } else { "initial" }),
                    decl("padding", "0"),
                    decl("border", "none"),
                    decl("border-radius", "50%"),
                    decl("color", "#ffffff"),
                    decl("font-size", "18px"),
                    decl("font-weight", "bold"),
                ]);
                ACCENT
            }
            mode => {
                if mode == SizeMode::MobileExpanded {
                    style.extend([
                        decl("width", "calc(100% - 16px)"),
                        decl("max-width", "none"),
                        decl("min-width", "initial"),
                        decl("min-height", "10em"),
                    ]);
                } else {
                    style.extend([
                        decl("width", "fit-content"),
                        decl("max-width", "calc(100vw - 32px)"),
                        decl("min-height", "7.5em"),
                    ]);
                }
                style.extend([
                    decl("height", "auto"),
                    decl("overflow", "visible"),
                    decl("padding", "8px"),
                    decl("border", format!("3px solid {PANEL_BORDER}")),
                    decl("border-radius", "5px"),
                    decl("color", PANEL_TEXT),
                    decl("font-size", "70%"),
                    decl("font-weight", "700"),
                    decl("white-space", "normal"),
                    decl("word-break", "break-word"),
                    decl("overflow-wrap", "break-word"),
                ]);
                PANEL_BACKGROUND
            }
        };
        let background = if self.flashing { COPY_FLASH } else { background };
        style.push(decl("background-color", background));
        style
    }

    /// Declarations for a content child (page line or metadata span).
    #[must_use]
    pub fn content_style(&self) -> Vec<Declaration> {
        let display = self.display_for(ChildRole::Content);
        let mut style = vec![
            decl("display", display.as_css()),
            decl("white-space", "normal"),
            decl("word-break", "break-word"),
            decl("overflow-wrap", "break-word"),
        ];
        if self.mobile {
            style.extend([decl("width", "100%"), decl("margin", "4px 0")]);
        } else {
            style.extend([decl("width", "auto"), decl("margin", "0")]);
        }
        style
    }

    /// Text handed to the clipboard on triple click.
    ///
    /// Page line first, then spans in order; blank entries are dropped and any
    /// run of blank lines collapses to a single newline.
    #[must_use]
    pub fn copy_text(&self) -> String {
        let lines = self
            .page_line
            .iter()
            .cloned()
            .chain(self.spans.iter().map(MetadataSpan::text));
        let joined = lines
            .map(|line| line.trim().to_owned())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        collapse_blank_lines(&joined)
    }
}

fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\n' && out.ends_with('\n') {
            continue;
        }
        out.push(ch);
    }
    out
}

/// Declarations for the collapsed-state glyph.
#[must_use]
pub fn glyph_style(display: Display) -> Vec<Declaration> {
    vec![
        decl("display", display.as_css()),
        decl("justify-content", "center"),
        decl("align-items", "center"),
        decl("padding-top", "1px"),
        decl("font-family", "cursive"),
        decl("font-size", "20px"),
        decl("font-weight", "bold"),
    ]
}

/// The two panel controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelButton {
    Close,
    Collapse,
}

impl PanelButton {
    #[must_use]
    pub const fn dom_id(self) -> &'static str {
        match self {
            Self::Close => crate::ids::CLOSE_BUTTON,
            Self::Collapse => crate::ids::COLLAPSE_BUTTON,
        }
    }

    #[must_use]
    pub const fn caption(self) -> &'static str {
        match self {
            Self::Close => "X",
            Self::Collapse => "<",
        }
    }

    #[must_use]
    pub const fn aria_label(self) -> &'static str {
        match self {
            Self::Close => "Close Mendix Lens",
            Self::Collapse => "Collapse Mendix Lens",
        }
    }

    #[must_use]
    pub fn style(self, display: Display) -> Vec<Declaration> {
        let (edge, background, font_size, weight) = match self {
            Self::Close => ("top", CLOSE_BACKGROUND, "12px", "bold"),
            Self::Collapse => ("bottom", COLLAPSE_BACKGROUND, "14px", "900"),
        };
        vec![
            decl("display", display.as_css()),
            decl("position", "absolute"),
            decl(edge, "-10px"),
            decl("right", "-10px"),
            decl("width", "20px"),
            decl("height", "20px"),
            decl("border-radius", "50%"),
            decl("border", "1px solid black"),
            decl("background-color", background),
            decl("color", "#fff"),
            decl("font-size", font_size),
            decl("font-weight", weight),
            decl("cursor", "pointer"),
            decl("padding", "0"),
            decl("z-index", Z_INDEX_BUTTONS.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn meta() -> WidgetMetadata {
        WidgetMetadata {
            logical_name: "saveButton".to_owned(),
            data_id: Some("12.34".to_owned()),
            element_id: None,
            row_index: Some(2),
            widget_type: Some("Button"),
            custom_classes: vec!["btn-primary".to_owned(), "wide".to_owned()],
            tag: Some("button".to_owned()),
            disabled: true,
        }
    }

    fn expanded_view(spans: Vec<MetadataSpan>) -> PanelView {
        PanelView {
            mode: PanelMode::Expanded,
            mobile: false,
            position: Point::new(8.0, 8.0),
            cursor: Cursor::Default,
            flashing: false,
            page_line: Some(page_line("Main/Home_Web")),
            spans,
            spans_generation: 1,
        }
    }

    #[test]
    fn colorize_cycles_palette_and_wraps() {
        let palette = &["a", "b", "c"];
        let segments = colorize("1.2.3.4", palette, 0);
        let colors: Vec<_> = segments.iter().filter_map(|s| s.color).collect();
        assert_eq!(colors, ["a", "b", "c", "a"]);
        let text: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(text, "1.2.3.4");
    }

    #[test]
    fn undotted_values_are_plain() {
        assert_eq!(colorize("abc", DATA_ID_PALETTE, 0), vec![Segment::plain("abc")]);
    }

    #[test]
    fn spans_follow_fact_order_and_skip_absent() {
        let spans = spans_for(&meta());
        let kinds: Vec<_> = spans.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            [
                FactKind::Name,
                FactKind::DataId,
                FactKind::RowIndex,
                FactKind::WidgetType,
                FactKind::CustomClasses,
                FactKind::Tag,
                FactKind::Disabled,
            ]
        );
        assert_eq!(spans[1].text(), "Data Mendix ID: 12.34");
        assert_eq!(spans[4].text(), "Extra classes: btn-primary wide");
        assert_eq!(spans[6].text(), "Disabled: yes");
    }

    #[test]
    fn copy_text_lists_page_then_spans() {
        let view = expanded_view(spans_for(&meta()));
        let text = view.copy_text();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Page name: Main/Home_Web");
        assert_eq!(lines[1], "Name: saveButton");
        assert_eq!(lines.len(), 8);
        assert!(!text.contains("\n\n"));
    }

    #[test]
    fn copy_text_collapses_blank_runs_inside_values() {
        let span = MetadataSpan {
            kind: FactKind::CustomClasses,
            segments: vec![Segment::plain("a\n\n\nb")],
        };
        let view = expanded_view(vec![span]);
        assert_eq!(
            view.copy_text(),
            "Page name: Main/Home_Web\nExtra classes: a\nb"
        );
    }

    #[test]
    fn flash_overrides_background() {
        let mut view = expanded_view(Vec::new());
        let bg = |v: &PanelView| {
            v.panel_style()
                .into_iter()
                .find(|(name, _)| *name == "background-color")
                .map(|(_, value)| value)
        };
        assert_eq!(bg(&view).as_deref(), Some(PANEL_BACKGROUND));
        view.flashing = true;
        assert_eq!(bg(&view).as_deref(), Some(COPY_FLASH));
    }

    #[test]
    fn size_modes() {
        let mut view = expanded_view(Vec::new());
        assert_eq!(view.size_mode(), SizeMode::Expanded);
        view.mobile = true;
        assert_eq!(view.size_mode(), SizeMode::MobileExpanded);
        view.mode = PanelMode::Collapsed;
        assert_eq!(view.size_mode(), SizeMode::Dot);
        assert!(!view.buttons_visible());
    }
}
