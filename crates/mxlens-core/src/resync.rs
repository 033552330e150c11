//! Visibility re-assertion for the panel's children.
//!
//! The host application re-renders aggressively and may strip, reorder or
//! restyle nodes it does not own. After every mutation batch the adapter
//! classifies each child of the panel and applies [`display_for`], so the
//! panel is never expanded with hidden contents or collapsed with visible ones.

use crate::interaction::PanelMode;

/// How a panel child participates in the visibility invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildRole {
    /// The `i` glyph shown while collapsed.
    Glyph,
    /// Close and collapse controls.
    Button,
    /// Page line, metadata spans, and anything else found under the panel.
    Content,
}

impl ChildRole {
    /// Classify a child by its element id.
    #[must_use]
    pub fn from_id(id: &str) -> Self {
        match id {
            crate::ids::INFO_ICON => Self::Glyph,
            crate::ids::CLOSE_BUTTON | crate::ids::COLLAPSE_BUTTON => Self::Button,
            _ => Self::Content,
        }
    }
}

/// CSS `display` values the panel uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Display {
    None,
    Flex,
    Inline,
    Block,
}

impl Display {
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Flex => "flex",
            Self::Inline => "inline",
            Self::Block => "block",
        }
    }

    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Display a child of the given role must have in `mode`.
#[must_use]
pub const fn display_for(role: ChildRole, mode: PanelMode, mobile: bool) -> Display {
    match (mode, role) {
        (PanelMode::Collapsed, ChildRole::Glyph) => Display::Flex,
        (PanelMode::Collapsed, _) => Display::None,
        (PanelMode::Expanded, ChildRole::Glyph) => Display::None,
        (PanelMode::Expanded, ChildRole::Button) => Display::Block,
        (PanelMode::Expanded, ChildRole::Content) if mobile => Display::Block,
        (PanelMode::Expanded, ChildRole::Content) => Display::Inline,
    }
}
