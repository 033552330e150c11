//! Shift + right-click highlight mode.
//!
//! Each trigger removes the current marker, places a new one when the mode is
//! enabled, and flips the enabled flag. While disabled, hover resolution is
//! paused so the panel keeps describing the highlighted element. Scrolling
//! invalidates the marker because its coordinates are document-absolute.

use serde::Serialize;

use crate::geometry::Rect;

pub const Z_INDEX_HIGHLIGHT: u32 = 2_147_483_644;
pub const PULSE_ANIMATION: &str = "mendix-lens-pulse";

/// Keyframes inserted once into the host document.
pub const PULSE_KEYFRAMES: &str = "@keyframes mendix-lens-pulse {
  0% { border-color: red; box-shadow: 0 0 5px red; }
  50% { border-color: orange; box-shadow: 0 0 15px orange; }
  100% { border-color: red; box-shadow: 0 0 5px red; }
}";

/// The context-menu button that arms highlighting.
pub const SECONDARY_BUTTON: i16 = 2;

/// Element found under the pointer for a highlight trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTarget {
    /// Viewport rectangle of the element.
    pub rect: Rect,
    pub scroll_x: f64,
    pub scroll_y: f64,
    /// The element is the panel or lives inside it.
    pub inside_panel: bool,
}

/// Document-absolute placement of the highlight marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerGeometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl MarkerGeometry {
    /// Marker around `target`, grown by `padding` on each side.
    #[must_use]
    pub fn around(target: &HitTarget, padding: f64) -> Self {
        let rect = target
            .rect
            .offset(target.scroll_x, target.scroll_y)
            .inflate(padding);
        Self {
            left: rect.left,
            top: rect.top,
            width: rect.width,
            height: rect.height,
        }
    }

    #[must_use]
    pub fn style(&self) -> Vec<(&'static str, String)> {
        vec![
            ("position", "absolute".to_owned()),
            ("pointer-events", "none".to_owned()),
            ("border", "4px solid red".to_owned()),
            ("border-radius", "5px".to_owned()),
            ("box-sizing", "border-box".to_owned()),
            ("z-index", Z_INDEX_HIGHLIGHT.to_string()),
            ("animation", format!("{PULSE_ANIMATION} 1s infinite")),
            ("left", format!("{}px", self.left)),
            ("top", format!("{}px", self.top)),
            ("width", format!("{}px", self.width)),
            ("height", format!("{}px", self.height)),
        ]
    }
}

/// What one trigger did to the marker.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriggerOutcome {
    pub removed: bool,
    pub placed: Option<MarkerGeometry>,
}

/// Highlight enable flag plus the live marker, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightMode {
    enabled: bool,
    marker: Option<MarkerGeometry>,
}

impl Default for HighlightMode {
    fn default() -> Self {
        Self {
            enabled: true,
            marker: None,
        }
    }
}

impl HighlightMode {
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub const fn marker(&self) -> Option<MarkerGeometry> {
        self.marker
    }

    /// Handle one armed trigger. `hit_test` is only consulted while enabled.
    pub fn trigger<F>(&mut self, padding: f64, hit_test: F) -> TriggerOutcome
    where
        F: FnOnce() -> Option<HitTarget>,
    {
        let mut outcome = TriggerOutcome {
            removed: self.marker.take().is_some(),
            placed: None,
        };
        if self.enabled {
            if let Some(target) = hit_test().filter(|t| !t.inside_panel) {
                let marker = MarkerGeometry::around(&target, padding);
                self.marker = Some(marker);
                outcome.placed = Some(marker);
            }
        }
        self.enabled = !self.enabled;
        outcome
    }

    /// Drop the marker and re-enable. Returns true if a marker was removed.
    pub fn reset(&mut self) -> bool {
        self.enabled = true;
        self.marker.take().is_some()
    }
}
