//! Viewport geometry in CSS pixels.

use serde::{Deserialize, Serialize};

/// A point in viewport coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle as reported by `getBoundingClientRect()`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// True when `p` lies within `margin` pixels of any of the four edges.
    ///
    /// Each edge is treated as an infinite line: a pointer level with the top
    /// edge but far to the side still counts, matching how the panel border is
    /// hit-tested while the pointer is already over the panel.
    #[must_use]
    pub fn near_border(&self, p: Point, margin: f64) -> bool {
        let near = |value: f64, edge: f64| value >= edge - margin && value <= edge + margin;
        near(p.x, self.left)
            || near(p.x, self.right())
            || near(p.y, self.top)
            || near(p.y, self.bottom())
    }

    /// Grow the rectangle by `pad` on every side.
    #[must_use]
    pub fn inflate(&self, pad: f64) -> Self {
        Self {
            left: self.left - pad,
            top: self.top - pad,
            width: self.width + pad * 2.0,
            height: self.height + pad * 2.0,
        }
    }

    /// Shift the rectangle by a scroll offset (viewport → document space).
    #[must_use]
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            ..*self
        }
    }
}
