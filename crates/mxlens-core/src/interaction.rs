//! Panel interaction state machine.
//!
//! Two states, `Collapsed` and `Expanded`, with an orthogonal dragging flag.
//! Gesture recognition is driven by host-supplied positions and monotonic
//! time, so every transition can be exercised without a browser.

use core::time::Duration;

use serde::Serialize;

use crate::geometry::{Point, Rect};
use crate::render::{Cursor, MOBILE_EXPANDED_POSITION, MetadataSpan, PanelView, page_line};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PanelMode {
    #[default]
    Collapsed,
    Expanded,
}

/// An in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Pointer position relative to the panel's top-left at pointer-down.
    pub offset: Point,
    /// Accumulated absolute travel per axis.
    pub travelled: Point,
    /// Whether the threshold was crossed and the position committed.
    pub committed: bool,
}

/// Multi-click recognizer with a reset window opened by the first click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickCounter {
    count: u8,
    window_end: Option<Duration>,
}

impl ClickCounter {
    /// Register a click at `now`. Returns true on the third click inside the
    /// window, after which the counter starts over.
    pub fn register(&mut self, now: Duration, window: Duration) -> bool {
        let expired = self.window_end.is_none_or(|end| now >= end);
        if self.count == 0 || expired {
            self.count = 1;
            self.window_end = Some(now.saturating_add(window));
            return false;
        }
        self.count += 1;
        if self.count >= 3 {
            self.reset();
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.window_end = None;
    }

    #[must_use]
    pub const fn count(&self) -> u8 {
        self.count
    }
}

/// What a click on the panel body did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickOutcome {
    pub expanded: bool,
    /// Third click of a triple click; the caller copies the panel text.
    pub copy: bool,
    /// The click only released a drag and was swallowed.
    pub consumed: bool,
}

/// The singleton panel and its gesture state.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    mode: PanelMode,
    mobile: bool,
    position: Point,
    drag: Option<DragSession>,
    /// Set when a drag moved the collapsed dot; the release click is eaten.
    moved_while_collapsed: bool,
    clicks: ClickCounter,
    hover_cursor: Cursor,
    page_path: Option<String>,
    spans: Vec<MetadataSpan>,
    spans_generation: u64,
    flash_until: Option<Duration>,
}

impl PanelState {
    #[must_use]
    pub fn new(position: Point, mobile: bool) -> Self {
        Self {
            mode: PanelMode::Collapsed,
            mobile,
            position,
            drag: None,
            moved_while_collapsed: false,
            clicks: ClickCounter::default(),
            hover_cursor: Cursor::Pointer,
            page_path: None,
            spans: Vec::new(),
            spans_generation: 0,
            flash_until: None,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> PanelMode {
        self.mode
    }

    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        matches!(self.mode, PanelMode::Expanded)
    }

    #[must_use]
    pub const fn is_mobile(&self) -> bool {
        self.mobile
    }

    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    #[must_use]
    pub const fn drag(&self) -> Option<DragSession> {
        self.drag
    }

    #[must_use]
    pub fn page_path(&self) -> Option<&str> {
        self.page_path.as_deref()
    }

    #[must_use]
    pub fn spans(&self) -> &[MetadataSpan] {
        &self.spans
    }

    #[must_use]
    pub const fn click_count(&self) -> u8 {
        self.clicks.count()
    }

    pub fn expand(&mut self) {
        self.mode = PanelMode::Expanded;
        self.clicks.reset();
        if self.mobile {
            self.position = MOBILE_EXPANDED_POSITION;
        }
    }

    pub fn collapse(&mut self) {
        self.mode = PanelMode::Collapsed;
        self.clicks.reset();
        self.hover_cursor = Cursor::Pointer;
    }

    /// Pointer pressed on the panel. Arms a drag when the press lands on the
    /// border or the panel is collapsed; returns whether it did.
    pub fn pointer_down(&mut self, pointer: Point, rect: Rect, border_margin: f64) -> bool {
        let on_border = rect.near_border(pointer, border_margin);
        if !(on_border || !self.is_expanded()) {
            return false;
        }
        self.drag = Some(DragSession {
            offset: Point::new(pointer.x - rect.left, pointer.y - rect.top),
            travelled: Point::default(),
            committed: false,
        });
        true
    }

    /// Pointer moved anywhere in the document. Returns true when the panel
    /// position changed.
    ///
    /// Travel accumulates against the committed position, so jitter below the
    /// threshold never moves the panel and a release after such jitter still
    /// reads as a click.
    pub fn pointer_move(&mut self, pointer: Point, threshold: f64) -> bool {
        let Some(mut drag) = self.drag else {
            return false;
        };
        let candidate = Point::new(pointer.x - drag.offset.x, pointer.y - drag.offset.y);
        drag.travelled.x += (candidate.x - self.position.x).abs();
        drag.travelled.y += (candidate.y - self.position.y).abs();
        let crossed = drag.travelled.x >= threshold || drag.travelled.y >= threshold;
        let moved = crossed && candidate != self.position;
        if crossed {
            drag.committed = true;
            self.position = candidate;
            if !self.is_expanded() {
                self.moved_while_collapsed = true;
            }
        }
        self.drag = Some(drag);
        moved
    }

    /// Pointer released anywhere. Returns true if a drag ended.
    pub fn pointer_up(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Cursor feedback while the pointer is over the panel.
    pub fn hover(&mut self, pointer: Point, rect: Rect, border_margin: f64) -> bool {
        let cursor = if !self.is_expanded() {
            Cursor::Pointer
        } else if rect.near_border(pointer, border_margin) {
            Cursor::Crosshair
        } else {
            Cursor::Default
        };
        let changed = cursor != self.hover_cursor;
        self.hover_cursor = cursor;
        changed
    }

    /// Click on the panel body.
    ///
    /// While collapsed the click expands, unless it is the release of a drag
    /// that moved the dot. The expanding click is the first click of a
    /// triple-click count.
    pub fn click(&mut self, now: Duration, window: Duration) -> ClickOutcome {
        let mut outcome = ClickOutcome::default();
        if !self.is_expanded() {
            if self.moved_while_collapsed {
                outcome.consumed = true;
            } else if !self.is_dragging() {
                self.expand();
                outcome.expanded = true;
                outcome.copy = self.clicks.register(now, window);
            }
            self.moved_while_collapsed = false;
            return outcome;
        }
        outcome.copy = self.clicks.register(now, window);
        outcome
    }

    /// Update the displayed page path. Returns true if it changed.
    pub fn set_page_path(&mut self, path: &str) -> bool {
        if self.page_path.as_deref() == Some(path) {
            return false;
        }
        self.page_path = Some(path.to_owned());
        true
    }

    /// Replace all metadata spans. Returns true if the content changed.
    pub fn replace_spans(&mut self, spans: Vec<MetadataSpan>) -> bool {
        if self.spans == spans {
            return false;
        }
        self.spans = spans;
        self.spans_generation = self.spans_generation.wrapping_add(1);
        true
    }

    pub fn start_flash(&mut self, now: Duration, duration: Duration) {
        self.flash_until = Some(now.saturating_add(duration));
    }

    #[must_use]
    pub const fn is_flashing(&self) -> bool {
        self.flash_until.is_some()
    }

    /// Expire the copy flash. Returns true if it ended.
    pub fn expire_flash(&mut self, now: Duration) -> bool {
        match self.flash_until {
            Some(until) if now >= until => {
                self.flash_until = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn view(&self) -> PanelView {
        let cursor = if self.is_dragging() {
            Cursor::Move
        } else {
            self.hover_cursor
        };
        PanelView {
            mode: self.mode,
            mobile: self.mobile,
            position: self.position,
            cursor,
            flashing: self.is_flashing(),
            page_line: self.page_path.as_deref().map(page_line),
            spans: self.spans.clone(),
            spans_generation: self.spans_generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClickCounter, PanelMode, PanelState};
    use crate::geometry::{Point, Rect};
    use core::time::Duration;

    const WINDOW: Duration = Duration::from_millis(1000);
    const THRESHOLD: f64 = 15.0;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn dot() -> (PanelState, Rect) {
        (
            PanelState::new(Point::new(8.0, 8.0), false),
            Rect::new(8.0, 8.0, 30.0, 30.0),
        )
    }

    #[test]
    fn triple_click_inside_window_fires_once() {
        let mut clicks = ClickCounter::default();
        let fired: Vec<_> = [0, 300, 900]
            .into_iter()
            .map(|t| clicks.register(ms(t), WINDOW))
            .collect();
        assert_eq!(fired, [false, false, true]);
        assert_eq!(clicks.count(), 0);
    }

    #[test]
    fn triple_click_spanning_window_never_fires() {
        let mut clicks = ClickCounter::default();
        let fired = [0, 1100, 1200]
            .into_iter()
            .filter(|&t| clicks.register(ms(t), WINDOW))
            .count();
        assert_eq!(fired, 0);
        assert_eq!(clicks.count(), 2);
    }

    #[test]
    fn sub_threshold_drag_does_not_move() {
        let (mut panel, rect) = dot();
        assert!(panel.pointer_down(Point::new(20.0, 20.0), rect, 5.0));
        assert!(!panel.pointer_move(Point::new(30.0, 30.0), THRESHOLD));
        assert_eq!(panel.position(), Point::new(8.0, 8.0));
        assert!(panel.pointer_up());
        let outcome = panel.click(ms(0), WINDOW);
        assert!(outcome.expanded);
    }

    #[test]
    fn threshold_drag_commits_and_eats_release_click() {
        let (mut panel, rect) = dot();
        panel.pointer_down(Point::new(20.0, 20.0), rect, 5.0);
        assert!(panel.pointer_move(Point::new(35.0, 20.0), THRESHOLD));
        assert_eq!(panel.position(), Point::new(23.0, 8.0));
        panel.pointer_up();

        let release = panel.click(ms(10), WINDOW);
        assert!(release.consumed);
        assert_eq!(panel.mode(), PanelMode::Collapsed);

        let next = panel.click(ms(20), WINDOW);
        assert!(next.expanded);
    }

    #[test]
    fn expanded_interior_press_does_not_drag() {
        let (mut panel, _) = dot();
        panel.expand();
        let rect = Rect::new(8.0, 8.0, 200.0, 100.0);
        assert!(!panel.pointer_down(Point::new(100.0, 50.0), rect, 5.0));
        assert!(panel.pointer_down(Point::new(100.0, 10.0), rect, 5.0));
        assert!(panel.is_dragging());
    }

    #[test]
    fn expanding_click_counts_toward_triple_click() {
        let (mut panel, _) = dot();
        let first = panel.click(ms(0), WINDOW);
        assert!(first.expanded);
        assert!(!first.copy);
        assert!(!panel.click(ms(100), WINDOW).copy);
        assert!(panel.click(ms(200), WINDOW).copy);
        assert!(!panel.click(ms(300), WINDOW).copy);
    }

    #[test]
    fn swallowed_drag_release_does_not_count_toward_triple_click() {
        let (mut panel, _) = dot();
        let rect = Rect::new(8.0, 8.0, 30.0, 30.0);
        assert!(panel.pointer_down(Point::new(20.0, 20.0), rect, 5.0));
        assert!(panel.pointer_move(Point::new(60.0, 20.0), 15.0));
        assert!(panel.pointer_up());
        assert!(panel.click(ms(0), WINDOW).consumed);
        assert!(panel.click(ms(100), WINDOW).expanded);
        assert!(!panel.click(ms(200), WINDOW).copy);
        assert!(panel.click(ms(300), WINDOW).copy);
    }

    #[test]
    fn mobile_expand_pins_to_frame_edge() {
        let mut panel = PanelState::new(Point::new(100.0, 100.0), true);
        panel.expand();
        assert_eq!(panel.position(), Point::new(6.0, 24.0));
    }

    #[test]
    fn flash_expires_at_deadline() {
        let (mut panel, _) = dot();
        panel.start_flash(ms(100), ms(200));
        assert!(!panel.expire_flash(ms(250)));
        assert!(panel.view().flashing);
        assert!(panel.expire_flash(ms(300)));
        assert!(!panel.view().flashing);
    }
}
