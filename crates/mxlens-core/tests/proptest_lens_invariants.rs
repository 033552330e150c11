//! Property-based invariants for the overlay controller.
//!
//! 1. **Nearest root**: the widget-root walk terminates on any ancestor
//!    chain and returns the deepest node carrying a name marker.
//!
//! 2. **Palette order**: coloured segments follow the palette from offset 0,
//!    wrap modulo its length, reproduce the value and are stable across calls.
//!
//! 3. **Drag threshold**: a move shorter than the threshold on both axes
//!    never moves the panel; reaching it on either axis always commits.
//!
//! 4. **Triple click**: three clicks inside the window copy exactly once.
//!
//! 5. **Resource ownership**: for any event sequence the panel exists
//!    exactly when its resources are live, and teardown (twice) leaves
//!    nothing behind.

use core::time::Duration;

use mxlens_core::memory_dom::{MemoryDocument, MemoryNode};
use mxlens_core::render::{DATA_ID_PALETTE, colorize};
use mxlens_core::resolver::widget_root;
use mxlens_core::{
    DispatchOutcome, IgnoredReason, LensConfig, LensSession, LiveResources, PanelMode,
    PanelState, Point, Rect,
};
use proptest::prelude::*;

const THRESHOLD: f64 = 15.0;
const WINDOW: Duration = Duration::from_millis(1000);

// ── Strategies ──────────────────────────────────────────────────────────

fn chain_markers() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 1..24)
}

fn dotted_value() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z0-9]{1,6}", 2..12).prop_map(|parts| parts.join("."))
}

#[derive(Debug, Clone)]
enum Event {
    Tick,
    Click,
    Escape,
    Scroll,
    Highlight,
    Collapse,
    Drag(f64, f64),
    CopyOk,
    FlashElapsed,
    Wait(u64),
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        3 => Just(Event::Tick),
        3 => Just(Event::Click),
        1 => Just(Event::Escape),
        1 => Just(Event::Scroll),
        2 => Just(Event::Highlight),
        1 => Just(Event::Collapse),
        2 => (-40.0f64..40.0, -40.0f64..40.0).prop_map(|(dx, dy)| Event::Drag(dx, dy)),
        1 => Just(Event::CopyOk),
        1 => Just(Event::FlashElapsed),
        2 => (0u64..1500).prop_map(Event::Wait),
    ]
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn build_chain(markers: &[bool]) -> (Vec<MemoryNode>, MemoryNode) {
    let doc = MemoryDocument::new();
    let mut nodes: Vec<MemoryNode> = Vec::with_capacity(markers.len());
    for (depth, marked) in markers.iter().enumerate() {
        let node = match nodes.last() {
            Some(parent) => doc.child(parent, "div"),
            None => doc.element("div"),
        };
        if *marked {
            let class = format!("mx-name-w{depth}");
            node.with_classes(&["row", class.as_str()]);
        } else {
            node.with_classes(&["row", "mx-name-index-7"]);
        }
        nodes.push(node);
    }
    let leaf = doc.text(nodes.last().expect("non-empty chain"));
    (nodes, leaf)
}

fn apply(session: &mut LensSession, now: &mut Duration, event: &Event) {
    let rect = |s: &LensSession| {
        let p = s.panel().map_or(Point::default(), PanelState::position);
        Rect::new(p.x, p.y, 30.0, 30.0)
    };
    match event {
        Event::Tick => {
            session.tick(*now, || Ok("Main/Home.page.xml".to_owned()), || false);
        }
        Event::Click => {
            session.panel_click(*now);
        }
        Event::Escape => {
            session.key_down("Escape");
        }
        Event::Scroll => {
            session.scrolled();
        }
        Event::Highlight => {
            session.context_menu(true, 2, || None);
        }
        Event::Collapse => {
            session.collapse_clicked();
        }
        Event::Drag(dx, dy) => {
            let r = rect(session);
            let start = Point::new(r.left + 1.0, r.top + 1.0);
            session.pointer_down(start, r);
            session.pointer_move(Point::new(start.x + dx, start.y + dy));
            session.pointer_up();
        }
        Event::CopyOk => {
            session.copy_finished(*now, Ok(()));
        }
        Event::FlashElapsed => {
            session.flash_elapsed(*now);
        }
        Event::Wait(ms) => {
            *now += Duration::from_millis(*ms);
        }
    }
}

proptest! {
    #[test]
    fn widget_root_is_the_deepest_marked_ancestor(markers in chain_markers()) {
        let (nodes, leaf) = build_chain(&markers);
        let expected = markers
            .iter()
            .rposition(|marked| *marked)
            .map(|i| nodes[i].clone());
        prop_assert_eq!(widget_root(&leaf), expected);
    }

    #[test]
    fn segment_colours_follow_palette(value in dotted_value()) {
        let segments = colorize(&value, DATA_ID_PALETTE, 0);
        let colours: Vec<_> = segments.iter().filter_map(|s| s.color).collect();
        for (i, colour) in colours.iter().enumerate() {
            prop_assert_eq!(*colour, DATA_ID_PALETTE[i % DATA_ID_PALETTE.len()]);
        }
        prop_assert_eq!(colours.len(), value.split('.').count());
        let text: String = segments.iter().map(|s| s.text.as_str()).collect();
        prop_assert_eq!(&text, &value);
        prop_assert_eq!(colorize(&value, DATA_ID_PALETTE, 0), segments);
    }

    #[test]
    fn short_moves_never_move_the_panel(dx in -14.9f64..14.9, dy in -14.9f64..14.9) {
        let origin = Point::new(100.0, 100.0);
        let mut panel = PanelState::new(origin, false);
        let rect = Rect::new(origin.x, origin.y, 30.0, 30.0);
        let press = Point::new(110.0, 110.0);
        prop_assert!(panel.pointer_down(press, rect, 5.0));
        prop_assert!(!panel.pointer_move(Point::new(press.x + dx, press.y + dy), THRESHOLD));
        prop_assert_eq!(panel.position(), origin);
        panel.pointer_up();
        prop_assert!(panel.click(Duration::ZERO, WINDOW).expanded);
    }

    #[test]
    fn threshold_moves_always_commit(dx in 15.0f64..200.0, dy in -14.9f64..14.9, flip in any::<bool>()) {
        let origin = Point::new(300.0, 300.0);
        let mut panel = PanelState::new(origin, false);
        let rect = Rect::new(origin.x, origin.y, 30.0, 30.0);
        let press = Point::new(310.0, 310.0);
        let dx = if flip { -dx } else { dx };
        panel.pointer_down(press, rect, 5.0);
        prop_assert!(panel.pointer_move(Point::new(press.x + dx, press.y + dy), THRESHOLD));
        let moved = panel.position();
        prop_assert!((moved.x - (origin.x + dx)).abs() < 1e-9);
        prop_assert!((moved.y - (origin.y + dy)).abs() < 1e-9);
    }

    #[test]
    fn three_clicks_inside_window_copy_once(second in 0u64..998, extra in 0u64..1000) {
        let third = second + extra % (999 - second);
        let mut panel = PanelState::new(Point::new(8.0, 8.0), false);
        panel.expand();
        let copies = [0, second, third]
            .into_iter()
            .filter(|t| panel.click(Duration::from_millis(*t), WINDOW).copy)
            .count();
        prop_assert_eq!(copies, 1);
        prop_assert_eq!(panel.click_count(), 0);
    }

    #[test]
    fn resources_track_panel_and_teardown_releases_all(
        events in prop::collection::vec(event(), 0..60)
    ) {
        let mut session = LensSession::new(LensConfig::default());
        session.start();
        let mut now = Duration::ZERO;
        for event in &events {
            apply(&mut session, &mut now, event);
            prop_assert_eq!(
                session.panel().is_some(),
                session.live().contains(LiveResources::PANEL)
            );
            if let Some(view) = session.view() {
                prop_assert_eq!(view.buttons_visible(), view.mode == PanelMode::Expanded);
            }
        }

        session.teardown();
        prop_assert!(session.live().is_empty());
        prop_assert!(session.panel().is_none());
        prop_assert!(session.highlight().marker().is_none());
        prop_assert_eq!(
            session.teardown().outcome,
            DispatchOutcome::Ignored(IgnoredReason::TornDown)
        );
        prop_assert!(session.live().is_empty());
    }
}
