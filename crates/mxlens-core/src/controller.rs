//! Overlay session: the single owner of panel, highlight and resource state.
//!
//! Every host event maps to one method returning a [`LensDispatch`]: the
//! commands the adapter must carry out, whether the DOM event's default action
//! and propagation must be suppressed, and a structured outcome for logs.
//! Listener, timer and observer lifetimes are tracked in [`LiveResources`] so
//! teardown can release each of them exactly once.

use core::time::Duration;

use bitflags::bitflags;

use crate::config::LensConfig;
use crate::dom::DomNode;
use crate::error::LensError;
use crate::geometry::{Point, Rect};
use crate::highlight::{HighlightMode, HitTarget, MarkerGeometry, SECONDARY_BUTTON};
use crate::interaction::{PanelMode, PanelState};
use crate::render::{PanelView, spans_for};
use crate::resolver;
use crate::resync::{ChildRole, Display};

bitflags! {
    /// Long-lived host resources owned by the session.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LiveResources: u16 {
        const PATH_TIMER      = 1 << 0;
        const SCROLL          = 1 << 1;
        const WHEEL           = 1 << 2;
        const CONTEXT_MENU    = 1 << 3;
        const POINTER_OVER    = 1 << 4;
        const KEY_DOWN        = 1 << 5;
        const POINTER_MOVE    = 1 << 6;
        const POINTER_UP      = 1 << 7;
        const RESYNC_OBSERVER = 1 << 8;
        const FLASH_TIMER     = 1 << 9;

        /// Document listeners attached at start.
        const DOCUMENT = Self::SCROLL.bits()
            | Self::WHEEL.bits()
            | Self::CONTEXT_MENU.bits()
            | Self::POINTER_OVER.bits()
            | Self::KEY_DOWN.bits();
        /// Resources attached together with the panel.
        const PANEL = Self::POINTER_MOVE.bits()
            | Self::POINTER_UP.bits()
            | Self::RESYNC_OBSERVER.bits();
    }
}

/// Work the adapter performs on behalf of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    /// Attach listeners, start timers or connect the observer for each flag.
    Install(LiveResources),
    /// Detach, cancel or disconnect each flag. Never issued for a flag that is
    /// not live.
    Release(LiveResources),
    /// Build the panel node with its glyph and buttons.
    CreatePanel,
    /// Apply [`LensSession::view`] to the panel node.
    RenderPanel,
    RemovePanel,
    /// Re-assert every panel child's `display` from
    /// [`LensSession::resync_display`].
    ResyncChildren,
    PlaceMarker(MarkerGeometry),
    RemoveMarker,
    ClearSelection,
    CopyToClipboard(String),
}

/// Why an event produced no work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    NotStarted,
    AlreadyStarted,
    TornDown,
    NoPanel,
    NotExpanded,
    NotDragging,
    /// Highlight pinned the current metadata.
    HoverSuspended,
    InsidePanel,
    WrongGesture,
    HostNotReady,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled,
    Ignored(IgnoredReason),
}

/// Result of one session transition.
#[derive(Debug, Clone, PartialEq)]
pub struct LensDispatch {
    pub commands: Vec<HostCommand>,
    pub prevent_default: bool,
    pub stop_propagation: bool,
    pub outcome: DispatchOutcome,
}

impl LensDispatch {
    fn handled(commands: Vec<HostCommand>) -> Self {
        Self {
            commands,
            prevent_default: false,
            stop_propagation: false,
            outcome: DispatchOutcome::Handled,
        }
    }

    fn ignored(reason: IgnoredReason) -> Self {
        Self {
            commands: Vec::new(),
            prevent_default: false,
            stop_propagation: false,
            outcome: DispatchOutcome::Ignored(reason),
        }
    }

    fn prevent_default(mut self) -> Self {
        self.prevent_default = true;
        self
    }

    fn stop_propagation(mut self) -> Self {
        self.stop_propagation = true;
        self
    }

    #[must_use]
    pub const fn is_handled(&self) -> bool {
        matches!(self.outcome, DispatchOutcome::Handled)
    }
}

/// One overlay session, from start to teardown.
#[derive(Debug, Clone)]
pub struct LensSession {
    config: LensConfig,
    panel: Option<PanelState>,
    highlight: HighlightMode,
    live: LiveResources,
    host_path: Option<String>,
    started: bool,
    torn_down: bool,
}

impl LensSession {
    #[must_use]
    pub fn new(config: LensConfig) -> Self {
        Self {
            config,
            panel: None,
            highlight: HighlightMode::default(),
            live: LiveResources::empty(),
            host_path: None,
            started: false,
            torn_down: false,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &LensConfig {
        &self.config
    }

    #[must_use]
    pub const fn live(&self) -> LiveResources {
        self.live
    }

    #[must_use]
    pub const fn panel(&self) -> Option<&PanelState> {
        self.panel.as_ref()
    }

    #[must_use]
    pub const fn highlight(&self) -> &HighlightMode {
        &self.highlight
    }

    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    #[must_use]
    pub fn mode(&self) -> Option<PanelMode> {
        self.panel.as_ref().map(PanelState::mode)
    }

    #[must_use]
    pub fn view(&self) -> Option<PanelView> {
        self.panel.as_ref().map(PanelState::view)
    }

    /// Display a panel child of `role` must have right now.
    #[must_use]
    pub fn resync_display(&self, role: ChildRole) -> Option<Display> {
        self.view().map(|view| view.display_for(role))
    }

    fn install(&mut self, resources: LiveResources) -> HostCommand {
        self.live |= resources;
        HostCommand::Install(resources)
    }

    fn release(&mut self, resources: LiveResources) -> Option<HostCommand> {
        let live = self.live & resources;
        if live.is_empty() {
            return None;
        }
        self.live -= live;
        Some(HostCommand::Release(live))
    }

    fn guard(&self) -> Result<(), IgnoredReason> {
        if self.torn_down {
            return Err(IgnoredReason::TornDown);
        }
        if !self.started {
            return Err(IgnoredReason::NotStarted);
        }
        Ok(())
    }

    /// Attach document listeners and start the path-refresh timer.
    pub fn start(&mut self) -> LensDispatch {
        if self.torn_down {
            return LensDispatch::ignored(IgnoredReason::TornDown);
        }
        if self.started {
            return LensDispatch::ignored(IgnoredReason::AlreadyStarted);
        }
        self.started = true;
        let install = self.install(LiveResources::DOCUMENT | LiveResources::PATH_TIMER);
        LensDispatch::handled(vec![install])
    }

    /// Path-refresh tick.
    ///
    /// The host path is re-read while expanded or until a first value is known.
    /// A failing accessor means the host navigated away: the timer is stopped
    /// and nothing else happens. The panel is created on the first successful
    /// tick; `detect_mobile` runs exactly once, at creation.
    pub fn tick<P, M>(&mut self, now: Duration, fetch_path: P, detect_mobile: M) -> LensDispatch
    where
        P: FnOnce() -> Result<String, LensError>,
        M: FnOnce() -> bool,
    {
        if let Err(reason) = self.guard() {
            return LensDispatch::ignored(reason);
        }
        let expanded = self.panel.as_ref().is_some_and(PanelState::is_expanded);
        if self.host_path.is_none() || expanded {
            match fetch_path() {
                Ok(path) => self.host_path = Some(path),
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(error = %err, "host path unavailable; stopping refresh");
                    let _ = err;
                    let mut dispatch = LensDispatch::ignored(IgnoredReason::HostNotReady);
                    dispatch
                        .commands
                        .extend(self.release(LiveResources::PATH_TIMER));
                    return dispatch;
                }
            }
        }

        let mut commands = Vec::new();
        if self.panel.is_none() {
            let mobile = detect_mobile();
            #[cfg(feature = "tracing")]
            tracing::debug!(mobile, "creating panel");
            self.panel = Some(PanelState::new(self.config.initial_position, mobile));
            commands.push(HostCommand::CreatePanel);
            commands.push(self.install(LiveResources::PANEL));
        }

        let display = self
            .host_path
            .as_deref()
            .map(|path| self.config.display_path(path).to_owned());
        let mut dirty = commands.contains(&HostCommand::CreatePanel);
        if let (Some(panel), Some(display)) = (self.panel.as_mut(), display) {
            dirty |= panel.set_page_path(&display);
            dirty |= panel.expire_flash(now);
        }
        if dirty {
            commands.push(HostCommand::RenderPanel);
        }
        if commands.is_empty() {
            return LensDispatch::ignored(IgnoredReason::Unchanged);
        }
        LensDispatch::handled(commands)
    }

    /// Pointer entered `target`. Re-resolves all metadata lines.
    pub fn pointer_over<N: DomNode>(&mut self, target: &N, inside_panel: bool) -> LensDispatch {
        if let Err(reason) = self.guard() {
            return LensDispatch::ignored(reason);
        }
        if !self.highlight.is_enabled() {
            return LensDispatch::ignored(IgnoredReason::HoverSuspended);
        }
        if inside_panel {
            return LensDispatch::ignored(IgnoredReason::InsidePanel);
        }
        let Some(panel) = self.panel.as_mut() else {
            return LensDispatch::ignored(IgnoredReason::NoPanel);
        };
        let spans = resolver::resolve(target)
            .map(|meta| spans_for(&meta))
            .unwrap_or_default();
        if panel.replace_spans(spans) {
            LensDispatch::handled(vec![HostCommand::RenderPanel])
        } else {
            LensDispatch::ignored(IgnoredReason::Unchanged)
        }
    }

    /// Pointer pressed on the panel; `rect` is its current bounding box.
    pub fn pointer_down(&mut self, pointer: Point, rect: Rect) -> LensDispatch {
        if let Err(reason) = self.guard() {
            return LensDispatch::ignored(reason);
        }
        let margin = self.config.border_margin_px;
        let Some(panel) = self.panel.as_mut() else {
            return LensDispatch::ignored(IgnoredReason::NoPanel);
        };
        if panel.pointer_down(pointer, rect, margin) {
            LensDispatch::handled(vec![HostCommand::RenderPanel]).prevent_default()
        } else {
            LensDispatch::ignored(IgnoredReason::WrongGesture)
        }
    }

    /// Pointer moved anywhere in the document.
    pub fn pointer_move(&mut self, pointer: Point) -> LensDispatch {
        if let Err(reason) = self.guard() {
            return LensDispatch::ignored(reason);
        }
        let threshold = self.config.drag_threshold_px;
        let Some(panel) = self.panel.as_mut() else {
            return LensDispatch::ignored(IgnoredReason::NoPanel);
        };
        if !panel.is_dragging() {
            return LensDispatch::ignored(IgnoredReason::NotDragging);
        }
        if panel.pointer_move(pointer, threshold) {
            LensDispatch::handled(vec![HostCommand::RenderPanel])
        } else {
            LensDispatch::ignored(IgnoredReason::Unchanged)
        }
    }

    /// Pointer released anywhere in the document.
    pub fn pointer_up(&mut self) -> LensDispatch {
        if let Err(reason) = self.guard() {
            return LensDispatch::ignored(reason);
        }
        match self.panel.as_mut().map(PanelState::pointer_up) {
            Some(true) => LensDispatch::handled(vec![HostCommand::RenderPanel]),
            Some(false) => LensDispatch::ignored(IgnoredReason::NotDragging),
            None => LensDispatch::ignored(IgnoredReason::NoPanel),
        }
    }

    /// Pointer moving over the panel itself (cursor feedback only).
    pub fn panel_hover(&mut self, pointer: Point, rect: Rect) -> LensDispatch {
        if let Err(reason) = self.guard() {
            return LensDispatch::ignored(reason);
        }
        let margin = self.config.border_margin_px;
        match self
            .panel
            .as_mut()
            .map(|panel| panel.hover(pointer, rect, margin))
        {
            Some(true) => LensDispatch::handled(vec![HostCommand::RenderPanel]),
            Some(false) => LensDispatch::ignored(IgnoredReason::Unchanged),
            None => LensDispatch::ignored(IgnoredReason::NoPanel),
        }
    }

    /// Click on the panel body: expand, swallow a drag release, or count
    /// towards a triple-click copy.
    pub fn panel_click(&mut self, now: Duration) -> LensDispatch {
        if let Err(reason) = self.guard() {
            return LensDispatch::ignored(reason);
        }
        let window = self.config.triple_click_window();
        let Some(panel) = self.panel.as_mut() else {
            return LensDispatch::ignored(IgnoredReason::NoPanel);
        };
        let outcome = panel.click(now, window);
        if outcome.copy {
            let text = panel.view().copy_text();
            #[cfg(feature = "tracing")]
            tracing::debug!(bytes = text.len(), "triple click; copying panel text");
            return LensDispatch::handled(vec![HostCommand::CopyToClipboard(text)])
                .prevent_default()
                .stop_propagation();
        }
        if outcome.expanded {
            return LensDispatch::handled(vec![HostCommand::RenderPanel]);
        }
        if outcome.consumed {
            return LensDispatch::handled(Vec::new());
        }
        LensDispatch::ignored(IgnoredReason::Unchanged)
    }

    fn collapse(&mut self) -> Vec<HostCommand> {
        let mut commands = Vec::new();
        if let Some(panel) = self.panel.as_mut() {
            panel.collapse();
            commands.push(HostCommand::RenderPanel);
        }
        if self.highlight.reset() {
            commands.push(HostCommand::RemoveMarker);
        }
        commands
    }

    /// Collapse control clicked.
    pub fn collapse_clicked(&mut self) -> LensDispatch {
        if let Err(reason) = self.guard() {
            return LensDispatch::ignored(reason);
        }
        if self.panel.is_none() {
            return LensDispatch::ignored(IgnoredReason::NoPanel);
        }
        LensDispatch::handled(self.collapse()).stop_propagation()
    }

    /// Close control clicked.
    pub fn close_clicked(&mut self) -> LensDispatch {
        self.teardown().stop_propagation()
    }

    /// Key pressed anywhere. Escape steps back once, then closes.
    pub fn key_down(&mut self, key: &str) -> LensDispatch {
        if let Err(reason) = self.guard() {
            return LensDispatch::ignored(reason);
        }
        if key != "Escape" {
            return LensDispatch::ignored(IgnoredReason::WrongGesture);
        }
        match self.mode() {
            None => LensDispatch::ignored(IgnoredReason::NoPanel),
            Some(PanelMode::Expanded) => LensDispatch::handled(self.collapse()),
            Some(PanelMode::Collapsed) => self.teardown(),
        }
    }

    /// Context menu requested. Only shift + secondary button while expanded
    /// is a highlight trigger; `hit_test` finds the element under the pointer.
    pub fn context_menu<F>(&mut self, shift: bool, button: i16, hit_test: F) -> LensDispatch
    where
        F: FnOnce() -> Option<HitTarget>,
    {
        if let Err(reason) = self.guard() {
            return LensDispatch::ignored(reason);
        }
        if !(shift && button == SECONDARY_BUTTON) {
            return LensDispatch::ignored(IgnoredReason::WrongGesture);
        }
        match self.mode() {
            None => return LensDispatch::ignored(IgnoredReason::NoPanel),
            Some(PanelMode::Collapsed) => {
                return LensDispatch::ignored(IgnoredReason::NotExpanded);
            }
            Some(PanelMode::Expanded) => {}
        }
        let mut commands = vec![HostCommand::ClearSelection];
        let outcome = self
            .highlight
            .trigger(self.config.highlight_padding_px, hit_test);
        if outcome.removed {
            commands.push(HostCommand::RemoveMarker);
        }
        if let Some(marker) = outcome.placed {
            commands.push(HostCommand::PlaceMarker(marker));
        }
        LensDispatch::handled(commands).prevent_default()
    }

    /// Scroll or wheel anywhere: the marker no longer lines up.
    pub fn scrolled(&mut self) -> LensDispatch {
        if let Err(reason) = self.guard() {
            return LensDispatch::ignored(reason);
        }
        let was_enabled = self.highlight.is_enabled();
        if self.highlight.reset() {
            LensDispatch::handled(vec![HostCommand::RemoveMarker])
        } else if !was_enabled {
            LensDispatch::handled(Vec::new())
        } else {
            LensDispatch::ignored(IgnoredReason::Unchanged)
        }
    }

    /// The observer saw a structural change under the panel.
    pub fn mutation_observed(&mut self) -> LensDispatch {
        if let Err(reason) = self.guard() {
            return LensDispatch::ignored(reason);
        }
        if self.panel.is_none() {
            return LensDispatch::ignored(IgnoredReason::NoPanel);
        }
        LensDispatch::handled(vec![HostCommand::ResyncChildren])
    }

    /// A clipboard copy finished. Success flashes the panel background.
    pub fn copy_finished(&mut self, now: Duration, result: Result<(), LensError>) -> LensDispatch {
        if let Err(reason) = self.guard() {
            return LensDispatch::ignored(reason);
        }
        if let Err(err) = result {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %err, "copy failed");
            let _ = err;
            return LensDispatch::ignored(IgnoredReason::Unchanged);
        }
        let flash = self.config.copy_flash();
        let Some(panel) = self.panel.as_mut() else {
            return LensDispatch::ignored(IgnoredReason::NoPanel);
        };
        panel.start_flash(now, flash);
        let mut commands = vec![HostCommand::RenderPanel];
        commands.extend(self.release(LiveResources::FLASH_TIMER));
        commands.push(self.install(LiveResources::FLASH_TIMER));
        LensDispatch::handled(commands)
    }

    /// The flash timer fired.
    pub fn flash_elapsed(&mut self, now: Duration) -> LensDispatch {
        if let Err(reason) = self.guard() {
            return LensDispatch::ignored(reason);
        }
        let mut commands: Vec<_> = self.release(LiveResources::FLASH_TIMER).into_iter().collect();
        if let Some(panel) = self.panel.as_mut() {
            if panel.expire_flash(now) {
                commands.push(HostCommand::RenderPanel);
            }
        }
        if commands.is_empty() {
            return LensDispatch::ignored(IgnoredReason::Unchanged);
        }
        LensDispatch::handled(commands)
    }

    /// Release everything and remove the panel. Safe to call repeatedly.
    pub fn teardown(&mut self) -> LensDispatch {
        if self.torn_down {
            return LensDispatch::ignored(IgnoredReason::TornDown);
        }
        self.torn_down = true;
        let mut commands = Vec::new();
        if self.highlight.reset() {
            commands.push(HostCommand::RemoveMarker);
        }
        commands.extend(self.release(LiveResources::all()));
        if self.panel.take().is_some() {
            commands.push(HostCommand::RemovePanel);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(commands = commands.len(), "overlay torn down");
        LensDispatch::handled(commands)
    }
}

#[cfg(test)]
mod tests {
    use super::{DispatchOutcome, HostCommand, IgnoredReason, LensSession, LiveResources};
    use crate::config::LensConfig;
    use crate::error::LensError;
    use crate::geometry::{Point, Rect};
    use core::time::Duration;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn running() -> LensSession {
        let mut session = LensSession::new(LensConfig::default());
        session.start();
        session.tick(ms(0), || Ok("Main/Home.page.xml".to_owned()), || false);
        session
    }

    #[test]
    fn start_installs_document_listeners_and_timer() {
        let mut session = LensSession::new(LensConfig::default());
        let dispatch = session.start();
        assert_eq!(
            dispatch.commands,
            vec![HostCommand::Install(
                LiveResources::DOCUMENT | LiveResources::PATH_TIMER
            )]
        );
        assert_eq!(
            session.start().outcome,
            DispatchOutcome::Ignored(IgnoredReason::AlreadyStarted)
        );
    }

    #[test]
    fn first_tick_creates_panel_once() {
        let mut session = LensSession::new(LensConfig::default());
        session.start();
        let first = session.tick(ms(0), || Ok("A.page.xml".to_owned()), || false);
        assert!(first.commands.contains(&HostCommand::CreatePanel));
        let second = session.tick(
            ms(1000),
            || panic!("collapsed panel with a known path must not refetch"),
            || panic!("mobile detection runs once"),
        );
        assert!(!second.commands.contains(&HostCommand::CreatePanel));
        assert_eq!(
            session.panel().and_then(|p| p.page_path()),
            Some("A")
        );
    }

    #[test]
    fn host_error_halts_refresh_timer() {
        let mut session = LensSession::new(LensConfig::default());
        session.start();
        let dispatch = session.tick(
            ms(0),
            || Err(LensError::HostNotReady("mx is undefined".into())),
            || false,
        );
        assert_eq!(
            dispatch.commands,
            vec![HostCommand::Release(LiveResources::PATH_TIMER)]
        );
        assert!(session.panel().is_none());
        assert!(!session.live().contains(LiveResources::PATH_TIMER));
    }

    #[test]
    fn pointer_up_reports_whether_a_drag_ended() {
        let mut session = running();
        assert_eq!(
            session.pointer_up().outcome,
            DispatchOutcome::Ignored(IgnoredReason::NotDragging)
        );
        let rect = Rect::new(8.0, 8.0, 30.0, 30.0);
        assert!(session.pointer_down(Point::new(20.0, 20.0), rect).prevent_default);
        assert_eq!(session.pointer_up().commands, vec![HostCommand::RenderPanel]);
        assert_eq!(
            session.pointer_up().outcome,
            DispatchOutcome::Ignored(IgnoredReason::NotDragging)
        );
    }

    #[test]
    fn panel_hover_renders_only_on_cursor_change() {
        let mut session = running();
        session.panel_click(ms(10));
        let rect = Rect::new(8.0, 8.0, 200.0, 100.0);
        let border = session.panel_hover(Point::new(100.0, 10.0), rect);
        assert_eq!(border.commands, vec![HostCommand::RenderPanel]);
        assert_eq!(
            session.panel_hover(Point::new(120.0, 10.0), rect).outcome,
            DispatchOutcome::Ignored(IgnoredReason::Unchanged)
        );
        let interior = session.panel_hover(Point::new(100.0, 50.0), rect);
        assert_eq!(interior.commands, vec![HostCommand::RenderPanel]);
    }

    #[test]
    fn gestures_without_a_panel_are_ignored() {
        let mut session = LensSession::new(LensConfig::default());
        session.start();
        let rect = Rect::new(0.0, 0.0, 30.0, 30.0);
        assert_eq!(
            session.pointer_up().outcome,
            DispatchOutcome::Ignored(IgnoredReason::NoPanel)
        );
        assert_eq!(
            session.panel_hover(Point::new(5.0, 5.0), rect).outcome,
            DispatchOutcome::Ignored(IgnoredReason::NoPanel)
        );
    }

    #[test]
    fn escape_steps_back_then_closes() {
        let mut session = running();
        session.panel_click(ms(10));
        assert!(session.panel().is_some_and(|p| p.is_expanded()));

        session.key_down("Escape");
        assert!(session.panel().is_some_and(|p| !p.is_expanded()));
        assert!(!session.is_torn_down());

        let close = session.key_down("Escape");
        assert!(close.commands.contains(&HostCommand::RemovePanel));
        assert!(session.is_torn_down());
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut session = running();
        assert_eq!(
            session.key_down("Enter").outcome,
            DispatchOutcome::Ignored(IgnoredReason::WrongGesture)
        );
    }

    #[test]
    fn collapse_click_stops_propagation() {
        let mut session = running();
        session.panel_click(ms(10));
        let dispatch = session.collapse_clicked();
        assert!(dispatch.stop_propagation);
        assert!(session.panel().is_some_and(|p| !p.is_expanded()));
    }

    #[test]
    fn flash_timer_is_installed_and_released() {
        let mut session = running();
        session.panel_click(ms(10));
        let dispatch = session.copy_finished(ms(100), Ok(()));
        assert!(
            dispatch
                .commands
                .contains(&HostCommand::Install(LiveResources::FLASH_TIMER))
        );
        assert!(session.view().is_some_and(|v| v.flashing));

        let elapsed = session.flash_elapsed(ms(300));
        assert!(
            elapsed
                .commands
                .contains(&HostCommand::Release(LiveResources::FLASH_TIMER))
        );
        assert!(session.view().is_some_and(|v| !v.flashing));
    }

    #[test]
    fn failed_copy_does_not_flash() {
        let mut session = running();
        session.panel_click(ms(10));
        let dispatch = session.copy_finished(ms(100), Err(LensError::Clipboard("denied".into())));
        assert!(!dispatch.is_handled());
        assert!(session.view().is_some_and(|v| !v.flashing));
    }

    #[test]
    fn events_after_teardown_are_ignored() {
        let mut session = running();
        session.teardown();
        assert_eq!(
            session.pointer_up().outcome,
            DispatchOutcome::Ignored(IgnoredReason::TornDown)
        );
        assert_eq!(
            session.start().outcome,
            DispatchOutcome::Ignored(IgnoredReason::TornDown)
        );
    }
}
