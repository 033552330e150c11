//! `wasm-bindgen` exports and the event plumbing around [`LensSession`].
//!
//! Only compiled on `wasm32` targets.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Reflect;
use mxlens_core::preview::in_device_preview;
use mxlens_core::render::PanelButton;
use mxlens_core::{
    DispatchOutcome, HitTarget, HostCommand, LensConfig, LensDispatch, LensError, LensSession,
    LiveResources, Point, Rect, ids,
};
use tracing::Level;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, EventTarget, KeyboardEvent, MouseEvent, Node, Window};
use web_time::Instant;

use crate::bootstrap::ReadinessSubscription;
use crate::clipboard;
use crate::dom::WebNode;
use crate::handles::{Interval, Listener, Observer, Resources, Timeout};
use crate::host;
use crate::logging;
use crate::panel_dom::{self, PanelDom};

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "mxlens panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("mxlens panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn to_js(err: LensError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Everything one overlay owns.
struct Runtime {
    window: Window,
    document: Document,
    origin: Instant,
    session: LensSession,
    panel: Option<PanelDom>,
    resources: Resources,
}

type Shared = Rc<RefCell<Runtime>>;
type WeakShared = Weak<RefCell<Runtime>>;

impl Runtime {
    fn now(&self) -> core::time::Duration {
        self.origin.elapsed()
    }
}

enum Active {
    Waiting(ReadinessSubscription),
    Running(Shared),
}

impl Active {
    fn is_live(&self) -> bool {
        match self {
            Self::Waiting(_) => true,
            Self::Running(rt) => !rt.borrow().session.is_torn_down(),
        }
    }
}

thread_local! {
    static ACTIVE: RefCell<Option<Active>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

/// Start the overlay once `window.mx` is available.
///
/// `config_json` is an optional, possibly partial, JSON object of
/// `LensConfig` fields. Calling this while an overlay is waiting or running,
/// or when a panel node already exists, does nothing.
#[wasm_bindgen]
pub fn start(config_json: Option<String>) -> Result<(), JsValue> {
    install_panic_hook();
    logging::init(Level::INFO);

    let config = match config_json.as_deref().map(str::trim) {
        Some(json) if !json.is_empty() => LensConfig::from_json(json).map_err(to_js)?,
        _ => LensConfig::default(),
    };
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if ACTIVE.with(|active| active.borrow().as_ref().is_some_and(Active::is_live)) {
        tracing::debug!("overlay already active");
        return Ok(());
    }
    if document.get_element_by_id(ids::PANEL).is_some() {
        tracing::debug!("panel already present");
        return Ok(());
    }
    let stale = ACTIVE.with(|active| active.borrow_mut().take());
    drop(stale);

    let policy = config.readiness;
    let launch_window = window.clone();
    let subscription = ReadinessSubscription::start(&window, policy, move || {
        match launch(launch_window, config) {
            Ok(rt) => {
                let previous =
                    ACTIVE.with(|active| active.borrow_mut().replace(Active::Running(rt)));
                drop(previous);
            }
            Err(err) => tracing::warn!(error = ?err, "overlay failed to start"),
        }
    });
    let unused = ACTIVE.with(|active| {
        let mut active = active.borrow_mut();
        if active.is_none() {
            *active = Some(Active::Waiting(subscription));
            None
        } else {
            Some(subscription)
        }
    });
    drop(unused);
    Ok(())
}

/// Tear the overlay down, or cancel a pending wait for the host.
#[wasm_bindgen]
pub fn stop() {
    let active = ACTIVE.with(|active| active.borrow_mut().take());
    match active {
        Some(Active::Waiting(subscription)) => subscription.cancel(),
        Some(Active::Running(rt)) => {
            let dispatch = rt.borrow_mut().session.teardown();
            execute(&rt, dispatch);
        }
        None => {}
    }
}

#[wasm_bindgen(js_name = isRunning)]
pub fn is_running() -> bool {
    ACTIVE.with(|active| {
        active
            .borrow()
            .as_ref()
            .is_some_and(|state| matches!(state, Active::Running(_)) && state.is_live())
    })
}

fn launch(window: Window, config: LensConfig) -> Result<Shared, JsValue> {
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let rt = Rc::new(RefCell::new(Runtime {
        window,
        document,
        origin: Instant::now(),
        session: LensSession::new(config),
        panel: None,
        resources: Resources::default(),
    }));
    let started = rt.borrow_mut().session.start();
    execute(&rt, started);
    on_tick(&Rc::downgrade(&rt));
    tracing::info!("overlay started");
    Ok(rt)
}

/// Run one session transition and carry out its commands.
fn dispatch_with<F>(weak: &WeakShared, event: Option<&Event>, transition: F)
where
    F: FnOnce(&mut Runtime) -> LensDispatch,
{
    let Some(rt) = weak.upgrade() else {
        return;
    };
    let dispatch = transition(&mut rt.borrow_mut());
    if let Some(event) = event {
        if dispatch.prevent_default {
            event.prevent_default();
        }
        if dispatch.stop_propagation {
            event.stop_propagation();
        }
    }
    if let DispatchOutcome::Ignored(reason) = dispatch.outcome {
        tracing::trace!(?reason, "event ignored");
    }
    execute(&rt, dispatch);
}

fn execute(rt: &Shared, dispatch: LensDispatch) {
    let weak = Rc::downgrade(rt);
    for command in dispatch.commands {
        if let Err(err) = run(rt, &weak, command) {
            tracing::warn!(error = ?err, "host command failed");
        }
    }
}

fn run(rt: &Shared, weak: &WeakShared, command: HostCommand) -> Result<(), JsValue> {
    let (window, document) = {
        let inner = rt.borrow();
        (inner.window.clone(), inner.document.clone())
    };
    match command {
        HostCommand::Install(flags) => {
            for flag in flags.iter() {
                install(rt, weak, &window, &document, flag)?;
            }
        }
        HostCommand::Release(flags) => {
            let released = rt.borrow_mut().resources.take(flags);
            drop(released);
        }
        HostCommand::CreatePanel => {
            let mut panel = PanelDom::create(&document)?;
            attach_panel_listeners(&mut panel, weak)?;
            let previous = rt.borrow_mut().panel.replace(panel);
            if let Some(previous) = previous {
                previous.remove();
            }
        }
        HostCommand::RenderPanel => {
            let mut inner = rt.borrow_mut();
            let Runtime { session, panel, .. } = &mut *inner;
            if let (Some(view), Some(panel)) = (session.view(), panel.as_mut()) {
                panel.apply(&view)?;
            }
        }
        HostCommand::RemovePanel => {
            let panel = rt.borrow_mut().panel.take();
            if let Some(panel) = panel {
                panel.remove();
            }
        }
        HostCommand::ResyncChildren => {
            let inner = rt.borrow();
            if let Some(panel) = inner.panel.as_ref() {
                panel.resync(|role| inner.session.resync_display(role))?;
            }
        }
        HostCommand::PlaceMarker(marker) => panel_dom::place_marker(&document, &marker)?,
        HostCommand::RemoveMarker => panel_dom::remove_marker(&document),
        HostCommand::ClearSelection => {
            if let Some(selection) = window.get_selection()? {
                selection.remove_all_ranges()?;
            }
        }
        HostCommand::CopyToClipboard(text) => {
            let weak = weak.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = clipboard::copy_text(&window, &text).await;
                if let Err(err) = &result {
                    tracing::warn!(error = %err, "copy failed");
                }
                dispatch_with(&weak, None, |rt| {
                    let now = rt.now();
                    rt.session.copy_finished(now, result)
                });
            });
        }
    }
    Ok(())
}

fn install(
    rt: &Shared,
    weak: &WeakShared,
    window: &Window,
    document: &Document,
    flag: LiveResources,
) -> Result<(), JsValue> {
    let target: &EventTarget = document;
    let weak = weak.clone();
    let config = rt.borrow().session.config().clone();

    if flag == LiveResources::PATH_TIMER {
        let timer = Interval::start(window, config.refresh_interval_ms, move || on_tick(&weak))?;
        let previous = rt.borrow_mut().resources.set_path_timer(timer);
        drop(previous);
        return Ok(());
    }
    if flag == LiveResources::FLASH_TIMER {
        let timer = Timeout::start(window, config.copy_flash_ms, move || {
            dispatch_with(&weak, None, |rt| {
                let now = rt.now();
                rt.session.flash_elapsed(now)
            });
        })?;
        let previous = rt.borrow_mut().resources.set_flash_timer(timer);
        drop(previous);
        return Ok(());
    }
    if flag == LiveResources::RESYNC_OBSERVER {
        let root: Option<Node> = rt.borrow().panel.as_ref().map(|p| p.root().clone().into());
        let Some(root) = root else {
            return Ok(());
        };
        let observer = Observer::observe_children(&root, move || {
            dispatch_with(&weak, None, |rt| rt.session.mutation_observed());
        })?;
        let previous = rt.borrow_mut().resources.set_observer(observer);
        drop(previous);
        return Ok(());
    }

    let listener = if flag == LiveResources::SCROLL {
        Listener::attach(target, "scroll", true, move |_| {
            dispatch_with(&weak, None, |rt| rt.session.scrolled());
        })?
    } else if flag == LiveResources::WHEEL {
        Listener::attach(target, "wheel", false, move |_| {
            dispatch_with(&weak, None, |rt| rt.session.scrolled());
        })?
    } else if flag == LiveResources::CONTEXT_MENU {
        Listener::attach(target, "contextmenu", false, move |event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let (shift, button) = (mouse.shift_key(), mouse.button());
            let (x, y) = (mouse.client_x(), mouse.client_y());
            dispatch_with(&weak, Some(&event), |rt| {
                let Runtime {
                    session,
                    panel,
                    window,
                    document,
                    ..
                } = rt;
                session.context_menu(shift, button, || {
                    hit_target(window, document, panel.as_ref(), x, y)
                })
            });
        })?
    } else if flag == LiveResources::POINTER_OVER {
        Listener::attach(target, "mouseover", false, move |event| {
            let Some(node) = event.target().and_then(|t| t.dyn_into::<Node>().ok()) else {
                return;
            };
            dispatch_with(&weak, None, |rt| {
                let inside = rt.panel.as_ref().is_some_and(|p| p.contains(&node));
                rt.session.pointer_over(&WebNode(node), inside)
            });
        })?
    } else if flag == LiveResources::KEY_DOWN {
        Listener::attach(target, "keydown", false, move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                return;
            };
            dispatch_with(&weak, Some(&event), |rt| rt.session.key_down(&key));
        })?
    } else if flag == LiveResources::POINTER_MOVE {
        Listener::attach(target, "mousemove", false, move |event| {
            let Some(pointer) = pointer_of(&event) else {
                return;
            };
            dispatch_with(&weak, Some(&event), |rt| rt.session.pointer_move(pointer));
        })?
    } else if flag == LiveResources::POINTER_UP {
        Listener::attach(target, "mouseup", false, move |event| {
            dispatch_with(&weak, Some(&event), |rt| rt.session.pointer_up());
        })?
    } else {
        tracing::warn!(?flag, "no installer for resource");
        return Ok(());
    };
    rt.borrow_mut().resources.add_listener(flag, listener);
    Ok(())
}

fn attach_panel_listeners(panel: &mut PanelDom, weak: &WeakShared) -> Result<(), JsValue> {
    let root: EventTarget = panel.root().clone().into();

    let down = {
        let weak = weak.clone();
        Listener::attach(&root, "mousedown", false, move |event| {
            let Some(pointer) = pointer_of(&event) else {
                return;
            };
            dispatch_with(&weak, Some(&event), |rt| {
                let rect = panel_rect(rt);
                rt.session.pointer_down(pointer, rect)
            });
        })?
    };
    let hover = {
        let weak = weak.clone();
        Listener::attach(&root, "mousemove", false, move |event| {
            let Some(pointer) = pointer_of(&event) else {
                return;
            };
            dispatch_with(&weak, None, |rt| {
                let rect = panel_rect(rt);
                rt.session.panel_hover(pointer, rect)
            });
        })?
    };
    let click = {
        let weak = weak.clone();
        Listener::attach(&root, "click", false, move |event| {
            dispatch_with(&weak, Some(&event), |rt| {
                let now = rt.now();
                rt.session.panel_click(now)
            });
        })?
    };
    let close = {
        let weak = weak.clone();
        let target: EventTarget = panel.button(PanelButton::Close).clone().into();
        Listener::attach(&target, "click", false, move |event| {
            dispatch_with(&weak, Some(&event), |rt| rt.session.close_clicked());
        })?
    };
    let collapse = {
        let weak = weak.clone();
        let target: EventTarget = panel.button(PanelButton::Collapse).clone().into();
        Listener::attach(&target, "click", false, move |event| {
            dispatch_with(&weak, Some(&event), |rt| rt.session.collapse_clicked());
        })?
    };
    for listener in [down, hover, click, close, collapse] {
        panel.own(listener);
    }
    Ok(())
}

fn on_tick(weak: &WeakShared) {
    dispatch_with(weak, None, |rt| {
        let now = rt.now();
        let window = rt.window.clone();
        rt.session.tick(
            now,
            || host::content_form_path(&window),
            || in_device_preview(host::frame_chain(&window)),
        )
    });
}

fn pointer_of(event: &Event) -> Option<Point> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(Point::new(
        f64::from(mouse.client_x()),
        f64::from(mouse.client_y()),
    ))
}

fn panel_rect(rt: &Runtime) -> Rect {
    rt.panel.as_ref().map(PanelDom::rect).unwrap_or_default()
}

fn hit_target(
    window: &Window,
    document: &Document,
    panel: Option<&PanelDom>,
    x: i32,
    y: i32,
) -> Option<HitTarget> {
    let element = document.element_from_point(x as f32, y as f32)?;
    let rect = element.get_bounding_client_rect();
    Some(HitTarget {
        rect: Rect::new(rect.left(), rect.top(), rect.width(), rect.height()),
        scroll_x: window.scroll_x().unwrap_or(0.0),
        scroll_y: window.scroll_y().unwrap_or(0.0),
        inside_panel: panel.is_some_and(|p| p.contains(&element)),
    })
}
