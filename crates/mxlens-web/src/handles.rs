//! Owned listener, timer and observer handles.
//!
//! Each handle detaches itself on drop, so releasing a resource is a matter of
//! taking it out of its slot.

use js_sys::Array;
use mxlens_core::LiveResources;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, MutationObserver, MutationObserverInit, Node,
    Window,
};

/// An attached event listener.
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    capture: bool,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn attach<F>(
        target: &EventTarget,
        kind: &'static str,
        capture: bool,
        handler: F,
    ) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(Event)>::wrap(Box::new(handler));
        let options = AddEventListenerOptions::new();
        options.set_capture(capture);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            kind,
            capture,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback_and_bool(
            self.kind,
            self.closure.as_ref().unchecked_ref(),
            self.capture,
        );
    }
}

/// A repeating `setInterval` timer.
pub struct Interval {
    window: Window,
    id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn start<F>(window: &Window, period_ms: u64, tick: F) -> Result<Self, JsValue>
    where
        F: FnMut() + 'static,
    {
        let closure = Closure::<dyn FnMut()>::wrap(Box::new(tick));
        let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            clamp_ms(period_ms),
        )?;
        Ok(Self {
            window: window.clone(),
            id,
            _closure: closure,
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.window.clear_interval_with_handle(self.id);
    }
}

/// A one-shot `setTimeout` timer; dropping it before it fires cancels it.
pub struct Timeout {
    window: Window,
    id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn start<F>(window: &Window, delay_ms: u64, fire: F) -> Result<Self, JsValue>
    where
        F: FnOnce() + 'static,
    {
        let mut fire = Some(fire);
        let closure = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            if let Some(fire) = fire.take() {
                fire();
            }
        }));
        let id = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            clamp_ms(delay_ms),
        )?;
        Ok(Self {
            window: window.clone(),
            id,
            _closure: closure,
        })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.window.clear_timeout_with_handle(self.id);
    }
}

fn clamp_ms(ms: u64) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}

/// A connected `MutationObserver` watching a subtree's child lists.
pub struct Observer {
    observer: MutationObserver,
    _closure: Closure<dyn FnMut(Array, MutationObserver)>,
}

impl Observer {
    pub fn observe_children<F>(target: &Node, mut on_batch: F) -> Result<Self, JsValue>
    where
        F: FnMut() + 'static,
    {
        let closure = Closure::<dyn FnMut(Array, MutationObserver)>::wrap(Box::new(
            move |_records: Array, _observer: MutationObserver| on_batch(),
        ));
        let observer = MutationObserver::new(closure.as_ref().unchecked_ref())?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer.observe_with_options(target, &init)?;
        Ok(Self {
            observer,
            _closure: closure,
        })
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Slots for every resource in [`LiveResources`].
#[derive(Default)]
pub struct Resources {
    listeners: Vec<(LiveResources, Listener)>,
    path_timer: Option<Interval>,
    flash_timer: Option<Timeout>,
    observer: Option<Observer>,
}

/// Handles taken out of their slots, detached when dropped.
pub struct Released {
    _listeners: Vec<Listener>,
    _path_timer: Option<Interval>,
    _flash_timer: Option<Timeout>,
    _observer: Option<Observer>,
}

impl Resources {
    pub fn add_listener(&mut self, flag: LiveResources, listener: Listener) {
        self.listeners.push((flag, listener));
    }

    pub fn set_path_timer(&mut self, timer: Interval) -> Option<Interval> {
        self.path_timer.replace(timer)
    }

    pub fn set_flash_timer(&mut self, timer: Timeout) -> Option<Timeout> {
        self.flash_timer.replace(timer)
    }

    pub fn set_observer(&mut self, observer: Observer) -> Option<Observer> {
        self.observer.replace(observer)
    }

    /// Take every handle covered by `flags`. Drop the result outside any
    /// borrow of the owning state.
    pub fn take(&mut self, flags: LiveResources) -> Released {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.listeners)
            .into_iter()
            .partition(|(flag, _)| flags.contains(*flag));
        self.listeners = kept;
        let pick = |flag: LiveResources| flags.contains(flag);
        Released {
            _listeners: taken.into_iter().map(|(_, l)| l).collect(),
            _path_timer: pick(LiveResources::PATH_TIMER)
                .then(|| self.path_timer.take())
                .flatten(),
            _flash_timer: pick(LiveResources::FLASH_TIMER)
                .then(|| self.flash_timer.take())
                .flatten(),
            _observer: pick(LiveResources::RESYNC_OBSERVER)
                .then(|| self.observer.take())
                .flatten(),
        }
    }
}
