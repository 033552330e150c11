//! Waits for the host global before the overlay starts.

use std::cell::RefCell;
use std::rc::Rc;

use mxlens_core::ReadinessPolicy;
use mxlens_core::readiness::{ReadinessStep, ReadinessWait};
use web_sys::Window;

use crate::handles::Timeout;
use crate::host;

struct Pending {
    wait: ReadinessWait,
    timer: Option<Timeout>,
    on_ready: Option<Box<dyn FnOnce()>>,
}

/// A running readiness wait. Dropping it or calling
/// [`ReadinessSubscription::cancel`] stops further checks.
pub struct ReadinessSubscription {
    state: Rc<RefCell<Pending>>,
}

impl ReadinessSubscription {
    /// Check now, then on the policy's backoff schedule, and run `on_ready`
    /// once the host is available.
    pub fn start<F>(window: &Window, policy: ReadinessPolicy, on_ready: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        let state = Rc::new(RefCell::new(Pending {
            wait: ReadinessWait::new(policy),
            timer: None,
            on_ready: Some(Box::new(on_ready)),
        }));
        poll(window.clone(), Rc::downgrade(&state));
        Self { state }
    }

    pub fn cancel(&self) {
        let mut state = self.state.borrow_mut();
        state.wait.cancel();
        let timer = state.timer.take();
        state.on_ready = None;
        drop(state);
        drop(timer);
    }
}

impl Drop for ReadinessSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn poll(window: Window, state: std::rc::Weak<RefCell<Pending>>) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let step = state.borrow_mut().wait.observe(host::is_ready(&window));
    match step {
        ReadinessStep::Ready => {
            let on_ready = state.borrow_mut().on_ready.take();
            tracing::debug!("host ready");
            if let Some(on_ready) = on_ready {
                on_ready();
            }
        }
        ReadinessStep::Retry(delay) => {
            let weak = Rc::downgrade(&state);
            let next = window.clone();
            let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
            match Timeout::start(&window, delay_ms, move || poll(next, weak)) {
                Ok(timer) => {
                    let previous = state.borrow_mut().timer.replace(timer);
                    drop(previous);
                }
                Err(err) => tracing::warn!(error = ?err, "could not schedule readiness check"),
            }
        }
        ReadinessStep::GaveUp => {
            let attempts = state.borrow().wait.attempts();
            tracing::debug!(attempts, "host never became ready; giving up");
        }
        ReadinessStep::Cancelled => {}
    }
}
