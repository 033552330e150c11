#![forbid(unsafe_code)]

//! Browser adapter for the MX Lens overlay.
//!
//! This crate binds [`mxlens_core::LensSession`] to a live Mendix page: it
//! waits for the host global, forwards DOM events with monotonic timestamps,
//! and carries out the [`mxlens_core::HostCommand`]s each transition returns.
//! All state lives behind one `Rc<RefCell<_>>`; event closures hold only weak
//! references, so teardown drops every listener, timer and observer.
//!
//! JavaScript surface: `start(configJson?)`, `stop()` and `isRunning()`.

pub mod logging;

#[cfg(target_arch = "wasm32")]
mod bootstrap;
#[cfg(target_arch = "wasm32")]
mod clipboard;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod handles;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod panel_dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{is_running, start, stop};
