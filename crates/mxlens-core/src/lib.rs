#![forbid(unsafe_code)]

//! `mxlens-core` is the deterministic controller behind the MX Lens overlay.
//!
//! Design goals:
//! - **Host-driven**: the embedding adapter pushes DOM events, geometry and
//!   monotonic time; nothing here touches a live document.
//! - **Declarative output**: every transition returns a [`LensDispatch`]
//!   describing what the host must do, and the panel is described by a
//!   [`PanelView`] rather than mutated in place.
//! - **Generic resolution**: widget metadata is derived through the
//!   [`DomNode`] trait so the same code resolves `web_sys` elements and the
//!   in-memory [`memory_dom::MemoryDocument`].

pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod geometry;
pub mod highlight;
pub mod interaction;
pub mod memory_dom;
pub mod preview;
pub mod readiness;
pub mod render;
pub mod resolver;
pub mod resync;

pub use config::{LensConfig, ReadinessPolicy};
pub use controller::{
    DispatchOutcome, HostCommand, IgnoredReason, LensDispatch, LensSession, LiveResources,
};
pub use dom::{DomNode, nearest_ancestor};
pub use error::LensError;
pub use geometry::{Point, Rect};
pub use highlight::{HighlightMode, HitTarget, MarkerGeometry};
pub use interaction::{PanelMode, PanelState};
pub use preview::{FrameLocation, in_device_preview};
pub use readiness::{ReadinessStep, ReadinessWait};
pub use render::{FactKind, MetadataSpan, PanelView, Segment};
pub use resolver::WidgetMetadata;
pub use resync::{ChildRole, Display};

/// Fixed DOM identifiers produced into the host document.
pub mod ids {
    pub const PANEL: &str = "dataDiv";
    pub const INFO_ICON: &str = "infoIcon";
    pub const PAGE_NAME: &str = "pageName";
    pub const CLOSE_BUTTON: &str = "mendixPageCloseButton";
    pub const COLLAPSE_BUTTON: &str = "mendixPageCollapseButton";
    pub const HIGHLIGHT: &str = "activeElementHighlight";
    pub const PULSE_STYLE: &str = "mendix-lens-pulse-style";
}
