//! Device-preview frame detection.
//!
//! The modeler's phone and tablet previews render the app inside an embedded
//! frame served from `/index.html?profile=Phone` (or `Tablet`). The panel
//! takes a full-width layout there.

/// Location facts for one window in the parent chain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameLocation {
    /// The window is embedded by a frame element in its parent.
    pub embedded: bool,
    pub pathname: String,
    /// Raw query string including the leading `?`.
    pub search: String,
}

const PREVIEW_PATH: &str = "/index.html";
const PREVIEW_PROFILES: [&str; 2] = ["Phone", "Tablet"];

impl FrameLocation {
    /// Whether this window is a phone or tablet preview frame.
    #[must_use]
    pub fn is_device_preview(&self) -> bool {
        self.embedded && self.pathname == PREVIEW_PATH && self.profile().is_some()
    }

    /// The `profile` query parameter, when it names a preview device.
    #[must_use]
    pub fn profile(&self) -> Option<&str> {
        self.search
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "profile")
            .map(|(_, value)| value)
            .filter(|value| PREVIEW_PROFILES.contains(value))
    }
}

/// Walk from the current window up to the top; true if any level is a
/// device preview frame.
pub fn in_device_preview<I>(chain: I) -> bool
where
    I: IntoIterator<Item = FrameLocation>,
{
    chain.into_iter().any(|frame| frame.is_device_preview())
}
