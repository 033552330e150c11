//! Overlay configuration.
//!
//! Every field has a default matching the stock overlay; hosts may pass a
//! partial JSON object to override individual values.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LensError;
use crate::geometry::Point;

/// Default page-path refresh interval.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 1000;
/// Window in which three clicks count as a triple click.
pub const DEFAULT_TRIPLE_CLICK_WINDOW_MS: u64 = 1000;
/// Duration of the background flash after a successful copy.
pub const DEFAULT_COPY_FLASH_MS: u64 = 200;
/// Accumulated pointer travel needed before a drag moves the panel.
pub const DEFAULT_DRAG_THRESHOLD_PX: f64 = 15.0;
/// Distance from the panel border that still counts as a border grab.
pub const DEFAULT_BORDER_MARGIN_PX: f64 = 5.0;
/// Padding added around a highlighted element.
pub const DEFAULT_HIGHLIGHT_PADDING_PX: f64 = 4.0;
/// Suffix stripped from the host page path before display.
pub const DEFAULT_PAGE_SUFFIX: &str = ".page.xml";

/// Bounded retry policy used while waiting for the host global.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessPolicy {
    /// Attempts after the initial check before giving up.
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    /// Multiplier applied to the delay after each failed attempt.
    pub backoff: f64,
    pub max_delay_ms: u64,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            initial_delay_ms: 300,
            backoff: 1.5,
            max_delay_ms: 2000,
        }
    }
}

/// Tunables for one overlay session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    pub refresh_interval_ms: u64,
    pub triple_click_window_ms: u64,
    pub copy_flash_ms: u64,
    pub drag_threshold_px: f64,
    pub border_margin_px: f64,
    pub highlight_padding_px: f64,
    pub page_suffix: String,
    /// Where the collapsed dot first appears.
    pub initial_position: Point,
    pub readiness: ReadinessPolicy,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            triple_click_window_ms: DEFAULT_TRIPLE_CLICK_WINDOW_MS,
            copy_flash_ms: DEFAULT_COPY_FLASH_MS,
            drag_threshold_px: DEFAULT_DRAG_THRESHOLD_PX,
            border_margin_px: DEFAULT_BORDER_MARGIN_PX,
            highlight_padding_px: DEFAULT_HIGHLIGHT_PADDING_PX,
            page_suffix: DEFAULT_PAGE_SUFFIX.to_owned(),
            initial_position: Point::new(8.0, 8.0),
            readiness: ReadinessPolicy::default(),
        }
    }
}

impl LensConfig {
    /// Parse a (possibly partial) JSON object and validate it.
    pub fn from_json(json: &str) -> Result<Self, LensError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LensError> {
        if self.refresh_interval_ms == 0 {
            return Err(LensError::InvalidConfig("refresh_interval_ms must be > 0"));
        }
        if self.triple_click_window_ms == 0 {
            return Err(LensError::InvalidConfig(
                "triple_click_window_ms must be > 0",
            ));
        }
        if !(self.drag_threshold_px.is_finite() && self.drag_threshold_px > 0.0) {
            return Err(LensError::InvalidConfig("drag_threshold_px must be > 0"));
        }
        if !(self.border_margin_px.is_finite() && self.border_margin_px >= 0.0) {
            return Err(LensError::InvalidConfig("border_margin_px must be >= 0"));
        }
        if !(self.highlight_padding_px.is_finite() && self.highlight_padding_px >= 0.0) {
            return Err(LensError::InvalidConfig(
                "highlight_padding_px must be >= 0",
            ));
        }
        if !(self.readiness.backoff.is_finite() && self.readiness.backoff >= 1.0) {
            return Err(LensError::InvalidConfig("readiness.backoff must be >= 1"));
        }
        Ok(())
    }

    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    #[must_use]
    pub const fn triple_click_window(&self) -> Duration {
        Duration::from_millis(self.triple_click_window_ms)
    }

    #[must_use]
    pub const fn copy_flash(&self) -> Duration {
        Duration::from_millis(self.copy_flash_ms)
    }

    /// Strip the configured suffix for display. Paths without it pass through.
    #[must_use]
    pub fn display_path<'a>(&self, path: &'a str) -> &'a str {
        if self.page_suffix.is_empty() {
            return path;
        }
        path.strip_suffix(self.page_suffix.as_str()).unwrap_or(path)
    }
}

#[cfg(test)]
mod tests {
    use super::LensConfig;
    use crate::error::LensError;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = LensConfig::from_json(r#"{"drag_threshold_px": 20}"#).expect("valid");
        assert_eq!(config.drag_threshold_px, 20.0);
        assert_eq!(config.refresh_interval_ms, 1000);
        assert_eq!(config.page_suffix, ".page.xml");
    }

    #[test]
    fn zero_threshold_is_rejected() {
        let err = LensConfig::from_json(r#"{"drag_threshold_px": 0}"#).unwrap_err();
        assert!(matches!(err, LensError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = LensConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, LensError::Config(_)));
    }

    #[test]
    fn display_path_strips_only_trailing_suffix() {
        let config = LensConfig::default();
        assert_eq!(config.display_path("Module/Home.page.xml"), "Module/Home");
        assert_eq!(config.display_path("Module/Home"), "Module/Home");
        let custom = LensConfig {
            page_suffix: String::new(),
            ..LensConfig::default()
        };
        assert_eq!(custom.display_path("A.page.xml"), "A.page.xml");
    }
}
