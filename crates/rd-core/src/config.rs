//! Editor configuration.
//!
//! The defaults reproduce the stock editor: 50 undo steps, pasted and
//! duplicated copies land 20 units down-right of their source, and new
//! elements start at (100, 100) sized 200 × 100.

use crate::geometry::{Point, Size};
use serde::{Deserialize, Serialize};

/// Initial geometry for elements created without an explicit position/size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementDefaults {
    pub position: Point,
    pub size: Size,
}

impl Default for ElementDefaults {
    fn default() -> Self {
        Self {
            position: Point::new(100.0, 100.0),
            size: Size::new(200.0, 100.0),
        }
    }
}

/// Configuration for an editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept. Default: **50**.
    pub history_capacity: usize,

    /// Offset applied on both axes to pasted and duplicated elements.
    pub paste_offset: f64,

    pub element_defaults: ElementDefaults,

    /// Zoom is clamped into `[min_zoom, max_zoom]`.
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: 50,
            paste_offset: 20.0,
            element_defaults: ElementDefaults::default(),
            min_zoom: 0.1,
            max_zoom: 5.0,
        }
    }
}

impl EditorConfig {
    /// Clamp `zoom` into the configured bounds. NaN resets to 1.0.
    /// Swapped bounds are tolerated.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        let lo = self.min_zoom.min(self.max_zoom);
        let hi = self.min_zoom.max(self.max_zoom);
        let zoom = if zoom.is_nan() { 1.0 } else { zoom };
        zoom.max(lo).min(hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: EditorConfig = serde_json::from_str(r#"{"historyCapacity": 10}"#).unwrap();
        assert_eq!(cfg.history_capacity, 10);
        assert_eq!(cfg.paste_offset, 20.0);
        assert_eq!(cfg.element_defaults.size, Size::new(200.0, 100.0));
    }

    #[test]
    fn zoom_is_clamped() {
        let cfg = EditorConfig::default();
        assert_eq!(cfg.clamp_zoom(12.0), 5.0);
        assert_eq!(cfg.clamp_zoom(0.0), 0.1);
        assert_eq!(cfg.clamp_zoom(f64::NAN), 1.0);
    }

    #[test]
    fn swapped_zoom_bounds_do_not_panic() {
        let cfg = EditorConfig {
            min_zoom: 5.0,
            max_zoom: 0.1,
            ..Default::default()
        };
        assert_eq!(cfg.clamp_zoom(1.0), 1.0);
        assert_eq!(cfg.clamp_zoom(9.0), 5.0);
        assert_eq!(cfg.clamp_zoom(0.01), 0.1);
        assert_eq!(cfg.clamp_zoom(f64::NAN), 1.0);
    }
}
