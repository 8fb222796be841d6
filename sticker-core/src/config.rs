//! Canvas configuration.

use serde::{Deserialize, Serialize};

use crate::{snap::DEFAULT_GRID_SIZE, CanvasError, CanvasResult};

/// Default canvas width in pixels.
pub const DEFAULT_CANVAS_WIDTH: f32 = 600.0;

/// Default canvas height in pixels.
pub const DEFAULT_CANVAS_HEIGHT: f32 = 400.0;

/// Default sticker edge length in pixels.
pub const DEFAULT_STICKER_SIZE: f32 = 60.0;

/// Oversampling factor used for image export.
pub const DEFAULT_EXPORT_PIXEL_RATIO: f32 = 2.0;

/// Name used as the export file name prefix.
pub const DEFAULT_APP_NAME: &str = "myera-sticker-canvas";

/// Configuration for a sticker canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
    /// Width of newly created stickers.
    pub sticker_width: f32,
    /// Height of newly created stickers.
    pub sticker_height: f32,
    /// Grid size used for snapping.
    pub grid_size: f32,
    /// Oversampling factor for exported images.
    pub export_pixel_ratio: f32,
    /// Application name, used as the export file name prefix.
    pub app_name: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            sticker_width: DEFAULT_STICKER_SIZE,
            sticker_height: DEFAULT_STICKER_SIZE,
            grid_size: DEFAULT_GRID_SIZE,
            export_pixel_ratio: DEFAULT_EXPORT_PIXEL_RATIO,
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }
}

impl CanvasConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result fails
    /// [`CanvasConfig::validate`].
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration describes a usable canvas.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidConfig`] if any dimension is not a
    /// positive finite number or a sticker does not fit on the canvas.
    pub fn validate(&self) -> CanvasResult<()> {
        let dimensions = [
            ("width", self.width),
            ("height", self.height),
            ("sticker_width", self.sticker_width),
            ("sticker_height", self.sticker_height),
            ("grid_size", self.grid_size),
            ("export_pixel_ratio", self.export_pixel_ratio),
        ];
        for (name, value) in dimensions {
            if !value.is_finite() || value <= 0.0 {
                return Err(CanvasError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        if self.sticker_width > self.width || self.sticker_height > self.height {
            return Err(CanvasError::InvalidConfig(format!(
                "sticker {}x{} does not fit on a {}x{} canvas",
                self.sticker_width, self.sticker_height, self.width, self.height
            )));
        }

        if self.app_name.trim().is_empty() {
            return Err(CanvasError::InvalidConfig(
                "app_name must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Largest valid x for a sticker of the configured width.
    #[must_use]
    pub fn max_x(&self) -> f32 {
        (self.width - self.sticker_width).max(0.0)
    }

    /// Largest valid y for a sticker of the configured height.
    #[must_use]
    pub fn max_y(&self) -> f32 {
        (self.height - self.sticker_height).max(0.0)
    }

    /// File name for an export taken at `timestamp_ms` (milliseconds since
    /// the Unix epoch), e.g. `myera-sticker-canvas-1700000000000.png`.
    #[must_use]
    pub fn export_file_name(&self, timestamp_ms: u64) -> String {
        format!("{}-{timestamp_ms}.png", self.app_name)
    }
}

/// Read-only figures shown next to the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasStats {
    /// Number of stickers currently on the canvas.
    pub active_stickers: usize,
    /// Canvas width in pixels.
    pub canvas_width: f32,
    /// Canvas height in pixels.
    pub canvas_height: f32,
    /// Snap grid size in pixels.
    pub grid_size: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_canvas() {
        let config = CanvasConfig::default();
        assert!((config.width - 600.0).abs() < f32::EPSILON);
        assert!((config.height - 400.0).abs() < f32::EPSILON);
        assert!((config.max_x() - 540.0).abs() < f32::EPSILON);
        assert!((config.max_y() - 340.0).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = CanvasConfig::from_json(r#"{"width": 800.0}"#).expect("valid config");
        assert!((config.width - 800.0).abs() < f32::EPSILON);
        assert!((config.height - 400.0).abs() < f32::EPSILON);
        assert_eq!(config.app_name, DEFAULT_APP_NAME);
    }

    #[test]
    fn test_rejects_sticker_larger_than_canvas() {
        let config = CanvasConfig {
            width: 50.0,
            ..CanvasConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CanvasError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive_grid() {
        let result = CanvasConfig::from_json(r#"{"grid_size": 0.0}"#);
        assert!(matches!(result, Err(CanvasError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let result = CanvasConfig::from_json("{ nope }");
        assert!(matches!(result, Err(CanvasError::Serialization(_))));
    }

    #[test]
    fn test_export_file_name_uses_app_name_and_timestamp() {
        let config = CanvasConfig::default();
        assert_eq!(
            config.export_file_name(1_700_000_000_000),
            "myera-sticker-canvas-1700000000000.png"
        );
    }
}
