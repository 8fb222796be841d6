//! Headless backend rendering frames into an in-memory pixmap.

use sticker_core::Frame;

use crate::{
    export::{ExportConfig, FrameExporter},
    BackendType, RenderError, RenderResult, RendererConfig,
};

use super::RenderBackend;

/// Renders each frame into an owned [`tiny_skia::Pixmap`].
///
/// Until `resize` is called the surface follows the frame size. After a
/// resize every frame is fitted into `width x height` CSS pixels at the
/// configured pixel ratio.
#[derive(Debug)]
pub struct RasterBackend {
    exporter: FrameExporter,
    pixmap: Option<tiny_skia::Pixmap>,
    width: u32,
    height: u32,
}

impl RasterBackend {
    /// Create a raster backend for the given renderer settings.
    #[must_use]
    pub fn new(config: &RendererConfig) -> Self {
        Self::with_exporter(FrameExporter::new(export_config(config)))
    }

    /// Create a raster backend around an existing exporter.
    #[must_use]
    pub fn with_exporter(exporter: FrameExporter) -> Self {
        Self {
            exporter,
            pixmap: None,
            width: 0,
            height: 0,
        }
    }

    /// The most recently rendered frame, if any.
    #[must_use]
    pub fn pixmap(&self) -> Option<&tiny_skia::Pixmap> {
        self.pixmap.as_ref()
    }

    /// Encode the most recently rendered frame as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] if nothing was rendered yet, or an
    /// export error if encoding fails.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let pixmap = self
            .pixmap
            .as_ref()
            .ok_or_else(|| RenderError::Surface("no frame rendered yet".to_string()))?;
        pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    /// Current surface size in CSS pixels (as last set by `resize`).
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel size of the resized surface, if `resize` was called.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn surface_pixels(&self) -> Option<(u32, u32)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let ratio = f64::from(self.exporter.config().scale.max(f32::EPSILON));
        let px_w = (f64::from(self.width) * ratio).round() as u32;
        let px_h = (f64::from(self.height) * ratio).round() as u32;
        Some((px_w.max(1), px_h.max(1)))
    }
}

impl RenderBackend for RasterBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Raster
    }

    fn render(&mut self, frame: &Frame) -> RenderResult<()> {
        tracing::trace!(
            "Raster render: {} items, canvas {}x{}",
            frame.len(),
            frame.width,
            frame.height
        );
        let pixmap = match self.surface_pixels() {
            Some((px_w, px_h)) => self.exporter.render_to_pixmap_sized(frame, px_w, px_h)?,
            None => self.exporter.render_to_pixmap(frame)?,
        };
        self.pixmap = Some(pixmap);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::Surface(format!(
                "invalid surface size {width}x{height}"
            )));
        }
        self.width = width;
        self.height = height;
        self.pixmap = None;
        tracing::debug!("Raster backend resized to {}x{}", width, height);
        Ok(())
    }
}

fn export_config(config: &RendererConfig) -> ExportConfig {
    ExportConfig {
        scale: config.pixel_ratio,
        background: config.background,
        grid: config.show_grid,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sticker_core::{CanvasConfig, Sticker};

    use super::*;
    use crate::glyph::{GlyphRasterizer, GlyphStyle};

    fn backend(config: &RendererConfig) -> RasterBackend {
        let glyphs = GlyphRasterizer::with_fontdb(
            GlyphStyle::default(),
            Arc::new(usvg::fontdb::Database::new()),
        );
        RasterBackend::with_exporter(FrameExporter::with_rasterizer(
            export_config(config),
            glyphs,
        ))
    }

    #[test]
    fn test_render_fills_pixmap() {
        let mut backend = backend(&RendererConfig::default());
        assert!(backend.pixmap().is_none());
        assert!(backend.encode_png().is_err());

        let stickers = vec![Sticker::new("🎨", 0.0, 0.0, 60.0, 60.0)];
        let frame = Frame::compose(&CanvasConfig::default(), &stickers, None, None);
        backend.render(&frame).expect("render");

        let pixmap = backend.pixmap().expect("pixmap");
        assert_eq!((pixmap.width(), pixmap.height()), (600, 400));
        let png = backend.encode_png().expect("png");
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);
    }

    #[test]
    fn test_live_view_background_is_opaque() {
        let mut backend = backend(&RendererConfig::default());
        backend
            .render(&Frame::empty(&CanvasConfig::default()))
            .expect("render");
        let pixmap = backend.pixmap().expect("pixmap");
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 255));
    }

    #[test]
    fn test_resize() {
        let mut backend = backend(&RendererConfig::default());
        backend.resize(300, 200).expect("resize");
        assert_eq!(backend.size(), (300, 200));
        assert!(backend.resize(0, 10).is_err());
        assert_eq!(backend.size(), (300, 200));
        assert_eq!(backend.backend_type(), BackendType::Raster);
    }

    #[test]
    fn test_render_after_resize_uses_surface_size() {
        let mut backend = backend(&RendererConfig::default());
        backend.resize(300, 200).expect("resize");
        backend
            .render(&Frame::empty(&CanvasConfig::default()))
            .expect("render");

        let pixmap = backend.pixmap().expect("pixmap");
        assert_eq!((pixmap.width(), pixmap.height()), (300, 200));
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 255));
    }

    #[test]
    fn test_resize_applies_pixel_ratio() {
        let config = RendererConfig {
            pixel_ratio: 2.0,
            ..RendererConfig::default()
        };
        let mut backend = backend(&config);
        backend.resize(300, 200).expect("resize");
        backend
            .render(&Frame::empty(&CanvasConfig::default()))
            .expect("render");

        let pixmap = backend.pixmap().expect("pixmap");
        assert_eq!((pixmap.width(), pixmap.height()), (600, 400));
    }

    #[test]
    fn test_frame_is_fitted_into_other_aspect() {
        let mut backend = backend(&RendererConfig::default());
        backend.resize(300, 300).expect("resize");
        backend
            .render(&Frame::empty(&CanvasConfig::default()))
            .expect("render");

        // 600x400 fits as 300x200, centered with 50px bands above and below
        let pixmap = backend.pixmap().expect("pixmap");
        assert_eq!((pixmap.width(), pixmap.height()), (300, 300));
        assert_eq!(pixmap.pixel(150, 10).map(|p| p.alpha()), Some(0));
        assert_eq!(pixmap.pixel(150, 150).map(|p| p.alpha()), Some(255));
        assert_eq!(pixmap.pixel(150, 290).map(|p| p.alpha()), Some(0));
    }
}
