//! Frame export to PNG.
//!
//! Renders a [`Frame`] to an SVG intermediate representation (each sticker
//! an `<image>` of its cached glyph) and rasterizes it with resvg/tiny-skia.
//! The default export is oversampled 2x with a transparent background.

use std::fmt::Write;

use sticker_core::{CanvasConfig, Frame, FrameItem};

use crate::{
    error::{RenderError, RenderResult},
    glyph::{GlyphCache, GlyphKey, GlyphRasterizer, GlyphStyle},
    svg::write_shadow_filter,
};

/// Grid line color of the live view overlay.
const GRID_STROKE: &str = "#e5e7eb";

/// Configuration for frame export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Oversampling factor (2.0 doubles both dimensions).
    pub scale: f32,
    /// Background color as RGBA bytes; `None` leaves it transparent.
    pub background: Option<[u8; 4]>,
    /// Draw the cosmetic grid overlay.
    pub grid: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: None,
            grid: false,
        }
    }
}

impl ExportConfig {
    /// Export settings matching a canvas configuration.
    #[must_use]
    pub fn for_canvas(config: &CanvasConfig) -> Self {
        Self {
            scale: config.export_pixel_ratio,
            ..Self::default()
        }
    }
}

/// An encoded export plus its suggested file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    /// Suggested download name, `<app-name>-<timestamp-ms>.png`.
    pub file_name: String,
    /// PNG bytes.
    pub bytes: Vec<u8>,
}

/// Exports a [`Frame`] as an image.
#[derive(Debug)]
pub struct FrameExporter {
    config: ExportConfig,
    glyphs: GlyphRasterizer,
    cache: GlyphCache<String>,
}

impl FrameExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self::with_rasterizer(config, GlyphRasterizer::new(GlyphStyle::default()))
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Create an exporter around an existing glyph rasterizer.
    #[must_use]
    pub fn with_rasterizer(config: ExportConfig, glyphs: GlyphRasterizer) -> Self {
        Self {
            config,
            glyphs,
            cache: GlyphCache::new(),
        }
    }

    /// The export configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Change the export configuration. Cached glyphs stay valid.
    pub fn set_config(&mut self, config: ExportConfig) {
        self.config = config;
    }

    /// Glyph images cached so far.
    #[must_use]
    pub fn glyph_cache(&self) -> &GlyphCache<String> {
        &self.cache
    }

    /// Render the frame and wrap it with a timestamped file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be rendered or encoded.
    pub fn export(
        &mut self,
        frame: &Frame,
        canvas: &CanvasConfig,
        timestamp_ms: u64,
    ) -> RenderResult<ExportedImage> {
        let bytes = self.render_to_png(frame)?;
        let file_name = canvas.export_file_name(timestamp_ms);
        tracing::debug!(
            "Exported {} stickers to {file_name} ({} bytes)",
            frame.len(),
            bytes.len()
        );
        Ok(ExportedImage { file_name, bytes })
    }

    /// Export the frame to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_png(&mut self, frame: &Frame) -> RenderResult<Vec<u8>> {
        self.render_to_pixmap(frame)?
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    /// Rasterize the frame.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render_to_pixmap(&mut self, frame: &Frame) -> RenderResult<tiny_skia::Pixmap> {
        let (px_w, px_h) = self.output_dimensions(frame);
        self.render_to_pixmap_sized(frame, px_w, px_h)
    }

    /// Rasterize the frame onto a `px_w` x `px_h` pixmap.
    ///
    /// The frame is scaled uniformly to fit and centered; the uncovered
    /// margin stays transparent.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or rendering fails.
    pub fn render_to_pixmap_sized(
        &mut self,
        frame: &Frame,
        px_w: u32,
        px_h: u32,
    ) -> RenderResult<tiny_skia::Pixmap> {
        let svg = self.svg_document(frame, px_w, px_h)?;
        let tree = usvg::Tree::from_str(&svg, &self.glyphs.usvg_options())
            .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

        let mut pixmap = tiny_skia::Pixmap::new(px_w, px_h)
            .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
        Ok(pixmap)
    }

    /// Export the frame to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns an error if a sticker glyph cannot be rasterized.
    pub fn render_to_svg(&mut self, frame: &Frame) -> RenderResult<String> {
        let (out_w, out_h) = self.output_dimensions(frame);
        self.svg_document(frame, out_w, out_h)
    }

    fn svg_document(&mut self, frame: &Frame, out_w: u32, out_h: u32) -> RenderResult<String> {
        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {} {}\">",
            frame.width, frame.height,
        );

        svg.push_str("<defs>");
        for (idx, item) in frame.items.iter().enumerate() {
            write_shadow_filter(&mut svg, &format!("shadow-{idx}"), &item.style.shadow);
        }
        if self.config.grid {
            write_grid_pattern(&mut svg, frame.grid_size);
        }
        svg.push_str("</defs>");

        if let Some(bg) = self.config.background {
            let alpha = f32::from(bg[3]) / 255.0;
            let _ = write!(
                svg,
                "<rect width=\"{}\" height=\"{}\" fill=\"rgb({},{},{})\" fill-opacity=\"{alpha}\"/>",
                frame.width, frame.height, bg[0], bg[1], bg[2],
            );
        }
        if self.config.grid {
            let _ = write!(
                svg,
                "<rect width=\"{}\" height=\"{}\" fill=\"url(#grid)\" opacity=\"0.2\"/>",
                frame.width, frame.height,
            );
        }

        for (idx, item) in frame.items.iter().enumerate() {
            self.render_item_svg(&mut svg, idx, item)?;
        }

        svg.push_str("</svg>");
        Ok(svg)
    }

    fn render_item_svg(&mut self, svg: &mut String, idx: usize, item: &FrameItem) -> RenderResult<()> {
        let key = GlyphKey::new(&item.emoji, item.width, item.height, self.config.scale);
        let glyphs = &self.glyphs;
        let href = self
            .cache
            .get_or_try_insert_with(&key, |key| glyphs.data_uri(key))?;

        let _ = write!(
            svg,
            "<g opacity=\"{}\" filter=\"url(#shadow-{idx})\"><image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" href=\"{href}\"/></g>",
            item.style.opacity,
            item.x,
            item.y,
            item.displayed_width(),
            item.displayed_height(),
        );
        Ok(())
    }

    /// Output dimensions (width, height) in pixels.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn output_dimensions(&self, frame: &Frame) -> (u32, u32) {
        let scale = self.config.scale.max(f32::EPSILON);
        let out_w = (frame.width.max(1.0) * scale).round() as u32;
        let out_h = (frame.height.max(1.0) * scale).round() as u32;
        (out_w.max(1), out_h.max(1))
    }
}

fn write_grid_pattern(svg: &mut String, grid: f32) {
    let _ = write!(
        svg,
        "<pattern id=\"grid\" width=\"{grid}\" height=\"{grid}\" patternUnits=\"userSpaceOnUse\">\
         <path d=\"M {grid} 0 L 0 0 0 {grid}\" fill=\"none\" stroke=\"{GRID_STROKE}\" stroke-width=\"0.5\"/></pattern>",
    );
}
