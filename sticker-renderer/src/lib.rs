//! # Sticker Canvas Renderer
//!
//! Draws [`Frame`]s produced by `sticker-core` and exports them as PNG.
//!
//! ## Rendering Backends
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            RenderBackend Trait              │
//! ├──────────────────────┬──────────────────────┤
//! │ Raster (tiny-skia)   │ Canvas2D             │
//! │ headless, export     │ provided by the      │
//! │ feature              │ browser shell        │
//! └──────────────────────┴──────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::float_cmp))]

pub mod backend;
pub mod error;
#[cfg(feature = "export")]
pub mod export;
pub mod glyph;
#[cfg(feature = "export")]
mod svg;

pub use backend::RenderBackend;
pub use error::{RenderError, RenderResult};
#[cfg(feature = "export")]
pub use export::{ExportConfig, ExportedImage, FrameExporter};
pub use glyph::{GlyphCache, GlyphCacheConfig, GlyphCacheStats, GlyphKey, GlyphStyle};

use sticker_core::Frame;

/// Configuration for the renderer.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Preferred backend (will fall back if unavailable).
    pub preferred_backend: BackendType,
    /// Device pixel ratio of the drawing surface.
    pub pixel_ratio: f32,
    /// Background color (RGBA); `None` keeps the surface transparent.
    pub background: Option<[u8; 4]>,
    /// Draw the cosmetic grid overlay.
    pub show_grid: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            preferred_backend: BackendType::Raster,
            pixel_ratio: 1.0,
            background: Some([255, 255, 255, 255]), // White
            show_grid: true,
        }
    }
}

/// Available rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Headless tiny-skia rasterizer.
    Raster,
    /// HTML canvas 2D context (browser shell).
    Canvas2D,
}

/// The main renderer interface.
pub struct Renderer {
    config: RendererConfig,
    backend: Box<dyn RenderBackend>,
    frame_count: u64,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("backend", &self.backend.backend_type())
            .field("frame_count", &self.frame_count)
            .finish()
    }
}

impl Renderer {
    /// Create a new renderer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no suitable backend is available.
    pub fn new(config: RendererConfig) -> RenderResult<Self> {
        let backend = Self::create_backend(&config)?;
        Ok(Self::with_backend(config, backend))
    }

    /// Create a renderer around a backend supplied by the caller.
    #[must_use]
    pub fn with_backend(config: RendererConfig, backend: Box<dyn RenderBackend>) -> Self {
        Self {
            config,
            backend,
            frame_count: 0,
        }
    }

    /// Create the appropriate backend based on config and availability.
    fn create_backend(config: &RendererConfig) -> RenderResult<Box<dyn RenderBackend>> {
        match config.preferred_backend {
            BackendType::Raster => {
                #[cfg(feature = "export")]
                {
                    Ok(Box::new(backend::raster::RasterBackend::new(config)))
                }
                #[cfg(not(feature = "export"))]
                {
                    Err(RenderError::NoBackend(
                        "raster backend requires the `export` feature".to_string(),
                    ))
                }
            }
            BackendType::Canvas2D => Err(RenderError::NoBackend(
                "Canvas2D backend must be supplied by the browser shell".to_string(),
            )),
        }
    }

    /// Render a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render(&mut self, frame: &Frame) -> RenderResult<()> {
        self.backend.render(frame)?;
        self.frame_count += 1;
        Ok(())
    }

    /// Get the current frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the active backend type.
    #[must_use]
    pub fn active_backend(&self) -> BackendType {
        self.backend.backend_type()
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resize fails.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.backend.resize(width, height)
    }
}
