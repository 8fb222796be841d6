//! Rendering backend implementations.

#[cfg(feature = "export")]
pub mod raster;

use sticker_core::Frame;

use crate::{BackendType, RenderResult};

/// Trait for rendering backends.
///
/// The browser shell provides its own implementation drawing onto an HTML
/// canvas; [`raster::RasterBackend`] renders headlessly.
pub trait RenderBackend {
    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// Render a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, frame: &Frame) -> RenderResult<()>;

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resizing fails.
    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()>;
}
