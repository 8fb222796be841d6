//! # Sticker Canvas WASM Application
//!
//! WASM bindings for the emoji sticker canvas: the browser page forwards
//! pointer events and button presses here and calls `render()` every
//! animation frame.
//!
//! ## Usage
//!
//! Build for WASM:
//! ```bash
//! wasm-pack build --target web sticker-app
//! ```
//!
//! Then import in JavaScript:
//! ```javascript
//! import init, { StickerApp } from './pkg/sticker_app.js';
//!
//! await init();
//! const app = new StickerApp('sticker-canvas');
//!
//! function render() {
//!     app.render();
//!     requestAnimationFrame(render);
//! }
//! render();
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::float_cmp))]

mod dom;

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use sticker_core::{palette, CanvasConfig, Interaction, InteractionController, StickerId};
use sticker_renderer::{RenderBackend, Renderer, RendererConfig};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlAnchorElement, HtmlCanvasElement};

use crate::dom::{context_2d, DomCanvasBackend, DomRendererState, RendererHandle};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    tracing::info!("Sticker canvas WASM initialized");
}

/// The sticker canvas application for WASM.
#[wasm_bindgen]
pub struct StickerApp {
    canvas: InteractionController,
    renderer_state: RendererHandle,
    renderer: Renderer,
    dirty: Rc<Cell<bool>>,
}

#[wasm_bindgen]
impl StickerApp {
    /// Create an application on the given canvas element with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas element is not found or 2D context fails.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<StickerApp, JsValue> {
        Self::create(canvas_id, CanvasConfig::default())
    }

    /// Create an application from a JSON canvas configuration.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the canvas
    /// cannot be set up.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(canvas_id: &str, config_json: &str) -> Result<StickerApp, JsValue> {
        let config = CanvasConfig::from_json(config_json).map_err(to_js_error)?;
        Self::create(canvas_id, config)
    }

    fn create(canvas_id: &str, config: CanvasConfig) -> Result<StickerApp, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document object"))?;

        let canvas_el = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("Canvas element '{canvas_id}' not found")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("Element is not a canvas"))?;
        let ctx = context_2d(&canvas_el)?;

        let pixel_ratio = window.device_pixel_ratio().max(1.0);
        let renderer_state = Rc::new(RefCell::new(DomRendererState::new(
            document,
            canvas_el,
            ctx,
            pixel_ratio,
        )));

        let backend: Box<dyn RenderBackend> =
            Box::new(DomCanvasBackend::new(Rc::clone(&renderer_state)));
        #[allow(clippy::cast_possible_truncation)]
        let renderer_config = RendererConfig {
            preferred_backend: backend.backend_type(),
            pixel_ratio: pixel_ratio as f32,
            ..RendererConfig::default()
        };
        let mut renderer = Renderer::with_backend(renderer_config, backend);
        let (width, height) = surface_size(&config);
        if let Err(err) = renderer.resize(width, height) {
            tracing::warn!("Renderer resize failed: {:?}", err);
        }

        let mut canvas = InteractionController::new(config);
        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        canvas.subscribe(move |_, _| flag.set(true));

        Ok(Self {
            canvas,
            renderer_state,
            renderer,
            dirty,
        })
    }

    /// Redraw the canvas if anything changed since the last frame.
    ///
    /// Returns whether a frame was drawn.
    pub fn render(&mut self) -> bool {
        if !self.dirty.get() {
            return false;
        }
        self.draw()
    }

    /// Redraw the canvas unconditionally.
    #[wasm_bindgen(js_name = forceRender)]
    pub fn force_render(&mut self) -> bool {
        self.draw()
    }

    fn draw(&mut self) -> bool {
        match self.renderer.render(&self.canvas.frame()) {
            Ok(()) => {
                self.dirty.set(false);
                true
            }
            Err(err) => {
                tracing::error!("Renderer error: {:?}", err);
                false
            }
        }
    }

    /// Pointer pressed at canvas coordinates. Returns the interaction as JSON.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f32, y: f32) -> String {
        let interaction = self.canvas.pointer_down(x, y);
        self.apply(&interaction)
    }

    /// Pointer moved. Returns the interaction as JSON.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) -> String {
        let interaction = self.canvas.pointer_move(x, y);
        self.apply(&interaction)
    }

    /// Pointer released at `time_ms` (any monotonic clock, e.g.
    /// `event.timeStamp`). Returns the interaction as JSON.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f32, y: f32, time_ms: f64) -> String {
        let interaction = self.canvas.pointer_up(x, y, timestamp_ms(time_ms));
        self.apply(&interaction)
    }

    /// Pointer left the canvas. Returns the interaction as JSON.
    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) -> String {
        let interaction = self.canvas.pointer_leave();
        self.apply(&interaction)
    }

    /// Add a sticker with the given symbol. Returns its ID.
    #[wasm_bindgen(js_name = addSticker)]
    pub fn add_sticker(&mut self, symbol: &str) -> String {
        self.canvas.add_sticker(symbol).id.to_string()
    }

    /// Add the palette entry at `index`. Returns the new sticker's ID.
    #[wasm_bindgen(js_name = selectPalette)]
    pub fn select_palette(&mut self, index: usize) -> Option<String> {
        self.canvas
            .select_palette(index)
            .map(|sticker| sticker.id.to_string())
    }

    /// Delete a sticker. Unknown IDs are ignored (returns `false`).
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not a valid sticker ID.
    #[wasm_bindgen(js_name = removeSticker)]
    pub fn remove_sticker(&mut self, id: &str) -> Result<bool, JsValue> {
        let id: StickerId = id.parse().map_err(to_js_error)?;
        Ok(self.canvas.remove(id))
    }

    /// Remove every sticker. Returns `false` when the canvas was already empty.
    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&mut self) -> bool {
        self.canvas.clear_all()
    }

    /// Whether the clear-all button should be enabled.
    #[wasm_bindgen(js_name = canClear)]
    #[must_use]
    pub fn can_clear(&self) -> bool {
        self.canvas.can_clear()
    }

    /// Number of stickers on the canvas.
    #[wasm_bindgen(js_name = stickerCount)]
    #[must_use]
    pub fn sticker_count(&self) -> usize {
        self.canvas.store().len()
    }

    /// Number of frames drawn.
    #[wasm_bindgen(js_name = frameCount)]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.renderer.frame_count()
    }

    /// The palette as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = paletteJson)]
    #[allow(clippy::unused_self)]
    pub fn palette_json(&self) -> Result<String, JsValue> {
        palette::to_json().map_err(to_js_error)
    }

    /// The stickers (in paint order) as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = stickersJson)]
    pub fn stickers_json(&self) -> Result<String, JsValue> {
        self.canvas.store().to_json().map_err(to_js_error)
    }

    /// The stats panel figures as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = statsJson)]
    pub fn stats_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.canvas.store().stats())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Export the canvas as a PNG download.
    ///
    /// Returns the file name, or `undefined` if the export was skipped.
    #[wasm_bindgen(js_name = exportImage)]
    pub fn export_image(&self) -> Option<String> {
        match self.try_export() {
            Ok(file_name) => {
                tracing::info!("Exported canvas as {file_name}");
                Some(file_name)
            }
            Err(err) => {
                tracing::warn!("Export skipped: {:?}", err);
                None
            }
        }
    }

    fn try_export(&self) -> Result<String, JsValue> {
        let config = self.canvas.canvas_config();
        let file_name = config.export_file_name(timestamp_ms(js_sys::Date::now()));
        let pixel_ratio = f64::from(config.export_pixel_ratio);
        let frame = self.canvas.frame();

        let mut state = self
            .renderer_state
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("canvas state is busy"))?;
        let data_url = state.export_data_url(&frame, pixel_ratio)?;

        let document = state.document();
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("No document body"))?;
        let anchor = document
            .create_element("a")?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| JsValue::from_str("Failed to create download link"))?;
        anchor.set_href(&data_url);
        anchor.set_download(&file_name);

        // Attached only for the click
        body.append_child(&anchor)?;
        anchor.click();
        body.remove_child(&anchor)?;

        Ok(file_name)
    }

    fn apply(&mut self, interaction: &Interaction) -> String {
        if interaction.needs_redraw() {
            self.dirty.set(true);
        }
        interaction_json(interaction)
    }
}

/// Surface size in whole CSS pixels.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn surface_size(config: &CanvasConfig) -> (u32, u32) {
    (
        config.width.round().max(1.0) as u32,
        config.height.round().max(1.0) as u32,
    )
}

/// Browser timestamps are fractional milliseconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn timestamp_ms(time_ms: f64) -> u64 {
    if time_ms.is_finite() {
        time_ms.max(0.0) as u64
    } else {
        0
    }
}

fn interaction_json(interaction: &Interaction) -> String {
    serde_json::to_string(interaction).unwrap_or_else(|_| "{\"type\":\"none\"}".to_string())
}

fn to_js_error(err: sticker_core::CanvasError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
