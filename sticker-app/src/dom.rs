//! HTML canvas backend.
//!
//! Draws frames with the 2D context of an `HtmlCanvasElement`. Sticker
//! glyphs are pre-rendered onto small offscreen canvases and kept in a
//! [`GlyphCache`], so a frame is a handful of `drawImage` calls.

use std::{cell::RefCell, rc::Rc};

use sticker_core::{Frame, FrameItem, Shadow};
use sticker_renderer::{
    BackendType, GlyphCache, GlyphKey, GlyphStyle, RenderBackend, RenderError, RenderResult,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

/// Live view background.
const BACKGROUND: &str = "#ffffff";

/// Grid line color of the live view overlay.
const GRID_STROKE: &str = "#e5e7eb";

pub(crate) type RendererHandle = Rc<RefCell<DomRendererState>>;

/// How a frame is drawn onto a particular surface.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DrawOptions<'a> {
    pub pixel_ratio: f64,
    pub background: Option<&'a str>,
    pub grid: bool,
}

/// State shared between the app and its canvas backend.
pub(crate) struct DomRendererState {
    document: Document,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pixel_ratio: f64,
    glyph_style: GlyphStyle,
    glyphs: GlyphCache<HtmlCanvasElement>,
}

impl DomRendererState {
    pub(crate) fn new(
        document: Document,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        pixel_ratio: f64,
    ) -> Self {
        Self {
            document,
            canvas,
            ctx,
            pixel_ratio,
            glyph_style: GlyphStyle::default(),
            glyphs: GlyphCache::new(),
        }
    }

    /// Size the backing store for the device pixel ratio, keeping the CSS size.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        let ratio = self.pixel_ratio;
        self.canvas
            .set_width((f64::from(width) * ratio).round() as u32);
        self.canvas
            .set_height((f64::from(height) * ratio).round() as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));
    }

    fn render_frame(&mut self, frame: &Frame) -> Result<(), JsValue> {
        let options = DrawOptions {
            pixel_ratio: self.pixel_ratio,
            background: Some(BACKGROUND),
            grid: true,
        };
        let ctx = self.ctx.clone();
        self.draw_frame(&ctx, frame, options)
    }

    /// Draw `frame` onto a fresh offscreen canvas and encode it as a PNG data URL.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn export_data_url(&mut self, frame: &Frame, pixel_ratio: f64) -> Result<String, JsValue> {
        let canvas = create_canvas(&self.document)?;
        canvas.set_width((f64::from(frame.width) * pixel_ratio).round() as u32);
        canvas.set_height((f64::from(frame.height) * pixel_ratio).round() as u32);
        let ctx = context_2d(&canvas)?;

        let options = DrawOptions {
            pixel_ratio,
            background: None,
            grid: false,
        };
        self.draw_frame(&ctx, frame, options)?;
        canvas.to_data_url_with_type("image/png")
    }

    /// The document, for building download links.
    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    fn draw_frame(
        &mut self,
        ctx: &CanvasRenderingContext2d,
        frame: &Frame,
        options: DrawOptions<'_>,
    ) -> Result<(), JsValue> {
        let ratio = options.pixel_ratio;
        let (w, h) = (f64::from(frame.width), f64::from(frame.height));

        ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0)?;
        ctx.clear_rect(0.0, 0.0, w, h);
        if let Some(background) = options.background {
            ctx.set_fill_style_str(background);
            ctx.fill_rect(0.0, 0.0, w, h);
        }
        if options.grid {
            draw_grid(ctx, w, h, f64::from(frame.grid_size));
        }

        #[allow(clippy::cast_possible_truncation)]
        let glyph_ratio = ratio as f32;
        for item in &frame.items {
            let key = GlyphKey::new(&item.emoji, item.width, item.height, glyph_ratio);
            let document = &self.document;
            let style = &self.glyph_style;
            let glyph = self
                .glyphs
                .get_or_try_insert_with(&key, |key| render_glyph(document, style, key))?;
            draw_item(ctx, item, glyph, ratio)?;
        }
        Ok(())
    }
}

/// [`RenderBackend`] over the shared DOM state.
pub(crate) struct DomCanvasBackend {
    state: RendererHandle,
}

impl DomCanvasBackend {
    pub(crate) fn new(state: RendererHandle) -> Self {
        Self { state }
    }
}

impl RenderBackend for DomCanvasBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Canvas2D
    }

    fn render(&mut self, frame: &Frame) -> RenderResult<()> {
        let mut state = self
            .state
            .try_borrow_mut()
            .map_err(|_| RenderError::Surface("canvas state is busy".to_string()))?;
        state
            .render_frame(frame)
            .map_err(|e| RenderError::Surface(format!("{e:?}")))
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.resize(width, height);
        }
        Ok(())
    }
}

pub(crate) fn create_canvas(document: &Document) -> Result<HtmlCanvasElement, JsValue> {
    document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("Element is not a canvas"))
}

pub(crate) fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("Failed to cast to 2D context"))
}

/// Rasterize one glyph onto its own canvas.
#[allow(clippy::cast_possible_truncation)]
fn render_glyph(
    document: &Document,
    style: &GlyphStyle,
    key: &GlyphKey,
) -> Result<HtmlCanvasElement, JsValue> {
    let canvas = create_canvas(document)?;
    let (px_w, px_h) = key.pixel_size();
    canvas.set_width(px_w);
    canvas.set_height(px_h);

    let ctx = context_2d(&canvas)?;
    let ratio = f64::from(key.pixel_ratio());
    let (w, h) = (f64::from(key.width), f64::from(key.height));

    ctx.scale(ratio, ratio)?;
    ctx.set_font(&style.css_font(w as f32));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    apply_shadow(&ctx, &style.shadow, ratio);
    ctx.fill_text(&key.symbol, w / 2.0, h / 2.0)?;

    tracing::trace!("Rendered glyph '{}' at {}x", key.symbol, key.pixel_ratio());
    Ok(canvas)
}

fn draw_item(
    ctx: &CanvasRenderingContext2d,
    item: &FrameItem,
    glyph: &HtmlCanvasElement,
    ratio: f64,
) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_global_alpha(f64::from(item.style.opacity));
    apply_shadow(ctx, &item.style.shadow, ratio);
    let result = ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
        glyph,
        f64::from(item.x),
        f64::from(item.y),
        f64::from(item.displayed_width()),
        f64::from(item.displayed_height()),
    );
    ctx.restore();
    result
}

/// Shadow parameters are in device pixels and ignore the context transform.
fn apply_shadow(ctx: &CanvasRenderingContext2d, shadow: &Shadow, ratio: f64) {
    ctx.set_shadow_color(&shadow.color.to_css());
    ctx.set_shadow_blur(f64::from(shadow.blur) * ratio);
    ctx.set_shadow_offset_x(f64::from(shadow.offset_x) * ratio);
    ctx.set_shadow_offset_y(f64::from(shadow.offset_y) * ratio);
}

fn draw_grid(ctx: &CanvasRenderingContext2d, width: f64, height: f64, grid: f64) {
    if grid <= 0.0 {
        return;
    }
    ctx.save();
    ctx.set_global_alpha(0.2);
    ctx.set_stroke_style_str(GRID_STROKE);
    ctx.set_line_width(0.5);
    ctx.begin_path();
    for x in grid_lines(width, grid) {
        ctx.move_to(x, 0.0);
        ctx.line_to(x, height);
    }
    for y in grid_lines(height, grid) {
        ctx.move_to(0.0, y);
        ctx.line_to(width, y);
    }
    ctx.stroke();
    ctx.restore();
}

/// Positions of grid lines across `extent`.
pub(crate) fn grid_lines(extent: f64, grid: f64) -> impl Iterator<Item = f64> {
    let step = if grid > 0.0 { grid } else { extent.max(1.0) };
    (0..)
        .map(move |i| f64::from(i) * step)
        .take_while(move |pos| *pos <= extent)
}
