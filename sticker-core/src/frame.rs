//! Render-ready snapshot of the visible canvas.
//!
//! A [`Frame`] is what a backend draws and what an export captures: every
//! sticker in paint order at its displayed position (the live pointer
//! position while dragging) with its hover styling applied.

use serde::{Deserialize, Serialize};

use crate::{CanvasConfig, Sticker, StickerId};

/// An RGBA color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha in `0.0..=1.0`.
    pub a: f32,
}

impl Rgba {
    /// Create a color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgba()` notation.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Drop shadow parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// Shadow color.
    pub color: Rgba,
    /// Blur radius in pixels.
    pub blur: f32,
    /// Horizontal offset in pixels.
    pub offset_x: f32,
    /// Vertical offset in pixels.
    pub offset_y: f32,
}

/// Per-item presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemStyle {
    /// Scale applied about the top-left corner.
    pub scale: f32,
    /// Opacity in `0.0..=1.0`.
    pub opacity: f32,
    /// Drop shadow behind the item.
    pub shadow: Shadow,
}

impl ItemStyle {
    /// Style of an item the pointer is not over.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            scale: 1.0,
            opacity: 1.0,
            shadow: Shadow {
                color: Rgba::new(0, 0, 0, 0.1),
                blur: 5.0,
                offset_x: 2.0,
                offset_y: 2.0,
            },
        }
    }

    /// Style of the hovered item.
    #[must_use]
    pub const fn hovered() -> Self {
        Self {
            scale: 1.1,
            opacity: 0.9,
            shadow: Shadow {
                color: Rgba::new(59, 130, 246, 0.5),
                blur: 10.0,
                offset_x: 0.0,
                offset_y: 0.0,
            },
        }
    }
}

impl Default for ItemStyle {
    fn default() -> Self {
        Self::idle()
    }
}

/// One sticker as it appears on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameItem {
    /// Sticker ID.
    pub id: StickerId,
    /// Symbol to draw.
    pub emoji: String,
    /// Displayed x.
    pub x: f32,
    /// Displayed y.
    pub y: f32,
    /// Unscaled width.
    pub width: f32,
    /// Unscaled height.
    pub height: f32,
    /// Presentation.
    pub style: ItemStyle,
    /// Whether the item is being dragged.
    pub dragging: bool,
}

impl FrameItem {
    /// Width after applying the style scale.
    #[must_use]
    pub fn displayed_width(&self) -> f32 {
        self.width * self.style.scale
    }

    /// Height after applying the style scale.
    #[must_use]
    pub fn displayed_height(&self) -> f32 {
        self.height * self.style.scale
    }
}

/// A sticker held by the pointer, drawn at a position the store does not
/// know about yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPreview {
    /// The dragged sticker.
    pub id: StickerId,
    /// Displayed x.
    pub x: f32,
    /// Displayed y.
    pub y: f32,
}

/// Everything needed to draw the canvas once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
    /// Grid size (for the cosmetic overlay).
    pub grid_size: f32,
    /// Items in paint order.
    pub items: Vec<FrameItem>,
}

impl Frame {
    /// Build a frame from stickers plus transient view state.
    #[must_use]
    pub fn compose(
        config: &CanvasConfig,
        stickers: &[Sticker],
        hovered: Option<StickerId>,
        drag: Option<DragPreview>,
    ) -> Self {
        let items = stickers
            .iter()
            .map(|sticker| {
                let preview = drag.filter(|d| d.id == sticker.id);
                let (x, y) = preview.map_or((sticker.x, sticker.y), |d| (d.x, d.y));
                let style = if hovered == Some(sticker.id) {
                    ItemStyle::hovered()
                } else {
                    ItemStyle::idle()
                };
                FrameItem {
                    id: sticker.id,
                    emoji: sticker.emoji.clone(),
                    x,
                    y,
                    width: sticker.width,
                    height: sticker.height,
                    style,
                    dragging: preview.is_some(),
                }
            })
            .collect();

        Self {
            width: config.width,
            height: config.height,
            grid_size: config.grid_size,
            items,
        }
    }

    /// An empty frame for the given canvas.
    #[must_use]
    pub fn empty(config: &CanvasConfig) -> Self {
        Self::compose(config, &[], None, None)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the frame has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
