//! # Sticker Canvas Core
//!
//! Platform-independent logic for the emoji sticker canvas: the sticker
//! store, grid snapping, the palette and pointer interaction.
//! Compiles to WASM for the browser shell.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              sticker-core                   │
//! ├─────────────────────────────────────────────┤
//! │  Store           │  Interaction             │
//! │  - Stickers      │  - Hover                 │
//! │  - Subscribers   │  - Drag + snap           │
//! │  - Bounds        │  - Double-click delete   │
//! ├─────────────────────────────────────────────┤
//! │  Palette         │  Frame                   │
//! │  - Fixed catalog │  - Render snapshot       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use sticker_core::{CanvasConfig, InteractionController};
//!
//! let mut canvas = InteractionController::new(CanvasConfig::default());
//! let sticker = canvas.select_palette(0).expect("palette has entries");
//! assert_eq!(sticker.emoji, "🎨");
//! assert_eq!(canvas.frame().len(), 1);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::float_cmp))]

pub mod config;
pub mod error;
pub mod event;
pub mod frame;
pub mod interaction;
pub mod palette;
pub mod snap;
pub mod sticker;
pub mod store;

pub use config::{CanvasConfig, CanvasStats};
pub use error::{CanvasError, CanvasResult};
pub use event::{Interaction, PointerEvent, PointerPhase};
pub use frame::{DragPreview, Frame, FrameItem, ItemStyle, Rgba, Shadow};
pub use interaction::{InteractionConfig, InteractionController};
pub use palette::{PaletteEntry, PALETTE};
pub use snap::{snap, snap_default, snap_within, DEFAULT_GRID_SIZE};
pub use sticker::{Sticker, StickerId};
pub use store::{StickerStore, StoreEvent, SubscriptionId};

/// Sticker core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
