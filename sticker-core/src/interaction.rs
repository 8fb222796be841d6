//! Pointer interaction and view state.
//!
//! [`InteractionController`] owns the [`StickerStore`] together with the
//! transient view state the store knows nothing about: which sticker is
//! hovered, which one is held by the pointer and where it currently is, and
//! the last click (for double-activation).

use crate::{
    frame::DragPreview, palette, snap::snap, CanvasConfig, Frame, Interaction, PointerEvent,
    PointerPhase, Sticker, StickerId, StickerStore, StoreEvent, SubscriptionId,
};

/// Default double-click window in milliseconds.
pub const DEFAULT_DOUBLE_CLICK_MS: u64 = 400;

/// Interaction tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionConfig {
    /// Maximum time between two clicks on the same sticker that deletes it.
    pub double_click_ms: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            double_click_ms: DEFAULT_DOUBLE_CLICK_MS,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    id: StickerId,
    grab_dx: f32,
    grab_dy: f32,
    x: f32,
    y: f32,
    moved: bool,
}

#[derive(Debug, Clone, Copy)]
struct LastClick {
    id: StickerId,
    timestamp_ms: u64,
}

/// Interprets pointer input against a sticker store.
#[derive(Debug)]
pub struct InteractionController {
    store: StickerStore,
    config: InteractionConfig,
    hovered: Option<StickerId>,
    drag: Option<DragState>,
    last_click: Option<LastClick>,
}

impl InteractionController {
    /// Create a controller with an empty store for the given canvas.
    #[must_use]
    pub fn new(canvas: CanvasConfig) -> Self {
        Self::with_store(StickerStore::new(canvas), InteractionConfig::default())
    }

    /// Create a controller around an existing store.
    #[must_use]
    pub fn with_store(store: StickerStore, config: InteractionConfig) -> Self {
        Self {
            store,
            config,
            hovered: None,
            drag: None,
            last_click: None,
        }
    }

    /// Read access to the store.
    #[must_use]
    pub fn store(&self) -> &StickerStore {
        &self.store
    }

    /// Canvas configuration.
    #[must_use]
    pub fn canvas_config(&self) -> &CanvasConfig {
        self.store.config()
    }

    /// Subscribe to store changes.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent, &[Sticker]) + 'static,
    {
        self.store.subscribe(callback)
    }

    /// Currently hovered sticker.
    #[must_use]
    pub fn hovered(&self) -> Option<StickerId> {
        self.hovered
    }

    /// Sticker currently held by the pointer.
    #[must_use]
    pub fn dragging(&self) -> Option<StickerId> {
        self.drag.map(|d| d.id)
    }

    /// Dispatch a pointer event.
    pub fn handle(&mut self, event: &PointerEvent) -> Interaction {
        match event.phase {
            PointerPhase::Down => self.pointer_down(event.x, event.y),
            PointerPhase::Move => self.pointer_move(event.x, event.y),
            PointerPhase::Up => self.pointer_up(event.x, event.y, event.timestamp_ms),
            PointerPhase::Leave => self.pointer_leave(),
        }
    }

    /// Grab the topmost sticker under the pointer.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> Interaction {
        let Some(sticker) = self.store.sticker_at(x, y) else {
            return Interaction::None;
        };

        let id = sticker.id;
        self.drag = Some(DragState {
            id,
            grab_dx: x - sticker.x,
            grab_dy: y - sticker.y,
            x: sticker.x,
            y: sticker.y,
            moved: false,
        });
        tracing::trace!("Grabbed sticker {id}");
        Interaction::DragStarted { id }
    }

    /// Move the held sticker freely, or update hover when nothing is held.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Interaction {
        if let Some(drag) = self.drag.as_mut() {
            let next_x = x - drag.grab_dx;
            let next_y = y - drag.grab_dy;
            if next_x == drag.x && next_y == drag.y {
                return Interaction::None;
            }
            drag.x = next_x;
            drag.y = next_y;
            drag.moved = true;
            return Interaction::Dragging {
                id: drag.id,
                x: next_x,
                y: next_y,
            };
        }

        let hovered = self.store.sticker_at(x, y).map(|s| s.id);
        self.set_hovered(hovered)
    }

    /// Release the pointer.
    ///
    /// After movement the sticker settles on the grid (snapped here, clamped
    /// by the store). Without movement this is a click; a second click on
    /// the same sticker inside the double-click window deletes it.
    pub fn pointer_up(&mut self, x: f32, y: f32, timestamp_ms: u64) -> Interaction {
        let Some(mut drag) = self.drag.take() else {
            return Interaction::None;
        };

        let release_x = x - drag.grab_dx;
        let release_y = y - drag.grab_dy;
        if release_x != drag.x || release_y != drag.y {
            drag.x = release_x;
            drag.y = release_y;
            drag.moved = true;
        }

        if drag.moved {
            self.last_click = None;
            let grid = self.store.config().grid_size;
            self.store
                .update_position(drag.id, snap(drag.x, grid), snap(drag.y, grid));
            return match self.store.get(drag.id) {
                Some(sticker) => Interaction::Dropped {
                    id: drag.id,
                    x: sticker.x,
                    y: sticker.y,
                },
                None => Interaction::None,
            };
        }

        self.click(drag.id, timestamp_ms)
    }

    /// The pointer left the canvas: hover resets, a held sticker stays held.
    pub fn pointer_leave(&mut self) -> Interaction {
        self.set_hovered(None)
    }

    /// Add a sticker with the given symbol.
    pub fn add_sticker(&mut self, emoji: &str) -> Sticker {
        self.store.add(emoji)
    }

    /// Add the palette entry at `index`.
    pub fn select_palette(&mut self, index: usize) -> Option<Sticker> {
        let entry = palette::get(index)?;
        Some(self.store.add(entry.emoji))
    }

    /// Delete a sticker. Unknown IDs are ignored.
    pub fn remove(&mut self, id: StickerId) -> bool {
        let removed = self.store.remove(id).is_some();
        if removed {
            self.forget(id);
        }
        removed
    }

    /// Whether the clear-all control is enabled.
    #[must_use]
    pub fn can_clear(&self) -> bool {
        !self.store.is_empty()
    }

    /// Remove every sticker. Does nothing (and notifies nobody) when the
    /// canvas is already empty.
    pub fn clear_all(&mut self) -> bool {
        if !self.can_clear() {
            return false;
        }
        self.store.clear();
        self.hovered = None;
        self.drag = None;
        self.last_click = None;
        true
    }

    /// Snapshot of what is on screen right now.
    #[must_use]
    pub fn frame(&self) -> Frame {
        let preview = self.drag.map(|d| DragPreview {
            id: d.id,
            x: d.x,
            y: d.y,
        });
        Frame::compose(
            self.store.config(),
            self.store.stickers(),
            self.hovered,
            preview,
        )
    }

    fn click(&mut self, id: StickerId, timestamp_ms: u64) -> Interaction {
        let is_double = self.last_click.is_some_and(|last| {
            last.id == id
                && timestamp_ms.saturating_sub(last.timestamp_ms) <= self.config.double_click_ms
        });

        if is_double {
            self.last_click = None;
            self.remove(id);
            tracing::debug!("Double-activation deleted sticker {id}");
            return Interaction::Deleted { id };
        }

        self.last_click = Some(LastClick { id, timestamp_ms });
        Interaction::Clicked { id }
    }

    fn set_hovered(&mut self, hovered: Option<StickerId>) -> Interaction {
        if self.hovered == hovered {
            return Interaction::None;
        }
        self.hovered = hovered;
        Interaction::HoverChanged { hovered }
    }

    fn forget(&mut self, id: StickerId) {
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        if self.drag.is_some_and(|d| d.id == id) {
            self.drag = None;
        }
        if self.last_click.is_some_and(|c| c.id == id) {
            self.last_click = None;
        }
    }
}
