//! Pointer input for canvas interaction.

use serde::{Deserialize, Serialize};

use crate::StickerId;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed / finger down.
    Down,
    /// Pointer moved (pressed or not).
    Move,
    /// Button released / finger up.
    Up,
    /// Pointer left the canvas.
    Leave,
}

/// A pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// X position in canvas coordinates.
    pub x: f32,
    /// Y position in canvas coordinates.
    pub y: f32,
    /// Timestamp in milliseconds (any monotonic origin).
    pub timestamp_ms: u64,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub fn new(phase: PointerPhase, x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self {
            phase,
            x,
            y,
            timestamp_ms,
        }
    }

    /// Pointer pressed.
    #[must_use]
    pub fn down(x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::new(PointerPhase::Down, x, y, timestamp_ms)
    }

    /// Pointer moved.
    #[must_use]
    pub fn moved(x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::new(PointerPhase::Move, x, y, timestamp_ms)
    }

    /// Pointer released.
    #[must_use]
    pub fn up(x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::new(PointerPhase::Up, x, y, timestamp_ms)
    }

    /// Pointer left the canvas.
    #[must_use]
    pub fn leave(timestamp_ms: u64) -> Self {
        Self::new(PointerPhase::Leave, 0.0, 0.0, timestamp_ms)
    }
}

/// What a pointer event did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Interaction {
    /// Nothing changed.
    None,
    /// The hovered sticker changed (cosmetic only).
    HoverChanged {
        /// Newly hovered sticker, if any.
        hovered: Option<StickerId>,
    },
    /// A sticker was grabbed.
    DragStarted {
        /// The grabbed sticker.
        id: StickerId,
    },
    /// The grabbed sticker followed the pointer.
    Dragging {
        /// The dragged sticker.
        id: StickerId,
        /// Displayed x (unsnapped).
        x: f32,
        /// Displayed y (unsnapped).
        y: f32,
    },
    /// A drag ended and the sticker settled on the grid.
    Dropped {
        /// The dropped sticker.
        id: StickerId,
        /// Stored x after snapping and clamping.
        x: f32,
        /// Stored y after snapping and clamping.
        y: f32,
    },
    /// A press/release on a sticker without movement.
    Clicked {
        /// The clicked sticker.
        id: StickerId,
    },
    /// A double-activation deleted a sticker.
    Deleted {
        /// The deleted sticker.
        id: StickerId,
    },
}

impl Interaction {
    /// Whether the visible canvas changed.
    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, Self::None | Self::Clicked { .. })
    }
}
