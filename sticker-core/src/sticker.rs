//! Stickers - the only entity on the canvas.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CanvasError;

/// Unique identifier for a sticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StickerId(Uuid);

impl StickerId {
    /// Create a new unique sticker ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for StickerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StickerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StickerId {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| CanvasError::InvalidId(format!("{s}: {e}")))
    }
}

/// An emoji placed on the canvas.
///
/// Only `x` and `y` change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    /// Unique identifier.
    pub id: StickerId,
    /// The symbol drawn for this sticker.
    pub emoji: String,
    /// X position of the top-left corner (pixels from left).
    pub x: f32,
    /// Y position of the top-left corner (pixels from top).
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Sticker {
    /// Create a sticker with a fresh ID.
    #[must_use]
    pub fn new(emoji: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: StickerId::new(),
            emoji: emoji.into(),
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point (in canvas coordinates) is within this sticker.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}
