//! The fixed sticker catalog.

use serde::Serialize;

/// One selectable sticker type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    /// Symbol placed on the canvas.
    pub emoji: &'static str,
    /// Human-readable label.
    pub label: &'static str,
}

/// Sticker types offered to the user, in display order.
pub const PALETTE: [PaletteEntry; 6] = [
    PaletteEntry {
        emoji: "🎨",
        label: "Art",
    },
    PaletteEntry {
        emoji: "🌟",
        label: "Star",
    },
    PaletteEntry {
        emoji: "❤️",
        label: "Heart",
    },
    PaletteEntry {
        emoji: "🎵",
        label: "Music",
    },
    PaletteEntry {
        emoji: "🌈",
        label: "Rainbow",
    },
    PaletteEntry {
        emoji: "⚡",
        label: "Energy",
    },
];

/// All palette entries in display order.
#[must_use]
pub fn entries() -> &'static [PaletteEntry] {
    &PALETTE
}

/// Entry at `index`, if any.
#[must_use]
pub fn get(index: usize) -> Option<&'static PaletteEntry> {
    PALETTE.get(index)
}

/// Palette as a JSON array of `{ "emoji", "label" }` objects.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json() -> crate::CanvasResult<String> {
    Ok(serde_json::to_string(entries())?)
}
