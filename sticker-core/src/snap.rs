//! Grid snapping for sticker placement.

/// Grid size for snapping (matches the visual grid overlay).
pub const DEFAULT_GRID_SIZE: f32 = 40.0;

/// Snap `value` to the nearest multiple of `grid_size`.
///
/// Halfway values round away from zero. A non-positive or non-finite
/// `grid_size` leaves `value` unchanged.
#[must_use]
pub fn snap(value: f32, grid_size: f32) -> f32 {
    if !grid_size.is_finite() || grid_size <= 0.0 {
        return value;
    }
    // `+ 0.0` turns a -0.0 result into 0.0
    (value / grid_size).round() * grid_size + 0.0
}

/// Snap to the default 40px grid.
#[must_use]
pub fn snap_default(value: f32) -> f32 {
    snap(value, DEFAULT_GRID_SIZE)
}

/// Snap `value` to the grid while staying inside `[0, max]`.
///
/// Rounding up can overshoot `max` (549 snaps to 560 on a 40px grid with a
/// limit of 550); in that case the result steps down to the largest grid line
/// that still fits.
#[must_use]
pub fn snap_within(value: f32, grid_size: f32, max: f32) -> f32 {
    let snapped = snap(value, grid_size);
    if snapped <= max {
        return snapped.max(0.0);
    }
    if !grid_size.is_finite() || grid_size <= 0.0 {
        return max.max(0.0);
    }
    ((max / grid_size).floor() * grid_size).max(0.0)
}
