//! Sticker storage.
//!
//! [`StickerStore`] owns the ordered list of stickers on a canvas. It is the
//! single writer for sticker state: palette selections add to it, the
//! interaction controller moves and removes, the clear-all control empties it.
//! Every effective mutation is pushed to subscribers so the view can redraw.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use uuid::Uuid;

use crate::{
    snap::snap_within, CanvasConfig, CanvasResult, CanvasStats, Sticker, StickerId,
};

/// A change applied to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A sticker was appended.
    Added(Sticker),
    /// A sticker's position changed (values after clamping).
    Moved {
        /// The moved sticker.
        id: StickerId,
        /// New x position.
        x: f32,
        /// New y position.
        y: f32,
    },
    /// A sticker was deleted.
    Removed(Sticker),
    /// The collection was emptied.
    Cleared {
        /// How many stickers were removed.
        count: usize,
    },
}

/// Handle returned by [`StickerStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreEvent, &[Sticker])>;

/// Ordered sticker collection with change notification.
///
/// # Example
///
/// ```
/// use sticker_core::{CanvasConfig, StickerStore};
///
/// let mut store = StickerStore::new(CanvasConfig::default());
/// let sticker = store.add("🌟");
///
/// assert!(store.update_position(sticker.id, 1000.0, -50.0));
/// let moved = store.get(sticker.id).unwrap();
/// assert_eq!((moved.x, moved.y), (540.0, 0.0));
/// ```
pub struct StickerStore {
    config: CanvasConfig,
    stickers: Vec<Sticker>,
    rng: SmallRng,
    revision: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl std::fmt::Debug for StickerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StickerStore")
            .field("config", &self.config)
            .field("stickers", &self.stickers)
            .field("revision", &self.revision)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl StickerStore {
    /// Create an empty store whose placement RNG is seeded from a random UUID.
    #[must_use]
    pub fn new(config: CanvasConfig) -> Self {
        let (hi, lo) = Uuid::new_v4().as_u64_pair();
        Self::with_rng(config, SmallRng::seed_from_u64(hi ^ lo))
    }

    /// Create an empty store with an explicit placement RNG.
    #[must_use]
    pub fn with_rng(config: CanvasConfig, rng: SmallRng) -> Self {
        Self {
            config,
            stickers: Vec::new(),
            rng,
            revision: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// The canvas configuration this store clamps against.
    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Place a new sticker at a random grid-aligned position and return it.
    pub fn add(&mut self, emoji: &str) -> Sticker {
        let max_x = self.config.max_x();
        let max_y = self.config.max_y();
        let raw_x = self.random_below(max_x);
        let raw_y = self.random_below(max_y);

        let sticker = Sticker::new(
            emoji,
            snap_within(raw_x, self.config.grid_size, max_x),
            snap_within(raw_y, self.config.grid_size, max_y),
            self.config.sticker_width,
            self.config.sticker_height,
        );

        tracing::debug!(
            "Added sticker {} '{}' at ({}, {})",
            sticker.id,
            sticker.emoji,
            sticker.x,
            sticker.y
        );

        self.stickers.push(sticker.clone());
        self.notify(&StoreEvent::Added(sticker.clone()));
        sticker
    }

    /// Move a sticker, clamping the position into the canvas.
    ///
    /// The position is not snapped here; callers snap before moving.
    /// Returns `false` (and changes nothing) if `id` is not in the store.
    pub fn update_position(&mut self, id: StickerId, x: f32, y: f32) -> bool {
        let (canvas_w, canvas_h) = (self.config.width, self.config.height);
        let Some(sticker) = self.stickers.iter_mut().find(|s| s.id == id) else {
            tracing::debug!("Ignoring move of unknown sticker {id}");
            return false;
        };

        sticker.x = clamp_coordinate(x, canvas_w - sticker.width);
        sticker.y = clamp_coordinate(y, canvas_h - sticker.height);

        let event = StoreEvent::Moved {
            id,
            x: sticker.x,
            y: sticker.y,
        };
        tracing::debug!("Moved sticker {id} to ({}, {})", sticker.x, sticker.y);
        self.notify(&event);
        true
    }

    /// Remove a sticker. Removing an unknown ID is a no-op.
    pub fn remove(&mut self, id: StickerId) -> Option<Sticker> {
        let index = self.stickers.iter().position(|s| s.id == id)?;
        let removed = self.stickers.remove(index);
        tracing::debug!("Removed sticker {id}");
        self.notify(&StoreEvent::Removed(removed.clone()));
        Some(removed)
    }

    /// Remove every sticker. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.stickers.len();
        self.stickers.clear();
        if count > 0 {
            tracing::debug!("Cleared {count} stickers");
            self.notify(&StoreEvent::Cleared { count });
        }
        count
    }

    /// All stickers in paint order (last is on top).
    #[must_use]
    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers
    }

    /// Get a sticker by ID.
    #[must_use]
    pub fn get(&self, id: StickerId) -> Option<&Sticker> {
        self.stickers.iter().find(|s| s.id == id)
    }

    /// Check whether a sticker with this ID exists.
    #[must_use]
    pub fn contains(&self, id: StickerId) -> bool {
        self.get(id).is_some()
    }

    /// Topmost sticker under a canvas point.
    #[must_use]
    pub fn sticker_at(&self, x: f32, y: f32) -> Option<&Sticker> {
        self.stickers.iter().rev().find(|s| s.contains_point(x, y))
    }

    /// Number of stickers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }

    /// Counter bumped on every effective mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Figures for the stats panel.
    #[must_use]
    pub fn stats(&self) -> CanvasStats {
        CanvasStats {
            active_stickers: self.stickers.len(),
            canvas_width: self.config.width,
            canvas_height: self.config.height,
            grid_size: self.config.grid_size,
        }
    }

    /// Serialize the stickers (in paint order) to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string(&self.stickers)?)
    }

    /// Register a callback run after every effective mutation.
    ///
    /// The callback receives the change and the new ordered view.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent, &[Sticker]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Drop a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self, event: &StoreEvent) {
        self.revision += 1;
        for (_, callback) in &mut self.subscribers {
            callback(event, &self.stickers);
        }
    }

    /// Uniform in `[0, max)`; 0 for an empty or unbounded range.
    fn random_below(&mut self, max: f32) -> f32 {
        if max.is_finite() && max > 0.0 {
            self.rng.random_range(0.0..max)
        } else {
            0.0
        }
    }
}

/// Clamp into `[0, max]`; NaN becomes 0.
fn clamp_coordinate(value: f32, max: f32) -> f32 {
    let value = if value.is_nan() { 0.0 } else { value };
    value.clamp(0.0, max.max(0.0))
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn seeded_store() -> StickerStore {
        StickerStore::with_rng(CanvasConfig::default(), SmallRng::seed_from_u64(7))
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut store = seeded_store();
        let a = store.add("🎨");
        let b = store.add("🌟");

        assert_eq!(store.len(), 2);
        assert_eq!(store.stickers()[0].id, a.id);
        assert_eq!(store.stickers()[1].id, b.id);
        assert_eq!(store.stickers()[1].emoji, "🌟");
    }

    #[test]
    fn test_add_uses_configured_size() {
        let mut store = seeded_store();
        let sticker = store.add("⚡");
        assert!((sticker.width - 60.0).abs() < f32::EPSILON);
        assert!((sticker.height - 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_add_places_on_grid_within_bounds() {
        let mut store = seeded_store();
        for _ in 0..500 {
            let sticker = store.add("🌈");
            assert_eq!(sticker.x % 40.0, 0.0);
            assert_eq!(sticker.y % 40.0, 0.0);
            assert!((0.0..=540.0).contains(&sticker.x));
            assert!((0.0..=340.0).contains(&sticker.y));
        }
    }

    #[test]
    fn test_add_when_sticker_fills_canvas() {
        let config = CanvasConfig {
            width: 60.0,
            height: 60.0,
            ..CanvasConfig::default()
        };
        let mut store = StickerStore::with_rng(config, SmallRng::seed_from_u64(1));
        let sticker = store.add("🎵");
        assert_eq!((sticker.x, sticker.y), (0.0, 0.0));
    }

    #[test]
    fn test_add_on_unbounded_canvas_does_not_panic() {
        let config = CanvasConfig {
            width: f32::INFINITY,
            height: f32::NAN,
            ..CanvasConfig::default()
        };
        assert!(config.validate().is_err());

        let mut store = StickerStore::with_rng(config, SmallRng::seed_from_u64(3));
        let sticker = store.add("🎨");
        assert_eq!((sticker.x, sticker.y), (0.0, 0.0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_position_clamps() {
        let mut store = seeded_store();
        let sticker = store.add("❤️");

        assert!(store.update_position(sticker.id, 1000.0, -50.0));
        let moved = store.get(sticker.id).expect("sticker exists");
        assert_eq!((moved.x, moved.y), (540.0, 0.0));

        assert!(store.update_position(sticker.id, -1.0e9, 1.0e9));
        let moved = store.get(sticker.id).expect("sticker exists");
        assert_eq!((moved.x, moved.y), (0.0, 340.0));
    }

    #[test]
    fn test_update_position_does_not_snap() {
        let mut store = seeded_store();
        let sticker = store.add("❤️");
        assert!(store.update_position(sticker.id, 13.0, 27.0));
        let moved = store.get(sticker.id).expect("sticker exists");
        assert_eq!((moved.x, moved.y), (13.0, 27.0));
    }

    #[test]
    fn test_update_position_nan_goes_to_origin() {
        let mut store = seeded_store();
        let sticker = store.add("❤️");
        assert!(store.update_position(sticker.id, f32::NAN, f32::INFINITY));
        let moved = store.get(sticker.id).expect("sticker exists");
        assert_eq!((moved.x, moved.y), (0.0, 340.0));
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut store = seeded_store();
        store.add("🎨");
        let before = store.stickers().to_vec();
        let revision = store.revision();

        assert!(!store.update_position(StickerId::new(), 80.0, 80.0));
        assert_eq!(store.stickers(), before.as_slice());
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_remove_twice_is_idempotent() {
        let mut store = seeded_store();
        let a = store.add("🎨");
        let b = store.add("🌟");

        assert_eq!(store.remove(a.id).map(|s| s.id), Some(a.id));
        let after_first = store.stickers().to_vec();

        assert!(store.remove(a.id).is_none());
        assert_eq!(store.stickers(), after_first.as_slice());
        assert_eq!(store.len(), 1);
        assert!(store.contains(b.id));
    }

    #[test]
    fn test_clear() {
        let mut store = seeded_store();
        assert_eq!(store.clear(), 0);
        assert!(store.is_empty());

        store.add("🎨");
        store.add("🌟");
        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert_eq!(store.clear(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_sticker_at_prefers_topmost() {
        let mut store = seeded_store();
        let bottom = store.add("🎨");
        let top = store.add("🌟");
        store.update_position(bottom.id, 40.0, 40.0);
        store.update_position(top.id, 80.0, 80.0);

        assert_eq!(store.sticker_at(90.0, 90.0).map(|s| s.id), Some(top.id));
        assert_eq!(store.sticker_at(50.0, 50.0).map(|s| s.id), Some(bottom.id));
        assert!(store.sticker_at(500.0, 10.0).is_none());
    }

    #[test]
    fn test_subscribers_see_every_effective_mutation() {
        let mut store = seeded_store();
        let seen: Rc<RefCell<Vec<(StoreEvent, usize)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        store.subscribe(move |event, stickers| {
            sink.borrow_mut().push((event.clone(), stickers.len()));
        });

        let a = store.add("🎨");
        store.update_position(a.id, 120.0, 80.0);
        store.update_position(StickerId::new(), 0.0, 0.0);
        store.remove(StickerId::new());
        store.add("🌟");
        store.clear();
        store.clear();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert!(matches!(seen[0], (StoreEvent::Added(_), 1)));
        assert!(matches!(
            seen[1],
            (StoreEvent::Moved { x, y, .. }, 1) if x == 120.0 && y == 80.0
        ));
        assert!(matches!(seen[2], (StoreEvent::Added(_), 2)));
        assert!(matches!(seen[3], (StoreEvent::Cleared { count: 2 }, 0)));
        assert_eq!(store.revision(), 4);
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = seeded_store();
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let id = store.subscribe(move |_, _| *counter.borrow_mut() += 1);

        store.add("🎨");
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.add("🌟");

        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_stats_and_json() {
        let mut store = seeded_store();
        store.add("🎨");
        let stats = store.stats();
        assert_eq!(stats.active_stickers, 1);
        assert!((stats.grid_size - 40.0).abs() < f32::EPSILON);

        let json = store.to_json().expect("json");
        let parsed: Vec<Sticker> = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed, store.stickers());
    }
}
