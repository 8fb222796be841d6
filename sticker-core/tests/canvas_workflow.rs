//! Sticker Canvas Workflow Tests
//!
//! Exercises the store and interaction controller end to end:
//! - Add / move / delete / clear lifecycle
//! - Placement and clamping bounds
//! - Drag, hover and double-click through pointer events
//! - Subscriber notifications

use std::{cell::RefCell, rc::Rc};

use proptest::prelude::*;
use sticker_core::{
    snap, CanvasConfig, Interaction, InteractionController, PointerEvent, StickerStore,
    StoreEvent, PALETTE,
};

fn on_grid(value: f32, grid: f32) -> bool {
    (value % grid).abs() < 1e-3
}

// ============================================================================
// Store Lifecycle
// ============================================================================

#[test]
fn test_add_move_delete_clear_lifecycle() {
    let mut store = StickerStore::new(CanvasConfig::default());

    let first = store.add("🎨");
    let second = store.add("🌟");
    let third = store.add("❤️");
    assert_eq!(store.len(), 3);
    assert_ne!(first.id, second.id);
    assert_ne!(second.id, third.id);
    assert_ne!(first.id, third.id);

    assert!(store.update_position(second.id, 1000.0, -50.0));
    let moved = store.get(second.id).expect("second sticker exists");
    assert_eq!((moved.x, moved.y), (540.0, 0.0));

    assert!(store.remove(first.id).is_some());
    assert_eq!(store.len(), 2);
    assert!(!store.contains(first.id));

    assert_eq!(store.clear(), 2);
    assert!(store.is_empty());
}

#[test]
fn test_remove_twice_is_noop() {
    let mut store = StickerStore::new(CanvasConfig::default());
    let keep = store.add("🎵");
    let gone = store.add("🌈");

    assert!(store.remove(gone.id).is_some());
    let revision = store.revision();
    assert!(store.remove(gone.id).is_none());
    assert_eq!(store.revision(), revision);
    assert_eq!(store.stickers().len(), 1);
    assert_eq!(store.stickers()[0].id, keep.id);
}

#[test]
fn test_clear_is_idempotent() {
    let mut store = StickerStore::new(CanvasConfig::default());
    assert_eq!(store.clear(), 0);
    assert!(store.is_empty());

    store.add("⚡");
    assert_eq!(store.clear(), 1);
    assert_eq!(store.clear(), 0);
    assert!(store.is_empty());
}

#[test]
fn test_subscribers_see_every_mutation() {
    let mut store = StickerStore::new(CanvasConfig::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |event, stickers| {
        sink.borrow_mut().push((event.clone(), stickers.len()));
    });

    let sticker = store.add("🎨");
    store.update_position(sticker.id, 80.0, 80.0);
    store.remove(sticker.id);
    store.clear();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 3);
    assert!(matches!(seen[0], (StoreEvent::Added(_), 1)));
    assert!(matches!(seen[1], (StoreEvent::Moved { .. }, 1)));
    assert!(matches!(seen[2], (StoreEvent::Removed(_), 0)));
}

// ============================================================================
// Pointer Workflow
// ============================================================================

#[test]
fn test_palette_drag_and_double_click_workflow() {
    let mut canvas = InteractionController::new(CanvasConfig::default());
    let sticker = canvas.select_palette(1).expect("star entry");
    assert_eq!(sticker.emoji, PALETTE[1].emoji);

    // grab near the top-left corner of the sticker and drag it off canvas
    let (gx, gy) = (sticker.x + 5.0, sticker.y + 5.0);
    assert_eq!(
        canvas.handle(&PointerEvent::down(gx, gy, 0)),
        Interaction::DragStarted { id: sticker.id }
    );
    canvas.handle(&PointerEvent::moved(2000.0, 2000.0, 16));
    let dropped = canvas.handle(&PointerEvent::up(2000.0, 2000.0, 32));
    assert_eq!(
        dropped,
        Interaction::Dropped {
            id: sticker.id,
            x: 540.0,
            y: 340.0
        }
    );

    // double click removes it
    canvas.handle(&PointerEvent::down(550.0, 350.0, 1_000));
    canvas.handle(&PointerEvent::up(550.0, 350.0, 1_050));
    canvas.handle(&PointerEvent::down(550.0, 350.0, 1_200));
    assert_eq!(
        canvas.handle(&PointerEvent::up(550.0, 350.0, 1_250)),
        Interaction::Deleted { id: sticker.id }
    );
    assert!(canvas.store().is_empty());
    assert!(!canvas.can_clear());
}

#[test]
fn test_hover_never_notifies_subscribers() {
    let mut canvas = InteractionController::new(CanvasConfig::default());
    let sticker = canvas.add_sticker("🌈");

    let count = Rc::new(RefCell::new(0_usize));
    let sink = Rc::clone(&count);
    canvas.subscribe(move |_, _| *sink.borrow_mut() += 1);

    let hover = canvas.handle(&PointerEvent::moved(sticker.x + 1.0, sticker.y + 1.0, 0));
    assert_eq!(
        hover,
        Interaction::HoverChanged {
            hovered: Some(sticker.id)
        }
    );
    canvas.handle(&PointerEvent::leave(10));
    assert_eq!(*count.borrow(), 0);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_added_stickers_are_on_grid_and_in_bounds(count in 1usize..40) {
        let config = CanvasConfig::default();
        let mut store = StickerStore::new(config.clone());
        for i in 0..count {
            let sticker = store.add(PALETTE[i % PALETTE.len()].emoji);
            prop_assert!(on_grid(sticker.x, config.grid_size));
            prop_assert!(on_grid(sticker.y, config.grid_size));
            prop_assert!(sticker.x >= 0.0 && sticker.x <= config.max_x());
            prop_assert!(sticker.y >= 0.0 && sticker.y <= config.max_y());
        }

        let mut ids: Vec<_> = store.stickers().iter().map(|s| s.id).collect();
        ids.sort_by_key(|id| *id.as_uuid());
        ids.dedup();
        prop_assert_eq!(ids.len(), count);
    }

    #[test]
    fn prop_update_position_always_clamps(x in -1.0e6f32..1.0e6, y in -1.0e6f32..1.0e6) {
        let config = CanvasConfig::default();
        let mut store = StickerStore::new(config.clone());
        let sticker = store.add("🎨");
        store.update_position(sticker.id, x, y);

        let moved = store.get(sticker.id).expect("sticker exists");
        prop_assert!(moved.x >= 0.0 && moved.x <= config.max_x());
        prop_assert!(moved.y >= 0.0 && moved.y <= config.max_y());
    }

    #[test]
    fn prop_snap_is_idempotent_for_default_grid(x in -5000.0f32..5000.0) {
        let once = snap(x, 40.0);
        prop_assert_eq!(snap(once, 40.0), once);
        prop_assert!(on_grid(once, 40.0));
    }
}
