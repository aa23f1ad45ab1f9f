//! Property-Based Tests for Planboard
//!
//! Uses proptest for testing invariants over arbitrary operation sequences
//!
//! These tests verify:
//! - Scene string round-trips (parse → to_string → parse)
//! - Stacking order uniqueness after any sequence of bring-to-front calls
//! - Drag accumulation and canvas clamping with fractional deltas
//! - Persistence round-trips of arbitrary board states

use planboard::board::Board;
use planboard::catalog::Catalog;
use planboard::config_file::CanvasLayout;
use planboard::engine::z_order::ZOrderTracker;
use planboard::export::sanitize_filename;
use planboard::persistence::{KeyValueStore, MemoryStore, CARDS_KEY, Z_ORDER_KEY};
use planboard::types::{Delta, Position, SceneId, SubsetId};
use planboard::ui::CanvasGeometry;
use proptest::prelude::*;
use ratatui::layout::Rect;

// =============================================================================
// SceneId Property Tests
// =============================================================================

/// Strategy for generating valid SceneId variants
fn scene_strategy() -> impl Strategy<Value = SceneId> {
    prop_oneof![Just(SceneId::One), Just(SceneId::Two)]
}

proptest! {
    /// SceneId: to_string → parse round-trip is identity
    #[test]
    fn scene_roundtrip(scene in scene_strategy()) {
        let s = scene.to_string();
        let parsed: SceneId = s.parse().expect("Should parse");
        prop_assert_eq!(scene, parsed);
    }

    /// SceneId: toggling twice is identity
    #[test]
    fn scene_toggle_involution(scene in scene_strategy()) {
        prop_assert_eq!(scene.toggled().toggled(), scene);
        prop_assert_ne!(scene.toggled(), scene);
    }
}

// =============================================================================
// Z-Order Property Tests
// =============================================================================

fn card_id_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("101".to_string()),
        Just("102".to_string()),
        Just("201".to_string()),
        Just("305".to_string()),
        Just("601".to_string()),
    ]
}

proptest! {
    /// Every id appears at most once per stack and the last raised id is on top
    #[test]
    fn z_order_ids_stay_unique(
        ops in prop::collection::vec((scene_strategy(), card_id_strategy()), 1..40)
    ) {
        let mut tracker = ZOrderTracker::default();
        let subset = SubsetId::from("a");
        for (scene, id) in &ops {
            tracker.bring_to_front(*scene, &subset, id);
        }

        for scene in SceneId::all() {
            let stack = tracker.stack(scene, &subset);
            let mut seen = std::collections::HashSet::new();
            prop_assert!(stack.iter().all(|id| seen.insert(id.clone())));
        }

        let (last_scene, last_id) = ops.last().unwrap();
        prop_assert_eq!(tracker.stack(*last_scene, &subset).last(), Some(last_id));
    }

    /// Paint order is PAINT_BASE + index for stacked cards
    #[test]
    fn z_order_paint_order_matches_index(
        ids in prop::collection::vec(card_id_strategy(), 1..20)
    ) {
        let mut tracker = ZOrderTracker::default();
        let subset = SubsetId::from("a");
        for id in &ids {
            tracker.bring_to_front(SceneId::One, &subset, id);
        }
        for (index, id) in tracker.stack(SceneId::One, &subset).iter().enumerate() {
            prop_assert_eq!(tracker.paint_order(SceneId::One, &subset, id), 100 + index as u32);
        }
    }
}

// =============================================================================
// Placement Property Tests
// =============================================================================

/// Fractional deltas, plus the cell-derived deltas a mouse drag produces
fn delta_strategy() -> impl Strategy<Value = Delta> {
    prop_oneof![
        (-500.0f64..500.0, -500.0f64..500.0).prop_map(|(dx, dy)| Delta::new(dx, dy)),
        (1u16..400, 1u16..200, -30i32..30, -30i32..30).prop_map(|(w, h, cols, rows)| {
            CanvasGeometry::new(Rect::new(0, 0, w, h), CanvasLayout::default())
                .cells_to_delta(cols, rows)
        }),
    ]
}

fn builtin_board() -> Board<MemoryStore> {
    Board::open(
        Catalog::builtin().expect("builtin catalog"),
        CanvasLayout::default(),
        MemoryStore::new(),
    )
}

proptest! {
    /// Successive drags add up to their sum
    #[test]
    fn drags_accumulate(deltas in prop::collection::vec(delta_strategy(), 1..10)) {
        let mut board = builtin_board();
        let id = board.pick_next().expect("card to pick");
        let start = board.position(&id).unwrap();

        let mut expected = start;
        for delta in &deltas {
            board.drag_end(&id, *delta);
            expected = expected + *delta;
        }
        prop_assert_eq!(board.position(&id), Some(expected));
    }

    /// Clamped drags never leave the canvas
    #[test]
    fn clamped_drags_stay_on_canvas(deltas in prop::collection::vec(delta_strategy(), 1..10)) {
        let mut board = builtin_board();
        let layout = *board.layout();
        let id = board.pick_next().expect("card to pick");

        for delta in &deltas {
            board.drag_end_clamped(&id, Delta::new(delta.dx * 4.0, delta.dy * 4.0));
            // Re-adding a clamped delta may land one rounding step off the edge
            let eps = 1e-9;
            let Position { x, y } = board.position(&id).unwrap();
            prop_assert!((-eps..=layout.width - layout.card_width + eps).contains(&x));
            prop_assert!((-eps..=layout.height - layout.card_height + eps).contains(&y));
        }
    }

    /// Whatever was done, reopening from the stored values restores it
    #[test]
    fn persistence_roundtrip(
        picks in 1usize..8,
        undos in 0usize..4,
        drags in prop::collection::vec(delta_strategy(), 0..6),
        toggle in any::<bool>(),
    ) {
        let mut board = builtin_board();
        for _ in 0..picks {
            board.pick_next();
        }
        for _ in 0..undos {
            board.undo_last_pick();
        }
        if toggle {
            board.toggle_scene();
        }
        let visible: Vec<String> = board.visible_cards().iter().map(|c| c.id.clone()).collect();
        for (delta, id) in drags.iter().zip(visible.iter().cycle()) {
            board.drag_start(id);
            board.drag_end(id, *delta);
        }

        let mut storage = MemoryStore::new();
        for key in [CARDS_KEY, Z_ORDER_KEY] {
            if let Some(value) = board.storage().get(key).unwrap() {
                storage.set(key, &value).unwrap();
            }
        }
        let reopened = Board::open(
            Catalog::builtin().expect("builtin catalog"),
            CanvasLayout::default(),
            storage,
        );

        prop_assert_eq!(reopened.store().collection(), board.store().collection());
        prop_assert_eq!(reopened.z_order().table(), board.z_order().table());
    }
}

// =============================================================================
// Export Filename Property Tests
// =============================================================================

proptest! {
    /// Sanitized labels only contain [a-z0-9_-]
    #[test]
    fn sanitized_labels_are_safe(label in "\\PC{0,40}") {
        let slug = sanitize_filename(&label);
        prop_assert!(slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'));
    }
}
