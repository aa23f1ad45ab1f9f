//! Board controller
//!
//! The single writer of board state. Each user-level operation reads the
//! current snapshot, mutates the Placement Store and/or the Z-Order Tracker,
//! and mirrors the result into durable storage before returning, so the next
//! event always sees a consistent, persisted state.
//!
//! Persistence failures never abort an operation: in-memory state stays
//! authoritative and the failure is parked as a [`Notice`] for the UI.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config_file::CanvasLayout;
use crate::engine::placement::{Card, PlacementStore};
use crate::engine::z_order::ZOrderTracker;
use crate::error::{PlanboardError, Result};
use crate::persistence::{CARDS_KEY, IDENTIFIER_KEY, KeyValueStore, Z_ORDER_KEY};
use crate::types::{Delta, Position, SceneId, SubsetId};

/// How loud a notice should be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Non-fatal message for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

/// Result of undoing the most recent pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoOutcome {
    /// Card that was unpicked
    pub removed: String,
    /// New last-picked card, for the "undo" highlight
    pub highlight: Option<String>,
}

/// A visible card as laid out in one scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedCard {
    pub id: String,
    pub text: String,
    pub position: Position,
    pub paint_order: u32,
}

/// Board controller over an injected storage backend
pub struct Board<S: KeyValueStore> {
    catalog: Catalog,
    layout: CanvasLayout,
    store: PlacementStore,
    z_order: ZOrderTracker,
    storage: S,
    active_scene: SceneId,
    active_subset: SubsetId,
    identifier: String,
    notice: Option<Notice>,
}

impl<S: KeyValueStore> Board<S> {
    /// Restore the board from `storage`, seeding from `catalog` where
    /// nothing usable is stored
    pub fn open(catalog: Catalog, layout: CanvasLayout, storage: S) -> Self {
        let mut notice = None;
        let mut read = |key: &str| match storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read '{}' from storage: {}", key, e);
                notice = Some(Notice::warning(format!("Could not read saved {}: {}", key, e)));
                None
            }
        };

        let cards = read(CARDS_KEY);
        let z_order = read(Z_ORDER_KEY);
        let identifier = read(IDENTIFIER_KEY).unwrap_or_default();

        let store = PlacementStore::initialize(
            &catalog,
            cards.as_deref(),
            layout.initial_drop_position(),
        );
        let z_order = ZOrderTracker::initialize(z_order.as_deref());
        let active_subset = default_subset(&store);
        info!(
            "Board opened: {} cards, {} subsets, active subset '{}'",
            store.collection().len(),
            store.subsets().len(),
            active_subset
        );

        Self {
            catalog,
            layout,
            store,
            z_order,
            storage,
            active_scene: SceneId::default(),
            active_subset,
            identifier,
            notice,
        }
    }

    // ------------------------------------------------------------------
    // Session state
    // ------------------------------------------------------------------

    pub fn active_scene(&self) -> SceneId {
        self.active_scene
    }

    pub fn active_subset(&self) -> &SubsetId {
        &self.active_subset
    }

    pub fn set_scene(&mut self, scene: SceneId) {
        self.active_scene = scene;
    }

    /// Flip between the two scenes
    pub fn toggle_scene(&mut self) -> SceneId {
        self.active_scene = self.active_scene.toggled();
        debug!("Active scene is now {}", self.active_scene);
        self.active_scene
    }

    /// Switch the active subset; unknown names are rejected
    pub fn select_subset(&mut self, subset: &SubsetId) -> Result<()> {
        if !self.store.subsets().contains(subset) {
            return Err(PlanboardError::validation(format!(
                "unknown subset '{}'",
                subset
            )));
        }
        self.active_subset = subset.clone();
        debug!("Active subset is now '{}'", subset);
        Ok(())
    }

    /// Step to the next (or previous) subset, wrapping around
    pub fn cycle_subset(&mut self, forward: bool) -> &SubsetId {
        let subsets = self.store.subsets();
        if let Some(current) = subsets.iter().position(|s| *s == self.active_subset) {
            let len = subsets.len();
            let next = if forward {
                (current + 1) % len
            } else {
                (current + len - 1) % len
            };
            self.active_subset = subsets[next].clone();
        } else if let Some(first) = subsets.first() {
            self.active_subset = first.clone();
        }
        &self.active_subset
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Update the free-text session label
    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = identifier.into();
        let label = self.identifier.clone();
        self.write(IDENTIFIER_KEY, Ok(label));
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Pick the next pickable card of the active subset
    pub fn pick_next(&mut self) -> Option<String> {
        let id = self.store.next_pickable(&self.active_subset)?.id.clone();
        self.pick(&id).then_some(id)
    }

    /// Pick a specific card in the active subset
    pub fn pick(&mut self, id: &str) -> bool {
        let subset = self.active_subset.clone();
        let changed = self.store.pick(id, &subset);
        if changed {
            info!("Picked card '{}' in subset '{}'", id, subset);
            self.persist_cards();
        }
        changed
    }

    /// Unpick a specific card in the active subset
    pub fn unpick(&mut self, id: &str) -> bool {
        let subset = self.active_subset.clone();
        let changed = self.store.unpick(id, &subset);
        if changed {
            info!("Unpicked card '{}' in subset '{}'", id, subset);
            self.persist_cards();
        }
        changed
    }

    /// Unpick the last picked card of the active subset and report the card
    /// that should be highlighted next
    pub fn undo_last_pick(&mut self) -> Option<UndoOutcome> {
        let removed = self.store.last_picked(&self.active_subset)?.id.clone();
        if !self.unpick(&removed) {
            return None;
        }
        let highlight = self
            .store
            .last_picked(&self.active_subset)
            .map(|c| c.id.clone());
        Some(UndoOutcome { removed, highlight })
    }

    /// Drag start: raise the card in the active (scene, subset)
    pub fn drag_start(&mut self, id: &str) -> bool {
        let known = self
            .store
            .card(id)
            .is_some_and(|c| c.belongs_to(&self.active_subset));
        if !known {
            debug!("Ignoring drag start for card '{}'", id);
            return false;
        }

        if self
            .z_order
            .bring_to_front(self.active_scene, &self.active_subset, id)
        {
            self.persist_z_order();
        }
        true
    }

    /// Drag end: add the accumulated displacement in the active cell
    pub fn drag_end(&mut self, id: &str, delta: Delta) -> bool {
        if delta.is_zero() {
            return false;
        }
        let subset = self.active_subset.clone();
        let moved = self.store.move_by(id, self.active_scene, &subset, delta);
        if moved {
            debug!(
                "Moved card '{}' by ({}, {}) in scene {} subset '{}'",
                id, delta.dx, delta.dy, self.active_scene, subset
            );
            self.persist_cards();
        }
        moved
    }

    /// Drag end with the displacement limited to the canvas
    pub fn drag_end_clamped(&mut self, id: &str, delta: Delta) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let clamped = self.layout.clamp_delta(from, delta);
        self.drag_end(id, clamped)
    }

    /// Forget all stored state and re-seed from the catalog
    pub fn reset(&mut self) {
        info!("Resetting board to catalog defaults");
        for key in [CARDS_KEY, Z_ORDER_KEY, IDENTIFIER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!("Failed to remove '{}' from storage: {}", key, e);
                self.notice = Some(Notice::warning(format!("Could not clear saved {}: {}", key, e)));
            }
        }

        self.store.reset(&self.catalog);
        self.z_order.reset();
        self.identifier.clear();
        if !self.store.subsets().contains(&self.active_subset) {
            self.active_subset = default_subset(&self.store);
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn store(&self) -> &PlacementStore {
        &self.store
    }

    pub fn z_order(&self) -> &ZOrderTracker {
        &self.z_order
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn layout(&self) -> &CanvasLayout {
        &self.layout
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn subsets(&self) -> Vec<SubsetId> {
        self.store.subsets()
    }

    pub fn next_pickable(&self) -> Option<&Card> {
        self.store.next_pickable(&self.active_subset)
    }

    pub fn last_picked(&self) -> Option<&Card> {
        self.store.last_picked(&self.active_subset)
    }

    pub fn picked_count(&self) -> usize {
        self.store.picked_cards(&self.active_subset).len()
    }

    pub fn unpicked_count(&self) -> usize {
        self.store.unpicked_cards(&self.active_subset).len()
    }

    /// Position of a card in the active (scene, subset)
    pub fn position(&self, id: &str) -> Option<Position> {
        self.store
            .card(id)
            .filter(|c| c.belongs_to(&self.active_subset))
            .map(|c| c.position(self.active_scene, &self.active_subset))
    }

    /// Picked cards of the active subset, bottom first
    pub fn visible_cards(&self) -> Vec<&Card> {
        self.visible_in(self.active_scene)
    }

    fn visible_in(&self, scene: SceneId) -> Vec<&Card> {
        let mut cards = self.store.picked_cards(&self.active_subset);
        cards.sort_by_key(|c| self.z_order.paint_order(scene, &self.active_subset, &c.id));
        cards
    }

    /// Layout of the active subset in `scene`, bottom first
    pub fn placed_cards(&self, scene: SceneId) -> Vec<PlacedCard> {
        self.visible_in(scene)
            .into_iter()
            .map(|c| PlacedCard {
                id: c.id.clone(),
                text: c.text.clone(),
                position: c.position(scene, &self.active_subset),
                paint_order: self.z_order.paint_order(scene, &self.active_subset, &c.id),
            })
            .collect()
    }

    /// Top-most visible card whose rectangle contains `point`
    pub fn card_at(&self, point: Position) -> Option<&Card> {
        let (w, h) = (self.layout.card_width, self.layout.card_height);
        self.visible_cards().into_iter().rev().find(|c| {
            let pos = c.position(self.active_scene, &self.active_subset);
            point.x >= pos.x && point.x < pos.x + w && point.y >= pos.y && point.y < pos.y + h
        })
    }

    /// Drain the pending notice, if any
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    fn persist_cards(&mut self) {
        let json = self.store.collection().to_json();
        self.write(CARDS_KEY, json);
    }

    fn persist_z_order(&mut self) {
        let json = self.z_order.table().to_json();
        self.write(Z_ORDER_KEY, json);
    }

    fn write(&mut self, key: &str, value: Result<String>) {
        let result = value.and_then(|v| self.storage.set(key, &v));
        if let Err(e) = result {
            warn!("Failed to persist '{}': {}", key, e);
            self.notice = Some(Notice::warning(format!(
                "Changes are not being saved ({}): {}",
                key, e
            )));
        }
    }
}

fn default_subset(store: &PlacementStore) -> SubsetId {
    let subsets = store.subsets();
    let sentinel = SubsetId::default_subset();
    if subsets.contains(&sentinel) {
        sentinel
    } else {
        subsets.into_iter().next().unwrap_or(sentinel)
    }
}
