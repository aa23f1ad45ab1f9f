//! Card Placement Store
//!
//! Owns the canonical card collection: subset membership, per-subset pick
//! state and per-(scene, subset) positions. The collection sits behind an
//! `Arc`; mutations are copy-on-write so a snapshot handed to the renderer is
//! never changed underneath it.
//!
//! # Invariants
//!
//! - Every card has a non-empty `sets` and a unique, non-empty `id`
//! - `positions[scene][subset]` exists for every scene × subset of the card
//! - `picked[subset]` exists for every subset of the card
//! - Cards are never added or removed after initialization

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::{PlanboardError, Result};
use crate::types::{Delta, Position, SceneId, SubsetId};

/// A catalog item that can be picked and positioned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub text: String,
    pub sets: Vec<SubsetId>,
    #[serde(default)]
    pub picked: BTreeMap<SubsetId, bool>,
    #[serde(default)]
    pub positions: BTreeMap<SceneId, BTreeMap<SubsetId, Position>>,
}

impl Card {
    /// Fresh, unpicked, never-moved card for a catalog entry
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        let mut card = Self {
            id: entry.id.clone(),
            text: entry.text.clone(),
            sets: entry.sets.clone(),
            picked: BTreeMap::new(),
            positions: BTreeMap::new(),
        };
        card.normalize();
        card
    }

    /// Fill in any missing pick flags or grid positions
    pub fn normalize(&mut self) {
        for subset in &self.sets {
            self.picked.entry(subset.clone()).or_insert(false);
        }
        for scene in SceneId::all() {
            let row = self.positions.entry(scene).or_default();
            for subset in &self.sets {
                row.entry(subset.clone()).or_insert(Position::ORIGIN);
            }
        }
    }

    pub fn belongs_to(&self, subset: &SubsetId) -> bool {
        self.sets.contains(subset)
    }

    pub fn is_picked(&self, subset: &SubsetId) -> bool {
        self.belongs_to(subset) && self.picked.get(subset).copied().unwrap_or(false)
    }

    /// Position in a (scene, subset) cell; absent entries read as origin
    pub fn position(&self, scene: SceneId, subset: &SubsetId) -> Position {
        self.positions
            .get(&scene)
            .and_then(|row| row.get(subset))
            .copied()
            .unwrap_or(Position::ORIGIN)
    }

    /// True once any scene/subset cell holds a non-origin position
    pub fn has_been_placed(&self) -> bool {
        self.positions
            .values()
            .flat_map(|row| row.values())
            .any(|pos| !pos.is_origin())
    }
}

/// Ordered card list; order is the catalog order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardCollection {
    cards: Vec<Card>,
}

impl CardCollection {
    /// Derive a fresh collection from the catalog
    pub fn seed(catalog: &Catalog) -> Self {
        Self {
            cards: catalog.entries().iter().map(Card::from_entry).collect(),
        }
    }

    /// Parse a persisted collection, rejecting anything that breaks the
    /// data-model invariants, and fill in missing grid entries
    pub fn from_json(json: &str) -> Result<Self> {
        let mut collection: Self = serde_json::from_str(json)?;
        collection.validate()?;
        for card in &mut collection.cards {
            card.normalize();
        }
        Ok(collection)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for card in &self.cards {
            if card.id.is_empty() {
                return Err(PlanboardError::validation("stored card without id"));
            }
            if card.sets.is_empty() {
                return Err(PlanboardError::validation(format!(
                    "stored card '{}' belongs to no subset",
                    card.id
                )));
            }
            let non_finite = card
                .positions
                .values()
                .flat_map(|row| row.values())
                .any(|pos| !pos.is_finite());
            if non_finite {
                return Err(PlanboardError::validation(format!(
                    "stored card '{}' has a non-finite position",
                    card.id
                )));
            }
            if !seen.insert(card.id.as_str()) {
                return Err(PlanboardError::validation(format!(
                    "stored card '{}' appears twice",
                    card.id
                )));
            }
        }
        Ok(())
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Union of all cards' subsets, in first-appearance order
    pub fn subsets(&self) -> Vec<SubsetId> {
        let mut subsets: Vec<SubsetId> = Vec::new();
        for subset in self.cards.iter().flat_map(|c| c.sets.iter()) {
            if !subsets.contains(subset) {
                subsets.push(subset.clone());
            }
        }
        subsets
    }
}

/// Where the store's initial state came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Persisted,
    Catalog,
}

/// Card Placement Store
#[derive(Debug, Clone)]
pub struct PlacementStore {
    cards: Arc<CardCollection>,
    drop_position: Position,
    source: LoadSource,
}

impl PlacementStore {
    /// Use the persisted collection when it is present and well-formed,
    /// otherwise seed from the catalog
    pub fn initialize(catalog: &Catalog, persisted: Option<&str>, drop_position: Position) -> Self {
        let loaded = persisted.and_then(|json| match CardCollection::from_json(json) {
            Ok(collection) => Some(collection),
            Err(e) => {
                warn!("Discarding malformed stored cards: {}", e);
                None
            }
        });

        let (cards, source) = match loaded {
            Some(collection) => (collection, LoadSource::Persisted),
            None => (CardCollection::seed(catalog), LoadSource::Catalog),
        };
        info!("Placement store ready with {} cards ({:?})", cards.len(), source);

        Self {
            cards: Arc::new(cards),
            drop_position,
            source,
        }
    }

    pub fn source(&self) -> LoadSource {
        self.source
    }

    /// Immutable view of the current state
    pub fn snapshot(&self) -> Arc<CardCollection> {
        Arc::clone(&self.cards)
    }

    pub fn collection(&self) -> &CardCollection {
        &self.cards
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn position(&self, id: &str, scene: SceneId, subset: &SubsetId) -> Option<Position> {
        self.card(id).map(|c| c.position(scene, subset))
    }

    pub fn drop_position(&self) -> Position {
        self.drop_position
    }

    /// Mark the card picked in `subset`; returns whether anything changed
    pub fn pick(&mut self, id: &str, subset: &SubsetId) -> bool {
        self.set_picked(id, subset, true)
    }

    /// Mark the card unpicked in `subset`; returns whether anything changed
    pub fn unpick(&mut self, id: &str, subset: &SubsetId) -> bool {
        self.set_picked(id, subset, false)
    }

    fn set_picked(&mut self, id: &str, subset: &SubsetId, picked: bool) -> bool {
        let eligible = self
            .card(id)
            .is_some_and(|c| c.belongs_to(subset) && c.is_picked(subset) != picked);
        if !eligible {
            debug!("Ignoring pick={} for card '{}' in subset '{}'", picked, id, subset);
            return false;
        }

        if let Some(card) = Arc::make_mut(&mut self.cards).get_mut(id) {
            card.picked.insert(subset.clone(), picked);
        }
        self.place_if_unplaced(id, subset);
        true
    }

    /// Accumulate a drag displacement onto the card's (scene, subset) cell.
    ///
    /// Moves that would leave the card at a non-finite coordinate are
    /// ignored.
    pub fn move_by(&mut self, id: &str, scene: SceneId, subset: &SubsetId, delta: Delta) -> bool {
        let Some(current) = self
            .card(id)
            .filter(|c| c.belongs_to(subset))
            .map(|c| c.position(scene, subset))
        else {
            debug!("Ignoring move of card '{}' in subset '{}'", id, subset);
            return false;
        };
        let next = current + delta;
        if !delta.is_finite() || !next.is_finite() {
            warn!(
                "Ignoring move of card '{}' by ({}, {}): position would not be finite",
                id, delta.dx, delta.dy
            );
            return false;
        }

        if let Some(card) = Arc::make_mut(&mut self.cards).get_mut(id) {
            card.positions
                .entry(scene)
                .or_default()
                .insert(subset.clone(), next);
        }
        true
    }

    /// First-drop rule.
    ///
    /// A card that has never held a non-origin position anywhere gets the
    /// default drop coordinate for `subset` in every scene. Other subsets of
    /// the same card stay at the origin.
    pub fn place_if_unplaced(&mut self, id: &str, subset: &SubsetId) -> bool {
        let needs_drop = self
            .card(id)
            .is_some_and(|c| c.belongs_to(subset) && !c.has_been_placed());
        if !needs_drop {
            return false;
        }

        let drop = self.drop_position;
        if let Some(card) = Arc::make_mut(&mut self.cards).get_mut(id) {
            for scene in SceneId::all() {
                card.positions
                    .entry(scene)
                    .or_default()
                    .insert(subset.clone(), drop);
            }
        }
        debug!("Placed card '{}' at default drop position in subset '{}'", id, subset);
        true
    }

    /// Re-seed from the catalog, discarding all picks and positions
    pub fn reset(&mut self, catalog: &Catalog) {
        self.cards = Arc::new(CardCollection::seed(catalog));
        self.source = LoadSource::Catalog;
    }

    pub fn subsets(&self) -> Vec<SubsetId> {
        self.cards.subsets()
    }

    pub fn cards_in_subset<'a>(&'a self, subset: &SubsetId) -> impl Iterator<Item = &'a Card> {
        self.cards.cards().iter().filter(move |c| c.belongs_to(subset))
    }

    pub fn picked_cards(&self, subset: &SubsetId) -> Vec<&Card> {
        self.cards_in_subset(subset)
            .filter(|c| c.is_picked(subset))
            .collect()
    }

    pub fn unpicked_cards(&self, subset: &SubsetId) -> Vec<&Card> {
        self.cards_in_subset(subset)
            .filter(|c| !c.is_picked(subset))
            .collect()
    }

    /// First unpicked card of the subset in catalog order
    pub fn next_pickable(&self, subset: &SubsetId) -> Option<&Card> {
        self.cards_in_subset(subset).find(|c| !c.is_picked(subset))
    }

    /// Last picked card of the subset in catalog order
    pub fn last_picked(&self, subset: &SubsetId) -> Option<&Card> {
        self.cards
            .cards()
            .iter()
            .rev()
            .find(|c| c.is_picked(subset))
    }
}
