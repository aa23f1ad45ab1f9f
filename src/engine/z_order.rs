//! Z-Order Tracker
//!
//! Keeps, per (scene, subset), a stack of card ids in paint order. The last
//! id is the top-most card. Cards missing from a stack paint below every
//! card that is present.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::{SceneId, SubsetId};

/// Paint order of the bottom-most card that has been brought to front
pub const PAINT_BASE: u32 = 100;
/// Paint order of cards that never were brought to front
pub const PAINT_ABSENT: u32 = 1;

/// Serializable scene → subset → stack table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZOrderTable(BTreeMap<SceneId, BTreeMap<SubsetId, Vec<String>>>);

impl Default for ZOrderTable {
    /// One empty entry per scene
    fn default() -> Self {
        Self(SceneId::all().into_iter().map(|s| (s, BTreeMap::new())).collect())
    }
}

impl ZOrderTable {
    /// Parse a persisted table; duplicate ids keep their top-most slot
    pub fn from_json(json: &str) -> Result<Self> {
        let mut table: Self = serde_json::from_str(json)?;
        for scene in SceneId::all() {
            table.0.entry(scene).or_default();
        }
        for stack in table.0.values_mut().flat_map(|row| row.values_mut()) {
            dedup_keep_last(stack);
        }
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Stack for a (scene, subset), bottom first
    pub fn stack(&self, scene: SceneId, subset: &SubsetId) -> &[String] {
        self.0
            .get(&scene)
            .and_then(|row| row.get(subset))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn stacking_index(&self, scene: SceneId, subset: &SubsetId, id: &str) -> Option<usize> {
        self.stack(scene, subset).iter().position(|c| c == id)
    }

    /// `PAINT_BASE + index` for stacked cards, `PAINT_ABSENT` otherwise
    pub fn paint_order(&self, scene: SceneId, subset: &SubsetId, id: &str) -> u32 {
        match self.stacking_index(scene, subset, id) {
            Some(index) => PAINT_BASE.saturating_add(index as u32),
            None => PAINT_ABSENT,
        }
    }
}

fn dedup_keep_last(stack: &mut Vec<String>) {
    let mut out: Vec<String> = Vec::with_capacity(stack.len());
    for id in stack.drain(..).rev() {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out.reverse();
    *stack = out;
}

/// Z-Order Tracker
#[derive(Debug, Clone, Default)]
pub struct ZOrderTracker {
    table: Arc<ZOrderTable>,
}

impl ZOrderTracker {
    /// Restore from storage; malformed input yields an empty table
    pub fn initialize(persisted: Option<&str>) -> Self {
        let table = match persisted.map(ZOrderTable::from_json) {
            Some(Ok(table)) => table,
            Some(Err(e)) => {
                warn!("Discarding malformed stored z-order: {}", e);
                ZOrderTable::default()
            }
            None => ZOrderTable::default(),
        };
        Self {
            table: Arc::new(table),
        }
    }

    pub fn snapshot(&self) -> Arc<ZOrderTable> {
        Arc::clone(&self.table)
    }

    pub fn table(&self) -> &ZOrderTable {
        &self.table
    }

    /// Move `id` to the top of the (scene, subset) stack.
    ///
    /// Returns `false` when it already was the top-most card.
    pub fn bring_to_front(&mut self, scene: SceneId, subset: &SubsetId, id: &str) -> bool {
        if self.table.stack(scene, subset).last().is_some_and(|top| top == id) {
            return false;
        }

        let table = Arc::make_mut(&mut self.table);
        let stack = table
            .0
            .entry(scene)
            .or_default()
            .entry(subset.clone())
            .or_default();
        stack.retain(|c| c != id);
        stack.push(id.to_string());
        debug!("Card '{}' brought to front in scene {} subset '{}'", id, scene, subset);
        true
    }

    pub fn stack(&self, scene: SceneId, subset: &SubsetId) -> &[String] {
        self.table.stack(scene, subset)
    }

    pub fn stacking_index(&self, scene: SceneId, subset: &SubsetId, id: &str) -> Option<usize> {
        self.table.stacking_index(scene, subset, id)
    }

    pub fn paint_order(&self, scene: SceneId, subset: &SubsetId, id: &str) -> u32 {
        self.table.paint_order(scene, subset, id)
    }

    /// Empty stack for every (scene, subset)
    pub fn reset(&mut self) {
        self.table = Arc::new(ZOrderTable::default());
    }
}
