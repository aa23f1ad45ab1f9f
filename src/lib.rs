//! Planboard library
//!
//! Cards are picked from a catalog onto two planning tables ("scenes") and
//! arranged by dragging. Each card set ("subset") keeps its own pick state,
//! positions and stacking order, mirrored into durable key-value storage.

pub mod app;
pub mod board;
pub mod catalog;
pub mod cli;
pub mod components;
pub mod config_file;
pub mod engine;
pub mod error;
pub mod export;
pub mod persistence;
pub mod theme;
pub mod types;
pub mod ui;

// Re-export main types for convenience
pub use board::{Board, Notice, NoticeLevel, PlacedCard, UndoOutcome};
pub use catalog::{Catalog, CatalogEntry, Categories, Category};
pub use config_file::{BoardConfig, CanvasLayout};
pub use engine::placement::{Card, CardCollection, LoadSource, PlacementStore};
pub use engine::z_order::{ZOrderTable, ZOrderTracker};
pub use error::{PlanboardError, Result};
pub use persistence::{FileStore, KeyValueStore, MemoryStore};
pub use types::{Delta, Position, SceneId, SubsetId};
