//! Layout export
//!
//! Writes one JSON document per scene describing where every visible card of
//! the active subset sits, named after the session label and the time of the
//! export.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::board::{Board, PlacedCard};
use crate::catalog::Categories;
use crate::config_file::CanvasLayout;
use crate::error::{PlanboardError, Result};
use crate::persistence::KeyValueStore;
use crate::types::SceneId;

/// Label used when the session has no identifier
pub const UNNAMED: &str = "unnamed";

/// Lowercase ASCII slug of a session label.
///
/// Accented vowels fold to their base letter; everything outside
/// `[a-z0-9_-]` is dropped.
pub fn sanitize_filename(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' | 'ö' | 'ő' => 'o',
            'ú' | 'ü' | 'ű' => 'u',
            other => other,
        })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}

/// `yy.mm.dd_HH.MM.SS-<label>-<scene>.json`
pub fn export_file_name(now: &DateTime<Local>, identifier: &str, scene: SceneId) -> String {
    let mut label = sanitize_filename(identifier);
    if label.is_empty() {
        label = UNNAMED.to_string();
    }
    format!("{}-{}-{}.json", now.format("%y.%m.%d_%H.%M.%S"), label, scene)
}

#[derive(Debug, Serialize)]
struct ExportedCard<'a> {
    #[serde(flatten)]
    card: &'a PlacedCard,
    category: &'a str,
    color: &'a str,
}

#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    identifier: &'a str,
    scene: SceneId,
    subset: &'a str,
    exported_at: String,
    canvas: &'a CanvasLayout,
    areas: &'a [String],
    cards: Vec<ExportedCard<'a>>,
}

/// Export both scenes into `dir`, returning the written paths
pub fn export_scenes<S: KeyValueStore>(
    board: &Board<S>,
    categories: &Categories,
    areas: impl Fn(SceneId) -> Vec<String>,
    dir: &Path,
    now: DateTime<Local>,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| {
        PlanboardError::export(format!("cannot create export directory {:?}: {}", dir, e))
    })?;

    let mut written = Vec::new();
    for scene in SceneId::all() {
        let placed = board.placed_cards(scene);
        let scene_areas = areas(scene);
        let document = ExportDocument {
            identifier: board.identifier(),
            scene,
            subset: board.active_subset().as_str(),
            exported_at: now.to_rfc3339(),
            canvas: board.layout(),
            areas: &scene_areas,
            cards: placed
                .iter()
                .map(|card| ExportedCard {
                    card,
                    category: categories.description(&card.id),
                    color: categories.color(&card.id),
                })
                .collect(),
        };

        let path = dir.join(export_file_name(&now, board.identifier(), scene));
        let json = serde_json::to_string_pretty(&document)?;
        fs::write(&path, json)
            .map_err(|e| PlanboardError::export(format!("cannot write {:?}: {}", path, e)))?;
        info!("Exported scene {} ({} cards) to {:?}", scene, placed.len(), path);
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::persistence::MemoryStore;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap()
    }

    #[test]
    fn test_sanitize_folds_accents_and_drops_symbols() {
        assert_eq!(sanitize_filename("Árvíztűrő Tükörfúrógép"), "arvizturotukorfurogep");
        assert_eq!(sanitize_filename("Team_7 - Blue!"), "team_7-blue");
        assert_eq!(sanitize_filename("???"), "");
    }

    #[test]
    fn test_file_name_format() {
        let now = fixed_time();
        assert_eq!(
            export_file_name(&now, "Kovács Éva", SceneId::Two),
            "24.03.07_09.05.02-kovacseva-2.json"
        );
        assert_eq!(
            export_file_name(&now, "", SceneId::One),
            "24.03.07_09.05.02-unnamed-1.json"
        );
    }

    #[test]
    fn test_export_writes_one_file_per_scene() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::builtin().unwrap();
        let mut board = Board::open(catalog, CanvasLayout::default(), MemoryStore::new());
        board.set_identifier("demo");
        board.pick_next();

        let categories = Categories::builtin().unwrap();
        let paths = export_scenes(
            &board,
            &categories,
            |_| vec!["One".to_string()],
            dir.path(),
            fixed_time(),
        )
        .unwrap();

        assert_eq!(paths.len(), 2);
        let content = fs::read_to_string(&paths[0]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["identifier"], "demo");
        assert_eq!(value["scene"], "1");
        assert_eq!(value["cards"][0]["id"], "101");
        assert_eq!(value["cards"][0]["category"], "Groceries");
        assert_eq!(value["cards"][0]["position"]["x"], 490.0);
    }
}
