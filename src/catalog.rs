//! Static card catalog and category table
//!
//! The catalog only seeds the board on first run (and after a reset). Entries
//! may declare their subset membership as `sets` (array), `set` (string or
//! array), or not at all, in which case they land in the default subset.

use anyhow::{Context, Result as AnyResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::{PlanboardError, Result};
use crate::types::SubsetId;

const BUILTIN_CARDS: &str = include_str!("../data/cards.json");
const BUILTIN_CATEGORIES: &str = include_str!("../data/categories.json");

/// Colour used for cards whose category is not in the table
pub const FALLBACK_COLOR: &str = "#F2F6FA";
/// Description used for cards whose category is not in the table
pub const FALLBACK_DESC: &str = "N/A";

/// Card ids are strings, but hand-written catalogs often use bare numbers
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawSet {
    One(String),
    Many(Vec<String>),
}

/// Catalog record exactly as it appears on disk
#[derive(Debug, Clone, Deserialize)]
struct RawEntry {
    id: RawId,
    text: String,
    #[serde(default)]
    set: Option<RawSet>,
    #[serde(default)]
    sets: Option<Vec<String>>,
}

impl RawEntry {
    fn normalize(self) -> CatalogEntry {
        let names = match (self.sets, self.set) {
            (Some(sets), _) => sets,
            (None, Some(RawSet::Many(sets))) => sets,
            (None, Some(RawSet::One(set))) => vec![set],
            (None, None) => Vec::new(),
        };

        let mut sets: Vec<SubsetId> = Vec::new();
        for name in names {
            let subset = SubsetId::new(name);
            if !sets.contains(&subset) {
                sets.push(subset);
            }
        }
        if sets.is_empty() {
            sets.push(SubsetId::default_subset());
        }

        CatalogEntry {
            id: self.id.into_string(),
            text: self.text,
            sets,
        }
    }
}

/// A normalized catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub text: String,
    /// Never empty
    pub sets: Vec<SubsetId>,
}

/// Ordered list of catalog entries; order is the pick order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from already-normalized entries
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        let catalog = Self { entries };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CARDS)
    }

    /// Parse a catalog from its JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<RawEntry> = serde_json::from_str(json)?;
        Self::new(raw.into_iter().map(RawEntry::normalize).collect())
    }

    /// Load a catalog from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AnyResult<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog from {:?}", path.as_ref()))?;
        let catalog = Self::from_json(&content)
            .with_context(|| format!("Failed to parse catalog {:?}", path.as_ref()))?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if entry.id.trim().is_empty() {
                return Err(PlanboardError::catalog("card id must not be empty"));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(PlanboardError::catalog(format!(
                    "duplicate card id '{}'",
                    entry.id
                )));
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One row of the category table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub desc: String,
    pub color: String,
    pub border_color: String,
}

/// Category table keyed by `floor(card id / 100)`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Categories(BTreeMap<String, Category>);

impl Categories {
    /// The category table shipped with the binary
    pub fn builtin() -> Result<Self> {
        Ok(serde_json::from_str(BUILTIN_CATEGORIES)?)
    }

    /// Load a category table from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AnyResult<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read categories from {:?}", path.as_ref()))?;
        serde_json::from_str(&content).context("Failed to parse categories JSON")
    }

    /// Category key for a card id, e.g. `"305"` -> `"3"`
    pub fn key_for(card_id: &str) -> Option<String> {
        let value: f64 = card_id.trim().parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(((value / 100.0).floor() as i64).to_string())
    }

    pub fn get(&self, card_id: &str) -> Option<&Category> {
        Self::key_for(card_id).and_then(|key| self.0.get(&key))
    }

    pub fn description(&self, card_id: &str) -> &str {
        self.get(card_id)
            .map(|c| c.desc.as_str())
            .unwrap_or(FALLBACK_DESC)
    }

    pub fn color(&self, card_id: &str) -> &str {
        self.get(card_id)
            .map(|c| c.color.as_str())
            .unwrap_or(FALLBACK_COLOR)
    }

    pub fn border_color(&self, card_id: &str) -> &str {
        self.get(card_id)
            .map(|c| c.border_color.as_str())
            .unwrap_or(FALLBACK_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = Catalog::builtin().expect("builtin catalog");
        assert!(!catalog.is_empty());
        assert!(catalog.entries().iter().all(|e| !e.sets.is_empty()));
    }

    #[test]
    fn test_set_field_variants() {
        let catalog = Catalog::from_json(
            r#"[
                {"id": "1", "text": "plural", "sets": ["a", "b"]},
                {"id": "2", "text": "singular", "set": "b"},
                {"id": "3", "text": "singular array", "set": ["c", "a"]},
                {"id": 4, "text": "none"}
            ]"#,
        )
        .unwrap();

        let sets: Vec<Vec<&str>> = catalog
            .entries()
            .iter()
            .map(|e| e.sets.iter().map(SubsetId::as_str).collect())
            .collect();
        assert_eq!(sets, vec![vec!["a", "b"], vec!["b"], vec!["c", "a"], vec!["a"]]);
        assert_eq!(catalog.entries()[3].id, "4");
    }

    #[test]
    fn test_sets_takes_precedence_over_set() {
        let catalog =
            Catalog::from_json(r#"[{"id": "1", "text": "t", "set": "x", "sets": ["y"]}]"#).unwrap();
        assert_eq!(catalog.entries()[0].sets, vec![SubsetId::from("y")]);
    }

    #[test]
    fn test_empty_sets_falls_back_to_default() {
        let catalog = Catalog::from_json(r#"[{"id": "1", "text": "t", "sets": []}]"#).unwrap();
        assert_eq!(catalog.entries()[0].sets, vec![SubsetId::default_subset()]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Catalog::from_json(
            r#"[{"id": "1", "text": "a"}, {"id": "1", "text": "b"}]"#,
        );
        assert!(matches!(result, Err(PlanboardError::Catalog(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": "7", "text": "seven", "set": "q"}}]"#).unwrap();
        let catalog = Catalog::load_from_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(Catalog::load_from_file("/nonexistent/catalog.json").is_err());
    }

    #[test]
    fn test_category_lookup() {
        let categories = Categories::builtin().unwrap();
        assert_eq!(Categories::key_for("305").as_deref(), Some("3"));
        assert_eq!(Categories::key_for("42").as_deref(), Some("0"));
        assert_eq!(Categories::key_for("abc"), None);
        assert_eq!(categories.description("101"), "Groceries");
        assert_eq!(categories.description("abc"), FALLBACK_DESC);
        assert_eq!(categories.color("999"), FALLBACK_COLOR);
    }
}
