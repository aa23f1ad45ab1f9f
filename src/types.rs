//! Core value types for the board
//!
//! Scenes are a closed enumeration; subsets are catalog-defined names wrapped
//! in a newtype so they cannot be confused with card ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Subset every catalog entry without `set`/`sets` belongs to.
pub const DEFAULT_SUBSET: &str = "a";

/// Layout canvas a card can be placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(Serialize, Deserialize, Display, EnumString, EnumIter)]
pub enum SceneId {
    #[default]
    #[serde(rename = "1")]
    #[strum(serialize = "1")]
    One,
    #[serde(rename = "2")]
    #[strum(serialize = "2")]
    Two,
}

impl SceneId {
    /// All scenes in display order
    pub fn all() -> Vec<SceneId> {
        SceneId::iter().collect()
    }

    /// The other scene (scene-toggle shortcut)
    pub fn toggled(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Tab label shown above the canvas
    pub fn title(self) -> String {
        format!("Table {}", self)
    }
}

/// Subset ("active set") identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubsetId(String);

impl SubsetId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The sentinel subset `"a"`
    pub fn default_subset() -> Self {
        Self::new(DEFAULT_SUBSET)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubsetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubsetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Absolute card position in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True for the never-placed `{0,0}` coordinate
    pub fn is_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Relative displacement carried by a completed drag
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Delta {
    pub dx: f64,
    pub dy: f64,
}

impl Delta {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }
}

impl Add<Delta> for Position {
    type Output = Position;

    fn add(self, delta: Delta) -> Position {
        Position::new(self.x + delta.dx, self.y + delta.dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_scene_serializes_as_digit() {
        assert_eq!(serde_json::to_string(&SceneId::One).unwrap(), "\"1\"");
        assert_eq!(serde_json::to_string(&SceneId::Two).unwrap(), "\"2\"");
        assert_eq!(SceneId::from_str("2").unwrap(), SceneId::Two);
        assert!(SceneId::from_str("3").is_err());
    }

    #[test]
    fn test_scene_toggle() {
        assert_eq!(SceneId::One.toggled(), SceneId::Two);
        assert_eq!(SceneId::Two.toggled(), SceneId::One);
        assert_eq!(SceneId::all(), vec![SceneId::One, SceneId::Two]);
    }

    #[test]
    fn test_subset_is_transparent_string() {
        let subset = SubsetId::from("b");
        assert_eq!(serde_json::to_string(&subset).unwrap(), "\"b\"");
        assert_eq!(SubsetId::default_subset().as_str(), "a");
    }

    #[test]
    fn test_position_plus_delta() {
        let pos = Position::new(10.0, 20.0) + Delta::new(-3.0, 2.5);
        assert_eq!(pos, Position::new(7.0, 22.5));
        assert!(Position::ORIGIN.is_origin());
        assert!(!pos.is_origin());
    }
}
