//! Board configuration file handling.
//!
//! The configuration holds the canvas geometry used by the first-drop rule
//! and the drag clamp, plus the labels drawn behind each scene. A missing
//! file means "use the defaults".

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::types::{Delta, Position, SceneId};

/// Canvas geometry in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasLayout {
    pub width: f64,
    pub height: f64,
    pub card_width: f64,
    pub card_height: f64,
    /// Distance from the bottom edge at which newly picked cards land
    pub drop_bottom_offset: f64,
}

impl Default for CanvasLayout {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            card_width: 220.0,
            card_height: 80.0,
            drop_bottom_offset: 90.0,
        }
    }
}

impl CanvasLayout {
    /// Horizontally centered, near the bottom of the canvas
    pub fn initial_drop_position(&self) -> Position {
        Position::new(
            self.width / 2.0 - self.card_width / 2.0,
            self.height - self.drop_bottom_offset,
        )
    }

    /// Shrink `delta` so a card at `from` stays inside the canvas.
    ///
    /// A card that already sits outside the canvas may move back in but
    /// never further out.
    pub fn clamp_delta(&self, from: Position, delta: Delta) -> Delta {
        let max_x = (self.width - self.card_width).max(0.0);
        let max_y = (self.height - self.card_height).max(0.0);
        Delta::new(
            clamp_axis(from.x, delta.dx, max_x),
            clamp_axis(from.y, delta.dy, max_y),
        )
    }
}

fn clamp_axis(from: f64, delta: f64, max: f64) -> f64 {
    let target = from + delta;
    let lo = from.min(0.0);
    let hi = from.max(max);
    target.clamp(lo, hi) - from
}

/// Top-level board configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub canvas: CanvasLayout,
    /// Area labels drawn as horizontal bands behind scene 1
    pub scene_one_areas: Vec<String>,
    /// Area labels drawn as horizontal bands behind scene 2
    pub scene_two_areas: Vec<String>,
    /// Show id and category on every card at startup
    pub show_card_info: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasLayout::default(),
            scene_one_areas: ["One", "Two", "Three", "Four"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            scene_two_areas: ["Five", "Six", "Seven", "Eight", "Nine"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            show_card_info: false,
        }
    }
}

impl BoardConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let canvas = &self.canvas;
        for (name, value) in [
            ("canvas.width", canvas.width),
            ("canvas.height", canvas.height),
            ("canvas.card_width", canvas.card_width),
            ("canvas.card_height", canvas.card_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                anyhow::bail!("{} must be a positive number", name);
            }
        }

        if canvas.card_width > canvas.width {
            anyhow::bail!("Cards must not be wider than the canvas");
        }
        if canvas.card_height > canvas.height {
            anyhow::bail!("Cards must not be taller than the canvas");
        }

        if !canvas.drop_bottom_offset.is_finite()
            || canvas.drop_bottom_offset < 0.0
            || canvas.drop_bottom_offset > canvas.height
        {
            anyhow::bail!("canvas.drop_bottom_offset must lie within the canvas height");
        }

        Ok(())
    }

    /// Background area labels for a scene
    pub fn areas(&self, scene: SceneId) -> &[String] {
        match scene {
            SceneId::One => &self.scene_one_areas,
            SceneId::Two => &self.scene_two_areas,
        }
    }
}
