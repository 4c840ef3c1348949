//! Board preferences persisted in the `~/.huntl/rc` config file.
//!
//! The board reads these once at startup and writes them back when the user
//! toggles a setting; the board code itself never touches the filesystem.

use anyhow::{Context, Result};
use std::path::Path;

/// Wide-viewport board layout preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Single scrollable row of columns
    Horizontal,
    /// Columns wrapped into a multi-row grid
    Grid,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Horizontal => "horizontal",
            ViewMode::Grid => "grid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "horizontal" => Some(ViewMode::Horizontal),
            "grid" => Some(ViewMode::Grid),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ViewMode::Horizontal => ViewMode::Grid,
            ViewMode::Grid => ViewMode::Horizontal,
        }
    }
}

/// Card height preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Density {
    Normal,
    Compact,
}

impl Density {
    pub fn as_str(&self) -> &'static str {
        match self {
            Density::Normal => "normal",
            Density::Compact => "compact",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "normal" => Some(Density::Normal),
            "compact" => Some(Density::Compact),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Density::Normal => Density::Compact,
            Density::Compact => Density::Normal,
        }
    }
}

/// User preferences for the pipeline board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardPrefs {
    pub view_mode: ViewMode,
    pub density: Density,
}

impl Default for BoardPrefs {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Horizontal,
            density: Density::Normal,
        }
    }
}

impl BoardPrefs {
    /// Load preferences from the rc file. Missing file or unknown values
    /// fall back to defaults.
    pub fn load(rc_path: &Path) -> Self {
        let mut prefs = Self::default();
        let Ok(config) = std::fs::read_to_string(rc_path) else {
            return prefs;
        };
        for line in config.lines() {
            let line = line.trim();
            if let Some(value) = line.strip_prefix("board.view=") {
                if let Some(mode) = ViewMode::from_str(value) {
                    prefs.view_mode = mode;
                }
            } else if let Some(value) = line.strip_prefix("board.density=") {
                if let Some(density) = Density::from_str(value) {
                    prefs.density = density;
                }
            }
        }
        prefs
    }

    /// Write preferences back, preserving unrelated rc lines
    /// (e.g. `data.location=`).
    pub fn save(&self, rc_path: &Path) -> Result<()> {
        let existing = std::fs::read_to_string(rc_path).unwrap_or_default();
        let mut lines: Vec<String> = existing
            .lines()
            .filter(|l| {
                let l = l.trim();
                !l.starts_with("board.view=") && !l.starts_with("board.density=")
            })
            .map(str::to_string)
            .collect();
        lines.push(format!("board.view={}", self.view_mode.as_str()));
        lines.push(format!("board.density={}", self.density.as_str()));

        if let Some(parent) = rc_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(rc_path, lines.join("\n") + "\n")
            .with_context(|| format!("Failed to write config: {}", rc_path.display()))
    }
}
