//! Level descriptors and the level-load contract
//!
//! A level pack is JSON: `{ "levels": [ { "name", "theme", "rows": [..] } ] }`.
//! Each row string is one grid row from the top; `.` or space is empty and
//! `1`-`8` is a palette id. Even rows hold up to 8 cells, odd rows up to 7.
//! Packs are validated when parsed, so applying a level never fails.

use std::path::Path;

use serde::Deserialize;

use crate::consts::GRID_ROWS;
use crate::error::{LevelError, Result};
use crate::sim::grid::{BubbleColor, Grid, GridPos, row_width};

/// Built-in campaign
const CAMPAIGN_JSON: &str = include_str!("../levels/campaign.json");

/// Supplies levels to the state machine by 0-based index
pub trait LevelSource {
    fn level_count(&self) -> u32;
    fn level(&self, index: u32) -> Option<&LevelDescriptor>;
}

/// A validated level: initial fill plus an opaque theme selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDescriptor {
    pub name: String,
    /// Background/track selector, forwarded to the driver uninterpreted
    pub theme: String,
    pub fill: Vec<(GridPos, BubbleColor)>,
}

/// Level entry as written in a pack file
#[derive(Debug, Deserialize)]
struct LevelFile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    theme: String,
    #[serde(default)]
    rows: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PackFile {
    levels: Vec<LevelFile>,
}

impl LevelDescriptor {
    /// Parse and validate a fill pattern. `level` is only used in error reports.
    pub fn from_rows(
        level: usize,
        name: impl Into<String>,
        theme: impl Into<String>,
        rows: &[impl AsRef<str>],
    ) -> std::result::Result<Self, LevelError> {
        if rows.len() > GRID_ROWS {
            return Err(LevelError::TooManyRows {
                level,
                rows: rows.len(),
                max: GRID_ROWS,
            });
        }

        let mut fill = Vec::new();
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let len = line.chars().count();
            let max = row_width(row);
            if len > max {
                return Err(LevelError::RowTooLong { level, row, len, max });
            }
            for (col, cell) in line.chars().enumerate() {
                match cell {
                    '.' | ' ' => {}
                    _ => {
                        let color = cell
                            .to_digit(10)
                            .and_then(|d| BubbleColor::from_id(d as u8))
                            .ok_or(LevelError::BadCell { level, row, col, cell })?;
                        fill.push((GridPos::new(col, row), color));
                    }
                }
            }
        }

        Ok(Self {
            name: name.into(),
            theme: theme.into(),
            fill,
        })
    }

    /// Write the fill pattern onto `grid` (which should already be empty)
    pub fn apply(&self, grid: &mut Grid) {
        for &(pos, color) in &self.fill {
            grid.set(pos, Some(color));
        }
    }
}

/// An ordered, non-empty list of levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelPack {
    levels: Vec<LevelDescriptor>,
}

impl LevelPack {
    pub fn new(levels: Vec<LevelDescriptor>) -> Result<Self> {
        if levels.is_empty() {
            return Err(LevelError::EmptyPack.into());
        }
        Ok(Self { levels })
    }

    /// Parse and validate a JSON level pack
    pub fn from_json(json: &str) -> Result<Self> {
        let pack: PackFile = serde_json::from_str(json)?;
        let levels = pack
            .levels
            .iter()
            .enumerate()
            .map(|(i, l)| LevelDescriptor::from_rows(i, &l.name, &l.theme, l.rows.as_slice()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::new(levels)
    }

    /// Load a JSON level pack from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let pack = Self::from_json(&json)?;
        log::info!(
            "Loaded {} levels from {}",
            pack.levels.len(),
            path.as_ref().display()
        );
        Ok(pack)
    }

    /// The campaign shipped with the game
    pub fn builtin() -> Result<Self> {
        Self::from_json(CAMPAIGN_JSON)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDescriptor> {
        self.levels.iter()
    }
}

impl LevelSource for LevelPack {
    fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }

    fn level(&self, index: u32) -> Option<&LevelDescriptor> {
        self.levels.get(index as usize)
    }
}
