//! Hex-staggered bubble grid
//!
//! The hexagonal board is packed into a `GRID_ROWS x GRID_COLS` array. Even rows
//! use every column; odd rows are shifted right by half a bubble and lose their
//! last column. Cell validity depends only on (col, row) and never changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// The fixed bubble palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BubbleColor {
    Blue,
    Green,
    Grey,
    Orange,
    Purple,
    Yellow,
    Red,
    White,
}

impl BubbleColor {
    /// Every palette entry, in id order
    pub const ALL: [BubbleColor; 8] = [
        BubbleColor::Blue,
        BubbleColor::Green,
        BubbleColor::Grey,
        BubbleColor::Orange,
        BubbleColor::Purple,
        BubbleColor::Yellow,
        BubbleColor::Red,
        BubbleColor::White,
    ];

    /// Stable palette id (1-8)
    pub fn id(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id).checked_sub(1)?).copied()
    }
}

/// A slot address in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub col: usize,
    pub row: usize,
}

impl GridPos {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Number of usable columns in a row
#[inline]
pub const fn row_width(row: usize) -> usize {
    if row % 2 == 0 { GRID_COLS } else { GRID_COLS - 1 }
}

/// Bounds check plus the odd-row rule. Takes signed input so neighbour
/// offsets can be tested before conversion.
#[inline]
pub const fn is_valid_cell(col: i32, row: i32) -> bool {
    if row < 0 || col < 0 || row >= GRID_ROWS as i32 {
        return false;
    }
    (col as usize) < row_width(row as usize)
}

const fn compute_center(col: usize, row: usize) -> Vec2 {
    let origin_x = if row % 2 == 0 {
        EVEN_ROW_ORIGIN_X
    } else {
        ODD_ROW_ORIGIN_X
    };
    Vec2::new(
        origin_x + BUBBLE_SIZE * col as f32,
        ROW_ORIGIN_Y + ROW_SPACING * row as f32,
    )
}

const fn build_centers() -> [[Option<Vec2>; GRID_COLS]; GRID_ROWS] {
    let mut table = [[None; GRID_COLS]; GRID_ROWS];
    let mut row = 0;
    while row < GRID_ROWS {
        let mut col = 0;
        while col < row_width(row) {
            table[row][col] = Some(compute_center(col, row));
            col += 1;
        }
        row += 1;
    }
    table
}

/// Precomputed cell centres, `None` for the dead slot at the end of odd rows
pub static CELL_CENTERS: [[Option<Vec2>; GRID_COLS]; GRID_ROWS] = build_centers();

/// Centre of a cell in screen space, or `None` for an invalid cell
#[inline]
pub fn cell_center(col: i32, row: i32) -> Option<Vec2> {
    if !is_valid_cell(col, row) {
        return None;
    }
    CELL_CENTERS[row as usize][col as usize]
}

/// The six (dCol, dRow) hex offsets for a row.
///
/// Even rows sit half a bubble left of odd rows, so their diagonal
/// neighbours lean left; odd rows lean right.
pub const fn neighbor_offsets(row: usize) -> [(i32, i32); 6] {
    let lean = if row % 2 == 0 { -1 } else { 1 };
    [(1, 0), (-1, 0), (0, -1), (lean, -1), (0, 1), (lean, 1)]
}

/// Valid cells adjacent to (col, row). Offsets that leave the board are dropped.
pub fn neighbors(pos: GridPos) -> Vec<GridPos> {
    let mut out = Vec::with_capacity(6);
    let (col, row) = (pos.col as i32, pos.row as i32);
    for (dc, dr) in neighbor_offsets(pos.row) {
        let (nc, nr) = (col + dc, row + dr);
        if is_valid_cell(nc, nr) {
            out.push(GridPos::new(nc as usize, nr as usize));
        }
    }
    out
}

/// Iterate all valid cells in row-major order
pub fn valid_cells() -> impl Iterator<Item = GridPos> {
    (0..GRID_ROWS).flat_map(|row| (0..row_width(row)).map(move |col| GridPos::new(col, row)))
}

/// Bubble grid contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GridCells")]
pub struct Grid {
    cells: [[Option<BubbleColor>; GRID_COLS]; GRID_ROWS],
}

/// Grid as read from a snapshot, before dead slots are cleared
#[derive(Deserialize)]
struct GridCells {
    cells: [[Option<BubbleColor>; GRID_COLS]; GRID_ROWS],
}

impl From<GridCells> for Grid {
    fn from(raw: GridCells) -> Self {
        let mut cells = raw.cells;
        for (row, line) in cells.iter_mut().enumerate() {
            for (col, cell) in line.iter_mut().enumerate().skip(row_width(row)) {
                if let Some(color) = cell.take() {
                    log::warn!("Dropping {:?} from dead slot ({}, {})", color, col, row);
                }
            }
        }
        Self { cells }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    /// A grid with every cell empty
    pub fn empty() -> Self {
        Self {
            cells: [[None; GRID_COLS]; GRID_ROWS],
        }
    }

    /// Contents of a cell (`None` for empty or invalid)
    pub fn get(&self, pos: GridPos) -> Option<BubbleColor> {
        if !is_valid_cell(pos.col as i32, pos.row as i32) {
            return None;
        }
        self.cells[pos.row][pos.col]
    }

    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.get(pos).is_some()
    }

    /// Write a cell. Writes to invalid cells are ignored and return false.
    pub fn set(&mut self, pos: GridPos, value: Option<BubbleColor>) -> bool {
        if !is_valid_cell(pos.col as i32, pos.row as i32) {
            log::warn!("Ignoring write to invalid cell ({}, {})", pos.col, pos.row);
            return false;
        }
        self.cells[pos.row][pos.col] = value;
        true
    }

    pub fn clear(&mut self) {
        self.cells = [[None; GRID_COLS]; GRID_ROWS];
    }

    /// Occupied cells with their colours, row-major
    pub fn occupied(&self) -> impl Iterator<Item = (GridPos, BubbleColor)> + '_ {
        valid_cells().filter_map(|pos| self.get(pos).map(|color| (pos, color)))
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied().count()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied().next().is_none()
    }

    /// True if any cell of `row` holds a bubble
    pub fn row_occupied(&self, row: usize) -> bool {
        row < GRID_ROWS && self.cells[row][..row_width(row)].iter().any(Option::is_some)
    }

    /// Read-only rows for rendering; odd rows are trimmed to their valid width
    pub fn rows(&self) -> impl Iterator<Item = &[Option<BubbleColor>]> {
        self.cells
            .iter()
            .enumerate()
            .map(|(row, cells)| &cells[..row_width(row)])
    }

    /// Empty cell whose centre is closest to `point`.
    ///
    /// Ties keep the first cell in row-major order. Returns `None` only when
    /// the grid is full.
    pub fn nearest_empty_cell(&self, point: Vec2) -> Option<GridPos> {
        let mut best: Option<(GridPos, f32)> = None;
        for pos in valid_cells() {
            if self.is_occupied(pos) {
                continue;
            }
            let Some(center) = CELL_CENTERS[pos.row][pos.col] else {
                continue;
            };
            let dist = point.distance(center);
            if best.is_none_or(|(_, best_dist)| dist < best_dist) {
                best = Some((pos, dist));
            }
        }
        best.map(|(pos, _)| pos)
    }
}
