//! Connected-component passes over the bubble grid
//!
//! Both passes walk the hex adjacency from `grid::neighbors`:
//! - match: the same-colour cluster around a freshly placed bubble
//! - sweep: everything still hanging from the ceiling row

use std::collections::VecDeque;

use super::grid::{Grid, GridPos, neighbors};
use crate::consts::*;

type Visited = [[bool; GRID_COLS]; GRID_ROWS];

/// Same-colour cluster containing `origin` (empty if the origin is empty)
pub fn find_cluster(grid: &Grid, origin: GridPos) -> Vec<GridPos> {
    let Some(color) = grid.get(origin) else {
        return Vec::new();
    };

    let mut visited: Visited = [[false; GRID_COLS]; GRID_ROWS];
    let mut cluster = Vec::new();
    let mut queue = VecDeque::from([origin]);
    visited[origin.row][origin.col] = true;

    while let Some(pos) = queue.pop_front() {
        cluster.push(pos);
        for n in neighbors(pos) {
            if !visited[n.row][n.col] && grid.get(n) == Some(color) {
                visited[n.row][n.col] = true;
                queue.push_back(n);
            }
        }
    }

    cluster
}

/// Pop the cluster at `origin` if it is at least `MATCH_THRESHOLD` big.
///
/// Returns the number of bubbles cleared (0 leaves the grid untouched).
pub fn pop_cluster(grid: &mut Grid, origin: GridPos) -> usize {
    let cluster = find_cluster(grid, origin);
    if cluster.len() < MATCH_THRESHOLD {
        return 0;
    }
    for &pos in &cluster {
        grid.set(pos, None);
    }
    cluster.len()
}

/// Match-and-clear at `origin`; true if a cluster was popped
pub fn match_and_clear(grid: &mut Grid, origin: GridPos) -> bool {
    pop_cluster(grid, origin) > 0
}

/// Occupied cells with no path to the ceiling row, row-major
pub fn find_disconnected(grid: &Grid) -> Vec<GridPos> {
    let mut reachable: Visited = [[false; GRID_COLS]; GRID_ROWS];
    let mut queue: VecDeque<GridPos> = grid
        .occupied()
        .map(|(pos, _)| pos)
        .take_while(|pos| pos.row == 0)
        .collect();
    for pos in &queue {
        reachable[pos.row][pos.col] = true;
    }

    while let Some(pos) = queue.pop_front() {
        for n in neighbors(pos) {
            if !reachable[n.row][n.col] && grid.is_occupied(n) {
                reachable[n.row][n.col] = true;
                queue.push_back(n);
            }
        }
    }

    grid.occupied()
        .map(|(pos, _)| pos)
        .filter(|pos| !reachable[pos.row][pos.col])
        .collect()
}

/// Drop every bubble not connected to the ceiling. Returns how many fell.
pub fn drop_disconnected(grid: &mut Grid) -> usize {
    let orphans = find_disconnected(grid);
    for &pos in &orphans {
        grid.set(pos, None);
    }
    orphans.len()
}

/// Ceiling-reachability sweep; true if anything was cleared
pub fn sweep_disconnected(grid: &mut Grid) -> bool {
    drop_disconnected(grid) > 0
}
