//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (row-major over the grid)
//! - No rendering or platform dependencies

pub mod connectivity;
pub mod grid;
pub mod projectile;
pub mod state;
pub mod tick;

pub use connectivity::{
    drop_disconnected, find_cluster, find_disconnected, match_and_clear, pop_cluster,
    sweep_disconnected,
};
pub use grid::{
    BubbleColor, CELL_CENTERS, Grid, GridPos, cell_center, is_valid_cell, neighbor_offsets,
    neighbors, row_width, valid_cells,
};
pub use projectile::Projectile;
pub use state::{GameEvent, GamePhase, GameState, LevelChangeReason, RunResult, TickOutcome};
pub use tick::{Steer, TickInput, tick};
