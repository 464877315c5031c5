//! Bubble Burst - a hex-grid match-3 bubble shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, matching, projectile, state machine)
//! - `levels`: Level descriptors and the level-load contract
//! - `scene`: Intro / game / game-over scenes behind one interface
//! - `settings`: Run configuration

pub mod error;
pub mod levels;
pub mod scene;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use levels::{LevelDescriptor, LevelPack, LevelSource};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Grid dimensions (odd rows only use `GRID_COLS - 1` slots)
    pub const GRID_COLS: usize = 8;
    pub const GRID_ROWS: usize = 12;

    /// Bubble diameter, also the horizontal cell pitch
    pub const BUBBLE_SIZE: f32 = 32.0;
    /// Centre x of column 0 on even rows
    pub const EVEN_ROW_ORIGIN_X: f32 = 206.0;
    /// Centre x of column 0 on odd rows (shifted by half a bubble)
    pub const ODD_ROW_ORIGIN_X: f32 = EVEN_ROW_ORIGIN_X + BUBBLE_SIZE / 2.0;
    /// Centre y of row 0
    pub const ROW_ORIGIN_Y: f32 = 61.0;
    /// Vertical distance between row centres
    pub const ROW_SPACING: f32 = 28.0;

    /// Shooter muzzle (projectile centre at spawn)
    pub const SPAWN_X: f32 = 318.0;
    pub const SPAWN_Y: f32 = 395.0;
    /// Projectile speed, units per tick
    pub const PROJECTILE_SPEED: f32 = 6.0;

    /// Side walls: centre x at or beyond these reverses horizontal velocity
    pub const WALL_LEFT: f32 = 206.0;
    pub const WALL_RIGHT: f32 = 436.0;
    /// Centre y at or above this lands the projectile
    pub const CEILING_Y: f32 = 64.0;
    /// Centre-to-centre distance that counts as touching an occupied cell
    pub const SNAP_RADIUS: f32 = 35.0;

    /// Aim limits in degrees (90 = straight up)
    pub const AIM_MIN_DEGREES: f32 = 30.0;
    pub const AIM_MAX_DEGREES: f32 = 150.0;
    pub const AIM_START_DEGREES: f32 = 90.0;
    /// Default aim change per tick while steering
    pub const STEER_STEP_DEGREES: f32 = 1.0;

    /// Lives at the start of a run
    pub const STARTING_LIVES: u8 = 3;
    /// Smallest same-colour cluster that pops
    pub const MATCH_THRESHOLD: usize = 3;
}

/// Clamp an aim angle to the shooter's range
#[inline]
pub fn clamp_aim(degrees: f32) -> f32 {
    degrees.clamp(consts::AIM_MIN_DEGREES, consts::AIM_MAX_DEGREES)
}

/// Unit direction for an aim angle in screen space (y grows downward)
#[inline]
pub fn aim_direction(degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(cos, -sin)
}
