//! The in-flight bubble
//!
//! Constant-speed straight-line motion, one fixed increment per tick, with an
//! elastic bounce off the two side walls. No substeps, no interpolation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::{BubbleColor, CELL_CENTERS, Grid};
use crate::consts::*;
use crate::{aim_direction, clamp_aim};

/// A fired bubble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Centre in screen space (y grows downward)
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: BubbleColor,
}

impl Projectile {
    /// Launch from the shooter muzzle at `angle_degrees` (clamped to the aim range)
    pub fn spawn(angle_degrees: f32, color: BubbleColor) -> Self {
        Self {
            pos: Vec2::new(SPAWN_X, SPAWN_Y),
            vel: aim_direction(clamp_aim(angle_degrees)) * PROJECTILE_SPEED,
            color,
        }
    }

    /// Advance one tick
    #[inline]
    pub fn step(&mut self) {
        self.pos += self.vel;
    }

    /// Reverse horizontal velocity once the centre reaches a side wall.
    /// Returns true if it bounced.
    pub fn apply_wall_bounce(&mut self) -> bool {
        if self.pos.x <= WALL_LEFT || self.pos.x >= WALL_RIGHT {
            self.vel.x = -self.vel.x;
            return true;
        }
        false
    }

    pub fn at_ceiling(&self) -> bool {
        self.pos.y <= CEILING_Y
    }

    /// True if the centre is within `SNAP_RADIUS` of any occupied cell centre
    pub fn touches_bubble(&self, grid: &Grid) -> bool {
        grid.occupied().any(|(pos, _)| {
            CELL_CENTERS[pos.row][pos.col]
                .is_some_and(|center| self.pos.distance(center) <= SNAP_RADIUS)
        })
    }

    pub fn has_landed(&self, grid: &Grid) -> bool {
        self.at_ceiling() || self.touches_bubble(grid)
    }
}
