//! Game state and core simulation types
//!
//! One `GameState` is one run: the grid, the shooter, lives, level progress and
//! the seeded colour RNG. Only the tick function mutates it during play.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{BubbleColor, Grid, GridPos};
use super::projectile::Projectile;
use crate::consts::*;
use crate::levels::{LevelPack, LevelSource};
use crate::settings::Settings;

/// Current phase of the shooter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting to fire; steering active
    Idle,
    /// Projectile in motion; steering ignored
    Flying,
    /// Projectile has touched down, resolved within the same tick
    Landing,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunResult {
    Won,
    Lost,
}

/// Why the board was reloaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelChangeReason {
    /// A bubble reached the last row; same level, one life fewer
    LifeLost,
    /// Board cleared; next level
    Cleared,
}

/// Per-tick signal read by the driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    Continue,
    LevelChanged {
        level: u32,
        theme: String,
        reason: LevelChangeReason,
    },
    Lost,
    Won,
}

impl From<RunResult> for TickOutcome {
    fn from(result: RunResult) -> Self {
        match result {
            RunResult::Won => TickOutcome::Won,
            RunResult::Lost => TickOutcome::Lost,
        }
    }
}

/// Presentation events (sound, effects). Never read back by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { angle: f32, color: BubbleColor },
    WallBounce,
    Landed { slot: GridPos, color: BubbleColor },
    Popped { count: usize },
    Dropped { count: usize },
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState<L = LevelPack> {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Bubble grid
    pub grid: Grid,
    /// Bumped every time the grid settles into a new final state
    pub grid_revision: u64,
    pub phase: GamePhase,
    /// Only present while `Flying`
    pub projectile: Option<Projectile>,
    /// Shooter angle in degrees (90 = straight up)
    pub aim_degrees: f32,
    /// Colour loaded in the shooter
    pub current_color: BubbleColor,
    /// Preview colour
    pub next_color: BubbleColor,
    pub lives: u8,
    /// Current level (0-based)
    pub level_index: u32,
    /// Theme/track selector of the loaded level, passed through untouched
    pub theme: String,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Set once the run is won or lost
    pub result: Option<RunResult>,
    /// Fire control level on the previous tick (edge detection)
    pub(crate) fire_was_down: bool,
    pub(crate) steer_step: f32,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) levels: L,
    rng: Pcg32,
}

impl<L: LevelSource> GameState<L> {
    /// Start a run at the first level with default settings
    pub fn new(seed: u64, levels: L) -> Self {
        Self::with_settings(seed, &Settings::default(), levels)
    }

    pub fn with_settings(seed: u64, settings: &Settings, levels: L) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let current_color = random_color(&mut rng);
        let next_color = random_color(&mut rng);
        let mut state = Self {
            seed,
            grid: Grid::empty(),
            grid_revision: 0,
            phase: GamePhase::Idle,
            projectile: None,
            aim_degrees: AIM_START_DEGREES,
            current_color,
            next_color,
            lives: settings.starting_lives.max(1),
            level_index: 0,
            theme: String::new(),
            time_ticks: 0,
            result: None,
            fire_was_down: false,
            steer_step: usable_steer_step(settings.steer_step_degrees),
            events: Vec::new(),
            levels,
            rng,
        };
        state.load_level();
        state
    }

    /// Reset the grid to the current level's fill pattern
    pub fn load_level(&mut self) {
        self.grid.clear();
        match self.levels.level(self.level_index) {
            Some(level) => {
                level.apply(&mut self.grid);
                self.theme = level.theme.clone();
                log::info!(
                    "Level {} '{}' loaded ({} bubbles, theme {})",
                    self.level_index + 1,
                    level.name,
                    self.grid.occupied_count(),
                    self.theme
                );
            }
            None => log::warn!("No level at index {}, starting empty", self.level_index),
        }
        self.grid_revision += 1;
    }

    pub fn levels(&self) -> &L {
        &self.levels
    }

    pub fn level_count(&self) -> u32 {
        self.levels.level_count()
    }
}

impl<L> GameState<L> {
    /// Aim change per steering tick, in degrees
    pub fn steer_step(&self) -> f32 {
        self.steer_step
    }

    /// Draw a palette colour from the run RNG
    pub fn roll_color(&mut self) -> BubbleColor {
        random_color(&mut self.rng)
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    /// Any bubble in the bottom row
    pub fn last_row_occupied(&self) -> bool {
        self.grid.row_occupied(GRID_ROWS - 1)
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

fn random_color(rng: &mut Pcg32) -> BubbleColor {
    BubbleColor::ALL[rng.random_range(0..BubbleColor::ALL.len())]
}

/// Steering step limited to a positive value no wider than the aim range
fn usable_steer_step(step: f32) -> f32 {
    if step.is_finite() && step > 0.0 {
        step.min(AIM_MAX_DEGREES - AIM_MIN_DEGREES)
    } else {
        log::warn!("Invalid steer step {}, using {}", step, STEER_STEP_DEGREES);
        STEER_STEP_DEGREES
    }
}
