//! Fixed-step simulation tick
//!
//! One call per rendered frame. Landing is resolved synchronously inside the
//! tick that detects it, in a fixed order: snap, match, sweep, refresh,
//! rotate colours, and only then the last-row / cleared-board checks.

use serde::{Deserialize, Serialize};

use super::connectivity::{drop_disconnected, pop_cluster};
use super::projectile::Projectile;
use super::state::{GameEvent, GamePhase, GameState, LevelChangeReason, RunResult, TickOutcome};
use crate::clamp_aim;
use crate::levels::LevelSource;

/// Steering direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steer {
    /// Rotate toward 150 degrees (left)
    Increase,
    /// Rotate toward 30 degrees (right)
    Decrease,
}

/// Input sampled by the driver once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Fire control currently held (level, not edge)
    pub fire: bool,
    /// Steering held this tick
    pub steer: Option<Steer>,
}

/// Advance the game state by one tick
pub fn tick<L: LevelSource>(state: &mut GameState<L>, input: &TickInput) -> TickOutcome {
    if let Some(result) = state.result {
        return result.into();
    }

    state.time_ticks += 1;

    // Steering is ignored while a shot is in the air
    if state.phase != GamePhase::Flying {
        if let Some(steer) = input.steer {
            let delta = match steer {
                Steer::Increase => state.steer_step,
                Steer::Decrease => -state.steer_step,
            };
            state.aim_degrees = clamp_aim(state.aim_degrees + delta);
        }
    }

    // Fire only on the press, never while held
    let fire_pressed = input.fire && !state.fire_was_down;
    state.fire_was_down = input.fire;

    if state.phase == GamePhase::Idle && fire_pressed {
        state.projectile = Some(Projectile::spawn(state.aim_degrees, state.current_color));
        state.phase = GamePhase::Flying;
        state.events.push(GameEvent::Fired {
            angle: state.aim_degrees,
            color: state.current_color,
        });
        log::debug!("Fired {:?} at {} degrees", state.current_color, state.aim_degrees);
    }

    if state.phase == GamePhase::Flying {
        match state.projectile.as_mut() {
            Some(projectile) => {
                projectile.step();
                if projectile.apply_wall_bounce() {
                    state.events.push(GameEvent::WallBounce);
                }
                if projectile.has_landed(&state.grid) {
                    state.phase = GamePhase::Landing;
                }
            }
            None => state.phase = GamePhase::Idle,
        }
    }

    if state.phase == GamePhase::Landing {
        return resolve_landing(state);
    }

    TickOutcome::Continue
}

/// Settle a landed projectile into the grid and decide what happens next
fn resolve_landing<L: LevelSource>(state: &mut GameState<L>) -> TickOutcome {
    state.phase = GamePhase::Idle;
    let Some(projectile) = state.projectile.take() else {
        return TickOutcome::Continue;
    };

    // 1. Snap, 2. match
    match state.grid.nearest_empty_cell(projectile.pos) {
        Some(slot) => {
            state.grid.set(slot, Some(projectile.color));
            state.events.push(GameEvent::Landed {
                slot,
                color: projectile.color,
            });
            let popped = pop_cluster(&mut state.grid, slot);
            if popped > 0 {
                state.events.push(GameEvent::Popped { count: popped });
            }
            log::debug!(
                "Landed {:?} at ({}, {}), popped {}",
                projectile.color,
                slot.col,
                slot.row,
                popped
            );
        }
        None => log::warn!("Grid full, discarding shot"),
    }

    // 3. Sweep whatever the match left hanging
    let dropped = drop_disconnected(&mut state.grid);
    if dropped > 0 {
        state.events.push(GameEvent::Dropped { count: dropped });
        log::debug!("Dropped {} disconnected bubbles", dropped);
    }

    // 4. Grid is final for this landing
    state.grid_revision += 1;

    // 5. Rotate shooter colours
    state.current_color = state.next_color;
    state.next_color = state.roll_color();

    // 6. Terminal checks, after popping so a last-row match is forgiven
    if state.last_row_occupied() {
        if state.lives > 1 {
            state.lives -= 1;
            log::info!("Bubble reached the last row, {} lives left", state.lives);
            state.load_level();
            return level_changed(state, LevelChangeReason::LifeLost);
        }
        state.lives = 0;
        return finish(state, RunResult::Lost);
    }

    if state.grid.is_empty() {
        state.level_index += 1;
        if state.level_index >= state.level_count() {
            return finish(state, RunResult::Won);
        }
        state.load_level();
        state.current_color = state.roll_color();
        state.next_color = state.roll_color();
        return level_changed(state, LevelChangeReason::Cleared);
    }

    TickOutcome::Continue
}

fn level_changed<L>(state: &GameState<L>, reason: LevelChangeReason) -> TickOutcome {
    TickOutcome::LevelChanged {
        level: state.level_index,
        theme: state.theme.clone(),
        reason,
    }
}

fn finish<L>(state: &mut GameState<L>, result: RunResult) -> TickOutcome {
    log::info!(
        "Run over: {:?} on level {} after {} ticks",
        result,
        state.level_index + 1,
        state.time_ticks
    );
    state.result = Some(result);
    result.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::levels::{LevelDescriptor, LevelPack};
    use crate::sim::grid::{BubbleColor, CELL_CENTERS, GridPos};

    const FIRE: TickInput = TickInput {
        fire: true,
        steer: None,
    };
    const IDLE: TickInput = TickInput {
        fire: false,
        steer: None,
    };

    fn pack(levels: &[&[&str]]) -> LevelPack {
        LevelPack::new(
            levels
                .iter()
                .enumerate()
                .map(|(i, &rows)| {
                    LevelDescriptor::from_rows(i, format!("L{i}"), format!("theme-{i}"), rows).unwrap()
                })
                .collect(),
        )
        .unwrap()
    }

    /// Put a projectile of `color` right on top of `slot` so the next tick lands it there
    fn drop_in(state: &mut GameState, slot: GridPos, color: BubbleColor) {
        let mut projectile = Projectile::spawn(90.0, color);
        projectile.pos = CELL_CENTERS[slot.row][slot.col].unwrap() - projectile.vel;
        state.projectile = Some(projectile);
        state.phase = GamePhase::Flying;
    }

    fn run_until_landed(state: &mut GameState) -> TickOutcome {
        for _ in 0..1000 {
            let outcome = tick(state, &IDLE);
            if state.phase == GamePhase::Idle {
                return outcome;
            }
        }
        panic!("projectile never landed");
    }

    #[test]
    fn test_fire_is_edge_triggered() {
        let mut state = GameState::new(1, pack(&[&["12345678"]]));
        tick(&mut state, &FIRE);
        assert_eq!(state.phase, GamePhase::Flying);

        let outcome = run_until_landed(&mut state);
        assert_eq!(outcome, TickOutcome::Continue);

        // Still holding fire from the first shot: nothing happens
        let mut held = GameState::new(1, pack(&[&["12345678"]]));
        tick(&mut held, &FIRE);
        while held.phase == GamePhase::Flying {
            tick(&mut held, &FIRE);
        }
        for _ in 0..10 {
            tick(&mut held, &FIRE);
        }
        assert_eq!(held.phase, GamePhase::Idle);
        assert!(held.projectile.is_none());

        // Release then press fires again
        tick(&mut held, &IDLE);
        tick(&mut held, &FIRE);
        assert_eq!(held.phase, GamePhase::Flying);
    }

    #[test]
    fn test_first_flying_tick_moves_projectile() {
        let mut state = GameState::new(1, pack(&[&["12345678"]]));
        tick(&mut state, &FIRE);
        let p = state.projectile.as_ref().unwrap();
        assert_eq!(p.pos.x, SPAWN_X);
        assert_eq!(p.pos.y, SPAWN_Y - PROJECTILE_SPEED);
    }

    #[test]
    fn test_steering_clamped_and_ignored_in_flight() {
        let mut state = GameState::new(1, pack(&[&["12345678"]]));
        let left = TickInput {
            fire: false,
            steer: Some(Steer::Increase),
        };
        for _ in 0..200 {
            tick(&mut state, &left);
        }
        assert_eq!(state.aim_degrees, AIM_MAX_DEGREES);

        let right = TickInput {
            fire: false,
            steer: Some(Steer::Decrease),
        };
        tick(&mut state, &right);
        assert_eq!(state.aim_degrees, AIM_MAX_DEGREES - STEER_STEP_DEGREES);

        tick(&mut state, &FIRE);
        let aim = state.aim_degrees;
        tick(&mut state, &right);
        assert_eq!(state.phase, GamePhase::Flying);
        assert_eq!(state.aim_degrees, aim);
    }

    #[test]
    fn test_landing_rotates_colors_and_bumps_revision() {
        let mut state = GameState::new(9, pack(&[&["12345678"]]));
        let next = state.next_color;
        let revision = state.grid_revision;
        let count = state.grid.occupied_count();
        tick(&mut state, &FIRE);
        run_until_landed(&mut state);
        assert_eq!(state.current_color, next);
        assert_eq!(state.grid_revision, revision + 1);
        let events = state.drain_events();
        assert!(matches!(events[0], GameEvent::Fired { .. }));
        assert!(events.iter().any(|e| matches!(e, GameEvent::Landed { .. })));
        // No colour can make a cluster of three on this board
        assert_eq!(state.grid.occupied_count(), count + 1);
    }

    #[test]
    fn test_match_then_sweep_on_landing() {
        // Two reds hanging from a green ceiling bubble, a purple hanging under the reds
        let mut state = GameState::new(1, pack(&[&["2.......", "77", "5"]]));
        drop_in(&mut state, GridPos::new(2, 1), BubbleColor::Red);
        let outcome = tick(&mut state, &IDLE);
        assert_eq!(outcome, TickOutcome::Continue);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Popped { count: 3 }));
        assert!(events.contains(&GameEvent::Dropped { count: 1 }));
        assert_eq!(state.grid.occupied_count(), 1);
        assert_eq!(state.grid.get(GridPos::new(0, 0)), Some(BubbleColor::Green));
    }

    #[test]
    fn test_last_row_match_is_not_a_loss() {
        // A red pair in the last row hanging from a column of blues
        let mut rows = vec!["1"; GRID_ROWS - 1];
        rows.push("77");
        let mut state = GameState::new(1, pack(&[rows.as_slice()]));
        state.lives = 1;
        drop_in(&mut state, GridPos::new(2, GRID_ROWS - 1), BubbleColor::Red);

        let outcome = tick(&mut state, &IDLE);
        assert_eq!(outcome, TickOutcome::Continue);
        assert!(!state.last_row_occupied());
        assert!(!state.is_over());
    }

    #[test]
    fn test_last_row_landing_popped_with_partners_above() {
        // Grey column down to row 9, reds at (2,10) and (3,10), last row empty
        let mut rows: Vec<&str> = (0..GRID_ROWS - 2)
            .map(|r| if r % 2 == 0 { "..33" } else { "..3" })
            .collect();
        rows.push("..77");
        let mut state = GameState::new(1, pack(&[rows.as_slice()]));
        state.lives = 1;
        assert!(!state.last_row_occupied());
        let count = state.grid.occupied_count();

        drop_in(&mut state, GridPos::new(2, GRID_ROWS - 1), BubbleColor::Red);
        let outcome = tick(&mut state, &IDLE);
        assert_eq!(outcome, TickOutcome::Continue);
        assert!(state.drain_events().contains(&GameEvent::Popped { count: 3 }));
        assert!(!state.last_row_occupied());
        assert!(!state.grid.is_occupied(GridPos::new(2, 10)));
        assert!(!state.grid.is_occupied(GridPos::new(3, 10)));
        assert_eq!(state.grid.occupied_count(), count - 2);
        assert_eq!(state.lives, 1);
        assert!(!state.is_over());
    }

    #[test]
    fn test_last_row_with_lives_reloads_level() {
        let mut rows = vec!["1"; GRID_ROWS - 1];
        rows.push("");
        let mut state = GameState::new(1, pack(&[rows.as_slice(), &["2"]]));
        state.grid.set(GridPos::new(3, 0), Some(BubbleColor::Grey));
        drop_in(&mut state, GridPos::new(0, GRID_ROWS - 1), BubbleColor::Red);

        let outcome = tick(&mut state, &IDLE);
        assert_eq!(
            outcome,
            TickOutcome::LevelChanged {
                level: 0,
                theme: "theme-0".into(),
                reason: LevelChangeReason::LifeLost,
            }
        );
        assert_eq!(state.lives, STARTING_LIVES - 1);
        // Board is back to the level's fill pattern
        assert!(!state.grid.is_occupied(GridPos::new(3, 0)));
        assert_eq!(state.grid.occupied_count(), GRID_ROWS - 1);
    }

    #[test]
    fn test_last_row_on_last_life_is_lost() {
        let mut rows = vec!["1"; GRID_ROWS - 1];
        rows.push("");
        let mut state = GameState::new(1, pack(&[rows.as_slice()]));
        state.lives = 1;
        drop_in(&mut state, GridPos::new(0, GRID_ROWS - 1), BubbleColor::Red);

        assert_eq!(tick(&mut state, &IDLE), TickOutcome::Lost);
        assert!(state.is_over());
        assert_eq!(state.lives, 0);
        // Terminal outcome sticks
        assert_eq!(tick(&mut state, &FIRE), TickOutcome::Lost);
        assert_eq!(state.phase, GamePhase::Idle);
    }

    #[test]
    fn test_clearing_advances_level() {
        let mut state = GameState::new(1, pack(&[&["77"], &["2.2"]]));
        drop_in(&mut state, GridPos::new(2, 0), BubbleColor::Red);

        let outcome = tick(&mut state, &IDLE);
        assert_eq!(
            outcome,
            TickOutcome::LevelChanged {
                level: 1,
                theme: "theme-1".into(),
                reason: LevelChangeReason::Cleared,
            }
        );
        assert_eq!(state.level_index, 1);
        assert_eq!(state.theme, "theme-1");
        assert_eq!(state.grid.occupied_count(), 2);
        assert_eq!(state.lives, STARTING_LIVES);
    }

    #[test]
    fn test_clearing_final_level_wins() {
        let mut state = GameState::new(1, pack(&[&["77"]]));
        drop_in(&mut state, GridPos::new(2, 0), BubbleColor::Red);
        assert_eq!(tick(&mut state, &IDLE), TickOutcome::Won);
        assert_eq!(state.result, Some(RunResult::Won));
    }

    #[test]
    fn test_sweep_clearing_board_wins() {
        // The pop removes the only anchor; the sweep takes the rest
        let mut state = GameState::new(1, pack(&[&["77", "3"]]));
        drop_in(&mut state, GridPos::new(2, 0), BubbleColor::Red);
        assert_eq!(tick(&mut state, &IDLE), TickOutcome::Won);
        assert!(state.grid.is_empty());
    }

    #[test]
    fn test_same_seed_same_run() {
        let script: Vec<TickInput> = (0..600)
            .map(|i| TickInput {
                fire: i % 40 == 0,
                steer: match (i / 90) % 3 {
                    0 => Some(Steer::Increase),
                    1 => Some(Steer::Decrease),
                    _ => None,
                },
            })
            .collect();

        let levels = LevelPack::builtin().unwrap();
        let mut a = GameState::new(2024, levels.clone());
        let mut b = GameState::new(2024, levels);
        for input in &script {
            assert_eq!(tick(&mut a, input), tick(&mut b, input));
        }
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.aim_degrees, b.aim_degrees);
        assert_eq!(a.current_color, b.current_color);
        assert_eq!(a.time_ticks, 600);
    }
}
