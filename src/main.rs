//! Bubble Burst entry point
//!
//! There is no window here: the native binary plays one headless run through
//! the scene router with a simple autopilot and logs what happens.
//!
//! Usage: `bubble-burst [settings.json]`

mod headless {
    use bubble_burst::consts::{SPAWN_X, SPAWN_Y};
    use bubble_burst::scene::{ActiveScene, FrameInput, MenuAction, SceneKey, SceneRouter};
    use bubble_burst::sim::{GameEvent, GamePhase, GameState, Steer, TickInput, cell_center};
    use bubble_burst::{LevelPack, Result, Settings, clamp_aim};

    /// Give up after this many frames (about an hour at 60 Hz)
    const MAX_FRAMES: u64 = 216_000;

    #[derive(Debug, Default)]
    struct RunStats {
        shots: u32,
        popped: usize,
        dropped: usize,
        bounces: u32,
    }

    pub fn run() -> Result<()> {
        let settings = match std::env::args().nth(1) {
            Some(path) => Settings::load(path),
            None => Settings::default(),
        };
        let levels = match &settings.levels_path {
            Some(path) => LevelPack::load(path)?,
            None => LevelPack::builtin()?,
        };
        let seed = settings.seed.unwrap_or_else(clock_seed);
        log::info!("Bubble Burst (headless) starting with seed {}", seed);

        let mut router = SceneRouter::new(seed, settings, levels);
        router.update(&FrameInput {
            menu: Some(MenuAction::Play),
            ..Default::default()
        });

        let mut stats = RunStats::default();
        let mut fire_held = false;
        for frame in 0..MAX_FRAMES {
            let ActiveScene::Game(game) = router.active_mut() else {
                break;
            };
            let state = game.state_mut();
            for event in state.drain_events() {
                match event {
                    GameEvent::Fired { .. } => stats.shots += 1,
                    GameEvent::WallBounce => stats.bounces += 1,
                    GameEvent::Popped { count } => stats.popped += count,
                    GameEvent::Dropped { count } => stats.dropped += count,
                    GameEvent::Landed { .. } => {}
                }
            }

            let mut input = autopilot(state);
            // Release between shots so every press is a new edge
            if input.fire && fire_held {
                input.fire = false;
            }
            fire_held = input.fire;

            if let Some(SceneKey::GameOver { won }) = router.update(&FrameInput {
                tick: input,
                menu: None,
            }) {
                log::info!(
                    "Run {} after {} frames: {:?}",
                    if won { "won" } else { "lost" },
                    frame + 1,
                    stats
                );
                return Ok(());
            }
        }

        log::warn!("Stopped after {} frames without a result: {:?}", MAX_FRAMES, stats);
        Ok(())
    }

    /// Aim at the lowest bubble matching the loaded colour, then fire
    fn autopilot(state: &GameState) -> TickInput {
        if state.phase != GamePhase::Idle {
            return TickInput::default();
        }

        let target = state
            .grid
            .occupied()
            .filter(|&(_, color)| color == state.current_color)
            .max_by_key(|&(pos, _)| pos.row)
            .or_else(|| state.grid.occupied().max_by_key(|&(pos, _)| pos.row))
            .and_then(|(pos, _)| cell_center(pos.col as i32, pos.row as i32));
        let Some(target) = target else {
            return TickInput {
                fire: true,
                steer: None,
            };
        };

        let wanted = clamp_aim((SPAWN_Y - target.y).atan2(target.x - SPAWN_X).to_degrees());
        let error = wanted - state.aim_degrees;
        if error.abs() <= state.steer_step() / 2.0 {
            TickInput {
                fire: true,
                steer: None,
            }
        } else {
            TickInput {
                fire: false,
                steer: Some(if error > 0.0 {
                    Steer::Increase
                } else {
                    Steer::Decrease
                }),
            }
        }
    }

    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
