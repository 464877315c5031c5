//! Scene routing
//!
//! Every screen implements [`Scene`]. The router owns exactly one active scene
//! as a tagged union and swaps it when `update` asks for a transition. Drawing
//! is left to the caller: scenes only expose a [`SceneView`] of plain data.

use crate::levels::LevelPack;
use crate::settings::Settings;
use crate::sim::{GameState, TickInput, TickOutcome, tick};

/// Scene transition targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKey {
    Intro,
    Game,
    GameOver { won: bool },
}

/// Menu buttons, already hit-tested by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Play,
    Instructions,
    Back,
}

/// Everything a scene may read in one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub tick: TickInput,
    /// Menu button clicked this frame
    pub menu: Option<MenuAction>,
}

/// Intro sub-screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroScreen {
    Menu,
    Instructions,
}

/// What a renderer needs to draw the current frame
#[derive(Debug)]
pub enum SceneView<'a> {
    Intro {
        screen: IntroScreen,
    },
    Game {
        state: &'a GameState,
        last_outcome: &'a TickOutcome,
    },
    GameOver {
        won: bool,
    },
}

/// Common interface for all screens
pub trait Scene {
    /// Called once when the scene becomes active
    fn enter(&mut self);
    /// Advance one frame; `Some` requests a switch
    fn update(&mut self, input: &FrameInput) -> Option<SceneKey>;
    fn view(&self) -> SceneView<'_>;
}

/// Title menu and instructions page
#[derive(Debug)]
pub struct IntroScene {
    screen: IntroScreen,
}

impl Default for IntroScene {
    fn default() -> Self {
        Self {
            screen: IntroScreen::Menu,
        }
    }
}

impl Scene for IntroScene {
    fn enter(&mut self) {
        self.screen = IntroScreen::Menu;
    }

    fn update(&mut self, input: &FrameInput) -> Option<SceneKey> {
        match (self.screen, input.menu?) {
            (IntroScreen::Menu, MenuAction::Play) => return Some(SceneKey::Game),
            (IntroScreen::Menu, MenuAction::Instructions) => self.screen = IntroScreen::Instructions,
            (IntroScreen::Instructions, MenuAction::Back) => self.screen = IntroScreen::Menu,
            _ => {}
        }
        None
    }

    fn view(&self) -> SceneView<'_> {
        SceneView::Intro {
            screen: self.screen,
        }
    }
}

/// A run of the game
#[derive(Debug)]
pub struct GameScene {
    seed: u64,
    settings: Settings,
    state: GameState,
    last_outcome: TickOutcome,
}

impl GameScene {
    pub fn new(seed: u64, settings: Settings, levels: LevelPack) -> Self {
        let state = GameState::with_settings(seed, &settings, levels);
        Self {
            seed,
            settings,
            state,
            last_outcome: TickOutcome::Continue,
        }
    }

    /// Throw away the current run and start again from the same seed
    pub fn restart(&mut self) {
        let levels = self.state.levels().clone();
        self.state = GameState::with_settings(self.seed, &self.settings, levels);
        self.last_outcome = TickOutcome::Continue;
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn last_outcome(&self) -> &TickOutcome {
        &self.last_outcome
    }
}

impl Scene for GameScene {
    fn enter(&mut self) {
        log::info!("Starting run with seed {}", self.seed);
    }

    fn update(&mut self, input: &FrameInput) -> Option<SceneKey> {
        self.last_outcome = tick(&mut self.state, &input.tick);
        match &self.last_outcome {
            TickOutcome::Continue => None,
            TickOutcome::LevelChanged { level, theme, reason } => {
                log::info!("Level {} ({:?}), theme {}", level + 1, reason, theme);
                None
            }
            TickOutcome::Lost => Some(SceneKey::GameOver { won: false }),
            TickOutcome::Won => Some(SceneKey::GameOver { won: true }),
        }
    }

    fn view(&self) -> SceneView<'_> {
        SceneView::Game {
            state: &self.state,
            last_outcome: &self.last_outcome,
        }
    }
}

/// Win / lose screen; any click or a fresh fire press returns to the intro
#[derive(Debug)]
pub struct GameOverScene {
    won: bool,
    fire_was_down: bool,
}

impl GameOverScene {
    pub fn new(won: bool) -> Self {
        Self {
            won,
            fire_was_down: true,
        }
    }
}

impl Scene for GameOverScene {
    fn enter(&mut self) {
        // Fire held from the final shot must be released first
        self.fire_was_down = true;
    }

    fn update(&mut self, input: &FrameInput) -> Option<SceneKey> {
        let fire_pressed = input.tick.fire && !self.fire_was_down;
        self.fire_was_down = input.tick.fire;
        (fire_pressed || input.menu.is_some()).then_some(SceneKey::Intro)
    }

    fn view(&self) -> SceneView<'_> {
        SceneView::GameOver { won: self.won }
    }
}

/// The one active scene
#[derive(Debug)]
pub enum ActiveScene {
    Intro(IntroScene),
    Game(Box<GameScene>),
    GameOver(GameOverScene),
}

impl ActiveScene {
    pub fn key(&self) -> SceneKey {
        match self {
            ActiveScene::Intro(_) => SceneKey::Intro,
            ActiveScene::Game(_) => SceneKey::Game,
            ActiveScene::GameOver(s) => SceneKey::GameOver { won: s.won },
        }
    }

    fn scene(&self) -> &dyn Scene {
        match self {
            ActiveScene::Intro(s) => s,
            ActiveScene::Game(s) => &**s,
            ActiveScene::GameOver(s) => s,
        }
    }

    fn scene_mut(&mut self) -> &mut dyn Scene {
        match self {
            ActiveScene::Intro(s) => s,
            ActiveScene::Game(s) => &mut **s,
            ActiveScene::GameOver(s) => s,
        }
    }
}

/// Drives the active scene and performs switches
#[derive(Debug)]
pub struct SceneRouter {
    active: ActiveScene,
    settings: Settings,
    levels: LevelPack,
    next_seed: u64,
}

impl SceneRouter {
    /// Start on the intro screen. Each new run takes the next seed in sequence.
    pub fn new(seed: u64, settings: Settings, levels: LevelPack) -> Self {
        let mut router = Self {
            active: ActiveScene::Intro(IntroScene::default()),
            settings,
            levels,
            next_seed: seed,
        };
        router.active.scene_mut().enter();
        router
    }

    /// Update the active scene, switching afterwards if it asked to
    pub fn update(&mut self, input: &FrameInput) -> Option<SceneKey> {
        let next = self.active.scene_mut().update(input);
        if let Some(key) = next {
            self.switch_to(key);
        }
        next
    }

    pub fn view(&self) -> SceneView<'_> {
        self.active.scene().view()
    }

    pub fn active(&self) -> &ActiveScene {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut ActiveScene {
        &mut self.active
    }

    pub fn switch_to(&mut self, key: SceneKey) {
        log::info!("Scene {:?} -> {:?}", self.active.key(), key);
        self.active = match key {
            SceneKey::Intro => ActiveScene::Intro(IntroScene::default()),
            SceneKey::Game => {
                let seed = self.next_seed;
                self.next_seed = self.next_seed.wrapping_add(1);
                ActiveScene::Game(Box::new(GameScene::new(
                    seed,
                    self.settings.clone(),
                    self.levels.clone(),
                )))
            }
            SceneKey::GameOver { won } => ActiveScene::GameOver(GameOverScene::new(won)),
        };
        self.active.scene_mut().enter();
    }
}
