//! Terminal front end: raw stdin for keys, ANSI frames on stdout, and the
//! clock that drives [`SharedEngine::step`].

pub mod input;
pub mod render;

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use log::{debug, info, warn};

use crate::difficulty::GameDifficulty;
use crate::engine::{EngineConfig, GameEngine, StepOutcome};
use crate::error::EngineError;
use crate::grid::GridConfig;
use crate::shared::SharedEngine;
use input::{Key, RawTerminal};

const POLL_INTERVAL: Duration = Duration::from_millis(3);

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub grid: GridConfig,
    pub difficulty: GameDifficulty,
    pub engine: EngineConfig,
    pub show_grid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<W: Write> {
    engine: SharedEngine,
    grid: GridConfig,
    // applied on the next start
    selected: GameDifficulty,
    show_grid: bool,
    confirming_exit: bool,
    best_score: u32,
    out: W,
}

impl<W: Write> App<W> {
    pub fn new(engine: SharedEngine, settings: &Settings, out: W) -> Self {
        App {
            engine,
            grid: settings.grid,
            selected: settings.difficulty,
            show_grid: settings.show_grid,
            confirming_exit: false,
            best_score: 0,
            out,
        }
    }

    pub fn start(&mut self) -> anyhow::Result<()> {
        self.engine
            .start(self.selected, self.grid)
            .context("failed to start a new game")?;
        self.draw()?;
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.confirming_exit
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn selected_difficulty(&self) -> GameDifficulty {
        self.selected
    }

    pub fn is_showing_grid(&self) -> bool {
        self.show_grid
    }

    pub fn handle_key(&mut self, key: Key) -> anyhow::Result<Flow> {
        if self.confirming_exit {
            if matches!(key, Key::Char('y') | Key::Char('Y')) {
                info!("player quit");
                return Ok(Flow::Quit);
            }
            self.confirming_exit = false;
            self.draw()?;
            return Ok(Flow::Continue);
        }

        match key {
            Key::Escape | Key::Char('q') => {
                self.confirming_exit = true;
                self.draw()?;
            }
            Key::Enter if !self.engine.is_running() => self.start()?,
            Key::Char(digit @ '1'..='3') => {
                let index = digit as usize - '1' as usize;
                self.selected = GameDifficulty::ALL[index];
                debug!("{} selected for the next game", self.selected);
                self.draw()?;
            }
            Key::Char('g') => {
                self.show_grid = true;
                self.draw()?;
            }
            Key::Char('h') => {
                self.show_grid = false;
                self.draw()?;
            }
            Key::Arrow(direction) => match self.engine.set_direction(direction) {
                Ok(()) => {}
                Err(EngineError::NotRunning { state }) => {
                    debug!("dropping {direction:?} turn while {state:?}");
                }
                Err(err) => return Err(err.into()),
            },
            _ => {}
        }
        Ok(Flow::Continue)
    }

    pub fn tick(&mut self) -> anyhow::Result<StepOutcome> {
        let outcome = self.engine.step()?;
        if outcome == StepOutcome::AteApple {
            debug!("re-arming tick at {}ms", self.engine.tick_delay_ms());
        }
        if let Some(state) = self.engine.snapshot() {
            self.best_score = self.best_score.max(state.score);
        }
        self.draw()?;
        Ok(outcome)
    }

    /// Ticks at the engine's current pace and handles keys until the player quits.
    pub fn run_loop(&mut self, keys: &Receiver<Key>) -> anyhow::Result<()> {
        let mut frame_start_time = Instant::now();
        loop {
            match keys.try_recv() {
                Ok(key) => {
                    if self.handle_key(key)? == Flow::Quit {
                        return Ok(());
                    }
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => bail!("input thread stopped"),
            }
            // the clock stands still while paused or after a game over
            if self.is_paused() || !self.engine.is_running() {
                frame_start_time = Instant::now();
                thread::sleep(POLL_INTERVAL);
                continue;
            }
            if frame_start_time.elapsed() < self.engine.tick_interval() {
                // wait for next frame
                thread::sleep(POLL_INTERVAL);
                continue;
            }
            frame_start_time = Instant::now();
            self.tick()?;
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let Some(state) = self.engine.snapshot() else {
            return Ok(());
        };
        let mut frame = render::clear_screen();
        frame.push_str(&render::render_board(&state, self.show_grid, self.selected));
        if !state.running {
            frame.push_str(&render::render_final_screen(&state, self.selected));
        }
        if self.confirming_exit {
            frame.push_str(&render::render_exit_confirmation());
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()
    }
}

/// Plays until the player quits and returns the best score of the session.
pub fn run(settings: Settings) -> anyhow::Result<u32> {
    let engine = SharedEngine::new(GameEngine::new(settings.engine.clone()));
    let terminal = RawTerminal::enable().context("failed to put the terminal in raw mode")?;

    let mut app = App::new(engine, &settings, io::stdout());
    app.start()?;

    let (tx, rx) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));
    let reader = input::spawn_input_thread(tx, Arc::clone(&stop));

    let result = app.run_loop(&rx);

    stop.store(true, Ordering::Relaxed);
    match reader.join() {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!("input thread failed: {err}"),
        Err(_) => warn!("input thread panicked"),
    }
    drop(terminal);
    result.map(|()| app.best_score())
}

#[cfg(test)]
mod tests {
    use super::input::dispatch;
    use super::*;
    use crate::coordinates::Coordinates;
    use crate::engine::{Collision, GameState};
    use crate::snake::Direction;

    fn app() -> App<Vec<u8>> {
        let engine = SharedEngine::new(GameEngine::new(EngineConfig {
            seed: Some(5),
            ..EngineConfig::default()
        }));
        let mut app = App::new(engine, &Settings::default(), Vec::new());
        app.start().unwrap();
        // out of the snake's way
        app.engine.with(|engine| {
            engine
                .debug_set_apple(Coordinates::new(775, 575))
                .unwrap();
        });
        app
    }

    fn crash(app: &mut App<Vec<u8>>) {
        app.engine.with(|engine| {
            engine
                .debug_set_snake(&[Coordinates::new(775, 0)], Direction::Right)
                .unwrap();
        });
        assert_eq!(
            app.tick().unwrap(),
            StepOutcome::Collided(Collision::Wall)
        );
    }

    #[test]
    fn escape_asks_before_quitting() {
        let mut app = app();
        assert_eq!(app.handle_key(Key::Escape).unwrap(), Flow::Continue);
        assert!(app.is_paused());
        let shown = String::from_utf8_lossy(&app.out).to_string();
        assert!(shown.contains("Are you sure you want to exit the Game?"));

        assert_eq!(app.handle_key(Key::Char('n')).unwrap(), Flow::Continue);
        assert!(!app.is_paused());

        assert_eq!(app.handle_key(Key::Char('q')).unwrap(), Flow::Continue);
        assert_eq!(app.handle_key(Key::Char('y')).unwrap(), Flow::Quit);
    }

    #[test]
    fn grid_overlay_toggles() {
        let mut app = app();
        assert!(!app.is_showing_grid());
        let _ = app.handle_key(Key::Char('g')).unwrap();
        assert!(app.is_showing_grid());
        let _ = app.handle_key(Key::Char('h')).unwrap();
        assert!(!app.is_showing_grid());
    }

    #[test]
    fn enter_restarts_only_after_game_over() {
        let mut app = app();
        let _ = app.tick().unwrap();
        let _ = app.handle_key(Key::Enter).unwrap();
        // still the same run: the head has moved once
        let head = app.engine.snapshot().unwrap().snake[0];
        assert_eq!(head, Coordinates::new(100, 300));

        crash(&mut app);
        assert!(matches!(app.engine.state(), GameState::GameOver(_)));
        let shown = String::from_utf8_lossy(&app.out).to_string();
        assert!(shown.contains("Your final score is 0"));

        let _ = app.handle_key(Key::Char('3')).unwrap();
        assert_eq!(app.selected_difficulty(), GameDifficulty::Hard);
        let _ = app.handle_key(Key::Enter).unwrap();
        let state = app.engine.snapshot().unwrap();
        assert!(state.running);
        assert_eq!(state.difficulty, GameDifficulty::Hard);
        assert_eq!(state.snake[0], Coordinates::new(75, 300));
    }

    #[test]
    fn difficulty_change_waits_for_the_next_game() {
        let mut app = app();
        let _ = app.handle_key(Key::Char('2')).unwrap();
        assert_eq!(
            app.engine.snapshot().unwrap().difficulty,
            GameDifficulty::Easy
        );
        assert_eq!(app.selected_difficulty(), GameDifficulty::Medium);
    }

    #[test]
    fn arrows_after_game_over_are_dropped() {
        let mut app = app();
        crash(&mut app);
        assert_eq!(
            app.handle_key(Key::Arrow(Direction::Up)).unwrap(),
            Flow::Continue
        );
    }

    fn pump(app: &mut App<Vec<u8>>, keys: &Receiver<Key>) -> Flow {
        let mut flow = Flow::Continue;
        for key in keys.try_iter() {
            flow = app.handle_key(key).unwrap();
        }
        flow
    }

    #[test]
    fn turns_typed_at_the_exit_prompt_are_swallowed() {
        let mut app = app();
        let (tx, rx) = mpsc::channel();
        assert!(dispatch(&tx, Key::Escape));
        assert_eq!(pump(&mut app, &rx), Flow::Continue);
        assert!(app.is_paused());

        assert!(dispatch(&tx, Key::Arrow(Direction::Up)));
        assert_eq!(pump(&mut app, &rx), Flow::Continue);
        assert!(!app.is_paused());
        assert!(dispatch(&tx, Key::Escape));
        assert!(dispatch(&tx, Key::Char('n')));
        assert_eq!(pump(&mut app, &rx), Flow::Continue);
        assert!(!app.is_paused());

        let _ = app.tick().unwrap();
        let head = app.engine.snapshot().unwrap().snake[0];
        assert_eq!(head, Coordinates::new(100, 300));
    }

    #[test]
    fn turns_from_the_reader_reach_the_next_tick() {
        let mut app = app();
        let (tx, rx) = mpsc::channel();
        assert!(dispatch(&tx, Key::Arrow(Direction::Up)));
        assert_eq!(pump(&mut app, &rx), Flow::Continue);

        let _ = app.tick().unwrap();
        let head = app.engine.snapshot().unwrap().snake[0];
        assert_eq!(head, Coordinates::new(75, 275));
    }
}
