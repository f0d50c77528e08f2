use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::difficulty::GameDifficulty;
use crate::engine::{GameEngine, GameState, RunState, StepOutcome};
use crate::error::{ConfigError, EngineError};
use crate::grid::GridConfig;
use crate::snake::Direction;

/// Cloneable handle to one engine, for hosts that press keys on one thread
/// and tick on another. Every call holds the lock for its whole duration, so
/// a turn lands either entirely before or entirely after a step.
#[derive(Debug, Clone, Default)]
pub struct SharedEngine {
    engine: Arc<Mutex<GameEngine>>,
}

impl SharedEngine {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GameEngine> {
        // no engine method panics halfway through a mutation
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start(&self, difficulty: GameDifficulty, grid: GridConfig) -> Result<(), ConfigError> {
        self.lock().start(difficulty, grid)
    }

    pub fn set_direction(&self, direction: Direction) -> Result<(), EngineError> {
        self.lock().set_direction(direction)
    }

    pub fn step(&self) -> Result<StepOutcome, EngineError> {
        self.lock().step()
    }

    pub fn snapshot(&self) -> Option<RunState> {
        self.lock().snapshot()
    }

    pub fn state(&self) -> GameState {
        self.lock().state()
    }

    pub fn is_running(&self) -> bool {
        self.lock().is_running()
    }

    pub fn tick_delay_ms(&self) -> u64 {
        self.lock().tick_delay_ms()
    }

    pub fn tick_interval(&self) -> Duration {
        self.lock().tick_interval()
    }

    /// Runs `f` with exclusive access, for sequences that must not interleave with other callers.
    pub fn with<R>(&self, f: impl FnOnce(&mut GameEngine) -> R) -> R {
        f(&mut self.lock())
    }
}
